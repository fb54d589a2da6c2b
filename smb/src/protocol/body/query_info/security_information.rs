use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBSecurityInformation: u32 {
        const OWNER_SECURITY_INFORMATION     = 0x0000_0001;
        const GROUP_SECURITY_INFORMATION     = 0x0000_0002;
        const DACL_SECURITY_INFORMATION      = 0x0000_0004;
        const SACL_SECURITY_INFORMATION      = 0x0000_0008;
        const LABEL_SECURITY_INFORMATION     = 0x0000_0010;
        const ATTRIBUTE_SECURITY_INFORMATION = 0x0000_0020;
        const SCOPE_SECURITY_INFORMATION     = 0x0000_0040;
        const BACKUP_SECURITY_INFORMATION    = 0x0001_0000;
    }
}
