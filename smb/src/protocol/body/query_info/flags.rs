use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBQueryInfoFlags: u32 {
        const RESTART_SCANS       = 0x1;
        const RETURN_SINGLE_ENTRY = 0x2;
        const INDEX_SPECIFIED     = 0x4;
    }
}
