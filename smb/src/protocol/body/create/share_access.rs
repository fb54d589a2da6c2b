use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBShareAccess: u32 {
        const READ   = 0x1;
        const WRITE  = 0x2;
        const DELETE = 0x4;
    }
}
