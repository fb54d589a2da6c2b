use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBLockFlags: u32 {
        const SHARED_LOCK          = 0x1;
        const EXCLUSIVE_LOCK       = 0x2;
        const UNLOCK               = 0x4;
        const FAIL_IMMEDIATELY     = 0x10;
    }
}
