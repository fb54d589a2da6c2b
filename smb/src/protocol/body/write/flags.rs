use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBWriteFlags: u8 {
        const WRITE_THROUGH    = 0x01;
        const WRITE_UNBUFFERED = 0x02;
    }
}
