use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBReadRequestFlags: u8 {
        const UNBUFFERED         = 0x01;
        const REQUEST_COMPRESSED = 0x02;
    }
}

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBReadResponseFlags {
    None = 0x0,
    RdmaTransform = 0x01,
}
