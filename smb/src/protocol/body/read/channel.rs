use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBRWChannel {
    None = 0x0,
    RdmaV1 = 0x1,
    RdmaV1Invalidate = 0x2,
}
