use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBInfoType {
    File = 1,
    Filesystem = 2,
    Security = 3,
    Quota = 4,
}
