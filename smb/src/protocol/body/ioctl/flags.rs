use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBIoCtlRequestFlags {
    Ioctl = 0x0,
    Fsctl = 0x1,
}
