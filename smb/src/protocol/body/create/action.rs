use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBCreateAction {
    FileSuperseded = 0x0,
    FileOpened = 0x1,
    FileCreated = 0x2,
    FileOverwritten = 0x3,
}
