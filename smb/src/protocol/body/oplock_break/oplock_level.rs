use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

/// Only these three levels are valid in an oplock break acknowledgement;
/// batch and lease oplocks break through the lease-break path instead.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBOplockLevel {
    None = 0x0,
    II = 0x1,
    Exclusive = 0x8,
}
