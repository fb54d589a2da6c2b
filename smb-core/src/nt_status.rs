use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Abridged NT_STATUS table. Severity lives in bits 31:30 of the raw
/// value: `00` success, `01` informational, `10` warning, `11` error.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum NTStatus {
    StatusSuccess = 0x0000_0000,
    StatusPending = 0x0000_0103,
    SecIContinueNeeded = 0x0009_0312,
    MoreProcessingRequired = 0xC000_0016,
    InvalidInfoClass = 0xC000_0003,
    InvalidParameter = 0xC000_000D,
    NoSuchFile = 0xC000_000F,
    AccessDenied = 0xC000_0022,
    NameCollision = 0xC000_0035,
    BufferTooSmall = 0xC000_0023,
    StatusLogonFailure = 0xC000_006D,
    StatusNotSupported = 0xC000_00BB,
    RequestNotAccepted = 0xC000_00D0,
    StatusCancelled = 0xC000_0120,
    FileClosed = 0xC000_0128,
    InsufficientResources = 0xC000_009A,
    UserSessionDeleted = 0xC000_0203,
    NetworkSessionExpired = 0xC000_035C,
    BadNetworkName = 0xC00C_00CC,
    UnexpectedIoError = 0xC000_00E9,
    UnknownError = 0xFFFF_FFFF,
}

impl NTStatus {
    /// Severity bits 31:30: `0b00` success, `0b01` informational,
    /// `0b10` warning, `0b11` error.
    pub fn severity(self) -> u8 {
        ((u32::from(self) >> 30) & 0b11) as u8
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::StatusSuccess)
    }

    pub fn is_error(self) -> bool {
        self.severity() == 0b11
    }
}

impl Default for NTStatus {
    fn default() -> Self {
        Self::StatusSuccess
    }
}
