use smb_core::nt_status::NTStatus;

/// The header's `Status` field is a raw `u32`; most of the codes the
/// dispatcher cares about round-trip through [`NTStatus`], but the wire
/// itself never rejects an unrecognized value — it's just echoed back to
/// the client as-is (e.g. vendor-specific DOS error codes we don't model).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SMBStatus(u32);

impl SMBStatus {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn severity(self) -> u8 {
        ((self.0 >> 30) & 0b11) as u8
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<NTStatus> for SMBStatus {
    fn from(value: NTStatus) -> Self {
        Self(value.into())
    }
}

impl From<u32> for SMBStatus {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<SMBStatus> for u32 {
    fn from(value: SMBStatus) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bits_for_success_and_error() {
        assert_eq!(SMBStatus::from(NTStatus::StatusSuccess).severity(), 0b00);
        assert_eq!(SMBStatus::from(NTStatus::AccessDenied).severity(), 0b11);
    }
}
