use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// SMB2 header `Flags` field (offset 16, 4 bytes).
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SMBFlags: u32 {
        const SERVER_TO_REDIR      = 0x0000_0001;
        const ASYNC_COMMAND        = 0x0000_0002;
        const RELATED_OPERATIONS   = 0x0000_0004;
        const SIGNED               = 0x0000_0008;
        const PRIORITY_MASK        = 0x0000_0070;
        const DFS_OPERATIONS       = 0x1000_0000;
        const REPLAY_OPERATION     = 0x2000_0000;
    }
}

impl SMBFlags {
    pub fn is_response(self) -> bool {
        self.contains(Self::SERVER_TO_REDIR)
    }

    pub fn is_async(self) -> bool {
        self.contains(Self::ASYNC_COMMAND)
    }

    pub fn is_related(self) -> bool {
        self.contains(Self::RELATED_OPERATIONS)
    }

    pub fn is_signed(self) -> bool {
        self.contains(Self::SIGNED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_match_ms_smb2() {
        assert_eq!(SMBFlags::SERVER_TO_REDIR.bits(), 0x0000_0001);
        assert_eq!(SMBFlags::ASYNC_COMMAND.bits(), 0x0000_0002);
        assert_eq!(SMBFlags::RELATED_OPERATIONS.bits(), 0x0000_0004);
        assert_eq!(SMBFlags::SIGNED.bits(), 0x0000_0008);
    }
}
