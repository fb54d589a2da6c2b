use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBCreateOptions: u32 {
        const DIRECTORY_FILE            = 0x0000_0001;
        const WRITE_THROUGH             = 0x0000_0002;
        const SEQUENTIAL_ONLY           = 0x0000_0004;
        const NO_INTERMEDIATE_BUFFERING = 0x0000_0008;
        const SYNCHRONOUS_IO_ALERT      = 0x0000_0010;
        const SYNCHRONOUS_IO_NONALERT   = 0x0000_0020;
        const NON_DIRECTORY_FILE        = 0x0000_0040;
        const COMPLETE_IF_OPLOCKED      = 0x0000_0100;
        const NO_EA_KNOWLEDGE           = 0x0000_0200;
        const RANDOM_ACCESS             = 0x0000_0800;
        const DELETE_ON_CLOSE           = 0x0000_1000;
        const OPEN_BY_FILE_ID           = 0x0000_2000;
        const OPEN_FOR_BACKUP_INTENT    = 0x0000_4000;
        const NO_COMPRESSION            = 0x0000_8000;
        const OPEN_REMOTE_INSTANCE      = 0x0000_0400;
        const OPEN_REQUIRING_OPLOCK     = 0x0001_0000;
        const DISALLOW_EXCLUSIVE        = 0x0002_0000;
        const RESERVE_OPFILTER          = 0x0010_0000;
        const OPEN_REPARSE_POINT        = 0x0020_0000;
        const OPEN_NO_RECALL            = 0x0040_0000;
        const OPEN_FOR_FREE_SPACE_QUERY = 0x0080_0000;
    }
}

impl SMBCreateOptions {
    /// `RESERVE_OPFILTER` is reserved and must cause the create to fail
    /// when a client sets it.
    pub fn rejected(&self) -> bool {
        self.contains(Self::RESERVE_OPFILTER)
    }
}
