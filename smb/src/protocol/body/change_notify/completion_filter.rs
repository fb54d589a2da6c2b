use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SMBCompletionFilter: u32 {
        const FILE_NAME       = 0x0001;
        const DIR_NAME        = 0x0002;
        const ATTRIBUTES      = 0x0004;
        const SIZE            = 0x0008;
        const LAST_WRITE      = 0x0010;
        const LAST_ACCESS     = 0x0020;
        const CREATION        = 0x0040;
        const EA              = 0x0080;
        const SECURITY        = 0x0100;
        const STREAM_NAME     = 0x0200;
        const STREAM_SIZE     = 0x0400;
        const STREAM_WRITE    = 0x0800;
    }
}
