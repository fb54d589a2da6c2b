use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// The 19 SMB2 commands, in dispatch-table order.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize)]
pub enum SMBCommandCode {
    Negotiate = 0x0000,
    SessionSetup = 0x0001,
    Logoff = 0x0002,
    TreeConnect = 0x0003,
    TreeDisconnect = 0x0004,
    Create = 0x0005,
    Close = 0x0006,
    Flush = 0x0007,
    Read = 0x0008,
    Write = 0x0009,
    Lock = 0x000A,
    Ioctl = 0x000B,
    Cancel = 0x000C,
    Echo = 0x000D,
    QueryDirectory = 0x000E,
    ChangeNotify = 0x000F,
    QueryInfo = 0x0010,
    SetInfo = 0x0011,
    OplockBreak = 0x0012,
}

impl SMBCommandCode {
    pub const ALL: [SMBCommandCode; 19] = [
        Self::Negotiate, Self::SessionSetup, Self::Logoff, Self::TreeConnect,
        Self::TreeDisconnect, Self::Create, Self::Close, Self::Flush,
        Self::Read, Self::Write, Self::Lock, Self::Ioctl, Self::Cancel,
        Self::Echo, Self::QueryDirectory, Self::ChangeNotify, Self::QueryInfo,
        Self::SetInfo, Self::OplockBreak,
    ];
}
