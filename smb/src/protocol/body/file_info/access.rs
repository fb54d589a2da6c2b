use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_ACCESS_INFORMATION (MS-FSCC 2.4.1) — 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccessInformation {
    pub access_flags: u32,
}

impl FileAccessInformation {
    pub const WIRE_SIZE: usize = 4;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let access_flags = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { access_flags })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32(self.access_flags);
    }
}
