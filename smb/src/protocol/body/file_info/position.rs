use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_POSITION_INFORMATION (MS-FSCC 2.4.35) — 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePositionInformation {
    pub current_byte_offset: u64,
}

impl FilePositionInformation {
    pub const WIRE_SIZE: usize = 8;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let current_byte_offset = reader.u64();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { current_byte_offset })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u64(self.current_byte_offset);
    }
}
