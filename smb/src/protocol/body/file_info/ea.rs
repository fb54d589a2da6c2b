use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_EA_INFORMATION (MS-FSCC 2.4.12) — 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEaInformation {
    pub ea_size: u32,
}

impl FileEaInformation {
    pub const WIRE_SIZE: usize = 4;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let ea_size = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { ea_size })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32(self.ea_size);
    }
}
