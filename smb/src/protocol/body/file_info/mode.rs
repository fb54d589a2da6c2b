use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_MODE_INFORMATION (MS-FSCC 2.4.26) — 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModeInformation {
    pub mode: u32,
}

impl FileModeInformation {
    pub const WIRE_SIZE: usize = 4;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let mode = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { mode })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32(self.mode);
    }
}
