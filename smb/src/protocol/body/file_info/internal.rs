use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_INTERNAL_INFORMATION (MS-FSCC 2.4.20) — 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInternalInformation {
    pub index_number: u64,
}

impl FileInternalInformation {
    pub const WIRE_SIZE: usize = 8;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let index_number = reader.u64();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { index_number })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u64(self.index_number);
    }
}
