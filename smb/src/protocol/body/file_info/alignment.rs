use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_ALIGNMENT_INFORMATION (MS-FSCC 2.4.3) — 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAlignmentInformation {
    pub alignment_requirement: u32,
}

impl FileAlignmentInformation {
    pub const WIRE_SIZE: usize = 4;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let alignment_requirement = reader.u32();
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { alignment_requirement })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u32(self.alignment_requirement);
    }
}
