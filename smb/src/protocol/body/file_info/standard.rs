use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

/// FILE_STANDARD_INFORMATION (MS-FSCC 2.4.41) — 24 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStandardInformation {
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub number_of_links: u32,
    pub delete_pending: bool,
    pub directory: bool,
}

impl FileStandardInformation {
    pub const WIRE_SIZE: usize = 24;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let allocation_size = reader.u64();
        let end_of_file = reader.u64();
        let number_of_links = reader.u32();
        let delete_pending = reader.u8() != 0;
        let directory = reader.u8() != 0;
        reader.skip(2); // reserved
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { allocation_size, end_of_file, number_of_links, delete_pending, directory })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u64(self.allocation_size);
        writer.u64(self.end_of_file);
        writer.u32(self.number_of_links);
        writer.u8(self.delete_pending as u8);
        writer.u8(self.directory as u8);
        writer.zeros(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_fixed_size() {
        let info = FileStandardInformation { allocation_size: 8192, end_of_file: 2048, number_of_links: 3, delete_pending: true, directory: false };
        let mut w = Writer::new();
        info.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), FileStandardInformation::WIRE_SIZE);
        let mut r = Reader::new(&bytes);
        assert_eq!(FileStandardInformation::parse(&mut r).unwrap(), info);
    }
}
