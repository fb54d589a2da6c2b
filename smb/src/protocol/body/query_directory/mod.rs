pub mod flags;
pub mod information_class;

pub use flags::SMBQueryDirectoryFlags;
pub use information_class::SMBInformationClass;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::file_info::FileIdBothDirectoryInformationEntry;

const REQUEST_STRUCTURE_SIZE: u16 = 33;
const RESPONSE_STRUCTURE_SIZE: u16 = 9;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBQueryDirectoryRequest {
    pub information_class: SMBInformationClass,
    pub flags: SMBQueryDirectoryFlags,
    pub file_index: u32,
    pub file_id: SMBFileId,
    pub max_output_len: u32,
    pub search_pattern: String,
}

impl SMBQueryDirectoryRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let information_class_raw = reader.u8();
        let flags = SMBQueryDirectoryFlags::from_bits_truncate(reader.u8());
        let file_index = reader.u32();
        let file_id = SMBFileId::parse(reader)?;
        let pattern_offset = reader.u16();
        let pattern_length = reader.u16();
        let max_output_len = reader.u32();

        let information_class =
            SMBInformationClass::try_from(information_class_raw).map_err(|_| SMBError::wire_decode("bad information class"))?;

        let search_pattern = if pattern_length == 0 {
            String::new()
        } else {
            reader.seek(pattern_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.utf16le(pattern_length as usize / 2)
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { information_class, flags, file_index, file_id, max_output_len, search_pattern })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SMBQueryDirectoryResponse {
    pub entries: Vec<FileIdBothDirectoryInformationEntry>,
}

impl SMBQueryDirectoryResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        let offset_field = writer.len();
        writer.u16(0);
        let length_field = writer.len();
        writer.u32(0);

        let buffer_start = writer.len();
        let mut entry_start = buffer_start;
        for (i, entry) in self.entries.iter().enumerate() {
            let len = entry.write(writer);
            if i + 1 < self.entries.len() {
                let padded = len.div_ceil(8) * 8;
                writer.pad(8);
                writer.write_at(entry_start, &(padded as u32).to_le_bytes());
            }
            entry_start = writer.len();
        }

        let buffer_len = (writer.len() - buffer_start) as u32;
        if buffer_len == 0 {
            writer.write_at(offset_field, &0u16.to_le_bytes());
        } else {
            writer.write_at(offset_field, &(REQUEST_HEADER_LEN + 8).to_le_bytes());
        }
        writer.write_at(length_field, &buffer_len.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(SMBInformationClass::FileIdBothDirectoryInformation as u8);
        w.u8(SMBQueryDirectoryFlags::RESTART_SCANS.bits());
        w.u32(0);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        let pattern = "*";
        w.u16(REQUEST_HEADER_LEN + 32);
        w.u16((pattern.encode_utf16().count() * 2) as u16);
        w.u32(65536);
        w.utf16le(pattern);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBQueryDirectoryRequest::parse(&mut r).unwrap();
        assert_eq!(req.search_pattern, "*");
        assert_eq!(req.information_class, SMBInformationClass::FileIdBothDirectoryInformation);
    }
}
