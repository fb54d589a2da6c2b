pub mod flags;

pub use flags::SMBCloseFlags;

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::body::create::file_attributes::SMBFileAttributes;
use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::filetime::FileTime;

const REQUEST_STRUCTURE_SIZE: u16 = 24;
const RESPONSE_STRUCTURE_SIZE: u16 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBCloseRequest {
    pub flags: SMBCloseFlags,
    pub file_id: SMBFileId,
}

impl SMBCloseRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let flags = SMBCloseFlags::from_bits_truncate(reader.u16());
        reader.skip(4); // reserved
        let file_id = SMBFileId::parse(reader)?;
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { flags, file_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBCloseResponse {
    pub flags: SMBCloseFlags,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub file_attributes: SMBFileAttributes,
}

impl SMBCloseResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u16(self.flags.bits());
        writer.zeros(4);
        self.creation_time.write(writer);
        self.last_access_time.write(writer);
        self.last_write_time.write(writer);
        self.change_time.write(writer);
        writer.u64(self.allocation_size);
        writer.u64(self.end_of_file);
        writer.u32(self.file_attributes.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u16(SMBCloseFlags::POSTQUERY_ATTRIB.bits());
        w.zeros(4);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let req = SMBCloseRequest::parse(&mut r).unwrap();
        assert_eq!(req.flags, SMBCloseFlags::POSTQUERY_ATTRIB);
        assert_eq!(req.file_id, SMBFileId { persistent: 1, volatile: 2 });
    }
}
