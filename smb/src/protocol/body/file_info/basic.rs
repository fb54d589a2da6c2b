use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::body::create::file_attributes::SMBFileAttributes;
use crate::protocol::body::filetime::FileTime;

/// FILE_BASIC_INFORMATION (MS-FSCC 2.4.7) — 40 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBasicInformation {
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub file_attributes: SMBFileAttributes,
}

impl FileBasicInformation {
    pub const WIRE_SIZE: usize = 40;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let creation_time = FileTime::parse(reader)?;
        let last_access_time = FileTime::parse(reader)?;
        let last_write_time = FileTime::parse(reader)?;
        let change_time = FileTime::parse(reader)?;
        let file_attributes = SMBFileAttributes::from_bits_truncate(reader.u32());
        reader.skip(4); // reserved
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { creation_time, last_access_time, last_write_time, change_time, file_attributes })
    }

    pub fn write(&self, writer: &mut Writer) {
        self.creation_time.write(writer);
        self.last_access_time.write(writer);
        self.last_write_time.write(writer);
        self.change_time.write(writer);
        writer.u32(self.file_attributes.bits());
        writer.zeros(4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_fixed_size() {
        let info = FileBasicInformation {
            creation_time: FileTime::zero(),
            last_access_time: FileTime::zero(),
            last_write_time: FileTime::zero(),
            change_time: FileTime::zero(),
            file_attributes: SMBFileAttributes::ARCHIVE | SMBFileAttributes::READONLY,
        };
        let mut w = Writer::new();
        info.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), FileBasicInformation::WIRE_SIZE);
        let mut r = Reader::new(&bytes);
        assert_eq!(FileBasicInformation::parse(&mut r).unwrap(), info);
    }
}
