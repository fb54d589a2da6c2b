use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::body::create::file_attributes::SMBFileAttributes;
use crate::protocol::body::filetime::FileTime;

/// FILE_NETWORK_OPEN_INFORMATION (MS-FSCC 2.4.29) — 56 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNetworkOpenInformation {
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub change_time: FileTime,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub file_attributes: SMBFileAttributes,
}

impl FileNetworkOpenInformation {
    pub const WIRE_SIZE: usize = 56;

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let creation_time = FileTime::parse(reader)?;
        let last_access_time = FileTime::parse(reader)?;
        let last_write_time = FileTime::parse(reader)?;
        let change_time = FileTime::parse(reader)?;
        let allocation_size = reader.u64();
        let end_of_file = reader.u64();
        let file_attributes = SMBFileAttributes::from_bits_truncate(reader.u32());
        reader.skip(4); // reserved
        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        Ok(Self { creation_time, last_access_time, last_write_time, change_time, allocation_size, end_of_file, file_attributes })
    }

    pub fn write(&self, writer: &mut Writer) {
        self.creation_time.write(writer);
        self.last_access_time.write(writer);
        self.last_write_time.write(writer);
        self.change_time.write(writer);
        writer.u64(self.allocation_size);
        writer.u64(self.end_of_file);
        writer.u32(self.file_attributes.bits());
        writer.zeros(4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_at_fixed_size() {
        let info = FileNetworkOpenInformation {
            creation_time: FileTime::now(),
            last_access_time: FileTime::now(),
            last_write_time: FileTime::now(),
            change_time: FileTime::now(),
            allocation_size: 4096,
            end_of_file: 1024,
            file_attributes: SMBFileAttributes::ARCHIVE,
        };
        let mut w = Writer::new();
        info.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), FileNetworkOpenInformation::WIRE_SIZE);
        let mut r = Reader::new(&bytes);
        assert_eq!(FileNetworkOpenInformation::parse(&mut r).unwrap(), info);
    }
}
