use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use super::flags::SMBLockFlags;

/// A single range lock/unlock request within a LOCK command's lock array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SMBLockInfo {
    pub offset: u64,
    pub length: u64,
    pub flags: SMBLockFlags,
}

impl SMBLockInfo {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let offset = reader.u64();
        let length = reader.u64();
        let flags = SMBLockFlags::from_bits_truncate(reader.u32());
        reader.skip(4); // reserved

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { offset, length, flags })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u64(self.offset);
        writer.u64(self.length);
        writer.u32(self.flags.bits());
        writer.zeros(4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let info = SMBLockInfo { offset: 0x1000, length: 0x200, flags: SMBLockFlags::EXCLUSIVE_LOCK };
        let mut w = Writer::new();
        info.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let parsed = SMBLockInfo::parse(&mut r).unwrap();
        assert_eq!(parsed, info);
    }
}
