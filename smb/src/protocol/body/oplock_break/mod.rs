pub mod oplock_level;

pub use oplock_level::SMBOplockLevel;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;

const STRUCTURE_SIZE: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SMBOplockBreakContent {
    pub level: SMBOplockLevel,
    pub file_id: SMBFileId,
}

pub type SMBOplockBreakAcknowledgement = SMBOplockBreakContent;

impl SMBOplockBreakContent {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(STRUCTURE_SIZE);
        let level_raw = reader.u8();
        reader.skip(1); // reserved
        reader.skip(4); // reserved2
        let file_id = SMBFileId::parse(reader)?;

        let level = SMBOplockLevel::try_from(level_raw).map_err(|_| SMBError::wire_decode("bad oplock level"))?;

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { level, file_id })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u16(STRUCTURE_SIZE);
        writer.u8(self.level as u8);
        writer.zeros(1);
        writer.zeros(4);
        self.file_id.write(writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let content = SMBOplockBreakContent {
            level: SMBOplockLevel::II,
            file_id: SMBFileId { persistent: 9, volatile: 4 },
        };
        let mut w = Writer::new();
        content.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let parsed = SMBOplockBreakContent::parse(&mut r).unwrap();
        assert_eq!(parsed, content);
    }
}
