use smb_core::codec::Reader;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::empty::SMBEmpty;

const REQUEST_STRUCTURE_SIZE: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SMBFlushRequest {
    pub file_id: SMBFileId,
}

pub type SMBFlushResponse = SMBEmpty;

impl SMBFlushRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        reader.skip(2); // reserved
        reader.skip(4); // reserved2
        let file_id = SMBFileId::parse(reader)?;

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { file_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smb_core::codec::Writer;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.zeros(2);
        w.zeros(4);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBFlushRequest::parse(&mut r).unwrap();
        assert_eq!(req.file_id, SMBFileId { persistent: 1, volatile: 2 });
    }
}
