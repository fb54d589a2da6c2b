pub mod flags;
pub mod info;

pub use flags::SMBLockFlags;
pub use info::SMBLockInfo;

use smb_core::codec::Reader;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::empty::SMBEmpty;

const REQUEST_STRUCTURE_SIZE: u16 = 48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBLockRequest {
    pub lock_sequence_number: u8,
    pub lock_sequence_index: u32,
    pub file_id: SMBFileId,
    pub locks: Vec<SMBLockInfo>,
}

pub type SMBLockResponse = SMBEmpty;

impl SMBLockRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let lock_count = reader.u16();
        let lock_seqno_idx = reader.u32();
        let lock_sequence_number = (lock_seqno_idx & 0xF) as u8;
        let lock_sequence_index = lock_seqno_idx >> 4;
        let file_id = SMBFileId::parse(reader)?;

        let mut locks = Vec::with_capacity(lock_count as usize);
        for _ in 0..lock_count {
            locks.push(SMBLockInfo::parse(reader)?);
        }

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { lock_sequence_number, lock_sequence_index, file_id, locks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smb_core::codec::Writer;

    #[test]
    fn request_round_trips_with_locks() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u16(2);
        w.u32((7 << 4) | 3);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        SMBLockInfo { offset: 0, length: 16, flags: SMBLockFlags::SHARED_LOCK }.write(&mut w);
        SMBLockInfo { offset: 16, length: 16, flags: SMBLockFlags::UNLOCK }.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBLockRequest::parse(&mut r).unwrap();
        assert_eq!(req.lock_sequence_number, 3);
        assert_eq!(req.lock_sequence_index, 7);
        assert_eq!(req.locks.len(), 2);
    }
}
