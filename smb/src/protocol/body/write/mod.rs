pub mod flags;

pub use flags::SMBWriteFlags;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::read::channel::SMBRWChannel;

const REQUEST_STRUCTURE_SIZE: u16 = 49;
const RESPONSE_STRUCTURE_SIZE: u16 = 17;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBWriteRequest {
    pub offset: u64,
    pub file_id: SMBFileId,
    pub channel: SMBRWChannel,
    pub remaining_bytes: u32,
    pub flags: SMBWriteFlags,
    pub channel_information: Vec<u8>,
    pub data: Vec<u8>,
}

impl SMBWriteRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let data_offset = reader.u16();
        let data_length = reader.u32();
        let offset = reader.u64();
        let file_id = SMBFileId::parse(reader)?;
        let channel_raw = reader.u32();
        let remaining_bytes = reader.u32();
        let channel_info_offset = reader.u16();
        let channel_info_length = reader.u16();
        let flags = SMBWriteFlags::from_bits_truncate(reader.u32() as u8);

        let channel = SMBRWChannel::try_from(channel_raw).map_err(|_| SMBError::wire_decode("bad write channel"))?;
        let channel_information = if channel_info_length == 0 {
            Vec::new()
        } else {
            reader.seek(channel_info_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.bytes(channel_info_length as usize).to_vec()
        };

        reader.seek(data_offset as usize - REQUEST_HEADER_LEN as usize);
        let data = reader.bytes(data_length as usize).to_vec();

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { offset, file_id, channel, remaining_bytes, flags, channel_information, data })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBWriteResponse {
    pub count: u32,
    pub remaining: u32,
}

impl SMBWriteResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u16(0); // reserved
        writer.u32(self.count);
        writer.u32(self.remaining);
        writer.u16(0); // write channel info offset
        writer.u16(0); // write channel info length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u16(REQUEST_HEADER_LEN + 48);
        w.u32(5);
        w.u64(0);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        w.u32(SMBRWChannel::None as u32);
        w.u32(0);
        w.u16(REQUEST_HEADER_LEN);
        w.u16(0);
        w.u32(SMBWriteFlags::WRITE_THROUGH.bits() as u32);
        w.bytes(b"hello");
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let req = SMBWriteRequest::parse(&mut r).unwrap();
        assert_eq!(req.data, b"hello");
        assert_eq!(req.flags, SMBWriteFlags::WRITE_THROUGH);
    }
}
