pub mod channel;
pub mod flags;

pub use channel::SMBRWChannel;
pub use flags::{SMBReadRequestFlags, SMBReadResponseFlags};

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;

const REQUEST_STRUCTURE_SIZE: u16 = 49;
const RESPONSE_STRUCTURE_SIZE: u16 = 17;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBReadRequest {
    pub flags: SMBReadRequestFlags,
    pub length: u32,
    pub offset: u64,
    pub file_id: SMBFileId,
    pub minimum_count: u32,
    pub channel: SMBRWChannel,
    pub remaining_bytes: u32,
    pub channel_information: Vec<u8>,
}

impl SMBReadRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        reader.skip(1); // padding
        let flags = SMBReadRequestFlags::from_bits_truncate(reader.u8());
        let length = reader.u32();
        let offset = reader.u64();
        let file_id = SMBFileId::parse(reader)?;
        let minimum_count = reader.u32();
        let channel_raw = reader.u32();
        let remaining_bytes = reader.u32();
        let channel_info_offset = reader.u16();
        let channel_info_length = reader.u16();

        let channel = SMBRWChannel::try_from(channel_raw).map_err(|_| SMBError::wire_decode("bad read channel"))?;
        let channel_information = if channel_info_length == 0 {
            Vec::new()
        } else {
            reader.seek(channel_info_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.bytes(channel_info_length as usize).to_vec()
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { flags, length, offset, file_id, minimum_count, channel, remaining_bytes, channel_information })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBReadResponse {
    pub data_remaining: u32,
    pub data: Vec<u8>,
}

impl SMBReadResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        let data_offset = REQUEST_HEADER_LEN + 16;
        writer.u8(data_offset as u8);
        writer.u8(0); // reserved
        writer.u32(self.data.len() as u32);
        writer.u32(self.data_remaining);
        writer.u32(0); // reserved2
        writer.bytes(&self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(0);
        w.u8(SMBReadRequestFlags::UNBUFFERED.bits());
        w.u32(4096);
        w.u64(0);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        w.u32(1);
        w.u32(SMBRWChannel::None as u32);
        w.u32(0);
        w.u16(REQUEST_HEADER_LEN);
        w.u16(0);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let req = SMBReadRequest::parse(&mut r).unwrap();
        assert_eq!(req.length, 4096);
        assert_eq!(req.flags, SMBReadRequestFlags::UNBUFFERED);
    }

    #[test]
    fn response_carries_payload() {
        let resp = SMBReadResponse { data_remaining: 0, data: b"hello".to_vec() };
        let mut w = Writer::new();
        resp.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[bytes.len() - 5..], b"hello");
    }
}
