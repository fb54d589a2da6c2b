use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;
use crate::protocol::body::query_info::{SMBInfoType, SMBSecurityInformation};

const REQUEST_STRUCTURE_SIZE: u16 = 33;
const RESPONSE_STRUCTURE_SIZE: u16 = 2;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBSetInfoRequest {
    pub info_type: SMBInfoType,
    pub file_info_class: u8,
    pub additional_information: SMBSecurityInformation,
    pub file_id: SMBFileId,
    pub buffer: Vec<u8>,
}

impl SMBSetInfoRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let info_type_raw = reader.u8();
        let file_info_class = reader.u8();
        let buffer_length = reader.u32();
        let buffer_offset = reader.u16();
        reader.skip(2); // reserved
        let additional_information = SMBSecurityInformation::from_bits_truncate(reader.u32());
        let file_id = SMBFileId::parse(reader)?;

        let info_type = SMBInfoType::try_from(info_type_raw).map_err(|_| SMBError::wire_decode("bad info type"))?;
        let buffer = if buffer_length == 0 {
            Vec::new()
        } else {
            reader.seek(buffer_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.bytes(buffer_length as usize).to_vec()
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { info_type, file_info_class, additional_information, file_id, buffer })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBSetInfoResponse;

impl SMBSetInfoResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_with_buffer() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(SMBInfoType::File as u8);
        w.u8(4);
        w.u32(4);
        w.u16(REQUEST_HEADER_LEN);
        w.zeros(2);
        w.u32(0);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        w.bytes(&[0xAA, 0xBB, 0xCC, 0xDD]);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBSetInfoRequest::parse(&mut r).unwrap();
        assert_eq!(req.info_type, SMBInfoType::File);
        assert_eq!(req.buffer, vec![0xAA, 0xBB, 0xCC, 0xDD]);
    }
}
