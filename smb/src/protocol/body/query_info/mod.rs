pub mod flags;
pub mod info_type;
pub mod security_information;

pub use flags::SMBQueryInfoFlags;
pub use info_type::SMBInfoType;
pub use security_information::SMBSecurityInformation;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;

const REQUEST_STRUCTURE_SIZE: u16 = 41;
const RESPONSE_STRUCTURE_SIZE: u16 = 9;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBQueryInfoRequest {
    pub info_type: SMBInfoType,
    pub file_info_class: u8,
    pub output_buffer_length: u32,
    pub additional_information: SMBSecurityInformation,
    pub flags: SMBQueryInfoFlags,
    pub file_id: SMBFileId,
    pub buffer: Vec<u8>,
}

impl SMBQueryInfoRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let info_type_raw = reader.u8();
        let file_info_class = reader.u8();
        let output_buffer_length = reader.u32();
        let buffer_offset = reader.u16();
        reader.skip(2); // reserved
        let buffer_length = reader.u32();
        let additional_information = SMBSecurityInformation::from_bits_truncate(reader.u32());
        let flags = SMBQueryInfoFlags::from_bits_truncate(reader.u32());
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

        Ok(Self { info_type, file_info_class, output_buffer_length, additional_information, flags, file_id, buffer })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBQueryInfoResponse {
    pub data: Vec<u8>,
}

impl SMBQueryInfoResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u16(REQUEST_HEADER_LEN + 8);
        writer.u32(self.data.len() as u32);
        writer.bytes(&self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_without_buffer() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(SMBInfoType::File as u8);
        w.u8(4); // FileBasicInformation class
        w.u32(4096);
        w.u16(REQUEST_HEADER_LEN);
        w.zeros(2);
        w.u32(0);
        w.u32(0);
        w.u32(0);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBQueryInfoRequest::parse(&mut r).unwrap();
        assert_eq!(req.info_type, SMBInfoType::File);
        assert_eq!(req.file_info_class, 4);
    }
}
