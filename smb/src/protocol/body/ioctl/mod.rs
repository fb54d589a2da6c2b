pub mod ctl_code;
pub mod flags;

pub use flags::SMBIoCtlRequestFlags;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::create::file_id::SMBFileId;

const REQUEST_STRUCTURE_SIZE: u16 = 57;
const RESPONSE_STRUCTURE_SIZE: u16 = 49;
const REQUEST_HEADER_LEN: u16 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBIoCtlRequest {
    pub ctl_code: u32,
    pub file_id: SMBFileId,
    pub max_input_response: u32,
    pub max_output_response: u32,
    pub flags: SMBIoCtlRequestFlags,
    pub input: Vec<u8>,
}

impl SMBIoCtlRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        reader.skip(2); // reserved
        let ctl_code = reader.u32();
        let file_id = SMBFileId::parse(reader)?;
        let input_offset = reader.u32();
        let input_count = reader.u32();
        let max_input_response = reader.u32();
        reader.skip(4); // output offset, unused by requests this server emits
        reader.skip(4); // output count
        let max_output_response = reader.u32();
        let flags_raw = reader.u32();
        reader.skip(4); // reserved

        let flags = SMBIoCtlRequestFlags::try_from(flags_raw).map_err(|_| SMBError::wire_decode("bad ioctl flags"))?;
        let input = if input_count == 0 {
            Vec::new()
        } else {
            reader.seek(input_offset as usize - REQUEST_HEADER_LEN as usize);
            reader.bytes(input_count as usize).to_vec()
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { ctl_code, file_id, max_input_response, max_output_response, flags, input })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBIoCtlResponse {
    pub ctl_code: u32,
    pub file_id: SMBFileId,
    pub flags: SMBIoCtlRequestFlags,
    pub output: Vec<u8>,
}

impl SMBIoCtlResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.zeros(2);
        writer.u32(self.ctl_code);
        self.file_id.write(writer);
        writer.u32(0); // input offset, unused in responses
        writer.u32(0); // input count
        let output_offset_field = writer.len();
        writer.u32(0);
        writer.u32(self.output.len() as u32);
        writer.u32(self.flags as u32);
        writer.zeros(4);
        let output_offset = writer.len() as u32;
        writer.write_at(output_offset_field, &output_offset.to_le_bytes());
        writer.bytes(&self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_with_input_buffer() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.zeros(2);
        w.u32(ctl_code::FSCTL_PIPE_TRANSCEIVE);
        SMBFileId { persistent: 1, volatile: 2 }.write(&mut w);
        w.u32(REQUEST_HEADER_LEN as u32 + REQUEST_STRUCTURE_SIZE as u32);
        w.u32(3);
        w.u32(4096);
        w.u32(0);
        w.u32(0);
        w.u32(4096);
        w.u32(SMBIoCtlRequestFlags::Fsctl as u32);
        w.zeros(4);
        w.bytes(&[1, 2, 3]);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBIoCtlRequest::parse(&mut r).unwrap();
        assert_eq!(req.ctl_code, ctl_code::FSCTL_PIPE_TRANSCEIVE);
        assert_eq!(req.input, vec![1, 2, 3]);
        assert_eq!(req.flags, SMBIoCtlRequestFlags::Fsctl);
    }
}
