use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

const STRUCTURE_SIZE: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBEchoRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SMBEchoResponse;

impl SMBEchoRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(STRUCTURE_SIZE);
        reader.skip(2); // reserved

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self)
    }
}

impl SMBEchoResponse {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(STRUCTURE_SIZE);
        writer.zeros(2);
    }
}
