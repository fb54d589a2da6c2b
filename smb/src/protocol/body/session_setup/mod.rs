pub mod security_mode;

pub use security_mode::SessionSetupSecurityMode;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::body::capabilities::Capabilities;

const REQUEST_STRUCTURE_SIZE: u16 = 25;
const RESPONSE_STRUCTURE_SIZE: u16 = 9;
const RESPONSE_HEADER_LEN: u16 = 64;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SessionSetupFlags: u8 {
        const SMB2_SESSION_FLAG_BINDING = 0x01;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub struct SessionFlags: u16 {
        const IS_GUEST     = 0x01;
        const IS_NULL      = 0x02;
        const ENCRYPT_DATA = 0x04;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBSessionSetupRequest {
    pub flags: SessionSetupFlags,
    pub security_mode: SessionSetupSecurityMode,
    pub capabilities: Capabilities,
    pub previous_session_id: u64,
    pub buffer: Vec<u8>,
}

impl SMBSessionSetupRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let flags = SessionSetupFlags::from_bits_truncate(reader.u8());
        let security_mode = SessionSetupSecurityMode::from_bits_truncate(reader.u8());
        let capabilities = Capabilities::from_bits_truncate(reader.u32());
        reader.skip(4); // channel, reserved
        let buffer_offset = reader.u16();
        let buffer_length = reader.u16();
        let previous_session_id = reader.u64();

        if buffer_offset < RESPONSE_HEADER_LEN {
            return Err(smb_core::error::SMBError::wire_decode("security buffer offset precedes message body"));
        }
        reader.seek(buffer_offset as usize - RESPONSE_HEADER_LEN as usize);
        let buffer = reader.bytes(buffer_length as usize).to_vec();

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { flags, security_mode, capabilities, previous_session_id, buffer })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBSessionSetupResponse {
    pub session_flags: SessionFlags,
    pub buffer: Vec<u8>,
}

impl SMBSessionSetupResponse {
    pub fn new(session_flags: SessionFlags, buffer: Vec<u8>) -> Self {
        Self { session_flags, buffer }
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        writer.u16(self.session_flags.bits());
        writer.u16(RESPONSE_HEADER_LEN + 8);
        writer.u16(self.buffer.len() as u16);
        writer.bytes(&self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u8(0); // flags
        w.u8(SessionSetupSecurityMode::NEGOTIATE_SIGNING_ENABLED.bits());
        w.u32(Capabilities::empty().bits());
        w.zeros(4);
        w.u16(RESPONSE_HEADER_LEN + 8);
        w.u16(4);
        w.u64(0);
        w.bytes(b"abcd");
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let req = SMBSessionSetupRequest::parse(&mut r).unwrap();
        assert_eq!(req.buffer, b"abcd");
        assert_eq!(req.security_mode, SessionSetupSecurityMode::NEGOTIATE_SIGNING_ENABLED);
    }

    #[test]
    fn response_writes_expected_buffer_offset() {
        let resp = SMBSessionSetupResponse::new(SessionFlags::empty(), b"tok".to_vec());
        let mut w = Writer::new();
        resp.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(u16::from_le_bytes(bytes[4..6].try_into().unwrap()), RESPONSE_HEADER_LEN + 8);
        assert_eq!(&bytes[8..], b"tok");
    }
}
