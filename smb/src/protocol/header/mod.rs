//! The 64-byte SMB2 header and its constituent small types.
//!
//! See MS-SMB2 §2.2.1 for the wire layout; offsets are reproduced on
//! [`SMBSyncHeader`].

pub mod command_code;
pub mod flags;
pub mod status;

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::nt_status::NTStatus;
use smb_core::SMBResult;

pub use command_code::SMBCommandCode;
pub use flags::SMBFlags;
pub use status::SMBStatus;

pub const SMB2_PROTOCOL_ID: [u8; 4] = [0xFE, b'S', b'M', b'B'];
pub const SMB1_PROTOCOL_ID: [u8; 4] = [0xFF, b'S', b'M', b'B'];
pub const HEADER_STRUCTURE_SIZE: u16 = 64;
pub const HEADER_LEN: usize = 64;
pub const SIGNATURE_OFFSET: usize = 48;

/// The second 8-byte word at offset 32 is a union: `reserved || tree_id`
/// when synchronous, `async_id` when [`SMBFlags::ASYNC_COMMAND`] is set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SMBHeaderContext {
    Sync { tree_id: u32 },
    Async { async_id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMBSyncHeader {
    pub credit_charge: u16,
    pub status: SMBStatus,
    pub command: SMBCommandCode,
    pub credit_request_response: u16,
    pub flags: SMBFlags,
    pub next_command: u32,
    pub message_id: u64,
    pub context: SMBHeaderContext,
    pub session_id: u64,
    pub signature: [u8; 16],
}

impl SMBSyncHeader {
    pub fn tree_id(&self) -> u32 {
        match self.context {
            SMBHeaderContext::Sync { tree_id } => tree_id,
            SMBHeaderContext::Async { .. } => 0,
        }
    }

    pub fn async_id(&self) -> Option<u64> {
        match self.context {
            SMBHeaderContext::Async { async_id } => Some(async_id),
            SMBHeaderContext::Sync { .. } => None,
        }
    }

    pub fn is_response(&self) -> bool {
        self.flags.is_response()
    }

    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_bytes(&SMB2_PROTOCOL_ID);
        reader.expect_u16(HEADER_STRUCTURE_SIZE);
        let credit_charge = reader.u16();
        let status = SMBStatus::from(reader.u32());
        let command_raw = reader.u16();
        let credit_request_response = reader.u16();
        let flags = SMBFlags::from_bits_truncate(reader.u32());
        let next_command = reader.u32();
        let message_id = reader.u64();
        let context = if flags.is_async() {
            SMBHeaderContext::Async { async_id: reader.u64() }
        } else {
            let _reserved = reader.u32();
            let tree_id = reader.u32();
            SMBHeaderContext::Sync { tree_id }
        };
        let session_id = reader.u64();
        let signature = reader.array16();

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        let command = SMBCommandCode::try_from(command_raw)
            .map_err(|_| SMBError::wire_decode(format!("unknown command code {:#06x}", command_raw)))?;

        Ok(Self {
            credit_charge,
            status,
            command,
            credit_request_response,
            flags,
            next_command,
            message_id,
            context,
            session_id,
            signature,
        })
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.bytes(&SMB2_PROTOCOL_ID);
        writer.u16(HEADER_STRUCTURE_SIZE);
        writer.u16(self.credit_charge);
        writer.u32(self.status.raw());
        writer.u16(self.command.into());
        writer.u16(self.credit_request_response);
        writer.u32(self.flags.bits());
        writer.u32(self.next_command);
        writer.u64(self.message_id);
        match self.context {
            SMBHeaderContext::Async { async_id } => writer.u64(async_id),
            SMBHeaderContext::Sync { tree_id } => {
                writer.u32(0);
                writer.u32(tree_id);
            }
        }
        writer.u64(self.session_id);
        writer.bytes(&self.signature);
    }

    /// Builds the response header that mirrors this request: same
    /// `message_id`, `RESPONSE` flag set, caller-supplied status/credits.
    pub fn create_response_header(&self, status: NTStatus, credits_granted: u16) -> Self {
        Self {
            credit_charge: self.credit_charge,
            status: status.into(),
            command: self.command,
            credit_request_response: credits_granted,
            flags: self.flags | SMBFlags::SERVER_TO_REDIR,
            next_command: 0,
            message_id: self.message_id,
            context: self.context,
            session_id: self.session_id,
            signature: [0; 16],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sync_header() -> SMBSyncHeader {
        SMBSyncHeader {
            credit_charge: 1,
            status: SMBStatus::from(NTStatus::StatusSuccess),
            command: SMBCommandCode::Negotiate,
            credit_request_response: 1,
            flags: SMBFlags::empty(),
            next_command: 0,
            message_id: 7,
            context: SMBHeaderContext::Sync { tree_id: 3 },
            session_id: 42,
            signature: [0; 16],
        }
    }

    #[test]
    fn header_round_trips() {
        let header = sample_sync_header();
        let mut w = Writer::new();
        header.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        let mut r = Reader::new(&bytes);
        let parsed = SMBSyncHeader::parse(&mut r).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn async_context_uses_single_8_byte_field() {
        let mut header = sample_sync_header();
        header.flags |= SMBFlags::ASYNC_COMMAND;
        header.context = SMBHeaderContext::Async { async_id: 0xAABB_CCDD };
        let mut w = Writer::new();
        header.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let parsed = SMBSyncHeader::parse(&mut r).unwrap();
        assert_eq!(parsed.async_id(), Some(0xAABB_CCDD));
    }

    #[test]
    fn rejects_bad_protocol_id() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&[0xFF, b'S', b'M', b'B']);
        let mut r = Reader::new(&bytes);
        assert!(SMBSyncHeader::parse(&mut r).is_err());
    }
}
