//! SMB2 message framing: the 4-byte NetBIOS session header, compound-message
//! chaining via `next_command`, and per-message signing.
//!
//! A message on the wire is `[NetBIOS header][SMB2 header][body]`, optionally
//! repeated back-to-back (a *compound* request/response) with each header's
//! `next_command` giving the 8-byte-aligned byte offset of the next one
//! relative to its own start; the last message in the chain sets it to 0.

use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::crypto::signer::Signer;
use crate::protocol::body::{SMBRequestBody, SMBResponseBody};
use crate::protocol::header::{SMBSyncHeader, SIGNATURE_OFFSET};

#[derive(Debug, Clone, PartialEq)]
pub struct SMBMessage<B> {
    pub header: SMBSyncHeader,
    pub body: B,
}

pub type SMBRequestMessage = SMBMessage<SMBRequestBody>;
pub type SMBResponseMessage = SMBMessage<SMBResponseBody>;

impl<B> SMBMessage<B> {
    pub fn new(header: SMBSyncHeader, body: B) -> Self {
        Self { header, body }
    }
}

impl SMBRequestMessage {
    /// Parses every message in a compound chain out of `bytes` (the raw
    /// SMB2 payload, NetBIOS header already stripped).
    pub fn parse_compound(bytes: &[u8]) -> SMBResult<Vec<Self>> {
        let mut messages = Vec::new();
        let mut offset = 0usize;
        loop {
            if offset >= bytes.len() {
                break;
            }
            let mut reader = Reader::new(&bytes[offset..]);
            let header = SMBSyncHeader::parse(&mut reader)?;
            let body = SMBRequestBody::parse(header.command, &mut reader)?;
            let next_command = header.next_command as usize;
            messages.push(Self { header, body });
            if next_command == 0 {
                break;
            }
            offset += next_command;
        }
        Ok(messages)
    }
}

impl SMBResponseMessage {
    fn render_unsigned(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.header.write(&mut writer);
        self.body.write(&mut writer);
        writer.into_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render_unsigned()
    }

    /// Writes a compound response chain, aligning and chaining each
    /// message's `next_command` and signing every message whose header
    /// requests a signature, then wraps the whole thing in a NetBIOS
    /// session message frame.
    pub fn write_compound(messages: &[SMBResponseMessage], signer: Option<&Signer>) -> SMBResult<Vec<u8>> {
        let mut rendered = Vec::with_capacity(messages.len());
        for message in messages {
            let mut bytes = message.render_unsigned();
            if message.header.flags.is_signed() {
                let signer = signer.ok_or_else(|| SMBError::crypto_error("signed response with no session key"))?;
                signer.sign_in_place(&mut bytes, message.header.message_id)?;
            }
            rendered.push(bytes);
        }

        let mut out = Vec::new();
        for (idx, bytes) in rendered.iter_mut().enumerate() {
            let padded_len = bytes.len().div_ceil(8) * 8;
            bytes.resize(padded_len, 0);
            if idx + 1 < rendered.len() {
                bytes[20..24].copy_from_slice(&(padded_len as u32).to_le_bytes());
            }
        }
        for bytes in rendered {
            out.extend_from_slice(&bytes);
        }

        Ok(frame(&out))
    }
}

/// Wraps a fully rendered SMB2 payload in its 4-byte NetBIOS session
/// message header: a zero type byte followed by a 3-byte big-endian length.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut framed = Vec::with_capacity(4 + payload.len());
    framed.push(0);
    framed.extend_from_slice(&len.to_be_bytes()[1..]);
    framed.extend_from_slice(payload);
    framed
}

/// Strips and validates a NetBIOS session message frame, returning the
/// payload and the number of bytes consumed. `None` means the buffer
/// doesn't yet hold a complete frame.
pub fn unframe(buf: &[u8]) -> SMBResult<Option<(&[u8], usize)>> {
    if buf.len() < 4 {
        return Ok(None);
    }
    if buf[0] != 0 {
        return Err(SMBError::wire_decode("unsupported NetBIOS session packet type"));
    }
    let len = u32::from_be_bytes([0, buf[1], buf[2], buf[3]]) as usize;
    let total = 4 + len;
    if buf.len() < total {
        return Ok(None);
    }
    Ok(Some((&buf[4..total], total)))
}

/// Verifies the signature on a raw request frame (header+body, no NetBIOS
/// wrapper) against `signer`, without needing it parsed first.
pub fn verify_signature(message_bytes: &[u8], message_id: u64, signer: &Signer) -> SMBResult<bool> {
    if message_bytes.len() < SIGNATURE_OFFSET + 16 {
        return Err(SMBError::wire_decode("message shorter than header + signature"));
    }
    signer.verify(message_bytes, message_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::body::echo::{SMBEchoRequest, SMBEchoResponse};
    use crate::protocol::header::{command_code::SMBCommandCode, flags::SMBFlags, SMBHeaderContext};

    fn echo_header(message_id: u64) -> SMBSyncHeader {
        SMBSyncHeader {
            credit_charge: 1,
            status: 0u32.into(),
            command: SMBCommandCode::Echo,
            credit_request_response: 1,
            flags: SMBFlags::SERVER_TO_REDIR,
            next_command: 0,
            message_id,
            context: SMBHeaderContext::Sync { tree_id: 0 },
            session_id: 0,
            signature: [0; 16],
        }
    }

    #[test]
    fn frame_round_trips() {
        let payload = vec![1, 2, 3, 4, 5];
        let framed = frame(&payload);
        let (unframed, consumed) = unframe(&framed).unwrap().unwrap();
        assert_eq!(unframed, payload.as_slice());
        assert_eq!(consumed, framed.len());
    }

    #[test]
    fn unframe_reports_incomplete_buffer() {
        let payload = vec![1, 2, 3, 4, 5];
        let framed = frame(&payload);
        assert!(unframe(&framed[..6]).unwrap().is_none());
    }

    #[test]
    fn compound_write_chains_and_aligns_next_command() {
        let msg1 = SMBResponseMessage::new(echo_header(1), SMBResponseBody::Echo(SMBEchoResponse));
        let msg2 = SMBResponseMessage::new(echo_header(2), SMBResponseBody::Echo(SMBEchoResponse));
        let bytes = SMBResponseMessage::write_compound(&[msg1, msg2], None).unwrap();
        let (payload, _) = unframe(&bytes).unwrap().unwrap();

        let next_command = u32::from_le_bytes(payload[20..24].try_into().unwrap());
        assert_ne!(next_command, 0);
        assert_eq!(next_command % 8, 0);

        let second_header = &payload[next_command as usize..];
        let second_next = u32::from_le_bytes(second_header[20..24].try_into().unwrap());
        assert_eq!(second_next, 0);
    }

    #[test]
    fn request_compound_parses_two_messages() {
        let render_echo_request = |header: &SMBSyncHeader| {
            let mut w = Writer::new();
            header.write(&mut w);
            w.u16(4);
            w.zeros(2);
            w.into_bytes()
        };

        let mut first_header = echo_header(1);
        first_header.flags = SMBFlags::empty();
        let mut first = render_echo_request(&first_header);
        first.resize(first.len().div_ceil(8) * 8, 0);
        first[20..24].copy_from_slice(&(first.len() as u32).to_le_bytes());

        let mut second_header = echo_header(2);
        second_header.flags = SMBFlags::empty();
        let second = render_echo_request(&second_header);

        let mut bytes = first;
        bytes.extend_from_slice(&second);

        let messages = SMBRequestMessage::parse_compound(&bytes).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].header.message_id, 1);
        assert_eq!(messages[1].header.message_id, 2);
        assert_eq!(messages[0].body, SMBRequestBody::Echo(SMBEchoRequest));
    }
}
