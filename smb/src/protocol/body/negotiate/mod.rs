pub mod context;
pub mod security_mode;

pub use context::NegotiateContext;
pub use security_mode::NegotiateSecurityMode;

use uuid::Uuid;

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::body::capabilities::Capabilities;
use crate::protocol::body::dialect::SMBDialect;
use crate::protocol::body::filetime::FileTime;

const REQUEST_STRUCTURE_SIZE: u16 = 36;
const RESPONSE_STRUCTURE_SIZE: u16 = 65;

#[derive(Debug, Clone, PartialEq)]
pub struct SMBNegotiateRequest {
    pub security_mode: NegotiateSecurityMode,
    pub capabilities: Capabilities,
    pub client_guid: Uuid,
    pub dialects: Vec<SMBDialect>,
    pub negotiate_contexts: Vec<NegotiateContext>,
}

impl SMBNegotiateRequest {
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        reader.expect_u16(REQUEST_STRUCTURE_SIZE);
        let dialect_count = reader.u16();
        let security_mode = NegotiateSecurityMode::parse(reader)?;
        reader.skip(2); // reserved
        let capabilities = Capabilities::from_bits_truncate(reader.u32());
        let client_guid = Uuid::from_bytes(reader.array16());
        let negotiate_context_offset = reader.u32();
        let negotiate_context_count = reader.u32();
        reader.skip(8); // reserved2

        let dialects: Vec<SMBDialect> = (0..dialect_count)
            .map(|_| SMBDialect::parse(reader))
            .collect::<SMBResult<_>>()?;

        let has_3_1_1 = dialects.iter().any(|d| *d == SMBDialect::V3_1_1);
        let negotiate_contexts = if has_3_1_1 && negotiate_context_count > 0 {
            reader.seek(negotiate_context_offset as usize);
            (0..negotiate_context_count)
                .map(|_| NegotiateContext::parse(reader))
                .collect::<SMBResult<_>>()?
        } else {
            Vec::new()
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }

        Ok(Self { security_mode, capabilities, client_guid, dialects, negotiate_contexts })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SMBNegotiateResponseBody {
    pub security_mode: NegotiateSecurityMode,
    pub dialect: SMBDialect,
    pub server_guid: Uuid,
    pub capabilities: Capabilities,
    pub max_transact_size: u32,
    pub max_read_size: u32,
    pub max_write_size: u32,
    pub system_time: FileTime,
    pub server_start_time: FileTime,
    pub buffer: Vec<u8>,
    pub negotiate_contexts: Vec<NegotiateContext>,
}

impl SMBNegotiateResponseBody {
    pub fn write(&self, writer: &mut Writer) {
        writer.u16(RESPONSE_STRUCTURE_SIZE);
        self.security_mode.write(writer);
        self.dialect.write(writer);
        writer.u16(self.negotiate_contexts.len() as u16);
        writer.bytes(self.server_guid.as_bytes());
        writer.u32(self.capabilities.bits());
        writer.u32(self.max_transact_size);
        writer.u32(self.max_read_size);
        writer.u32(self.max_write_size);
        self.system_time.write(writer);
        self.server_start_time.write(writer);

        let offset_field = writer.len();
        writer.u16(0); // buffer offset, patched below
        writer.u16(self.buffer.len() as u16);
        let context_offset_field = writer.len();
        writer.u32(0); // negotiate context offset, patched below

        let buffer_offset = writer.len() as u16;
        writer.write_at(offset_field, &buffer_offset.to_le_bytes());
        writer.bytes(&self.buffer);
        writer.pad(8);

        let context_offset = writer.len() as u32;
        if !self.negotiate_contexts.is_empty() {
            writer.write_at(context_offset_field, &context_offset.to_le_bytes());
        }
        for ctx in &self.negotiate_contexts {
            ctx.write(writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::{HASH_ALGO_SHA512, SIGNING_ALGO_AES_CMAC};

    #[test]
    fn request_round_trips_with_negotiate_contexts() {
        let mut w = Writer::new();
        w.u16(REQUEST_STRUCTURE_SIZE);
        w.u16(2); // dialect count
        NegotiateSecurityMode::NEGOTIATE_SIGNING_ENABLED.write(&mut w);
        w.u16(0); // reserved
        w.u32(Capabilities::GLOBAL_CAP_LARGE_MTU.bits());
        w.bytes(Uuid::nil().as_bytes());
        let ctx_offset_field = w.len();
        w.u32(0);
        w.u32(1); // negotiate context count
        w.zeros(8);
        SMBDialect::V3_0_2.write(&mut w);
        SMBDialect::V3_1_1.write(&mut w);
        w.pad(8);
        let ctx_offset = w.len() as u32;
        w.write_at(ctx_offset_field, &ctx_offset.to_le_bytes());
        NegotiateContext::PreAuthIntegrityCapabilities { hash_algorithms: vec![HASH_ALGO_SHA512], salt: vec![1; 32] }
            .write(&mut w);

        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let req = SMBNegotiateRequest::parse(&mut r).unwrap();
        assert_eq!(req.dialects, vec![SMBDialect::V3_0_2, SMBDialect::V3_1_1]);
        assert_eq!(req.negotiate_contexts.len(), 1);
    }

    #[test]
    fn response_round_trips() {
        let resp = SMBNegotiateResponseBody {
            security_mode: NegotiateSecurityMode::NEGOTIATE_SIGNING_ENABLED,
            dialect: SMBDialect::V3_1_1,
            server_guid: Uuid::nil(),
            capabilities: Capabilities::GLOBAL_CAP_ENCRYPTION,
            max_transact_size: 8_388_608,
            max_read_size: 8_388_608,
            max_write_size: 8_388_608,
            system_time: FileTime::from_unix_secs(1_700_000_000),
            server_start_time: FileTime::zero(),
            buffer: Vec::new(),
            negotiate_contexts: vec![NegotiateContext::SigningCapabilities { algorithms: vec![SIGNING_ALGO_AES_CMAC] }],
        };
        let mut w = Writer::new();
        resp.write(&mut w);
        assert!(w.len() > 0);
    }
}
