use smb_core::codec::{Reader, Writer};
use smb_core::error::SMBError;
use smb_core::SMBResult;

const PREAUTH_INTEGRITY_CAPABILITIES: u16 = 0x01;
const ENCRYPTION_CAPABILITIES: u16 = 0x02;
const COMPRESSION_CAPABILITIES: u16 = 0x03;
const NETNAME_NEGOTIATE_CONTEXT_ID: u16 = 0x05;
const TRANSPORT_CAPABILITIES: u16 = 0x06;
const RDMA_TRANSFORM_CAPABILITIES: u16 = 0x07;
const SIGNING_CAPABILITIES: u16 = 0x08;

pub const HASH_ALGO_SHA512: u16 = 0x01;
pub const CIPHER_AES128_GCM: u16 = 0x01;
pub const CIPHER_AES128_CCM: u16 = 0x02;
pub const CIPHER_AES256_GCM: u16 = 0x03;
pub const CIPHER_AES256_CCM: u16 = 0x04;
pub const SIGNING_ALGO_HMAC_SHA256: u16 = 0x00;
pub const SIGNING_ALGO_AES_CMAC: u16 = 0x01;
pub const SIGNING_ALGO_AES_GMAC: u16 = 0x02;
pub const ACCEPT_TRANSPORT_LEVEL_SECURITY: u32 = 0x01;

/// A single SMB2 negotiate context. Contexts this server has no use for
/// (compression, RDMA transform) round-trip as opaque bytes rather than
/// being decoded field-by-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiateContext {
    PreAuthIntegrityCapabilities { hash_algorithms: Vec<u16>, salt: Vec<u8> },
    EncryptionCapabilities { ciphers: Vec<u16> },
    CompressionCapabilities { raw: Vec<u8> },
    NetnameNegotiateContextId { netname: String },
    TransportCapabilities { flags: u32 },
    RDMATransformCapabilities { raw: Vec<u8> },
    SigningCapabilities { algorithms: Vec<u16> },
}

impl NegotiateContext {
    fn context_type(&self) -> u16 {
        match self {
            Self::PreAuthIntegrityCapabilities { .. } => PREAUTH_INTEGRITY_CAPABILITIES,
            Self::EncryptionCapabilities { .. } => ENCRYPTION_CAPABILITIES,
            Self::CompressionCapabilities { .. } => COMPRESSION_CAPABILITIES,
            Self::NetnameNegotiateContextId { .. } => NETNAME_NEGOTIATE_CONTEXT_ID,
            Self::TransportCapabilities { .. } => TRANSPORT_CAPABILITIES,
            Self::RDMATransformCapabilities { .. } => RDMA_TRANSFORM_CAPABILITIES,
            Self::SigningCapabilities { .. } => SIGNING_CAPABILITIES,
        }
    }

    /// Parses one context header + body, then consumes padding up to the
    /// next 8-byte boundary as the wire format requires between entries.
    pub fn parse(reader: &mut Reader) -> SMBResult<Self> {
        let context_type = reader.u16();
        let data_length = reader.u16();
        reader.skip(4); // reserved

        let ctx = match context_type {
            PREAUTH_INTEGRITY_CAPABILITIES => {
                let count = reader.u16();
                let salt_length = reader.u16();
                let hash_algorithms = (0..count).map(|_| reader.u16()).collect();
                let salt = reader.bytes(salt_length as usize).to_vec();
                Self::PreAuthIntegrityCapabilities { hash_algorithms, salt }
            }
            ENCRYPTION_CAPABILITIES => {
                let count = reader.u16();
                let ciphers = (0..count).map(|_| reader.u16()).collect();
                Self::EncryptionCapabilities { ciphers }
            }
            SIGNING_CAPABILITIES => {
                let count = reader.u16();
                let algorithms = (0..count).map(|_| reader.u16()).collect();
                Self::SigningCapabilities { algorithms }
            }
            NETNAME_NEGOTIATE_CONTEXT_ID => {
                let num_chars = data_length as usize / 2;
                let netname = reader.utf16le(num_chars);
                Self::NetnameNegotiateContextId { netname }
            }
            TRANSPORT_CAPABILITIES => {
                let flags = reader.u32();
                Self::TransportCapabilities { flags }
            }
            COMPRESSION_CAPABILITIES => Self::CompressionCapabilities { raw: reader.bytes(data_length as usize).to_vec() },
            RDMA_TRANSFORM_CAPABILITIES => Self::RDMATransformCapabilities { raw: reader.bytes(data_length as usize).to_vec() },
            other => return Err(SMBError::wire_decode(format!("unknown negotiate context type {:#06x}", other))),
        };

        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        reader.align(8);
        Ok(ctx)
    }

    pub fn write(&self, writer: &mut Writer) {
        writer.u16(self.context_type());
        let length_offset = writer.len();
        writer.u16(0); // patched below
        writer.zeros(4);
        let body_start = writer.len();

        match self {
            Self::PreAuthIntegrityCapabilities { hash_algorithms, salt } => {
                writer.u16(hash_algorithms.len() as u16);
                writer.u16(salt.len() as u16);
                for algo in hash_algorithms {
                    writer.u16(*algo);
                }
                writer.bytes(salt);
            }
            Self::EncryptionCapabilities { ciphers } => {
                writer.u16(ciphers.len() as u16);
                for cipher in ciphers {
                    writer.u16(*cipher);
                }
            }
            Self::SigningCapabilities { algorithms } => {
                writer.u16(algorithms.len() as u16);
                for algo in algorithms {
                    writer.u16(*algo);
                }
            }
            Self::NetnameNegotiateContextId { netname } => writer.utf16le(netname),
            Self::TransportCapabilities { flags } => writer.u32(*flags),
            Self::CompressionCapabilities { raw } | Self::RDMATransformCapabilities { raw } => writer.bytes(raw),
        }

        let body_len = (writer.len() - body_start) as u16;
        writer.write_at(length_offset, &body_len.to_le_bytes());
        writer.pad(8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preauth_integrity_round_trips() {
        let ctx = NegotiateContext::PreAuthIntegrityCapabilities { hash_algorithms: vec![HASH_ALGO_SHA512], salt: vec![0xAA; 32] };
        let mut w = Writer::new();
        ctx.write(&mut w);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len() % 8, 0);
        let mut r = Reader::new(&bytes);
        assert_eq!(NegotiateContext::parse(&mut r).unwrap(), ctx);
    }

    #[test]
    fn signing_capabilities_round_trips() {
        let ctx = NegotiateContext::SigningCapabilities { algorithms: vec![SIGNING_ALGO_AES_CMAC, SIGNING_ALGO_AES_GMAC] };
        let mut w = Writer::new();
        ctx.write(&mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(NegotiateContext::parse(&mut r).unwrap(), ctx);
    }

    #[test]
    fn successive_contexts_stay_8_byte_aligned() {
        let a = NegotiateContext::TransportCapabilities { flags: ACCEPT_TRANSPORT_LEVEL_SECURITY };
        let b = NegotiateContext::SigningCapabilities { algorithms: vec![SIGNING_ALGO_AES_CMAC] };
        let mut w = Writer::new();
        a.write(&mut w);
        let boundary = w.len();
        assert_eq!(boundary % 8, 0);
        b.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        assert_eq!(NegotiateContext::parse(&mut r).unwrap(), a);
        assert_eq!(r.position(), boundary);
        assert_eq!(NegotiateContext::parse(&mut r).unwrap(), b);
    }
}
