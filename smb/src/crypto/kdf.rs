//! SP800-108 counter-mode KDF over HMAC-SHA-256, one iteration.
//!
//! Input block: `counter (4 BE) || label || 0x00 || context || L (4 BE)`
//! where `L` is the desired key length in bits. Output is the PRF output
//! truncated to `L / 8` bytes (this implementation only ever needs one
//! PRF block: SHA-256 produces 32 bytes, and every label/context pair in
//! use here asks for at most 256 bits).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::dialect::SMBDialect;

type HmacSha256 = Hmac<Sha256>;

pub struct KdfLabels {
    pub label: &'static [u8],
    pub context_is_preauth_hash: bool,
    pub static_context: &'static [u8],
}

pub const SIGNING_30: KdfLabels = KdfLabels { label: b"SMB2AESCMAC\0", context_is_preauth_hash: false, static_context: b"SmbSign\0" };
pub const ENCRYPTION_30: KdfLabels = KdfLabels { label: b"SMB2AESCCM\0", context_is_preauth_hash: false, static_context: b"ServerIn \0" };
pub const DECRYPTION_30: KdfLabels = KdfLabels { label: b"SMB2AESCCM\0", context_is_preauth_hash: false, static_context: b"ServerOut\0" };
pub const APPLICATION_30: KdfLabels = KdfLabels { label: b"SMB2APP\0", context_is_preauth_hash: false, static_context: b"SmbRpc\0" };

pub const SIGNING_311: KdfLabels = KdfLabels { label: b"SMBSigningKey\0", context_is_preauth_hash: true, static_context: b"" };
pub const ENCRYPTION_311: KdfLabels = KdfLabels { label: b"SMBC2SCipherKey\0", context_is_preauth_hash: true, static_context: b"" };
pub const DECRYPTION_311: KdfLabels = KdfLabels { label: b"SMBS2CCipherKey\0", context_is_preauth_hash: true, static_context: b"" };
pub const APPLICATION_311: KdfLabels = KdfLabels { label: b"SMBAppKey\0", context_is_preauth_hash: true, static_context: b"" };

/// Picks the label/context pair for a purpose given the negotiated dialect.
pub fn labels_for(dialect: SMBDialect, purpose_30: KdfLabels, purpose_311: KdfLabels) -> KdfLabels {
    if dialect == SMBDialect::V3_1_1 { purpose_311 } else { purpose_30 }
}

/// Derives `key_len_bits / 8` bytes of key material from `key_in` using
/// the given label and context. `key_len_bits` must be a multiple of 8.
pub fn derive_key(key_in: &[u8], label: &[u8], context: &[u8], key_len_bits: u32) -> SMBResult<Vec<u8>> {
    let mac = HmacSha256::new_from_slice(key_in).map_err(|_| SMBError::crypto_error("invalid KDF key length"))?;

    let counter: u32 = 1;
    let mut input = Vec::with_capacity(4 + label.len() + 1 + context.len() + 4);
    input.extend_from_slice(&counter.to_be_bytes());
    input.extend_from_slice(label);
    input.push(0x00);
    input.extend_from_slice(context);
    input.extend_from_slice(&key_len_bits.to_be_bytes());

    let output = mac.chain_update(&input).finalize().into_bytes();
    let want = (key_len_bits / 8) as usize;
    if want > output.len() {
        return Err(SMBError::crypto_error("requested KDF output longer than one PRF block"));
    }
    Ok(output[..want].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let key = [0x42u8; 32];
        let a = derive_key(&key, b"SMBSigningKey\0", &[0xAA; 64], 128).unwrap();
        let b = derive_key(&key, b"SMBSigningKey\0", &[0xAA; 64], 128).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn shorter_length_is_a_prefix_of_longer() {
        let key = [0x11u8; 32];
        let short = derive_key(&key, b"SMB2APP\0", b"SmbRpc\0", 128).unwrap();
        let long = derive_key(&key, b"SMB2APP\0", b"SmbRpc\0", 256).unwrap();
        assert_eq!(&long[..16], short.as_slice());
    }

    #[test]
    fn different_context_changes_output() {
        let key = [0x01u8; 32];
        let a = derive_key(&key, b"SMB2AESCCM\0", b"ServerIn \0", 128).unwrap();
        let b = derive_key(&key, b"SMB2AESCCM\0", b"ServerOut\0", 128).unwrap();
        assert_ne!(a, b);
    }
}
