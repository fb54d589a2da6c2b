//! The three SMB2 signers, unified behind one 16-byte-output contract.
//!
//! Construction is a pure function of `(dialect, negotiated signing alg)`:
//! dialect < 3.0 always uses HMAC; otherwise GMAC if both sides negotiated
//! it, else CMAC.

use aes::Aes128;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use cmac::Cmac;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use smb_core::error::SMBError;
use smb_core::SMBResult;

use crate::protocol::body::dialect::SMBDialect;
use crate::protocol::header::SIGNATURE_OFFSET;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Hmac,
    Cmac,
    Gmac,
}

impl SigningAlgorithm {
    /// Dialect < 3.0 ⇒ HMAC; else GMAC if both sides offered it, else CMAC.
    pub fn select(dialect: SMBDialect, client_offered_gmac: bool, server_supports_gmac: bool) -> Self {
        if dialect == SMBDialect::V2_0_2 || dialect == SMBDialect::V2_1_0 {
            Self::Hmac
        } else if client_offered_gmac && server_supports_gmac {
            Self::Gmac
        } else {
            Self::Cmac
        }
    }
}

#[derive(Clone)]
pub enum Signer {
    Hmac { key: [u8; 16] },
    Cmac { key: [u8; 16] },
    Gmac { key: [u8; 16] },
}

impl Signer {
    pub fn new(alg: SigningAlgorithm, key_material: &[u8]) -> Self {
        let mut key = [0u8; 16];
        let n = key_material.len().min(16);
        key[..n].copy_from_slice(&key_material[..n]);
        match alg {
            SigningAlgorithm::Hmac => Self::Hmac { key },
            SigningAlgorithm::Cmac => Self::Cmac { key },
            SigningAlgorithm::Gmac => Self::Gmac { key },
        }
    }

    /// Signs `message` (the full framed SMB2 message, signature field
    /// already zeroed by the caller) and returns the 16-byte tag.
    pub fn sign(&self, message: &[u8], message_id: u64) -> SMBResult<[u8; 16]> {
        match self {
            Self::Hmac { key } => {
                let mac = HmacSha256::new_from_slice(key).map_err(|_| SMBError::crypto_error("invalid HMAC key"))?;
                let out = mac.chain_update(message).finalize().into_bytes();
                let mut sig = [0u8; 16];
                sig.copy_from_slice(&out[..16]);
                Ok(sig)
            }
            Self::Cmac { key } => {
                let mac = <Cmac<Aes128>>::new_from_slice(key).map_err(|_| SMBError::crypto_error("invalid CMAC key"))?;
                let out = mac.chain_update(message).finalize().into_bytes();
                let mut sig = [0u8; 16];
                sig.copy_from_slice(&out[..16]);
                Ok(sig)
            }
            Self::Gmac { key } => gmac_seal(key, message, message_id),
        }
    }

    /// Zeroes the signature field, recomputes, and compares in constant
    /// time against the signature the message actually carried.
    pub fn verify(&self, message_with_signature: &[u8], message_id: u64) -> SMBResult<bool> {
        if message_with_signature.len() < SIGNATURE_OFFSET + 16 {
            return Err(SMBError::wire_decode("message shorter than header + signature"));
        }
        let carried: [u8; 16] = message_with_signature[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 16]
            .try_into()
            .unwrap();
        let mut zeroed = message_with_signature.to_vec();
        zeroed[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 16].fill(0);
        let expected = self.sign(&zeroed, message_id)?;
        Ok(constant_time_eq(&expected, &carried))
    }

    /// Zeroes the signature field and overwrites it with a freshly
    /// computed tag. Returns the updated buffer.
    pub fn sign_in_place(&self, message: &mut [u8], message_id: u64) -> SMBResult<()> {
        message[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 16].fill(0);
        let sig = self.sign(message, message_id)?;
        message[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 16].copy_from_slice(&sig);
        Ok(())
    }
}

/// AES-128-GMAC as AES-GCM `seal(plaintext=∅, aad=message)`; the 12-byte
/// nonce is the 8-byte message_id zero-padded on the right.
fn gmac_seal(key: &[u8; 16], message: &[u8], message_id: u64) -> SMBResult<[u8; 16]> {
    let cipher = Aes128Gcm::new_from_slice(key).map_err(|_| SMBError::crypto_error("invalid GMAC key"))?;
    let mut nonce_bytes = [0u8; 12];
    nonce_bytes[..8].copy_from_slice(&message_id.to_le_bytes());
    let nonce = Nonce::from_slice(&nonce_bytes);
    let tag = cipher
        .encrypt(nonce, Payload { msg: &[], aad: message })
        .map_err(|_| SMBError::crypto_error("GMAC seal failed"))?;
    let mut sig = [0u8; 16];
    sig.copy_from_slice(&tag[..16]);
    Ok(sig)
}

/// Compares two equal-length byte slices without branching on the first
/// mismatch, so verification timing doesn't leak which byte failed.
fn constant_time_eq(a: &[u8; 16], b: &[u8; 16]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4493 test vectors.
    const RFC4493_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6,
        0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f, 0x3c,
    ];

    #[test]
    fn cmac_rfc4493_empty_message() {
        let signer = Signer::new(SigningAlgorithm::Cmac, &RFC4493_KEY);
        let sig = signer.sign(&[], 0).unwrap();
        assert_eq!(hex(&sig), "bb1d6929e95937287fa37d129b756746");
    }

    #[test]
    fn cmac_rfc4493_16_byte_message() {
        let msg = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96,
            0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17, 0x2a,
        ];
        let signer = Signer::new(SigningAlgorithm::Cmac, &RFC4493_KEY);
        let sig = signer.sign(&msg, 0).unwrap();
        assert_eq!(hex(&sig), "070a16b46b4d4144f79bdd9dd04a287c");
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let signer = Signer::new(SigningAlgorithm::Cmac, &RFC4493_KEY);
        let mut message = vec![0u8; 64];
        message[0..4].copy_from_slice(&[0xFE, b'S', b'M', b'B']);
        signer.sign_in_place(&mut message, 5).unwrap();
        assert!(signer.verify(&message, 5).unwrap());
        message[0] ^= 0x01;
        assert!(!signer.verify(&message, 5).unwrap());
    }

    #[test]
    fn gmac_signature_depends_on_message_id() {
        let key = [0x77u8; 16];
        let signer = Signer::new(SigningAlgorithm::Gmac, &key);
        let message = vec![1, 2, 3, 4];
        let a = signer.sign(&message, 1).unwrap();
        let b = signer.sign(&message, 2).unwrap();
        assert_ne!(a, b);
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
