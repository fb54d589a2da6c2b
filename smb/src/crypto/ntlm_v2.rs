//! NTLMv2 response validation and session-key derivation (§4.2).

use digest::Digest;
use hmac::{Hmac, Mac};
use md4::Md4;
use md5::Md5;
use rc4::consts::U16;
use rc4::{Key, KeyInit, Rc4, StreamCipher};

use smb_core::error::SMBError;
use smb_core::SMBResult;

type HmacMd5 = Hmac<Md5>;

/// `NTHash = MD4(UTF-16LE(password))`; `NTLMv2Hash = HMAC-MD5(NTHash,
/// UTF-16LE(uppercase(user) || domain))`.
pub fn ntlm_v2_hash(password: &str, user: &str, domain: &str) -> SMBResult<Vec<u8>> {
    let password_utf16: Vec<u8> = password.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    let nt_hash = Md4::digest(&password_utf16);

    let identity = format!("{}{}", user.to_uppercase(), domain);
    let identity_utf16: Vec<u8> = identity.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();

    let mac = HmacMd5::new_from_slice(&nt_hash).map_err(|_| SMBError::crypto_error("invalid NTHash length"))?;
    Ok(mac.chain_update(&identity_utf16).finalize().into_bytes().to_vec())
}

pub struct NtlmV2Validation {
    pub valid: bool,
    pub session_base_key: Vec<u8>,
}

/// Validates a client's `NTChallengeResponse` against the expected
/// `NTProofStr` and derives `SessionBaseKey`. Steps match §4.2 exactly:
/// split proof‖blob, recompute the proof over `server_challenge || blob`,
/// compare in constant time, then derive the base key.
pub fn validate(
    nt_challenge_response: &[u8],
    server_challenge: &[u8; 8],
    password: &str,
    user: &str,
    domain: &str,
) -> SMBResult<NtlmV2Validation> {
    if nt_challenge_response.len() < 16 {
        return Err(SMBError::auth_error("NTChallengeResponse shorter than NTProofStr"));
    }
    let (nt_proof_str, blob) = nt_challenge_response.split_at(16);

    let ntlm_v2_hash = ntlm_v2_hash(password, user, domain)?;

    let mut buf = Vec::with_capacity(8 + blob.len());
    buf.extend_from_slice(server_challenge);
    buf.extend_from_slice(blob);
    let expected_proof = HmacMd5::new_from_slice(&ntlm_v2_hash)
        .map_err(|_| SMBError::crypto_error("invalid NTLMv2Hash length"))?
        .chain_update(&buf)
        .finalize()
        .into_bytes();

    let valid = constant_time_eq(&expected_proof, nt_proof_str);

    let session_base_key = if valid {
        let mut proof_buf = Vec::with_capacity(16);
        proof_buf.extend_from_slice(nt_proof_str);
        HmacMd5::new_from_slice(&ntlm_v2_hash)
            .map_err(|_| SMBError::crypto_error("invalid NTLMv2Hash length"))?
            .chain_update(&proof_buf)
            .finalize()
            .into_bytes()
            .to_vec()
    } else {
        Vec::new()
    };

    Ok(NtlmV2Validation { valid, session_base_key })
}

/// RC4-decrypts `encrypted_random_session_key` with `session_base_key` to
/// recover the `ExportedSessionKey`, used only when the AUTHENTICATE
/// message carries `NTLMSSP_NEGOTIATE_KEY_EXCH`.
pub fn unwrap_key_exchange(session_base_key: &[u8], encrypted_random_session_key: &[u8; 16]) -> SMBResult<Vec<u8>> {
    if session_base_key.len() != 16 {
        return Err(SMBError::crypto_error("SessionBaseKey must be 16 bytes for RC4 key exchange unwrap"));
    }
    let mut cipher = Rc4::new(Key::<U16>::from_slice(session_base_key));
    let mut out = [0u8; 16];
    cipher.apply_keystream_b2b(encrypted_random_session_key, &mut out).map_err(|_| SMBError::crypto_error("RC4 unwrap failed"))?;
    Ok(out.to_vec())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
