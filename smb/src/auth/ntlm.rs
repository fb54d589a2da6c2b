//! NTLMv2 wrapped in the `AuthMech` contract.
//!
//! Only enough of MS-NLMP message framing is implemented to carry the
//! fields §4.2's NTLMv2 validation needs: the 8-byte server challenge
//! handed out in CHALLENGE, and the user/domain/NtChallengeResponse
//! (and optional EncryptedRandomSessionKey) pulled out of AUTHENTICATE.
//! Kerberos is handled by a separate, opaque mechanism the caller wires
//! in instead of this one.

use rand::RngCore;

use crate::auth::{AuthMech, AuthOutcome};
use crate::crypto::ntlm_v2;
use crate::server::session::Principal;

const NTLMSSP_SIGNATURE: &[u8; 8] = b"NTLMSSP\0";
const NEGOTIATE_KEY_EXCH: u32 = 0x4000_0000;

pub struct NtlmState {
    pub server_challenge: [u8; 8],
}

/// Looks up the plaintext password for a principal so the server can
/// recompute the NTLMv2 proof. A deployment backed by a real directory
/// would implement this against its own credential store.
pub trait CredentialStore: Send + Sync {
    fn password_for(&self, user: &str, domain: &str) -> Option<String>;
}

pub struct NtlmAuthMech<C> {
    credentials: C,
}

impl<C: CredentialStore> NtlmAuthMech<C> {
    pub fn new(credentials: C) -> Self {
        Self { credentials }
    }
}

fn read_varfield(buf: &[u8], field_offset: usize) -> Option<&[u8]> {
    let len = u16::from_le_bytes(buf.get(field_offset..field_offset + 2)?.try_into().ok()?) as usize;
    let offset = u32::from_le_bytes(buf.get(field_offset + 4..field_offset + 8)?.try_into().ok()?) as usize;
    buf.get(offset..offset + len)
}

fn utf16le_to_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
    String::from_utf16_lossy(&units)
}

struct Authenticate {
    nt_challenge_response: Vec<u8>,
    user: String,
    domain: String,
    encrypted_random_session_key: Option<[u8; 16]>,
    key_exchange: bool,
}

fn parse_authenticate(blob: &[u8]) -> Option<Authenticate> {
    if blob.len() < 12 || &blob[..8] != NTLMSSP_SIGNATURE {
        return None;
    }
    let message_type = u32::from_le_bytes(blob[8..12].try_into().ok()?);
    if message_type != 3 {
        return None;
    }
    let lm_response = read_varfield(blob, 12)?;
    let _ = lm_response;
    let nt_challenge_response = read_varfield(blob, 20)?.to_vec();
    let domain = utf16le_to_string(read_varfield(blob, 28)?);
    let user = utf16le_to_string(read_varfield(blob, 36)?);
    let flags = u32::from_le_bytes(blob.get(60..64)?.try_into().ok()?);
    let key_exchange = flags & NEGOTIATE_KEY_EXCH != 0;
    let encrypted_random_session_key = if key_exchange {
        read_varfield(blob, 52).and_then(|b| b.try_into().ok())
    } else {
        None
    };
    Some(Authenticate { nt_challenge_response, user, domain, encrypted_random_session_key, key_exchange })
}

impl<C: CredentialStore> AuthMech for NtlmAuthMech<C> {
    type State = NtlmState;

    fn step(&self, input_blob: &[u8], state: Option<Self::State>) -> AuthOutcome<Self::State> {
        match state {
            None => {
                let mut server_challenge = [0u8; 8];
                rand::thread_rng().fill_bytes(&mut server_challenge);
                let mut output_blob = Vec::from(*NTLMSSP_SIGNATURE);
                output_blob.extend_from_slice(&2u32.to_le_bytes());
                output_blob.extend_from_slice(&server_challenge);
                AuthOutcome::Continue { output_blob, state: NtlmState { server_challenge } }
            }
            Some(state) => {
                let Some(authenticate) = parse_authenticate(input_blob) else {
                    return AuthOutcome::Fail;
                };
                let Some(password) = self.credentials.password_for(&authenticate.user, &authenticate.domain) else {
                    return AuthOutcome::Fail;
                };
                let validation = match ntlm_v2::validate(
                    &authenticate.nt_challenge_response,
                    &state.server_challenge,
                    &password,
                    &authenticate.user,
                    &authenticate.domain,
                ) {
                    Ok(v) => v,
                    Err(_) => return AuthOutcome::Fail,
                };
                if !validation.valid {
                    return AuthOutcome::Fail;
                }
                let session_key = if authenticate.key_exchange {
                    match authenticate.encrypted_random_session_key {
                        Some(encrypted) => match ntlm_v2::unwrap_key_exchange(&validation.session_base_key, &encrypted) {
                            Ok(key) => key,
                            Err(_) => return AuthOutcome::Fail,
                        },
                        None => return AuthOutcome::Fail,
                    }
                } else {
                    validation.session_base_key
                };
                AuthOutcome::Done {
                    session_key,
                    principal: Principal { user: authenticate.user, domain: authenticate.domain },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticCredentials;
    impl CredentialStore for StaticCredentials {
        fn password_for(&self, _user: &str, _domain: &str) -> Option<String> {
            Some("P@ssw0rd".to_string())
        }
    }

    #[test]
    fn negotiate_round_yields_eight_byte_challenge() {
        let mech = NtlmAuthMech::new(StaticCredentials);
        match mech.step(&[], None) {
            AuthOutcome::Continue { state, .. } => assert_eq!(state.server_challenge.len(), 8),
            _ => panic!("expected Continue"),
        }
    }

    #[test]
    fn authenticate_with_bad_signature_fails() {
        let mech = NtlmAuthMech::new(StaticCredentials);
        let state = NtlmState { server_challenge: [0; 8] };
        match mech.step(&[0u8; 64], Some(state)) {
            AuthOutcome::Fail => {}
            _ => panic!("expected Fail"),
        }
    }
}
