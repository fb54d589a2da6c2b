//! Minimal hand-rolled DER for the SPNEGO (RFC 4178) envelope SESSION_SETUP
//! blobs arrive wrapped in. Only the fields this server inspects are
//! parsed: the mechanism token carried in `NegTokenInit`/`NegTokenResp`.
//! Kerberos is negotiated but opaque past this layer: its token bytes are
//! handed to whatever `AuthMech` the caller wired in for the `krb5` OID,
//! unexamined here.

const NEG_TOKEN_INIT_TAG: u8 = 0xA0;
const NEG_TOKEN_RESP_TAG: u8 = 0xA1;
const APPLICATION_TAG: u8 = 0x60;
const DER_SEQUENCE_TAG: u8 = 0x30;
const DER_OID_TAG: u8 = 0x06;
const DER_OCTET_STRING_TAG: u8 = 0x04;
const DER_ENUM_TAG: u8 = 0x0A;
const MECH_TYPE_LIST_TAG: u8 = 0xA0;
const MECH_TOKEN_TAG: u8 = 0xA2;
const NEG_STATE_TAG: u8 = 0xA0;
const SUPPORTED_MECH_TAG: u8 = 0xA1;
const RESPONSE_TOKEN_TAG: u8 = 0xA2;

const SPNEGO_OID: [u8; 6] = [0x2b, 0x06, 0x01, 0x05, 0x05, 0x02];
const NTLMSSP_OID: [u8; 10] = [0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x02, 0x02, 0x0a];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegState {
    AcceptCompleted,
    AcceptIncomplete,
    Reject,
    RequestMic,
}

impl NegState {
    fn to_der(self) -> u8 {
        match self {
            NegState::AcceptCompleted => 0,
            NegState::AcceptIncomplete => 1,
            NegState::Reject => 2,
            NegState::RequestMic => 3,
        }
    }
}

pub struct SpnegoInit {
    pub mech_token: Option<Vec<u8>>,
}

pub struct SpnegoResp {
    pub neg_state: Option<NegState>,
    pub response_token: Option<Vec<u8>>,
}

pub enum SpnegoToken {
    Init(SpnegoInit),
    Resp(SpnegoResp),
}

fn read_len(buf: &[u8], pos: &mut usize) -> Option<usize> {
    let first = *buf.get(*pos)?;
    *pos += 1;
    if first < 0x80 {
        return Some(first as usize);
    }
    let n = (first & 0x7f) as usize;
    let mut len = 0usize;
    for _ in 0..n {
        len = len * 256 + *buf.get(*pos)? as usize;
        *pos += 1;
    }
    Some(len)
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let trimmed: Vec<u8> = {
        let mut v: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
        if v.is_empty() {
            v.push(0);
        }
        v
    };
    out.push(0x80 | trimmed.len() as u8);
    out.extend_from_slice(&trimmed);
}

fn read_tlv<'a>(buf: &'a [u8], pos: &mut usize) -> Option<(u8, &'a [u8])> {
    let tag = *buf.get(*pos)?;
    *pos += 1;
    let len = read_len(buf, pos)?;
    let start = *pos;
    let end = start.checked_add(len)?;
    let value = buf.get(start..end)?;
    *pos = end;
    Some((tag, value))
}

fn write_tlv(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    write_len(out, value.len());
    out.extend_from_slice(value);
}

/// Parses a mechTypeList sequence of OIDs (just skips them; this server
/// always offers NTLMSSP and treats anything else as Kerberos).
fn parse_mech_type_list(buf: &[u8]) -> Vec<Vec<u8>> {
    let mut pos = 0;
    let Some((DER_SEQUENCE_TAG, seq)) = read_tlv(buf, &mut pos) else { return Vec::new() };
    let mut inner_pos = 0;
    let mut out = Vec::new();
    while inner_pos < seq.len() {
        let Some((DER_OID_TAG, oid)) = read_tlv(seq, &mut inner_pos) else { break };
        out.push(oid.to_vec());
    }
    out
}

impl SpnegoToken {
    /// Strips the outer `GSS-API` application wrapper (present only on
    /// the first `NegTokenInit` of a session) and dispatches on the
    /// inner `negTokenInit`/`negTokenResp` choice tag.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut pos = 0;
        let tag = *bytes.first()?;
        if tag == APPLICATION_TAG {
            let (_, app_body) = read_tlv(bytes, &mut pos)?;
            let mut inner = 0usize;
            let (DER_OID_TAG, oid) = read_tlv(app_body, &mut inner)? else { return None };
            if oid != SPNEGO_OID {
                return None;
            }
            let (choice_tag, choice_body) = read_tlv(app_body, &mut inner)?;
            return Self::parse_choice(choice_tag, choice_body);
        }
        let (choice_tag, choice_body) = read_tlv(bytes, &mut pos)?;
        Self::parse_choice(choice_tag, choice_body)
    }

    fn parse_choice(tag: u8, body: &[u8]) -> Option<Self> {
        match tag {
            NEG_TOKEN_INIT_TAG => {
                let mut pos = 0;
                let (DER_SEQUENCE_TAG, seq) = read_tlv(body, &mut pos)? else { return None };
                let mut mech_token = None;
                let mut seq_pos = 0;
                while seq_pos < seq.len() {
                    let (field_tag, field_body) = read_tlv(seq, &mut seq_pos)?;
                    match field_tag {
                        MECH_TYPE_LIST_TAG => {
                            let _ = parse_mech_type_list(field_body);
                        }
                        MECH_TOKEN_TAG => {
                            let mut p = 0;
                            if let Some((DER_OCTET_STRING_TAG, token)) = read_tlv(field_body, &mut p) {
                                mech_token = Some(token.to_vec());
                            }
                        }
                        _ => {}
                    }
                }
                Some(SpnegoToken::Init(SpnegoInit { mech_token }))
            }
            NEG_TOKEN_RESP_TAG => {
                let mut pos = 0;
                let (DER_SEQUENCE_TAG, seq) = read_tlv(body, &mut pos)? else { return None };
                let mut neg_state = None;
                let mut response_token = None;
                let mut seq_pos = 0;
                while seq_pos < seq.len() {
                    let (field_tag, field_body) = read_tlv(seq, &mut seq_pos)?;
                    match field_tag {
                        NEG_STATE_TAG => {
                            let mut p = 0;
                            if let Some((DER_ENUM_TAG, value)) = read_tlv(field_body, &mut p) {
                                neg_state = value.first().map(|b| match b {
                                    0 => NegState::AcceptCompleted,
                                    1 => NegState::AcceptIncomplete,
                                    2 => NegState::Reject,
                                    _ => NegState::RequestMic,
                                });
                            }
                        }
                        RESPONSE_TOKEN_TAG => {
                            let mut p = 0;
                            if let Some((DER_OCTET_STRING_TAG, token)) = read_tlv(field_body, &mut p) {
                                response_token = Some(token.to_vec());
                            }
                        }
                        _ => {}
                    }
                }
                Some(SpnegoToken::Resp(SpnegoResp { neg_state, response_token }))
            }
            _ => None,
        }
    }

    /// Extracts the inner mechanism-specific token regardless of which
    /// choice this is, the only thing the dispatcher actually needs.
    pub fn mech_token(&self) -> Option<&[u8]> {
        match self {
            SpnegoToken::Init(init) => init.mech_token.as_deref(),
            SpnegoToken::Resp(resp) => resp.response_token.as_deref(),
        }
    }
}

/// Builds a `negTokenResp` carrying `neg_state` and, when provided, a
/// `responseToken` wrapping `mech_output` and a `supportedMech` OID
/// naming NTLMSSP.
pub fn encode_neg_token_resp(neg_state: NegState, mech_output: Option<&[u8]>, include_supported_mech: bool) -> Vec<u8> {
    let mut seq_body = Vec::new();

    let mut neg_state_inner = Vec::new();
    write_tlv(&mut neg_state_inner, DER_ENUM_TAG, &[neg_state.to_der()]);
    write_tlv(&mut seq_body, NEG_STATE_TAG, &neg_state_inner);

    if include_supported_mech {
        let mut mech_inner = Vec::new();
        write_tlv(&mut mech_inner, DER_OID_TAG, &NTLMSSP_OID);
        write_tlv(&mut seq_body, SUPPORTED_MECH_TAG, &mech_inner);
    }

    if let Some(output) = mech_output {
        let mut token_inner = Vec::new();
        write_tlv(&mut token_inner, DER_OCTET_STRING_TAG, output);
        write_tlv(&mut seq_body, RESPONSE_TOKEN_TAG, &token_inner);
    }

    let mut seq = Vec::new();
    write_tlv(&mut seq, DER_SEQUENCE_TAG, &seq_body);

    let mut out = Vec::new();
    write_tlv(&mut out, NEG_TOKEN_RESP_TAG, &seq);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neg_token_resp_round_trips_response_token() {
        let encoded = encode_neg_token_resp(NegState::AcceptCompleted, Some(b"hello"), true);
        let parsed = SpnegoToken::parse(&encoded).expect("parse");
        match parsed {
            SpnegoToken::Resp(resp) => {
                assert_eq!(resp.neg_state, Some(NegState::AcceptCompleted));
                assert_eq!(resp.response_token.as_deref(), Some(&b"hello"[..]));
            }
            _ => panic!("expected Resp"),
        }
    }

    #[test]
    fn neg_token_resp_without_token_has_no_response_token() {
        let encoded = encode_neg_token_resp(NegState::AcceptIncomplete, None, false);
        let parsed = SpnegoToken::parse(&encoded).expect("parse");
        match parsed {
            SpnegoToken::Resp(resp) => assert!(resp.response_token.is_none()),
            _ => panic!("expected Resp"),
        }
    }
}
