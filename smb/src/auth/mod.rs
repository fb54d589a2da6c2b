//! Pluggable authentication mechanisms negotiated via SPNEGO during
//! SESSION_SETUP.

pub mod ntlm;
pub mod spnego;

use crate::server::session::Principal;

/// The outcome of one authentication round. A mechanism that needs more
/// than one round (Kerberos, or NTLM's NEGOTIATE/CHALLENGE/AUTHENTICATE
/// dance) returns `Continue` carrying whatever state it needs for the
/// next call.
pub enum AuthOutcome<S> {
    Done { session_key: Vec<u8>, principal: Principal },
    Continue { output_blob: Vec<u8>, state: S },
    Fail,
}

/// A single step of a (possibly multi-round) authentication mechanism.
/// `State` is mechanism-specific and opaque to the dispatcher, which
/// only threads it back through on the next SESSION_SETUP for the same
/// preauth session.
pub trait AuthMech {
    type State: Send;

    fn step(&self, input_blob: &[u8], state: Option<Self::State>) -> AuthOutcome<Self::State>;
}
