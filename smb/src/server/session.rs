//! Session lifecycle and the global session table.
//!
//! Grounded on the teacher's `server/session.rs`, but with the generic
//! `<C: Connection, S: Server>` parametrization dropped: this server only
//! ever needs one concrete session shape, not a pluggable one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::RwLock;

use crate::crypto::Signer;
use crate::server::credit::CreditLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlags {
    pub guest: bool,
    pub null: bool,
    pub encrypt_data: bool,
}

/// The signer and key material negotiated for a session. Every field but
/// `signer` may be absent for dialect < 3.0, where only signing applies.
#[derive(Default)]
pub struct SessionCryptoState {
    pub signer: Option<Signer>,
    pub signing_key: Option<Vec<u8>>,
    pub encryption_key: Option<Vec<u8>>,
    pub decryption_key: Option<Vec<u8>>,
    pub application_key: Option<Vec<u8>>,
}

impl Drop for SessionCryptoState {
    fn drop(&mut self) {
        if let Some(key) = self.signing_key.as_mut() {
            key.fill(0);
        }
        if let Some(key) = self.encryption_key.as_mut() {
            key.fill(0);
        }
        if let Some(key) = self.decryption_key.as_mut() {
            key.fill(0);
        }
        if let Some(key) = self.application_key.as_mut() {
            key.fill(0);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Principal {
    pub user: String,
    pub domain: String,
}

impl Principal {
    pub fn guest() -> Self {
        Self { user: "guest".to_string(), domain: String::new() }
    }
}

pub struct Session {
    pub session_id: u64,
    pub flags: SessionFlags,
    pub principal: Principal,
    pub created_at: Instant,
    pub client_address: std::net::SocketAddr,
    pub crypto: SessionCryptoState,
    pub credits: CreditLedger,
}

impl Session {
    pub fn new(session_id: u64, principal: Principal, client_address: std::net::SocketAddr, initial_grant: u32) -> Self {
        Self {
            session_id,
            flags: SessionFlags::default(),
            principal,
            created_at: Instant::now(),
            client_address,
            crypto: SessionCryptoState::default(),
            credits: CreditLedger::new(initial_grant),
        }
    }
}

/// Owns every established session plus the atomic id allocator and
/// server-wide request/grant counters the credit manager consults.
pub struct SessionManager {
    sessions: RwLock<HashMap<u64, Session>>,
    next_session_id: AtomicU64,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self { sessions: RwLock::new(HashMap::new()), next_session_id: AtomicU64::new(1) }
    }
}

impl SessionManager {
    pub fn allocate_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::AcqRel)
    }

    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.session_id, session);
    }

    pub async fn remove(&self, session_id: u64) -> Option<Session> {
        self.sessions.write().await.remove(&session_id)
    }

    pub async fn contains(&self, session_id: u64) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    pub async fn with_session<R>(&self, session_id: u64, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.sessions.read().await.get(&session_id).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_start_at_one_and_increment() {
        let manager = SessionManager::default();
        assert_eq!(manager.allocate_session_id(), 1);
        assert_eq!(manager.allocate_session_id(), 2);
    }

    #[tokio::test]
    async fn remove_missing_session_returns_none() {
        let manager = SessionManager::default();
        assert!(manager.remove(999).await.is_none());
    }
}
