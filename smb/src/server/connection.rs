//! A single TCP connection's negotiated state: crypto parameters, and
//! the session/tree/open tables scoped to it.
//!
//! Grounded on the teacher's `server/connection.rs` field set, simplified
//! to a concrete struct rather than a `Connection` trait with a generic
//! `SharedResource` parameter.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::protocol::body::dialect::SMBDialect;
use crate::protocol::body::negotiate::NegotiateSecurityMode;
use crate::server::notify::NotifyDelivery;
use crate::server::open::FileHandle;
use crate::server::tree::Tree;

/// A known client, keyed by its GUID across reconnects. Grounded on the
/// teacher's `SMBClient`.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub client_guid: Uuid,
    pub dialect: SMBDialect,
}

/// The subset of negotiation state fixed once NEGOTIATE completes and
/// read-mostly afterward.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedParams {
    pub dialect: Option<SMBDialect>,
    pub cipher_id: Option<u16>,
    pub signing_algorithm_id: Option<u16>,
    pub preauth_hash_id: Option<u16>,
    pub client_guid: Option<Uuid>,
    pub client_capabilities: u32,
    pub server_capabilities: u32,
    pub client_security_mode: NegotiateSecurityMode,
    pub server_security_mode: NegotiateSecurityMode,
    pub client_dialects: Vec<SMBDialect>,
}

/// Negotiation inputs and the running SMB 3.1.1 preauth integrity hash,
/// accumulated per §4.3: `h ← SHA-512(h || message_bytes)` over every
/// NEGOTIATE/SESSION_SETUP message until the session is established.
pub struct ConnCryptoState {
    pub server_guid: Uuid,
    negotiated: std::sync::RwLock<NegotiatedParams>,
    preauth_hash: RwLock<[u8; 64]>,
}

impl ConnCryptoState {
    pub fn new(server_guid: Uuid) -> Self {
        Self {
            server_guid,
            negotiated: std::sync::RwLock::new(NegotiatedParams::default()),
            preauth_hash: RwLock::new([0u8; 64]),
        }
    }

    /// A point-in-time copy of the negotiated parameters, safe to hold
    /// across suspension points.
    pub fn negotiated(&self) -> NegotiatedParams {
        self.negotiated.read().expect("negotiated params lock poisoned").clone()
    }

    pub fn set_negotiated(&self, f: impl FnOnce(&mut NegotiatedParams)) {
        let mut guard = self.negotiated.write().expect("negotiated params lock poisoned");
        f(&mut guard);
    }

    pub async fn preauth_hash(&self) -> [u8; 64] {
        *self.preauth_hash.read().await
    }

    /// Folds `message` into the running preauth hash: `h ← SHA-512(h || message)`.
    pub async fn fold_preauth(&self, message: &[u8]) {
        use sha2::{Digest, Sha512};
        let mut guard = self.preauth_hash.write().await;
        let mut hasher = Sha512::new();
        hasher.update(&*guard);
        hasher.update(message);
        guard.copy_from_slice(&hasher.finalize());
    }
}

/// Owns one TCP socket's session/tree/open tables. Destroyed on socket
/// close, which destroys every session reachable only through it
/// (multi-channel is out of scope, so this is unconditional).
pub struct Connection {
    pub connection_id: u64,
    pub crypto: ConnCryptoState,
    pub session_ids: RwLock<Vec<u64>>,
    pub trees: RwLock<HashMap<u32, Tree>>,
    pub opens: RwLock<HashMap<[u8; 16], FileHandle>>,
    /// Cloned into every [`crate::server::notify::PendingNotify`]
    /// registered on this connection, so a fired watcher reaches the
    /// writer loop that owns the socket instead of a channel nobody
    /// reads.
    pub notify_tx: mpsc::UnboundedSender<NotifyDelivery>,
    notify_rx: tokio::sync::Mutex<Option<mpsc::UnboundedReceiver<NotifyDelivery>>>,
    next_tree_id: std::sync::atomic::AtomicU32,
}

impl Connection {
    pub fn new(connection_id: u64, server_guid: Uuid) -> Self {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        Self {
            connection_id,
            crypto: ConnCryptoState::new(server_guid),
            session_ids: RwLock::new(Vec::new()),
            trees: RwLock::new(HashMap::new()),
            opens: RwLock::new(HashMap::new()),
            notify_tx,
            notify_rx: tokio::sync::Mutex::new(Some(notify_rx)),
            next_tree_id: std::sync::atomic::AtomicU32::new(1),
        }
    }

    pub fn allocate_tree_id(&self) -> u32 {
        self.next_tree_id.fetch_add(1, std::sync::atomic::Ordering::AcqRel)
    }

    /// Takes the notify-delivery receiver. Only the connection's own
    /// driver task should call this, and only once; later callers get
    /// `None`.
    pub async fn take_notify_receiver(&self) -> Option<mpsc::UnboundedReceiver<NotifyDelivery>> {
        self.notify_rx.lock().await.take()
    }
}
