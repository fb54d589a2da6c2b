//! Server configuration: an immutable startup config plus the mutable
//! subset of settings ("live settings") that operators can change while
//! the server is running.

use std::net::SocketAddr;
use std::sync::RwLock;

use crate::protocol::body::dialect::SMBDialect;
use crate::server::credit::CreditStrategy;

/// Settings an operator may adjust without restarting the listener.
/// Snapshotted by value so callers never hold the lock across an `.await`.
#[derive(Debug, Clone)]
pub struct LiveSettings {
    pub min_dialect: SMBDialect,
    pub max_dialect: SMBDialect,
    pub encryption_enabled: bool,
    pub directory_leasing_enabled: bool,
    pub signing_enabled: bool,
    pub signing_required: bool,
    pub credit_strategy: CreditStrategy,
    pub min_grant: u16,
    pub max_grant: u16,
    pub initial_grant: u16,
    pub max_session_credits: u16,
    pub load_high: u32,
    pub load_low: u32,
    pub aggressive_threshold: u32,
    pub max_connections: usize,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            min_dialect: SMBDialect::V2_0_2,
            max_dialect: SMBDialect::V3_1_1,
            encryption_enabled: true,
            directory_leasing_enabled: true,
            signing_enabled: true,
            signing_required: false,
            credit_strategy: CreditStrategy::Adaptive,
            min_grant: 16,
            max_grant: 8192,
            initial_grant: 256,
            max_session_credits: 65535,
            load_high: 1000,
            load_low: 100,
            aggressive_threshold: 256,
            max_connections: 0,
        }
    }
}

/// Startup configuration: what the listener binds to plus the initial
/// live settings. Held for the server's whole lifetime; the mutable part
/// lives behind [`LiveSettings`]' own lock.
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub read_buffer_size: usize,
    pub idle_timeout_secs: u64,
    pub max_frame_size: usize,
    live: RwLock<LiveSettings>,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr, live: LiveSettings) -> Self {
        Self {
            bind_addr,
            read_buffer_size: 64 * 1024,
            idle_timeout_secs: 600,
            max_frame_size: 64 * 1024 * 1024,
            live: RwLock::new(live),
        }
    }

    /// A point-in-time copy of the mutable settings, cheap to clone and
    /// safe to hold across suspension points.
    pub fn snapshot(&self) -> LiveSettings {
        self.live.read().expect("live settings lock poisoned").clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut LiveSettings)) {
        let mut guard = self.live.write().expect("live settings lock poisoned");
        f(&mut guard);
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0:445".parse().unwrap(), LiveSettings::default())
    }
}
