//! The listening loop: accepts sockets, enforces the configured
//! connection cap, and hands each accepted socket off to
//! [`driver::run_connection`](crate::server::driver::run_connection) on
//! its own task.
//!
//! Grounded on the teacher's `SMBServer::start` accept loop in
//! `server/mod.rs`, replacing its `tokio_stream` combinator with a plain
//! `loop { listener.accept().await }` since this server has exactly one
//! listener rather than a pluggable `SMBSocket` abstraction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use uuid::Uuid;

use smb_core::error::SMBError;
use smb_core::logging::{info, warn};
use smb_core::SMBResult;

use crate::auth::ntlm::CredentialStore;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::driver::run_connection;
use crate::server::dispatcher::Dispatcher;
use crate::vfs::Vfs;

/// Tracks the currently-active connection count so `pre_accept_check` can
/// compare it against a live-settings snapshot that may change between
/// one accept and the next. Connections already admitted when the limit
/// drops are never forcibly closed — only new accepts are rejected.
#[derive(Default)]
pub struct ConnectionCounter {
    active: AtomicUsize,
}

impl ConnectionCounter {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

/// `0` means unbounded, matching [`LiveSettings::max_connections`](crate::server::config::LiveSettings).
fn pre_accept_check(active: usize, max_connections: usize) -> bool {
    max_connections == 0 || active < max_connections
}

/// Accepts connections on `config.bind_addr` until the listener itself
/// errors out (the process is shutting down or the socket was closed).
/// Each admitted connection gets its own [`Connection`] state and runs
/// on its own task; this function never returns `Ok` under normal
/// operation.
pub async fn run_acceptor<V: Vfs + 'static, C: CredentialStore + 'static>(
    config: Arc<ServerConfig>,
    dispatcher: Arc<Dispatcher<V, C>>,
    server_guid: Uuid,
) -> SMBResult<()> {
    let listener = TcpListener::bind(config.bind_addr).await.map_err(SMBError::io_error)?;
    let counter = Arc::new(ConnectionCounter::default());
    let mut next_connection_id = 0u64;

    info!(addr = %config.bind_addr, "SMB acceptor listening");

    loop {
        let (socket, peer) = listener.accept().await.map_err(SMBError::io_error)?;

        let live = config.snapshot();
        if !pre_accept_check(counter.active(), live.max_connections) {
            warn!(peer = %peer, active = counter.active(), "rejecting connection over configured limit");
            drop(socket);
            continue;
        }

        let _ = socket.set_nodelay(true);

        next_connection_id += 1;
        let connection_id = next_connection_id;
        let connection = Arc::new(Connection::new(connection_id, server_guid));

        let guard = counter.clone().admit_owned();
        let config = config.clone();
        let dispatcher = dispatcher.clone();

        info!(peer = %peer, connection_id, "accepted connection");

        tokio::spawn(async move {
            let _guard = guard;
            if let Err(err) = run_connection(socket, config, dispatcher, connection).await {
                warn!(peer = %peer, connection_id, error = ?err, "connection terminated with error");
            } else {
                info!(peer = %peer, connection_id, "connection closed");
            }
        });
    }
}

impl ConnectionCounter {
    /// Increments the active count and returns a guard that decrements it
    /// on drop. Owned (takes `Arc<Self>`) rather than borrowed, since the
    /// guard has to live inside a `'static` spawned task.
    fn admit_owned(self: Arc<Self>) -> OwnedConnectionGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        OwnedConnectionGuard { counter: self }
    }
}

struct OwnedConnectionGuard {
    counter: Arc<ConnectionCounter>,
}

impl Drop for OwnedConnectionGuard {
    fn drop(&mut self) {
        self.counter.active.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_max_connections_is_unbounded() {
        assert!(pre_accept_check(10_000, 0));
    }

    #[test]
    fn rejects_once_active_reaches_limit() {
        assert!(pre_accept_check(4, 5));
        assert!(!pre_accept_check(5, 5));
    }
}
