//! Per-connection I/O loop: frames requests off the socket, drives them
//! through the [`Dispatcher`], and frames responses back.
//!
//! Grounded on the teacher's `socket::listener::listener_async` stream
//! adapter, but inlined into a single read/dispatch/write task per
//! connection rather than a `Stream` combinator, since this server has
//! no need to multiplex several listeners behind one abstraction.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use smb_core::error::SMBError;
use smb_core::nt_status::NTStatus;
use smb_core::SMBResult;

use crate::auth::ntlm::CredentialStore;
use crate::protocol::body::change_notify::SMBChangeNotifyResponse;
use crate::protocol::body::SMBResponseBody;
use crate::protocol::header::command_code::SMBCommandCode;
use crate::protocol::header::{SMBFlags, SMBHeaderContext, SMBSyncHeader};
use crate::protocol::message::{frame, unframe, SMBRequestMessage, SMBResponseMessage};
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::dispatcher::Dispatcher;
use crate::server::notify::NotifyDelivery;
use crate::vfs::Vfs;

/// Drives one accepted connection until the client disconnects, the idle
/// deadline elapses, or a frame exceeds `config.max_frame_size`. Every
/// path out of this function is a clean return — the caller is
/// responsible for removing `connection`'s sessions from shared state.
pub async fn run_connection<V: Vfs, C: CredentialStore>(
    mut stream: TcpStream,
    config: Arc<ServerConfig>,
    dispatcher: Arc<Dispatcher<V, C>>,
    connection: Arc<Connection>,
) -> SMBResult<()> {
    let _ = stream.set_nodelay(true);
    let idle_deadline = Duration::from_secs(config.idle_timeout_secs);
    let mut buf = Vec::with_capacity(config.read_buffer_size);

    let mut notify_rx = connection
        .take_notify_receiver()
        .await
        .expect("run_connection is the only caller of take_notify_receiver for this connection");

    loop {
        tokio::select! {
            frame_result = read_one_frame(&mut stream, &mut buf, config.max_frame_size, idle_deadline) => {
                let Some((payload_len, consumed)) = frame_result? else {
                    return Ok(());
                };

                let payload = buf[4..4 + payload_len].to_vec();
                buf.drain(..consumed);

                let requests = SMBRequestMessage::parse_compound(&payload)?;
                if requests.is_empty() {
                    continue;
                }

                let mut responses = Vec::with_capacity(requests.len());
                for request in &requests {
                    let raw = &payload[..]; // preauth hashing operates on the whole compound buffer, matching how it arrived
                    let response = dispatcher.handle(&connection, &request.header, &request.body, raw).await;
                    responses.push(response);
                }

                let signer = dispatcher
                    .sessions
                    .with_session(requests[0].header.session_id, |s| s.crypto.signer.clone())
                    .await
                    .flatten();
                let out = SMBResponseMessage::write_compound(&responses, signer.as_ref())?;
                stream.write_all(&out).await.map_err(SMBError::io_error)?;
            }
            Some(delivery) = notify_rx.recv() => {
                let out = notify_completion_frame(&dispatcher, delivery).await?;
                stream.write_all(&out).await.map_err(SMBError::io_error)?;
            }
        }
    }
}

/// Builds, signs (if the parked request was signed), and frames the
/// async CHANGE_NOTIFY completion once a watched path changes. This is
/// the only response on the wire that isn't triggered by an inbound
/// request, so it carries its own `message_id`/`session_id`/`tree_id`
/// straight from the [`NotifyDelivery`] rather than mirroring a request
/// header.
async fn notify_completion_frame<V: Vfs, C: CredentialStore>(
    dispatcher: &Dispatcher<V, C>,
    delivery: NotifyDelivery,
) -> SMBResult<Vec<u8>> {
    let mut flags = SMBFlags::SERVER_TO_REDIR;
    if delivery.signed {
        flags |= SMBFlags::SIGNED;
    }
    let header = SMBSyncHeader {
        credit_charge: 1,
        status: NTStatus::StatusSuccess.into(),
        command: SMBCommandCode::ChangeNotify,
        credit_request_response: 0,
        flags,
        next_command: 0,
        message_id: delivery.message_id,
        context: SMBHeaderContext::Sync { tree_id: delivery.tree_id },
        session_id: delivery.session_id,
        signature: [0; 16],
    };
    let response = SMBResponseMessage::new(header, SMBResponseBody::ChangeNotify(SMBChangeNotifyResponse { entries: delivery.entries }));
    let signer = dispatcher.sessions.with_session(delivery.session_id, |s| s.crypto.signer.clone()).await.flatten();
    SMBResponseMessage::write_compound(&[response], signer.as_ref())
}

/// Reads until a complete NetBIOS session-message frame is buffered,
/// honoring the idle deadline and the configured oversize-frame limit.
/// Returns `(payload_len, total_consumed_bytes)`, or `None` on clean EOF.
async fn read_one_frame(
    stream: &mut TcpStream,
    buf: &mut Vec<u8>,
    max_frame_size: usize,
    idle_deadline: Duration,
) -> SMBResult<Option<(usize, usize)>> {
    loop {
        if let Some((payload, consumed)) = unframe(buf)? {
            let payload_len = payload.len();
            if payload_len > max_frame_size {
                return Err(SMBError::wire_decode("frame exceeds configured maximum size"));
            }
            return Ok(Some((payload_len, consumed)));
        }

        let mut chunk = [0u8; 8192];
        let read = tokio::time::timeout(idle_deadline, stream.read(&mut chunk))
            .await
            .map_err(|_| SMBError::io_error(std::io::Error::new(std::io::ErrorKind::TimedOut, "idle connection")))?
            .map_err(SMBError::io_error)?;
        if read == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}

/// Builds a single framed error response for a connection-level failure
/// that occurred before any request could be dispatched (malformed frame,
/// negotiate mismatch) so the client gets a clean disconnect signal
/// instead of a silently dropped socket.
pub fn frame_fatal_response(message: &[u8]) -> Vec<u8> {
    frame(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_fatal_response_wraps_in_netbios_header() {
        let wrapped = frame_fatal_response(&[1, 2, 3]);
        let (payload, consumed) = unframe(&wrapped).unwrap().unwrap();
        assert_eq!(payload, &[1, 2, 3]);
        assert_eq!(consumed, wrapped.len());
    }
}
