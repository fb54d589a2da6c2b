//! The `ChangeSource` collaborator: a feed of filesystem events the
//! dispatcher forwards into the [`NotifyRegistry`](crate::server::notify::NotifyRegistry).

use crate::protocol::body::change_notify::SMBNotifyAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub share: String,
    pub parent_path: String,
    pub name: String,
    pub action: SMBNotifyAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    pub share: String,
    pub old_parent: String,
    pub old_name: String,
    pub new_parent: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Change(ChangeEvent),
    Rename(RenameEvent),
}

/// A source of filesystem change events external to the dispatcher's own
/// WRITE handling (e.g. another process mutating the same share).
/// `poll` is non-blocking: implementations backed by real OS-level
/// watchers should buffer internally and drain on each call.
pub trait ChangeSource: Send + Sync {
    fn poll(&self) -> Vec<SourceEvent>;
}

/// A `ChangeSource` with nothing to report; used where no external
/// watcher is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChangeSource;

impl ChangeSource for NullChangeSource {
    fn poll(&self) -> Vec<SourceEvent> {
        Vec::new()
    }
}
