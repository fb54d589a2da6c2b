//! The CHANGE_NOTIFY registry: `path → list<PendingNotify>` and
//! `file_id → PendingNotify`, guarded by a single reader/writer lock.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc::UnboundedSender;

use crate::protocol::body::change_notify::completion_filter::SMBCompletionFilter;
use crate::protocol::body::change_notify::{FileNotifyEntry, SMBNotifyAction};

/// A one-shot watcher registered by a CHANGE_NOTIFY request that is
/// parked waiting for a matching filesystem event.
pub struct PendingNotify {
    pub file_id: [u8; 16],
    pub session_id: u64,
    pub message_id: u64,
    pub tree_id: u32,
    pub signed: bool,
    pub watch_path: String,
    pub share_name: String,
    pub completion_filter: SMBCompletionFilter,
    pub watch_tree: bool,
    pub max_output: u32,
    pub delivery: UnboundedSender<NotifyDelivery>,
}

/// What the registry hands back to the dispatcher once a watcher fires
/// (or is cancelled), so it can complete the parked async response.
pub struct NotifyDelivery {
    pub session_id: u64,
    pub message_id: u64,
    pub tree_id: u32,
    pub signed: bool,
    pub entries: Vec<FileNotifyEntry>,
}

#[derive(Default)]
struct Index {
    by_path: HashMap<String, Vec<[u8; 16]>>,
    by_file_id: HashMap<[u8; 16], PendingNotify>,
}

#[derive(Default)]
pub struct NotifyRegistry {
    index: RwLock<Index>,
}

fn filter_matches(action: SMBNotifyAction, filter: SMBCompletionFilter) -> bool {
    use SMBNotifyAction::*;
    let mask = match action {
        Added | Removed | RenamedOldName | RenamedNewName => {
            SMBCompletionFilter::FILE_NAME | SMBCompletionFilter::DIR_NAME
        }
        Modified => SMBCompletionFilter::SIZE | SMBCompletionFilter::LAST_WRITE | SMBCompletionFilter::ATTRIBUTES,
        AddedStream | RemovedStream | ModifiedStream => {
            SMBCompletionFilter::STREAM_NAME | SMBCompletionFilter::STREAM_SIZE | SMBCompletionFilter::STREAM_WRITE
        }
    };
    filter.intersects(mask)
}

/// Walks `parent_path` up to `/`, yielding each ancestor path alongside
/// whether it equals the original parent (exact match) or is a proper
/// ancestor (only satisfies watchers with `watch_tree` set).
fn ancestors(parent_path: &str) -> Vec<(String, bool)> {
    let mut levels = Vec::new();
    let trimmed = parent_path.trim_matches('/');
    let mut current = trimmed.to_string();
    let mut exact = true;
    loop {
        let path = if current.is_empty() { "/".to_string() } else { format!("/{current}") };
        levels.push((path, exact));
        exact = false;
        if current.is_empty() {
            break;
        }
        match current.rfind('/') {
            Some(idx) => current.truncate(idx),
            None => current.clear(),
        }
    }
    levels
}

impl NotifyRegistry {
    pub fn register(&self, notify: PendingNotify) {
        let mut index = self.index.write().expect("notify registry lock poisoned");
        if let Some(old) = index.by_file_id.remove(&notify.file_id) {
            remove_from_path_index(&mut index.by_path, &old.watch_path, &old.file_id);
        }
        index.by_path.entry(notify.watch_path.clone()).or_default().push(notify.file_id);
        index.by_file_id.insert(notify.file_id, notify);
    }

    pub fn unregister(&self, file_id: &[u8; 16]) -> Option<PendingNotify> {
        let mut index = self.index.write().expect("notify registry lock poisoned");
        let removed = index.by_file_id.remove(file_id)?;
        remove_from_path_index(&mut index.by_path, &removed.watch_path, file_id);
        Some(removed)
    }

    /// Deregisters the watcher CANCEL is actually allowed to identify: the
    /// one parked on behalf of `session_id`'s `message_id`, not a file id
    /// (CANCEL carries no file id of its own).
    pub fn unregister_by_message(&self, session_id: u64, message_id: u64) -> Option<PendingNotify> {
        let file_id = {
            let index = self.index.read().expect("notify registry lock poisoned");
            index
                .by_file_id
                .iter()
                .find(|(_, watcher)| watcher.session_id == session_id && watcher.message_id == message_id)
                .map(|(id, _)| *id)?
        };
        self.unregister(&file_id)
    }

    fn collect_matches(
        &self,
        share: &str,
        parent_path: &str,
        action: SMBNotifyAction,
    ) -> Vec<[u8; 16]> {
        let index = self.index.read().expect("notify registry lock poisoned");
        let mut matched = Vec::new();
        for (path, exact) in ancestors(parent_path) {
            let Some(file_ids) = index.by_path.get(&path) else { continue };
            for file_id in file_ids {
                let Some(watcher) = index.by_file_id.get(file_id) else { continue };
                if watcher.share_name != share {
                    continue;
                }
                if !(exact || watcher.watch_tree) {
                    continue;
                }
                if !filter_matches(action, watcher.completion_filter) {
                    continue;
                }
                matched.push(*file_id);
            }
        }
        matched
    }

    /// Delivers a single-entry notification to every watcher matching
    /// `action` at or above `parent_path`, then deregisters each of them.
    pub fn notify_change(&self, share: &str, parent_path: &str, file_name: &str, action: SMBNotifyAction) {
        let matched = self.collect_matches(share, parent_path, action);
        for file_id in matched {
            let Some(watcher) = self.unregister(&file_id) else { continue };
            let name = relative_name(&watcher.watch_path, parent_path, file_name);
            let entry = FileNotifyEntry { action, file_name: name };
            deliver(watcher, vec![entry]);
        }
    }

    /// Delivers a paired `RENAMED_OLD_NAME`/`RENAMED_NEW_NAME` entry to
    /// every watcher matching either the source or destination ancestry.
    pub fn notify_rename(
        &self,
        share: &str,
        old_parent: &str,
        old_name: &str,
        new_parent: &str,
        new_name: &str,
    ) {
        let mut matched = self.collect_matches(share, old_parent, SMBNotifyAction::RenamedOldName);
        for file_id in self.collect_matches(share, new_parent, SMBNotifyAction::RenamedNewName) {
            if !matched.contains(&file_id) {
                matched.push(file_id);
            }
        }
        for file_id in matched {
            let Some(watcher) = self.unregister(&file_id) else { continue };
            let entries = vec![
                FileNotifyEntry {
                    action: SMBNotifyAction::RenamedOldName,
                    file_name: relative_name(&watcher.watch_path, old_parent, old_name),
                },
                FileNotifyEntry {
                    action: SMBNotifyAction::RenamedNewName,
                    file_name: relative_name(&watcher.watch_path, new_parent, new_name),
                },
            ];
            deliver(watcher, entries);
        }
    }
}

/// The name a watcher on `watch_path` should report for a change at
/// `parent_path`/`file_name`: just the leaf name for an exact-directory
/// match, or the path from the watcher's root down to the leaf for a
/// `watch_tree` match on a deeper ancestor (MS-SMB2 §2.2.35.1).
fn relative_name(watch_path: &str, parent_path: &str, file_name: &str) -> String {
    let watch = watch_path.trim_matches('/');
    let parent = parent_path.trim_matches('/');
    let suffix = parent.strip_prefix(watch).unwrap_or(parent).trim_start_matches('/');
    if suffix.is_empty() {
        file_name.to_string()
    } else {
        format!("{suffix}/{file_name}")
    }
}

fn remove_from_path_index(by_path: &mut HashMap<String, Vec<[u8; 16]>>, path: &str, file_id: &[u8; 16]) {
    if let Some(list) = by_path.get_mut(path) {
        list.retain(|id| id != file_id);
        if list.is_empty() {
            by_path.remove(path);
        }
    }
}

fn deliver(watcher: PendingNotify, entries: Vec<FileNotifyEntry>) {
    let encoded_len: usize = entries
        .iter()
        .map(|e| 4 + 4 + 4 + e.file_name.encode_utf16().count() * 2)
        .sum();
    if encoded_len as u32 > watcher.max_output {
        return;
    }
    let _ = watcher.delivery.send(NotifyDelivery {
        session_id: watcher.session_id,
        message_id: watcher.message_id,
        tree_id: watcher.tree_id,
        signed: watcher.signed,
        entries,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (UnboundedSender<NotifyDelivery>, tokio::sync::mpsc::UnboundedReceiver<NotifyDelivery>) {
        tokio::sync::mpsc::unbounded_channel()
    }

    #[test]
    fn notify_change_tree_delivers_and_deregisters() {
        let registry = NotifyRegistry::default();
        let (tx, mut rx) = channel();
        registry.register(PendingNotify {
            file_id: [1; 16],
            session_id: 1,
            message_id: 42,
            tree_id: 1,
            signed: false,
            watch_path: "/share".to_string(),
            share_name: "share".to_string(),
            completion_filter: SMBCompletionFilter::FILE_NAME | SMBCompletionFilter::DIR_NAME,
            watch_tree: true,
            max_output: 4096,
            delivery: tx,
        });

        registry.notify_change("share", "/share/docs", "readme.txt", SMBNotifyAction::Added);

        let delivery = rx.try_recv().expect("expected a delivery");
        assert_eq!(delivery.entries.len(), 1);
        assert_eq!(delivery.entries[0].file_name, "docs/readme.txt");
        assert_eq!(delivery.entries[0].action, SMBNotifyAction::Added);
        assert!(registry.unregister(&[1; 16]).is_none());
    }

    #[test]
    fn notify_change_reports_leaf_name_only_on_an_exact_directory_match() {
        let registry = NotifyRegistry::default();
        let (tx, mut rx) = channel();
        registry.register(PendingNotify {
            file_id: [4; 16],
            session_id: 1,
            message_id: 1,
            tree_id: 1,
            signed: false,
            watch_path: "/share/docs".to_string(),
            share_name: "share".to_string(),
            completion_filter: SMBCompletionFilter::FILE_NAME | SMBCompletionFilter::DIR_NAME,
            watch_tree: false,
            max_output: 4096,
            delivery: tx,
        });

        registry.notify_change("share", "/share/docs", "readme.txt", SMBNotifyAction::Added);

        let delivery = rx.try_recv().expect("expected a delivery");
        assert_eq!(delivery.entries[0].file_name, "readme.txt");
    }

    #[test]
    fn notify_rename_pairs_old_and_new() {
        let registry = NotifyRegistry::default();
        let (tx, mut rx) = channel();
        registry.register(PendingNotify {
            file_id: [2; 16],
            session_id: 1,
            message_id: 7,
            tree_id: 1,
            signed: false,
            watch_path: "/share".to_string(),
            share_name: "share".to_string(),
            completion_filter: SMBCompletionFilter::FILE_NAME,
            watch_tree: true,
            max_output: 4096,
            delivery: tx,
        });

        registry.notify_rename("share", "/share", "old.txt", "/share", "new.txt");

        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.entries.len(), 2);
        assert_eq!(delivery.entries[0].action, SMBNotifyAction::RenamedOldName);
        assert_eq!(delivery.entries[1].action, SMBNotifyAction::RenamedNewName);
    }

    #[test]
    fn exact_match_without_watch_tree_does_not_match_ancestor() {
        let registry = NotifyRegistry::default();
        let (tx, mut rx) = channel();
        registry.register(PendingNotify {
            file_id: [3; 16],
            session_id: 1,
            message_id: 1,
            tree_id: 1,
            signed: false,
            watch_path: "/share".to_string(),
            share_name: "share".to_string(),
            completion_filter: SMBCompletionFilter::FILE_NAME,
            watch_tree: false,
            max_output: 4096,
            delivery: tx,
        });

        registry.notify_change("share", "/share/docs", "readme.txt", SMBNotifyAction::Added);
        assert!(rx.try_recv().is_err());
        assert!(registry.unregister(&[3; 16]).is_some());
    }
}
