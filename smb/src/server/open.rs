//! Open file handles: the `fileId(16 bytes) → FileHandle` table a
//! [`Connection`](crate::server::connection::Connection) owns.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LeaseState: u8 {
        const READ_CACHING = 0x1;
        const WRITE_CACHING = 0x2;
        const HANDLE_CACHING = 0x4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OplockState {
    None,
    LevelII,
    Exclusive,
    Batch,
    Lease { key: u128, state: LeaseState },
}

#[derive(Debug, Clone)]
pub struct FileHandle {
    pub file_id: [u8; 16],
    pub vfs_handle: u64,
    pub path: String,
    pub open_options: u32,
    pub share_access_mask: u32,
    pub read_offset_hint: u64,
    pub delete_on_close: bool,
    pub oplock_state: OplockState,
}

impl FileHandle {
    pub fn new(file_id: [u8; 16], vfs_handle: u64, path: String, open_options: u32, share_access_mask: u32) -> Self {
        Self {
            file_id,
            vfs_handle,
            path,
            open_options,
            share_access_mask,
            read_offset_hint: 0,
            delete_on_close: false,
            oplock_state: OplockState::None,
        }
    }
}
