//! The `Vfs` collaborator contract: everything the dispatcher needs from
//! a concrete filesystem implementation to service CREATE/READ/WRITE/
//! QUERY_INFO/SET_INFO/QUERY_DIRECTORY/CLOSE.

use smb_core::nt_status::NTStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateDisposition {
    Supersede,
    Open,
    Create,
    OpenIf,
    Overwrite,
    OverwriteIf,
}

/// The reason a VFS call failed, independent of any wire representation;
/// the dispatcher maps each variant to an NT_STATUS code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    NotADirectory,
    IsADirectory,
    NotEmpty,
    Io(String),
}

impl VfsError {
    pub fn status(&self) -> NTStatus {
        match self {
            VfsError::NotFound => NTStatus::NoSuchFile,
            VfsError::AlreadyExists => NTStatus::NameCollision,
            VfsError::PermissionDenied => NTStatus::AccessDenied,
            VfsError::NotADirectory | VfsError::IsADirectory | VfsError::NotEmpty => NTStatus::InvalidParameter,
            VfsError::Io(_) => NTStatus::UnexpectedIoError,
        }
    }
}

pub type VfsResult<T> = Result<T, VfsError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

/// An opaque handle a `Vfs` implementation hands back from `open` and
/// expects on every subsequent call. Implementations are free to box
/// whatever they need inside it.
pub type VfsHandle = u64;

/// The filesystem (or pipe-adjacent resource) backing a share.
///
/// Methods are synchronous: implementations that need to perform real
/// blocking I/O are expected to do so the way the rest of this crate
/// handles blocking work, via `tokio::task::spawn_blocking` at the call
/// site rather than inside the trait itself, keeping the trait object
/// safe without pulling in an async-trait shim.
pub trait Vfs: Send + Sync {
    fn open(&self, tree: &str, path: &str, disposition: CreateDisposition, options: u32) -> VfsResult<VfsHandle>;
    fn read(&self, handle: VfsHandle, offset: u64, len: u32) -> VfsResult<Vec<u8>>;
    fn write(&self, handle: VfsHandle, offset: u64, data: &[u8]) -> VfsResult<u32>;
    fn flush(&self, handle: VfsHandle) -> VfsResult<()>;
    fn query(&self, handle: VfsHandle, info_class: u8) -> VfsResult<Vec<u8>>;
    fn set(&self, handle: VfsHandle, info_class: u8, data: &[u8]) -> VfsResult<()>;
    fn readdir(&self, handle: VfsHandle, pattern: &str, cookie: u32) -> VfsResult<Vec<DirEntry>>;
    fn close(&self, handle: VfsHandle) -> VfsResult<()>;
    fn rename(&self, handle: VfsHandle, new_path: &str) -> VfsResult<()>;
    fn delete(&self, handle: VfsHandle) -> VfsResult<()>;
}
