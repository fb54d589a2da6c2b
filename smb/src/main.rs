//! `smbd`: a minimal standalone server binary wiring a local-filesystem
//! [`Vfs`] and an environment-backed [`CredentialStore`] into the
//! library's [`Dispatcher`]/[`run_acceptor`] pipeline.
//!
//! Grounded on the teacher's `main.rs` entry point (`#[tokio::main]`,
//! `SMB_PORT` env var, `tracing_subscriber` setup behind the `tracing`
//! feature) with the teacher's generic `SMBServerBuilder`/`DefaultShare`
//! machinery replaced by this crate's concrete `ServerConfig`/`Dispatcher`.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use smb_core::logging::info;
use smb_core::SMBResult;

use smb::auth::ntlm::CredentialStore;
use smb::server::acceptor::run_acceptor;
use smb::server::config::{LiveSettings, ServerConfig};
use smb::server::dispatcher::Dispatcher;
use smb::vfs::{CreateDisposition, DirEntry, Vfs, VfsError, VfsHandle, VfsResult};

/// Serves a single directory tree rooted at `root`, ignoring the share
/// name in every call (this binary only ever offers one share).
struct LocalFs {
    root: PathBuf,
    next_handle: AtomicU64,
    open_files: Mutex<HashMap<VfsHandle, (PathBuf, File)>>,
}

impl LocalFs {
    fn new(root: PathBuf) -> Self {
        Self { root, next_handle: AtomicU64::new(1), open_files: Mutex::new(HashMap::new()) }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches(['\\', '/']).replace('\\', "/"))
    }

    fn io_err(err: std::io::Error) -> VfsError {
        match err.kind() {
            std::io::ErrorKind::NotFound => VfsError::NotFound,
            std::io::ErrorKind::AlreadyExists => VfsError::AlreadyExists,
            std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied,
            _ => VfsError::Io(err.to_string()),
        }
    }
}

impl Vfs for LocalFs {
    fn open(&self, _tree: &str, path: &str, disposition: CreateDisposition, _options: u32) -> VfsResult<VfsHandle> {
        let full_path = self.resolve(path);
        if full_path.is_dir() {
            let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
            self.open_files.lock().unwrap().insert(handle, (full_path, tempfile()?));
            return Ok(handle);
        }

        let mut options = OpenOptions::new();
        options.read(true).write(true);
        match disposition {
            CreateDisposition::Supersede | CreateDisposition::Overwrite | CreateDisposition::OverwriteIf => {
                options.create(true).truncate(true);
            }
            CreateDisposition::Create => {
                options.create_new(true);
            }
            CreateDisposition::OpenIf => {
                options.create(true);
            }
            CreateDisposition::Open => {}
        }
        let file = options.open(&full_path).map_err(Self::io_err)?;
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.open_files.lock().unwrap().insert(handle, (full_path, file));
        Ok(handle)
    }

    fn read(&self, handle: VfsHandle, offset: u64, len: u32) -> VfsResult<Vec<u8>> {
        let mut guard = self.open_files.lock().unwrap();
        let (_, file) = guard.get_mut(&handle).ok_or(VfsError::NotFound)?;
        file.seek(SeekFrom::Start(offset)).map_err(Self::io_err)?;
        let mut data = vec![0u8; len as usize];
        let read = file.read(&mut data).map_err(Self::io_err)?;
        data.truncate(read);
        Ok(data)
    }

    fn write(&self, handle: VfsHandle, offset: u64, data: &[u8]) -> VfsResult<u32> {
        let mut guard = self.open_files.lock().unwrap();
        let (_, file) = guard.get_mut(&handle).ok_or(VfsError::NotFound)?;
        file.seek(SeekFrom::Start(offset)).map_err(Self::io_err)?;
        file.write_all(data).map_err(Self::io_err)?;
        Ok(data.len() as u32)
    }

    fn flush(&self, handle: VfsHandle) -> VfsResult<()> {
        let mut guard = self.open_files.lock().unwrap();
        let (_, file) = guard.get_mut(&handle).ok_or(VfsError::NotFound)?;
        file.flush().map_err(Self::io_err)
    }

    fn query(&self, handle: VfsHandle, _info_class: u8) -> VfsResult<Vec<u8>> {
        let guard = self.open_files.lock().unwrap();
        let (path, _) = guard.get(&handle).ok_or(VfsError::NotFound)?;
        let metadata = std::fs::metadata(path).map_err(Self::io_err)?;
        let mut out = Vec::with_capacity(8);
        out.extend_from_slice(&metadata.len().to_le_bytes());
        Ok(out)
    }

    fn set(&self, _handle: VfsHandle, _info_class: u8, _data: &[u8]) -> VfsResult<()> {
        Ok(())
    }

    fn readdir(&self, handle: VfsHandle, pattern: &str, _cookie: u32) -> VfsResult<Vec<DirEntry>> {
        let guard = self.open_files.lock().unwrap();
        let (path, _) = guard.get(&handle).ok_or(VfsError::NotFound)?;
        if !path.is_dir() {
            return Err(VfsError::NotADirectory);
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(Self::io_err)? {
            let entry = entry.map_err(Self::io_err)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if pattern != "*" && !pattern.is_empty() && name != pattern {
                continue;
            }
            let metadata = entry.metadata().map_err(Self::io_err)?;
            entries.push(DirEntry { name, is_directory: metadata.is_dir(), size: metadata.len() });
        }
        Ok(entries)
    }

    fn close(&self, handle: VfsHandle) -> VfsResult<()> {
        self.open_files.lock().unwrap().remove(&handle).ok_or(VfsError::NotFound)?;
        Ok(())
    }

    fn rename(&self, handle: VfsHandle, new_path: &str) -> VfsResult<()> {
        let mut guard = self.open_files.lock().unwrap();
        let (path, _) = guard.get_mut(&handle).ok_or(VfsError::NotFound)?;
        let target = self.resolve(new_path);
        std::fs::rename(&path, &target).map_err(Self::io_err)?;
        *path = target;
        Ok(())
    }

    fn delete(&self, handle: VfsHandle) -> VfsResult<()> {
        let mut guard = self.open_files.lock().unwrap();
        let (path, _) = guard.remove(&handle).ok_or(VfsError::NotFound)?;
        if path.is_dir() {
            std::fs::remove_dir(&path).map_err(Self::io_err)
        } else {
            std::fs::remove_file(&path).map_err(Self::io_err)
        }
    }
}

/// A directory handle carries no real file descriptor; this stands in
/// for one so `open_files` can hold a uniform `(PathBuf, File)` pair.
fn tempfile() -> VfsResult<File> {
    File::open(Path::new(if cfg!(windows) { "NUL" } else { "/dev/null" })).map_err(LocalFs::io_err)
}

/// Looks credentials up from `SMBD_USER`/`SMBD_PASSWORD`; a deployment
/// backed by a directory service would implement `CredentialStore`
/// against that instead.
struct EnvCredentials {
    user: String,
    password: String,
}

impl CredentialStore for EnvCredentials {
    fn password_for(&self, user: &str, _domain: &str) -> Option<String> {
        if user.eq_ignore_ascii_case(&self.user) {
            Some(self.password.clone())
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> SMBResult<()> {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let port: u16 = std::env::var("SMBD_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(445);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let share_root = std::env::var("SMBD_SHARE_ROOT").unwrap_or_else(|_| ".".to_string());
    let vfs = Arc::new(LocalFs::new(PathBuf::from(share_root)));

    let credentials = EnvCredentials {
        user: std::env::var("SMBD_USER").unwrap_or_else(|_| "guest".to_string()),
        password: std::env::var("SMBD_PASSWORD").unwrap_or_else(|_| "guest".to_string()),
    };

    let config = Arc::new(ServerConfig::new(addr, LiveSettings::default()));
    let dispatcher = Arc::new(Dispatcher::new(config.clone(), vfs, credentials));

    info!(port, "SMB server starting");
    run_acceptor(config, dispatcher, uuid::Uuid::new_v4()).await
}
