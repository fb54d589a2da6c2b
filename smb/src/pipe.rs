//! The `PipeHandler` collaborator: named-pipe RPC routing for `IPC$`
//! trees. Only `lsarpc` and `srvsvc` are recognized; anything else is
//! rejected with `BAD_NETWORK_NAME` before it ever reaches a handler.

use smb_core::error::SMBError;
use smb_core::SMBResult;

pub trait PipeHandler: Send + Sync {
    fn bind(&self, request: &[u8]) -> SMBResult<Vec<u8>>;
    fn request(&self, pdu: &[u8]) -> SMBResult<Vec<u8>>;
}

/// Routes a pipe name to its handler, or rejects it outright.
#[derive(Default)]
pub struct PipeRouter {
    lsarpc: Option<Box<dyn PipeHandler>>,
    srvsvc: Option<Box<dyn PipeHandler>>,
}

impl PipeRouter {
    pub fn with_lsarpc(mut self, handler: Box<dyn PipeHandler>) -> Self {
        self.lsarpc = Some(handler);
        self
    }

    pub fn with_srvsvc(mut self, handler: Box<dyn PipeHandler>) -> Self {
        self.srvsvc = Some(handler);
        self
    }

    pub fn resolve(&self, pipe_name: &str) -> SMBResult<&dyn PipeHandler> {
        let handler = match pipe_name {
            "lsarpc" => self.lsarpc.as_deref(),
            "srvsvc" => self.srvsvc.as_deref(),
            _ => None,
        };
        handler.ok_or_else(|| SMBError::vfs_error(smb_core::nt_status::NTStatus::BadNetworkName, "unknown pipe name"))
    }
}
