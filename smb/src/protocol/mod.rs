//! SMB2 wire protocol: headers, per-command bodies, and message framing.

pub mod body;
pub mod header;
pub mod message;

pub use header::{SMBCommandCode, SMBFlags, SMBHeaderContext, SMBStatus, SMBSyncHeader};
pub use message::{SMBRequestMessage, SMBResponseMessage};
