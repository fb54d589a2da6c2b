pub mod cancel;
pub mod change_notify;
pub mod close;
pub mod create;
pub mod dialect;
pub mod echo;
pub mod empty;
pub mod error;
pub mod file_info;
pub mod flush;
pub mod ioctl;
pub mod lock;
pub mod logoff;
pub mod negotiate;
pub mod oplock_break;
pub mod query_directory;
pub mod query_info;
pub mod read;
pub mod session_setup;
pub mod set_info;
pub mod tree_connect;
pub mod tree_disconnect;
pub mod write;

use smb_core::codec::{Reader, Writer};
use smb_core::SMBResult;

use crate::protocol::header::SMBCommandCode;
use empty::SMBEmpty;
use error::SMBErrorResponse;

/// A parsed request body, tagged by the command it belongs to.
///
/// Every variant holds the command-specific fields already decoded off the
/// wire; the surrounding [`SMBSyncHeader`](crate::protocol::header::SMBSyncHeader)
/// carries the command code, credits, and session/tree identifiers that
/// dispatch depends on.
#[derive(Debug, Clone, PartialEq)]
pub enum SMBRequestBody {
    Negotiate(negotiate::SMBNegotiateRequest),
    SessionSetup(session_setup::SMBSessionSetupRequest),
    Logoff(logoff::SMBLogoffRequest),
    TreeConnect(tree_connect::SMBTreeConnectRequest),
    TreeDisconnect(tree_disconnect::SMBTreeDisconnectRequest),
    Create(create::SMBCreateRequest),
    Close(close::SMBCloseRequest),
    Flush(flush::SMBFlushRequest),
    Read(read::SMBReadRequest),
    Write(write::SMBWriteRequest),
    Lock(lock::SMBLockRequest),
    Ioctl(ioctl::SMBIoCtlRequest),
    Cancel(cancel::SMBCancelRequest),
    Echo(echo::SMBEchoRequest),
    QueryDirectory(query_directory::SMBQueryDirectoryRequest),
    ChangeNotify(change_notify::SMBChangeNotifyRequest),
    QueryInfo(query_info::SMBQueryInfoRequest),
    SetInfo(set_info::SMBSetInfoRequest),
    OplockBreak(oplock_break::SMBOplockBreakAcknowledgement),
}

impl SMBRequestBody {
    pub fn parse(command: SMBCommandCode, reader: &mut Reader) -> SMBResult<Self> {
        Ok(match command {
            SMBCommandCode::Negotiate => Self::Negotiate(negotiate::SMBNegotiateRequest::parse(reader)?),
            SMBCommandCode::SessionSetup => Self::SessionSetup(session_setup::SMBSessionSetupRequest::parse(reader)?),
            SMBCommandCode::Logoff => Self::Logoff(logoff::SMBLogoffRequest::parse(reader)?),
            SMBCommandCode::TreeConnect => Self::TreeConnect(tree_connect::SMBTreeConnectRequest::parse(reader)?),
            SMBCommandCode::TreeDisconnect => Self::TreeDisconnect(tree_disconnect::SMBTreeDisconnectRequest::parse(reader)?),
            SMBCommandCode::Create => Self::Create(create::SMBCreateRequest::parse(reader)?),
            SMBCommandCode::Close => Self::Close(close::SMBCloseRequest::parse(reader)?),
            SMBCommandCode::Flush => Self::Flush(flush::SMBFlushRequest::parse(reader)?),
            SMBCommandCode::Read => Self::Read(read::SMBReadRequest::parse(reader)?),
            SMBCommandCode::Write => Self::Write(write::SMBWriteRequest::parse(reader)?),
            SMBCommandCode::Lock => Self::Lock(lock::SMBLockRequest::parse(reader)?),
            SMBCommandCode::Ioctl => Self::Ioctl(ioctl::SMBIoCtlRequest::parse(reader)?),
            SMBCommandCode::Cancel => Self::Cancel(cancel::SMBCancelRequest::parse(reader)?),
            SMBCommandCode::Echo => Self::Echo(echo::SMBEchoRequest::parse(reader)?),
            SMBCommandCode::QueryDirectory => Self::QueryDirectory(query_directory::SMBQueryDirectoryRequest::parse(reader)?),
            SMBCommandCode::ChangeNotify => Self::ChangeNotify(change_notify::SMBChangeNotifyRequest::parse(reader)?),
            SMBCommandCode::QueryInfo => Self::QueryInfo(query_info::SMBQueryInfoRequest::parse(reader)?),
            SMBCommandCode::SetInfo => Self::SetInfo(set_info::SMBSetInfoRequest::parse(reader)?),
            SMBCommandCode::OplockBreak => Self::OplockBreak(oplock_break::SMBOplockBreakAcknowledgement::parse(reader)?),
        })
    }

    pub fn command(&self) -> SMBCommandCode {
        match self {
            Self::Negotiate(_) => SMBCommandCode::Negotiate,
            Self::SessionSetup(_) => SMBCommandCode::SessionSetup,
            Self::Logoff(_) => SMBCommandCode::Logoff,
            Self::TreeConnect(_) => SMBCommandCode::TreeConnect,
            Self::TreeDisconnect(_) => SMBCommandCode::TreeDisconnect,
            Self::Create(_) => SMBCommandCode::Create,
            Self::Close(_) => SMBCommandCode::Close,
            Self::Flush(_) => SMBCommandCode::Flush,
            Self::Read(_) => SMBCommandCode::Read,
            Self::Write(_) => SMBCommandCode::Write,
            Self::Lock(_) => SMBCommandCode::Lock,
            Self::Ioctl(_) => SMBCommandCode::Ioctl,
            Self::Cancel(_) => SMBCommandCode::Cancel,
            Self::Echo(_) => SMBCommandCode::Echo,
            Self::QueryDirectory(_) => SMBCommandCode::QueryDirectory,
            Self::ChangeNotify(_) => SMBCommandCode::ChangeNotify,
            Self::QueryInfo(_) => SMBCommandCode::QueryInfo,
            Self::SetInfo(_) => SMBCommandCode::SetInfo,
            Self::OplockBreak(_) => SMBCommandCode::OplockBreak,
        }
    }
}

/// A response body ready to be written onto the wire, tagged by command.
///
/// `Error` is the one variant with no corresponding request arm: the
/// dispatcher returns it for any command whenever the header's `status`
/// field is non-zero, regardless of which command produced the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SMBResponseBody {
    Negotiate(negotiate::SMBNegotiateResponseBody),
    SessionSetup(session_setup::SMBSessionSetupResponse),
    Logoff(logoff::SMBLogoffResponse),
    TreeConnect(tree_connect::SMBTreeConnectResponse),
    TreeDisconnect(tree_disconnect::SMBTreeDisconnectResponse),
    Create(create::SMBCreateResponseBody),
    Close(close::SMBCloseResponse),
    Flush(SMBEmpty),
    Read(read::SMBReadResponse),
    Write(write::SMBWriteResponse),
    Lock(SMBEmpty),
    Ioctl(ioctl::SMBIoCtlResponse),
    Echo(echo::SMBEchoResponse),
    QueryDirectory(query_directory::SMBQueryDirectoryResponse),
    ChangeNotify(change_notify::SMBChangeNotifyResponse),
    QueryInfo(query_info::SMBQueryInfoResponse),
    SetInfo(set_info::SMBSetInfoResponse),
    OplockBreak(oplock_break::SMBOplockBreakContent),
    Error(SMBErrorResponse),
}

impl SMBResponseBody {
    pub fn write(&self, writer: &mut Writer) {
        match self {
            Self::Negotiate(body) => body.write(writer),
            Self::SessionSetup(body) => body.write(writer),
            Self::Logoff(body) => body.write(writer),
            Self::TreeConnect(body) => body.write(writer),
            Self::TreeDisconnect(body) => body.write(writer),
            Self::Create(body) => body.write(writer),
            Self::Close(body) => body.write(writer),
            Self::Flush(body) => body.write(writer),
            Self::Read(body) => body.write(writer),
            Self::Write(body) => body.write(writer),
            Self::Lock(body) => body.write(writer),
            Self::Ioctl(body) => body.write(writer),
            Self::Echo(body) => body.write(writer),
            Self::QueryDirectory(body) => body.write(writer),
            Self::ChangeNotify(body) => body.write(writer),
            Self::QueryInfo(body) => body.write(writer),
            Self::SetInfo(body) => body.write(writer),
            Self::OplockBreak(body) => body.write(writer),
            Self::Error(body) => body.write(writer),
        }
    }
}
