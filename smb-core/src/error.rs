use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

use crate::nt_status::NTStatus;

/// Top-level error type shared by the codec, crypto, and server layers.
///
/// Every variant knows how to map itself onto an [`NTStatus`] so dispatch
/// code never has to re-derive a status from a bare string.
#[derive(Debug)]
pub enum SMBError {
    ParseError(SMBParseError),
    CryptoError(SMBCryptoError),
    PreconditionFailed(SMBPreconditionFailedError),
    IOError(SMBIOError),
    ResponseError(SMBResponseError),
    PayloadTooSmall(SMBPayloadTooSmallError),
    ServerError(SMBServerError),
    WireDecodeError(SMBWireDecodeError),
    AuthError(SMBAuthError),
    SigningError(SMBSigningError),
    CreditError(SMBCreditError),
    VfsError(SMBVfsError),
    Fatal(SMBFatalError),
}

impl SMBError {
    pub fn parse_error<T: Into<SMBParseError>>(error: T) -> Self {
        Self::ParseError(error.into())
    }

    pub fn crypto_error<T: Into<SMBCryptoError>>(error: T) -> Self {
        Self::CryptoError(error.into())
    }

    pub fn precondition_failed<T: Into<SMBPreconditionFailedError>>(error: T) -> Self {
        Self::PreconditionFailed(error.into())
    }

    pub fn io_error<T: Into<SMBIOError>>(error: T) -> Self {
        Self::IOError(error.into())
    }

    pub fn response_error<T: Into<SMBResponseError>>(error: T) -> Self {
        Self::ResponseError(error.into())
    }

    pub fn payload_too_small<T: Into<usize>, U: Into<usize>>(expected: T, actual: U) -> Self {
        Self::PayloadTooSmall((expected, actual).into())
    }

    pub fn server_error<T: Into<SMBServerError>>(error: T) -> Self {
        Self::ServerError(error.into())
    }

    pub fn wire_decode<T: Into<String>>(message: T) -> Self {
        Self::WireDecodeError(SMBWireDecodeError { message: message.into() })
    }

    pub fn auth_error<T: Into<String>>(message: T) -> Self {
        Self::AuthError(SMBAuthError { message: message.into() })
    }

    pub fn signing_error<T: Into<String>>(message: T) -> Self {
        Self::SigningError(SMBSigningError { message: message.into() })
    }

    pub fn credit_error<T: Into<String>>(message: T) -> Self {
        Self::CreditError(SMBCreditError { message: message.into() })
    }

    pub fn vfs_error(status: NTStatus, message: impl Into<String>) -> Self {
        Self::VfsError(SMBVfsError { status, message: message.into() })
    }

    pub fn fatal<T: Into<String>>(message: T) -> Self {
        Self::Fatal(SMBFatalError { message: message.into() })
    }

    /// Status code a dispatcher should surface for this error. Most kinds
    /// map to a fixed status; `VfsError` carries its own because the VFS
    /// boundary produces a range of outcomes.
    pub fn status(&self) -> NTStatus {
        match self {
            Self::ParseError(_) | Self::WireDecodeError(_) | Self::PayloadTooSmall(_) => NTStatus::InvalidParameter,
            Self::CryptoError(_) => NTStatus::InvalidParameter,
            Self::PreconditionFailed(_) => NTStatus::InvalidParameter,
            Self::IOError(_) => NTStatus::UnexpectedIoError,
            Self::ResponseError(_) => NTStatus::InvalidParameter,
            Self::ServerError(_) => NTStatus::UnexpectedIoError,
            Self::AuthError(_) => NTStatus::StatusLogonFailure,
            Self::SigningError(_) => NTStatus::AccessDenied,
            Self::CreditError(_) => NTStatus::InvalidParameter,
            Self::VfsError(e) => e.status.clone(),
            Self::Fatal(_) => NTStatus::UnexpectedIoError,
        }
    }

    /// Whether this error should tear down the connection rather than
    /// just fail the one request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

#[derive(Debug)]
pub struct SMBParseError {
    error: Box<dyn Error + Send + Sync>,
}

impl<T: Into<Box<dyn Error + Send + Sync>>> From<T> for SMBParseError {
    fn from(value: T) -> Self {
        Self {
            error: value.into()
        }
    }
}

impl Display for SMBParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse failed with error: {}", self.error)
    }
}

#[derive(Debug)]
pub struct SMBCryptoError {
    message: String,
}

impl<T: Into<String>> From<T> for SMBCryptoError {
    fn from(value: T) -> Self {
        Self {
            message: value.into()
        }
    }
}

impl Display for SMBCryptoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crypto operation failed with error: {}", self.message)
    }
}

#[derive(Debug)]
pub struct SMBPreconditionFailedError {
    message: String,
}

impl<T: Into<String>> From<T> for SMBPreconditionFailedError {
    fn from(value: T) -> Self {
        Self {
            message: value.into()
        }
    }
}

impl Display for SMBPreconditionFailedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation failed with unmet precondition: {}", self.message)
    }
}

#[derive(Debug)]
pub struct SMBIOError {
    error: io::Error,
}

impl<T: Into<io::Error>> From<T> for SMBIOError {
    fn from(value: T) -> Self {
        Self {
            error: value.into()
        }
    }
}

impl Display for SMBIOError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMB I/O operation failed with error: {}", self.error)
    }
}

#[derive(Debug)]
pub struct SMBResponseError {
    message: String,
}

impl<T: Into<String>> From<T> for SMBResponseError {
    fn from(value: T) -> Self {
        Self {
            message: value.into()
        }
    }
}

impl Display for SMBResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMB response generation failed with: {}", self.message)
    }
}

#[derive(Debug)]
pub struct SMBPayloadTooSmallError {
    expected: usize,
    actual: usize,
}

impl<T: Into<usize>, U: Into<usize>> From<(T, U)> for SMBPayloadTooSmallError {
    fn from(value: (T, U)) -> Self {
        Self {
            expected: value.0.into(),
            actual: value.1.into(),
        }
    }
}

impl Display for SMBPayloadTooSmallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expected {} bytes, was actually {} bytes", self.expected, self.actual)
    }
}

#[derive(Debug)]
pub struct SMBServerError {
    error: Box<dyn Error + Send + Sync>,
}

impl<T: Into<Box<dyn Error + Send + Sync>>> From<T> for SMBServerError {
    fn from(value: T) -> Self {
        Self {
            error: value.into()
        }
    }
}

impl Display for SMBServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Server operation failed with error: {}", self.error)
    }
}

/// Short read, mismatched structure size, or bad alignment while decoding
/// a message body off the wire.
#[derive(Debug)]
pub struct SMBWireDecodeError {
    message: String,
}

impl Display for SMBWireDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wire decode failed: {}", self.message)
    }
}

/// NTLMv2 mismatch or Kerberos failure during SESSION_SETUP.
#[derive(Debug)]
pub struct SMBAuthError {
    message: String,
}

impl Display for SMBAuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Authentication failed: {}", self.message)
    }
}

/// Signature verification failure on an established, signing-required session.
#[derive(Debug)]
pub struct SMBSigningError {
    message: String,
}

impl Display for SMBSigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature verification failed: {}", self.message)
    }
}

/// Zero-credit-charge violation or credit overflow.
#[derive(Debug)]
pub struct SMBCreditError {
    message: String,
}

impl Display for SMBCreditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credit accounting failed: {}", self.message)
    }
}

/// An error surfaced by the VFS boundary, already mapped to the NT_STATUS
/// a dispatcher should return to the client.
#[derive(Debug)]
pub struct SMBVfsError {
    status: NTStatus,
    message: String,
}

impl Display for SMBVfsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "VFS operation failed ({:?}): {}", self.status, self.message)
    }
}

/// Protocol-id mismatch after the SMB1 redirect dance, an oversize frame,
/// or an I/O failure severe enough to close the connection.
#[derive(Debug)]
pub struct SMBFatalError {
    message: String,
}

impl Display for SMBFatalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fatal connection error: {}", self.message)
    }
}

impl Display for SMBError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseError(x) => write!(f, "{}", x),
            Self::CryptoError(x) => write!(f, "{}", x),
            Self::PreconditionFailed(x) => write!(f, "{}", x),
            Self::IOError(x) => write!(f, "{}", x),
            Self::ResponseError(x) => write!(f, "{}", x),
            Self::PayloadTooSmall(x) => write!(f, "{}", x),
            Self::ServerError(x) => write!(f, "{}", x),
            Self::WireDecodeError(x) => write!(f, "{}", x),
            Self::AuthError(x) => write!(f, "{}", x),
            Self::SigningError(x) => write!(f, "{}", x),
            Self::CreditError(x) => write!(f, "{}", x),
            Self::VfsError(x) => write!(f, "{}", x),
            Self::Fatal(x) => write!(f, "{}", x),
        }
    }
}

impl std::error::Error for SMBError {}
