//! Client-facing error taxonomy.
//!
//! Every fallible [`crate::Connection`] operation returns [`Error`]; the
//! connection also remembers the most recent one so callers that prefer a
//! C-style "call, then check" flow can use
//! [`crate::Connection::take_last_error`] instead of matching on a
//! `Result`.

use thiserror::Error;

/// Coarse category of a failure, independent of the specific operation
/// that produced it. Mirrors the taxonomy the reference client exposes to
/// callers that branch on failure kind rather than message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied argument was invalid (empty path, zero-length
    /// buffer where one is required, etc.) — no bytes went on the wire.
    ParameterInvalid,
    /// A general, otherwise-uncategorized failure.
    GeneralSystemError,
    /// The transport connection failed, or dropped mid-operation.
    ConnectionProblem,
    /// The server sent something this client's wire codec rejects.
    ProtocolError,
    /// The server returned `STATUS_ACCESS_DENIED` or `STATUS_LOGON_FAILURE`.
    AccessDenied,
    /// The server returned `STATUS_OBJECT_NAME_NOT_FOUND`/`NO_SUCH_FILE`.
    NotFound,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    ParameterInvalid(String),

    #[error("{0}")]
    GeneralSystemError(String),

    #[error("connection problem: {0}")]
    ConnectionProblem(#[from] smb_transport::TransportError),

    #[error("response mid {got:#06x} does not match request mid {expected:#06x}")]
    MidMismatch { expected: u16, got: u16 },

    #[error("protocol error: {0}")]
    ProtocolError(#[from] smb_msg::SmbMsgError),

    #[error("access denied")]
    AccessDenied,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation invalid in current state: {0}")]
    InvalidState(String),

    #[error("server returned {0}")]
    ServerStatus(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ParameterInvalid(_) => ErrorKind::ParameterInvalid,
            Error::GeneralSystemError(_) | Error::InvalidState(_) => ErrorKind::GeneralSystemError,
            Error::ConnectionProblem(_) | Error::MidMismatch { .. } => ErrorKind::ConnectionProblem,
            Error::ProtocolError(_) => ErrorKind::ProtocolError,
            Error::AccessDenied => ErrorKind::AccessDenied,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::ServerStatus(_) => ErrorKind::ProtocolError,
        }
    }
}

/// Maps a non-success NT status from a response header into an [`Error`],
/// for the handful of statuses this client treats specially.
pub fn error_for_status(status: u32) -> Error {
    match smb_msg::Status::try_from(status) {
        Ok(smb_msg::Status::AccessDenied) | Ok(smb_msg::Status::LogonFailure) => Error::AccessDenied,
        Ok(smb_msg::Status::ObjectNameNotFound) | Ok(smb_msg::Status::NoSuchFile) => {
            Error::NotFound(smb_msg::Status::describe(status))
        }
        _ => Error::ServerStatus(smb_msg::Status::describe(status)),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
