//! Transport-layer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("transport I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("connection closed by peer before a full frame was read")]
    UnexpectedEof,

    #[error("NetBIOS session frame exceeds maximum length ({0} bytes)")]
    FrameTooLarge(usize),
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e)
    }
}
