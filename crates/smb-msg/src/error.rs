//! Wire-format decode/encode error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmbMsgError {
    #[error("binrw error: {0}")]
    BinRw(#[from] binrw::Error),

    #[error("codec error: {0}")]
    Codec(#[from] smb_dtyp::CodecError),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no status code definition for {0:#010x}")]
    MissingErrorCodeDefinition(u32),
}

pub type Result<T> = std::result::Result<T, SmbMsgError>;
