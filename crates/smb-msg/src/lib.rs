//! SMB1 wire message encoder/decoder.
//!
//! Covers the header, AndX chaining convention, and the dozen commands the
//! `smb` crate's `Connection` needs: NEGOTIATE, SESSION_SETUP_ANDX,
//! LOGOFF_ANDX, TREE_CONNECT_ANDX, TREE_DISCONNECT, ECHO, NT_CREATE_ANDX,
//! READ_ANDX, WRITE_ANDX, CLOSE, and the FIND_FIRST2 sub-command of
//! TRANSACTION2.

pub mod close;
pub mod create;
pub mod echo;
mod error;
pub mod header;
pub mod negotiate;
pub mod read;
pub mod session_setup;
pub mod trans2;
pub mod tree_connect;
pub mod write;

pub use error::{Result, SmbMsgError};
pub use header::{read_header, AndXHeader, Command, Flags2, Header, HeaderFlags, Status, ANDX_NONE};
