#![forbid(unsafe_code)]

//! A minimal, blocking SMB1/CIFS client for constrained environments.
//!
//! [`Connection`] drives the whole protocol lifecycle against a single
//! share: negotiate, authenticate with LM/NTLMv1, connect the tree, then
//! list directories and read/write files. It is generic over
//! [`smb_transport::Transport`] so production code can use the bundled
//! blocking [`smb_transport::TcpTransport`] while tests supply an
//! in-memory double.
//!
//! This crate deliberately does not speak SMB2/3, Kerberos, signing,
//! encryption, compression, or any form of concurrency — see `SPEC_FULL.md`
//! in the repository root for what's in and out of scope.

pub mod auth;
pub mod connection;
pub mod error;
pub mod file_info;

pub use connection::{Connection, ConnectionConfig, State};
pub use error::{Error, ErrorKind, Result};
pub use file_info::FileInfo;
pub use smb_transport::{TcpTransport, Transport, TransportError};
