#![forbid(unsafe_code)]

//! Blocking byte-stream transport and NetBIOS session framing.
//!
//! The wire transport itself (the part that owns a socket) is, per the
//! protocol spec this crate implements, an external collaborator: callers
//! may supply their own [`Transport`] impl. [`TcpTransport`] is the default
//! one, wired up over `std::net::TcpStream`, so the crate is directly
//! usable without a caller-supplied transport.

pub mod error;
pub mod netbios;
pub mod tcp;
pub mod traits;

pub use error::TransportError;
pub use netbios::NetBiosFramer;
pub use tcp::{TcpTransport, SMB_PORT};
pub use traits::Transport;
