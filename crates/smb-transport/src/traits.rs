//! The `Transport` abstraction.
//!
//! Per the spec this crate implements, the byte-stream transport is an
//! external collaborator: a reliable, ordered, byte-oriented channel with
//! connect/send/recv/close. [`Transport`] is the seam `Connection` is
//! generic over, so the default [`crate::TcpTransport`] can be swapped for
//! a test double or an alternative channel without touching protocol code.

use std::net::Ipv4Addr;

use crate::TransportError;

/// A reliable, ordered, byte-oriented channel to a single remote endpoint.
///
/// Implementations are not required to be safe for concurrent use; the SMB1
/// client built on top of this trait never calls more than one method at a
/// time, and never recv()s before the preceding send() returns.
pub trait Transport {
    /// Opens the channel to `addr:port`. Calling `connect` on an
    /// already-connected transport is implementation-defined.
    fn connect(&mut self, addr: Ipv4Addr, port: u16) -> Result<(), TransportError>;

    /// Writes the entire buffer, blocking until done or an error occurs.
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError>;

    /// Fills `buf` completely, blocking until done or an error occurs.
    /// Returns [`TransportError::UnexpectedEof`] if the peer closes the
    /// channel before `buf` is full.
    fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError>;

    /// Closes the channel. Idempotent: calling it more than once is not an
    /// error.
    fn close(&mut self) -> Result<(), TransportError>;
}
