//! Default blocking [`Transport`] over `std::net::TcpStream`.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddrV4, TcpStream};
use std::time::Duration;

use crate::{Transport, TransportError};

/// The well-known SMB-over-TCP port (no NetBIOS session service).
pub const SMB_PORT: u16 = 445;

/// Blocking TCP transport. Disables Nagle's algorithm, since SMB1 request/
/// response traffic is small and latency-sensitive and there is never more
/// than one outstanding request per connection to coalesce.
pub struct TcpTransport {
    stream: Option<TcpStream>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self {
            stream: None,
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Builds a transport that applies the given read/write timeouts to
    /// every connection it opens.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            stream: None,
            read_timeout: Some(timeout),
            write_timeout: Some(timeout),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, addr: Ipv4Addr, port: u16) -> Result<(), TransportError> {
        let stream =
            TcpStream::connect(SocketAddrV4::new(addr, port)).map_err(TransportError::Connect)?;
        stream.set_nodelay(true).map_err(TransportError::Connect)?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(TransportError::Connect)?;
        stream
            .set_write_timeout(self.write_timeout)
            .map_err(TransportError::Connect)?;
        log::debug!("connected to {addr}:{port}");
        self.stream = Some(stream);
        Ok(())
    }

    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::UnexpectedEof)?;
        stream.write_all(buf)?;
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::UnexpectedEof)?;
        stream.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                TransportError::UnexpectedEof
            } else {
                TransportError::Io(e)
            }
        })
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(stream) = self.stream.take() {
            // A shutdown error on an already-dead socket is not interesting.
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        Ok(())
    }
}
