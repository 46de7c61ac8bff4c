//! NetBIOS session service message framing.
//!
//! Every SMB message on the wire is preceded by a 4-byte header: a 1-byte
//! message type (`0x00` for a session message), a reserved byte, and a
//! 16-bit **big-endian** payload length. This is the only big-endian field
//! anywhere in the protocol this crate speaks; every SMB1 integer is
//! little-endian.

use crate::{Transport, TransportError};

const SESSION_MESSAGE: u8 = 0x00;
/// NetBIOS session service length field is 16 bits, 0 reserved bits used
/// here (the 17-bit/24-bit extensions some stacks use are not needed for
/// plain SMB1 traffic).
const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Wraps a [`Transport`] with NetBIOS session message framing.
pub struct NetBiosFramer<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: Transport + ?Sized> NetBiosFramer<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// Sends `payload` as a single NetBIOS session message.
    pub fn send_message(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(TransportError::FrameTooLarge(payload.len()));
        }
        let len = payload.len() as u16;
        let mut header = [0u8; 4];
        header[0] = SESSION_MESSAGE;
        header[1] = 0;
        header[2..4].copy_from_slice(&len.to_be_bytes());

        self.transport.send(&header)?;
        self.transport.send(payload)?;
        Ok(())
    }

    /// Blocks until a full NetBIOS session message is received, returning
    /// its payload. Loops internally over short reads; a partial frame
    /// (peer disconnects mid-message) is a [`TransportError::UnexpectedEof`].
    pub fn recv_message(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut header = [0u8; 4];
        self.transport.recv(&mut header)?;

        if header[0] != SESSION_MESSAGE {
            // Any other NetBIOS message type (keepalive, session
            // request/response) is out of scope for a direct TCP/445
            // connection; treat it as a framing error.
            return Err(TransportError::UnexpectedEof);
        }

        let len = u16::from_be_bytes([header[2], header[3]]) as usize;
        let mut payload = vec![0u8; len];
        self.transport.recv(&mut payload)?;
        Ok(payload)
    }
}
