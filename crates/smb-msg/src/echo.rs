//! SMB_COM_ECHO.
//!
//! Reference: MS-CIFS 2.2.4.38. Used by `Connection::test_connection` to
//! verify the link is alive without touching session or tree state.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::Header;

/// `SMB_COM_ECHO` request: an echo count and an opaque payload the server
/// must send back unmodified, once per requested repetition.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct EchoRequest {
    pub header: Header,
    #[bw(calc = 1)]
    #[br(temp, assert(_word_count == 1, "unexpected echo word count: {}", _word_count))]
    _word_count: u8,
    pub echo_count: u16,
    #[bw(calc = data.len() as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[br(count = _byte_count)]
    pub data: Vec<u8>,
}

impl EchoRequest {
    pub fn new(header: Header, data: Vec<u8>) -> Self {
        Self {
            header,
            echo_count: 1,
            data,
        }
    }
}

/// `SMB_COM_ECHO` response: echoes back the sequence number and payload.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct EchoResponse {
    pub header: Header,
    #[bw(calc = 1)]
    #[br(temp, assert(_word_count == 1, "unexpected echo response word count: {}", _word_count))]
    _word_count: u8,
    pub sequence_number: u16,
    #[bw(calc = data.len() as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[br(count = _byte_count)]
    pub data: Vec<u8>,
}

pub fn read_echo_response(buf: &[u8]) -> crate::Result<EchoResponse> {
    Ok(EchoResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_echo_request(req: &EchoRequest) -> crate::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    req.write(&mut buf)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Command, Flags2, HeaderFlags};

    fn hdr(command: Command) -> Header {
        Header {
            command,
            status: 0,
            flags: HeaderFlags::new(),
            flags2: Flags2::client_default(),
            tid: 1,
            pid_low: 0x1234,
            uid: 5,
            mid: 4,
        }
    }

    #[test]
    fn echoes_back_payload() {
        let req = EchoRequest::new(hdr(Command::Echo), b"F".to_vec());
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = EchoRequest::read(&mut Cursor::new(&buf.into_inner())).unwrap();
        assert_eq!(decoded.data, b"F");
    }

    #[test]
    fn response_round_trips() {
        let resp = EchoResponse {
            header: hdr(Command::Echo),
            sequence_number: 1,
            data: b"F".to_vec(),
        };
        let mut buf = Cursor::new(Vec::new());
        resp.write(&mut buf).unwrap();
        let decoded = read_echo_response(&buf.into_inner()).unwrap();
        assert_eq!(decoded.data, b"F");
    }
}
