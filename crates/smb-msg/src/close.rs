//! SMB_COM_CLOSE.
//!
//! Reference: MS-CIFS 2.2.4.6.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::Header;

/// `SMB_COM_CLOSE` request. Word count is always 3.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseRequest {
    pub header: Header,
    #[bw(calc = 3)]
    #[br(temp, assert(_word_count == 3, "unexpected close word count: {}", _word_count))]
    _word_count: u8,
    pub fid: u16,
    /// Last write time to set on close; `0xffff_ffff` means "don't change".
    pub last_write_time: u32,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

impl CloseRequest {
    pub fn new(header: Header, fid: u16) -> Self {
        Self {
            header,
            fid,
            last_write_time: 0xffff_ffff,
        }
    }
}

/// `SMB_COM_CLOSE` response: no parameters besides word/byte counts.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseResponse {
    pub header: Header,
    #[bw(calc = 0)]
    #[br(temp, assert(_word_count == 0))]
    _word_count: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

pub fn read_close_response(buf: &[u8]) -> crate::Result<CloseResponse> {
    Ok(CloseResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_close_request(req: &CloseRequest) -> crate::Result<Vec<u8>> {
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
            mid: 9,
        }
    }

    #[test]
    fn request_round_trips() {
        let req = CloseRequest::new(hdr(Command::Close), 42);
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = CloseRequest::read(&mut Cursor::new(&buf.into_inner())).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn response_round_trips() {
        let resp = CloseResponse {
            header: hdr(Command::Close),
        };
        let mut buf = Cursor::new(Vec::new());
        resp.write(&mut buf).unwrap();
        let decoded = read_close_response(&buf.into_inner()).unwrap();
        assert_eq!(decoded, resp);
    }
}
