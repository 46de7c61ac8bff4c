//! SMB_COM_WRITE_ANDX.
//!
//! Reference: MS-CIFS 2.2.4.43.1.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::{AndXHeader, Header};

/// `SMB_COM_WRITE_ANDX` request. Word count is always 12: no `OffsetHigh`
/// word, since this client never sends a 64-bit offset.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub header: Header,
    #[bw(calc = 12)]
    #[br(temp, assert(_word_count == 12, "unexpected write word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub fid: u16,
    pub offset: u32,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u32,
    pub write_mode: u16,
    pub remaining: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _data_length_high: u16,
    #[bw(calc = data.len() as u16)]
    #[br(temp)]
    data_length: u16,
    #[bw(calc = (Header::STRUCT_SIZE + 1 + 2 * 12 + 2) as u16)]
    #[br(temp)]
    _data_offset: u16,
    #[bw(calc = data.len() as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[br(count = data_length)]
    pub data: Vec<u8>,
}

impl WriteRequest {
    pub fn new(header: Header, fid: u16, offset: u32, data: Vec<u8>) -> Self {
        let remaining = data.len() as u16;
        Self {
            header,
            andx: AndXHeader::NONE,
            fid,
            offset,
            write_mode: 0,
            remaining,
            data,
        }
    }
}

/// `SMB_COM_WRITE_ANDX` response. Word count is always 6.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResponse {
    pub header: Header,
    #[bw(calc = 6)]
    #[br(temp, assert(_word_count == 6, "unexpected write response word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub count: u16,
    pub available: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _count_high: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

pub fn read_write_response(buf: &[u8]) -> crate::Result<WriteResponse> {
    Ok(WriteResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_write_request(req: &WriteRequest) -> crate::Result<Vec<u8>> {
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
            mid: 8,
        }
    }

    #[test]
    fn request_round_trips_with_payload() {
        let req = WriteRequest::new(hdr(Command::WriteAndx), 42, 128, b"hello".to_vec());
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = WriteRequest::read(&mut Cursor::new(&buf.into_inner())).unwrap();
        assert_eq!(decoded.data, b"hello");
        assert_eq!(decoded.offset, 128);
    }

    #[test]
    fn response_round_trips() {
        let resp = WriteResponse {
            header: hdr(Command::WriteAndx),
            andx: AndXHeader::NONE,
            count: 5,
            available: 0,
        };
        let mut buf = Cursor::new(Vec::new());
        resp.write(&mut buf).unwrap();
        let decoded = read_write_response(&buf.into_inner()).unwrap();
        assert_eq!(decoded.count, 5);
    }
}
