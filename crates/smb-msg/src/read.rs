//! SMB_COM_READ_ANDX.
//!
//! Reference: MS-CIFS 2.2.4.42.2. Data lives past a parameter-block-relative
//! `DataOffset`, not immediately after `ByteCount`, so the response uses
//! `seek_before` to land on it regardless of any padding the server inserts.

use std::io::{Cursor, SeekFrom};

use binrw::prelude::*;

use crate::header::{AndXHeader, Header};

/// `SMB_COM_READ_ANDX` request. Word count is always 10 (no 64-bit offset
/// extension, which this client doesn't need for the file sizes it deals
/// with).
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub header: Header,
    #[bw(calc = 10)]
    #[br(temp, assert(_word_count == 10, "unexpected read word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub fid: u16,
    pub offset: u32,
    pub max_count: u16,
    pub min_count: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u32,
    pub remaining: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

impl ReadRequest {
    pub fn new(header: Header, fid: u16, offset: u32, count: u16) -> Self {
        Self {
            header,
            andx: AndXHeader::NONE,
            fid,
            offset,
            max_count: count,
            min_count: count,
            remaining: count,
        }
    }
}

/// `SMB_COM_READ_ANDX` response. Word count is always 12. This client never
/// sends one, so only decoding is implemented.
#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    pub header: Header,
    #[br(temp, assert(_word_count == 12, "unexpected read response word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub available: u16,
    #[br(temp)]
    _data_compaction_mode: u16,
    #[br(temp)]
    _reserved1: u16,
    data_length: u16,
    /// Offset of `data` from the start of the whole SMB message.
    data_offset: u16,
    #[br(temp)]
    _reserved2: [u8; 4],
    #[br(temp)]
    _byte_count: u16,
    #[br(seek_before = SeekFrom::Start(data_offset as u64), restore_position)]
    #[br(count = data_length)]
    pub data: Vec<u8>,
}

pub fn read_read_response(buf: &[u8]) -> crate::Result<ReadResponse> {
    Ok(ReadResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_read_request(req: &ReadRequest) -> crate::Result<Vec<u8>> {
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
            mid: 7,
        }
    }

    #[test]
    fn request_round_trips() {
        let req = ReadRequest::new(hdr(Command::ReadAndx), 42, 0, 4096);
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = ReadRequest::read(&mut Cursor::new(&buf.into_inner())).unwrap();
        assert_eq!(decoded, req);
    }
}
