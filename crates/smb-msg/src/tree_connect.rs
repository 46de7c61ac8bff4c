//! SMB_COM_TREE_CONNECT_ANDX and SMB_COM_TREE_DISCONNECT.
//!
//! Reference: MS-CIFS 2.2.4.55 (unpassworded, non-extended-security share
//! connect only — this client never connects to password-protected shares).

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::{AndXHeader, Header};

/// `SMB_COM_TREE_CONNECT_ANDX` request.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct TreeConnectRequest {
    pub header: Header,
    #[bw(calc = 4)]
    #[br(temp, assert(_word_count == 4, "unexpected tree connect word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub flags: u16,
    #[bw(calc = password.len() as u16)]
    #[br(temp)]
    password_len: u16,
    #[bw(calc = (password.len() + path.len() + 1 + service.len() + 1) as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[br(count = password_len)]
    pub password: Vec<u8>,
    /// UNC path, e.g. `\\SERVER\share`, ASCII/OEM and null-terminated.
    pub path: binrw::NullString,
    /// Service type string, e.g. `"?????"` (any) or `"A:"` (disk).
    pub service: binrw::NullString,
}

impl TreeConnectRequest {
    pub fn new(header: Header, unc_path: &str) -> Self {
        Self {
            header,
            andx: AndXHeader::NONE,
            flags: 0,
            password: Vec::new(),
            path: unc_path.into(),
            service: "?????".into(),
        }
    }
}

/// `SMB_COM_TREE_CONNECT_ANDX` response.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct TreeConnectResponse {
    pub header: Header,
    #[bw(calc = 3)]
    #[br(temp, assert(_word_count == 3, "unexpected tree connect response word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub optional_support: u16,
    #[bw(calc = (service.len() + 1 + native_file_system.len() + 1) as u16)]
    #[br(temp)]
    _byte_count: u16,
    pub service: binrw::NullString,
    pub native_file_system: binrw::NullString,
}

/// `SMB_COM_TREE_DISCONNECT` request/response: no parameters.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeDisconnect {
    pub header: Header,
    #[bw(calc = 0)]
    #[br(temp, assert(_word_count == 0))]
    _word_count: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

impl TreeDisconnect {
    pub fn new(header: Header) -> Self {
        Self { header }
    }
}

pub fn read_tree_connect_response(buf: &[u8]) -> crate::Result<TreeConnectResponse> {
    Ok(TreeConnectResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_tree_connect_request(req: &TreeConnectRequest) -> crate::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    req.write(&mut buf)?;
    Ok(buf.into_inner())
}

pub fn read_tree_disconnect(buf: &[u8]) -> crate::Result<TreeDisconnect> {
    Ok(TreeDisconnect::read(&mut Cursor::new(buf))?)
}

pub fn write_tree_disconnect_request(req: &TreeDisconnect) -> crate::Result<Vec<u8>> {
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
            tid: 0,
            pid_low: 0x1234,
            uid: 5,
            mid: 3,
        }
    }

    #[test]
    fn request_round_trips_with_unc_path() {
        let req = TreeConnectRequest::new(hdr(Command::TreeConnectAndx), r"\\server\share");
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = TreeConnectRequest::read(&mut Cursor::new(&buf.into_inner())).unwrap();
        assert_eq!(decoded, req);
        assert_eq!(decoded.path.to_string(), r"\\server\share");
    }

    #[test]
    fn response_round_trips() {
        let resp = TreeConnectResponse {
            header: hdr(Command::TreeConnectAndx),
            andx: AndXHeader::NONE,
            optional_support: 0,
            service: "A:".into(),
            native_file_system: "NTFS".into(),
        };
        let mut buf = Cursor::new(Vec::new());
        resp.write(&mut buf).unwrap();
        let decoded = read_tree_connect_response(&buf.into_inner()).unwrap();
        assert_eq!(decoded.native_file_system.to_string(), "NTFS");
    }

    #[test]
    fn tree_disconnect_round_trips() {
        let req = TreeDisconnect::new(hdr(Command::TreeDisconnect));
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = read_tree_disconnect(&buf.into_inner()).unwrap();
        assert_eq!(decoded, req);
    }
}
