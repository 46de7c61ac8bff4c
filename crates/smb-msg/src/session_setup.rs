//! SMB_COM_SESSION_SETUP_ANDX and SMB_COM_LOGOFF_ANDX.
//!
//! Reference: MS-CIFS 2.2.4.53 (non-extended-security variant only — this
//! client never negotiates extended security), 2.2.4.54.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::{AndXHeader, Header};

/// `SMB_COM_SESSION_SETUP_ANDX` request carrying LM/NTLMv1 challenge
/// responses. Word count is always 13 for this (non-extended-security)
/// layout.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct SessionSetupRequest {
    pub header: Header,
    #[bw(calc = 13)]
    #[br(temp, assert(_word_count == 13, "unexpected session setup word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub max_buffer_size: u16,
    pub max_mpx_count: u16,
    pub vc_number: u16,
    pub session_key: u32,
    #[bw(calc = lm_response.len() as u16)]
    #[br(temp)]
    oem_password_len: u16,
    #[bw(calc = ntlm_response.len() as u16)]
    #[br(temp)]
    unicode_password_len: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u32,
    pub capabilities: u32,
    #[bw(calc = (
        2 + lm_response.len() + ntlm_response.len()
            + account_name.len() + 1
            + primary_domain.len() + 1
            + native_os.len() + 1
            + native_lan_man.len() + 1
    ) as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[br(count = oem_password_len)]
    pub lm_response: Vec<u8>,
    #[br(count = unicode_password_len)]
    pub ntlm_response: Vec<u8>,
    pub account_name: binrw::NullString,
    pub primary_domain: binrw::NullString,
    pub native_os: binrw::NullString,
    pub native_lan_man: binrw::NullString,
}

impl SessionSetupRequest {
    /// Builds a request carrying already-computed LM and NTLMv1 challenge
    /// responses; `account_name`/`primary_domain` are sent as plain OEM
    /// strings, matching the "core" (non-Unicode) negotiation this client
    /// always performs.
    pub fn new(
        header: Header,
        max_buffer_size: u16,
        account_name: &str,
        primary_domain: &str,
        lm_response: Vec<u8>,
        ntlm_response: Vec<u8>,
    ) -> Self {
        Self {
            header,
            andx: AndXHeader::NONE,
            max_buffer_size,
            max_mpx_count: 2,
            vc_number: 1,
            session_key: 0,
            capabilities: 0,
            lm_response,
            ntlm_response,
            account_name: account_name.into(),
            primary_domain: primary_domain.into(),
            native_os: "rust".into(),
            native_lan_man: "smb1-lite".into(),
        }
    }
}

/// `SMB_COM_SESSION_SETUP_ANDX` response. Word count is always 3.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct SessionSetupResponse {
    pub header: Header,
    #[bw(calc = 3)]
    #[br(temp, assert(_word_count == 3, "unexpected session setup response word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub action: u16,
    #[bw(calc = (native_os.len() + 1 + native_lan_man.len() + 1 + primary_domain.len() + 1) as u16)]
    #[br(temp)]
    _byte_count: u16,
    pub native_os: binrw::NullString,
    pub native_lan_man: binrw::NullString,
    pub primary_domain: binrw::NullString,
}

impl SessionSetupResponse {
    /// `SMB_SETUP_GUEST` bit of the `Action` field: server logged us on as
    /// a guest rather than the account we asked for.
    pub fn is_guest(&self) -> bool {
        self.action & 0x0001 != 0
    }
}

/// `SMB_COM_LOGOFF_ANDX` request/response. Carries no parameters besides
/// the AndX chain header.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoffAndX {
    pub header: Header,
    #[bw(calc = 2)]
    #[br(temp, assert(_word_count == 2, "unexpected logoff word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

impl LogoffAndX {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            andx: AndXHeader::NONE,
        }
    }
}

pub fn read_session_setup_response(buf: &[u8]) -> crate::Result<SessionSetupResponse> {
    Ok(SessionSetupResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_session_setup_request(req: &SessionSetupRequest) -> crate::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    req.write(&mut buf)?;
    Ok(buf.into_inner())
}

pub fn read_logoff(buf: &[u8]) -> crate::Result<LogoffAndX> {
    Ok(LogoffAndX::read(&mut Cursor::new(buf))?)
}

pub fn write_logoff_request(req: &LogoffAndX) -> crate::Result<Vec<u8>> {
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
            tid: 0xffff,
            pid_low: 0x1234,
            uid: 0,
            mid: 2,
        }
    }

    #[test]
    fn request_round_trips() {
        let req = SessionSetupRequest::new(
            hdr(Command::SessionSetupAndx),
            16644,
            "guest",
            "WORKGROUP",
            vec![0xaa; 24],
            vec![0xbb; 24],
        );
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let bytes = buf.into_inner();
        let decoded = SessionSetupRequest::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn response_round_trips_and_reports_guest() {
        let resp = SessionSetupResponse {
            header: hdr(Command::SessionSetupAndx),
            andx: AndXHeader::NONE,
            action: 0x0001,
            native_os: "Windows".into(),
            native_lan_man: "Windows".into(),
            primary_domain: "WORKGROUP".into(),
        };
        let mut buf = Cursor::new(Vec::new());
        resp.write(&mut buf).unwrap();
        let decoded = read_session_setup_response(&buf.into_inner()).unwrap();
        assert!(decoded.is_guest());
    }

    #[test]
    fn logoff_round_trips() {
        let req = LogoffAndX::new(hdr(Command::LogoffAndx));
        let mut buf = Cursor::new(Vec::new());
        req.write(&mut buf).unwrap();
        let decoded = read_logoff(&buf.into_inner()).unwrap();
        assert_eq!(decoded, req);
    }
}
