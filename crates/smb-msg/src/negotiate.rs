//! SMB_COM_NEGOTIATE request/response.
//!
//! Reference: MS-CIFS 2.2.4.52. This client offers exactly one dialect,
//! `"NT LM 0.12"` (the "core" dialect string every SMB1 server still
//! understands), and only accepts a response that selects it.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::Header;

/// The single dialect string this client ever offers.
pub const DIALECT: &str = "NT LM 0.12";

/// `SMB_COM_NEGOTIATE` request: one dialect, marked with the `0x02` buffer
/// format byte and null-terminated.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct NegotiateRequest {
    pub header: Header,
    #[bw(calc = 0)]
    #[br(temp, assert(_word_count == 0))]
    _word_count: u8,
    #[bw(calc = (DIALECT.len() + 2) as u16)]
    #[br(temp)]
    _byte_count: u16,
    #[bw(calc = 0x02)]
    #[br(temp, assert(_buffer_format == 0x02))]
    _buffer_format: u8,
    #[bw(calc = binrw::NullString::from(DIALECT))]
    #[br(temp)]
    _dialect: binrw::NullString,
}

impl NegotiateRequest {
    pub fn new(header: Header) -> Self {
        Self { header }
    }
}

/// `SMB_COM_NEGOTIATE` response parameters (core protocol, non-extended
/// security). Word count must be 17 (34 bytes of fixed parameters).
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct NegotiateResponse {
    pub header: Header,
    #[bw(calc = 17)]
    #[br(temp, assert(_word_count == 17, "unexpected negotiate word count: {}", _word_count))]
    _word_count: u8,
    /// Index into the dialect list we offered. Since we offer exactly one,
    /// anything other than `0` means the server rejected it.
    pub dialect_index: u16,
    pub security_mode: u8,
    pub max_mpx_count: u16,
    pub max_number_vcs: u16,
    pub max_buffer_size: u32,
    pub max_raw_size: u32,
    pub session_key: u32,
    pub capabilities: u32,
    pub system_time: u64,
    pub server_time_zone: i16,
    pub challenge_length: u8,
    #[bw(calc = challenge_and_trailer.len() as u16)]
    #[br(temp)]
    _byte_count: u16,
    /// Challenge bytes followed by an (ignored) domain/server name; we only
    /// keep the first `challenge_length` bytes.
    #[br(count = _byte_count)]
    pub challenge_and_trailer: Vec<u8>,
}

impl NegotiateResponse {
    /// The 8-byte authentication challenge sent by the server.
    ///
    /// Errors if `challenge_length` disagrees with the bytes actually
    /// present, or isn't the 8 this client's auth scheme requires.
    pub fn challenge(&self) -> crate::Result<[u8; 8]> {
        if self.challenge_length != 8 {
            return Err(crate::SmbMsgError::InvalidData(format!(
                "expected an 8-byte challenge, server sent {}",
                self.challenge_length
            )));
        }
        let len = self.challenge_length as usize;
        if self.challenge_and_trailer.len() < len {
            return Err(crate::SmbMsgError::InvalidData(
                "negotiate response byte count shorter than challenge_length".into(),
            ));
        }
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.challenge_and_trailer[..len]);
        Ok(out)
    }

    /// `true` if the server selected our one offered dialect.
    pub fn accepted(&self) -> bool {
        self.dialect_index == 0
    }
}

/// Parses a whole in-memory SMB1 message as a [`NegotiateResponse`].
pub fn read_negotiate_response(buf: &[u8]) -> crate::Result<NegotiateResponse> {
    Ok(NegotiateResponse::read(&mut Cursor::new(buf))?)
}

/// Serializes a [`NegotiateRequest`] into the bytes of a whole SMB message.
pub fn write_negotiate_request(req: &NegotiateRequest) -> crate::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    req.write(&mut buf)?;
    Ok(buf.into_inner())
}
