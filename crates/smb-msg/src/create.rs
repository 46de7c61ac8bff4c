//! SMB_COM_NT_CREATE_ANDX.
//!
//! Reference: MS-CIFS 2.2.4.64. Used for every open this client performs —
//! directory enumeration handles, and read/write file handles.

use std::io::Cursor;

use binrw::prelude::*;

use crate::header::{AndXHeader, Header};

/// `CreateOptions` bit relevant to this client: the target is a directory.
pub const FILE_DIRECTORY_FILE: u32 = 0x0000_0001;
/// `CreateOptions` bit: non-directory file, fail if the target is one.
pub const FILE_NON_DIRECTORY_FILE: u32 = 0x0000_0040;

/// `CreateDisposition` values this client uses.
pub mod disposition {
    pub const FILE_OPEN: u32 = 0x0000_0001;
    pub const FILE_OVERWRITE_IF: u32 = 0x0000_0005;
}

/// `DesiredAccess` bits this client requests.
pub mod access {
    pub const GENERIC_READ: u32 = 0x8000_0000;
    pub const GENERIC_WRITE: u32 = 0x4000_0000;
}

/// `SMB_COM_NT_CREATE_ANDX` request. Word count is always 24.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
pub struct NtCreateRequest {
    pub header: Header,
    #[bw(calc = 24)]
    #[br(temp, assert(_word_count == 24, "unexpected create word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u8,
    #[bw(calc = name.len() as u16)]
    #[br(temp)]
    name_length: u16,
    pub flags: u32,
    pub root_directory_fid: u32,
    pub desired_access: u32,
    pub allocation_size: u64,
    pub ext_file_attributes: u32,
    pub share_access: u32,
    pub create_disposition: u32,
    pub create_options: u32,
    pub impersonation_level: u32,
    pub security_flags: u8,
    #[bw(calc = name.len() as u16)]
    #[br(temp)]
    _byte_count: u16,
    /// OEM path relative to the connected share, exactly `name_length`
    /// bytes, not null-terminated.
    #[br(count = name_length)]
    pub name: Vec<u8>,
}

impl NtCreateRequest {
    pub fn new(
        header: Header,
        path: &str,
        desired_access: u32,
        share_access: u32,
        create_disposition: u32,
        create_options: u32,
    ) -> Self {
        Self {
            header,
            andx: AndXHeader::NONE,
            flags: 0,
            root_directory_fid: 0,
            desired_access,
            allocation_size: 0,
            ext_file_attributes: 0,
            share_access,
            create_disposition,
            create_options,
            impersonation_level: 0x02, // SEC_IMPERSONATE
            security_flags: 0,
            name: path.as_bytes().to_vec(),
        }
    }
}

/// `SMB_COM_NT_CREATE_ANDX` response. Word count is always 34.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NtCreateResponse {
    pub header: Header,
    #[bw(calc = 34)]
    #[br(temp, assert(_word_count == 34, "unexpected create response word count: {}", _word_count))]
    _word_count: u8,
    pub andx: AndXHeader,
    pub oplock_level: u8,
    pub fid: u16,
    pub create_action: u32,
    pub creation_time: u64,
    pub last_access_time: u64,
    pub last_write_time: u64,
    pub last_change_time: u64,
    pub ext_file_attributes: u32,
    pub allocation_size: u64,
    pub end_of_file: u64,
    pub resource_type: u16,
    pub file_status_flags: u16,
    pub directory: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    _byte_count: u16,
}

impl NtCreateResponse {
    pub fn is_directory(&self) -> bool {
        self.directory != 0
    }
}

pub fn read_create_response(buf: &[u8]) -> crate::Result<NtCreateResponse> {
    Ok(NtCreateResponse::read(&mut Cursor::new(buf))?)
}

pub fn write_create_request(req: &NtCreateRequest) -> crate::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    req.write(&mut buf)?;
    Ok(buf.into_inner())
}
