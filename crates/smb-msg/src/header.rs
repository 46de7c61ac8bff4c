//! SMB1 message header and AndX chain conventions.
//!
//! Reference: MS-CIFS 2.2.3 (SMB header), 2.2.4.5 (AndX chaining).

use std::io::Cursor;

use binrw::prelude::*;
use modular_bitfield::prelude::*;

/// SMB1 command codes for the subset this client speaks.
///
/// Reference: MS-CIFS 2.2.4.
#[derive(BinRead, BinWrite, Debug, PartialEq, Eq, Clone, Copy)]
#[brw(repr(u8))]
pub enum Command {
    Close = 0x04,
    ReadAndx = 0x2e,
    WriteAndx = 0x2f,
    Transaction2 = 0x32,
    TreeDisconnect = 0x71,
    Negotiate = 0x72,
    SessionSetupAndx = 0x73,
    LogoffAndx = 0x74,
    TreeConnectAndx = 0x75,
    NtCreateAndx = 0xa2,
    Echo = 0x2b,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::Close => "Close",
            Command::ReadAndx => "Read AndX",
            Command::WriteAndx => "Write AndX",
            Command::Transaction2 => "Transaction2",
            Command::TreeDisconnect => "Tree Disconnect",
            Command::Negotiate => "Negotiate",
            Command::SessionSetupAndx => "Session Setup AndX",
            Command::LogoffAndx => "Logoff AndX",
            Command::TreeConnectAndx => "Tree Connect AndX",
            Command::NtCreateAndx => "NT Create AndX",
            Command::Echo => "Echo",
        };
        write!(f, "{} ({:#04x})", name, *self as u8)
    }
}

macro_rules! make_status {
    ($($name:ident = $value:literal: $description:literal,)+) => {
        /// NT status codes relevant to this client.
        ///
        /// Reference: MS-ERREF 2.3.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u32)]
        pub enum Status {
            $(#[doc = $description] $name = $value,)+
        }

        impl std::fmt::Display for Status {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $(Status::$name => $description,)+
                };
                write!(f, "{} ({:#010x})", s, *self as u32)
            }
        }

        impl TryFrom<u32> for Status {
            type Error = crate::SmbMsgError;
            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Status::$name),)+
                    _ => Err(crate::SmbMsgError::MissingErrorCodeDefinition(value)),
                }
            }
        }
    };
}

make_status! {
    Success = 0x0000_0000: "Success",
    NoMoreFiles = 0x8000_0006: "No More Files",
    InvalidParameter = 0xc000_000d: "Invalid Parameter",
    AccessDenied = 0xc000_0022: "Access Denied",
    ObjectNameNotFound = 0xc000_0034: "Object Name Not Found",
    LogonFailure = 0xc000_006d: "Logon Failure",
    NoSuchFile = 0xc000_003b: "No Such File",
}

impl Status {
    /// Renders `value` as a known [`Status`] name, or its hex form if
    /// unrecognized. Never fails — useful for logging arbitrary server
    /// status codes.
    pub fn describe(value: u32) -> String {
        match Status::try_from(value) {
            Ok(s) => format!("{s}"),
            Err(_) => format!("{value:#010x}"),
        }
    }
}

/// The 32-byte SMB1 message header common to every request and response.
///
/// Reference: MS-CIFS 2.2.3.
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq, Eq)]
#[brw(magic(b"\xffSMB"), little)]
pub struct Header {
    pub command: Command,
    /// NT status. Zero on every request; checked on responses.
    pub status: u32,
    pub flags: HeaderFlags,
    pub flags2: Flags2,
    /// High 16 bits of the process ID. Unused by this client; always 0.
    #[bw(calc = 0)]
    #[br(temp)]
    _pid_high: u16,
    #[bw(calc = [0; 8])]
    #[br(temp)]
    _signature: [u8; 8],
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u16,
    pub tid: u16,
    pub pid_low: u16,
    pub uid: u16,
    pub mid: u16,
}

impl Header {
    pub const STRUCT_SIZE: usize = 32;

    /// Tries to interpret [`Header::status`] as a known [`Status`].
    pub fn status(&self) -> crate::Result<Status> {
        self.status.try_into()
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success as u32
    }
}

/// Per-request header flags.
///
/// Reference: MS-CIFS 2.2.3.1.
#[bitfield(bits = 8)]
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[br(map = Self::from_bytes)]
#[bw(map = |&x| Self::into_bytes(x))]
pub struct HeaderFlags {
    pub lock_and_read_ok: bool,
    pub receive_buffer_posted: bool,
    #[skip]
    __: B1,
    pub case_insensitive: bool,
    pub canonicalized_paths: bool,
    pub oplock: bool,
    pub notify: bool,
    /// Set by the server on every response.
    pub reply: bool,
}

/// Per-request extended header flags.
///
/// Reference: MS-CIFS 2.2.3.1.
#[bitfield(bits = 16)]
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[br(map = Self::from_bytes)]
#[bw(map = |&x| Self::into_bytes(x))]
pub struct Flags2 {
    pub long_names: bool,
    pub ea: bool,
    pub signature_required: bool,
    #[skip]
    __: B1,
    pub signature_present: bool,
    #[skip]
    __: B3,
    pub extended_attributes: bool,
    pub long_names_allowed: bool,
    #[skip]
    __: B1,
    pub extended_security: bool,
    pub dfs_paths: bool,
    pub paging_io: bool,
    pub nt_status: bool,
    pub unicode: bool,
}

impl Flags2 {
    /// This client always speaks OEM strings over LM/NTLMv1 — long names
    /// and NT status codes on, Unicode and extended security off.
    pub fn client_default() -> Self {
        Flags2::new().with_long_names(true).with_nt_status(true)
    }
}

/// AndX chain header: commands that support batching carry this as the
/// first two parameter words. This client never sends a chained request
/// (`andx_command` is always [`ANDX_NONE`]) but must be able to parse a
/// chained response, since some servers chain one anyway.
pub const ANDX_NONE: u8 = 0xff;

#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndXHeader {
    pub andx_command: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u8,
    pub andx_offset: u16,
}

impl AndXHeader {
    pub const NONE: AndXHeader = AndXHeader {
        andx_command: ANDX_NONE,
        andx_offset: 0,
    };

    pub fn has_next(&self) -> bool {
        self.andx_command != ANDX_NONE
    }
}

/// Reads a [`Header`] out of a whole in-memory SMB message (used by
/// `Connection` once a NetBIOS frame has been fully received).
pub fn read_header(buf: &[u8]) -> crate::Result<Header> {
    Ok(Header::read(&mut Cursor::new(buf))?)
}
