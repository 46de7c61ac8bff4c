//! The [`Connection`] state machine: the single type this crate's callers
//! drive directly.
//!
//! State only ever moves forward during setup (`Disconnected` →
//! `ProtocolNegotiated` → `LoggedIn` → `ConnectedToShare`) and only ever
//! moves backward during `disconnect`, one step at a time, exactly
//! mirroring the order connect established it in.

use std::net::Ipv4Addr;

use smb_msg::create::{access, disposition, FILE_NON_DIRECTORY_FILE};
use smb_msg::header::{AndXHeader, Command, Flags2, Header, HeaderFlags};
use smb_msg::{close, create, echo, negotiate, read, session_setup, trans2, tree_connect, write};
use smb_transport::{NetBiosFramer, Transport, SMB_PORT};

use crate::auth;
use crate::error::{error_for_status, Error, Result};
use crate::file_info::FileInfo;

/// Fixed process ID this client always uses, matching the reference
/// client's choice of an arbitrary constant rather than the real OS pid
/// (nothing on the wire depends on it being a real process).
const PID: u16 = 0x1234;

/// Maximum directory entries requested per `FIND_FIRST2` call. This client
/// does not implement `FIND_NEXT2`, so a directory with more entries than
/// this is truncated; see [`Connection::list_directory`].
const FIND_FIRST2_SEARCH_COUNT: u16 = 1024;

/// `FILE_ATTRIBUTE_DIRECTORY`.
const ATTR_DIRECTORY: u32 = 0x10;

/// Reads the `mid` field straight out of a whole SMB message's fixed
/// 32-byte header, without decoding the rest of it. `mid` is always the
/// last two bytes of the header (see `smb_msg::header::Header`'s field
/// order): `None` if `buf` is too short to even hold a header, which means
/// the message is malformed regardless of what command it claims to be.
fn header_mid(buf: &[u8]) -> Option<u16> {
    let mid_bytes = buf.get(30..32)?;
    Some(u16::from_le_bytes([mid_bytes[0], mid_bytes[1]]))
}

/// Connection lifecycle state. Ordered: later states can only be reached
/// by passing through every earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    Disconnected,
    ProtocolNegotiated,
    LoggedIn,
    ConnectedToShare,
}

/// Tunables that don't change the wire protocol, only how this client
/// uses it.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Advertised receive buffer size, sent in SESSION_SETUP_ANDX and used
    /// to cap READ_ANDX/WRITE_ANDX chunk sizes.
    pub max_buffer_size: u16,
    /// NTLM/LM domain sent with the account name; `""` for a local account.
    pub primary_domain: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: 16644,
            primary_domain: String::new(),
        }
    }
}

/// A single-threaded, blocking connection to one SMB1 share.
///
/// Generic over [`Transport`] so tests can swap in an in-memory double;
/// [`smb_transport::TcpTransport`] is the default for real use.
pub struct Connection<T: Transport> {
    transport: T,
    config: ConnectionConfig,
    state: State,
    tid: u16,
    uid: u16,
    mid: u16,
    challenge: Option<[u8; 8]>,
    last_error: Option<String>,
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ConnectionConfig::default())
    }

    pub fn with_config(transport: T, config: ConnectionConfig) -> Self {
        Self {
            transport,
            config,
            state: State::Disconnected,
            tid: 0,
            uid: 0,
            mid: 0,
            challenge: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Returns and clears the most recently recorded error, for callers
    /// that prefer checking a side channel over matching on every `Result`.
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    fn fail(&mut self, err: impl Into<Error>) -> Error {
        let err = err.into();
        self.last_error = Some(err.to_string());
        err
    }

    fn next_mid(&mut self) -> u16 {
        let mid = self.mid;
        self.mid = self.mid.wrapping_add(1);
        mid
    }

    fn header(&mut self, command: Command) -> Header {
        Header {
            command,
            status: 0,
            flags: HeaderFlags::new(),
            flags2: Flags2::client_default(),
            tid: self.tid,
            pid_low: PID,
            uid: self.uid,
            mid: self.next_mid(),
        }
    }

    /// Sends `bytes` (a whole SMB message) and waits for the matching
    /// response, verifying the response's `mid` echoes the request's. A
    /// mismatch is a fatal protocol error: there is never more than one
    /// request in flight on a `Connection`, so any other `mid` means the
    /// transport desynchronized and the connection can no longer be trusted.
    fn send_and_recv(&mut self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        let req_mid = header_mid(&bytes)
            .expect("every request this crate builds carries a full 32-byte SMB header");

        let mut framer = NetBiosFramer::new(&mut self.transport);
        framer.send_message(&bytes)?;
        let resp = framer.recv_message()?;

        match header_mid(&resp) {
            Some(resp_mid) if resp_mid == req_mid => Ok(resp),
            Some(resp_mid) => {
                self.state = State::Disconnected;
                Err(self.fail(Error::MidMismatch {
                    expected: req_mid,
                    got: resp_mid,
                }))
            }
            None => {
                self.state = State::Disconnected;
                Err(self.fail(Error::from(smb_transport::TransportError::UnexpectedEof)))
            }
        }
    }

    fn require_state(&mut self, minimum: State) -> Result<()> {
        if self.state < minimum {
            let err = Error::InvalidState(format!(
                "operation requires at least {minimum:?}, connection is {:?}",
                self.state
            ));
            return Err(self.fail(err));
        }
        Ok(())
    }

    /// Checks a response header's NT status, mapping non-success statuses
    /// to [`Error`] via [`error_for_status`].
    fn check_status(&mut self, header: &smb_msg::Header) -> Result<()> {
        if header.is_success() {
            Ok(())
        } else {
            Err(self.fail(error_for_status(header.status)))
        }
    }

    /// Connects to `addr:445`, negotiates the protocol, logs on, and
    /// connects to the share named in `unc_path` (e.g. `\\server\share`).
    ///
    /// This client never resolves hostnames itself — `addr` is the
    /// already-resolved server address; `unc_path` is used only to name
    /// the share, the same way the share string is used verbatim on the
    /// wire by the reference client this crate's protocol layer is
    /// grounded on.
    pub fn connect(
        &mut self,
        addr: Ipv4Addr,
        unc_path: &str,
        account_name: &str,
        password: &str,
    ) -> Result<()> {
        if self.state != State::Disconnected {
            return Err(self.fail(Error::InvalidState(
                "connect() called on an already-connected Connection".into(),
            )));
        }
        if !unc_path.starts_with("\\\\") || unc_path.len() < 3 {
            return Err(self.fail(Error::ParameterInvalid(format!(
                "not a UNC share path: {unc_path}"
            ))));
        }

        self.transport
            .connect(addr, SMB_PORT)
            .map_err(|e| self.fail(e))?;

        self.negotiate()?;
        self.session_setup(account_name, password)?;
        self.tree_connect(unc_path)?;
        Ok(())
    }

    fn negotiate(&mut self) -> Result<()> {
        let header = self.header(Command::Negotiate);
        let req = negotiate::NegotiateRequest::new(header);
        let bytes = negotiate::write_negotiate_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = negotiate::read_negotiate_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;

        if !resp.accepted() {
            return Err(self.fail(Error::ProtocolError(smb_msg::SmbMsgError::InvalidData(
                "server rejected the NT LM 0.12 dialect".into(),
            ))));
        }
        let challenge = resp.challenge().map_err(|e| self.fail(e))?;
        self.challenge = Some(challenge);
        self.state = State::ProtocolNegotiated;
        Ok(())
    }

    fn session_setup(&mut self, account_name: &str, password: &str) -> Result<()> {
        self.require_state(State::ProtocolNegotiated)?;
        let challenge = self.challenge.ok_or_else(|| {
            self.last_error = Some("no challenge to respond to".into());
            Error::InvalidState("session_setup called before negotiate".into())
        })?;

        let lm = auth::lm_response(password, &challenge).to_vec();
        let ntlm = auth::ntlm_response(password, &challenge).to_vec();

        let header = self.header(Command::SessionSetupAndx);
        let req = session_setup::SessionSetupRequest::new(
            header,
            self.config.max_buffer_size,
            account_name,
            &self.config.primary_domain,
            lm,
            ntlm,
        );
        let bytes = session_setup::write_session_setup_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp =
            session_setup::read_session_setup_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;

        self.uid = resp.header.uid;
        self.state = State::LoggedIn;
        Ok(())
    }

    fn tree_connect(&mut self, unc_path: &str) -> Result<()> {
        self.require_state(State::LoggedIn)?;
        let header = self.header(Command::TreeConnectAndx);
        let req = tree_connect::TreeConnectRequest::new(header, unc_path);
        let bytes = tree_connect::write_tree_connect_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp =
            tree_connect::read_tree_connect_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;

        self.tid = resp.header.tid;
        self.state = State::ConnectedToShare;
        Ok(())
    }

    /// Round-trips an `SMB_COM_ECHO`, the one operation this client allows
    /// before a session or tree is established — only the protocol
    /// negotiation has to have happened.
    pub fn test_connection(&mut self) -> Result<()> {
        self.require_state(State::ProtocolNegotiated)?;
        let header = self.header(Command::Echo);
        let req = echo::EchoRequest::new(header, b"F".to_vec());
        let bytes = echo::write_echo_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = echo::read_echo_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;
        if resp.data != b"F" {
            return Err(self.fail(Error::ProtocolError(smb_msg::SmbMsgError::InvalidData(
                "echo response payload did not match the request".into(),
            ))));
        }
        Ok(())
    }

    /// Lists the immediate contents of `dir` via `FIND_FIRST2`.
    ///
    /// Returns at most [`FIND_FIRST2_SEARCH_COUNT`] entries. This client
    /// does not implement `FIND_NEXT2`, so directories with more entries
    /// than that are silently truncated to the first page the server
    /// returns.
    pub fn list_directory(&mut self, dir: &FileInfo) -> Result<Vec<FileInfo>> {
        self.require_state(State::ConnectedToShare)?;
        let header = self.header(Command::Transaction2);
        let pattern = dir.search_pattern();
        let bytes = trans2::build_find_first2_request(&header, &pattern, FIND_FIRST2_SEARCH_COUNT)
            .map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;

        let resp_header = smb_msg::read_header(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp_header)?;
        let resp = trans2::read_find_first2_response(&resp_bytes).map_err(|e| self.fail(e))?;

        let entries = resp
            .entries
            .into_iter()
            .filter(|e| e.file_name != "." && e.file_name != "..")
            .map(|e| {
                let is_directory = e.ext_file_attributes & ATTR_DIRECTORY != 0;
                dir.child(&e.file_name, is_directory, e.end_of_file)
            })
            .collect();
        Ok(entries)
    }

    /// Opens `file` for reading, reads up to `len` bytes starting at
    /// `offset`, and always closes the handle before returning — even if
    /// the read itself failed.
    pub fn read_file(&mut self, file: &FileInfo, offset: u32, len: u16) -> Result<Vec<u8>> {
        self.require_state(State::ConnectedToShare)?;
        let fid = self.open_file(
            file,
            access::GENERIC_READ,
            0x01, // FILE_SHARE_READ
            disposition::FILE_OPEN,
        )?;

        let result = self.do_read(fid, offset, len);
        let _ = self.close_fid(fid);
        result
    }

    fn do_read(&mut self, fid: u16, offset: u32, len: u16) -> Result<Vec<u8>> {
        let header = self.header(Command::ReadAndx);
        let req = read::ReadRequest::new(header, fid, offset, len);
        let bytes = read::write_read_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = read::read_read_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;
        Ok(resp.data)
    }

    /// Opens `file` for writing (creating it if absent), writes `data` at
    /// `offset`, and always closes the handle before returning.
    pub fn write_file(&mut self, file: &FileInfo, offset: u32, data: &[u8]) -> Result<usize> {
        self.require_state(State::ConnectedToShare)?;
        let fid = self.open_file(
            file,
            access::GENERIC_WRITE,
            0x02, // FILE_SHARE_WRITE
            disposition::FILE_OVERWRITE_IF,
        )?;

        let result = self.do_write(fid, offset, data);
        let _ = self.close_fid(fid);
        result
    }

    fn do_write(&mut self, fid: u16, offset: u32, data: &[u8]) -> Result<usize> {
        let header = self.header(Command::WriteAndx);
        let req = write::WriteRequest::new(header, fid, offset, data.to_vec());
        let bytes = write::write_write_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = write::read_write_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;
        Ok(resp.count as usize)
    }

    fn open_file(
        &mut self,
        file: &FileInfo,
        desired_access: u32,
        share_access: u32,
        create_disposition: u32,
    ) -> Result<u16> {
        let header = self.header(Command::NtCreateAndx);
        let path = file.full_path().trim_start_matches('\\').to_string();
        let req = create::NtCreateRequest::new(
            header,
            &path,
            desired_access,
            share_access,
            create_disposition,
            FILE_NON_DIRECTORY_FILE,
        );
        let bytes = create::write_create_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = create::read_create_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)?;
        Ok(resp.fid)
    }

    fn close_fid(&mut self, fid: u16) -> Result<()> {
        let header = self.header(Command::Close);
        let req = close::CloseRequest::new(header, fid);
        let bytes = close::write_close_request(&req).map_err(|e| self.fail(e))?;
        let resp_bytes = self.send_and_recv(bytes)?;
        let resp = close::read_close_response(&resp_bytes).map_err(|e| self.fail(e))?;
        self.check_status(&resp.header)
    }

    /// Tears the connection down in reverse order of how `connect` built
    /// it up, one step at a time. Each step is best-effort: a failure is
    /// logged, not returned, so a half-broken connection can always be
    /// torn down completely.
    pub fn disconnect(&mut self) {
        if self.state >= State::ConnectedToShare {
            let header = self.header(Command::TreeDisconnect);
            let req = tree_connect::TreeDisconnect::new(header);
            if let Err(e) = tree_connect::write_tree_disconnect_request(&req)
                .map_err(Error::from)
                .and_then(|bytes| self.send_and_recv(bytes))
            {
                log::warn!("tree disconnect failed during teardown: {e}");
            }
            self.state = State::LoggedIn;
            self.tid = 0;
        }

        if self.state >= State::LoggedIn {
            let header = self.header(Command::LogoffAndx);
            let req = session_setup::LogoffAndX::new(header);
            if let Err(e) = session_setup::write_logoff_request(&req)
                .map_err(Error::from)
                .and_then(|bytes| self.send_and_recv(bytes))
            {
                log::warn!("logoff failed during teardown: {e}");
            }
            self.state = State::Disconnected;
            self.uid = 0;
        }

        if let Err(e) = self.transport.close() {
            log::warn!("transport close failed during teardown: {e}");
        }
        self.challenge = None;
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        if self.state != State::Disconnected {
            self.disconnect();
        }
    }
}
