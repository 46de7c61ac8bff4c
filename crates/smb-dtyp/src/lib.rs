//! Shared byte-level primitives used by `smb-msg` and `smb-transport`.
//!
//! This crate carries no protocol knowledge of its own: it is the
//! positional, little-endian codec that the SMB1 message layer and the
//! NetBIOS session framer build on.

mod codec;

pub use codec::{CodecError, Result as CodecResult, ByteReader, ByteWriter};
