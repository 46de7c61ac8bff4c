//! Positional little-endian byte codec.
//!
//! [`ByteReader`] and [`ByteWriter`] are the primitive the rest of the
//! workspace is built on: every SMB1 field is at a fixed byte offset and
//! every multi-byte integer on the wire is little-endian (NetBIOS session
//! lengths are the one big-endian exception, and the framer handles those
//! directly rather than through this codec).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("unexpected end of buffer: wanted {wanted} bytes, {available} available")]
    UnexpectedEof { wanted: usize, available: usize },
}

/// A cursor over a borrowed byte slice.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Jumps the cursor to an absolute offset from the start of the buffer.
    pub fn seek_to(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(CodecError::UnexpectedEof {
                wanted: pos,
                available: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn get_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                wanted: n,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.get_bytes(1)?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        let b = self.get_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        let b = self.get_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        let b = self.get_bytes(8)?;
        Ok(u64::from_le_bytes(b.try_into().unwrap()))
    }

    /// Reads an OEM (single-byte) null-terminated string. If no terminator
    /// is found before the buffer ends, the remainder is returned as-is.
    pub fn get_ascii_z(&mut self) -> Result<String> {
        let start = self.pos;
        let end = self.buf[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|i| start + i)
            .unwrap_or(self.buf.len());
        let s = String::from_utf8_lossy(&self.buf[start..end]).into_owned();
        self.pos = if end < self.buf.len() { end + 1 } else { end };
        Ok(s)
    }
}

/// An append-only little-endian byte buffer builder.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an OEM (single-byte) null-terminated string.
    pub fn put_ascii_z(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_integers() {
        let mut w = ByteWriter::new();
        w.put_u8(0x12);
        w.put_u16(0x3456);
        w.put_u32(0x789abcde);
        w.put_u64(0x0102030405060708);
        let buf = w.into_inner();

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.get_u8().unwrap(), 0x12);
        assert_eq!(r.get_u16().unwrap(), 0x3456);
        assert_eq!(r.get_u32().unwrap(), 0x789abcde);
        assert_eq!(r.get_u64().unwrap(), 0x0102030405060708);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn ascii_z_round_trip() {
        let mut w = ByteWriter::new();
        w.put_ascii_z("NT LM 0.12");
        w.put_ascii_z("");
        let buf = w.into_inner();

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.get_ascii_z().unwrap(), "NT LM 0.12");
        assert_eq!(r.get_ascii_z().unwrap(), "");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn get_bytes_past_end_errors() {
        let buf = [1, 2, 3];
        let mut r = ByteReader::new(&buf);
        assert!(r.get_u32().is_err());
    }

    #[test]
    fn seek_to_moves_cursor() {
        let buf = [1, 2, 3, 4, 5];
        let mut r = ByteReader::new(&buf);
        r.seek_to(3).unwrap();
        assert_eq!(r.get_u8().unwrap(), 4);
        assert!(r.seek_to(10).is_err());
    }
}
