//! Base-128 varints and the read cursor used by the field builder.
//!
//! Input reaching this module is trusted to be well-formed wire data. Every
//! malformation trips a `debug_assert!`; release builds clamp reads to the
//! buffer instead, so the result is unspecified but never out of bounds.

/// A uint64 varint never spans more than 10 bytes (70 payload bits).
pub const MAX_VARINT_LEN: usize = 10;

/// Decodes one varint from the front of `buf` (the span `[cursor, limit)`).
///
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(buf: &[u8]) -> (u64, usize) {
    debug_assert!(!buf.is_empty(), "varint starts at end of input");

    let mut val = 0u64;
    let mut len = 0usize;
    let mut terminated = false;
    for &byte in buf.iter().take(MAX_VARINT_LEN) {
        val |= u64::from(byte & 0x7f) << (7 * len);
        len += 1;
        if byte & 0x80 == 0 {
            terminated = true;
            break;
        }
    }
    debug_assert!(terminated, "unterminated varint at end of {len} bytes");
    (val, len)
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_varint(&mut self) -> u64 {
        let (val, len) = decode_varint(&self.buf[self.pos..]);
        self.pos += len;
        val
    }

    pub fn read_tag(&mut self) -> u32 {
        let raw = self.read_varint();
        debug_assert!(raw <= u64::from(u32::MAX), "tag {raw} exceeds u32");
        raw as u32
    }

    pub fn read_fixed64(&mut self) -> u64 {
        u64::from_le_bytes(self.read_array::<8>())
    }

    pub fn read_fixed32(&mut self) -> u32 {
        u32::from_le_bytes(self.read_array::<4>())
    }

    /// Borrows the next `len` bytes without copying.
    pub fn read_bytes(&mut self, len: u64) -> &'a [u8] {
        let avail = self.remaining();
        debug_assert!(
            len <= avail as u64,
            "length-delimited field wants {len} bytes, {avail} remain"
        );
        let n = usize::try_from(len).unwrap_or(usize::MAX).min(avail);
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    /// Moves to the end of input, dropping whatever is left.
    pub fn skip_to_end(&mut self) {
        self.pos = self.buf.len();
    }

    fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let src = self.read_bytes(N as u64);
        let mut out = [0u8; N];
        out[..src.len()].copy_from_slice(src);
        out
    }
}
