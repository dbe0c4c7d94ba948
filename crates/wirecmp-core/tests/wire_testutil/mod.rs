#![allow(dead_code)]

/// Minimal wire-format writer for building test inputs.
#[derive(Debug, Default, Clone)]
pub struct Wire {
    buf: Vec<u8>,
}

pub fn varint_bytes(mut v: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let b = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(b);
            return out;
        }
        out.push(b | 0x80);
    }
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    fn tag(mut self, field: u32, wire_type: u32) -> Self {
        self.buf
            .extend(varint_bytes(u64::from((field << 3) | wire_type)));
        self
    }

    pub fn varint(self, field: u32, v: u64) -> Self {
        let mut w = self.tag(field, 0);
        w.buf.extend(varint_bytes(v));
        w
    }

    pub fn fixed64(self, field: u32, v: u64) -> Self {
        let mut w = self.tag(field, 1);
        w.buf.extend_from_slice(&v.to_le_bytes());
        w
    }

    pub fn bytes(self, field: u32, data: &[u8]) -> Self {
        let mut w = self.tag(field, 2);
        w.buf.extend(varint_bytes(data.len() as u64));
        w.buf.extend_from_slice(data);
        w
    }

    pub fn group(self, field: u32, inner: Wire) -> Self {
        let mut w = self.tag(field, 3);
        w.buf.extend(inner.buf);
        w.tag(field, 4)
    }

    pub fn fixed32(self, field: u32, v: u32) -> Self {
        let mut w = self.tag(field, 5);
        w.buf.extend_from_slice(&v.to_le_bytes());
        w
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// `depth` groups nested inside each other around one varint field.
pub fn nested_groups(depth: usize, leaf: u64) -> Wire {
    let mut w = Wire::new().varint(1, leaf);
    for _ in 0..depth {
        w = Wire::new().group(2, w);
    }
    w
}
