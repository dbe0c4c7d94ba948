//! Bounds-checked well-formedness scan for unknown-field bytes.
//!
//! `compare` trusts its input. Run this first on bytes that did not come from
//! a decoder that already validated them.

use std::fmt;

use crate::field_set::{
    WIRE_TYPE_DELIMITED, WIRE_TYPE_END_GROUP, WIRE_TYPE_FIXED32, WIRE_TYPE_FIXED64,
    WIRE_TYPE_START_GROUP, WIRE_TYPE_VARINT,
};
use crate::varint::MAX_VARINT_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    TruncatedVarint,
    VarintTooLong,
    TagOutOfRange,
    FieldNumberZero,
    InvalidWireType(u8),
    TruncatedPayload,
    UnexpectedEndGroup,
    MismatchedEndGroup { open: u32, close: u32 },
    UnterminatedGroup(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedInput {
    pub offset: usize,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed unknown fields at byte {}: ", self.offset)?;
        match self.reason {
            MalformedReason::TruncatedVarint => f.write_str("truncated varint"),
            MalformedReason::VarintTooLong => {
                write!(f, "varint longer than {MAX_VARINT_LEN} bytes")
            }
            MalformedReason::TagOutOfRange => f.write_str("tag does not fit in 32 bits"),
            MalformedReason::FieldNumberZero => f.write_str("field number 0"),
            MalformedReason::InvalidWireType(wt) => write!(f, "invalid wire type {wt}"),
            MalformedReason::TruncatedPayload => f.write_str("payload runs past end of input"),
            MalformedReason::UnexpectedEndGroup => f.write_str("end-group with no open group"),
            MalformedReason::MismatchedEndGroup { open, close } => {
                write!(f, "end-group for field {close} closes group {open}")
            }
            MalformedReason::UnterminatedGroup(field) => {
                write!(f, "group {field} is never closed")
            }
        }
    }
}

impl std::error::Error for MalformedInput {}

/// Checks that `buf` is a complete sequence of wire-format fields.
///
/// Groups are tracked with an explicit stack, so nesting depth costs heap, not
/// call stack.
pub fn check_well_formed(buf: &[u8]) -> Result<(), MalformedInput> {
    let mut pos = 0usize;
    let mut open_groups: Vec<(u32, usize)> = Vec::new();

    while pos < buf.len() {
        let start = pos;
        let err = |reason| MalformedInput {
            offset: start,
            reason,
        };

        let (raw_tag, n) = read_varint(&buf[pos..]).map_err(err)?;
        pos += n;
        let tag = u32::try_from(raw_tag).map_err(|_| err(MalformedReason::TagOutOfRange))?;
        let field = tag >> 3;
        if field == 0 {
            return Err(err(MalformedReason::FieldNumberZero));
        }

        match tag & 7 {
            WIRE_TYPE_VARINT => {
                let (_, n) = read_varint(&buf[pos..]).map_err(err)?;
                pos += n;
            }
            WIRE_TYPE_FIXED64 => {
                pos = skip(buf, pos, 8).ok_or(err(MalformedReason::TruncatedPayload))?;
            }
            WIRE_TYPE_FIXED32 => {
                pos = skip(buf, pos, 4).ok_or(err(MalformedReason::TruncatedPayload))?;
            }
            WIRE_TYPE_DELIMITED => {
                let (len, n) = read_varint(&buf[pos..]).map_err(err)?;
                pos += n;
                let len = usize::try_from(len).unwrap_or(usize::MAX);
                pos = skip(buf, pos, len).ok_or(err(MalformedReason::TruncatedPayload))?;
            }
            WIRE_TYPE_START_GROUP => open_groups.push((field, start)),
            WIRE_TYPE_END_GROUP => match open_groups.pop() {
                Some((open, _)) if open == field => {}
                Some((open, _)) => {
                    return Err(err(MalformedReason::MismatchedEndGroup {
                        open,
                        close: field,
                    }));
                }
                None => return Err(err(MalformedReason::UnexpectedEndGroup)),
            },
            other => return Err(err(MalformedReason::InvalidWireType(other as u8))),
        }
    }

    match open_groups.pop() {
        Some((field, offset)) => Err(MalformedInput {
            offset,
            reason: MalformedReason::UnterminatedGroup(field),
        }),
        None => Ok(()),
    }
}

fn read_varint(buf: &[u8]) -> Result<(u64, usize), MalformedReason> {
    let mut val = 0u64;
    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(MalformedReason::VarintTooLong);
        }
        val |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
    }
    Err(MalformedReason::TruncatedVarint)
}

fn skip(buf: &[u8], pos: usize, len: usize) -> Option<usize> {
    let end = pos.checked_add(len)?;
    (end <= buf.len()).then_some(end)
}
