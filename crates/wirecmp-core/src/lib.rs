//! Semantic equality of protobuf unknown-field bytes.
//!
//! Two buffers are equal when they decode to the same fields once sorted by
//! tag, with fields that share a tag kept in encounter order. Groups compare
//! recursively; length-delimited payloads compare as opaque bytes.

pub mod arena;
pub mod compare;
pub mod equal;
pub mod error;
pub mod field_set;
pub mod limits;
pub mod report;
pub mod validate;
pub mod varint;

mod builder;
mod sort;

pub use compare::{compare, compare_with_limits, parse, CompareResult};
pub use error::Error;
pub use field_set::{
    CanonicalFields, FieldRef, FieldSetRef, FieldValue, Payload, SetId, UnknownField, WireType,
};
pub use limits::Limits;
pub use validate::{check_well_formed, MalformedInput, MalformedReason};
