use crate::arena::FieldArena;
use crate::field_set::{FieldSetRef, Payload, UnknownField};

/// Position-wise equality of two canonical (tag-sorted) field sets.
///
/// The sets may live in different arenas.
pub fn sets_equal(a: FieldSetRef<'_, '_>, b: FieldSetRef<'_, '_>) -> bool {
    let (fa, fb) = (a.fields(), b.fields());
    if fa.len() != fb.len() {
        return false;
    }
    fa.iter()
        .zip(fb)
        .all(|(f1, f2)| fields_equal(a.arena(), f1, b.arena(), f2))
}

fn fields_equal(
    arena1: &FieldArena<'_>,
    f1: &UnknownField<'_>,
    arena2: &FieldArena<'_>,
    f2: &UnknownField<'_>,
) -> bool {
    if f1.tag != f2.tag {
        return false;
    }
    match (f1.payload, f2.payload) {
        (Payload::Varint(x), Payload::Varint(y)) | (Payload::Fixed64(x), Payload::Fixed64(y)) => {
            x == y
        }
        (Payload::Fixed32(x), Payload::Fixed32(y)) => x == y,
        (Payload::Delimited(x), Payload::Delimited(y)) => bytes_equal(x, y),
        (Payload::Group(x), Payload::Group(y)) => sets_equal(arena1.set(x), arena2.set(y)),
        // Equal tags imply equal wire types.
        _ => false,
    }
}

/// Exact byte-span equality; delimited payloads are never interpreted.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}
