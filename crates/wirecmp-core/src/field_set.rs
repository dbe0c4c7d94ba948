//! Decoded unknown fields and read-only views over arena-owned field sets.

use crate::arena::FieldArena;
use crate::equal::sets_equal;

pub const WIRE_TYPE_VARINT: u32 = 0;
pub const WIRE_TYPE_FIXED64: u32 = 1;
pub const WIRE_TYPE_DELIMITED: u32 = 2;
pub const WIRE_TYPE_START_GROUP: u32 = 3;
pub const WIRE_TYPE_END_GROUP: u32 = 4;
pub const WIRE_TYPE_FIXED32: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint,
    Fixed64,
    Delimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag & 7 {
            WIRE_TYPE_VARINT => Some(WireType::Varint),
            WIRE_TYPE_FIXED64 => Some(WireType::Fixed64),
            WIRE_TYPE_DELIMITED => Some(WireType::Delimited),
            WIRE_TYPE_START_GROUP => Some(WireType::StartGroup),
            WIRE_TYPE_END_GROUP => Some(WireType::EndGroup),
            WIRE_TYPE_FIXED32 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::Delimited => "delimited",
            WireType::StartGroup => "group",
            WireType::EndGroup => "end_group",
            WireType::Fixed32 => "fixed32",
        }
    }
}

/// Index of a field set inside its `FieldArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetId(pub(crate) usize);

/// Payload of one unknown field. The variant always agrees with `tag & 7`.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    Varint(u64),
    /// Raw 8 bytes, compared bit for bit.
    Fixed64(u64),
    /// Raw 4 bytes, compared bit for bit.
    Fixed32(u32),
    /// Borrowed from the input buffer.
    Delimited(&'a [u8]),
    Group(SetId),
}

#[derive(Clone, Copy, Debug)]
pub struct UnknownField<'a> {
    pub tag: u32,
    pub payload: Payload<'a>,
}

impl<'a> UnknownField<'a> {
    /// Filler for reserved but not yet written arena slots.
    pub(crate) const VACANT: Self = UnknownField {
        tag: 0,
        payload: Payload::Varint(0),
    };

    pub fn field_number(&self) -> u32 {
        self.tag >> 3
    }

    pub fn wire_type(&self) -> Option<WireType> {
        WireType::from_tag(self.tag)
    }
}

/// A field set borrowed from the arena that owns it.
#[derive(Clone, Copy, Debug)]
pub struct FieldSetRef<'r, 'a> {
    arena: &'r FieldArena<'a>,
    id: SetId,
}

impl<'r, 'a> FieldSetRef<'r, 'a> {
    pub(crate) fn new(arena: &'r FieldArena<'a>, id: SetId) -> Self {
        Self { arena, id }
    }

    pub fn id(&self) -> SetId {
        self.id
    }

    pub fn arena(&self) -> &'r FieldArena<'a> {
        self.arena
    }

    pub fn fields(&self) -> &'r [UnknownField<'a>] {
        self.arena.fields(self.id)
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldRef<'r, 'a>> + 'r {
        let arena = self.arena;
        self.fields()
            .iter()
            .map(move |field| FieldRef { arena, field })
    }
}

/// One field plus the arena needed to follow its group payload.
#[derive(Clone, Copy, Debug)]
pub struct FieldRef<'r, 'a> {
    arena: &'r FieldArena<'a>,
    field: &'r UnknownField<'a>,
}

#[derive(Clone, Copy, Debug)]
pub enum FieldValue<'r, 'a> {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Delimited(&'a [u8]),
    Group(FieldSetRef<'r, 'a>),
}

impl<'r, 'a> FieldRef<'r, 'a> {
    pub fn tag(&self) -> u32 {
        self.field.tag
    }

    pub fn field_number(&self) -> u32 {
        self.field.field_number()
    }

    pub fn wire_type(&self) -> Option<WireType> {
        self.field.wire_type()
    }

    pub fn value(&self) -> FieldValue<'r, 'a> {
        match self.field.payload {
            Payload::Varint(v) => FieldValue::Varint(v),
            Payload::Fixed64(v) => FieldValue::Fixed64(v),
            Payload::Fixed32(v) => FieldValue::Fixed32(v),
            Payload::Delimited(bytes) => FieldValue::Delimited(bytes),
            Payload::Group(id) => FieldValue::Group(self.arena.set(id)),
        }
    }
}

/// A standalone canonical tree: one buffer built and sorted in its own arena.
#[derive(Debug)]
pub struct CanonicalFields<'a> {
    pub(crate) arena: FieldArena<'a>,
    pub(crate) root: SetId,
}

impl<'a> CanonicalFields<'a> {
    pub fn root(&self) -> FieldSetRef<'_, 'a> {
        self.arena.set(self.root)
    }

    /// Bytes the arena charged while building this tree.
    pub fn arena_bytes(&self) -> usize {
        self.arena.allocated_bytes()
    }
}

impl PartialEq for CanonicalFields<'_> {
    fn eq(&self, other: &Self) -> bool {
        sets_equal(self.root(), other.root())
    }
}
