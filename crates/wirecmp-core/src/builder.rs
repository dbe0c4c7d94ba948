//! Recursive-descent builder turning unknown-field bytes into canonical field sets.

use crate::arena::FieldArena;
use crate::error::Error;
use crate::field_set::{
    Payload, SetId, UnknownField, WIRE_TYPE_DELIMITED, WIRE_TYPE_END_GROUP, WIRE_TYPE_FIXED32,
    WIRE_TYPE_FIXED64, WIRE_TYPE_START_GROUP, WIRE_TYPE_VARINT,
};
use crate::limits::{ByteBudget, Limits};
use crate::sort::SortScratch;
use crate::varint::Cursor;

/// Per-call state: the arena, the remaining depth budget, and the sort scratch
/// shared by every nesting level.
#[derive(Debug)]
pub(crate) struct BuildContext<'a> {
    arena: FieldArena<'a>,
    scratch: SortScratch<'a>,
    budget: ByteBudget,
    depth: u32,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(limits: &Limits) -> Self {
        Self {
            arena: FieldArena::new(),
            scratch: SortScratch::new(),
            budget: ByteBudget::new(limits.arena_bytes),
            depth: limits.max_depth,
        }
    }

    pub(crate) fn arena(&self) -> &FieldArena<'a> {
        &self.arena
    }

    pub(crate) fn into_arena(self) -> FieldArena<'a> {
        self.arena
    }

    /// Builds `buf` into a field set sorted by tag. The whole buffer must be
    /// consumed.
    pub(crate) fn build(&mut self, buf: &'a [u8]) -> Result<SetId, Error> {
        let mut cur = Cursor::new(buf);
        let set = self.build_level(&mut cur, None)?;
        debug_assert!(
            cur.is_at_end(),
            "unknown field data has {} unconsumed bytes",
            cur.remaining()
        );
        Ok(set)
    }

    /// Parses fields until end of input or, inside a group, until the
    /// matching end-group tag (which is consumed here).
    fn build_level(&mut self, cur: &mut Cursor<'a>, group: Option<u32>) -> Result<SetId, Error> {
        let set = self.arena.alloc_set(&mut self.budget)?;
        let mut last_tag = 0u32;
        let mut sorted = true;

        while !cur.is_at_end() {
            let tag = cur.read_tag();
            let wire_type = tag & 7;
            if wire_type == WIRE_TYPE_END_GROUP {
                debug_assert_eq!(
                    group,
                    Some(tag >> 3),
                    "end-group tag does not close an open group"
                );
                break;
            }
            if tag < last_tag {
                sorted = false;
            }
            last_tag = tag;

            let payload = match wire_type {
                WIRE_TYPE_VARINT => Payload::Varint(cur.read_varint()),
                WIRE_TYPE_FIXED64 => Payload::Fixed64(cur.read_fixed64()),
                WIRE_TYPE_FIXED32 => Payload::Fixed32(cur.read_fixed32()),
                WIRE_TYPE_DELIMITED => {
                    let len = cur.read_varint();
                    Payload::Delimited(cur.read_bytes(len))
                }
                WIRE_TYPE_START_GROUP => {
                    self.enter_group()?;
                    let nested = self.build_level(cur, Some(tag >> 3));
                    self.depth += 1;
                    Payload::Group(nested?)
                }
                other => {
                    debug_assert!(other <= WIRE_TYPE_FIXED32, "invalid wire type {other}");
                    cur.skip_to_end();
                    break;
                }
            };
            self.arena
                .push(set, UnknownField { tag, payload }, &mut self.budget)?;
        }

        if !sorted {
            self.scratch
                .sort(self.arena.fields_mut(set), &mut self.budget)?;
        }
        Ok(set)
    }

    fn enter_group(&mut self) -> Result<(), Error> {
        if self.depth <= 1 {
            return Err(Error::MaxDepthExceeded);
        }
        self.depth -= 1;
        Ok(())
    }

    /// Frees the arena and the sort scratch.
    pub(crate) fn release(&mut self) {
        self.arena.release_all();
        self.scratch.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(arena: &FieldArena<'_>, set: SetId) -> Vec<u32> {
        arena.fields(set).iter().map(|f| f.tag).collect()
    }

    #[test]
    fn builds_every_scalar_wire_type() {
        let buf = [
            0x08, 0x96, 0x01, // 1: varint 150
            0x11, 1, 2, 3, 4, 5, 6, 7, 8, // 2: fixed64
            0x1a, 0x02, b'h', b'i', // 3: "hi"
            0x25, 0xff, 0xff, 0xff, 0x7f, // 4: fixed32
        ];
        let mut ctx = BuildContext::new(&Limits::default());
        let set = ctx.build(&buf).expect("build");
        let fields = ctx.arena().fields(set);
        assert_eq!(fields.len(), 4);
        assert!(matches!(fields[0].payload, Payload::Varint(150)));
        assert!(matches!(
            fields[1].payload,
            Payload::Fixed64(0x0807_0605_0403_0201)
        ));
        assert!(matches!(fields[2].payload, Payload::Delimited(b"hi")));
        assert!(matches!(fields[3].payload, Payload::Fixed32(0x7fff_ffff)));
    }

    #[test]
    fn already_ascending_input_skips_the_sort() {
        let buf = [0x08, 0x01, 0x08, 0x02, 0x10, 0x03];
        let mut ctx = BuildContext::new(&Limits::default());
        let set = ctx.build(&buf).expect("build");
        assert_eq!(tags(ctx.arena(), set), vec![8, 8, 16]);
        assert_eq!(ctx.scratch.size(), 0);
    }

    #[test]
    fn descending_input_is_sorted_with_shared_scratch() {
        let buf = [0x18, 0x01, 0x10, 0x02, 0x08, 0x03];
        let mut ctx = BuildContext::new(&Limits::default());
        let set = ctx.build(&buf).expect("build");
        assert_eq!(tags(ctx.arena(), set), vec![8, 16, 24]);
        assert_eq!(ctx.scratch.size(), 8);
    }

    #[test]
    fn groups_nest_and_sort_independently() {
        // 3: group { 2: varint 7, 1: varint 9 }, 1: varint 5
        let buf = [0x1b, 0x10, 0x07, 0x08, 0x09, 0x1c, 0x08, 0x05];
        let mut ctx = BuildContext::new(&Limits::default());
        let set = ctx.build(&buf).expect("build");
        let fields = ctx.arena().fields(set);
        assert_eq!(tags(ctx.arena(), set), vec![8, 27]);
        let Payload::Group(inner) = fields[1].payload else {
            panic!("expected group payload, got {:?}", fields[1].payload);
        };
        assert_eq!(tags(ctx.arena(), inner), vec![8, 16]);
        assert_eq!(ctx.depth, Limits::default().max_depth);
    }

    #[test]
    fn depth_budget_must_stay_above_zero() {
        // 1: group { 1: group { } }
        let buf = [0x0b, 0x0b, 0x0c, 0x0c];
        let mut ctx = BuildContext::new(&Limits::with_max_depth(3));
        ctx.build(&buf).expect("two levels fit in a budget of three");

        let mut ctx = BuildContext::new(&Limits::with_max_depth(2));
        assert_eq!(ctx.build(&buf), Err(Error::MaxDepthExceeded));

        let mut ctx = BuildContext::new(&Limits::with_max_depth(0));
        assert_eq!(ctx.build(&buf), Err(Error::MaxDepthExceeded));
    }

    #[test]
    fn arena_ceiling_aborts_with_out_of_memory() {
        let buf = [0x08, 0x01, 0x10, 0x02];
        let limits = Limits {
            arena_bytes: Some(1),
            ..Limits::default()
        };
        let mut ctx = BuildContext::new(&limits);
        assert_eq!(ctx.build(&buf), Err(Error::OutOfMemory));
    }

    #[test]
    fn release_empties_the_arena() {
        let buf = [0x10, 0x01, 0x08, 0x02];
        let mut ctx = BuildContext::new(&Limits::default());
        ctx.build(&buf).expect("build");
        ctx.release();
        assert_eq!(ctx.arena().set_count(), 0);
        assert_eq!(ctx.scratch.size(), 0);
    }
}
