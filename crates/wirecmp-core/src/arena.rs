//! Bump arena owning every field set built during one call.
//!
//! Field slots live in a single append-only slab; a set is a `(start, len, cap)`
//! window into it, addressed by `SetId`. Growing the most recent window extends
//! it in place. Growing any other window moves its live prefix to the top of the
//! slab and abandons the old region, which is reclaimed only by `release_all`.

use std::mem::size_of;

use crate::error::Error;
use crate::field_set::{FieldSetRef, SetId, UnknownField};
use crate::limits::ByteBudget;

const MIN_SET_CAPACITY: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
struct SetHeader {
    start: usize,
    len: usize,
    cap: usize,
}

#[derive(Debug, Default)]
pub struct FieldArena<'a> {
    slab: Vec<UnknownField<'a>>,
    sets: Vec<SetHeader>,
    allocated: usize,
}

impl<'a> FieldArena<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with no slots reserved yet.
    pub(crate) fn alloc_set(&mut self, budget: &mut ByteBudget) -> Result<SetId, Error> {
        self.charge(budget, size_of::<SetHeader>())?;
        self.sets.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        let id = SetId(self.sets.len());
        self.sets.push(SetHeader {
            start: self.slab.len(),
            len: 0,
            cap: 0,
        });
        Ok(id)
    }

    /// Appends `field`, doubling the set's capacity (minimum 4) when full.
    pub(crate) fn push(
        &mut self,
        set: SetId,
        field: UnknownField<'a>,
        budget: &mut ByteBudget,
    ) -> Result<(), Error> {
        let h = self.sets[set.0];
        if h.len == h.cap {
            let new_cap = MIN_SET_CAPACITY.max(h.cap.checked_mul(2).ok_or(Error::OutOfMemory)?);
            self.grow(set, new_cap, budget)?;
        }
        let h = &mut self.sets[set.0];
        self.slab[h.start + h.len] = field;
        h.len += 1;
        Ok(())
    }

    fn grow(&mut self, set: SetId, new_cap: usize, budget: &mut ByteBudget) -> Result<(), Error> {
        let h = self.sets[set.0];
        debug_assert!(new_cap > h.cap);

        if h.start + h.cap == self.slab.len() {
            let extra = new_cap - h.cap;
            self.reserve_slots(extra, budget)?;
            self.slab.resize(h.start + new_cap, UnknownField::VACANT);
        } else {
            let new_start = self.slab.len();
            self.reserve_slots(new_cap, budget)?;
            self.slab.extend_from_within(h.start..h.start + h.len);
            self.slab.resize(new_start + new_cap, UnknownField::VACANT);
            self.sets[set.0].start = new_start;
        }
        self.sets[set.0].cap = new_cap;
        Ok(())
    }

    fn reserve_slots(&mut self, slots: usize, budget: &mut ByteBudget) -> Result<(), Error> {
        let bytes = slots
            .checked_mul(size_of::<UnknownField<'a>>())
            .ok_or(Error::OutOfMemory)?;
        self.charge(budget, bytes)?;
        self.slab.try_reserve(slots).map_err(|_| Error::OutOfMemory)
    }

    fn charge(&mut self, budget: &mut ByteBudget, bytes: usize) -> Result<(), Error> {
        budget.charge(bytes)?;
        self.allocated += bytes;
        Ok(())
    }

    pub fn set(&self, id: SetId) -> FieldSetRef<'_, 'a> {
        FieldSetRef::new(self, id)
    }

    pub fn fields(&self, id: SetId) -> &[UnknownField<'a>] {
        let h = self.sets[id.0];
        &self.slab[h.start..h.start + h.len]
    }

    pub(crate) fn fields_mut(&mut self, id: SetId) -> &mut [UnknownField<'a>] {
        let h = self.sets[id.0];
        &mut self.slab[h.start..h.start + h.len]
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Bytes handed out so far, abandoned regions included.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    /// Frees every set at once. All `SetId`s handed out become invalid.
    pub fn release_all(&mut self) {
        self.slab = Vec::new();
        self.sets = Vec::new();
        self.allocated = 0;
    }
}
