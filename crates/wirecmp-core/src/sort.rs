//! Stable merge sort of unknown fields by tag.
//!
//! Fields sharing a tag keep their encounter order: equality compares sets
//! position by position, so reordering duplicates would change the answer.

use std::mem::size_of;

use crate::error::Error;
use crate::field_set::UnknownField;
use crate::limits::ByteBudget;

const MIN_SCRATCH_LEN: usize = 8;

/// Merge buffer shared by every sort of one call. It grows geometrically to the
/// largest set seen so far and is never shrunk before the call ends.
#[derive(Debug, Default)]
pub(crate) struct SortScratch<'a> {
    buf: Vec<UnknownField<'a>>,
    size: usize,
}

impl<'a> SortScratch<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn sort(
        &mut self,
        fields: &mut [UnknownField<'a>],
        budget: &mut ByteBudget,
    ) -> Result<(), Error> {
        let n = fields.len();
        self.ensure(n, budget)?;
        sort_range(fields, 0, n, &mut self.buf);
        Ok(())
    }

    fn ensure(&mut self, n: usize, budget: &mut ByteBudget) -> Result<(), Error> {
        if self.size >= n {
            return Ok(());
        }
        let mut size = MIN_SCRATCH_LEN.max(self.size);
        while size < n {
            size = size.checked_mul(2).ok_or(Error::OutOfMemory)?;
        }
        let extra = size - self.size;
        budget.charge(
            extra
                .checked_mul(size_of::<UnknownField<'a>>())
                .ok_or(Error::OutOfMemory)?,
        )?;
        self.buf.clear();
        self.buf.try_reserve_exact(size).map_err(|_| Error::OutOfMemory)?;
        self.size = size;
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.buf = Vec::new();
        self.size = 0;
    }
}

fn sort_range<'a>(
    arr: &mut [UnknownField<'a>],
    start: usize,
    end: usize,
    tmp: &mut Vec<UnknownField<'a>>,
) {
    if end - start > 1 {
        let mid = start + (end - start) / 2;
        sort_range(arr, start, mid, tmp);
        sort_range(arr, mid, end, tmp);
        merge(arr, start, mid, end, tmp);
    }
}

fn merge<'a>(
    arr: &mut [UnknownField<'a>],
    start: usize,
    mid: usize,
    end: usize,
    tmp: &mut Vec<UnknownField<'a>>,
) {
    // Fits in the reserved capacity, so this never reallocates.
    tmp.clear();
    tmp.extend_from_slice(&arr[start..end]);
    let (left, right) = tmp.split_at(mid - start);

    let (mut i, mut j, mut out) = (0, 0, start);
    while i < left.len() && j < right.len() {
        // `<=` takes from the left run on ties, which is what makes this stable.
        if left[i].tag <= right[j].tag {
            arr[out] = left[i];
            i += 1;
        } else {
            arr[out] = right[j];
            j += 1;
        }
        out += 1;
    }
    let rest = if i < left.len() { &left[i..] } else { &right[j..] };
    arr[out..end].copy_from_slice(rest);
}
