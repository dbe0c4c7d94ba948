use serde::Serialize;

use crate::builder::BuildContext;
use crate::equal::sets_equal;
use crate::error::Error;
use crate::field_set::CanonicalFields;
use crate::limits::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareResult {
    Equal,
    NotEqual,
    OutOfMemory,
    MaxDepthExceeded,
}

impl CompareResult {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareResult::Equal => "equal",
            CompareResult::NotEqual => "not_equal",
            CompareResult::OutOfMemory => Error::OutOfMemory.as_str(),
            CompareResult::MaxDepthExceeded => Error::MaxDepthExceeded.as_str(),
        }
    }

    pub fn is_equal(self) -> bool {
        self == CompareResult::Equal
    }
}

impl From<Error> for CompareResult {
    fn from(err: Error) -> Self {
        match err {
            Error::OutOfMemory => CompareResult::OutOfMemory,
            Error::MaxDepthExceeded => CompareResult::MaxDepthExceeded,
        }
    }
}

impl From<bool> for CompareResult {
    fn from(equal: bool) -> Self {
        if equal {
            CompareResult::Equal
        } else {
            CompareResult::NotEqual
        }
    }
}

/// Compares two unknown-field buffers, ignoring the order of distinct tags.
///
/// Both buffers must hold well-formed wire data (see `check_well_formed`);
/// `max_depth` bounds group nesting.
pub fn compare(buf1: &[u8], buf2: &[u8], max_depth: u32) -> CompareResult {
    compare_with_limits(buf1, buf2, &Limits::with_max_depth(max_depth))
}

pub fn compare_with_limits(buf1: &[u8], buf2: &[u8], limits: &Limits) -> CompareResult {
    if buf1.is_empty() && buf2.is_empty() {
        return CompareResult::Equal;
    }
    if buf1.is_empty() || buf2.is_empty() {
        return CompareResult::NotEqual;
    }
    if buf1 == buf2 {
        return CompareResult::Equal;
    }

    let mut ctx = BuildContext::new(limits);
    let result = match build_and_compare(&mut ctx, buf1, buf2) {
        Ok(equal) => CompareResult::from(equal),
        Err(err) => CompareResult::from(err),
    };
    ctx.release();
    result
}

fn build_and_compare<'a>(
    ctx: &mut BuildContext<'a>,
    buf1: &'a [u8],
    buf2: &'a [u8],
) -> Result<bool, Error> {
    let a = ctx.build(buf1)?;
    let b = ctx.build(buf2)?;
    let arena = ctx.arena();
    Ok(sets_equal(arena.set(a), arena.set(b)))
}

/// Builds one buffer into its canonical, tag-sorted field tree.
pub fn parse<'a>(buf: &'a [u8], limits: &Limits) -> Result<CanonicalFields<'a>, Error> {
    let mut ctx = BuildContext::new(limits);
    let root = ctx.build(buf)?;
    Ok(CanonicalFields {
        arena: ctx.into_arena(),
        root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_paths_skip_parsing() {
        assert_eq!(compare(b"", b"", 0), CompareResult::Equal);
        assert_eq!(compare(b"", &[0x08, 0x01], 0), CompareResult::NotEqual);
        assert_eq!(compare(&[0x08, 0x01], b"", 0), CompareResult::NotEqual);
        // Identical bytes are equal even with a zero depth budget and a group inside.
        let nested = [0x0b, 0x0b, 0x0c, 0x0c];
        assert_eq!(compare(&nested, &nested, 0), CompareResult::Equal);
    }

    #[test]
    fn errors_map_to_result_values() {
        let a = [0x0b, 0x08, 0x01, 0x0c];
        let b = [0x0b, 0x08, 0x02, 0x0c];
        assert_eq!(compare(&a, &b, 1), CompareResult::MaxDepthExceeded);
        let limits = Limits {
            arena_bytes: Some(0),
            ..Limits::default()
        };
        assert_eq!(
            compare_with_limits(&a, &b, &limits),
            CompareResult::OutOfMemory
        );
        assert_eq!(compare(&a, &b, 2), CompareResult::NotEqual);
    }

    #[test]
    fn result_strings_are_stable() {
        assert_eq!(CompareResult::Equal.as_str(), "equal");
        assert_eq!(CompareResult::NotEqual.as_str(), "not_equal");
        assert_eq!(CompareResult::OutOfMemory.as_str(), "out_of_memory");
        assert_eq!(
            CompareResult::MaxDepthExceeded.as_str(),
            "max_depth_exceeded"
        );
        assert!(CompareResult::Equal.is_equal());
        assert!(!CompareResult::NotEqual.is_equal());
    }

    #[test]
    fn parsed_trees_compare_across_arenas() {
        let limits = Limits::default();
        let a = parse(&[0x10, 0x02, 0x08, 0x01], &limits).expect("parse a");
        let b = parse(&[0x08, 0x01, 0x10, 0x02], &limits).expect("parse b");
        assert!(a == b);
        assert_eq!(a.root().len(), 2);
        assert!(a.arena_bytes() > 0);
    }
}
