use wirecmp_contracts::DEFAULT_MAX_DEPTH;

use crate::error::Error;

/// Resource ceilings for one comparison or parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Group nesting budget. Entering a group consumes one unit and the budget
    /// may never drop below 1, so `max_depth = n` admits `n - 1` nested levels.
    pub max_depth: u32,
    /// Ceiling on bytes held by the arena and sort scratch together.
    /// `None` leaves only the global allocator as a limit.
    pub arena_bytes: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            arena_bytes: None,
        }
    }
}

impl Limits {
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

/// Running total of bytes charged against `Limits::arena_bytes`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteBudget {
    limit: Option<usize>,
    used: usize,
}

impl ByteBudget {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self { limit, used: 0 }
    }

    pub(crate) fn charge(&mut self, bytes: usize) -> Result<(), Error> {
        let used = self.used.checked_add(bytes).ok_or(Error::OutOfMemory)?;
        if let Some(limit) = self.limit {
            if used > limit {
                return Err(Error::OutOfMemory);
            }
        }
        self.used = used;
        Ok(())
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }
}
