use std::fmt;

/// Abort reasons that unwind a build from any nesting level back to the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// An arena or scratch-buffer growth step failed.
    OutOfMemory,
    /// Group nesting would exceed the caller's depth budget.
    MaxDepthExceeded,
}

impl Error {
    pub fn as_str(self) -> &'static str {
        match self {
            Error::OutOfMemory => "out_of_memory",
            Error::MaxDepthExceeded => "max_depth_exceeded",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfMemory => f.write_str("out of memory while building unknown fields"),
            Error::MaxDepthExceeded => f.write_str("unknown field groups nest deeper than max_depth"),
        }
    }
}

impl std::error::Error for Error {}
