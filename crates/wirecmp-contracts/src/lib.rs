//! Shared, version-pinned protocol identifiers.
//!
//! These constants are the single source of truth for schema/version strings that
//! appear in machine-readable output, plus the defaults every entry point agrees on.

pub const WIRECMP_COMPARE_REPORT_SCHEMA_VERSION: &str = "wirecmp.compare.report@0.1.0";
pub const WIRECMP_DUMP_REPORT_SCHEMA_VERSION: &str = "wirecmp.dump.report@0.1.0";

/// Group nesting budget used when the caller does not pick one.
///
/// Matches the default recursion limit of protobuf decoders.
pub const DEFAULT_MAX_DEPTH: u32 = 100;

pub const ENV_MAX_DEPTH: &str = "WIRECMP_MAX_DEPTH";
