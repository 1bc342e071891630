//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Kering fact store.
//!
//! The store starts with zero data but fixed logic. These values are
//! compiled into the binary and are immutable at runtime.

/// Default local name of the seeded asset.
///
/// Used when a store is opened over a path with no existing file and no
/// explicit seed parameters.
pub const DEFAULT_ASSET: &str = "oosterscheldekering";

/// Default number of parts seeded for a fresh asset.
pub const DEFAULT_PART_COUNT: u64 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of the durable store file, in bytes.
///
/// Validated BEFORE reading the file into memory, so a corrupted or
/// malicious file cannot trigger an unbounded allocation.
pub const MAX_STORE_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

/// Maximum length for a single term token (IRI or literal) in the store
/// file.
///
/// Longer terms fail the load. Terms minted by the store itself are always
/// far below this.
pub const MAX_TERM_LENGTH: usize = 4096;

/// Maximum number of patterns in a single query.
///
/// All queries must be computationally bounded; the join is nested-loop,
/// so the pattern count is the exponent.
pub const MAX_QUERY_PATTERNS: usize = 32;

/// Maximum number of inspection events accepted in one request.
///
/// The core ingests one event at a time; callers batching events enforce
/// this bound before looping.
pub const MAX_EVENTS_PER_REQUEST: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_is_one_part() {
        assert_eq!(DEFAULT_ASSET, "oosterscheldekering");
        assert_eq!(DEFAULT_PART_COUNT, 1);
    }

    #[test]
    fn term_limit_fits_in_file_limit() {
        assert!((MAX_TERM_LENGTH as u64) < MAX_STORE_FILE_SIZE);
    }
}
