//! # Engine Primitives
//!
//! Compile-time constants for the Laptrend CORE.
//!
//! These values are fixed in the binary and immutable at runtime:
//! 1. **Score thresholds**: inclusive lower bounds of each score bucket.
//! 2. **Validation limits**: bounds applied to imported sessions.

// =============================================================================
// SCORE THRESHOLDS
// =============================================================================

/// Scores at or above this value are "Excellent".
pub const EXCELLENT_THRESHOLD: f64 = 90.0;

/// Scores at or above this value are "Strong".
pub const STRONG_THRESHOLD: f64 = 80.0;

/// Scores at or above this value are "Moderate".
pub const MODERATE_THRESHOLD: f64 = 70.0;

/// Scores at or above this value "Need Work". Anything lower is "Poor".
pub const NEEDS_WORK_THRESHOLD: f64 = 60.0;

// =============================================================================
// CONSISTENCY
// =============================================================================

/// Minimum number of laps for a consistency score to be defined.
pub const MIN_LAPS_FOR_CONSISTENCY: usize = 2;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for driver, track and session identifiers.
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum number of laps in a single imported session.
///
/// Endurance stints rarely exceed a few hundred laps; this bounds the
/// memory cost of a single record.
pub const MAX_LAPS_PER_SESSION: usize = 2000;

/// Maximum lap time accepted on import, in milliseconds (24 hours).
///
/// Keeps every stored lap time well inside `i64`, so deltas never wrap.
pub const MAX_LAP_TIME_MS: u64 = 86_400_000;

/// Maximum number of sectors per lap.
pub const MAX_SECTORS_PER_LAP: usize = 64;

/// Maximum number of sessions in a single import batch.
pub const MAX_IMPORT_BATCH: usize = 10_000;

/// Current on-disk format version of the session store.
///
/// Increment this when making breaking changes to the stored session encoding.
pub const STORE_FORMAT_VERSION: u64 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_strictly_descend() {
        assert!(EXCELLENT_THRESHOLD > STRONG_THRESHOLD);
        assert!(STRONG_THRESHOLD > MODERATE_THRESHOLD);
        assert!(MODERATE_THRESHOLD > NEEDS_WORK_THRESHOLD);
    }

    #[test]
    fn consistency_needs_two_laps() {
        assert_eq!(MIN_LAPS_FOR_CONSISTENCY, 2);
    }
}
