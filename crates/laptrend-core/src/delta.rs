//! # Delta Calculator
//!
//! Signed change between a value and its chronological predecessor.
//! Lower lap times are better, so a negative delta is an improvement.
//! Large swings are preserved verbatim; flagging them is the caller's job.
//! A difference that does not fit in `i64` is reported as undefined.

use serde::{Deserialize, Serialize};

/// Change of a best lap relative to the preceding entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    /// `current - previous` in milliseconds.
    pub delta_ms: Option<i64>,
    /// `delta_ms / previous * 100`. Undefined for a zero or missing predecessor.
    pub delta_pct: Option<f64>,
}

impl Delta {
    /// The delta of an entry with no predecessor.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this delta is a strict improvement (faster than before).
    #[must_use]
    pub fn is_improvement(&self) -> bool {
        self.delta_ms.is_some_and(|d| d < 0)
    }
}

/// Compute the delta of `current` against `previous`.
#[must_use]
pub fn delta(current: Option<u64>, previous: Option<u64>) -> Delta {
    let (Some(current), Some(previous)) = (current, previous) else {
        return Delta::none();
    };

    let Some(delta_ms) = diff_ms(current, previous) else {
        return Delta::none();
    };
    let delta_pct = if previous == 0 {
        None
    } else {
        Some(delta_ms as f64 / previous as f64 * 100.0)
    };

    Delta {
        delta_ms: Some(delta_ms),
        delta_pct,
    }
}

/// `current - previous` as a signed value, or `None` when either side or
/// the result falls outside `i64`.
#[must_use]
pub fn diff_ms(current: u64, previous: u64) -> Option<i64> {
    let current = i64::try_from(current).ok()?;
    let previous = i64::try_from(previous).ok()?;
    current.checked_sub(previous)
}

// =============================================================================
// TESTS
// =============================================================================
