//! # Consistency Scorer
//!
//! Consistency is the inverse of lap-time variability within one session:
//!
//! ```text
//! cv          = population_stddev(laps) / mean(laps)
//! consistency = round(clamp(100 * (1 - cv), 0, 100))
//! ```
//!
//! Identical laps score 100. A tighter spread around the same mean never
//! scores lower than a wider one.

use crate::primitives::MIN_LAPS_FOR_CONSISTENCY;

/// Mean and population standard deviation of a lap-time sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapSpread {
    pub mean_ms: f64,
    pub stddev_ms: f64,
}

impl LapSpread {
    /// Compute the spread of a sequence. `None` when empty.
    #[must_use]
    pub fn of(lap_times_ms: &[u64]) -> Option<Self> {
        if lap_times_ms.is_empty() {
            return None;
        }

        let n = lap_times_ms.len() as f64;
        let mean_ms = lap_times_ms.iter().map(|&t| t as f64).sum::<f64>() / n;
        let variance = lap_times_ms
            .iter()
            .map(|&t| {
                let diff = t as f64 - mean_ms;
                diff * diff
            })
            .sum::<f64>()
            / n;

        Some(Self {
            mean_ms,
            stddev_ms: variance.sqrt(),
        })
    }

    /// Coefficient of variation. `None` for a zero mean.
    #[must_use]
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean_ms > 0.0 {
            Some(self.stddev_ms / self.mean_ms)
        } else {
            None
        }
    }
}

/// Consistency percentage of a session's lap times.
///
/// Returns `None` with fewer than two laps, or when the mean is zero.
#[must_use]
pub fn consistency(lap_times_ms: &[u64]) -> Option<u8> {
    if lap_times_ms.len() < MIN_LAPS_FOR_CONSISTENCY {
        return None;
    }

    let cv = LapSpread::of(lap_times_ms)?.coefficient_of_variation()?;
    let pct = (100.0 * (1.0 - cv)).clamp(0.0, 100.0).round();

    Some(pct as u8)
}

// =============================================================================
// TESTS
// =============================================================================
