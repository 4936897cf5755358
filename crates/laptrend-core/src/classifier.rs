//! # Score Classifier
//!
//! Maps a 0-100 score onto a qualitative bucket.
//!
//! The same buckets are used for every score-bearing metric (consistency,
//! pace, behavior). The function is total: scores outside `[0, 100]` fall
//! into the boundary bucket, and NaN is treated as the lowest score.

use crate::primitives::{
    EXCELLENT_THRESHOLD, MODERATE_THRESHOLD, NEEDS_WORK_THRESHOLD, STRONG_THRESHOLD,
};
use serde::{Deserialize, Serialize};

/// Qualitative bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreBucket {
    Poor,
    NeedsWork,
    Moderate,
    Strong,
    Excellent,
}

impl ScoreBucket {
    /// Every bucket, worst first.
    pub const ALL: [ScoreBucket; 5] = [
        ScoreBucket::Poor,
        ScoreBucket::NeedsWork,
        ScoreBucket::Moderate,
        ScoreBucket::Strong,
        ScoreBucket::Excellent,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBucket::Excellent => "Excellent",
            ScoreBucket::Strong => "Strong",
            ScoreBucket::Moderate => "Moderate",
            ScoreBucket::NeedsWork => "Needs Work",
            ScoreBucket::Poor => "Poor",
        }
    }

    /// Machine-readable variant name.
    #[must_use]
    pub fn variant(&self) -> &'static str {
        match self {
            ScoreBucket::Excellent => "excellent",
            ScoreBucket::Strong => "strong",
            ScoreBucket::Moderate => "moderate",
            ScoreBucket::NeedsWork => "needs-work",
            ScoreBucket::Poor => "poor",
        }
    }

    /// CSS color class used by rendering code.
    #[must_use]
    pub fn color_class(&self) -> &'static str {
        match self {
            ScoreBucket::Excellent => "text-emerald-500",
            ScoreBucket::Strong => "text-green-500",
            ScoreBucket::Moderate => "text-yellow-500",
            ScoreBucket::NeedsWork => "text-orange-500",
            ScoreBucket::Poor => "text-red-500",
        }
    }

    /// Inclusive lower bound of this bucket, if it has one.
    #[must_use]
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            ScoreBucket::Excellent => Some(EXCELLENT_THRESHOLD),
            ScoreBucket::Strong => Some(STRONG_THRESHOLD),
            ScoreBucket::Moderate => Some(MODERATE_THRESHOLD),
            ScoreBucket::NeedsWork => Some(NEEDS_WORK_THRESHOLD),
            ScoreBucket::Poor => None,
        }
    }
}

impl std::fmt::Display for ScoreBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a score. Thresholds are inclusive lower bounds.
#[must_use]
pub fn classify(score: f64) -> ScoreBucket {
    // NaN fails every comparison and lands in Poor.
    if score >= EXCELLENT_THRESHOLD {
        ScoreBucket::Excellent
    } else if score >= STRONG_THRESHOLD {
        ScoreBucket::Strong
    } else if score >= MODERATE_THRESHOLD {
        ScoreBucket::Moderate
    } else if score >= NEEDS_WORK_THRESHOLD {
        ScoreBucket::NeedsWork
    } else {
        ScoreBucket::Poor
    }
}

// =============================================================================
// TESTS
// =============================================================================
