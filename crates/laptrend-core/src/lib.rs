//! # laptrend-core
//!
//! The driver progress aggregation engine for Laptrend - THE LOGIC.
//!
//! This crate turns a driver's imported session/lap history into a
//! mode-dependent progress narrative:
//! - **weekend**: session-to-session deltas inside a date window
//! - **track**: one representative per visit date at a single track
//! - **overall**: every session, across all tracks
//!
//! plus qualitative score labeling for any 0-100 metric.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is stateless: every aggregation reads one snapshot from a `SessionSource`
//! - Never mutates sessions; it only derives entries from them
//! - Never retries or masks a data-source failure
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod classifier;
pub mod consistency;
pub mod delta;
pub mod primitives;
pub mod progress;
pub mod source;
pub mod storage;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DriverId, Lap, LaptrendError, Session, SessionId, TrackId};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use classifier::{ScoreBucket, classify};
pub use consistency::{LapSpread, consistency};
pub use delta::{Delta, delta, diff_ms};
pub use progress::{
    ModeKind, ProgressEntry, ProgressMode, ProgressResult, ProgressSummary, compute_progress,
};
pub use source::{DateRange, InMemorySource, SessionFilter, SessionSource};
pub use storage::{ImportReport, RedbSessionStore};
pub use validation::SessionValidator;
