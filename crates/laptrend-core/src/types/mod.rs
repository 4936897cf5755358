//! # Core Type Definitions
//!
//! This module contains the entities the aggregation engine reads:
//! - Identifiers (`DriverId`, `TrackId`, `SessionId`)
//! - Imported telemetry (`Session`, `Lap`)
//! - Error types (`LaptrendError`)
//!
//! Sessions are immutable once imported. The engine never mutates them; it
//! only derives progress entries from them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a driver, as assigned by the capture client.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

impl DriverId {
    /// Create a new driver identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a track (circuit layout).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub String);

impl TrackId {
    /// Create a new track identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a recorded session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new session identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// LAP
// =============================================================================

/// One timed circuit within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    /// 1-based lap number, unique within its session.
    pub lap_number: u32,
    /// Lap time in milliseconds. Always positive for validated laps.
    pub lap_time_ms: u64,
    /// Sector breakdown in milliseconds. Opaque to the engine.
    pub sectors_ms: Option<Vec<u64>>,
}

impl Lap {
    /// Create a lap without sector data.
    #[must_use]
    pub fn new(lap_number: u32, lap_time_ms: u64) -> Self {
        Self {
            lap_number,
            lap_time_ms,
            sectors_ms: None,
        }
    }

    /// Attach a sector breakdown.
    #[must_use]
    pub fn with_sectors(mut self, sectors_ms: Vec<u64>) -> Self {
        self.sectors_ms = Some(sectors_ms);
        self
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One recorded driving outing with its laps attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub driver_id: DriverId,
    pub track_id: TrackId,
    /// Calendar date of the outing.
    pub date: NaiveDate,
    /// Time of day the outing started. Orders sessions within a day.
    pub start_time: NaiveTime,
    pub total_time_ms: u64,
    /// Best lap as stored by the capture client. Not trusted when laps exist.
    pub best_lap_ms: Option<u64>,
    /// Laps in recorded order.
    pub laps: Vec<Lap>,
}

impl Session {
    /// Best lap time, recomputed from the laps.
    ///
    /// Falls back to the stored `best_lap_ms` only when the session carries
    /// no laps at all.
    #[must_use]
    pub fn effective_best_lap_ms(&self) -> Option<u64> {
        self.laps
            .iter()
            .map(|lap| lap.lap_time_ms)
            .min()
            .or(self.best_lap_ms)
    }

    /// Number of laps in this session.
    #[must_use]
    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    /// Lap times in recorded order.
    #[must_use]
    pub fn lap_times_ms(&self) -> Vec<u64> {
        self.laps.iter().map(|lap| lap.lap_time_ms).collect()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Laptrend system.
///
/// A request that matches no sessions is NOT an error: the aggregator
/// returns an empty result instead.
#[derive(Debug, Error)]
pub enum LaptrendError {
    /// The caller supplied an incomplete or contradictory filter.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The session data source failed. Never retried by the engine.
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// An imported session failed validation.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl LaptrendError {
    /// Whether the error is the caller's fault rather than the system's.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFilter(_) | Self::InvalidSession(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
