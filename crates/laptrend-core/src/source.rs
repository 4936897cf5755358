//! # Session Source
//!
//! The read-only collaborator the aggregation engine consumes.
//!
//! - `SessionSource` is the repository seam: one fetch per request, laps
//!   already attached to every session.
//! - `SessionFilter` carries the driver plus optional track and date window.
//! - `InMemorySource` is the reference implementation, used by tests and by
//!   callers that already hold a snapshot.
//!
//! Implementations must be `Send + Sync`: the HTTP layer shares one source
//! across concurrent requests.

use crate::{DriverId, LaptrendError, Session, TrackId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// DATE RANGE
// =============================================================================

/// Inclusive calendar-date window.
///
/// Constructed only through [`DateRange::new`], so `start <= end` always
/// holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting reversed bounds. Any span is accepted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LaptrendError> {
        if start > end {
            return Err(LaptrendError::InvalidFilter(format!(
                "date range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the window (inclusive on both ends).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// =============================================================================
// SESSION FILTER
// =============================================================================

/// Selection criteria passed to a [`SessionSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFilter {
    pub driver_id: DriverId,
    pub track_id: Option<TrackId>,
    pub date_range: Option<DateRange>,
}

impl SessionFilter {
    /// All sessions of a driver.
    #[must_use]
    pub fn driver(driver_id: DriverId) -> Self {
        Self {
            driver_id,
            track_id: None,
            date_range: None,
        }
    }

    /// Restrict to one track.
    #[must_use]
    pub fn with_track(mut self, track_id: TrackId) -> Self {
        self.track_id = Some(track_id);
        self
    }

    /// Restrict to a date window.
    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Whether a session satisfies every criterion of this filter.
    #[must_use]
    pub fn matches(&self, session: &Session) -> bool {
        session.driver_id == self.driver_id
            && self
                .track_id
                .as_ref()
                .is_none_or(|track| session.track_id == *track)
            && self
                .date_range
                .is_none_or(|range| range.contains(session.date))
    }
}

// =============================================================================
// SESSION SOURCE TRAIT
// =============================================================================

/// Read-only access to imported sessions.
///
/// Any failure must be reported as `LaptrendError::UpstreamFailure`; the
/// engine propagates it unchanged and never retries.
pub trait SessionSource: Send + Sync {
    /// Fetch every session matching `filter`, laps attached, in any order.
    fn fetch_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, LaptrendError>;

    /// Total number of sessions held by this source.
    fn session_count(&self) -> Result<usize, LaptrendError>;
}

// =============================================================================
// IN-MEMORY SOURCE
// =============================================================================

/// A `SessionSource` over an owned snapshot of sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sessions: Vec<Session>,
}

impl InMemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `sessions`.
    #[must_use]
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// Add a session to the snapshot.
    pub fn push(&mut self, session: Session) {
        self.sessions.push(session);
    }
}

impl SessionSource for InMemorySource {
    fn fetch_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, LaptrendError> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    fn session_count(&self) -> Result<usize, LaptrendError> {
        Ok(self.sessions.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lap, SessionId};
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn session(id: &str, driver: &str, track: &str, on: NaiveDate) -> Session {
        Session {
            id: SessionId::new(id),
            driver_id: DriverId::new(driver),
            track_id: TrackId::new(track),
            date: on,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).expect("time"),
            total_time_ms: 180_000,
            best_lap_ms: Some(90_000),
            laps: vec![Lap::new(1, 90_000), Lap::new(2, 90_000)],
        }
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let result = DateRange::new(date(2024, 5, 5), date(2024, 5, 4));
        assert!(matches!(result, Err(LaptrendError::InvalidFilter(_))));
    }

    #[test]
    fn range_accepts_multi_decade_window() {
        let range = DateRange::new(date(2010, 1, 1), date(2024, 12, 31)).expect("range");
        assert!(range.contains(date(2010, 1, 1)));
        assert!(range.contains(date(2017, 7, 14)));
        assert!(range.contains(date(2024, 12, 31)));
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new(date(2024, 5, 4), date(2024, 5, 5)).expect("range");
        assert!(range.contains(date(2024, 5, 4)));
        assert!(range.contains(date(2024, 5, 5)));
        assert!(!range.contains(date(2024, 5, 3)));
        assert!(!range.contains(date(2024, 5, 6)));
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::day(date(2024, 5, 4));
        assert_eq!(range.start(), range.end());
        assert!(range.contains(date(2024, 5, 4)));
    }

    #[test]
    fn filter_matches_all_criteria() {
        let s = session("s1", "d1", "spa", date(2024, 5, 4));

        assert!(SessionFilter::driver(DriverId::new("d1")).matches(&s));
        assert!(!SessionFilter::driver(DriverId::new("d2")).matches(&s));

        let on_track = SessionFilter::driver(DriverId::new("d1")).with_track(TrackId::new("spa"));
        assert!(on_track.matches(&s));
        let off_track =
            SessionFilter::driver(DriverId::new("d1")).with_track(TrackId::new("monza"));
        assert!(!off_track.matches(&s));

        let outside = SessionFilter::driver(DriverId::new("d1"))
            .with_range(DateRange::day(date(2024, 6, 1)));
        assert!(!outside.matches(&s));
    }

    #[test]
    fn in_memory_source_filters() {
        let mut source = InMemorySource::new();
        source.push(session("s1", "d1", "spa", date(2024, 5, 4)));
        source.push(session("s2", "d1", "monza", date(2024, 6, 1)));
        source.push(session("s3", "d2", "spa", date(2024, 5, 4)));

        let fetched = source
            .fetch_sessions(&SessionFilter::driver(DriverId::new("d1")))
            .expect("fetch");
        assert_eq!(fetched.len(), 2);

        let fetched = source
            .fetch_sessions(
                &SessionFilter::driver(DriverId::new("d1")).with_track(TrackId::new("spa")),
            )
            .expect("fetch");
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, SessionId::new("s1"));

        assert_eq!(source.session_count().expect("count"), 3);
    }
}
