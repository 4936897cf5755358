//! # Progress Aggregator
//!
//! Turns a driver's session history into an ordered progress narrative.
//!
//! ## Modes
//!
//! | Mode | Sessions fetched | Grouping | Order |
//! |------|------------------|----------|-------|
//! | `Weekend` | driver, inside the range | none | (date, start time) |
//! | `Track` | driver + track, all time | one event per date | date |
//! | `Overall` | driver, optional range | none | (date, start time) |
//!
//! Once the sequence is built, per-entry work is mode-agnostic: best lap,
//! lap count, consistency, and the delta against the preceding entry.
//!
//! A driver with no matching sessions yields an empty result, never an error.

use crate::consistency::consistency;
use crate::delta::{Delta, delta, diff_ms};
use crate::source::{DateRange, SessionFilter, SessionSource};
use crate::{DriverId, LaptrendError, Session, SessionId, TrackId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// =============================================================================
// MODE
// =============================================================================

/// Aggregation mode. Required filters are part of each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMode {
    /// Session-to-session feedback inside a window (typically one day).
    Weekend { range: DateRange },
    /// Longitudinal trend at one track, one representative per visit date.
    Track { track_id: TrackId },
    /// Lifetime view across all tracks, optionally windowed.
    Overall { range: Option<DateRange> },
}

impl ProgressMode {
    /// The mode's name as used on the wire.
    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            ProgressMode::Weekend { .. } => ModeKind::Weekend,
            ProgressMode::Track { .. } => ModeKind::Track,
            ProgressMode::Overall { .. } => ModeKind::Overall,
        }
    }

    /// Build a mode from loosely-typed request parameters.
    ///
    /// Fails with `InvalidFilter` when the mode's required filter is missing.
    /// Filters a mode does not use are ignored.
    pub fn from_parts(
        kind: ModeKind,
        track_id: Option<TrackId>,
        range: Option<DateRange>,
    ) -> Result<Self, LaptrendError> {
        match kind {
            ModeKind::Weekend => range.map(|range| ProgressMode::Weekend { range }).ok_or_else(
                || LaptrendError::InvalidFilter("weekend mode requires a date range".to_string()),
            ),
            ModeKind::Track => track_id
                .filter(|t| !t.as_str().is_empty())
                .map(|track_id| ProgressMode::Track { track_id })
                .ok_or_else(|| {
                    LaptrendError::InvalidFilter("track mode requires a track id".to_string())
                }),
            ModeKind::Overall => Ok(ProgressMode::Overall { range }),
        }
    }

    /// The source filter this mode fetches with.
    fn filter(&self, driver_id: &DriverId) -> SessionFilter {
        let filter = SessionFilter::driver(driver_id.clone());
        match self {
            ProgressMode::Weekend { range } => filter.with_range(*range),
            ProgressMode::Track { track_id } => filter.with_track(track_id.clone()),
            ProgressMode::Overall { range: Some(range) } => filter.with_range(*range),
            ProgressMode::Overall { range: None } => filter,
        }
    }
}

/// Mode tag without its filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Weekend,
    Track,
    Overall,
}

impl ModeKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Weekend => "weekend",
            ModeKind::Track => "track",
            ModeKind::Overall => "overall",
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModeKind {
    type Err = LaptrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekend" => Ok(ModeKind::Weekend),
            "track" => Ok(ModeKind::Track),
            "overall" => Ok(ModeKind::Overall),
            other => Err(LaptrendError::InvalidFilter(format!(
                "unknown mode '{}', expected weekend, track or overall",
                other
            ))),
        }
    }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One point of the progress narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// The session this entry represents.
    pub session_id: SessionId,
    pub track_id: TrackId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub best_lap_ms: Option<u64>,
    pub lap_count: usize,
    pub consistency_pct: Option<u8>,
    pub delta_ms: Option<i64>,
    pub delta_pct: Option<f64>,
    /// Sessions collapsed into this entry. Above 1 only in track mode.
    pub sessions_in_event: usize,
}

/// Aggregate figures over a whole result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Source sessions that fed the result, before track-mode collapsing.
    pub total_sessions: usize,
    pub first_best_lap_ms: Option<u64>,
    pub last_best_lap_ms: Option<u64>,
    /// `last - first`. Negative is a net improvement.
    pub total_improvement_ms: Option<i64>,
}

/// Output of [`compute_progress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult {
    pub mode: ModeKind,
    pub entries: Vec<ProgressEntry>,
    pub summary: ProgressSummary,
}

impl ProgressResult {
    /// An empty result for `mode`.
    #[must_use]
    pub fn empty(mode: ModeKind) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            summary: ProgressSummary::default(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// Compute the progress narrative of `driver_id` under `mode`.
///
/// Calls `source` exactly once. Source failures are returned unchanged.
pub fn compute_progress<S>(
    source: &S,
    driver_id: &DriverId,
    mode: &ProgressMode,
) -> Result<ProgressResult, LaptrendError>
where
    S: SessionSource + ?Sized,
{
    if driver_id.as_str().trim().is_empty() {
        return Err(LaptrendError::InvalidFilter(
            "driver id must not be empty".to_string(),
        ));
    }

    let filter = mode.filter(driver_id);
    let mut sessions = source.fetch_sessions(&filter)?;

    // Do not trust the source to have filtered precisely.
    sessions.retain(|s| filter.matches(s));

    if sessions.is_empty() {
        return Ok(ProgressResult::empty(mode.kind()));
    }

    let total_sessions = sessions.len();
    let events = match mode {
        ProgressMode::Track { .. } => group_by_date(sessions),
        ProgressMode::Weekend { .. } | ProgressMode::Overall { .. } => {
            sessions.sort_by(chronological);
            sessions.into_iter().map(Event::single).collect()
        }
    };

    let entries = build_entries(&events);
    let summary = summarize(&entries, total_sessions);

    Ok(ProgressResult {
        mode: mode.kind(),
        entries,
        summary,
    })
}

/// A representative session plus how many sessions it stands for.
struct Event {
    session: Session,
    size: usize,
}

impl Event {
    fn single(session: Session) -> Self {
        Self { session, size: 1 }
    }
}

/// Ordering key for weekend and overall mode.
fn chronological(a: &Session, b: &Session) -> Ordering {
    (a.date, a.start_time, &a.id).cmp(&(b.date, b.start_time, &b.id))
}

/// Ordering of candidates within one track-mode event: fastest first.
///
/// A session without any best lap ranks behind every timed session. Ties
/// go to the earliest start, then the smallest id.
fn fastest_first(a: &Session, b: &Session) -> Ordering {
    let best = |s: &Session| s.effective_best_lap_ms().map_or((1, 0), |ms| (0, ms));
    (best(a), a.start_time, &a.id).cmp(&(best(b), b.start_time, &b.id))
}

/// Collapse sessions into one event per calendar date, ordered by date.
fn group_by_date(sessions: Vec<Session>) -> Vec<Event> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Session>> = BTreeMap::new();
    for session in sessions {
        by_date.entry(session.date).or_default().push(session);
    }

    by_date
        .into_values()
        .filter_map(|mut group| {
            let size = group.len();
            group.sort_by(fastest_first);
            group.into_iter().next().map(|session| Event { session, size })
        })
        .collect()
}

/// Derive entries from an ordered event sequence.
fn build_entries(events: &[Event]) -> Vec<ProgressEntry> {
    let mut entries: Vec<ProgressEntry> = Vec::with_capacity(events.len());
    let mut previous_best: Option<Option<u64>> = None;

    for event in events {
        let session = &event.session;
        let best_lap_ms = session.effective_best_lap_ms();

        let Delta {
            delta_ms,
            delta_pct,
        } = match previous_best {
            Some(prev) => delta(best_lap_ms, prev),
            None => Delta::none(),
        };

        entries.push(ProgressEntry {
            session_id: session.id.clone(),
            track_id: session.track_id.clone(),
            date: session.date,
            start_time: session.start_time,
            best_lap_ms,
            lap_count: session.lap_count(),
            consistency_pct: consistency(&session.lap_times_ms()),
            delta_ms,
            delta_pct,
            sessions_in_event: event.size,
        });

        previous_best = Some(best_lap_ms);
    }

    entries
}

fn summarize(entries: &[ProgressEntry], total_sessions: usize) -> ProgressSummary {
    let first_best_lap_ms = entries.first().and_then(|e| e.best_lap_ms);
    let last_best_lap_ms = entries.last().and_then(|e| e.best_lap_ms);

    let total_improvement_ms = match (first_best_lap_ms, last_best_lap_ms) {
        (Some(first), Some(last)) => diff_ms(last, first),
        _ => None,
    };

    ProgressSummary {
        total_sessions,
        first_best_lap_ms,
        last_best_lap_ms,
        total_improvement_ms,
    }
}

// =============================================================================
// TESTS
// =============================================================================
