//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. Field names are camelCase on the wire.

use chrono::{NaiveDate, NaiveTime};
use laptrend_core::{
    DateRange, DriverId, LaptrendError, ModeKind, ProgressEntry, ProgressMode, ProgressResult,
    ProgressSummary, ScoreBucket, TrackId, classify,
};
use serde::{Deserialize, Serialize};

/// Wire format of `startDate` / `endDate`.
const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Session store status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub session_count: usize,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl From<&LaptrendError> for ErrorResponse {
    fn from(e: &LaptrendError) -> Self {
        Self::new(e.to_string())
    }
}

// =============================================================================
// BUCKET RESPONSE
// =============================================================================

/// Classification of a single score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResponse {
    pub score: f64,
    pub bucket: ScoreBucket,
    pub label: String,
    pub variant: String,
    pub color_class: String,
}

impl BucketResponse {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        let bucket = classify(score);
        Self {
            score,
            bucket,
            label: bucket.label().to_string(),
            variant: bucket.variant().to_string(),
            color_class: bucket.color_class().to_string(),
        }
    }
}

/// Parse a score path segment. Only finite numbers are accepted.
pub fn parse_score(raw: &str) -> Result<f64, LaptrendError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| LaptrendError::InvalidFilter(format!("'{}' is not a finite score", raw)))
}

// =============================================================================
// PROGRESS REQUEST
// =============================================================================

/// Query parameters of `GET /drivers/{driverId}/progress-summary`.
///
/// All fields arrive as raw strings so that malformed values surface as
/// `InvalidFilter` instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    /// `weekend`, `track` or `overall`. Required.
    pub mode: Option<String>,
    pub track_id: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive. Requires `startDate`.
    pub end_date: Option<String>,
}

impl ProgressQuery {
    /// Validate the parameters into a [`ProgressMode`].
    ///
    /// A missing `mode` is rejected. A lone `startDate` selects that single day.
    pub fn to_mode(&self) -> Result<ProgressMode, LaptrendError> {
        let kind = non_blank(self.mode.as_deref())
            .ok_or_else(|| {
                LaptrendError::InvalidFilter(
                    "mode is required (weekend, track or overall)".to_string(),
                )
            })?
            .parse::<ModeKind>()?;

        let track_id = non_blank(self.track_id.as_deref()).map(TrackId::new);

        let start = non_blank(self.start_date.as_deref())
            .map(|s| parse_date("startDate", s))
            .transpose()?;
        let end = non_blank(self.end_date.as_deref())
            .map(|s| parse_date("endDate", s))
            .transpose()?;

        let range = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (Some(start), None) => Some(DateRange::day(start)),
            (None, Some(_)) => {
                return Err(LaptrendError::InvalidFilter(
                    "endDate requires startDate".to_string(),
                ));
            }
            (None, None) => None,
        };

        ProgressMode::from_parts(kind, track_id, range)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, LaptrendError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        LaptrendError::InvalidFilter(format!("{} '{}' is not a YYYY-MM-DD date", field, raw))
    })
}

// =============================================================================
// PROGRESS RESPONSE
// =============================================================================

/// Inclusive date window echoed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeJson {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<DateRange> for DateRangeJson {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start(),
            end_date: range.end(),
        }
    }
}

/// One progress entry, with the consistency bucket attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntryJson {
    pub session_id: String,
    pub track_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub best_lap_ms: Option<u64>,
    pub lap_count: usize,
    pub consistency_pct: Option<u8>,
    pub consistency_rating: Option<ScoreBucket>,
    pub delta_ms: Option<i64>,
    pub delta_pct: Option<f64>,
    pub sessions_in_event: usize,
}

impl From<&ProgressEntry> for ProgressEntryJson {
    fn from(entry: &ProgressEntry) -> Self {
        Self {
            session_id: entry.session_id.as_str().to_string(),
            track_id: entry.track_id.as_str().to_string(),
            date: entry.date,
            start_time: entry.start_time,
            best_lap_ms: entry.best_lap_ms,
            lap_count: entry.lap_count,
            consistency_pct: entry.consistency_pct,
            consistency_rating: entry.consistency_pct.map(|pct| classify(f64::from(pct))),
            delta_ms: entry.delta_ms,
            delta_pct: entry.delta_pct,
            sessions_in_event: entry.sessions_in_event,
        }
    }
}

/// Summary figures of a progress result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryJson {
    pub total_sessions: usize,
    pub first_best_lap_ms: Option<u64>,
    pub last_best_lap_ms: Option<u64>,
    pub total_improvement_ms: Option<i64>,
}

impl From<ProgressSummary> for SummaryJson {
    fn from(s: ProgressSummary) -> Self {
        Self {
            total_sessions: s.total_sessions,
            first_best_lap_ms: s.first_best_lap_ms,
            last_best_lap_ms: s.last_best_lap_ms,
            total_improvement_ms: s.total_improvement_ms,
        }
    }
}

/// Body of a successful progress-summary request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub mode: ModeKind,
    pub driver_id: String,
    pub track_id: Option<String>,
    pub date_range: Option<DateRangeJson>,
    pub sessions: Vec<ProgressEntryJson>,
    pub summary: SummaryJson,
}

impl ProgressResponse {
    /// Echo the request's filters alongside the computed result.
    #[must_use]
    pub fn new(driver_id: &DriverId, mode: &ProgressMode, result: &ProgressResult) -> Self {
        let (track_id, date_range): (Option<String>, Option<DateRangeJson>) = match mode {
            ProgressMode::Weekend { range } => (None, Some(DateRangeJson::from(*range))),
            ProgressMode::Track { track_id } => (Some(track_id.as_str().to_string()), None),
            ProgressMode::Overall { range } => (None, range.map(DateRangeJson::from)),
        };

        Self {
            mode: result.mode,
            driver_id: driver_id.as_str().to_string(),
            track_id,
            date_range,
            sessions: result.entries.iter().map(ProgressEntryJson::from).collect(),
            summary: result.summary.into(),
        }
    }
}
