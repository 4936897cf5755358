//! # Capture-Client Import
//!
//! Parses the JSON export written by the data-capture client into core
//! [`Session`] values. Validation of the sessions themselves happens in the
//! core before anything is stored.
//!
//! ```json
//! { "sessions": [ { "id": "s1", "driverId": "d1", "trackId": "spa",
//!   "date": "2024-06-08", "startTime": "09:00:00", "totalTimeMs": 361000,
//!   "bestLapMs": 90000, "laps": [ { "lapNumber": 1, "lapTimeMs": 90500 } ] } ] }
//! ```

use chrono::{NaiveDate, NaiveTime};
use laptrend_core::{
    DriverId, Lap, LaptrendError, Session, SessionId, TrackId, primitives::MAX_IMPORT_BATCH,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Maximum export file size (100 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 100 * 1024 * 1024;

// =============================================================================
// EXPORT FORMAT
// =============================================================================

/// Top-level export document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFile {
    pub sessions: Vec<ImportSession>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub id: String,
    pub driver_id: String,
    pub track_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub total_time_ms: u64,
    #[serde(default)]
    pub best_lap_ms: Option<u64>,
    #[serde(default)]
    pub laps: Vec<ImportLap>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLap {
    pub lap_number: u32,
    pub lap_time_ms: u64,
    #[serde(default)]
    pub sectors_ms: Option<Vec<u64>>,
}

impl From<ImportLap> for Lap {
    fn from(lap: ImportLap) -> Self {
        Lap {
            lap_number: lap.lap_number,
            lap_time_ms: lap.lap_time_ms,
            sectors_ms: lap.sectors_ms,
        }
    }
}

impl From<ImportSession> for Session {
    fn from(s: ImportSession) -> Self {
        Session {
            id: SessionId::new(s.id),
            driver_id: DriverId::new(s.driver_id),
            track_id: TrackId::new(s.track_id),
            date: s.date,
            start_time: s.start_time,
            total_time_ms: s.total_time_ms,
            best_lap_ms: s.best_lap_ms,
            laps: s.laps.into_iter().map(Lap::from).collect(),
        }
    }
}

impl ImportFile {
    /// Parse an export document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LaptrendError> {
        let file: ImportFile = serde_json::from_slice(bytes)
            .map_err(|e| LaptrendError::SerializationError(format!("Invalid export: {}", e)))?;

        if file.sessions.len() > MAX_IMPORT_BATCH {
            return Err(LaptrendError::InvalidSession(format!(
                "Session count {} exceeds maximum allowed {}",
                file.sessions.len(),
                MAX_IMPORT_BATCH
            )));
        }
        Ok(file)
    }

    /// Convert into core sessions, preserving file order.
    #[must_use]
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions.into_iter().map(Session::from).collect()
    }
}

// =============================================================================
// FILE ACCESS
// =============================================================================

/// Read and parse an export file.
///
/// The path is canonicalized and must be a regular file within the size
/// limit.
pub fn read_export(path: &Path) -> Result<Vec<Session>, LaptrendError> {
    let validated = validate_file_path(path)?;

    let metadata = std::fs::metadata(&validated)
        .map_err(|e| LaptrendError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_IMPORT_FILE_SIZE {
        return Err(LaptrendError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_IMPORT_FILE_SIZE
        )));
    }

    let bytes = std::fs::read(&validated)
        .map_err(|e| LaptrendError::IoError(format!("Read file: {}", e)))?;
    Ok(ImportFile::from_slice(&bytes)?.into_sessions())
}

fn validate_file_path(path: &Path) -> Result<PathBuf, LaptrendError> {
    let canonical = path.canonicalize().map_err(|e| {
        LaptrendError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LaptrendError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// TESTS
// =============================================================================
