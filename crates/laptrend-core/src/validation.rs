//! # Session Validation
//!
//! Checks imported sessions before they reach any store.
//!
//! - Reject malformed records outright (no repair, no enrichment)
//! - A batch is accepted only if every session in it is valid
//! - A stored `best_lap_ms` that disagrees with the laps is NOT rejected:
//!   the engine recomputes best laps anyway

use crate::primitives::{
    MAX_ID_LENGTH, MAX_IMPORT_BATCH, MAX_LAPS_PER_SESSION, MAX_LAP_TIME_MS, MAX_SECTORS_PER_LAP,
};
use crate::{LaptrendError, Session};
use std::collections::BTreeSet;

/// Validates sessions for import.
pub struct SessionValidator;

impl SessionValidator {
    /// Validate a single session.
    ///
    /// A session is valid if:
    /// - Its id, driver id and track id are non-empty and within length limits
    /// - It has at most `MAX_LAPS_PER_SESSION` laps
    /// - Every lap time, and any stored best lap, is positive and at most
    ///   `MAX_LAP_TIME_MS`
    /// - Lap numbers are 1-based and unique within the session
    /// - Sector breakdowns, when present, are within `MAX_SECTORS_PER_LAP`
    pub fn validate(session: &Session) -> Result<(), LaptrendError> {
        check_id("session id", session.id.as_str())?;
        check_id("driver id", session.driver_id.as_str())?;
        check_id("track id", session.track_id.as_str())?;

        if session.laps.len() > MAX_LAPS_PER_SESSION {
            return Err(invalid(
                session,
                format!(
                    "{} laps exceeds maximum {}",
                    session.laps.len(),
                    MAX_LAPS_PER_SESSION
                ),
            ));
        }

        if let Some(best) = session.best_lap_ms.filter(|&b| b > MAX_LAP_TIME_MS) {
            return Err(invalid(
                session,
                format!("best lap {} ms exceeds maximum {}", best, MAX_LAP_TIME_MS),
            ));
        }

        let mut seen = BTreeSet::new();
        for lap in &session.laps {
            if lap.lap_number == 0 {
                return Err(invalid(session, "lap numbers are 1-based".to_string()));
            }
            if !seen.insert(lap.lap_number) {
                return Err(invalid(
                    session,
                    format!("duplicate lap number {}", lap.lap_number),
                ));
            }
            if lap.lap_time_ms == 0 {
                return Err(invalid(
                    session,
                    format!("lap {} has a zero lap time", lap.lap_number),
                ));
            }
            if lap.lap_time_ms > MAX_LAP_TIME_MS {
                return Err(invalid(
                    session,
                    format!(
                        "lap {} time {} ms exceeds maximum {}",
                        lap.lap_number, lap.lap_time_ms, MAX_LAP_TIME_MS
                    ),
                ));
            }
            if lap
                .sectors_ms
                .as_ref()
                .is_some_and(|s| s.len() > MAX_SECTORS_PER_LAP)
            {
                return Err(invalid(
                    session,
                    format!("lap {} has too many sectors", lap.lap_number),
                ));
            }
        }

        Ok(())
    }

    /// Validate a whole batch. Session ids must be unique within the batch.
    pub fn validate_batch(sessions: &[Session]) -> Result<(), LaptrendError> {
        if sessions.len() > MAX_IMPORT_BATCH {
            return Err(LaptrendError::InvalidSession(format!(
                "batch of {} sessions exceeds maximum {}",
                sessions.len(),
                MAX_IMPORT_BATCH
            )));
        }

        let mut ids = BTreeSet::new();
        for session in sessions {
            Self::validate(session)?;
            if !ids.insert(session.id.as_str()) {
                return Err(invalid(session, "duplicate session id in batch".to_string()));
            }
        }
        Ok(())
    }
}

fn check_id(what: &str, value: &str) -> Result<(), LaptrendError> {
    if value.trim().is_empty() {
        return Err(LaptrendError::InvalidSession(format!("{} is empty", what)));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(LaptrendError::InvalidSession(format!(
            "{} length {} exceeds maximum {} bytes",
            what,
            value.len(),
            MAX_ID_LENGTH
        )));
    }
    Ok(())
}

fn invalid(session: &Session, reason: String) -> LaptrendError {
    LaptrendError::InvalidSession(format!("session {}: {}", session.id.as_str(), reason))
}

// =============================================================================
// TESTS
// =============================================================================
