//! # redb-backed Session Store
//!
//! A `SessionSource` over an embedded redb database, populated by batch
//! import of capture-client exports.
//!
//! It stands in for the managed relational store: one table of
//! postcard-encoded sessions keyed by session id, one metadata table. Reads
//! run in MVCC read transactions, so concurrent progress requests never
//! block each other.
//!
//! Sessions are immutable once imported: re-importing an existing id is a
//! no-op reported as skipped.

use crate::primitives::STORE_FORMAT_VERSION;
use crate::source::{SessionFilter, SessionSource};
use crate::validation::SessionValidator;
use crate::{LaptrendError, Session};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for sessions: session id -> postcard-encoded Session (laps attached)
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const FORMAT_VERSION_KEY: &str = "format_version";

/// Outcome of an import batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    /// Sessions written by this batch.
    pub inserted: usize,
    /// Sessions already present and left untouched.
    pub skipped: usize,
}

/// A disk-backed session store using redb.
pub struct RedbSessionStore {
    db: Database,
}

impl std::fmt::Debug for RedbSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSessionStore").finish_non_exhaustive()
    }
}

impl RedbSessionStore {
    /// Open or create a session store at the given path.
    ///
    /// Fails if the file was written by an incompatible format version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LaptrendError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| LaptrendError::IoError(e.to_string()))?;

        // Initialize tables if they don't exist, and stamp the format version.
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| LaptrendError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SESSIONS)
                .map_err(|e| LaptrendError::IoError(e.to_string()))?;
            {
                let mut meta = write_txn
                    .open_table(METADATA)
                    .map_err(|e| LaptrendError::IoError(e.to_string()))?;
                let stored = meta
                    .get(FORMAT_VERSION_KEY)
                    .map_err(|e| LaptrendError::IoError(e.to_string()))?
                    .map(|v| v.value());
                match stored {
                    Some(version) if version != STORE_FORMAT_VERSION => {
                        return Err(LaptrendError::SerializationError(format!(
                            "session store format version {} is not supported (expected {})",
                            version, STORE_FORMAT_VERSION
                        )));
                    }
                    Some(_) => {}
                    None => {
                        meta.insert(FORMAT_VERSION_KEY, STORE_FORMAT_VERSION)
                            .map_err(|e| LaptrendError::IoError(e.to_string()))?;
                    }
                }
            }
            write_txn
                .commit()
                .map_err(|e| LaptrendError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Open a session store that must already exist.
    ///
    /// Read-only callers use this so a mistyped path is an error rather than
    /// a fresh empty store.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, LaptrendError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LaptrendError::IoError(format!(
                "session store not found at {}",
                path.display()
            )));
        }
        Self::open(path)
    }

    /// Import a batch of sessions in a single write transaction.
    ///
    /// The whole batch is validated before the transaction opens; if any
    /// session is invalid, nothing is written.
    pub fn import_sessions(&self, sessions: &[Session]) -> Result<ImportReport, LaptrendError> {
        SessionValidator::validate_batch(sessions)?;

        let mut report = ImportReport::default();
        if sessions.is_empty() {
            return Ok(report);
        }

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| LaptrendError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SESSIONS)
                .map_err(|e| LaptrendError::IoError(e.to_string()))?;

            for session in sessions {
                let exists = table
                    .get(session.id.as_str())
                    .map_err(|e| LaptrendError::IoError(e.to_string()))?
                    .is_some();
                if exists {
                    report.skipped = report.skipped.saturating_add(1);
                    continue;
                }

                let bytes = postcard::to_allocvec(session)
                    .map_err(|e| LaptrendError::SerializationError(e.to_string()))?;
                table
                    .insert(session.id.as_str(), bytes.as_slice())
                    .map_err(|e| LaptrendError::IoError(e.to_string()))?;
                report.inserted = report.inserted.saturating_add(1);
            }
        }
        write_txn
            .commit()
            .map_err(|e| LaptrendError::IoError(e.to_string()))?;

        Ok(report)
    }

    /// Get all sessions in session-id order.
    pub fn sessions(&self) -> Result<Vec<Session>, LaptrendError> {
        self.scan(|_| true)
    }

    /// Decode every stored session and keep those matching `keep`.
    fn scan(&self, keep: impl Fn(&Session) -> bool) -> Result<Vec<Session>, LaptrendError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;

        let mut sessions = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;
            let session: Session = postcard::from_bytes(value.value()).map_err(|e| {
                LaptrendError::UpstreamFailure(format!("corrupt session record: {}", e))
            })?;
            if keep(&session) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }
}

impl SessionSource for RedbSessionStore {
    fn fetch_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>, LaptrendError> {
        self.scan(|s| filter.matches(s))
    }

    fn session_count(&self) -> Result<usize, LaptrendError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;
        let count = table
            .len()
            .map_err(|e| LaptrendError::UpstreamFailure(e.to_string()))?;
        Ok(count as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
