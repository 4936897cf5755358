//! # Storage
//!
//! Session store adapters implementing [`crate::SessionSource`].

mod redb_sessions;

pub use redb_sessions::{ImportReport, RedbSessionStore};
