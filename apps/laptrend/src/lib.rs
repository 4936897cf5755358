//! # laptrend
//!
//! The Laptrend binary's library half: HTTP API, CLI and configuration.
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod import;
