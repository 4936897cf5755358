//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState, BucketResponse, ProgressQuery, ProgressResponse, parse_score};
use crate::config::Config;
use crate::import::read_export;
use laptrend_core::{DriverId, LaptrendError, RedbSessionStore, SessionSource, compute_progress};
use std::path::Path;

/// Raw arguments of the `progress` command.
#[derive(Debug, Clone)]
pub struct ProgressRequest {
    pub driver: String,
    pub mode: String,
    pub track: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), LaptrendError> {
    let store = RedbSessionStore::open(&config.storage.database)?;
    let session_count = store.session_count()?;

    tracing::info!(
        database = %config.storage.database.display(),
        sessions = session_count,
        "Session store opened"
    );

    println!("Laptrend Driver Progress Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Database: {:?}", config.storage.database);
    println!("  Sessions: {}", session_count);
    println!();
    println!("Endpoints:");
    println!("  GET /drivers/{{driverId}}/progress-summary - Progress narrative");
    println!("  GET /scores/{{score}}/bucket               - Classify a score");
    println!("  GET /status                              - Store status");
    println!("  GET /health                              - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.bind_addr(), AppState::new(store), &config.http).await
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import a capture-client export. Sessions already stored are skipped.
pub fn cmd_import(config: &Config, json_mode: bool, file: &Path) -> Result<(), LaptrendError> {
    tracing::info!("Importing from {:?}", file);

    let sessions = read_export(file)?;
    let store = RedbSessionStore::open(&config.storage.database)?;
    let report = store.import_sessions(&sessions)?;

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Import complete"
    );

    if json_mode {
        print_json(&serde_json::json!({
            "file": file.to_string_lossy(),
            "read": sessions.len(),
            "inserted": report.inserted,
            "skipped": report.skipped,
        }));
        return Ok(());
    }

    println!("Imported {} sessions from {:?}", report.inserted, file);
    if report.skipped > 0 {
        println!("Skipped {} sessions already in the store", report.skipped);
    }
    Ok(())
}

// =============================================================================
// PROGRESS COMMAND
// =============================================================================

/// Print a driver's progress summary.
pub fn cmd_progress(
    config: &Config,
    json_mode: bool,
    request: &ProgressRequest,
) -> Result<(), LaptrendError> {
    let query = ProgressQuery {
        mode: Some(request.mode.clone()),
        track_id: request.track.clone(),
        start_date: request.start.clone(),
        end_date: request.end.clone(),
    };
    let mode = query.to_mode()?;
    let driver_id = DriverId::new(request.driver.trim());

    let store = RedbSessionStore::open_existing(&config.storage.database)?;
    let result = compute_progress(&store, &driver_id, &mode)?;
    let response = ProgressResponse::new(&driver_id, &mode, &result);

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    println!("Progress for {} ({} mode)", response.driver_id, response.mode);
    println!("==============================");
    if response.sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<8} {:<16} {:>10} {:>5} {:>12} {:>9} {:>8}",
        "Date", "Start", "Session", "Best (ms)", "Laps", "Consistency", "Delta", "Delta %"
    );
    for entry in &response.sessions {
        println!(
            "{:<12} {:<8} {:<16} {:>10} {:>5} {:>12} {:>9} {:>8}",
            entry.date.to_string(),
            entry.start_time.format("%H:%M").to_string(),
            entry.session_id,
            fmt_opt(entry.best_lap_ms),
            entry.lap_count,
            entry
                .consistency_pct
                .map(|pct| format!("{}%", pct))
                .unwrap_or_else(|| "-".to_string()),
            fmt_opt(entry.delta_ms),
            entry
                .delta_pct
                .map(|pct| format!("{:+.2}", pct))
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    let summary = &response.summary;
    println!();
    println!("Sessions:    {}", summary.total_sessions);
    println!("First best:  {}", fmt_opt(summary.first_best_lap_ms));
    println!("Last best:   {}", fmt_opt(summary.last_best_lap_ms));
    println!("Improvement: {}", fmt_opt(summary.total_improvement_ms));

    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

/// Classify a score.
pub fn cmd_classify(json_mode: bool, raw: &str) -> Result<(), LaptrendError> {
    let response = BucketResponse::for_score(parse_score(raw)?);

    if json_mode {
        print_json(&response);
        return Ok(());
    }

    println!("Score:   {}", response.score);
    println!("Label:   {}", response.label);
    println!("Variant: {}", response.variant);
    println!("Color:   {}", response.color_class);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show session store status.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), LaptrendError> {
    let store = RedbSessionStore::open_existing(&config.storage.database)?;
    let session_count = store.session_count()?;

    if json_mode {
        print_json(&serde_json::json!({
            "database": config.storage.database.to_string_lossy(),
            "sessionCount": session_count,
        }));
        return Ok(());
    }

    println!("Laptrend Session Store Status");
    println!("=============================");
    println!("Database: {:?}", config.storage.database);
    println!("Sessions: {}", session_count);
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty session store.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), LaptrendError> {
    let db_path = &config.storage.database;
    if db_path.exists() {
        if !force {
            return Err(LaptrendError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| LaptrendError::IoError(format!("Remove existing database: {}", e)))?;
        tracing::warn!("Removed existing database at {:?}", db_path);
    }

    RedbSessionStore::open(db_path)?;
    println!("Initialized new session store at {:?}", db_path);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
