//! # Laptrend CLI Module
//!
//! This module implements the CLI interface for Laptrend.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `import` - Import a capture-client export into the session store
//! - `progress` - Print a driver's progress summary
//! - `classify` - Classify a 0-100 score
//! - `status` - Show session store status
//! - `init` - Initialize a new session store

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use laptrend_core::LaptrendError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Laptrend - driver progress aggregation for racing coaches
///
/// Turns imported session and lap telemetry into per-weekend deltas,
/// per-track trends and lifetime overviews.
#[derive(Parser, Debug)]
#[command(name = "laptrend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./laptrend.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the session store (overrides config and LAPTREND_DATABASE)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Import sessions from a capture-client JSON export
    Import {
        /// Path to the export file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print a driver's progress summary
    Progress {
        /// Driver identifier
        #[arg(short, long)]
        driver: String,

        /// Aggregation mode (weekend, track, overall)
        #[arg(short, long)]
        mode: String,

        /// Track identifier (required for track mode)
        #[arg(short, long)]
        track: Option<String>,

        /// First date of the window, YYYY-MM-DD (required for weekend mode)
        #[arg(short, long)]
        start: Option<String>,

        /// Last date of the window, YYYY-MM-DD (defaults to --start)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Classify a 0-100 score into its qualitative bucket
    Classify {
        /// Score to classify
        #[arg(allow_negative_numbers = true)]
        score: String,
    },

    /// Show session store status
    Status,

    /// Initialize a new empty session store
    Init {
        /// Force initialization even if the store exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LaptrendError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.storage.database = database;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::Import { file }) => cmd_import(&config, json_mode, &file),
        Some(Commands::Progress {
            driver,
            mode,
            track,
            start,
            end,
        }) => {
            let request = ProgressRequest {
                driver,
                mode,
                track,
                start,
                end,
            };
            cmd_progress(&config, json_mode, &request)
        }
        Some(Commands::Classify { score }) => cmd_classify(json_mode, &score),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_progress_command() {
        let cli = Cli::try_parse_from([
            "laptrend", "--json-mode", "progress", "--driver", "d1", "--mode", "track", "--track",
            "spa",
        ])
        .unwrap();

        assert!(cli.json_mode);
        match cli.command {
            Some(Commands::Progress {
                driver,
                mode,
                track,
                start,
                ..
            }) => {
                assert_eq!(driver, "d1");
                assert_eq!(mode, "track");
                assert_eq!(track.as_deref(), Some("spa"));
                assert!(start.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_progress_requires_mode() {
        let result = Cli::try_parse_from(["laptrend", "progress", "--driver", "d1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_negative_score() {
        let cli = Cli::try_parse_from(["laptrend", "classify", "-5"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Classify { score }) if score == "-5"));
    }

    #[test]
    fn test_global_database_flag() {
        let cli = Cli::try_parse_from(["laptrend", "status", "-D", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
    }
}
