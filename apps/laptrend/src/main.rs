//! # Laptrend - Driver Progress Server
//!
//! The main binary for the Laptrend coaching dashboard backend.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for imports and progress queries
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                apps/laptrend (THE BINARY)               │
//! │                                                         │
//! │   ┌─────────────┐      ┌─────────────┐                  │
//! │   │    CLI      │      │  HTTP API   │                  │
//! │   │   (clap)    │      │   (axum)    │                  │
//! │   └──────┬──────┘      └──────┬──────┘                  │
//! │          └──────────┬─────────┘                         │
//! │                     ▼                                   │
//! │             ┌───────────────┐      ┌───────────────┐    │
//! │             │ laptrend-core │ ───▶ │ session store │    │
//! │             │  (THE LOGIC)  │      │    (redb)     │    │
//! │             └───────────────┘      └───────────────┘    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Import a capture-client export, then serve it
//! laptrend import -f export.json
//! laptrend server --host 0.0.0.0 --port 8080
//!
//! # CLI queries
//! laptrend progress --driver d-17 --mode track --track spa
//! laptrend classify 87.5
//! ```

use clap::Parser;
use laptrend::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // LAPTREND_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LAPTREND_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "laptrend=debug,laptrend_core=debug,tower_http=debug"
    } else {
        "laptrend=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Laptrend startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗      █████╗ ██████╗ ████████╗██████╗ ███████╗███╗   ██╗██████╗
  ██║     ██╔══██╗██╔══██╗╚══██╔══╝██╔══██╗██╔════╝████╗  ██║██╔══██╗
  ██║     ███████║██████╔╝   ██║   ██████╔╝█████╗  ██╔██╗ ██║██║  ██║
  ██║     ██╔══██║██╔═══╝    ██║   ██╔══██╗██╔══╝  ██║╚██╗██║██║  ██║
  ███████╗██║  ██║██║        ██║   ██║  ██║███████╗██║ ╚████║██████╔╝
  ╚══════╝╚═╝  ╚═╝╚═╝        ╚═╝   ╚═╝  ╚═╝╚══════╝╚═╝  ╚═══╝╚═════╝

  Driver Progress Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
