//! # Configuration
//!
//! Layered configuration for the Laptrend binary.
//!
//! Sources, highest precedence first:
//! 1. CLI flags (applied by the command layer)
//! 2. Environment variables (`LAPTREND_*`)
//! 3. A TOML file (`--config`, or `laptrend.toml` in the working directory)
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `LAPTREND_HOST`, `LAPTREND_PORT`: server bind address
//! - `LAPTREND_DATABASE`: path of the session store
//! - `LAPTREND_CORS_ORIGINS`: comma-separated origins, or "*" for all
//! - `LAPTREND_RATE_LIMIT`: requests per second (0 disables)

use laptrend_core::LaptrendError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "laptrend.toml";

/// Largest config file we are willing to parse (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub http: HttpConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the redb session store.
    pub database: PathBuf,
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Allowed CORS origins. `None` means localhost only; `["*"]` allows all.
    pub cors_origins: Option<Vec<String>>,
    /// Global requests per second. 0 disables rate limiting.
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("laptrend.db"),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origins: None,
            rate_limit: 100,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Load the file layer (if any) and apply process environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `laptrend.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, LaptrendError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, LaptrendError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LaptrendError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LaptrendError::SerializationError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            LaptrendError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text. Missing sections and keys fall back to defaults.
    pub fn from_toml(text: &str) -> Result<Self, LaptrendError> {
        toml::from_str(text)
            .map_err(|e| LaptrendError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Apply `LAPTREND_*` overrides read through `lookup`.
    ///
    /// Blank values are ignored. Values that do not parse are rejected.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, LaptrendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("LAPTREND_HOST") {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = get("LAPTREND_PORT") {
            self.server.port = parse_env("LAPTREND_PORT", &port)?;
        }
        if let Some(database) = get("LAPTREND_DATABASE") {
            self.storage.database = PathBuf::from(database.trim());
        }
        if let Some(origins) = get("LAPTREND_CORS_ORIGINS") {
            self.http.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        if let Some(rate) = get("LAPTREND_RATE_LIMIT") {
            self.http.rate_limit = parse_env("LAPTREND_RATE_LIMIT", &rate)?;
        }

        Ok(self)
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LaptrendError> {
    value
        .trim()
        .parse()
        .map_err(|_| LaptrendError::SerializationError(format!("{} has invalid value '{}'", key, value)))
}

// =============================================================================
// TESTS
// =============================================================================
