//! iptv-probe: batch availability checker for IPTV stream links
//!
//! This crate loads a list of channels (from an M3U playlist or a plain URL
//! list), probes every stream URL with bounded concurrency, and exports the
//! outcome as CSV, plain text, or an M3U playlist.

pub mod checker;
pub mod config;
pub mod output;
pub mod source;

use thiserror::Error;

/// Main error type for iptv-probe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while acquiring the channel list
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read playlist {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to fetch playlist {url} after {attempts} attempts: {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("No channels found in {0}")]
    Empty(String),
}

/// Result type alias for iptv-probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for channel acquisition
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Re-export commonly used types
pub use checker::{
    HttpProber, PartialResults, ProbeResult, ProbeStatus, Prober, ResultSet, RunOutcome,
    Scheduler, Summary,
};
pub use config::Config;
pub use output::{ExportFormat, Exporter};
pub use source::Channel;
