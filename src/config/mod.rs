//! Configuration module for iptv-probe
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so a missing file simply means `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use iptv_probe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("iptv-probe.toml")).unwrap();
//! println!("Probing with {} workers", config.probe.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ProbeConfig, ProbeMethod, SourceConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
