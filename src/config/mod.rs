//! Configuration module for gbenchdiff
//!
//! Combines CLI arguments with environment values and validates the result.
//!
//! # Priority Logic
//!
//! Configuration values are resolved with the following priority:
//!
//! 1. CLI parameters (highest priority)
//! 2. `GBENCHDIFF_ALPHA` / `GBENCHDIFF_FILTER` environment variables
//! 3. Hardcoded defaults
//!
//! # Usage
//!
//! ```rust
//! use gbenchdiff::config::{AppConfig, CliArgs};
//! use std::path::PathBuf;
//!
//! let cli_args = CliArgs {
//!     old: PathBuf::from("old.json"),
//!     new: PathBuf::from("new.json"),
//!     no_ctx: false,
//!     with_cpu: true,
//!     filter: Some("^BM_foo/".to_owned()),
//!     alpha: None,
//! };
//!
//! let config = AppConfig::from_cli(cli_args)?;
//! assert!(config.with_cpu());
//! # Ok::<(), gbenchdiff::ConfigError>(())
//! ```

pub mod app_config;
pub mod env_reader;

pub use app_config::{AppConfig, CliArgs, ConfigBuilder, DEFAULT_ALPHA};
pub use env_reader::{EnvReader, SystemEnvReader};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Benchmark name filter is not a valid regular expression
    #[error("invalid filter regex '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },
    /// Significance level is not a number in (0, 1)
    #[error("invalid significance level '{value}' (expected a number between 0 and 1, exclusive)")]
    InvalidAlpha { value: String },
}
