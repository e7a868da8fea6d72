//! Error handling module
//!
//! This module provides unified error handling for gbenchdiff.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::report::ContextMismatch;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
#[derive(Debug)]
pub enum Error {
    /// Reading a result file or writing the report failed
    Io {
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// A result file is not valid benchmark JSON
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// The two result files were produced on different machines
    Context(ContextMismatch),
    /// A benchmark reports times in different units in the two files
    TimeUnitMismatch {
        name: String,
        old: String,
        new: String,
    },
    /// Configuration errors
    Config(ConfigError),
}

impl Error {
    /// Attach the file path an IO error occurred on
    pub fn io_at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Attach the file path a decoding error occurred on
    pub fn json_at(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Error::Json {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Attach a path to errors that were raised without one
    pub fn with_path(self, path: impl AsRef<Path>) -> Self {
        match self {
            Error::Io { path: None, source } => Error::io_at(path, source),
            Error::Json { path: None, source } => Error::json_at(path, source),
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io {
                path: Some(path),
                source,
            } => write!(f, "{}: {source}", path.display()),
            Error::Io { path: None, source } => write!(f, "IO error: {source}"),
            Error::Json {
                path: Some(path),
                source,
            } => write!(f, "{}: invalid benchmark JSON: {source}", path.display()),
            Error::Json { path: None, source } => write!(f, "invalid benchmark JSON: {source}"),
            Error::Context(mismatch) => write!(f, "context check failed: {mismatch}"),
            Error::TimeUnitMismatch { name, old, new } => write!(
                f,
                "benchmark {name} has different time units: old={old}, new={new}"
            ),
            Error::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Json { source, .. } => Some(source),
            Error::Context(mismatch) => Some(mismatch),
            Error::TimeUnitMismatch { .. } => None,
            Error::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { path: None, source }
    }
}

impl From<ContextMismatch> for Error {
    fn from(mismatch: ContextMismatch) -> Self {
        Error::Context(mismatch)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
