//! Application configuration module
//!
//! This module provides the main application configuration structure that combines
//! CLI arguments with environment values using a clear priority system.

use regex::Regex;
use std::path::{Path, PathBuf};

use super::env_reader::{EnvReader, SystemEnvReader, ALPHA_VAR, FILTER_VAR};
use super::ConfigError;

/// Significance level used when none is configured
pub const DEFAULT_ALPHA: f64 = 0.05;

/// CLI arguments structure
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Result file of the baseline run
    pub old: PathBuf,
    /// Result file of the candidate run
    pub new: PathBuf,
    /// Skip the run context comparison
    pub no_ctx: bool,
    /// Also compare CPU time
    pub with_cpu: bool,
    /// Benchmark name filter (regular expression)
    pub filter: Option<String>,
    /// Significance level
    pub alpha: Option<f64>,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    old_path: PathBuf,
    new_path: PathBuf,
    context_check: bool,
    with_cpu: bool,
    filter: Option<Regex>,
    alpha: f64,
}

/// Configuration builder for functional composition
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    old_path: PathBuf,
    new_path: PathBuf,
    context_check: Option<bool>,
    with_cpu: Option<bool>,
    filter: Option<Regex>,
    alpha: Option<f64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder comparing `old` against `new`
    #[must_use]
    pub fn new(old: impl Into<PathBuf>, new: impl Into<PathBuf>) -> Self {
        Self {
            old_path: old.into(),
            new_path: new.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_context_check(mut self, enabled: bool) -> Self {
        self.context_check = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_cpu(mut self, enabled: bool) -> Self {
        self.with_cpu = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<Regex>) -> Self {
        self.filter = filter;
        self
    }

    /// Set the significance level, validated in [`ConfigBuilder::build`]
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Build the final AppConfig
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let alpha = self.alpha.unwrap_or(DEFAULT_ALPHA);
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha {
                value: alpha.to_string(),
            });
        }

        Ok(AppConfig {
            old_path: self.old_path,
            new_path: self.new_path,
            context_check: self.context_check.unwrap_or(true),
            with_cpu: self.with_cpu.unwrap_or(false),
            filter: self.filter,
            alpha,
        })
    }
}

impl AppConfig {
    /// Create AppConfig from CLI arguments
    ///
    /// Priority order:
    /// 1. CLI parameters (highest priority)
    /// 2. `GBENCHDIFF_*` environment variables
    /// 3. Hardcoded defaults
    pub fn from_cli(cli_args: CliArgs) -> Result<Self, ConfigError> {
        Self::from_cli_with_reader(cli_args, &SystemEnvReader)
    }

    /// Create AppConfig from CLI arguments with a custom environment reader
    pub fn from_cli_with_reader<E: EnvReader>(
        cli_args: CliArgs,
        env: &E,
    ) -> Result<Self, ConfigError> {
        let filter = Self::resolve_filter(&cli_args, env)?;
        let alpha = Self::resolve_alpha(&cli_args, env)?;

        ConfigBuilder::new(cli_args.old, cli_args.new)
            .with_context_check(!cli_args.no_ctx)
            .with_cpu(cli_args.with_cpu)
            .with_filter(filter)
            .with_alpha(alpha)
            .build()
    }

    fn resolve_filter<E: EnvReader>(
        cli_args: &CliArgs,
        env: &E,
    ) -> Result<Option<Regex>, ConfigError> {
        cli_args
            .filter
            .clone()
            .filter(|pattern| !pattern.is_empty())
            .or_else(|| env.get(FILTER_VAR))
            .map(|pattern| Self::compile_filter(&pattern))
            .transpose()
    }

    fn resolve_alpha<E: EnvReader>(cli_args: &CliArgs, env: &E) -> Result<f64, ConfigError> {
        match (cli_args.alpha, env.get(ALPHA_VAR)) {
            (Some(alpha), _) => Ok(alpha),
            (None, Some(raw)) => raw
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidAlpha { value: raw }),
            (None, None) => Ok(DEFAULT_ALPHA),
        }
    }

    /// Compile a benchmark name filter
    fn compile_filter(pattern: &str) -> Result<Regex, ConfigError> {
        Regex::new(pattern).map_err(|e| ConfigError::InvalidFilter {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })
    }

    pub fn old_path(&self) -> &Path {
        &self.old_path
    }

    pub fn new_path(&self) -> &Path {
        &self.new_path
    }

    /// Whether run contexts must match before comparing
    pub fn context_check(&self) -> bool {
        self.context_check
    }

    /// Whether a CPU time table follows the real time table
    pub fn with_cpu(&self) -> bool {
        self.with_cpu
    }

    pub fn filter(&self) -> Option<&Regex> {
        self.filter.as_ref()
    }

    /// Significance level below which a change is reported
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
