//! gbenchdiff library
//!
//! Compares two Google Benchmark JSON result files. Outliers are removed with
//! the interquartile range rule and every benchmark present in both files is
//! checked for a significant change with a Mann-Whitney U test.
//!
//! The crate also carries the string construction benchmark case in
//! [`bench_case`], registered with criterion in `benches/`.
//!
//! # Examples
//!
//! ```rust
//! use gbenchdiff::{collect_metrics, render_comparison, BenchmarkReport, TimeKind};
//! use std::io::Cursor;
//!
//! let json = r#"{"benchmarks": [
//!     {"name": "BM_foo/1", "run_type": "iteration", "real_time": 1.0, "cpu_time": 1.0, "time_unit": "ns"},
//!     {"name": "BM_foo/1", "run_type": "iteration", "real_time": 1.2, "cpu_time": 1.1, "time_unit": "ns"}
//! ]}"#;
//! let report = BenchmarkReport::from_reader(Cursor::new(json))?;
//! let metrics = collect_metrics(&report.benchmarks, None);
//!
//! let mut output = Vec::new();
//! render_comparison(TimeKind::Real, &metrics, &metrics, 0.05, &mut output)?;
//! assert!(String::from_utf8(output)?.contains("BM_foo/1"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bench_case;
pub mod compare;
pub mod config;
pub mod error;
pub mod metric;
pub mod report;
pub mod stats;

pub use bench_case::{construct_filled, DenseRange};
pub use compare::{render_comparison, run_comparison, TimeKind, Verdict};
pub use config::{AppConfig, CliArgs, ConfigError};
pub use error::{Error, Result};
pub use metric::{collect_metrics, Metric, Sample};
pub use report::{BenchmarkReport, BenchmarkRun, ContextMismatch, RunContext};
pub use stats::StatsError;
