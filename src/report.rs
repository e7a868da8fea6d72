//! Google Benchmark JSON result model
//!
//! Mirrors the output of a benchmark binary run with
//! `--benchmark_out=<file> --benchmark_out_format=json`. Fields that are
//! missing from a file take their default values and unknown fields are
//! ignored, so files from older and newer library versions both load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// `run_type` of a single repetition
pub const RUN_TYPE_ITERATION: &str = "iteration";

/// `run_type` of mean/median/stddev rows
pub const RUN_TYPE_AGGREGATE: &str = "aggregate";

/// Complete contents of one benchmark result file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkReport {
    pub context: RunContext,
    pub benchmarks: Vec<BenchmarkRun>,
}

/// Machine description recorded by the benchmark library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunContext {
    pub date: String,
    pub host_name: String,
    pub executable: String,
    pub num_cpus: u32,
    pub mhz_per_cpu: u32,
    pub cpu_scaling_enabled: bool,
    pub caches: Vec<CpuCache>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuCache {
    #[serde(rename = "type")]
    pub kind: String,
    pub level: u32,
    pub size: u64,
    pub num_sharing: u32,
}

/// One row of the `benchmarks` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkRun {
    pub name: String,
    pub run_name: String,
    pub run_type: String,
    pub repetitions: u64,
    pub repetition_index: u64,
    pub threads: u32,
    pub iterations: u64,
    pub real_time: f64,
    pub cpu_time: f64,
    pub time_unit: String,
}

impl BenchmarkRun {
    /// Whether this row is a single repetition rather than an aggregate
    pub fn is_iteration(&self) -> bool {
        self.run_type == RUN_TYPE_ITERATION
    }
}

impl BenchmarkReport {
    /// Decode a report from any JSON reader
    ///
    /// Only the first JSON document is read; anything after it is ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        Ok(Self::deserialize(&mut de)?)
    }

    /// Open and decode a report file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
        let report = Self::from_reader(BufReader::new(file)).map_err(|e| e.with_path(path))?;

        debug!(
            path = %path.display(),
            benchmarks = report.benchmarks.len(),
            executable = %report.context.executable,
            "loaded benchmark report"
        );
        Ok(report)
    }
}

/// First difference found between two run contexts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextMismatch {
    CacheCount { old: usize, new: usize },
    CacheType { old: String, new: String },
    CacheLevel { old: u32, new: u32 },
    CacheSize { old: u64, new: u64 },
    NumCpus { old: u32, new: u32 },
    MhzPerCpu { old: u32, new: u32 },
    CpuScaling { old: bool, new: bool },
}

impl fmt::Display for ContextMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextMismatch::CacheCount { old, new } => {
                write!(f, "different number of CPU caches: {old} vs {new}")
            }
            ContextMismatch::CacheType { old, new } => {
                write!(f, "different type of CPU cache: {old} vs {new}")
            }
            ContextMismatch::CacheLevel { old, new } => {
                write!(f, "different CPU cache level: {old} vs {new}")
            }
            ContextMismatch::CacheSize { old, new } => {
                write!(f, "different CPU cache size: {old} vs {new}")
            }
            ContextMismatch::NumCpus { old, new } => {
                write!(f, "different number of CPUs: {old} vs {new}")
            }
            ContextMismatch::MhzPerCpu { old, new } => {
                write!(f, "different MHz/CPU: {old} vs {new}")
            }
            ContextMismatch::CpuScaling { old, new } => {
                write!(f, "different CPU scaling: {old} vs {new}")
            }
        }
    }
}

impl std::error::Error for ContextMismatch {}

impl CpuCache {
    /// Compare type, level and size; the sharing count is not compared
    pub fn ensure_compatible(&self, other: &CpuCache) -> std::result::Result<(), ContextMismatch> {
        if self.kind != other.kind {
            return Err(ContextMismatch::CacheType {
                old: self.kind.clone(),
                new: other.kind.clone(),
            });
        }
        if self.level != other.level {
            return Err(ContextMismatch::CacheLevel {
                old: self.level,
                new: other.level,
            });
        }
        if self.size != other.size {
            return Err(ContextMismatch::CacheSize {
                old: self.size,
                new: other.size,
            });
        }
        Ok(())
    }
}

impl RunContext {
    /// Check that two runs were measured on equivalent hardware
    ///
    /// Date, host name and executable are allowed to differ.
    pub fn ensure_compatible(&self, other: &RunContext) -> std::result::Result<(), ContextMismatch> {
        if self.caches.len() != other.caches.len() {
            return Err(ContextMismatch::CacheCount {
                old: self.caches.len(),
                new: other.caches.len(),
            });
        }
        self.caches
            .iter()
            .zip(&other.caches)
            .try_for_each(|(old, new)| old.ensure_compatible(new))?;

        if self.num_cpus != other.num_cpus {
            return Err(ContextMismatch::NumCpus {
                old: self.num_cpus,
                new: other.num_cpus,
            });
        }
        if self.mhz_per_cpu != other.mhz_per_cpu {
            return Err(ContextMismatch::MhzPerCpu {
                old: self.mhz_per_cpu,
                new: other.mhz_per_cpu,
            });
        }
        if self.cpu_scaling_enabled != other.cpu_scaling_enabled {
            return Err(ContextMismatch::CpuScaling {
                old: self.cpu_scaling_enabled,
                new: other.cpu_scaling_enabled,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = r#"{
      "context": {
        "date": "2024-03-01T10:00:00+01:00",
        "host_name": "bench-host",
        "executable": "./bench",
        "num_cpus": 8,
        "mhz_per_cpu": 3600,
        "cpu_scaling_enabled": false,
        "caches": [
          {"type": "Data", "level": 1, "size": 32768, "num_sharing": 2},
          {"type": "Unified", "level": 2, "size": 262144, "num_sharing": 2}
        ],
        "load_avg": [0.5, 0.4, 0.3],
        "library_build_type": "release"
      },
      "benchmarks": [
        {
          "name": "BM_foo/0",
          "family_index": 0,
          "run_name": "BM_foo/0",
          "run_type": "iteration",
          "repetitions": 2,
          "repetition_index": 0,
          "threads": 1,
          "iterations": 1000000,
          "real_time": 1.25,
          "cpu_time": 1.24,
          "time_unit": "ns"
        },
        {
          "name": "BM_foo/0_mean",
          "run_name": "BM_foo/0",
          "run_type": "aggregate",
          "aggregate_name": "mean",
          "repetitions": 2,
          "threads": 1,
          "iterations": 2,
          "real_time": 1.3,
          "cpu_time": 1.29,
          "time_unit": "ns"
        }
      ]
    }"#;

    /// **What is tested:** Decoding of a realistic result file
    /// **Why it is tested:** Files written by the benchmark library carry more fields than the model
    /// **Test conditions:** JSON with extra context and benchmark fields
    /// **Expectations:** Known fields are decoded, unknown fields ignored
    #[test]
    fn test_from_reader_decodes_known_fields() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let report = BenchmarkReport::from_reader(Cursor::new(SAMPLE))?;

        assert_eq!(report.context.num_cpus, 8);
        assert_eq!(report.context.caches.len(), 2);
        assert_eq!(report.context.caches[1].kind, "Unified");
        assert_eq!(report.benchmarks.len(), 2);
        assert!(report.benchmarks[0].is_iteration());
        assert!(!report.benchmarks[1].is_iteration());
        assert_eq!(report.benchmarks[1].run_type, RUN_TYPE_AGGREGATE);
        assert_eq!(report.benchmarks[0].real_time, 1.25);
        Ok(())
    }

    /// **What is tested:** Decoding of a file without context
    /// **Why it is tested:** Hand-written or trimmed files should still be comparable with --no-ctx
    /// **Test conditions:** JSON with only a benchmarks array
    /// **Expectations:** Context takes default values
    #[test]
    fn test_from_reader_missing_context() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let report = BenchmarkReport::from_reader(Cursor::new(r#"{"benchmarks": []}"#))?;
        assert_eq!(report.context, RunContext::default());
        assert!(report.benchmarks.is_empty());
        Ok(())
    }

    /// **What is tested:** Decoding failure on malformed JSON
    /// **Why it is tested:** Users must get a JSON error, not a panic
    /// **Test conditions:** Truncated JSON input
    /// **Expectations:** Error::Json without a path
    #[test]
    fn test_from_reader_invalid_json() {
        let result = BenchmarkReport::from_reader(Cursor::new("{\"benchmarks\": ["));
        assert!(matches!(result, Err(Error::Json { path: None, .. })));

        let result = BenchmarkReport::from_reader(Cursor::new(""));
        assert!(matches!(result, Err(Error::Json { path: None, .. })));
    }

    /// **What is tested:** Data following the report document
    /// **Why it is tested:** Result files with a second document or trailing text must still load
    /// **Test conditions:** A report followed by a log line and by a second report
    /// **Expectations:** The first document is decoded, the rest is ignored
    #[test]
    fn test_from_reader_ignores_trailing_data() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let input = format!("{SAMPLE}\nbenchmark finished\n");
        let report = BenchmarkReport::from_reader(Cursor::new(input))?;
        assert_eq!(report.context.num_cpus, 8);

        let input = format!("{SAMPLE}{{\"context\": {{\"num_cpus\": 2}}}}");
        let report = BenchmarkReport::from_reader(Cursor::new(input))?;
        assert_eq!(report.context.num_cpus, 8);
        Ok(())
    }

    /// **What is tested:** Context compatibility rules
    /// **Why it is tested:** Comparisons across different hardware are meaningless
    /// **Test conditions:** Contexts differing in date only, in cache size, in CPU count and in scaling
    /// **Expectations:** Date differences pass; every hardware difference is reported
    #[test]
    fn test_context_compatibility() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let base = BenchmarkReport::from_reader(Cursor::new(SAMPLE))?.context;

        let mut other = base.clone();
        other.date = "2025-01-01T00:00:00+00:00".to_owned();
        other.host_name = "other-host".to_owned();
        other.caches[0].num_sharing = 4;
        assert_eq!(base.ensure_compatible(&other), Ok(()));

        let mut other = base.clone();
        other.caches[1].size = 524288;
        assert_eq!(
            base.ensure_compatible(&other),
            Err(ContextMismatch::CacheSize {
                old: 262144,
                new: 524288
            })
        );

        let mut other = base.clone();
        other.caches.pop();
        assert_eq!(
            base.ensure_compatible(&other).map_err(|e| e.to_string()),
            Err("different number of CPU caches: 2 vs 1".to_owned())
        );

        let mut other = base.clone();
        other.num_cpus = 4;
        other.cpu_scaling_enabled = true;
        // CPU count is checked before scaling
        assert_eq!(
            base.ensure_compatible(&other),
            Err(ContextMismatch::NumCpus { old: 8, new: 4 })
        );

        let mut other = base.clone();
        other.cpu_scaling_enabled = true;
        assert_eq!(
            base.ensure_compatible(&other),
            Err(ContextMismatch::CpuScaling {
                old: false,
                new: true
            })
        );
        Ok(())
    }

    /// **What is tested:** Order of the per-cache checks
    /// **Why it is tested:** The first differing attribute names the mismatch: type, then level, then size
    /// **Test conditions:** Caches differing in type and level, in level and size, and in type alone
    /// **Expectations:** CacheType before CacheLevel before CacheSize, with readable messages
    #[test]
    fn test_cache_check_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let base = BenchmarkReport::from_reader(Cursor::new(SAMPLE))?.context;

        let mut other = base.clone();
        other.caches[0].kind = "Instruction".to_owned();
        other.caches[0].level = 2;
        other.caches[0].size = 65536;
        let mismatch = base.ensure_compatible(&other).unwrap_err();
        assert_eq!(
            mismatch,
            ContextMismatch::CacheType {
                old: "Data".to_owned(),
                new: "Instruction".to_owned()
            }
        );
        assert_eq!(
            mismatch.to_string(),
            "different type of CPU cache: Data vs Instruction"
        );

        let mut other = base.clone();
        other.caches[1].level = 3;
        other.caches[1].size = 8_388_608;
        let mismatch = base.ensure_compatible(&other).unwrap_err();
        assert_eq!(mismatch, ContextMismatch::CacheLevel { old: 2, new: 3 });
        assert_eq!(mismatch.to_string(), "different CPU cache level: 2 vs 3");

        // a cache mismatch is reported before CPU differences
        let mut other = base.clone();
        other.caches[1].kind = "Data".to_owned();
        other.num_cpus = 16;
        assert_eq!(
            base.ensure_compatible(&other),
            Err(ContextMismatch::CacheType {
                old: "Unified".to_owned(),
                new: "Data".to_owned()
            })
        );
        Ok(())
    }
}
