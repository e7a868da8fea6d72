//! Shared fixtures for gbenchdiff integration tests
//!
//! [`ResultFile`] builds Google Benchmark JSON documents and
//! [`Workspace`] writes them into a temporary directory.

use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Main result type for the fixtures
pub type Result<T = ()> = std::result::Result<T, Box<dyn Error>>;

/// Builder for one benchmark result file
#[derive(Debug, Clone)]
pub struct ResultFile {
    num_cpus: u32,
    mhz_per_cpu: u32,
    cpu_scaling_enabled: bool,
    caches: Vec<Value>,
    benchmarks: Vec<Value>,
}

impl Default for ResultFile {
    fn default() -> Self {
        Self {
            num_cpus: 8,
            mhz_per_cpu: 3600,
            cpu_scaling_enabled: false,
            caches: vec![
                json!({"type": "Data", "level": 1, "size": 32768, "num_sharing": 2}),
                json!({"type": "Unified", "level": 2, "size": 262144, "num_sharing": 2}),
            ],
            benchmarks: Vec::new(),
        }
    }
}

#[allow(dead_code)]
impl ResultFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_cpus(mut self, num_cpus: u32) -> Self {
        self.num_cpus = num_cpus;
        self
    }

    pub fn with_mhz_per_cpu(mut self, mhz: u32) -> Self {
        self.mhz_per_cpu = mhz;
        self
    }

    /// Add one `iteration` row per value; cpu time is 98% of real time
    pub fn with_repetitions(self, name: &str, real_times: &[f64]) -> Self {
        self.with_repetitions_in(name, "ns", real_times)
    }

    pub fn with_repetitions_in(mut self, name: &str, unit: &str, real_times: &[f64]) -> Self {
        for (index, real) in real_times.iter().enumerate() {
            self.benchmarks.push(json!({
                "name": name,
                "family_index": 0,
                "run_name": name,
                "run_type": "iteration",
                "repetitions": real_times.len(),
                "repetition_index": index,
                "threads": 1,
                "iterations": 1_000_000,
                "real_time": real,
                "cpu_time": real * 0.98,
                "time_unit": unit,
            }));
        }
        self.with_mean_row(name, unit, real_times)
    }

    fn with_mean_row(mut self, name: &str, unit: &str, real_times: &[f64]) -> Self {
        let mean = real_times.iter().sum::<f64>() / real_times.len().max(1) as f64;
        self.benchmarks.push(json!({
            "name": format!("{name}_mean"),
            "run_name": name,
            "run_type": "aggregate",
            "aggregate_name": "mean",
            "repetitions": real_times.len(),
            "threads": 1,
            "iterations": real_times.len(),
            "real_time": mean,
            "cpu_time": mean * 0.98,
            "time_unit": unit,
        }));
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "context": {
                "date": "2024-03-01T10:00:00+01:00",
                "host_name": "bench-host",
                "executable": "./string_bench",
                "num_cpus": self.num_cpus,
                "mhz_per_cpu": self.mhz_per_cpu,
                "cpu_scaling_enabled": self.cpu_scaling_enabled,
                "caches": self.caches,
                "load_avg": [0.25, 0.2, 0.1],
                "library_build_type": "release"
            },
            "benchmarks": self.benchmarks,
        })
    }
}

/// Temporary directory holding result files
pub struct Workspace {
    dir: TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write a result file and return its path
    pub fn write(&self, name: &str, file: &ResultFile) -> Result<PathBuf> {
        self.write_raw(name, &serde_json::to_string_pretty(&file.to_json())?)
    }

    /// Write arbitrary content and return its path
    pub fn write_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Ten deterministic values spread around `base`
#[allow(dead_code)]
pub fn around(base: f64) -> Vec<f64> {
    (0..10).map(|i| base + f64::from(i) * base * 0.001).collect()
}
