//! Per-benchmark samples built from repeated runs

use regex::Regex;
use tracing::{debug, trace};

use crate::report::BenchmarkRun;
use crate::stats::{bounds, mean, percentile};

/// Timing values of one benchmark for one clock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    /// All values, sorted ascending
    pub values: Vec<f64>,
    /// Values left after outlier removal
    pub retained: Vec<f64>,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl Sample {
    /// Build a sample from unsorted values and compute its statistics
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let mut sample = Sample {
            values,
            ..Sample::default()
        };
        sample.compute_stats();
        sample
    }

    /// Drop outliers with the interquartile range rule
    ///
    /// Keeps values in `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`. `values` must be sorted.
    fn remove_outliers(&mut self) {
        let q1 = percentile(&self.values, 0.25);
        let q3 = percentile(&self.values, 0.75);
        let iqr = q3 - q1;
        let (lo, hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        self.retained = self
            .values
            .iter()
            .copied()
            .filter(|v| (lo..=hi).contains(v))
            .collect();
    }

    /// Recompute retained values, min, mean and max from `values`
    pub fn compute_stats(&mut self) {
        self.remove_outliers();
        (self.min, self.max) = bounds(&self.retained);
        self.mean = mean(&self.retained);
    }

    /// Number of values dropped as outliers
    pub fn outliers(&self) -> usize {
        self.values.len() - self.retained.len()
    }
}

/// Real and CPU time samples of one named benchmark
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metric {
    pub name: String,
    pub time_unit: String,
    pub real_time: Sample,
    pub cpu_time: Sample,
}

/// Group repetitions by benchmark name
///
/// Only `iteration` rows whose name matches `filter` are used. The result
/// keeps the order in which names first appear.
pub fn collect_metrics(runs: &[BenchmarkRun], filter: Option<&Regex>) -> Vec<Metric> {
    let mut grouped: Vec<(Metric, Vec<f64>, Vec<f64>)> = Vec::new();

    for run in runs {
        if filter.is_some_and(|re| !re.is_match(&run.name)) {
            trace!(name = %run.name, "skipped by filter");
            continue;
        }
        if !run.is_iteration() {
            continue;
        }

        let index = match grouped.iter().position(|(m, _, _)| m.name == run.name) {
            Some(index) => index,
            None => {
                grouped.push((
                    Metric {
                        name: run.name.clone(),
                        time_unit: run.time_unit.clone(),
                        ..Metric::default()
                    },
                    Vec::new(),
                    Vec::new(),
                ));
                grouped.len() - 1
            }
        };
        let (_, real, cpu) = &mut grouped[index];
        real.push(run.real_time);
        cpu.push(run.cpu_time);
    }

    grouped
        .into_iter()
        .map(|(metric, real, cpu)| {
            let metric = Metric {
                real_time: Sample::new(real),
                cpu_time: Sample::new(cpu),
                ..metric
            };
            debug!(
                name = %metric.name,
                repetitions = metric.real_time.values.len(),
                real_outliers = metric.real_time.outliers(),
                cpu_outliers = metric.cpu_time.outliers(),
                "collected metric"
            );
            metric
        })
        .collect()
}
