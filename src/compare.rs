//! Comparison of two benchmark result files
//!
//! For every benchmark present in both files the retained samples are
//! compared with a two-sided Mann-Whitney U test. The change in mean is
//! only printed when the test is significant; otherwise the delta column
//! shows `~`.

use prettytable::format::{FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};
use std::fmt;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::metric::{collect_metrics, Metric, Sample};
use crate::report::BenchmarkReport;
use crate::stats::{mann_whitney_u_test, LocationHypothesis, StatsError};

/// Which clock of a benchmark run to compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Real,
    Cpu,
}

impl TimeKind {
    pub fn label(self) -> &'static str {
        match self {
            TimeKind::Real => "real",
            TimeKind::Cpu => "cpu",
        }
    }

    fn sample(self, metric: &Metric) -> &Sample {
        match self {
            TimeKind::Real => &metric.real_time,
            TimeKind::Cpu => &metric.cpu_time,
        }
    }
}

impl fmt::Display for TimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Delta and note columns for one benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Signed percent change of the mean, or `~` when not significant
    pub delta: String,
    /// Test outcome: p-value and sample sizes, or the reason there is none
    pub note: String,
    pub p_value: Option<f64>,
}

impl Verdict {
    /// Compare the retained values of two samples at significance level `alpha`
    pub fn between(old: &Sample, new: &Sample, alpha: f64) -> Self {
        let test = mann_whitney_u_test(
            &old.retained,
            &new.retained,
            LocationHypothesis::LocationDiffers,
        );

        let (delta, note, p_value) = match test {
            Err(StatsError::SampleSize) => ("~".to_owned(), "(too few samples)".to_owned(), None),
            Err(StatsError::SamplesEqual) => ("~".to_owned(), "(all equal)".to_owned(), None),
            Ok(result) => {
                let delta = if result.p < alpha {
                    percent_change(old.mean, new.mean)
                } else {
                    "~".to_owned()
                };
                let note = format!(
                    "(p={:.2} n={}+{})",
                    result.p,
                    old.retained.len(),
                    new.retained.len()
                );
                (delta, note, Some(result.p))
            }
        };

        Verdict {
            delta,
            note,
            p_value,
        }
    }

    /// Whether the change is statistically significant
    pub fn is_significant(&self) -> bool {
        self.delta != "~"
    }
}

fn percent_change(old: f64, new: f64) -> String {
    if old == new {
        "0.00%".to_owned()
    } else {
        format!("{:+.2}%", (new - old) / old * 100.0)
    }
}

/// Whitespace aligned columns without borders
fn plain_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator(' ')
        .padding(0, 1)
        .build()
}

/// Pair every old metric with the new metric of the same name
///
/// Old order is preserved; benchmarks missing from either side are skipped.
fn pair_metrics<'a>(old: &'a [Metric], new: &'a [Metric]) -> Result<Vec<(&'a Metric, &'a Metric)>> {
    let mut pairs = Vec::with_capacity(old.len());
    for o in old {
        let Some(n) = new.iter().find(|n| n.name == o.name) else {
            debug!(name = %o.name, "benchmark missing from new results");
            continue;
        };
        if o.time_unit != n.time_unit {
            return Err(Error::TimeUnitMismatch {
                name: o.name.clone(),
                old: o.time_unit.clone(),
                new: n.time_unit.clone(),
            });
        }
        pairs.push((o, n));
    }
    Ok(pairs)
}

/// Write the comparison table of one clock
pub fn render_comparison<W: Write + ?Sized>(
    kind: TimeKind,
    old: &[Metric],
    new: &[Metric],
    alpha: f64,
    out: &mut W,
) -> Result<()> {
    let pairs = pair_metrics(old, new)?;

    let mut table = Table::new();
    table.set_format(plain_format());
    table.add_row(Row::new(vec![
        Cell::new(&format!("{kind} time")),
        Cell::new("delta"),
        Cell::new("note"),
        Cell::new("old"),
        Cell::new("new"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&format!("{}-----", "-".repeat(kind.label().len()))),
        Cell::new("-----"),
        Cell::new("----"),
        Cell::new("---"),
        Cell::new("---"),
    ]));

    for (o, n) in pairs {
        let (old_sample, new_sample) = (kind.sample(o), kind.sample(n));
        let verdict = Verdict::between(old_sample, new_sample, alpha);
        table.add_row(Row::new(vec![
            Cell::new(&n.name),
            Cell::new(&verdict.delta),
            Cell::new(&verdict.note),
            Cell::new(&format!("{:.2}{}", old_sample.mean, n.time_unit)),
            Cell::new(&format!("{:.2}{}", new_sample.mean, n.time_unit)),
        ]));
    }

    // prettytable pads the last column too
    for line in table.to_string().lines() {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Load both result files named by `config` and write the comparison to `out`
pub fn run_comparison<W: Write>(config: &AppConfig, out: &mut W) -> Result<()> {
    let old_report = BenchmarkReport::from_path(config.old_path())?;
    let new_report = BenchmarkReport::from_path(config.new_path())?;

    if config.context_check() {
        old_report.context.ensure_compatible(&new_report.context)?;
    } else {
        info!("skipping run context check");
    }

    let old = collect_metrics(&old_report.benchmarks, config.filter());
    let new = collect_metrics(&new_report.benchmarks, config.filter());
    info!(old = old.len(), new = new.len(), "collected benchmarks");

    if old.iter().all(|o| new.iter().all(|n| n.name != o.name)) {
        warn!("no benchmark appears in both result files");
    }
    if old
        .iter()
        .chain(&new)
        .any(|m| m.real_time.values.len() < 2)
    {
        warn!("some benchmarks have a single repetition, run them with --benchmark_repetitions");
    }

    render_comparison(TimeKind::Real, &old, &new, config.alpha(), out)?;

    if config.with_cpu() {
        writeln!(out)?;
        render_comparison(TimeKind::Cpu, &old, &new, config.alpha(), out)?;
    }

    out.flush()?;
    Ok(())
}
