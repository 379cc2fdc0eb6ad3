//! Plain-text report file and console summary.

use crate::model::Aggregate;
use crate::record::Dataset;
use chrono::{DateTime, TimeZone};
use std::fmt::{self, Display, Write};
use std::path::Path;

/// Render `benchmark_report.txt`.
///
/// Statistics cover non-zero timings only; an operation whose timings are all
/// zero gets a one-line note instead of numbers.
pub fn render_text_report<Tz>(
    source: &Path,
    agg: &Aggregate,
    generated_at: &DateTime<Tz>,
) -> Result<String, fmt::Error>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    writeln!(out, "LSM-Tree Benchmark Analysis Report")?;
    writeln!(out, "Analysis date: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Data file: {}", source.display())?;
    writeln!(out, "Total operations: {}", group_thousands(agg.total))?;
    writeln!(out)?;

    writeln!(out, "Operation Statistics:")?;
    for row in agg.count_ranking() {
        writeln!(
            out,
            "{}: {} operations ({:.1}%)",
            row.operation,
            group_thousands(row.count),
            row.share
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Time Statistics (microseconds, non-zero samples only):")?;
    for stats in &agg.operations {
        writeln!(out)?;
        writeln!(out, "{}:", stats.operation)?;
        match &stats.summary {
            Some(s) => {
                writeln!(out, "  Samples: {} of {}", group_thousands(stats.nonzero_count), group_thousands(stats.count))?;
                writeln!(out, "  Mean: {:.2} μs", s.mean)?;
                writeln!(out, "  Median: {:.2} μs", s.median)?;
                writeln!(out, "  Std Dev: {:.2} μs", s.stddev)?;
                writeln!(out, "  Min: {:.2} μs", s.min)?;
                writeln!(out, "  Max: {:.2} μs", s.max)?;
                writeln!(out, "  95th percentile: {:.2} μs", s.p95)?;
            }
            None => {
                writeln!(
                    out,
                    "  All {} samples recorded 0 μs; no statistics",
                    group_thousands(stats.count)
                )?;
            }
        }
    }

    if agg.zero_time_count > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "Warning: {} operations recorded 0 μs time",
            group_thousands(agg.zero_time_count)
        )?;
        writeln!(out, "This may indicate timing measurement issues")?;
    }

    Ok(out)
}

/// Render the console summary printed after the artifacts are written.
pub fn render_console_summary(dataset: &Dataset, agg: &Aggregate) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "BENCHMARK ANALYSIS SUMMARY")?;
    writeln!(out, "Total operations analyzed: {}", group_thousands(agg.total))?;
    writeln!(out, "Columns: {}", dataset.columns.join(", "))?;

    if !agg.operations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Operation counts:")?;
        for row in agg.count_ranking() {
            writeln!(out, "  {}: {}", row.operation, group_thousands(row.count))?;
        }

        writeln!(out)?;
        writeln!(out, "Time statistics by operation (microseconds, non-zero samples):")?;
        write_stats_table(&mut out, agg)?;
    }

    for stats in &agg.operations {
        writeln!(out)?;
        writeln!(out, "{}:", stats.operation)?;
        writeln!(out, "  Operations: {}", group_thousands(stats.count))?;
        writeln!(out, "  Non-zero times: {}", group_thousands(stats.nonzero_count))?;
        if let Some(s) = &stats.summary {
            writeln!(out, "  Avg time (non-zero): {:.2} μs", s.mean)?;
            writeln!(out, "  Max time: {:.2} μs", s.max)?;
        }
    }

    Ok(out)
}

/// One row per operation; `-` where the operation has no non-zero samples.
fn write_stats_table(out: &mut String, agg: &Aggregate) -> fmt::Result {
    let width = agg
        .operations
        .iter()
        .map(|s| s.operation.chars().count())
        .fold("operation".len(), usize::max);

    writeln!(
        out,
        "  {:<width$} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "operation", "count", "non-zero", "mean", "median", "std dev", "min", "max", "p95"
    )?;
    for stats in &agg.operations {
        write!(
            out,
            "  {:<width$} {:>8} {:>8}",
            stats.operation,
            group_thousands(stats.count),
            group_thousands(stats.nonzero_count)
        )?;
        match &stats.summary {
            Some(s) => {
                for v in [s.mean, s.median, s.stddev, s.min, s.max, s.p95] {
                    write!(out, " {:>10.2}", v)?;
                }
            }
            None => {
                for _ in 0..6 {
                    write!(out, " {:>10}", "-")?;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
