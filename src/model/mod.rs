//! Aggregation model: group benchmark records by operation and summarize.
//!
//! Zero timings are counted (per operation and globally) but excluded from
//! every statistic.

pub mod stats;

pub use stats::Summary;

use crate::record::Dataset;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStats {
    pub operation: String,
    pub count: usize,
    pub nonzero_count: usize,

    /// Raw timings in input order, zeros included.
    #[serde(skip_serializing)]
    pub times: Vec<f64>,

    /// None when every timing of this operation is zero.
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// One entry per distinct operation, in order of first appearance.
    pub operations: Vec<OperationStats>,
    /// Records with `time_us == 0` across the whole dataset.
    pub zero_time_count: usize,
    pub total: usize,
}

/// A row of the operation count ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountShare {
    pub operation: String,
    pub count: usize,
    /// Percentage of the whole dataset.
    pub share: f64,
}

impl Aggregate {
    /// Operations by descending count; ties keep first-seen order.
    pub fn count_ranking(&self) -> Vec<CountShare> {
        let mut ranking: Vec<CountShare> = self
            .operations
            .iter()
            .map(|s| CountShare {
                operation: s.operation.clone(),
                count: s.count,
                share: if self.total == 0 {
                    0.0
                } else {
                    s.count as f64 * 100.0 / self.total as f64
                },
            })
            .collect();
        ranking.sort_by(|a, b| b.count.cmp(&a.count));
        ranking
    }
}

/// Group records by operation and compute per-operation statistics.
pub fn aggregate(dataset: &Dataset) -> Aggregate {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    let mut zero_time_count = 0usize;

    for record in &dataset.records {
        if record.time_us == 0.0 {
            zero_time_count += 1;
        }
        let slot = *index.entry(record.operation.as_str()).or_insert_with(|| {
            groups.push((record.operation.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record.time_us);
    }

    let operations: Vec<OperationStats> = groups
        .into_iter()
        .map(|(operation, times)| {
            let nonzero: Vec<f64> = times.iter().copied().filter(|t| *t > 0.0).collect();
            let summary = stats::summarize(&nonzero);
            if summary.is_none() {
                warn!(operation, count = times.len(), "all timings are zero; statistics skipped");
            }
            OperationStats {
                operation: operation.to_string(),
                count: times.len(),
                nonzero_count: nonzero.len(),
                times,
                summary,
            }
        })
        .collect();

    if zero_time_count > 0 {
        warn!(
            zero_time_count,
            "operations recorded 0 us time; this may indicate timing measurement issues"
        );
    }

    Aggregate {
        operations,
        zero_time_count,
        total: dataset.len(),
    }
}
