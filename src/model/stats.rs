//! Descriptive statistics over a sample of timings.

use serde::Serialize;
use std::cmp::Ordering;

/// Summary of the non-zero timings of one operation, in microseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single sample.
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
}

/// Summarize a sample. Returns `None` for an empty sample.
pub fn summarize(samples: &[f64]) -> Option<Summary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let stddev = if sorted.len() > 1 {
        let var = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    } else {
        0.0
    };

    Some(Summary {
        mean,
        median: quantile(&sorted, 0.5),
        stddev,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p95: quantile(&sorted, 0.95),
    })
}

/// Quantile of an ascending, non-empty sample by linear interpolation between
/// the two order statistics around rank `(n - 1) * q`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_sample_has_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn single_sample() {
        let s = summarize(&[42.0]).unwrap();
        assert_eq!(
            s,
            Summary {
                mean: 42.0,
                median: 42.0,
                stddev: 0.0,
                min: 42.0,
                max: 42.0,
                p95: 42.0,
            }
        );
    }

    #[test]
    fn unsorted_input() {
        let s = summarize(&[30.0, 10.0, 20.0, 40.0]).unwrap();
        assert!(close(s.mean, 25.0));
        assert!(close(s.median, 25.0));
        assert!(close(s.min, 10.0));
        assert!(close(s.max, 40.0));
        // sqrt(((15^2 + 5^2) * 2) / 3)
        assert!(close(s.stddev, (500.0f64 / 3.0).sqrt()));
        // rank 2.85 -> 30 + 0.85 * 10
        assert!(close(s.p95, 38.5));
    }

    #[test]
    fn p95_interpolates_between_order_statistics() {
        let sample: Vec<f64> = (1..=100).map(f64::from).collect();
        // rank 94.05 -> 95 + 0.05 * 1
        assert!(close(quantile(&sample, 0.95), 95.05));
        assert!(close(quantile(&sample, 0.5), 50.5));
        assert!(close(quantile(&sample, 0.0), 1.0));
        assert!(close(quantile(&sample, 1.0), 100.0));
    }
}
