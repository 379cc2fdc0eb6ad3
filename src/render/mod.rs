//! Presentation layer: images, text report, HTML report and console output.
//!
//! Everything here consumes `Aggregate` read-only.

pub mod html;
pub mod plot;
pub mod text;

pub use html::render_html_report;
pub use plot::{render_operation_plot, render_summary_plot};
pub use text::{render_console_summary, render_text_report};

use crate::model::Aggregate;
use std::collections::HashSet;
use tracing::warn;

pub const SUMMARY_IMAGE: &str = "benchmark_summary.png";
pub const TEXT_REPORT: &str = "benchmark_report.txt";
pub const HTML_REPORT: &str = "benchmark_report.html";

/// Per-operation colours, assigned in first-seen order and wrapped.
pub const PALETTE: [(u8, u8, u8); 8] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
];

pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Lowercased operation name with everything outside `[a-z0-9_-]` mapped to
/// `_`, so the result is always a single path component.
pub fn operation_file_stem(operation: &str) -> String {
    operation
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File names of the per-operation images, parallel to `agg.operations`.
///
/// Usually `<stem>_analysis.png`. When two operations map to the same stem
/// (`PUT` and `put`, `a/b` and `a.b`) the later one gets its first-seen index
/// appended, `<stem>_<index>_analysis.png`.
pub fn operation_image_names(agg: &Aggregate) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(agg.operations.len());

    for (i, stats) in agg.operations.iter().enumerate() {
        let stem = operation_file_stem(&stats.operation);
        let mut name = format!("{}_analysis.png", stem);
        if taken.contains(&name) {
            let mut suffix = i;
            while taken.contains(&name) {
                name = format!("{}_{}_analysis.png", stem, suffix);
                suffix += 1;
            }
            warn!(
                operation = %stats.operation,
                file = %name,
                "operation image name collides with an earlier operation; renamed"
            );
        }
        taken.insert(name.clone());
        names.push(name);
    }

    names
}
