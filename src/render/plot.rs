//! Bitmap charts for the summary and per-operation images.
//!
//! Text is drawn with a bundled DejaVu Sans through plotters' `ab_glyph`
//! backend, so rendering never looks up system fonts.

use crate::model::{Aggregate, OperationStats};
use crate::record::Dataset;
use crate::render::palette_color;
use crate::Result;

use anyhow::bail;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use std::sync::OnceLock;

const SUMMARY_SIZE: (u32, u32) = (1600, 1200);
const OPERATION_SIZE: (u32, u32) = (1200, 500);
const HISTOGRAM_BINS: usize = 50;

const FONT_FAMILY: &str = "sans-serif";
static FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Register the bundled font under the family every chart asks for. Bold
/// text falls back to the same face.
fn register_bundled_font() -> Result<()> {
    let ok = *FONT_REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT).is_ok());
    if !ok {
        bail!("bundled chart font could not be parsed");
    }
    Ok(())
}

fn font(size: u32) -> FontDesc<'static> {
    (FONT_FAMILY, size).into_font()
}

fn title_font(size: u32) -> FontDesc<'static> {
    (FONT_FAMILY, size, FontStyle::Bold).into_font()
}

/// 2x2 grid: count distribution pie, mean time bars, time progression
/// scatter, cumulative time lines.
pub fn render_summary_plot(path: &Path, dataset: &Dataset, agg: &Aggregate) -> Result<()> {
    register_bundled_font()?;

    let root = BitMapBackend::new(path, SUMMARY_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("LSM-Tree Benchmark Analysis", title_font(32))?;

    let panels = root.split_evenly((2, 2));
    draw_distribution_pie(&panels[0], agg)?;
    draw_mean_bars(&panels[1], agg)?;
    draw_progression(&panels[2], dataset, agg)?;
    draw_cumulative(&panels[3], dataset, agg)?;

    root.present()?;
    Ok(())
}

/// 1x2 grid: histogram of raw times, raw times by instance.
pub fn render_operation_plot(path: &Path, stats: &OperationStats, color_index: usize) -> Result<()> {
    register_bundled_font()?;

    let root = BitMapBackend::new(path, OPERATION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(&format!("{} Operation Analysis", stats.operation), title_font(24))?;

    let color = rgb(color_index);
    let panels = root.split_evenly((1, 2));
    draw_histogram(&panels[0], &stats.operation, &stats.times, color)?;
    draw_time_series(&panels[1], &stats.operation, &stats.times, color)?;

    root.present()?;
    Ok(())
}

fn rgb(index: usize) -> RGBColor {
    let (r, g, b) = palette_color(index);
    RGBColor(r, g, b)
}

/// Upper bound for a value axis that starts at zero.
fn axis_max(value: f64) -> f64 {
    if value > 0.0 { value * 1.05 } else { 1.0 }
}

fn frame<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Rectangle::new(
        [(4, 4), (w as i32 - 5, h as i32 - 5)],
        BLACK.mix(0.2).stroke_width(1),
    ))
}

fn draw_distribution_pie<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, agg: &Aggregate) -> DrawResult<DB> {
    frame(area)?;
    let area = area.titled("Operation Distribution", title_font(20))?;
    if agg.total == 0 {
        return Ok(());
    }

    let sizes: Vec<f64> = agg.operations.iter().map(|s| s.count as f64).collect();
    let colors: Vec<RGBColor> = (0..agg.operations.len()).map(rgb).collect();
    let labels: Vec<&str> = agg.operations.iter().map(|s| s.operation.as_str()).collect();

    // Pie coordinates are absolute backend pixels.
    let (x0, y0) = area.get_base_pixel();
    let (w, h) = area.dim_in_pixel();
    let center = (x0 + w as i32 / 2, y0 + h as i32 / 2);
    let radius = w.min(h) as f64 * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(font(16).color(&BLACK));
    pie.percentages(font(14).color(&WHITE));
    area.draw(&pie)
}

/// Operation name for an integer bar position, empty between bars.
pub(crate) fn bar_label(names: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    names.get(slot as usize).cloned().unwrap_or_default()
}

fn draw_mean_bars<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, agg: &Aggregate) -> DrawResult<DB> {
    frame(area)?;

    let names: Vec<String> = agg.operations.iter().map(|s| s.operation.clone()).collect();
    let means: Vec<f64> = agg
        .operations
        .iter()
        .map(|s| s.summary.as_ref().map_or(0.0, |summary| summary.mean))
        .collect();
    let slots = means.len().max(1);
    // headroom for the value labels
    let y_max = axis_max(means.iter().copied().fold(0.0, f64::max)) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Average Time by Operation (Non-Zero Only)", title_font(20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(slots as f64 - 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&|x| bar_label(&names, *x))
        .y_desc("Time (microseconds)")
        .label_style(font(14))
        .draw()?;

    chart.draw_series(means.iter().enumerate().map(|(i, mean)| {
        Rectangle::new(
            [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *mean)],
            rgb(i).filled(),
        )
    }))?;

    let value_style = font(14).color(&BLACK).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(
        means
            .iter()
            .enumerate()
            .map(|(i, mean)| Text::new(format!("{:.1}μs", mean), (i as f64, *mean), value_style.clone())),
    )?;
    Ok(())
}

fn draw_progression<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    agg: &Aggregate,
) -> DrawResult<DB> {
    frame(area)?;

    let x_max = dataset.len() as f64 + 1.0;
    let y_max = axis_max(dataset.records.iter().map(|r| r.time_us).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption("Execution Time Progression", title_font(20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Operation Number")
        .y_desc("Time (microseconds)")
        .label_style(font(14))
        .draw()?;

    for (i, stats) in agg.operations.iter().enumerate() {
        let color = rgb(i).mix(0.6);
        chart
            .draw_series(
                dataset
                    .records
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.operation == stats.operation)
                    .map(|(pos, r)| Circle::new(((pos + 1) as f64, r.time_us), 2, color.filled())),
            )?
            .label(stats.operation.as_str())
            .legend(move |(x, y)| Circle::new((x + 6, y), 4, color.filled()));
    }
    draw_legend(&mut chart, agg)
}

/// Running total of an operation's time in seconds, against each record's
/// 1-based position in the whole dataset.
pub(crate) fn cumulative_seconds(dataset: &Dataset, operation: &str) -> Vec<(f64, f64)> {
    let mut total_us = 0.0;
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.operation == operation)
        .map(|(pos, r)| {
            total_us += r.time_us;
            ((pos + 1) as f64, total_us / 1_000_000.0)
        })
        .collect()
}

fn draw_cumulative<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    agg: &Aggregate,
) -> DrawResult<DB> {
    frame(area)?;

    let lines: Vec<Vec<(f64, f64)>> = agg
        .operations
        .iter()
        .map(|s| cumulative_seconds(dataset, &s.operation))
        .collect();
    let x_max = dataset.len() as f64 + 1.0;
    let y_max = axis_max(
        lines
            .iter()
            .filter_map(|line| line.last().map(|(_, secs)| *secs))
            .fold(0.0, f64::max),
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Cumulative Time by Operation", title_font(20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Operation Number")
        .y_desc("Cumulative Time (seconds)")
        .label_style(font(14))
        .draw()?;

    for ((i, stats), line) in agg.operations.iter().enumerate().zip(lines) {
        let color = rgb(i);
        chart
            .draw_series(LineSeries::new(line, color.stroke_width(2)))?
            .label(stats.operation.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
    }
    draw_legend(&mut chart, agg)
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    agg: &Aggregate,
) -> DrawResult<DB> {
    if agg.operations.is_empty() {
        return Ok(());
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.5))
        .label_font(font(14))
        .draw()
}

/// Equal-width bins over `[min, max]` as `(lower, upper, count)`. A sample
/// with a single distinct value lands in one bin of width 1.
pub(crate) fn histogram(times: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    if times.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for t in times {
        let idx = (((t - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + i as f64 * width, min + (i + 1) as f64 * width, count))
        .collect()
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    operation: &str,
    times: &[f64],
    color: RGBColor,
) -> DrawResult<DB> {
    frame(area)?;

    let bins = histogram(times, HISTOGRAM_BINS);
    let (x_min, x_max) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.0, last.1),
        _ => (0.0, 1.0),
    };
    let y_max = bins.iter().map(|b| b.2).max().unwrap_or(0) as f64 + 1.0;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} Time Distribution", operation), title_font(18))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (microseconds)")
        .y_desc("Frequency")
        .label_style(font(14))
        .draw()?;

    chart.draw_series(bins.iter().map(|(lo, hi, count)| {
        Rectangle::new([(*lo, 0.0), (*hi, *count as f64)], color.mix(0.7).filled())
    }))?;
    Ok(())
}

fn draw_time_series<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    operation: &str,
    times: &[f64],
    color: RGBColor,
) -> DrawResult<DB> {
    frame(area)?;

    let x_max = times.len().max(1) as f64;
    let y_max = axis_max(times.iter().copied().fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} Time Progression", operation), title_font(18))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Operation Instance")
        .y_desc("Time (microseconds)")
        .label_style(font(14))
        .draw()?;

    chart.draw_series(LineSeries::new(
        times.iter().enumerate().map(|(i, t)| (i as f64, *t)),
        color.mix(0.7).stroke_width(1),
    ))?;
    Ok(())
}
