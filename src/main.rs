use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

mod error;
mod logging;
mod model;
mod record;
mod render;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "bench-analyzer")]
#[command(about = "Analyze LSM-tree benchmark results", long_about = None)]
struct Cli {
    /// Path to benchmark CSV file
    csv_file: PathBuf,

    /// Output directory for plots and reports
    #[arg(short = 'o', long, default_value = "benchmark_plots")]
    output: PathBuf,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    analyze(&cli.csv_file, &cli.output)
}

/// Run the whole pipeline: load, aggregate, render, report.
///
/// A missing or unparseable input is reported on stderr and ends the run
/// without creating the output directory.
fn analyze(csv_file: &Path, out_dir: &Path) -> Result<()> {
    println!("Reading benchmark data from {}", csv_file.display());

    // 1) Load.
    let dataset = match record::load_dataset(csv_file) {
        Ok(dataset) => dataset,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(());
        }
    };

    if dataset.is_empty() {
        warn!(path = %csv_file.display(), "no data rows; reports will be empty");
    }

    // 2) Aggregate.
    let agg = model::aggregate(&dataset);
    debug!(
        rows = agg.total,
        operations = agg.operations.len(),
        "aggregated benchmark data"
    );

    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    // 3) Images.
    let summary_path = out_dir.join(render::SUMMARY_IMAGE);
    render::render_summary_plot(&summary_path, &dataset, &agg)
        .with_context(|| format!("render {}", summary_path.display()))?;
    println!("Summary plot saved to: {}", summary_path.display());

    let image_names = render::operation_image_names(&agg);
    for (i, (stats, name)) in agg.operations.iter().zip(&image_names).enumerate() {
        let path = out_dir.join(name);
        render::render_operation_plot(&path, stats, i)
            .with_context(|| format!("render {}", path.display()))?;
        println!("{} analysis plot saved to: {}", stats.operation, path.display());
    }

    // 4) Reports.
    let now = chrono::Local::now();

    let report_path = out_dir.join(render::TEXT_REPORT);
    let report = render::render_text_report(csv_file, &agg, &now)?;
    fs::write(&report_path, report).with_context(|| format!("write {}", report_path.display()))?;
    println!("Detailed report saved to: {}", report_path.display());

    let html_path = out_dir.join(render::HTML_REPORT);
    let generated_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let html = render::render_html_report(&csv_file.display().to_string(), &generated_at, &agg, &image_names)?;
    fs::write(&html_path, html).with_context(|| format!("write {}", html_path.display()))?;
    println!("HTML report saved to: {}", html_path.display());

    // 5) Console summary.
    println!();
    print!("{}", render::render_console_summary(&dataset, &agg)?);
    println!();
    println!("Plots and report saved to: {}/", out_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_defaults_to_benchmark_plots() {
        let cli = Cli::try_parse_from(["bench-analyzer", "stats.csv"]).unwrap();
        assert_eq!(cli.csv_file, PathBuf::from("stats.csv"));
        assert_eq!(cli.output, PathBuf::from("benchmark_plots"));

        let cli = Cli::try_parse_from(["bench-analyzer", "stats.csv", "-o", "out"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out"));
    }

    #[test]
    fn writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("stats.csv");
        fs::write(&csv, "operation,key,time_us\nPUT,1,10\nPUT,2,0\nGET,1,20\nGET,2,30\n").unwrap();
        let out = dir.path().join("plots");

        analyze(&csv, &out).unwrap();

        assert_eq!(
            written_files(&out),
            vec![
                "benchmark_report.html",
                "benchmark_report.txt",
                "benchmark_summary.png",
                "get_analysis.png",
                "put_analysis.png",
            ]
        );

        let report = fs::read_to_string(out.join("benchmark_report.txt")).unwrap();
        assert!(report.contains("Warning: 1 operations recorded 0 μs time"));
    }

    fn written_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn case_variants_get_separate_images() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("stats.csv");
        fs::write(&csv, "operation,time_us\nPUT,10\nput,20\n").unwrap();
        let out = dir.path().join("plots");

        analyze(&csv, &out).unwrap();

        let names = written_files(&out);
        assert!(names.contains(&"put_analysis.png".to_string()), "{names:?}");
        assert!(names.contains(&"put_1_analysis.png".to_string()), "{names:?}");
    }

    #[test]
    fn slash_in_operation_name_stays_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("stats.csv");
        fs::write(&csv, "operation,time_us\nGET/SCAN,10\n../escape,5\n").unwrap();
        let out = dir.path().join("plots");

        analyze(&csv, &out).unwrap();

        assert_eq!(
            written_files(&out),
            vec![
                "___escape_analysis.png",
                "benchmark_report.html",
                "benchmark_report.txt",
                "benchmark_summary.png",
                "get_scan_analysis.png",
            ]
        );
        assert!(!dir.path().join("escape_analysis.png").exists());
    }

    #[test]
    fn missing_input_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plots");

        analyze(&dir.path().join("missing.csv"), &out).unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn unparseable_input_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("stats.csv");
        fs::write(&csv, "name,duration\nPUT,10\n").unwrap();
        let out = dir.path().join("plots");

        analyze(&csv, &out).unwrap();

        assert!(!out.exists());
    }
}
