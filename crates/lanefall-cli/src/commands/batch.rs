//! Batch command implementation.
//!
//! Converts every `.osu` file under a directory in parallel. Each file gets
//! its own RNG stream derived from the base seed and its path, so results
//! are reproducible regardless of scheduling, and one malformed chart never
//! aborts the run.

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use walkdir::WalkDir;

use lanefall_chart::{parse_file, write_file, Mode};
use lanefall_convert::{collapse_short_holds, insert_breaks, ConvertRng};

use super::convert::BREAK_WINDOW_BEATS;
use super::converted_path;

/// Outcome for one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub input: String,
    pub output: Option<String>,
    pub success: bool,
    pub skipped: bool,
    pub error: Option<String>,
    pub columns: Option<usize>,
    pub seed: u32,
}

/// Summary report for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub runtime_seconds: f64,
    pub files: Vec<FileResult>,
}

/// Run the batch command.
///
/// # Returns
/// Exit code: 0 when every non-skipped file converted, 1 otherwise.
pub fn run(
    dir: &str,
    keys: Option<usize>,
    base_seed: u32,
    with_breaks: bool,
    with_collapse: bool,
    json: bool,
) -> Result<ExitCode> {
    let root = Path::new(dir);
    if !root.is_dir() {
        anyhow::bail!("not a directory: {dir}");
    }

    let start = Instant::now();
    let inputs = collect_charts(root);

    let mut files: Vec<FileResult> = inputs
        .par_iter()
        .map(|path| convert_one(path, keys, base_seed, with_breaks, with_collapse))
        .collect();
    files.sort_by(|a, b| a.input.cmp(&b.input));

    let summary = BatchSummary {
        total: files.len(),
        converted: files.iter().filter(|f| f.success).count(),
        skipped: files.iter().filter(|f| f.skipped).count(),
        failed: files.iter().filter(|f| !f.success && !f.skipped).count(),
        runtime_seconds: start.elapsed().as_secs_f64(),
        files,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn collect_charts(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "osu")
                && !path
                    .file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().ends_with("Converted"))
        })
        .collect()
}

fn convert_one(
    path: &Path,
    keys: Option<usize>,
    base_seed: u32,
    with_breaks: bool,
    with_collapse: bool,
) -> FileResult {
    let input = path.display().to_string();
    let seed = ConvertRng::derive_chart_seed(base_seed, &input);

    let mut result = FileResult {
        input,
        output: None,
        success: false,
        skipped: false,
        error: None,
        columns: None,
        seed,
    };

    let chart = match parse_file(path) {
        Ok(chart) => chart,
        Err(err) => {
            result.error = Some(err.to_string());
            return result;
        }
    };

    if chart.mode != Mode::Standard {
        result.skipped = true;
        result.error = Some("not an osu!standard chart".to_string());
        return result;
    }

    let mut converted = match super::convert::convert_chart(&chart, keys, seed) {
        Ok(converted) => converted,
        Err(err) => {
            result.error = Some(err.to_string());
            return result;
        }
    };
    converted.version = format!("{}Converted", chart.version);

    if with_breaks {
        insert_breaks(&mut converted, BREAK_WINDOW_BEATS);
    }
    if with_collapse {
        collapse_short_holds(&mut converted);
    }

    let output_path = converted_path(path);
    match write_file(&converted, &output_path) {
        Ok(()) => {
            result.success = true;
            result.output = Some(output_path.display().to_string());
            result.columns = Some(converted.difficulty.circle_size as usize);
        }
        Err(err) => result.error = Some(err.to_string()),
    }

    result
}

fn print_summary(summary: &BatchSummary) {
    for file in &summary.files {
        if file.success {
            println!(
                "{} {} ({}K)",
                "ok".green().bold(),
                file.input,
                file.columns.unwrap_or(0)
            );
        } else if file.skipped {
            println!("{} {}", "skip".yellow().bold(), file.input);
        } else {
            println!(
                "{} {}: {}",
                "fail".red().bold(),
                file.input,
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!();
    println!(
        "{} {} converted, {} skipped, {} failed in {:.2}s",
        "Summary:".cyan().bold(),
        summary.converted,
        summary.skipped,
        summary.failed,
        summary.runtime_seconds
    );
}
