//! Convert command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use lanefall_chart::{parse_file, write_file, Beatmap, Mode};
use lanefall_convert::{
    collapse_short_holds, convert_beatmap, convert_beatmap_with_columns, insert_breaks, ConvertRng,
};

use super::converted_path;

/// Beat window used when `--insert-breaks` is given.
pub const BREAK_WINDOW_BEATS: i32 = 6;

/// Run the convert command.
///
/// # Returns
/// Exit code: 0 on success, 1 when the chart cannot be converted.
pub fn run(
    input: &str,
    output: Option<&str>,
    keys: Option<usize>,
    seed: u32,
    with_breaks: bool,
    with_collapse: bool,
) -> Result<ExitCode> {
    let input_path = Path::new(input);
    let chart = parse_file(input_path).with_context(|| format!("failed to read {input}"))?;

    if chart.mode != Mode::Standard {
        eprintln!(
            "{} {} is not an osu!standard chart",
            "error:".red().bold(),
            input
        );
        return Ok(ExitCode::FAILURE);
    }

    let mut converted = convert_chart(&chart, keys, seed)?;
    converted.version = format!("{}Converted", chart.version);

    if with_breaks {
        insert_breaks(&mut converted, BREAK_WINDOW_BEATS);
    }
    if with_collapse {
        collapse_short_holds(&mut converted);
    }

    let output_path = match output {
        Some(path) => path.into(),
        None => converted_path(input_path),
    };
    write_file(&converted, &output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!(
        "{} {} -> {} ({}K, {} objects, seed {})",
        "Converted:".green().bold(),
        input,
        output_path.display(),
        converted.difficulty.circle_size as usize,
        converted.hit_objects.len(),
        seed
    );

    Ok(ExitCode::SUCCESS)
}

/// Converts a parsed chart, honoring an optional lane-count override.
pub fn convert_chart(chart: &Beatmap, keys: Option<usize>, seed: u32) -> Result<Beatmap> {
    let mut rng = ConvertRng::new(seed);
    let converted = match keys {
        Some(columns) => convert_beatmap_with_columns(chart, columns, &mut rng)?,
        None => convert_beatmap(chart, &mut rng)?,
    };
    Ok(converted)
}
