//! Info command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use lanefall_chart::{parse_file, HitObject};
use lanefall_convert::{conversion_difficulty, target_columns};

/// Run the info command: print chart statistics and the lane count a
/// conversion would pick.
pub fn run(input: &str) -> Result<ExitCode> {
    let chart = parse_file(Path::new(input)).with_context(|| format!("failed to read {input}"))?;

    let circles = count(&chart.hit_objects, |o| matches!(o, HitObject::Circle { .. }));
    let sliders = count(&chart.hit_objects, |o| matches!(o, HitObject::Slider { .. }));
    let spinners = count(&chart.hit_objects, |o| matches!(o, HitObject::Spinner { .. }));
    let holds = count(&chart.hit_objects, |o| matches!(o, HitObject::Hold { .. }));

    println!(
        "{} {} - {} [{}]",
        "Chart:".cyan().bold(),
        chart.artist,
        chart.title,
        chart.version
    );
    println!("{} {:?}", "Mode:".blue().bold(), chart.mode);
    println!(
        "{} {} circles, {} sliders, {} spinners, {} holds",
        "Objects:".blue().bold(),
        circles,
        sliders,
        spinners,
        holds
    );
    println!(
        "{} {:.1} BPM ({:.1}ms/beat)",
        "Tempo:".blue().bold(),
        60_000.0 / chart.beat_length(),
        chart.beat_length()
    );
    println!(
        "{} {:.1}s drain, {:.0}% sliders or spinners",
        "Length:".blue().bold(),
        chart.drain_time_ms() as f64 / 1000.0,
        chart.percent_slider_or_spinner() * 100.0
    );
    println!(
        "{} {:.2}",
        "Conversion difficulty:".blue().bold(),
        conversion_difficulty(&chart)
    );
    println!(
        "{} {}K",
        "Target lanes:".green().bold(),
        target_columns(&chart)
    );

    Ok(ExitCode::SUCCESS)
}

fn count(objects: &[HitObject], predicate: impl Fn(&&HitObject) -> bool) -> usize {
    objects.iter().filter(predicate).count()
}
