//! Lanefall - convert osu!standard charts to osu!mania.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use lanefall_cli::commands;

/// Lanefall - osu!standard to osu!mania chart converter
#[derive(Parser)]
#[command(name = "lanefall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single .osu chart to mania
    Convert {
        /// Path to the input .osu file
        input: String,

        /// Output path (default: "<input stem>Converted.osu" next to the input)
        #[arg(short, long)]
        output: Option<String>,

        /// Lane count override, 1-9 (default: derived from chart statistics)
        #[arg(short, long)]
        keys: Option<usize>,

        /// Conversion seed (default: 0)
        #[arg(short, long, default_value_t = 0)]
        seed: u32,

        /// Insert break sections into long empty spans
        #[arg(long)]
        insert_breaks: bool,

        /// Collapse quarter-beat holds into taps
        #[arg(long)]
        collapse_short_holds: bool,
    },

    /// Convert every .osu chart under a directory in parallel
    Batch {
        /// Directory to scan recursively for .osu files
        dir: String,

        /// Lane count override, 1-9 (default: derived per chart)
        #[arg(short, long)]
        keys: Option<usize>,

        /// Base seed; each file derives its own stream from this and its path
        #[arg(short, long, default_value_t = 0)]
        seed: u32,

        /// Insert break sections into long empty spans
        #[arg(long)]
        insert_breaks: bool,

        /// Collapse quarter-beat holds into taps
        #[arg(long)]
        collapse_short_holds: bool,

        /// Output a machine-readable JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Show chart statistics and the lane count a conversion would use
    Info {
        /// Path to the input .osu file
        input: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            keys,
            seed,
            insert_breaks,
            collapse_short_holds,
        } => commands::convert::run(
            &input,
            output.as_deref(),
            keys,
            seed,
            insert_breaks,
            collapse_short_holds,
        ),
        Commands::Batch {
            dir,
            keys,
            seed,
            insert_breaks,
            collapse_short_holds,
            json,
        } => commands::batch::run(&dir, keys, seed, insert_breaks, collapse_short_holds, json),
        Commands::Info { input } => commands::info::run(&input),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "lanefall", "convert", "map.osu", "--keys", "7", "--seed", "42",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert {
                input,
                keys,
                seed,
                insert_breaks,
                ..
            } => {
                assert_eq!(input, "map.osu");
                assert_eq!(keys, Some(7));
                assert_eq!(seed, 42);
                assert!(!insert_breaks);
            }
            _ => panic!("expected convert subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_batch_flags() {
        let cli =
            Cli::try_parse_from(["lanefall", "batch", "songs", "--json", "--insert-breaks"])
                .unwrap();
        match cli.command {
            Commands::Batch {
                dir,
                json,
                insert_breaks,
                collapse_short_holds,
                seed,
                ..
            } => {
                assert_eq!(dir, "songs");
                assert!(json);
                assert!(insert_breaks);
                assert!(!collapse_short_holds);
                assert_eq!(seed, 0);
            }
            _ => panic!("expected batch subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["lanefall", "remix", "map.osu"]).is_err());
    }
}
