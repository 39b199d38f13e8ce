//! osu!standard to osu!mania pattern conversion.
//!
//! The entry point is [`ManiaConverter`], which folds a parsed chart's
//! object stream into lane-assigned notes: per event it derives a
//! conversion-type capability set, dispatches to the instant or duration
//! generator, and threads the previous pattern, the rolling density
//! window, and one deterministic RNG stream through every step. Identical
//! seed and input reproduce the output exactly.
//!
//! ```no_run
//! use lanefall_convert::{convert_beatmap, ConvertRng};
//!
//! let chart = lanefall_chart::parse_file(std::path::Path::new("song.osu"))?;
//! let mut rng = ConvertRng::new(1234);
//! let mania = convert_beatmap(&chart, &mut rng)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod converter;
pub mod error;
pub mod instant;
pub mod pattern;
pub mod post;
pub mod rng;
pub mod selector;
pub mod sustain;

pub use converter::{
    convert_beatmap, convert_beatmap_with_columns, target_columns, Conversion, ManiaConverter,
};
pub use error::ConvertError;
pub use instant::InstantGenerator;
pub use pattern::{ConvertType, Note, Pattern, StairDirection};
pub use post::{collapse_short_holds, insert_breaks};
pub use rng::ConvertRng;
pub use selector::{conversion_difficulty, random_note_count, ColumnValidator, NextColumn, Selector};
pub use sustain::DurationGenerator;
