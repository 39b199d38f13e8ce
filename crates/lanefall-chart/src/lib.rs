//! Chart model plus `.osu` v14 reading and writing.
//!
//! This crate is deliberately small: it knows how to load a chart into a
//! typed [`Beatmap`], answer the geometry questions the converter asks
//! (lane/coordinate mapping, timing lookup, drain time), and render the
//! result back out. All conversion logic lives in `lanefall-convert`.

pub mod beatmap;
pub mod hit_object;
pub mod parse;
pub mod timing;
pub mod write;

pub use beatmap::{Beatmap, BreakPeriod, Difficulty, Mode};
pub use hit_object::{
    column_from_x, column_to_x, HitObject, HitSound, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH,
};
pub use parse::{parse_file, parse_str, ParseError};
pub use timing::TimingPoint;
pub use write::{write_file, write_str};
