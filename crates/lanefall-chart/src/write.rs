//! `.osu` v14 serialization for converted mania charts.

use std::fmt::Write as _;

use crate::beatmap::{Beatmap, Mode};
use crate::hit_object::HitObject;

/// Renders a beatmap back to `.osu` text.
///
/// Mania objects write the lane centre as `x` and a fixed `y` of 192, the
/// same convention the editor uses. Sliders keep their curve data so a
/// non-converted chart survives a round trip.
pub fn write_str(map: &Beatmap) -> String {
    let mut out = String::new();

    out.push_str("osu file format v14\n\n");

    out.push_str("[General]\n");
    let _ = writeln!(out, "Mode: {}", map.mode.as_u8());
    out.push('\n');

    out.push_str("[Metadata]\n");
    let _ = writeln!(out, "Title:{}", map.title);
    let _ = writeln!(out, "Artist:{}", map.artist);
    let _ = writeln!(out, "Creator:{}", map.creator);
    let _ = writeln!(out, "Version:{}", map.version);
    out.push('\n');

    out.push_str("[Difficulty]\n");
    let _ = writeln!(out, "HPDrainRate:{}", trim_float(map.difficulty.hp_drain_rate));
    let _ = writeln!(out, "CircleSize:{}", trim_float(map.difficulty.circle_size));
    let _ = writeln!(
        out,
        "OverallDifficulty:{}",
        trim_float(map.difficulty.overall_difficulty)
    );
    let _ = writeln!(out, "ApproachRate:{}", trim_float(map.difficulty.approach_rate));
    let _ = writeln!(
        out,
        "SliderMultiplier:{}",
        trim_float(map.difficulty.slider_multiplier)
    );
    out.push('\n');

    if !map.breaks.is_empty() {
        out.push_str("[Events]\n//Break Periods\n");
        for brk in &map.breaks {
            let _ = writeln!(out, "2,{},{}", brk.start, brk.end);
        }
        out.push('\n');
    }

    out.push_str("[TimingPoints]\n");
    for point in &map.timing_points {
        let _ = writeln!(
            out,
            "{},{},4,2,0,60,{},{}",
            point.time,
            trim_float(point.beat_length),
            u8::from(point.uninherited),
            u8::from(point.kiai)
        );
    }
    out.push('\n');

    out.push_str("[HitObjects]\n");
    for object in &map.hit_objects {
        write_hit_object(&mut out, object, map.mode);
    }

    out
}

/// Writes a beatmap to disk as `.osu` text.
pub fn write_file(map: &Beatmap, path: &std::path::Path) -> std::io::Result<()> {
    std::fs::write(path, write_str(map))
}

fn write_hit_object(out: &mut String, object: &HitObject, mode: Mode) {
    let y = if mode == Mode::Mania { 192 } else { object.y() };
    match object {
        HitObject::Circle { x, time, hit_sound, .. } => {
            let _ = writeln!(out, "{x},{y},{time},1,{},0:0:0:0:", hit_sound.0);
        }
        HitObject::Slider {
            x,
            time,
            hit_sound,
            slides,
            length,
            curve,
            ..
        } => {
            let _ = writeln!(
                out,
                "{x},{y},{time},2,{},{curve},{slides},{}",
                hit_sound.0,
                trim_float(*length)
            );
        }
        HitObject::Spinner {
            time,
            end_time,
            hit_sound,
        } => {
            let _ = writeln!(out, "256,192,{time},12,{},{end_time},0:0:0:0:", hit_sound.0);
        }
        HitObject::Hold {
            x,
            time,
            end_time,
            hit_sound,
        } => {
            let _ = writeln!(
                out,
                "{x},{y},{time},128,{},{end_time}:0:0:0:0:",
                hit_sound.0
            );
        }
    }
}

/// Prints a float without a trailing `.0` so outputs match hand-edited files.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
