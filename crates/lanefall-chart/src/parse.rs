//! `.osu` v14 text parsing.
//!
//! Only the sections the converter needs are modeled: `[General]` (mode),
//! `[Metadata]`, `[Difficulty]`, `[Events]` break lines, `[TimingPoints]`,
//! and `[HitObjects]`. Unknown keys and event types are skipped, not
//! rejected, so charts from any editor version parse.

use thiserror::Error;

use crate::beatmap::{Beatmap, BreakPeriod, Mode};
use crate::hit_object::{HitObject, HitSound};
use crate::timing::TimingPoint;

const TYPE_CIRCLE: u32 = 1;
const TYPE_SLIDER: u32 = 1 << 1;
const TYPE_SPINNER: u32 = 1 << 3;
const TYPE_HOLD: u32 = 1 << 7;

/// Errors raised while reading a chart.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: malformed hit object: {message}")]
    MalformedHitObject { line: usize, message: String },
    #[error("line {line}: malformed timing point: {message}")]
    MalformedTimingPoint { line: usize, message: String },
    #[error("line {line}: invalid number in '{field}'")]
    InvalidNumber { line: usize, field: String },
    #[error("chart has no [HitObjects] section")]
    MissingHitObjects,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    General,
    Metadata,
    Difficulty,
    Events,
    TimingPoints,
    HitObjects,
    Other,
}

/// Parses the full text of a `.osu` file.
pub fn parse_str(content: &str) -> Result<Beatmap, ParseError> {
    let mut map = Beatmap::default();
    let mut section = Section::None;
    let mut saw_hit_objects = false;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = match name {
                "General" => Section::General,
                "Metadata" => Section::Metadata,
                "Difficulty" => Section::Difficulty,
                "Events" => Section::Events,
                "TimingPoints" => Section::TimingPoints,
                "HitObjects" => Section::HitObjects,
                _ => Section::Other,
            };
            if section == Section::HitObjects {
                saw_hit_objects = true;
            }
            continue;
        }

        match section {
            Section::General => parse_key_value(line, |key, value| {
                if key == "Mode" {
                    map.mode = Mode::from_u8(value.parse().unwrap_or(0));
                }
            }),
            Section::Metadata => parse_key_value(line, |key, value| match key {
                "Title" => map.title = value.to_string(),
                "Artist" => map.artist = value.to_string(),
                "Creator" => map.creator = value.to_string(),
                "Version" => map.version = value.to_string(),
                _ => {}
            }),
            Section::Difficulty => parse_key_value(line, |key, value| {
                let parsed = value.parse::<f64>().unwrap_or_default();
                match key {
                    "HPDrainRate" => map.difficulty.hp_drain_rate = parsed,
                    "CircleSize" => map.difficulty.circle_size = parsed,
                    "OverallDifficulty" => map.difficulty.overall_difficulty = parsed,
                    "ApproachRate" => map.difficulty.approach_rate = parsed,
                    "SliderMultiplier" => map.difficulty.slider_multiplier = parsed,
                    _ => {}
                }
            }),
            Section::Events => {
                if let Some(brk) = parse_break(line) {
                    map.breaks.push(brk);
                }
            }
            Section::TimingPoints => {
                map.timing_points.push(parse_timing_point(line, line_no)?);
            }
            Section::HitObjects => {
                map.hit_objects.push(parse_hit_object(line, line_no)?);
            }
            Section::None | Section::Other => {}
        }
    }

    if !saw_hit_objects {
        return Err(ParseError::MissingHitObjects);
    }
    Ok(map)
}

/// Reads and parses a chart file.
pub fn parse_file(path: &std::path::Path) -> Result<Beatmap, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

fn parse_key_value(line: &str, mut apply: impl FnMut(&str, &str)) {
    if let Some((key, value)) = line.split_once(':') {
        apply(key.trim(), value.trim());
    }
}

fn parse_break(line: &str) -> Option<BreakPeriod> {
    let mut parts = line.split(',');
    let kind = parts.next()?.trim();
    if kind != "2" && kind != "Break" {
        return None;
    }
    let start = parts.next()?.trim().parse().ok()?;
    let end = parts.next()?.trim().parse().ok()?;
    Some(BreakPeriod { start, end })
}

fn parse_timing_point(line: &str, line_no: usize) -> Result<TimingPoint, ParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 2 {
        return Err(ParseError::MalformedTimingPoint {
            line: line_no,
            message: format!("expected at least 2 fields, got {}", fields.len()),
        });
    }
    // Older file versions write the offset as a decimal.
    let time = fields[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: "time".to_string(),
        })? as i32;
    let beat_length = fields[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: "beatLength".to_string(),
        })?;
    let uninherited = match fields.get(6) {
        Some(v) => v.trim() != "0",
        None => beat_length > 0.0,
    };
    let kiai = match fields.get(7) {
        Some(v) => v.trim().parse::<u32>().unwrap_or(0) & 1 != 0,
        None => false,
    };
    Ok(TimingPoint {
        time,
        beat_length,
        uninherited,
        kiai,
    })
}

fn parse_hit_object(line: &str, line_no: usize) -> Result<HitObject, ParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 5 {
        return Err(ParseError::MalformedHitObject {
            line: line_no,
            message: format!("expected at least 5 fields, got {}", fields.len()),
        });
    }

    let int = |field: &str, name: &str| -> Result<i32, ParseError> {
        field.trim().parse().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: name.to_string(),
        })
    };

    let x = int(fields[0], "x")?;
    let y = int(fields[1], "y")?;
    let time = int(fields[2], "time")?;
    let kind = int(fields[3], "type")? as u32;
    let hit_sound = HitSound(int(fields[4], "hitSound")? as u8);

    if kind & TYPE_CIRCLE != 0 {
        Ok(HitObject::Circle {
            x,
            y,
            time,
            hit_sound,
        })
    } else if kind & TYPE_SLIDER != 0 {
        if fields.len() < 8 {
            return Err(ParseError::MalformedHitObject {
                line: line_no,
                message: "slider missing curve/slides/length fields".to_string(),
            });
        }
        let curve = fields[5].trim().to_string();
        let slides = int(fields[6], "slides")?;
        let length = fields[7]
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                field: "length".to_string(),
            })?;
        Ok(HitObject::Slider {
            x,
            y,
            time,
            hit_sound,
            slides,
            length,
            curve,
        })
    } else if kind & TYPE_SPINNER != 0 {
        if fields.len() < 6 {
            return Err(ParseError::MalformedHitObject {
                line: line_no,
                message: "spinner missing end time".to_string(),
            });
        }
        Ok(HitObject::Spinner {
            time,
            end_time: int(fields[5], "endTime")?,
            hit_sound,
        })
    } else if kind & TYPE_HOLD != 0 {
        if fields.len() < 6 {
            return Err(ParseError::MalformedHitObject {
                line: line_no,
                message: "hold missing end time".to_string(),
            });
        }
        // Hold tail is "endTime:hitSample".
        let end_field = fields[5].trim();
        let end_str = end_field.split(':').next().unwrap_or(end_field);
        let end_time = end_str.parse().map_err(|_| ParseError::InvalidNumber {
            line: line_no,
            field: "endTime".to_string(),
        })?;
        Ok(HitObject::Hold {
            x,
            time,
            end_time,
            hit_sound,
        })
    } else {
        Err(ParseError::MalformedHitObject {
            line: line_no,
            message: format!("unknown object type {kind}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = "\
osu file format v14

[General]
Mode: 0

[Metadata]
Title:Test Song
Artist:Someone
Creator:someone else
Version:Insane

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:7
ApproachRate:9
SliderMultiplier:1.8

[Events]
//Break Periods
2,20000,24000

[TimingPoints]
1000,400,4,2,0,60,1,0
5000,-100,4,2,0,60,0,1

[HitObjects]
64,192,1000,1,0,0:0:0:0:
192,192,1400,2,8,L|320:192,2,140,0|0|0,0:0|0:0|0:0,0:0:0:0:
256,192,3000,12,0,3600,0:0:0:0:
256,192,4000,128,4,4800:0:0:0:0:
";

    #[test]
    fn test_parse_fixture() {
        let map = parse_str(FIXTURE).unwrap();
        assert_eq!(map.title, "Test Song");
        assert_eq!(map.version, "Insane");
        assert_eq!(map.difficulty.approach_rate, 9.0);
        assert_eq!(map.breaks.len(), 1);
        assert_eq!(map.timing_points.len(), 2);
        assert_eq!(map.hit_objects.len(), 4);

        match &map.hit_objects[1] {
            HitObject::Slider {
                slides,
                length,
                hit_sound,
                ..
            } => {
                assert_eq!(*slides, 2);
                assert_eq!(*length, 140.0);
                assert!(hit_sound.has_clap());
            }
            other => panic!("expected slider, got {other:?}"),
        }
        match &map.hit_objects[3] {
            HitObject::Hold { end_time, .. } => assert_eq!(*end_time, 4800),
            other => panic!("expected hold, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_timing_point_inherited() {
        let map = parse_str(FIXTURE).unwrap();
        assert!(map.timing_points[0].uninherited);
        assert!(!map.timing_points[1].uninherited);
        assert!(map.timing_points[1].kiai);
        assert_eq!(map.beat_length(), 400.0);
    }

    #[test]
    fn test_parse_rejects_chart_without_hit_objects() {
        let err = parse_str("[General]\nMode: 0\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingHitObjects));
    }

    #[test]
    fn test_parse_rejects_malformed_object() {
        let err = parse_str("[HitObjects]\n64,192,notanumber,1,0\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_parse_skips_unknown_sections() {
        let content = "[Colours]\nCombo1 : 255,0,0\n[HitObjects]\n64,192,0,1,0\n";
        let map = parse_str(content).unwrap();
        assert_eq!(map.hit_objects.len(), 1);
    }
}
