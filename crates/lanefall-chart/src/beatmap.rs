//! The beatmap aggregate and the chart-level statistics the converter reads.

use crate::hit_object::HitObject;
use crate::timing::{timing_point_at, TimingPoint};

/// Game mode field from `[General]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Standard,
    Taiko,
    Catch,
    Mania,
}

impl Mode {
    pub fn as_u8(self) -> u8 {
        match self {
            Mode::Standard => 0,
            Mode::Taiko => 1,
            Mode::Catch => 2,
            Mode::Mania => 3,
        }
    }

    pub fn from_u8(value: u8) -> Mode {
        match value {
            1 => Mode::Taiko,
            2 => Mode::Catch,
            3 => Mode::Mania,
            _ => Mode::Standard,
        }
    }
}

/// `[Difficulty]` scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub hp_drain_rate: f64,
    /// Circle size in standard; column count in mania.
    pub circle_size: f64,
    pub overall_difficulty: f64,
    pub approach_rate: f64,
    pub slider_multiplier: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            hp_drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
        }
    }
}

/// An explicit break section (`2,start,end` event line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPeriod {
    pub start: i32,
    pub end: i32,
}

/// A parsed chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Beatmap {
    pub title: String,
    pub artist: String,
    pub creator: String,
    /// Difficulty name ("Version" in the file).
    pub version: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub timing_points: Vec<TimingPoint>,
    pub breaks: Vec<BreakPeriod>,
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    pub fn object_count(&self) -> usize {
        self.hit_objects.len()
    }

    /// Milliseconds per beat of the first uninherited timing point.
    /// Charts without timing points fall back to 120 BPM.
    pub fn beat_length(&self) -> f64 {
        self.timing_points
            .iter()
            .find(|p| p.uninherited)
            .map(|p| p.beat_length)
            .unwrap_or(500.0)
    }

    /// The timing point governing `time` (first uninherited as fallback).
    pub fn timing_point_at(&self, time: i32) -> Option<&TimingPoint> {
        timing_point_at(&self.timing_points, time)
    }

    /// Time from the first to the last object. A proxy for drain time; the
    /// converter only ever divides by it.
    pub fn drain_time_ms(&self) -> i32 {
        match (self.hit_objects.first(), self.hit_objects.last()) {
            (Some(first), Some(last)) => last.time() - first.time(),
            _ => 0,
        }
    }

    /// Fraction of objects that are sliders or spinners, in `[0, 1]`.
    pub fn percent_slider_or_spinner(&self) -> f64 {
        if self.hit_objects.is_empty() {
            return 0.0;
        }
        let count = self
            .hit_objects
            .iter()
            .filter(|o| matches!(o, HitObject::Slider { .. } | HitObject::Spinner { .. }))
            .count();
        count as f64 / self.hit_objects.len() as f64
    }
}
