//! Post-processing passes over a converted chart.
//!
//! These run after pattern generation and never touch column assignment:
//! one turns long empty spans into explicit break sections, the other
//! collapses leftover quarter-beat holds into taps.

use lanefall_chart::{Beatmap, BreakPeriod, HitObject};

/// Gap between an object and an inserted break boundary.
const BREAK_MARGIN_MS: i32 = 200;

/// Inserts a break section into every object gap of at least
/// `window_beats` beats.
///
/// Only gaps between consecutive objects are considered; a break never
/// overlaps an object. Existing breaks covering a gap are kept as they are.
pub fn insert_breaks(map: &mut Beatmap, window_beats: i32) {
    let window_ms = (window_beats as f64 * map.beat_length()) as i32;

    let mut new_breaks = Vec::new();
    for pair in map.hit_objects.windows(2) {
        let current_end = object_end_time(&pair[0]);
        let next_start = pair[1].time();
        let gap = next_start - current_end;
        if gap < window_ms {
            continue;
        }

        let start = current_end + BREAK_MARGIN_MS;
        let end = next_start - BREAK_MARGIN_MS;
        let covered = map
            .breaks
            .iter()
            .any(|b| b.start <= start && b.end >= end);
        if !covered {
            new_breaks.push(BreakPeriod { start, end });
        }
    }

    map.breaks.extend(new_breaks);
    map.breaks.sort_by_key(|b| b.start);
}

/// Rewrites every hold no longer than a quarter beat as a tap.
///
/// Distinct from the 1/32-beat normalization inside generation: this is an
/// opt-in cleanup for charts where short holds are unwanted entirely.
pub fn collapse_short_holds(map: &mut Beatmap) {
    let threshold = map.beat_length() / 4.0;

    for object in &mut map.hit_objects {
        if let HitObject::Hold {
            x,
            time,
            end_time,
            hit_sound,
        } = *object
        {
            if (end_time - time) as f64 <= threshold {
                *object = HitObject::Circle {
                    x,
                    y: 192,
                    time,
                    hit_sound,
                };
            }
        }
    }
}

fn object_end_time(object: &HitObject) -> i32 {
    match object {
        HitObject::Hold { end_time, .. } | HitObject::Spinner { end_time, .. } => *end_time,
        HitObject::Circle { time, .. } | HitObject::Slider { time, .. } => *time,
    }
}
