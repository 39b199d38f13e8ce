//! Timing points and per-section effects.

/// One `[TimingPoints]` entry.
///
/// Only uninherited points (positive `beat_length`, `uninherited == true`)
/// define the beat; inherited points are kept for kiai lookups and
/// round-tripping.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPoint {
    /// Section start time in milliseconds.
    pub time: i32,
    /// Milliseconds per beat for uninherited points; negative slider
    /// velocity percentage for inherited points.
    pub beat_length: f64,
    pub uninherited: bool,
    /// Kiai effect bit from the effects column.
    pub kiai: bool,
}

impl TimingPoint {
    pub fn new(time: i32, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            uninherited: true,
            kiai: false,
        }
    }
}

/// Returns the timing point governing `time`: the last uninherited point
/// starting at or before it, or the first uninherited point when `time`
/// precedes them all.
pub fn timing_point_at(points: &[TimingPoint], time: i32) -> Option<&TimingPoint> {
    let mut governing = None;
    for point in points.iter().filter(|p| p.uninherited) {
        if point.time <= time {
            governing = Some(point);
        } else {
            break;
        }
    }
    governing.or_else(|| points.iter().find(|p| p.uninherited))
}

/// Kiai state at `time`, considering all points (kiai toggles on inherited
/// sections too).
pub fn kiai_at(points: &[TimingPoint], time: i32) -> bool {
    let mut kiai = false;
    for point in points {
        if point.time <= time {
            kiai = point.kiai;
        } else {
            break;
        }
    }
    kiai
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<TimingPoint> {
        vec![
            TimingPoint::new(0, 500.0),
            TimingPoint {
                time: 4000,
                beat_length: -100.0,
                uninherited: false,
                kiai: true,
            },
            TimingPoint::new(8000, 400.0),
        ]
    }

    #[test]
    fn test_timing_point_at_picks_last_uninherited() {
        let pts = points();
        assert_eq!(timing_point_at(&pts, 0).unwrap().beat_length, 500.0);
        assert_eq!(timing_point_at(&pts, 5000).unwrap().beat_length, 500.0);
        assert_eq!(timing_point_at(&pts, 9000).unwrap().beat_length, 400.0);
    }

    #[test]
    fn test_timing_point_at_before_first() {
        let pts = points();
        assert_eq!(timing_point_at(&pts, -100).unwrap().beat_length, 500.0);
    }

    #[test]
    fn test_kiai_at_follows_inherited_sections() {
        let pts = points();
        assert!(!kiai_at(&pts, 100));
        assert!(kiai_at(&pts, 5000));
        assert!(!kiai_at(&pts, 9000));
    }
}
