//! Shared fixtures for the integration tests.

use lanefall_chart::{Beatmap, HitObject, HitSound, TimingPoint};

/// A chart with one 120 BPM timing section and the given objects.
pub fn chart(objects: Vec<HitObject>) -> Beatmap {
    let mut map = Beatmap {
        title: "Fixture".to_string(),
        artist: "lanefall".to_string(),
        creator: "tests".to_string(),
        version: "Insane".to_string(),
        ..Beatmap::default()
    };
    map.timing_points.push(TimingPoint::new(0, 500.0));
    map.hit_objects = objects;
    map
}

pub fn circle(x: i32, y: i32, time: i32) -> HitObject {
    HitObject::Circle {
        x,
        y,
        time,
        hit_sound: HitSound::NORMAL,
    }
}

pub fn slider(x: i32, time: i32, slides: i32, length: f64) -> HitObject {
    HitObject::Slider {
        x,
        y: 192,
        time,
        hit_sound: HitSound::NORMAL,
        slides,
        length,
        curve: "L|300:192".to_string(),
    }
}

/// A busy chart exercising taps, sliders of several segment lengths, and a
/// spinner.
pub fn mixed_chart() -> Beatmap {
    chart(vec![
        circle(64, 100, 0),
        circle(70, 105, 60),
        circle(200, 200, 250),
        slider(128, 500, 3, 16.8),
        circle(300, 80, 900),
        slider(256, 1200, 1, 120.0),
        circle(310, 85, 2200),
        circle(420, 300, 2300),
        HitObject::Spinner {
            time: 2500,
            end_time: 3500,
            hit_sound: HitSound::NORMAL,
        },
        circle(100, 100, 3700),
        slider(400, 4000, 2, 140.0),
        circle(60, 60, 5600),
    ])
}
