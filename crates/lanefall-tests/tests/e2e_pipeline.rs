//! Full pipeline: parse a .osu file, convert, post-process, write, reparse.

use std::fs;
use std::process::ExitCode;

use lanefall_chart::{parse_str, write_str, HitObject, Mode};
use lanefall_convert::{collapse_short_holds, convert_beatmap, insert_breaks, ConvertRng};
use lanefall_tests::{chart, circle, mixed_chart};
use pretty_assertions::assert_eq;

fn is_success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}

const SOURCE: &str = "\
osu file format v14

[General]
Mode: 0

[Metadata]
Title:Pipeline
Artist:lanefall
Creator:tests
Version:Hard

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:6
ApproachRate:8
SliderMultiplier:1.4

[TimingPoints]
0,500,4,2,0,60,1,0

[HitObjects]
64,100,0,1,0,0:0:0:0:
200,200,400,1,0,0:0:0:0:
128,192,800,2,0,L|228:192,3,16.8,0|0|0|0,0:0|0:0|0:0|0:0,0:0:0:0:
300,80,1400,1,0,0:0:0:0:
420,300,6000,1,0,0:0:0:0:
";

#[test]
fn parse_convert_write_reparse() {
    let source = parse_str(SOURCE).unwrap();
    assert_eq!(source.mode, Mode::Standard);

    let mut rng = ConvertRng::new(1234);
    let converted = convert_beatmap(&source, &mut rng).unwrap();
    assert_eq!(converted.mode, Mode::Mania);
    assert_eq!(converted.title, "Pipeline");

    let text = write_str(&converted);
    let reparsed = parse_str(&text).unwrap();
    assert_eq!(reparsed.mode, Mode::Mania);
    assert_eq!(reparsed.hit_objects, converted.hit_objects);
    assert_eq!(reparsed.difficulty.circle_size, converted.difficulty.circle_size);
}

#[test]
fn post_passes_apply_to_converted_chart() {
    let source = parse_str(SOURCE).unwrap();
    let mut rng = ConvertRng::new(7);
    let mut converted = convert_beatmap(&source, &mut rng).unwrap();

    // The 1400 -> 6000 gap is over 6 beats at 500ms: one break appears.
    insert_breaks(&mut converted, 6);
    assert_eq!(converted.breaks.len(), 1);
    let brk = converted.breaks[0];
    for object in &converted.hit_objects {
        let time = object.time();
        assert!(time <= brk.start || time >= brk.end);
    }

    collapse_short_holds(&mut converted);
    for object in &converted.hit_objects {
        if let HitObject::Hold { time, end_time, .. } = object {
            assert!((end_time - time) as f64 > 500.0 / 4.0);
        }
    }
}

#[test]
fn convert_command_writes_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("song.osu");
    fs::write(&input, SOURCE).unwrap();

    let code = lanefall_cli::commands::convert::run(
        input.to_str().unwrap(),
        None,
        Some(4),
        9,
        false,
        false,
    )
    .unwrap();
    assert!(is_success(code));

    let output = dir.path().join("songConverted.osu");
    let converted = parse_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(converted.mode, Mode::Mania);
    assert_eq!(converted.difficulty.circle_size, 4.0);
    assert_eq!(converted.version, "HardConverted");
    assert!(!converted.hit_objects.is_empty());
}

#[test]
fn convert_command_rejects_mania_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mania.osu");
    let mania = SOURCE.replace("Mode: 0", "Mode: 3");
    fs::write(&input, mania).unwrap();

    let code = lanefall_cli::commands::convert::run(
        input.to_str().unwrap(),
        None,
        None,
        0,
        false,
        false,
    )
    .unwrap();
    assert!(!is_success(code));
}

#[test]
fn batch_command_converts_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.osu"), SOURCE).unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("b.osu"), SOURCE).unwrap();
    fs::write(dir.path().join("broken.osu"), "not a chart").unwrap();

    let code = lanefall_cli::commands::batch::run(
        dir.path().to_str().unwrap(),
        Some(4),
        0,
        false,
        false,
        true,
    )
    .unwrap();
    // The broken file fails, so the batch reports failure but still
    // converts the others.
    assert!(!is_success(code));

    assert!(dir.path().join("aConverted.osu").exists());
    assert!(nested.join("bConverted.osu").exists());
    assert!(!dir.path().join("brokenConverted.osu").exists());
}

#[test]
fn converted_outputs_are_skipped_on_rescan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.osu"), SOURCE).unwrap();

    for _ in 0..2 {
        let code = lanefall_cli::commands::batch::run(
            dir.path().to_str().unwrap(),
            Some(4),
            0,
            false,
            false,
            true,
        )
        .unwrap();
        assert!(is_success(code));
    }

    // A second run must not convert the converted output again.
    assert!(dir.path().join("aConverted.osu").exists());
    assert!(!dir.path().join("aConvertedConverted.osu").exists());
}

#[test]
fn write_is_stable_for_unconverted_charts() {
    // Writer round trip for plain model data, no conversion involved.
    let map = chart(vec![circle(64, 100, 0), circle(200, 200, 500)]);
    let reparsed = parse_str(&write_str(&map)).unwrap();
    assert_eq!(reparsed.hit_objects, map.hit_objects);

    let full = mixed_chart();
    let reparsed = parse_str(&write_str(&full)).unwrap();
    assert_eq!(reparsed.hit_objects.len(), full.hit_objects.len());
}

#[test]
fn chart_seed_isolation_in_batch() {
    // Same content, different paths: files may convert differently, but
    // each path's output is stable across runs.
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    fs::write(dir_a.path().join("x.osu"), SOURCE).unwrap();
    fs::write(dir_b.path().join("x.osu"), SOURCE).unwrap();

    for dir in [&dir_a, &dir_b] {
        lanefall_cli::commands::batch::run(
            dir.path().to_str().unwrap(),
            Some(4),
            0,
            false,
            false,
            true,
        )
        .unwrap();
    }

    let first = fs::read_to_string(dir_a.path().join("xConverted.osu")).unwrap();
    fs::remove_file(dir_a.path().join("xConverted.osu")).unwrap();
    lanefall_cli::commands::batch::run(
        dir_a.path().to_str().unwrap(),
        Some(4),
        0,
        false,
        false,
        true,
    )
    .unwrap();
    let second = fs::read_to_string(dir_a.path().join("xConverted.osu")).unwrap();
    assert_eq!(first, second);
}
