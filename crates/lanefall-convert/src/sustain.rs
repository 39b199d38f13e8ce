//! Pattern generation for sustained (hold/curve) source events.

use lanefall_chart::{column_from_x, Beatmap, HitSound};

use crate::error::ConvertError;
use crate::pattern::{ConvertType, Note, Pattern};
use crate::rng::ConvertRng;
use crate::selector::{random_note_count, ColumnValidator, NextColumn, Selector};

/// Converts one sustained event (span count, segment duration) into a
/// pattern of holds and/or taps.
#[derive(Debug)]
pub struct DurationGenerator {
    selector: Selector,
    previous: Pattern,
    convert_type: ConvertType,
    start_time: i32,
    pub end_time: i32,
    pub span_count: i32,
    pub segment_duration: i32,
    natural_column: usize,
    hit_sound: HitSound,
    beat_length: f64,
}

impl DurationGenerator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        selector: Selector,
        chart: &Beatmap,
        time: i32,
        x: i32,
        hit_sound: HitSound,
        span_count: i32,
        curve_length: f64,
        previous: Pattern,
    ) -> Result<DurationGenerator, ConvertError> {
        if span_count < 1 {
            return Err(ConvertError::MalformedEvent {
                time,
                message: format!("sustained event with span count {span_count}"),
            });
        }

        let beat_length = chart.beat_length();
        let end_time = end_time(chart, time, span_count, curve_length);
        let segment_duration = (end_time - time) / span_count;

        Ok(DurationGenerator {
            natural_column: column_from_x(x, selector.columns()),
            selector,
            previous,
            // Sustained events start from the low-probability tables; the
            // short-segment branches below may force not-stacking on top.
            convert_type: ConvertType {
                low_probability: true,
                ..ConvertType::default()
            },
            start_time: time,
            end_time,
            span_count,
            segment_duration,
            hit_sound,
            beat_length,
        })
    }

    pub fn generate(mut self, rng: &mut ConvertRng) -> Pattern {
        let columns = self.selector.columns();

        if columns == 1 {
            let mut pattern = Pattern::new(1);
            pattern.push(Note::hold(0, self.start_time, self.end_time, self.beat_length));
            return pattern;
        }

        let difficulty = self.selector.conversion_difficulty();

        if self.span_count > 1 {
            if self.segment_duration <= 90 {
                return self.generate_random_hold_notes(rng, self.start_time, 1);
            }

            if self.segment_duration <= 120 {
                self.convert_type.force_not_stack = true;
                return self.generate_random_notes(rng, self.start_time, self.span_count + 1);
            }

            if self.segment_duration <= 160 {
                return self.generate_stair(rng, self.start_time);
            }

            if self.segment_duration <= 200 && difficulty > 3.0 {
                return self.generate_random_multiple_notes(rng, self.start_time);
            }

            let duration = self.end_time - self.start_time;
            if duration >= 4000 {
                return self.generate_n_random_notes(rng, self.start_time, 0.23, 0.0, 0.0);
            }

            if self.segment_duration > 400
                && (self.span_count as usize)
                    < columns - 1 - self.selector.random_start()
            {
                return self.generate_tiled_hold_notes(rng, self.start_time);
            }

            return self.generate_hold_and_normal_notes(rng, self.start_time);
        }

        if self.segment_duration <= 110 {
            self.convert_type.force_not_stack =
                self.previous.occupied_column_count() < columns;
            let count = if self.segment_duration < 80 { 1 } else { 2 };
            return self.generate_random_notes(rng, self.start_time, count);
        }

        if difficulty > 6.5 {
            if self.convert_type.low_probability {
                return self.generate_n_random_notes(rng, self.start_time, 0.78, 0.3, 0.0);
            }
            return self.generate_n_random_notes(rng, self.start_time, 0.85, 0.36, 0.03);
        }

        if difficulty > 4.0 {
            if self.convert_type.low_probability {
                return self.generate_n_random_notes(rng, self.start_time, 0.43, 0.08, 0.0);
            }
            return self.generate_n_random_notes(rng, self.start_time, 0.56, 0.18, 0.0);
        }

        if difficulty > 2.5 {
            if self.convert_type.low_probability {
                return self.generate_n_random_notes(rng, self.start_time, 0.3, 0.0, 0.0);
            }
            return self.generate_n_random_notes(rng, self.start_time, 0.37, 0.08, 0.0);
        }

        if self.convert_type.low_probability {
            return self.generate_n_random_notes(rng, self.start_time, 0.17, 0.0, 0.0);
        }
        self.generate_n_random_notes(rng, self.start_time, 0.27, 0.0, 0.0)
    }

    fn hold(&self, column: usize, start: i32, end: i32) -> Note {
        Note::hold(column, start, end, self.beat_length)
    }

    /// Up to `note_count` holds spanning the whole event, stacked into
    /// distinct free columns first.
    fn generate_random_hold_notes(
        &self,
        rng: &mut ConvertRng,
        start_time: i32,
        note_count: i32,
    ) -> Pattern {
        let columns = self.selector.columns();
        let mut pattern = Pattern::new(columns);

        let usable = columns as i32
            - self.selector.random_start() as i32
            - self.previous.occupied_column_count() as i32;
        let mut next_column = self.selector.random_column(rng);

        for _ in 0..usable.min(note_count).max(0) {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&pattern, &self.previous],
            );
            pattern.push(self.hold(next_column, start_time, self.end_time));
        }

        // Not folded into the loop above: the overflow notes only check the
        // current pattern, and the draw order defines the output.
        for _ in 0..(note_count - usable).max(0) {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&pattern],
            );
            pattern.push(self.hold(next_column, start_time, self.end_time));
        }

        pattern
    }

    /// One tap per segment boundary, consecutive taps on distinct columns.
    fn generate_random_notes(
        &self,
        rng: &mut ConvertRng,
        mut start_time: i32,
        note_count: i32,
    ) -> Pattern {
        let columns = self.selector.columns();
        let mut pattern = Pattern::new(columns);

        let mut next_column = self.natural_column;
        if self.convert_type.force_not_stack
            && self.previous.occupied_column_count() < columns
        {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&self.previous],
            );
        }

        let mut last_column = next_column;
        for _ in 0..note_count {
            pattern.push(Note::tap(next_column, start_time));
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::NotColumn(last_column),
                &[],
            );
            last_column = next_column;
            start_time += self.segment_duration;
        }

        pattern
    }

    /// One tap per segment, bouncing between the stage borders.
    fn generate_stair(&self, rng: &mut ConvertRng, mut start_time: i32) -> Pattern {
        let columns = self.selector.columns() as i32;
        let random_start = self.selector.random_start() as i32;
        let mut pattern = Pattern::new(self.selector.columns());

        let mut column = self.natural_column as i32;
        let mut increasing = rng.gen_f64() > 0.5;

        for _ in 0..=self.span_count {
            pattern.push(Note::tap(column as usize, start_time));
            start_time += self.segment_duration;

            // Invert at the stage borders.
            if increasing {
                if column >= columns - 1 {
                    increasing = false;
                    column -= 1;
                } else {
                    column += 1;
                }
            } else if column <= random_start {
                increasing = true;
                column += 1;
            } else {
                column -= 1;
            }
        }

        pattern
    }

    /// Pairs of taps per segment, the second offset by a random interval.
    fn generate_random_multiple_notes(&self, rng: &mut ConvertRng, mut start_time: i32) -> Pattern {
        let columns = self.selector.columns() as i32;
        let random_start = self.selector.random_start() as i32;
        let mut pattern = Pattern::new(self.selector.columns());

        let legacy = (4..=8).contains(&columns);
        let interval = rng.gen_inclusive(1, columns - i32::from(legacy));

        let mut next_column = self.natural_column as i32;
        for _ in 0..=self.span_count {
            pattern.push(Note::tap(next_column as usize, start_time));

            next_column += interval;
            if next_column >= columns - random_start {
                next_column = next_column - columns - random_start + i32::from(legacy);
            }
            next_column += random_start;

            // In 2 columns this would stack doubles on every segment.
            if columns > 2 {
                pattern.push(Note::tap(next_column as usize, start_time));
            }

            next_column = self.selector.random_column(rng) as i32;
            start_time += self.segment_duration;
        }

        pattern
    }

    /// A sampled number of full-length holds, count capped per column count.
    fn generate_n_random_notes(
        &self,
        rng: &mut ConvertRng,
        start_time: i32,
        mut p2: f64,
        mut p3: f64,
        mut p4: f64,
    ) -> Pattern {
        match self.selector.columns() {
            2 => {
                p2 = 0.0;
                p3 = 0.0;
                p4 = 0.0;
            }
            3 => {
                p2 = p2.min(0.1);
                p3 = 0.0;
                p4 = 0.0;
            }
            4 => {
                p2 = p2.min(0.3);
                p3 = p3.min(0.04);
                p4 = 0.0;
            }
            5 => {
                p2 = p2.min(0.34);
                p3 = p3.min(0.1);
                p4 = p4.min(0.03);
            }
            _ => {}
        }

        let is_double_sample = self.hit_sound.has_clap() || self.hit_sound.has_finish();
        if is_double_sample && !self.convert_type.low_probability {
            p2 = 1.0;
        }

        let count = random_note_count(rng, p2, p3, p4, 0.0, 0.0);
        self.generate_random_hold_notes(rng, start_time, count as i32)
    }

    /// One hold per span, each in a fresh column, all ending together.
    fn generate_tiled_hold_notes(&self, rng: &mut ConvertRng, mut start_time: i32) -> Pattern {
        let columns = self.selector.columns();
        let mut pattern = Pattern::new(columns);

        let column_repeat = self.span_count.min(columns as i32);

        // Integer segment rounding means this can differ from self.end_time.
        let end_time = start_time + self.segment_duration * self.span_count;

        let mut next_column = self.natural_column;
        if self.convert_type.force_not_stack
            && self.previous.occupied_column_count() < columns
        {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&self.previous],
            );
        }

        for _ in 0..column_repeat {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&pattern],
            );
            pattern.push(self.hold(next_column, start_time, end_time));
            start_time += self.segment_duration;
        }

        pattern
    }

    /// One full-length hold plus rows of extra taps in the other columns.
    fn generate_hold_and_normal_notes(&self, rng: &mut ConvertRng, mut start_time: i32) -> Pattern {
        let columns = self.selector.columns();
        let mut pattern = Pattern::new(columns);

        let mut hold_column = self.natural_column;
        if self.convert_type.force_not_stack
            && self.previous.occupied_column_count() < columns
        {
            hold_column = self.selector.find_available_column(
                rng,
                hold_column,
                None,
                None,
                NextColumn::Random,
                ColumnValidator::Any,
                &[&self.previous],
            );
        }

        pattern.push(self.hold(hold_column, start_time, self.end_time));

        let mut next_column = self.selector.random_column(rng);
        let difficulty = self.selector.conversion_difficulty();
        let note_count = if difficulty > 6.5 {
            random_note_count(rng, 0.63, 0.0, 0.0, 0.0, 0.0)
        } else if difficulty > 4.0 {
            let p2 = if columns < 6 { 0.12 } else { 0.45 };
            random_note_count(rng, p2, 0.0, 0.0, 0.0, 0.0)
        } else if difficulty > 2.5 {
            let p2 = if columns < 6 { 0.0 } else { 0.24 };
            random_note_count(rng, p2, 0.0, 0.0, 0.0, 0.0)
        } else {
            0
        };
        let note_count = note_count.min(columns - 1);

        let ignore_head = !self.hit_sound.has_accent();

        for _ in 0..=self.span_count {
            let mut row = Pattern::new(columns);
            if !(ignore_head && start_time == self.start_time) {
                for _ in 0..note_count {
                    next_column = self.selector.find_available_column(
                        rng,
                        next_column,
                        None,
                        None,
                        NextColumn::Random,
                        ColumnValidator::NotColumn(hold_column),
                        &[&row],
                    );
                    row.push(Note::tap(next_column, start_time));
                }
            }

            pattern.merge(&mut row);
            start_time += self.segment_duration;
        }

        pattern
    }
}

/// Sustained-event end time from the chart's first timing section.
///
/// A negative leading beat length is an inherited velocity percentage; it
/// scales the real beat length by `clamp(-beatLength, 10, 10000) / 100`.
fn end_time(chart: &Beatmap, start_time: i32, span_count: i32, curve_length: f64) -> i32 {
    let raw = chart
        .timing_points
        .first()
        .map(|p| p.beat_length)
        .unwrap_or(500.0);
    let beat = if raw < 0.0 {
        (-raw).clamp(10.0, 10_000.0) / 100.0 * chart.beat_length()
    } else {
        raw
    };

    let slider_multiplier = chart.difficulty.slider_multiplier;
    (start_time as f64 + curve_length * beat * span_count as f64 * 0.01 / slider_multiplier)
        .floor() as i32
}
