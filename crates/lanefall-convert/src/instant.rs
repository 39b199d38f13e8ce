//! Pattern generation for instantaneous (tap) source events.

use lanefall_chart::{column_from_x, timing, Beatmap, HitSound};

use crate::pattern::{ConvertType, Note, Pattern, StairDirection};
use crate::rng::ConvertRng;
use crate::selector::{random_note_count, ColumnValidator, NextColumn, Selector};

/// Converts one zero-duration event into a pattern, steered by the gap to
/// the previous event, the rolling density, and the previous pattern.
pub struct InstantGenerator {
    selector: Selector,
    previous: Pattern,
    convert_type: ConvertType,
    stair: StairDirection,
    time: i32,
    natural_column: usize,
    hit_sound: HitSound,
}

impl InstantGenerator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        selector: Selector,
        chart: &Beatmap,
        time: i32,
        position: (i32, i32),
        hit_sound: HitSound,
        previous: Pattern,
        previous_time: i32,
        previous_position: (i32, i32),
        density: f64,
        last_stair: StairDirection,
    ) -> InstantGenerator {
        let beat_length = chart
            .timing_point_at(time)
            .map(|p| p.beat_length)
            .unwrap_or(500.0);
        let kiai = timing::kiai_at(&chart.timing_points, time);

        let dx = (position.0 - previous_position.0) as f64;
        let dy = (position.1 - previous_position.1) as f64;
        let position_separation = (dx * dx + dy * dy).sqrt();
        let time_separation = time - previous_time;

        let mut ty = ConvertType::default();
        if time_separation <= 80 {
            ty.force_not_stack = true;
            ty.keep_single = true;
        } else if time_separation <= 95 {
            ty.force_not_stack = true;
            ty.keep_single = true;
            ty = ty.with_stair(last_stair);
        } else if time_separation <= 105 {
            ty.force_not_stack = true;
            ty.low_probability = true;
        } else if time_separation <= 125 {
            ty.force_not_stack = true;
        } else if time_separation <= 135 && position_separation < 20.0 {
            ty.cycle = true;
            ty.keep_single = true;
        } else if time_separation <= 150 && position_separation < 20.0 {
            ty.force_stack = true;
            ty.low_probability = true;
        } else if position_separation < 20.0 && density >= beat_length / 2.5 {
            ty.reverse = true;
            ty.low_probability = true;
        } else if density < beat_length / 2.5 || kiai {
            // High density: no extra flags, full probability tables.
        } else {
            ty.low_probability = true;
        }

        if !ty.keep_single {
            if hit_sound.has_finish() && selector.columns() != 8 {
                ty.mirror = true;
            } else if hit_sound.has_clap() {
                ty.gathered = true;
            }
        }

        InstantGenerator {
            selector,
            natural_column: column_from_x(position.0, selector.columns()),
            previous,
            convert_type: ty,
            stair: last_stair,
            time,
            hit_sound,
        }
    }

    /// Runs the branch ladder and returns the generated pattern plus the
    /// stair direction to carry into the next instant event.
    pub fn generate(mut self, rng: &mut ConvertRng) -> (Pattern, StairDirection) {
        let pattern = self.generate_core(rng);

        // Flip the staircase when it reached either edge.
        for note in pattern.notes() {
            if self.convert_type.stair && note.column == self.selector.columns() - 1 {
                self.stair = StairDirection::Descending;
            }
            if self.convert_type.reverse_stair && note.column == self.selector.random_start() {
                self.stair = StairDirection::Ascending;
            }
        }

        (pattern, self.stair)
    }

    fn generate_core(&self, rng: &mut ConvertRng) -> Pattern {
        let columns = self.selector.columns();
        let random_start = self.selector.random_start();
        let mut pattern = Pattern::new(columns);

        if columns == 1 {
            pattern.push(Note::tap(0, self.time));
            return pattern;
        }

        let last_column = self.previous.first_column().unwrap_or(0);

        if self.convert_type.reverse && !self.previous.is_empty() {
            for i in random_start..columns {
                if self.previous.column_has_note(i) {
                    pattern.push(Note::tap(random_start + columns - i - 1, self.time));
                }
            }
            return pattern;
        }

        if self.convert_type.cycle
            && self.previous.len() == 1
            && (columns != 8 || last_column != 0)
            && (columns % 2 == 0 || last_column != columns / 2)
        {
            pattern.push(Note::tap(columns - 1, self.time));
            return pattern;
        }

        if self.convert_type.force_stack && !self.previous.is_empty() {
            for i in random_start..columns {
                if self.previous.column_has_note(i) {
                    pattern.push(Note::tap(i, self.time));
                }
            }
            return pattern;
        }

        if self.previous.len() == 1 {
            if self.convert_type.stair {
                // Place on the next column, wrapping back to the start.
                let mut target = last_column + 1;
                if target == columns {
                    target = random_start;
                }
                pattern.push(Note::tap(target, self.time));
                return pattern;
            }

            if self.convert_type.reverse_stair {
                // Place on the previous column, wrapping back to the end.
                // The previous note can sit below the first usable lane
                // (special-lane placements land on lane 0 in 8-column
                // layouts), so anything under it wraps too.
                let mut target = last_column as i32 - 1;
                if target < random_start as i32 {
                    target = columns as i32 - 1;
                }
                pattern.push(Note::tap(target as usize, self.time));
                return pattern;
            }
        }

        if self.convert_type.keep_single {
            return self.generate_random_notes(rng, 1);
        }

        let difficulty = self.selector.conversion_difficulty();
        if self.convert_type.mirror {
            if difficulty > 6.5 {
                return self.generate_mirrored(rng, 0.12, 0.38, 0.12);
            }
            if difficulty > 4.0 {
                return self.generate_mirrored(rng, 0.12, 0.17, 0.0);
            }
            return self.generate_mirrored(rng, 0.12, 0.0, 0.0);
        }

        if difficulty > 6.5 {
            if self.convert_type.low_probability {
                return self.generate_random_pattern(rng, 0.78, 0.42, 0.0, 0.0);
            }
            return self.generate_random_pattern(rng, 1.0, 0.62, 0.0, 0.0);
        }

        if difficulty > 4.0 {
            if self.convert_type.low_probability {
                return self.generate_random_pattern(rng, 0.35, 0.08, 0.0, 0.0);
            }
            return self.generate_random_pattern(rng, 0.52, 0.15, 0.0, 0.0);
        }

        if difficulty > 2.0 {
            if self.convert_type.low_probability {
                return self.generate_random_pattern(rng, 0.18, 0.0, 0.0, 0.0);
            }
            return self.generate_random_pattern(rng, 0.45, 0.0, 0.0, 0.0);
        }

        self.generate_random_pattern(rng, 0.0, 0.0, 0.0, 0.0)
    }

    /// True when this event may place a note in the special column.
    fn has_special_column(&self) -> bool {
        self.hit_sound.has_clap() && self.hit_sound.has_finish()
    }

    fn generate_random_notes(&self, rng: &mut ConvertRng, note_count: usize) -> Pattern {
        let columns = self.selector.columns();
        let mut pattern = Pattern::new(columns);
        let allow_stacking = !self.convert_type.force_not_stack;

        let mut note_count = note_count as i32;
        if !allow_stacking {
            let free = columns as i32
                - self.selector.random_start() as i32
                - self.previous.occupied_column_count() as i32;
            note_count = note_count.min(free);
        }

        let next = if self.convert_type.gathered {
            NextColumn::Gathered
        } else {
            NextColumn::Random
        };

        let mut next_column = self.natural_column;
        for _ in 0..note_count {
            next_column = if allow_stacking {
                self.selector.find_available_column(
                    rng,
                    next_column,
                    None,
                    None,
                    next,
                    ColumnValidator::Any,
                    &[&pattern],
                )
            } else {
                self.selector.find_available_column(
                    rng,
                    next_column,
                    None,
                    None,
                    next,
                    ColumnValidator::Any,
                    &[&pattern, &self.previous],
                )
            };
            pattern.push(Note::tap(next_column, self.time));
        }

        pattern
    }

    fn random_note_count_capped(
        &self,
        rng: &mut ConvertRng,
        mut p2: f64,
        mut p3: f64,
        mut p4: f64,
        mut p5: f64,
    ) -> usize {
        match self.selector.columns() {
            2 => {
                p2 = 0.0;
                p3 = 0.0;
                p4 = 0.0;
                p5 = 0.0;
            }
            3 => {
                p2 = p2.min(0.1);
                p3 = 0.0;
                p4 = 0.0;
                p5 = 0.0;
            }
            4 => {
                p2 = p2.min(0.23);
                p3 = p3.min(0.04);
                p4 = 0.0;
                p5 = 0.0;
            }
            5 => {
                p3 = p3.min(0.15);
                p4 = p4.min(0.03);
                p5 = 0.0;
            }
            _ => {}
        }

        if self.hit_sound.has_clap() {
            p2 = 1.0;
        }

        random_note_count(rng, p2, p3, p4, p5, 0.0)
    }

    /// Mirrored note count plus the centre-note decision.
    ///
    /// The probability-space inversion `1 - max((1 - p) * 2, x)` for 4 and 6
    /// columns is kept exactly as the reference tables define it; the two
    /// upstream implementations disagree on its intent and this form is the
    /// documented one.
    fn random_note_count_mirrored(
        &self,
        rng: &mut ConvertRng,
        mut centre_probability: f64,
        mut p2: f64,
        mut p3: f64,
    ) -> (usize, bool) {
        let columns = self.selector.columns();
        match columns {
            2 => {
                centre_probability = 0.0;
                p2 = 0.0;
                p3 = 0.0;
            }
            3 => {
                centre_probability = centre_probability.min(0.03);
                p2 = 0.0;
                p3 = 0.0;
            }
            4 => {
                centre_probability = 0.0;
                p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.8);
                p3 = 0.0;
            }
            5 => {
                centre_probability = centre_probability.min(0.03);
                p3 = 0.0;
            }
            6 => {
                centre_probability = 0.0;
                p2 = 1.0 - ((1.0 - p2) * 2.0).max(0.5);
                p3 = 1.0 - ((1.0 - p3) * 2.0).max(0.85);
            }
            _ => {}
        }

        // The inverted values can drop below zero (a "less than 0%"
        // probability in the original tables); clamp before sampling.
        p2 = p2.clamp(0.0, 1.0);
        p3 = p3.clamp(0.0, 1.0);

        let centre_val = rng.gen_f64();
        let note_count = random_note_count(rng, p2, p3, 0.0, 0.0, 0.0);

        let add_to_centre =
            columns % 2 != 0 && note_count != 3 && centre_val > 1.0 - centre_probability;
        (note_count, add_to_centre)
    }

    fn generate_mirrored(
        &self,
        rng: &mut ConvertRng,
        centre_probability: f64,
        p2: f64,
        p3: f64,
    ) -> Pattern {
        if self.convert_type.force_not_stack {
            return self.generate_random_pattern(rng, 0.5 + p2 / 2.0, p2, (p2 + p3) / 2.0, p3);
        }

        let columns = self.selector.columns();
        let random_start = self.selector.random_start();
        let mut pattern = Pattern::new(columns);

        let (note_count, add_to_centre) =
            self.random_note_count_mirrored(rng, centre_probability, p2, p3);

        // Candidates stay strictly below the centre so a note and its
        // mirror always differ.
        let column_limit = (if columns % 2 == 0 { columns } else { columns - 1 }) / 2;
        let high = column_limit.saturating_sub(1).max(random_start);
        let mut next_column = self.selector.random_column_in(rng, random_start, high);

        for _ in 0..note_count {
            next_column = self.selector.find_available_column(
                rng,
                next_column,
                None,
                Some(high),
                NextColumn::Random,
                ColumnValidator::Any,
                &[&pattern],
            );

            let mirror = random_start + columns - next_column - 1;
            debug_assert_ne!(next_column, mirror);
            pattern.push(Note::tap(next_column, self.time));
            pattern.push(Note::tap(mirror, self.time));
        }

        if add_to_centre {
            pattern.push(Note::tap(columns / 2, self.time));
        }

        if random_start > 0 && self.has_special_column() {
            pattern.push(Note::tap(0, self.time));
        }

        pattern
    }

    fn generate_random_pattern(
        &self,
        rng: &mut ConvertRng,
        p2: f64,
        p3: f64,
        p4: f64,
        p5: f64,
    ) -> Pattern {
        let note_count = self.random_note_count_capped(rng, p2, p3, p4, p5);
        let mut pattern = self.generate_random_notes(rng, note_count);

        if self.selector.random_start() > 0 && self.has_special_column() {
            pattern.push(Note::tap(0, self.time));
        }

        pattern
    }
}
