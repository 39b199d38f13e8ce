//! Column-selection primitives shared by both pattern generators.

use lanefall_chart::Beatmap;

use crate::pattern::Pattern;
use crate::rng::ConvertRng;

/// How [`Selector::find_available_column`] advances from a rejected
/// candidate to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextColumn {
    /// Fresh uniform draw within the search bounds.
    Random,
    /// Increment, wrapping from the top column back to the first usable one.
    Gathered,
}

/// Extra acceptance predicate applied on top of the occupancy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValidator {
    Any,
    /// Reject one specific column (used to avoid a hold's column, or to
    /// force consecutive notes apart).
    NotColumn(usize),
}

impl ColumnValidator {
    fn accepts(self, column: usize) -> bool {
        match self {
            ColumnValidator::Any => true,
            ColumnValidator::NotColumn(banned) => column != banned,
        }
    }
}

/// Shared per-run column context: the lane count, the first usable lane,
/// and the cached conversion difficulty.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    columns: usize,
    random_start: usize,
    conversion_difficulty: f64,
}

impl Selector {
    pub fn new(columns: usize, chart: &Beatmap) -> Selector {
        Selector {
            columns,
            random_start: random_start(columns),
            conversion_difficulty: conversion_difficulty(chart),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// First lane random placement may use. Lane 0 is reserved as the
    /// special lane in 8-column layouts.
    pub fn random_start(&self) -> usize {
        self.random_start
    }

    pub fn conversion_difficulty(&self) -> f64 {
        self.conversion_difficulty
    }

    /// Uniform column draw in `[random_start, columns - 1]`.
    pub fn random_column(&self, rng: &mut ConvertRng) -> usize {
        self.random_column_in(rng, self.random_start, self.columns - 1)
    }

    /// Uniform column draw in `[low, high]`.
    pub fn random_column_in(&self, rng: &mut ConvertRng, low: usize, high: usize) -> usize {
        rng.gen_inclusive(low as i32, high as i32) as usize
    }

    /// Finds a column that passes `validator` and is unoccupied in every
    /// pattern of `occupied`, preferring `initial`.
    ///
    /// The search space is `[low, high]` (defaulting to all usable lanes).
    /// Panics if no column in bounds is valid: the generators are built so
    /// that at least one free column always exists, and returning a
    /// sentinel here would silently corrupt the output chart.
    #[allow(clippy::too_many_arguments)]
    pub fn find_available_column(
        &self,
        rng: &mut ConvertRng,
        initial: usize,
        low: Option<usize>,
        high: Option<usize>,
        next: NextColumn,
        validator: ColumnValidator,
        occupied: &[&Pattern],
    ) -> usize {
        let low = low.unwrap_or(self.random_start);
        let high = high.unwrap_or(self.columns - 1);
        debug_assert!(low <= high && high < self.columns);

        let is_valid = |column: usize| {
            validator.accepts(column) && !occupied.iter().any(|p| p.column_has_note(column))
        };

        if is_valid(initial) {
            return initial;
        }

        // Confirm a valid column exists before iterating, otherwise the
        // candidate loop below would never terminate.
        if !(low..=high).any(is_valid) {
            panic!("no available column in [{low}, {high}] with {} columns", self.columns);
        }

        let mut candidate = initial;
        loop {
            candidate = match next {
                NextColumn::Gathered => {
                    let bumped = candidate + 1;
                    if bumped == self.columns {
                        self.random_start
                    } else {
                        bumped
                    }
                }
                NextColumn::Random => self.random_column_in(rng, low, high),
            };
            if is_valid(candidate) {
                return candidate;
            }
        }
    }
}

/// First usable lane for a column count.
pub fn random_start(columns: usize) -> usize {
    usize::from(columns == 8)
}

/// Samples a note count from cumulative tail probabilities: one uniform
/// draw `u`, returning the largest `k` with `u >= 1 - p_k`, else 1.
pub fn random_note_count(
    rng: &mut ConvertRng,
    p2: f64,
    p3: f64,
    p4: f64,
    p5: f64,
    p6: f64,
) -> usize {
    debug_assert!((0.0..=1.0).contains(&p2));
    debug_assert!((0.0..=1.0).contains(&p3));
    debug_assert!((0.0..=1.0).contains(&p4));
    debug_assert!((0.0..=1.0).contains(&p5));
    debug_assert!((0.0..=1.0).contains(&p6));

    let val = rng.gen_f64();
    if val >= 1.0 - p6 {
        6
    } else if val >= 1.0 - p5 {
        5
    } else if val >= 1.0 - p4 {
        4
    } else if val >= 1.0 - p3 {
        3
    } else if val >= 1.0 - p2 {
        2
    } else {
        1
    }
}

/// Bounded difficulty scalar used to tier the probability tables.
///
/// Derived from drain rate, (clamped) approach rate, and the object rate
/// over drain time; clamped to at most 12. Charts whose drain time rounds
/// to zero seconds use 10 seconds so the rate term stays finite.
pub fn conversion_difficulty(chart: &Beatmap) -> f64 {
    let mut drain_secs = (chart.drain_time_ms() / 1000) as f64;
    if drain_secs == 0.0 {
        drain_secs = 10.0;
    }

    let difficulty = &chart.difficulty;
    let value = ((difficulty.hp_drain_rate + difficulty.approach_rate.clamp(4.0, 7.0)) / 1.5
        + chart.object_count() as f64 / drain_secs * 9.0)
        / 38.0
        * 5.0
        / 1.15;
    value.min(12.0)
}
