//! Conversion error taxonomy.
//!
//! Configuration and upstream-data problems surface as [`ConvertError`];
//! internal invariant violations (a column search with no valid column) are
//! panics rather than variants, since they indicate a logic defect and must
//! not be silently absorbed into a chart.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Requested lane count outside the supported 1..=9 range.
    #[error("invalid lane count {got}: expected 1 to 9")]
    InvalidLaneCount { got: usize },

    /// A source event the algorithm cannot interpret, e.g. a sustained
    /// event with no spans. The converter assumes well-formed input and
    /// propagates these rather than guessing.
    #[error("malformed source event at {time}ms: {message}")]
    MalformedEvent { time: i32, message: String },
}
