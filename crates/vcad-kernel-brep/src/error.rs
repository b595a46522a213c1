//! Error types for shape construction and curve operations.

use thiserror::Error;

/// Errors raised while building or querying a [`Shape`](crate::Shape).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrepError {
    /// Knot vector does not match the control points and degree.
    #[error("invalid knot vector: len={len} but expected {expected} (n={points}, p={degree})")]
    InvalidKnots {
        /// Actual knot vector length.
        len: usize,
        /// Expected knot vector length.
        expected: usize,
        /// Number of control points.
        points: usize,
        /// Polynomial degree.
        degree: usize,
    },

    /// Non-positive or non-finite dimension passed to a builder.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A 1-based topological index does not exist in the shape.
    #[error("{kind} index {index} out of range (shape has {len})")]
    IndexOutOfRange {
        /// Entity kind ("vertex", "edge", "face").
        kind: &'static str,
        /// The requested 1-based index.
        index: usize,
        /// Number of entities of that kind.
        len: usize,
    },

    /// Spline could not be approximated by cubic segments within tolerance.
    #[error(
        "cubic approximation failed: max deviation {deviation:.3e} > {tolerance:.3e} \
         with {segments} segments"
    )]
    ApproximationFailed {
        /// Largest sampled deviation of the best attempt.
        deviation: f64,
        /// Requested tolerance.
        tolerance: f64,
        /// Segment count of the best attempt.
        segments: usize,
    },
}

/// Result type for B-rep operations.
pub type Result<T> = std::result::Result<T, BrepError>;
