//! Error types for drawing geometry extraction.

use thiserror::Error;
use vcad_kernel_brep::BrepError;
use vcad_kernel_hlr::HlrError;

/// Errors that can occur while extracting drawing geometry.
#[derive(Error, Debug)]
pub enum DraftingError {
    /// The hidden-line kernel could not project the shape.
    #[error("projection failed: {0}")]
    ProjectionFailure(#[from] HlrError),

    /// A spline could not be reduced to cubic segments.
    #[error("curve approximation failed: {0}")]
    CurveApproximationFailure(#[source] BrepError),

    /// Accessor called with an index past the end of a collection.
    #[error("{kind} index {index} out of range (have {len})")]
    IndexOutOfRange {
        /// Collection name ("edge", "vertex", "face").
        kind: &'static str,
        /// The requested 0-based index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// Projected edges of a face do not close into wires.
    #[error("wire reconstruction failed: {0}")]
    WireReconstructionFailure(String),

    /// View direction and X axis do not span a plane.
    #[error("degenerate view direction: {0}")]
    DegenerateDirection(String),

    /// Invalid drafting settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed.
    #[error("failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for drafting operations.
pub type Result<T> = std::result::Result<T, DraftingError>;
