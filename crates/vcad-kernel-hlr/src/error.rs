//! Error types for hidden-line removal.

use thiserror::Error;

/// Errors raised by a [`HiddenLineRemoval`](crate::HiddenLineRemoval) kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlrError {
    /// The shape has no edges to project.
    #[error("shape has no edges")]
    EmptyShape,

    /// The shape contains geometry that cannot be projected.
    #[error("degenerate shape: {0}")]
    DegenerateShape(String),

    /// The projector axes are not an orthonormal frame.
    #[error("invalid projector: {0}")]
    InvalidProjector(String),
}
