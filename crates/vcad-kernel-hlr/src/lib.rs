#![warn(missing_docs)]

//! Hidden-line removal for the vcad drafting kernel.
//!
//! A [`HiddenLineRemoval`] kernel takes a shape and an orthographic
//! [`Projector`] and returns, for every edge that projects to more than a
//! point, the parameter intervals that are visible and hidden from the
//! viewer. Curved faces also yield silhouette outlines that have no
//! topological edge of their own.
//!
//! [`HlrAlgo`] is the built-in kernel. Anything else implementing the trait
//! can be plugged into the drafting pipeline in its place.

pub mod algo;
pub mod data;
pub mod error;
pub mod occlusion;
pub mod projector;

pub use algo::HlrAlgo;
pub use data::{HlrData, HlrEdge, HlrFace, Interval, Visibility};
pub use error::HlrError;
pub use occlusion::OcclusionMap;
pub use projector::Projector;

use vcad_kernel_brep::Shape;

/// A hidden-line-removal kernel.
///
/// Implementations must be stateless between calls so one instance can
/// serve several views concurrently.
pub trait HiddenLineRemoval: Send + Sync {
    /// Compute visibility of every edge of `shape` as seen through `projector`.
    fn compute(&self, shape: &Shape, projector: &Projector) -> Result<HlrData, HlrError>;
}
