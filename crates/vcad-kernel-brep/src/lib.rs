#![warn(missing_docs)]

//! Boundary-representation shape model for the vcad drafting kernel.
//!
//! A small B-rep: vertices, edges, and faces held in flat
//! arrays and addressed by stable 1-based indices. It carries exactly the
//! geometry the drafting pipeline projects:
//!
//! - [`EdgeCurve`]: lines, circles, ellipses, B-splines, polylines
//! - [`FaceSurface`]: planes and finite cylinders
//! - [`tessellate_shape`]: triangles for occlusion queries
//! - [`make_box`], [`make_cylinder`], [`make_spline_wire`]: builders

pub mod bspline;
pub mod curve;
pub mod error;
pub mod primitives;
pub mod shape;
pub mod surface;
pub mod tessellate;

pub use bspline::{bezier_eval, cubic_bezier, BSplineCurve};
pub use curve::{Circle3d, CurveKind, EdgeCurve, Ellipse3d, Line3d};
pub use error::{BrepError, Result};
pub use primitives::{make_box, make_cylinder, make_spline_wire};
pub use shape::{Continuity, Edge, Face, Shape, Vertex};
pub use surface::{CylinderSurface, FaceSurface, Plane, SurfaceKind};
pub use tessellate::{tessellate_shape, Triangle};
