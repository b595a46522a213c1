#![warn(missing_docs)]

//! 2D drawing geometry from 3D B-rep shapes.
//!
//! A shape is centred, scaled, and mirrored for a view, run through a
//! hidden-line-removal kernel, and the resulting visible and hidden edge
//! intervals are turned into typed 2D geometry (polylines, circles,
//! ellipses, their arcs, and Bezier splines). Visible vertices and closed
//! face wires for shading are extracted alongside. Every piece of output
//! carries the 1-based index of the topological entity it came from, or
//! [`UNKNOWN_REFERENCE`].
//!
//! # Example
//!
//! ```ignore
//! use vcad_kernel_brep::make_box;
//! use vcad_kernel_drafting::{DraftingSettings, GeometryObject};
//! use vcad_kernel_math::Vec3;
//!
//! let shape = make_box(10.0, 20.0, 5.0)?;
//! let mut view = GeometryObject::new(DraftingSettings::default());
//! view.extract_geometry(&shape, Vec3::z(), Vec3::x(), true)?;
//!
//! for (edge, reference) in view.edge_geometry().iter().zip(view.edge_references()) {
//!     println!("{:?} from edge {reference}, hidden: {}", edge.geom().kind(), edge.is_hidden());
//! }
//! ```

pub mod classify;
pub mod edges;
pub mod error;
pub mod geometry_object;
pub mod hlr_adapter;
pub mod settings;
pub mod types;
pub mod vertices;
pub mod view;
pub mod wire;

pub use classify::classify;
pub use edges::{extract_edges, record_references};
pub use error::{DraftingError, Result};
pub use geometry_object::GeometryObject;
pub use hlr_adapter::HlrAdapter;
pub use settings::DraftingSettings;
pub use types::{
    ArcData, BaseGeom, BezierSegment, BoundingBox2D, Circle2d, Edge2d, Ellipse2d, ExtractType,
    Face, GeomKind, Point2D, Vertex, Wire, UNKNOWN_REFERENCE,
};
pub use vertices::extract_vertices;
pub use view::{find_centroid, mirror_scale_transform, ViewAxis, ViewTransformer};
pub use wire::WireBuilder;

use rayon::prelude::*;
use vcad_kernel_brep::Shape;
use vcad_kernel_math::Vec3;

/// Extract several views of one shape in parallel.
///
/// Each view is `(direction, x_axis)`; `extract_hidden` applies to all of
/// them. The first failing view aborts the whole batch.
pub fn project_views(
    shape: &Shape,
    views: &[(Vec3, Vec3)],
    settings: &DraftingSettings,
    extract_hidden: bool,
) -> Result<Vec<GeometryObject>> {
    settings.validate()?;
    views
        .par_iter()
        .map(|&(direction, x_axis)| {
            let mut object = GeometryObject::new(settings.clone());
            object.extract_geometry(shape, direction, x_axis, extract_hidden)?;
            Ok(object)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcad_kernel_brep::make_box;

    #[test]
    fn test_project_views_matches_single_views() {
        let shape = make_box(2.0, 3.0, 4.0).unwrap();
        let views = [
            (Vec3::z(), Vec3::x()),
            (-Vec3::y(), Vec3::x()),
            (Vec3::x(), Vec3::y()),
        ];
        let settings = DraftingSettings::default();
        let batch = project_views(&shape, &views, &settings, true).unwrap();
        assert_eq!(batch.len(), 3);
        for (object, &(direction, x_axis)) in batch.iter().zip(&views) {
            let mut single = GeometryObject::new(settings.clone());
            single.extract_geometry(&shape, direction, x_axis, true).unwrap();
            assert_eq!(object, &single);
        }
    }

    #[test]
    fn test_project_views_hidden_flag() {
        let shape = make_box(1.0, 1.0, 1.0).unwrap();
        let views = [(Vec3::z(), Vec3::x())];
        let settings = DraftingSettings::default();
        let plain = project_views(&shape, &views, &settings, false).unwrap();
        assert_eq!(plain[0].hidden_edges().count(), 0);
        let with_hidden = project_views(&shape, &views, &settings, true).unwrap();
        assert_eq!(with_hidden[0].hidden_edges().count(), 4);
    }

    #[test]
    fn test_project_views_propagates_errors() {
        let shape = make_box(1.0, 1.0, 1.0).unwrap();
        let views = [(Vec3::z(), Vec3::x()), (Vec3::z(), Vec3::z())];
        let err =
            project_views(&shape, &views, &DraftingSettings::default(), false).unwrap_err();
        assert!(matches!(err, DraftingError::DegenerateDirection(_)));
    }
}
