//! The drawing geometry of one view of a shape.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use vcad_kernel_brep::Shape;
use vcad_kernel_hlr::{HiddenLineRemoval, HlrAlgo, Visibility};
use vcad_kernel_math::Vec3;

use crate::classify::classify;
use crate::edges::{extract_edges, record_references};
use crate::error::{DraftingError, Result};
use crate::hlr_adapter::HlrAdapter;
use crate::settings::DraftingSettings;
use crate::types::{BoundingBox2D, Edge2d, Face, Vertex, Wire};
use crate::vertices::extract_vertices;
use crate::wire::WireBuilder;

/// Projected edges, vertices, and faces of one view.
///
/// Every geometry vector has a parallel reference vector of the same length
/// holding 1-based topological indices into the source shape, or
/// [`UNKNOWN_REFERENCE`](crate::UNKNOWN_REFERENCE).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryObject {
    settings: DraftingSettings,
    edge_geometry: Vec<Edge2d>,
    edge_references: Vec<i32>,
    vertex_geometry: Vec<Vertex>,
    vertex_references: Vec<i32>,
    face_geometry: Vec<Face>,
    face_references: Vec<i32>,
}

impl GeometryObject {
    /// Empty object using `settings` for every extraction.
    pub fn new(settings: DraftingSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Extraction parameters.
    pub fn settings(&self) -> &DraftingSettings {
        &self.settings
    }

    /// Drop all extracted geometry, keeping the settings.
    pub fn clear(&mut self) {
        self.edge_geometry.clear();
        self.edge_references.clear();
        self.vertex_geometry.clear();
        self.vertex_references.clear();
        self.face_geometry.clear();
        self.face_references.clear();
    }

    /// Project `shape` along `direction` with the built-in hidden-line kernel.
    ///
    /// Replaces any previous contents. On error the object is left empty.
    pub fn extract_geometry(
        &mut self,
        shape: &Shape,
        direction: Vec3,
        x_axis: Vec3,
        extract_hidden: bool,
    ) -> Result<()> {
        let kernel = HlrAlgo::with_tessellation_segments(self.settings.tessellation_segments);
        self.extract_geometry_with(&kernel, shape, direction, x_axis, extract_hidden)
    }

    /// Project `shape` using any hidden-line kernel.
    pub fn extract_geometry_with(
        &mut self,
        kernel: &dyn HiddenLineRemoval,
        shape: &Shape,
        direction: Vec3,
        x_axis: Vec3,
        extract_hidden: bool,
    ) -> Result<()> {
        self.clear();
        self.settings.validate()?;
        let adapter = HlrAdapter::new(kernel, shape, direction, x_axis, self.settings.scale)?;
        let tolerance = self.settings.tolerance;

        let references = record_references(&adapter, tolerance);
        let mut edges = extract_edges(&adapter, &references, Visibility::Visible, &self.settings);
        if extract_hidden {
            edges.extend(extract_edges(&adapter, &references, Visibility::Hidden, &self.settings));
        }
        (self.edge_geometry, self.edge_references) = edges.into_iter().unzip();

        (self.vertex_geometry, self.vertex_references) =
            extract_vertices(&adapter, tolerance).into_iter().unzip();

        if self.settings.extract_faces {
            self.extract_faces(&adapter);
        }

        debug!(
            "extracted {} edges, {} vertices, {} faces",
            self.edge_geometry.len(),
            self.vertex_geometry.len(),
            self.face_geometry.len()
        );
        Ok(())
    }

    fn extract_faces(&mut self, adapter: &HlrAdapter) {
        let builder = WireBuilder::new(self.settings.tolerance);
        let projector = &adapter.view().projector;
        for record in adapter.faces().iter().filter(|f| f.front_facing) {
            let geoms = record
                .edges
                .iter()
                .filter_map(|&e| adapter.shape().edge(e).ok())
                .map(|edge| classify(&edge.curve, edge.range, None, projector))
                .collect();
            match builder.build_closed_wires(geoms) {
                Ok(mut wires) => {
                    wires.sort_by(|a: &Wire, b: &Wire| b.area().total_cmp(&a.area()));
                    self.face_geometry.push(Face { wires });
                    self.face_references.push(record.index as i32);
                }
                Err(err) => warn!("skipping face {}: {err}", record.index),
            }
        }
    }

    /// All edge geometry, visible first.
    pub fn edge_geometry(&self) -> &[Edge2d] {
        &self.edge_geometry
    }

    /// Topological edge index per edge geometry.
    pub fn edge_references(&self) -> &[i32] {
        &self.edge_references
    }

    /// Visible vertices.
    pub fn vertex_geometry(&self) -> &[Vertex] {
        &self.vertex_geometry
    }

    /// Topological vertex index per vertex.
    pub fn vertex_references(&self) -> &[i32] {
        &self.vertex_references
    }

    /// Faces for shading, outer wire first.
    pub fn face_geometry(&self) -> &[Face] {
        &self.face_geometry
    }

    /// Topological face index per face.
    pub fn face_references(&self) -> &[i32] {
        &self.face_references
    }

    /// Edge geometry at position `index`.
    pub fn edge(&self, index: usize) -> Result<&Edge2d> {
        self.edge_geometry.get(index).ok_or(DraftingError::IndexOutOfRange {
            kind: "edge",
            index,
            len: self.edge_geometry.len(),
        })
    }

    /// Vertex at position `index`.
    pub fn vertex(&self, index: usize) -> Result<&Vertex> {
        self.vertex_geometry.get(index).ok_or(DraftingError::IndexOutOfRange {
            kind: "vertex",
            index,
            len: self.vertex_geometry.len(),
        })
    }

    /// Face at position `index`.
    pub fn face(&self, index: usize) -> Result<&Face> {
        self.face_geometry.get(index).ok_or(DraftingError::IndexOutOfRange {
            kind: "face",
            index,
            len: self.face_geometry.len(),
        })
    }

    /// Edges drawn solid.
    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge2d> {
        self.edge_geometry.iter().filter(|e| !e.is_hidden())
    }

    /// Edges drawn dashed.
    pub fn hidden_edges(&self) -> impl Iterator<Item = &Edge2d> {
        self.edge_geometry.iter().filter(|e| e.is_hidden())
    }

    /// First edge geometry extracted from topological edge `reference`.
    pub fn edge_geometry_by_reference(&self, reference: i32) -> Option<&Edge2d> {
        self.edge_references
            .iter()
            .position(|&r| r == reference)
            .map(|i| &self.edge_geometry[i])
    }

    /// Extent of all vertices and edge geometry.
    pub fn bounding_box(&self) -> BoundingBox2D {
        let mut bbox = BoundingBox2D::empty();
        for v in &self.vertex_geometry {
            bbox.include_point(v.point);
        }
        for e in &self.edge_geometry {
            e.geom().extents(&mut bbox);
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeomKind, Point2D};
    use vcad_kernel_brep::make_box;

    #[test]
    fn test_accessor_out_of_range() {
        let obj = GeometryObject::default();
        assert!(matches!(
            obj.edge(0),
            Err(DraftingError::IndexOutOfRange { kind: "edge", index: 0, len: 0 })
        ));
        assert!(obj.vertex(3).is_err());
        assert!(obj.face(1).is_err());
    }

    #[test]
    fn test_box_top_view() {
        let mut obj = GeometryObject::new(DraftingSettings::default());
        let b = make_box(1.0, 1.0, 1.0).unwrap();
        obj.extract_geometry(&b, Vec3::z(), Vec3::x(), false).unwrap();

        assert_eq!(obj.edge_geometry().len(), 4);
        assert_eq!(obj.hidden_edges().count(), 0);
        assert_eq!(obj.vertex_geometry().len(), 4);
        assert_eq!(obj.face_references(), &[2]);
        let face = obj.face(0).unwrap();
        assert_eq!(face.wires.len(), 1);
        assert!(face.wires[0].geoms.iter().all(|g| g.kind() == GeomKind::Generic));
        assert!((face.wires[0].area() - 1.0).abs() < 1e-9);

        let bbox = obj.bounding_box();
        assert!((bbox.width() - 1.0).abs() < 1e-9);
        assert!(bbox.center().distance(&Point2D::ORIGIN) < 1e-9);
        assert!(obj.edge_geometry_by_reference(5).is_some());
        assert!(obj.edge_geometry_by_reference(1).is_none());
    }

    #[test]
    fn test_faces_can_be_disabled() {
        let settings = DraftingSettings {
            extract_faces: false,
            ..Default::default()
        };
        let mut obj = GeometryObject::new(settings);
        let b = make_box(1.0, 1.0, 1.0).unwrap();
        obj.extract_geometry(&b, Vec3::z(), Vec3::x(), true).unwrap();
        assert!(obj.face_geometry().is_empty());
        assert_eq!(obj.hidden_edges().count(), 4);
    }

    #[test]
    fn test_failure_leaves_object_cleared() {
        let mut obj = GeometryObject::default();
        let b = make_box(1.0, 1.0, 1.0).unwrap();
        obj.extract_geometry(&b, Vec3::z(), Vec3::x(), false).unwrap();
        assert!(!obj.edge_geometry().is_empty());

        let err = obj.extract_geometry(&Shape::new(), Vec3::z(), Vec3::x(), false).unwrap_err();
        assert!(matches!(err, DraftingError::ProjectionFailure(_)));
        assert!(obj.edge_geometry().is_empty());
        assert!(obj.vertex_references().is_empty());
        assert!(obj.face_geometry().is_empty());
    }
}
