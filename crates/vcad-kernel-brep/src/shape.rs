//! Shape model: vertices, edges, and faces addressed by stable 1-based indices.

use vcad_kernel_math::{Point3, Transform};

use crate::curve::EdgeCurve;
use crate::error::{BrepError, Result};
use crate::surface::FaceSurface;

/// Continuity across an edge between its adjacent faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Continuity {
    /// Faces meet at an angle (a crease). Drawn as a plain outline.
    #[default]
    Sharp,
    /// Faces are tangent-continuous across the edge.
    Smooth,
    /// Closing seam of a periodic surface (same face on both sides).
    Seam,
}

impl Continuity {
    /// Smooth and seam edges are both drawn as smooth lines.
    pub fn is_smooth(self) -> bool {
        !matches!(self, Continuity::Sharp)
    }
}

/// A topological vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position in 3D.
    pub point: Point3,
}

/// A topological edge: a curve trimmed to a parameter range.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Underlying 3D curve.
    pub curve: EdgeCurve,
    /// Trimmed parameter range `(start, end)`.
    pub range: (f64, f64),
    /// 1-based start and end vertex indices. Closed edges repeat the same index.
    pub vertices: (usize, usize),
    /// Continuity across the edge.
    pub continuity: Continuity,
}

impl Edge {
    /// Point at the start of the trimmed range.
    pub fn start_point(&self) -> Point3 {
        self.curve.evaluate(self.range.0)
    }

    /// Point at the end of the trimmed range.
    pub fn end_point(&self) -> Point3 {
        self.curve.evaluate(self.range.1)
    }

    /// Whether the edge starts and ends at the same vertex.
    pub fn is_closed(&self) -> bool {
        self.vertices.0 == self.vertices.1
    }

    /// Sample the trimmed curve.
    pub fn sample(&self, segments: usize) -> Vec<Point3> {
        self.curve.sample(self.range.0, self.range.1, segments)
    }
}

/// A topological face bounded by edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Surface geometry.
    pub surface: FaceSurface,
    /// 1-based indices of the bounding edges.
    pub edges: Vec<usize>,
}

/// A boundary-representation shape.
///
/// Entities are stored in insertion order and addressed by 1-based index,
/// so index `i` is stable for the lifetime of the shape and survives
/// [`Shape::transform`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
}

fn lookup<'a, T>(items: &'a [T], kind: &'static str, index: usize) -> Result<&'a T> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or(BrepError::IndexOutOfRange {
            kind,
            index,
            len: items.len(),
        })
}

impl Shape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the shape has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Add a vertex, returning its 1-based index.
    pub fn add_vertex(&mut self, point: Point3) -> usize {
        self.vertices.push(Vertex { point });
        self.vertices.len()
    }

    /// Add an edge between two existing vertices, returning its 1-based index.
    pub fn add_edge(
        &mut self,
        curve: EdgeCurve,
        range: (f64, f64),
        vertices: (usize, usize),
        continuity: Continuity,
    ) -> Result<usize> {
        lookup(&self.vertices, "vertex", vertices.0)?;
        lookup(&self.vertices, "vertex", vertices.1)?;
        self.edges.push(Edge {
            curve,
            range,
            vertices,
            continuity,
        });
        Ok(self.edges.len())
    }

    /// Add a face bounded by existing edges, returning its 1-based index.
    pub fn add_face(&mut self, surface: FaceSurface, edges: Vec<usize>) -> Result<usize> {
        for &e in &edges {
            lookup(&self.edges, "edge", e)?;
        }
        self.faces.push(Face { surface, edges });
        Ok(self.faces.len())
    }

    /// Vertex by 1-based index.
    pub fn vertex(&self, index: usize) -> Result<&Vertex> {
        lookup(&self.vertices, "vertex", index)
    }

    /// Edge by 1-based index.
    pub fn edge(&self, index: usize) -> Result<&Edge> {
        lookup(&self.edges, "edge", index)
    }

    /// Face by 1-based index.
    pub fn face(&self, index: usize) -> Result<&Face> {
        lookup(&self.faces, "face", index)
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Iterate `(index, vertex)` pairs with 1-based indices.
    pub fn vertices(&self) -> impl Iterator<Item = (usize, &Vertex)> {
        self.vertices.iter().enumerate().map(|(i, v)| (i + 1, v))
    }

    /// Iterate `(index, edge)` pairs with 1-based indices.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    /// Iterate `(index, face)` pairs with 1-based indices.
    pub fn faces(&self) -> impl Iterator<Item = (usize, &Face)> {
        self.faces.iter().enumerate().map(|(i, f)| (i + 1, f))
    }

    /// Faces that reference the given edge.
    pub fn edge_faces(&self, edge: usize) -> Vec<usize> {
        self.faces()
            .filter(|(_, f)| f.edges.contains(&edge))
            .map(|(i, _)| i)
            .collect()
    }

    /// A copy of the shape with every vertex, curve, and surface transformed.
    /// Indices are unchanged.
    pub fn transform(&self, t: &Transform) -> Shape {
        Shape {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    point: t.apply_point(&v.point),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| Edge {
                    curve: e.curve.transform(t),
                    range: e.range,
                    vertices: e.vertices,
                    continuity: e.continuity,
                })
                .collect(),
            faces: self
                .faces
                .iter()
                .map(|f| Face {
                    surface: f.surface.transform(t),
                    edges: f.edges.clone(),
                })
                .collect(),
        }
    }

    /// Vertex positions plus `segments` samples along every edge.
    pub fn sample_points(&self, segments: usize) -> Vec<Point3> {
        let mut pts: Vec<Point3> = self.vertices.iter().map(|v| v.point).collect();
        for e in &self.edges {
            pts.extend(e.sample(segments));
        }
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Line3d;

    fn segment() -> Shape {
        let mut s = Shape::new();
        let a = s.add_vertex(Point3::origin());
        let b = s.add_vertex(Point3::new(1.0, 0.0, 0.0));
        s.add_edge(
            EdgeCurve::Line(Line3d::from_points(Point3::origin(), Point3::new(1.0, 0.0, 0.0))),
            (0.0, 1.0),
            (a, b),
            Continuity::Sharp,
        )
        .unwrap();
        s
    }

    #[test]
    fn test_indices_are_one_based() {
        let s = segment();
        assert_eq!(s.num_edges(), 1);
        assert!(s.edge(1).is_ok());
        assert_eq!(
            s.edge(0).unwrap_err(),
            BrepError::IndexOutOfRange {
                kind: "edge",
                index: 0,
                len: 1
            }
        );
        assert!(s.vertex(3).is_err());
    }

    #[test]
    fn test_add_edge_validates_vertices() {
        let mut s = segment();
        let curve = EdgeCurve::Line(Line3d::from_points(Point3::origin(), Point3::origin()));
        assert!(s.add_edge(curve, (0.0, 1.0), (1, 9), Continuity::Sharp).is_err());
    }

    #[test]
    fn test_transform_keeps_indices() {
        let s = segment();
        let moved = s.transform(&Transform::uniform_scale(2.0));
        assert_eq!(moved.edge(1).unwrap().vertices, (1, 2));
        assert!((moved.vertex(2).unwrap().point.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_points() {
        let s = segment();
        // 2 vertices + 2 line samples
        assert_eq!(s.sample_points(8).len(), 4);
    }
}
