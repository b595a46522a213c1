//! Records produced by a hidden-line-removal pass.

use vcad_kernel_brep::EdgeCurve;
use vcad_kernel_math::Point3;

/// Which side of the visibility split an interval belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Not occluded by any face.
    Visible,
    /// Behind at least one face.
    Hidden,
}

/// A parameter interval `[start, end]` on an edge curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Start parameter.
    pub start: f64,
    /// End parameter.
    pub end: f64,
}

impl Interval {
    /// Parameter length.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// True for zero-length intervals.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

/// One projected edge with its visibility split.
///
/// Curves are in kernel space, i.e. the coordinate system of the shape
/// handed to the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct HlrEdge {
    /// 1-based index of the topological edge, or `None` for edges the
    /// kernel synthesized (silhouette outlines).
    pub source: Option<usize>,
    /// 3D curve.
    pub curve: EdgeCurve,
    /// Full parameter range of the edge.
    pub range: (f64, f64),
    /// Visible sub-intervals, ordered by parameter.
    pub visible: Vec<Interval>,
    /// Hidden sub-intervals, ordered by parameter.
    pub hidden: Vec<Interval>,
    /// Tangent-continuous edge (smooth or seam).
    pub smooth: bool,
    /// Silhouette outline of a curved face.
    pub contour: bool,
    /// Discretization of the full range, in kernel space.
    pub polygon: Vec<Point3>,
}

impl HlrEdge {
    /// Intervals for one side of the split.
    pub fn intervals(&self, visibility: Visibility) -> &[Interval] {
        match visibility {
            Visibility::Visible => &self.visible,
            Visibility::Hidden => &self.hidden,
        }
    }
}

/// Per-face result.
#[derive(Debug, Clone, PartialEq)]
pub struct HlrFace {
    /// 1-based face index.
    pub index: usize,
    /// 1-based indices of the bounding edges.
    pub edges: Vec<usize>,
    /// Whether any part of the face points toward the viewer.
    pub front_facing: bool,
}

/// Complete output of one hidden-line-removal run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HlrData {
    /// Edge records.
    pub edges: Vec<HlrEdge>,
    /// Face records, one per shape face.
    pub faces: Vec<HlrFace>,
}
