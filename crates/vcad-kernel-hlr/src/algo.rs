//! Reference hidden-line-removal kernel.
//!
//! Every edge is sampled along its parameter range and each sample is depth
//! tested against the tessellated faces. Where two neighbouring samples
//! disagree, the transition parameter is refined by bisection, so interval
//! ends land on the true occlusion boundary to within the bisection
//! resolution rather than the sample spacing.
//!
//! Cylindrical faces additionally contribute silhouette outlines: the two
//! generator lines where the surface turns away from the viewer.

use std::f64::consts::PI;

use log::{debug, trace};
use vcad_kernel_brep::{tessellate_shape, Edge, EdgeCurve, FaceSurface, Line3d, Shape};
use vcad_kernel_math::{Point3, Tolerance, Vec3};

use crate::data::{HlrData, HlrEdge, HlrFace, Interval};
use crate::error::HlrError;
use crate::occlusion::OcclusionMap;
use crate::projector::Projector;
use crate::HiddenLineRemoval;

/// Shortest drawable visibility run, relative to the shape extent.
const MIN_RUN_FRACTION: f64 = 1e-4;
/// Segments used to measure the projected length of a run.
const SLIVER_SAMPLES: usize = 4;

/// Sampling-based hidden-line removal over a triangle tessellation.
#[derive(Debug, Clone)]
pub struct HlrAlgo {
    /// Samples along straight edges.
    pub line_samples: usize,
    /// Samples along curved edges.
    pub curve_samples: usize,
    /// Bisection iterations per visibility transition.
    pub bisection_steps: usize,
    /// Segments used when tessellating curved faces and edges.
    pub tessellation_segments: usize,
}

impl Default for HlrAlgo {
    fn default() -> Self {
        Self {
            line_samples: 32,
            curve_samples: 96,
            bisection_steps: 48,
            tessellation_segments: 64,
        }
    }
}

impl HlrAlgo {
    /// Kernel with a custom tessellation resolution.
    pub fn with_tessellation_segments(segments: usize) -> Self {
        Self {
            tessellation_segments: segments.max(3),
            ..Self::default()
        }
    }

    fn sample_count(&self, curve: &EdgeCurve) -> usize {
        match curve {
            EdgeCurve::Line(_) => self.line_samples,
            EdgeCurve::Polyline(pts) => (pts.len().saturating_sub(1) * 4).max(self.line_samples),
            _ => self.curve_samples,
        }
        .max(2)
    }

    /// Split `[t0, t1]` into visible and hidden intervals.
    fn split(
        &self,
        curve: &EdgeCurve,
        range: (f64, f64),
        occlusion: &OcclusionMap,
        projector: &Projector,
        min_run: f64,
    ) -> (Vec<Interval>, Vec<Interval>) {
        let (t0, t1) = range;
        let hidden_at = |t: f64| occlusion.is_occluded(&projector.to_view(&curve.evaluate(t)));

        let n = self.sample_count(curve);
        let params: Vec<f64> = (0..=n)
            .map(|i| t0 + (t1 - t0) * i as f64 / n as f64)
            .collect();
        let states: Vec<bool> = params.iter().map(|&t| hidden_at(t)).collect();

        // (start, end, hidden) runs with refined boundaries.
        let mut runs: Vec<(f64, f64, bool)> = Vec::new();
        let mut start = t0;
        for i in 0..n {
            if states[i] == states[i + 1] {
                continue;
            }
            let (mut lo, mut hi) = (params[i], params[i + 1]);
            for _ in 0..self.bisection_steps {
                let mid = 0.5 * (lo + hi);
                if hidden_at(mid) == states[i] {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let cut = 0.5 * (lo + hi);
            runs.push((start, cut, states[i]));
            start = cut;
        }
        runs.push((start, t1, states[n]));

        // Runs too short to draw are absorbed by their predecessor, and
        // neighbours on the same side are merged.
        let is_sliver = |a: f64, b: f64| {
            projected_length(&curve.sample(a, b, SLIVER_SAMPLES), projector) < min_run
        };
        let mut merged: Vec<(f64, f64, bool)> = Vec::with_capacity(runs.len());
        for (a, b, is_hidden) in runs {
            match merged.last_mut() {
                Some(last) if last.2 == is_hidden || is_sliver(a, b) => last.1 = b,
                _ => merged.push((a, b, is_hidden)),
            }
        }
        if merged.len() > 1 && is_sliver(merged[0].0, merged[0].1) {
            merged.remove(0);
            merged[0].0 = t0;
        }

        let mut visible: Vec<Interval> = Vec::new();
        let mut hidden: Vec<Interval> = Vec::new();
        for (a, b, is_hidden) in merged {
            let target = if is_hidden { &mut hidden } else { &mut visible };
            target.push(Interval { start: a, end: b });
        }
        (visible, hidden)
    }

    /// Generator lines along which a cylinder turns away from the viewer.
    fn silhouettes(face: &FaceSurface, view: &Vec3) -> Vec<Line3d> {
        let FaceSurface::Cylinder(c) = face else {
            return Vec::new();
        };
        let a = c.ref_dir.as_ref().dot(view);
        let b = c.y_dir().dot(view);
        if a.hypot(b) < 1e-9 {
            // Looking straight down the axis.
            return Vec::new();
        }
        let u = (-a).atan2(b);
        [u, u + PI]
            .into_iter()
            .map(|u| Line3d::from_points(c.evaluate(u, 0.0), c.evaluate(u, c.height)))
            .collect()
    }

    fn is_front_facing(face: &FaceSurface, view: &Vec3) -> bool {
        let tol = Tolerance::DEFAULT.angular;
        match face {
            FaceSurface::Plane(p) => p.normal.as_ref().dot(view) > tol,
            FaceSurface::Cylinder(c) => c.axis.as_ref().dot(view).abs() < 1.0 - tol,
        }
    }
}

fn check_finite(shape: &Shape) -> Result<(), HlrError> {
    let finite = |p: &Point3| p.iter().all(|c| c.is_finite());
    for (i, v) in shape.vertices() {
        if !finite(&v.point) {
            return Err(HlrError::DegenerateShape(format!("vertex {i} is not finite")));
        }
    }
    for (i, e) in shape.edges() {
        let finite_range = e.range.0.is_finite() && e.range.1.is_finite();
        if !finite_range || e.sample(4).iter().any(|p| !finite(p)) {
            return Err(HlrError::DegenerateShape(format!("edge {i} is not finite")));
        }
    }
    Ok(())
}

fn projected_length(points: &[Point3], projector: &Projector) -> f64 {
    points
        .windows(2)
        .map(|w| (projector.project(&w[1]) - projector.project(&w[0])).norm())
        .sum()
}

fn same_line(edge: &Edge, line: &Line3d, tol: &Tolerance) -> bool {
    if !matches!(edge.curve, EdgeCurve::Line(_)) {
        return false;
    }
    let (s, e) = (edge.start_point(), edge.end_point());
    let (a, b) = (line.origin, line.origin + line.direction);
    (tol.points_equal(&s, &a) && tol.points_equal(&e, &b))
        || (tol.points_equal(&s, &b) && tol.points_equal(&e, &a))
}

impl HiddenLineRemoval for HlrAlgo {
    fn compute(&self, shape: &Shape, projector: &Projector) -> Result<HlrData, HlrError> {
        if shape.is_empty() {
            return Err(HlrError::EmptyShape);
        }
        check_finite(shape)?;

        let triangles = tessellate_shape(shape, self.tessellation_segments);
        let occlusion = OcclusionMap::new(&triangles, projector);
        let view = projector.view_direction();

        let extent = shape
            .sample_points(8)
            .iter()
            .map(|p| p.coords.amax())
            .fold(0.0, f64::max)
            .max(f64::MIN_POSITIVE);
        let tol = Tolerance::linear(1e-9 * extent);
        let min_projected = 1e-9 * extent;
        let min_run = MIN_RUN_FRACTION * extent;

        debug!(
            "hidden-line removal: {} edges, {} faces, {} occluders",
            shape.num_edges(),
            shape.num_faces(),
            occlusion.len()
        );

        // Outlines of curved faces; a topological line lying on an outline
        // is replaced by it.
        let mut outlines: Vec<Line3d> = Vec::new();
        let mut replaced: Vec<usize> = Vec::new();
        for (_, face) in shape.faces() {
            for line in Self::silhouettes(&face.surface, &view) {
                for &e in &face.edges {
                    if shape.edge(e).is_ok_and(|edge| same_line(edge, &line, &tol)) {
                        replaced.push(e);
                    }
                }
                outlines.push(line);
            }
        }

        let mut data = HlrData::default();
        for (index, edge) in shape.edges() {
            if replaced.contains(&index) {
                trace!("edge {index} coincides with an outline");
                continue;
            }
            let polygon = edge.sample(self.sample_count(&edge.curve));
            if projected_length(&polygon, projector) <= min_projected {
                trace!("edge {index} projects to a point");
                continue;
            }
            let (visible, hidden) =
                self.split(&edge.curve, edge.range, &occlusion, projector, min_run);
            data.edges.push(HlrEdge {
                source: Some(index),
                curve: edge.curve.clone(),
                range: edge.range,
                visible,
                hidden,
                smooth: edge.continuity.is_smooth(),
                contour: false,
                polygon,
            });
        }

        for line in outlines {
            let curve = EdgeCurve::Line(line);
            let range = (0.0, 1.0);
            let polygon = curve.sample(range.0, range.1, 1);
            if projected_length(&polygon, projector) <= min_projected {
                continue;
            }
            let (visible, hidden) = self.split(&curve, range, &occlusion, projector, min_run);
            data.edges.push(HlrEdge {
                source: None,
                curve,
                range,
                visible,
                hidden,
                smooth: false,
                contour: true,
                polygon,
            });
        }

        data.faces = shape
            .faces()
            .map(|(index, face)| HlrFace {
                index,
                edges: face.edges.clone(),
                front_facing: Self::is_front_facing(&face.surface, &view),
            })
            .collect();

        debug!("hidden-line removal done: {} records", data.edges.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vcad_kernel_brep::{make_box, make_cylinder};

    fn projector(z: Vec3, x: Vec3) -> Projector {
        let z = z.normalize();
        let y = z.cross(&x);
        Projector::from_axes(Point3::origin(), x, y, z).unwrap()
    }

    fn record(data: &HlrData, source: usize) -> &HlrEdge {
        data.edges
            .iter()
            .find(|e| e.source == Some(source))
            .unwrap_or_else(|| panic!("no record for edge {source}"))
    }

    #[test]
    fn test_empty_shape_rejected() {
        let p = projector(Vec3::z(), Vec3::x());
        assert_eq!(HlrAlgo::default().compute(&Shape::new(), &p), Err(HlrError::EmptyShape));
    }

    #[test]
    fn test_non_finite_shape_rejected() {
        let mut shape = make_box(1.0, 1.0, 1.0).unwrap();
        shape.add_vertex(Point3::new(f64::NAN, 0.0, 0.0));
        let p = projector(Vec3::z(), Vec3::x());
        assert!(matches!(
            HlrAlgo::default().compute(&shape, &p),
            Err(HlrError::DegenerateShape(_))
        ));
    }

    #[test]
    fn test_box_top_view() {
        let shape = make_box(1.0, 1.0, 1.0).unwrap();
        let data = HlrAlgo::default()
            .compute(&shape, &projector(Vec3::z(), Vec3::x()))
            .unwrap();
        // Verticals project to points.
        assert_eq!(data.edges.len(), 8);
        for top in 5..=8 {
            let r = record(&data, top);
            assert_eq!(r.visible.len(), 1);
            assert!(r.hidden.is_empty());
        }
        for bottom in 1..=4 {
            let r = record(&data, bottom);
            assert!(r.visible.is_empty());
            assert_eq!(r.hidden, vec![Interval { start: 0.0, end: 1.0 }]);
        }
        let front: Vec<usize> = data
            .faces
            .iter()
            .filter(|f| f.front_facing)
            .map(|f| f.index)
            .collect();
        assert_eq!(front, vec![2]);
    }

    #[test]
    fn test_edge_partially_hidden() {
        // A line passing under half of the box.
        let mut shape = make_box(1.0, 1.0, 1.0).unwrap();
        let (p, q) = (Point3::new(-1.0, 0.5, -1.0), Point3::new(1.0, 0.5, -1.0));
        let a = shape.add_vertex(p);
        let b = shape.add_vertex(q);
        let idx = shape
            .add_edge(
                EdgeCurve::Line(Line3d::from_points(p, q)),
                (0.0, 1.0),
                (a, b),
                vcad_kernel_brep::Continuity::Sharp,
            )
            .unwrap();
        let data = HlrAlgo::default()
            .compute(&shape, &projector(Vec3::z(), Vec3::x()))
            .unwrap();
        let r = record(&data, idx);
        assert_eq!(r.visible.len(), 1);
        assert_eq!(r.hidden.len(), 1);
        assert_relative_eq!(r.visible[0].start, 0.0);
        assert_relative_eq!(r.visible[0].end, 0.5, epsilon = 1e-6);
        assert_relative_eq!(r.hidden[0].end, 1.0);
    }

    #[test]
    fn test_cylinder_oblique_view() {
        let shape = make_cylinder(1.0, 2.0).unwrap();
        let data = HlrAlgo::default()
            .compute(&shape, &projector(Vec3::new(0.0, -1.0, 1.0), Vec3::x()))
            .unwrap();

        // Seam coincides with an outline and is replaced.
        assert!(data.edges.iter().all(|e| e.source != Some(3)));
        let outlines: Vec<&HlrEdge> = data.edges.iter().filter(|e| e.contour).collect();
        assert_eq!(outlines.len(), 2);
        assert!(outlines.iter().all(|e| e.source.is_none() && e.hidden.is_empty()));

        let bottom = record(&data, 1);
        assert_eq!(bottom.visible.len(), 1);
        assert_eq!(bottom.hidden.len(), 1);
        assert_relative_eq!(bottom.visible[0].start, PI, epsilon = 1e-3);
        assert_relative_eq!(bottom.visible[0].end, 2.0 * PI, epsilon = 1e-9);

        let top = record(&data, 2);
        assert_eq!(top.visible.len(), 1);
        assert!(top.hidden.is_empty());

        let front: Vec<usize> = data
            .faces
            .iter()
            .filter(|f| f.front_facing)
            .map(|f| f.index)
            .collect();
        assert_eq!(front, vec![1, 3]);
    }

    #[test]
    fn test_visibility_independent_of_size() {
        let view = projector(Vec3::new(0.0, -1.0, 1.0), Vec3::x());
        let summary = |radius: f64| {
            let shape = make_cylinder(radius, 2.0 * radius).unwrap();
            let data = HlrAlgo::default().compute(&shape, &view).unwrap();
            let bottom = record(&data, 1);
            assert_relative_eq!(bottom.visible[0].start, PI, epsilon = 1e-3);
            data.edges
                .iter()
                .map(|e| (e.source, e.contour, e.visible.len(), e.hidden.len()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(1.0), summary(0.01));
        assert_eq!(summary(1.0), summary(250.0));
    }

    #[test]
    fn test_cylinder_axial_view_has_no_outline() {
        let shape = make_cylinder(1.0, 2.0).unwrap();
        let data = HlrAlgo::default()
            .compute(&shape, &projector(Vec3::z(), Vec3::x()))
            .unwrap();
        assert!(data.edges.iter().all(|e| !e.contour));
        // The seam projects to a point, so only the two circles remain.
        assert_eq!(data.edges.len(), 2);
        assert!(!data.faces[0].front_facing);
    }
}
