//! Visible vertex extraction.

use std::collections::HashSet;

use log::debug;
use vcad_kernel_hlr::Visibility;

use crate::hlr_adapter::HlrAdapter;
use crate::types::{Point2D, Vertex};

/// Samples per visible interval when testing vertex containment.
const INTERVAL_SAMPLES: usize = 32;

/// Project the topological vertices that lie on drawn visible geometry.
///
/// A vertex bounding a record's source edge is kept when it falls within
/// `tolerance` of the discretized visible interval. Each topological vertex
/// is emitted at most once, referenced by its 1-based index.
pub fn extract_vertices(adapter: &HlrAdapter, tolerance: f64) -> Vec<(Vertex, i32)> {
    let shape = adapter.shape();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut out = Vec::new();

    for record in adapter.edges() {
        let Some(source) = record.source else {
            continue;
        };
        let Ok(edge) = shape.edge(source) else {
            continue;
        };
        let (a, b) = edge.vertices;
        for interval in record.intervals(Visibility::Visible) {
            let drawn: Vec<Point2D> = record
                .curve
                .sample(interval.start, interval.end, INTERVAL_SAMPLES)
                .iter()
                .map(|p| adapter.project(p, false))
                .collect();
            for index in [a, b] {
                if seen.contains(&index) {
                    continue;
                }
                let Ok(vertex) = shape.vertex(index) else {
                    continue;
                };
                let point = adapter.project(&vertex.point, false);
                if drawn.iter().any(|p| p.distance(&point) <= tolerance) {
                    seen.insert(index);
                    out.push((Vertex { point }, index as i32));
                }
            }
        }
    }
    debug!("vertex pass: {} vertices", out.len());
    out
}
