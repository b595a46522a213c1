//! Edge extraction: visible and hidden passes over the kernel records.

use std::collections::HashSet;

use log::{debug, trace};
use vcad_kernel_brep::{Edge, EdgeCurve};
use vcad_kernel_hlr::{HlrEdge, Interval, Visibility};
use vcad_kernel_math::Tolerance;

use crate::classify::classify;
use crate::hlr_adapter::HlrAdapter;
use crate::settings::DraftingSettings;
use crate::types::{Edge2d, ExtractType, UNKNOWN_REFERENCE};

/// Resolve the topological reference of every kernel record.
///
/// Records carrying a source index use it. Synthesized records are matched
/// against shape edges no record refers to, by curve kind, endpoints in
/// either order, and centre/radius for conics. A match consumes the
/// candidate; records left unmatched get [`UNKNOWN_REFERENCE`].
pub fn record_references(adapter: &HlrAdapter, tolerance: f64) -> Vec<i32> {
    let shape = adapter.shape();
    let tol = Tolerance::linear(tolerance);
    let mut taken: HashSet<usize> = adapter.edges().iter().filter_map(|r| r.source).collect();

    let mut references = Vec::with_capacity(adapter.edges().len());
    for (n, record) in adapter.edges().iter().enumerate() {
        let reference = match record.source {
            Some(source) => source as i32,
            None => {
                let found = shape
                    .edges()
                    .find(|(i, edge)| !taken.contains(i) && curves_match(record, edge, &tol))
                    .map(|(i, _)| i);
                match found {
                    Some(i) => {
                        taken.insert(i);
                        trace!("record {n} matched to edge {i}");
                        i as i32
                    }
                    None => {
                        debug!("no topological edge for record {n} (contour: {})", record.contour);
                        UNKNOWN_REFERENCE
                    }
                }
            }
        };
        references.push(reference);
    }
    references
}

fn curves_match(record: &HlrEdge, edge: &Edge, tol: &Tolerance) -> bool {
    if record.curve.kind() != edge.curve.kind() {
        return false;
    }
    let (a0, a1) = (record.curve.evaluate(record.range.0), record.curve.evaluate(record.range.1));
    let (b0, b1) = (edge.start_point(), edge.end_point());
    let ends = (tol.points_equal(&a0, &b0) && tol.points_equal(&a1, &b1))
        || (tol.points_equal(&a0, &b1) && tol.points_equal(&a1, &b0));
    if !ends {
        return false;
    }
    match (&record.curve, &edge.curve) {
        (EdgeCurve::Circle(a), EdgeCurve::Circle(b)) => {
            tol.points_equal(&a.center, &b.center) && tol.is_zero(a.radius - b.radius)
        }
        (EdgeCurve::Ellipse(a), EdgeCurve::Ellipse(b)) => {
            tol.points_equal(&a.center, &b.center)
                && tol.is_zero(a.major_radius - b.major_radius)
                && tol.is_zero(a.minor_radius - b.minor_radius)
        }
        _ => true,
    }
}

fn is_full_range(interval: &Interval, range: (f64, f64)) -> bool {
    let eps = 1e-12 * (range.1 - range.0).abs().max(1.0);
    (interval.start - range.0).abs() <= eps && (interval.end - range.1).abs() <= eps
}

/// One extraction pass.
///
/// Every interval of the requested visibility becomes one [`Edge2d`]
/// carrying the reference of its record.
pub fn extract_edges(
    adapter: &HlrAdapter,
    references: &[i32],
    visibility: Visibility,
    settings: &DraftingSettings,
) -> Vec<(Edge2d, i32)> {
    let projector = &adapter.view().projector;
    let mut out = Vec::new();
    for (record, &reference) in adapter.edges().iter().zip(references) {
        if record.smooth && !settings.smooth_edges {
            continue;
        }
        let extract_type = match visibility {
            Visibility::Hidden => ExtractType::WithHidden,
            Visibility::Visible if record.smooth => ExtractType::WithSmooth,
            Visibility::Visible => ExtractType::Plain,
        };
        for interval in record.intervals(visibility) {
            let polygon =
                is_full_range(interval, record.range).then_some(record.polygon.as_slice());
            let geom = classify(&record.curve, (interval.start, interval.end), polygon, projector);
            out.push((Edge2d::new(geom, extract_type), reference));
        }
    }
    debug!("{visibility:?} pass: {} edges", out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeomKind;
    use vcad_kernel_brep::{make_box, make_cylinder};
    use vcad_kernel_hlr::HlrAlgo;
    use vcad_kernel_math::Vec3;

    fn adapter(shape: &vcad_kernel_brep::Shape, direction: Vec3, x_axis: Vec3) -> HlrAdapter {
        HlrAdapter::new(&HlrAlgo::default(), shape, direction, x_axis, 1.0).unwrap()
    }

    #[test]
    fn test_box_top_view_passes() {
        let b = make_box(1.0, 1.0, 1.0).unwrap();
        let hlr = adapter(&b, Vec3::z(), Vec3::x());
        let refs = record_references(&hlr, 0.01);
        let settings = DraftingSettings::default();

        let visible = extract_edges(&hlr, &refs, Visibility::Visible, &settings);
        let mut vis_refs: Vec<i32> = visible.iter().map(|(_, r)| *r).collect();
        vis_refs.sort_unstable();
        assert_eq!(vis_refs, vec![5, 6, 7, 8]);
        assert!(visible.iter().all(|(e, _)| e.extract_type() == ExtractType::Plain));
        assert!(visible.iter().all(|(e, _)| e.geom().kind() == GeomKind::Generic));

        let hidden = extract_edges(&hlr, &refs, Visibility::Hidden, &settings);
        let mut hid_refs: Vec<i32> = hidden.iter().map(|(_, r)| *r).collect();
        hid_refs.sort_unstable();
        assert_eq!(hid_refs, vec![1, 2, 3, 4]);
        assert!(hidden.iter().all(|(e, _)| e.is_hidden()));
    }

    #[test]
    fn test_outline_matches_replaced_seam() {
        let c = make_cylinder(1.0, 2.0).unwrap();
        let hlr = adapter(&c, Vec3::new(0.0, -1.0, 1.0), Vec3::x());
        let refs = record_references(&hlr, 0.01);
        let outline_refs: Vec<i32> = hlr
            .edges()
            .iter()
            .zip(&refs)
            .filter(|(r, _)| r.source.is_none())
            .map(|(_, &r)| r)
            .collect();
        assert_eq!(outline_refs.len(), 2);
        assert_eq!(outline_refs.iter().filter(|&&r| r == 3).count(), 1);
        assert_eq!(outline_refs.iter().filter(|&&r| r == UNKNOWN_REFERENCE).count(), 1);
    }

    #[test]
    fn test_smooth_edges_follow_settings() {
        // Seen from +X the seam faces the viewer and is not an outline.
        let c = make_cylinder(1.0, 2.0).unwrap();
        let hlr = adapter(&c, Vec3::x(), Vec3::y());
        let refs = record_references(&hlr, 0.01);
        assert!(hlr.edges().iter().any(|r| r.smooth && r.source == Some(3)));
        let on = extract_edges(&hlr, &refs, Visibility::Visible, &DraftingSettings::default());
        let off_settings = DraftingSettings {
            smooth_edges: false,
            ..Default::default()
        };
        let off = extract_edges(&hlr, &refs, Visibility::Visible, &off_settings);
        assert!(on.iter().any(|(e, r)| *r == 3 && e.extract_type() == ExtractType::WithSmooth));
        assert!(off.iter().all(|(e, _)| e.extract_type() != ExtractType::WithSmooth));
    }
}
