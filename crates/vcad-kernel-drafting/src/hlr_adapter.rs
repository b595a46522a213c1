//! Bridge between the drafting pipeline and a hidden-line kernel.

use log::debug;
use vcad_kernel_brep::Shape;
use vcad_kernel_hlr::{HiddenLineRemoval, HlrData, HlrEdge, HlrFace};
use vcad_kernel_math::{Point3, Vec3};

use crate::error::Result;
use crate::types::Point2D;
use crate::view::ViewTransformer;

/// A shape run through a hidden-line kernel for one view.
///
/// Holds the shape in kernel space (centred, scaled, mirrored) together with
/// the kernel's edge and face records.
#[derive(Debug, Clone)]
pub struct HlrAdapter {
    view: ViewTransformer,
    shape: Shape,
    data: HlrData,
}

impl HlrAdapter {
    /// Transform `shape` for the view and run `kernel` on it.
    pub fn new(
        kernel: &dyn HiddenLineRemoval,
        shape: &Shape,
        direction: Vec3,
        x_axis: Vec3,
        scale: f64,
    ) -> Result<Self> {
        let view = ViewTransformer::new(shape, direction, x_axis, scale)?;
        let transformed = shape.transform(&view.transform);
        let data = kernel.compute(&transformed, &view.projector)?;
        debug!(
            "kernel returned {} edge records, {} face records",
            data.edges.len(),
            data.faces.len()
        );
        Ok(Self {
            view,
            shape: transformed,
            data,
        })
    }

    /// Edge records.
    pub fn edges(&self) -> &[HlrEdge] {
        &self.data.edges
    }

    /// Face records.
    pub fn faces(&self) -> &[HlrFace] {
        &self.data.faces
    }

    /// The shape in kernel space.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The view transforms.
    pub fn view(&self) -> &ViewTransformer {
        &self.view
    }

    /// Project a point into drawing coordinates.
    ///
    /// With `scaled` set, `p` is an object-space point and the scale/mirror
    /// transform is applied first. Otherwise `p` is already in kernel space,
    /// as are all curves in the kernel records.
    pub fn project(&self, p: &Point3, scaled: bool) -> Point2D {
        let q = if scaled {
            self.view.transform.apply_point(p)
        } else {
            *p
        };
        self.view.projector.project(&q).into()
    }
}
