//! Wire reconstruction from disconnected projected edges.
//!
//! Edges are chained greedily: a wire is seeded with the first unused edge
//! and grows at either end by any edge whose endpoint meets the chain's open
//! end, reversed where needed, until a full scan adds nothing or the chain
//! closes. Chains are kept in walk order as they grow, so consecutive
//! geometry always shares an endpoint.

use log::trace;

use crate::error::{DraftingError, Result};
use crate::types::{BaseGeom, Point2D, Wire};

/// Greedy endpoint chaining within a distance tolerance.
#[derive(Debug, Clone, Copy)]
pub struct WireBuilder {
    tolerance: f64,
}

impl WireBuilder {
    /// Builder joining endpoints closer than `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn near(&self, a: &Point2D, b: &Point2D) -> bool {
        a.distance(b) < self.tolerance
    }

    /// Whether `geom` can extend `wire`.
    ///
    /// Empty wires accept anything; closed wires accept nothing; a closed
    /// geometry only starts a wire of its own.
    pub fn can_connect(&self, wire: &Wire, geom: &BaseGeom) -> bool {
        let (Some(first), Some(last)) = (wire.geoms.first(), wire.geoms.last()) else {
            return true;
        };
        if wire.is_closed(self.tolerance) || geom.is_closed(self.tolerance) {
            return false;
        }
        let (ws, we) = (first.start_point(), last.end_point());
        let (gs, ge) = (geom.start_point(), geom.end_point());
        self.near(&we, &gs) || self.near(&we, &ge) || self.near(&ws, &ge) || self.near(&ws, &gs)
    }

    /// Attach `geom` at whichever open end it meets, reversing it if needed.
    ///
    /// Geometry that meets neither end is appended as is; callers check
    /// [`can_connect`](Self::can_connect) first.
    pub fn append(&self, wire: &mut Wire, geom: BaseGeom) {
        let (Some(first), Some(last)) = (wire.geoms.first(), wire.geoms.last()) else {
            wire.geoms.push(geom);
            return;
        };
        let (ws, we) = (first.start_point(), last.end_point());
        let (gs, ge) = (geom.start_point(), geom.end_point());
        if self.near(&we, &gs) {
            wire.geoms.push(geom);
        } else if self.near(&we, &ge) {
            wire.geoms.push(geom.reversed());
        } else if self.near(&ws, &ge) {
            wire.geoms.insert(0, geom);
        } else if self.near(&ws, &gs) {
            wire.geoms.insert(0, geom.reversed());
        } else {
            wire.geoms.push(geom);
        }
    }

    /// Chain all of `geoms` into wires, open or closed.
    pub fn build_wires(&self, geoms: Vec<BaseGeom>) -> Vec<Wire> {
        let mut remaining = geoms;
        let mut wires = Vec::new();
        while !remaining.is_empty() {
            let mut wire = Wire::default();
            self.append(&mut wire, remaining.remove(0));
            loop {
                let mut added = false;
                let mut i = 0;
                while i < remaining.len() {
                    if self.can_connect(&wire, &remaining[i]) {
                        let geom = remaining.remove(i);
                        self.append(&mut wire, geom);
                        added = true;
                    } else {
                        i += 1;
                    }
                }
                if !added {
                    break;
                }
            }
            trace!(
                "wire of {} geoms, closed: {}",
                wire.geoms.len(),
                wire.is_closed(self.tolerance)
            );
            wires.push(wire);
        }
        wires
    }

    /// Like [`build_wires`](Self::build_wires), but every wire must close.
    pub fn build_closed_wires(&self, geoms: Vec<BaseGeom>) -> Result<Vec<Wire>> {
        let wires = self.build_wires(geoms);
        let open = wires.iter().filter(|w| !w.is_closed(self.tolerance)).count();
        if open > 0 {
            return Err(DraftingError::WireReconstructionFailure(format!(
                "{open} of {} wires are open",
                wires.len()
            )));
        }
        Ok(wires)
    }
}
