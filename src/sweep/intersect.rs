// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Repairs of the dictionary order. Because of round-off an edge may end up
// on the wrong side of a neighbour's endpoint, and two edges may cross.
// Both are fixed by splitting edges and splicing vertices together so the
// dictionary stays consistent with the geometry at the current event.

use glam::Vec3;
use log::trace;

use super::{add_winding, Sweep};
use crate::error::InternalError;
use crate::geom::{edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, Point, Real};
use crate::handle::{RegionId, VertId};
use crate::mesh::UNDEF;

impl Sweep<'_, '_> {
    /// Ensures the right endpoints of `reg_up`'s upper and lower edges lie
    /// on the correct side of each other. Returns whether anything changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: RegionId) -> Result<bool, InternalError> {
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh.org_point(e_up);
        let org_lo = self.mesh.org_point(e_lo);

        if vert_leq(org_up, org_lo) {
            if edge_sign(self.mesh.dst_point(e_lo), org_up, org_lo) > 0.0 {
                return Ok(false);
            }
            if !vert_eq(org_up, org_lo) {
                // e_up.org lies below e_lo: splice it into e_lo.
                self.mesh.split_edge(e_lo.sym());
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, oprev);
                self.regions[reg_up].dirty = true;
                self.regions[reg_lo].dirty = true;
            } else if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                // Same position: merge, discarding e_up.org.
                self.dequeue(self.mesh.org(e_up))?;
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(oprev, e_up);
            }
        } else {
            if edge_sign(self.mesh.dst_point(e_up), org_lo, org_up) < 0.0 {
                return Ok(false);
            }
            // e_lo.org lies above e_up: splice it into e_up.
            let above = self.above(reg_up)?;
            self.regions[above].dirty = true;
            self.regions[reg_up].dirty = true;
            self.mesh.split_edge(e_up.sym());
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(oprev, e_up);
        }
        Ok(true)
    }

    /// Same as [`Self::check_for_right_splice`] for the left endpoints. The
    /// two destinations must differ.
    pub(super) fn check_for_left_splice(&mut self, reg_up: RegionId) -> Result<bool, InternalError> {
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let dst_up = self.mesh.dst_point(e_up);
        let dst_lo = self.mesh.dst_point(e_lo);
        debug_assert!(!vert_eq(dst_up, dst_lo));

        let inside = self.regions[reg_up].inside;
        if vert_leq(dst_up, dst_lo) {
            if edge_sign(dst_up, dst_lo, self.mesh.org_point(e_up)) < 0.0 {
                return Ok(false);
            }
            // e_lo.dst lies above e_up: splice it into e_up.
            let above = self.above(reg_up)?;
            self.regions[above].dirty = true;
            self.regions[reg_up].dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(e_lo.sym(), e);
            let f = self
                .mesh
                .lface(e)
                .ok_or(InternalError::BadTopology("left splice lost its face"))?;
            self.mesh[f].inside = inside;
        } else {
            if edge_sign(dst_lo, dst_up, self.mesh.org_point(e_lo)) > 0.0 {
                return Ok(false);
            }
            // e_up.dst lies below e_lo: splice it into e_lo.
            self.regions[reg_up].dirty = true;
            self.regions[reg_lo].dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let lnext = self.mesh.lnext(e_up);
            self.mesh.splice(lnext, e_lo.sym());
            let f = self
                .mesh
                .rface(e)
                .ok_or(InternalError::BadTopology("left splice lost its face"))?;
            self.mesh[f].inside = inside;
        }
        Ok(true)
    }

    /// Checks the upper and lower edges of `reg_up` for an intersection and
    /// splits both at the crossing if there is one. Returns `true` when the
    /// regions were re-processed recursively and the caller's walk is done.
    pub(super) fn check_for_intersect(&mut self, mut reg_up: RegionId) -> Result<bool, InternalError> {
        let mut reg_lo = self.below(reg_up)?;
        let mut e_up = self.e_up(reg_up);
        let mut e_lo = self.e_up(reg_lo);
        let (org_up_v, org_lo_v) = (self.mesh.org(e_up), self.mesh.org(e_lo));
        let (dst_up_v, dst_lo_v) = (self.mesh.dst(e_up), self.mesh.dst(e_lo));
        let org_up = self.mesh[org_up_v].point();
        let org_lo = self.mesh[org_lo_v].point();
        let dst_up = self.mesh[dst_up_v].point();
        let dst_lo = self.mesh[dst_lo_v].point();
        let event = self.mesh[self.event].point();

        if org_up_v == org_lo_v {
            return Ok(false);
        }

        let t_min_up = org_up.t.min(dst_up.t);
        let t_max_lo = org_lo.t.max(dst_lo.t);
        if t_min_up > t_max_lo {
            return Ok(false);
        }

        if vert_leq(org_up, org_lo) {
            if edge_sign(dst_lo, org_up, org_lo) > 0.0 {
                return Ok(false);
            }
        } else if edge_sign(dst_up, org_lo, org_up) < 0.0 {
            return Ok(false);
        }

        let mut isect = edge_intersect(dst_up, org_up, dst_lo, org_lo);
        // Keep the point right of the sweep line and left of both right
        // endpoints.
        if vert_leq(isect, event) {
            isect = event;
        }
        let org_min = if vert_leq(org_up, org_lo) { org_up } else { org_lo };
        if vert_leq(org_min, isect) {
            isect = org_min;
        }

        if vert_eq(isect, org_up) || vert_eq(isect, org_lo) {
            self.check_for_right_splice(reg_up)?;
            return Ok(false);
        }

        if (!vert_eq(dst_up, event) && edge_sign(dst_up, event, isect) >= 0.0)
            || (!vert_eq(dst_lo, event) && edge_sign(dst_lo, event, isect) <= 0.0)
        {
            // The crossing is too close to the event to be represented.
            if dst_lo_v == self.event {
                // Splice dst_lo into e_up and re-process.
                self.mesh.split_edge(e_up.sym());
                self.mesh.splice(e_lo.sym(), e_up);
                reg_up = self.top_left_region(reg_up)?;
                let below = self.below(reg_up)?;
                e_up = self.e_up(below);
                self.finish_left_regions(below, Some(reg_lo))?;
                let oprev = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, oprev, e_up, Some(e_up), true)?;
                return Ok(true);
            }
            if dst_up_v == self.event {
                // Splice dst_up into e_lo and re-process.
                self.mesh.split_edge(e_lo.sym());
                let lnext = self.mesh.lnext(e_up);
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(lnext, oprev);
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up)?;
                let below = self.below(reg_up)?;
                let e = self.mesh.rprev(self.e_up(below));
                self.regions[reg_lo].e_up = self.mesh.oprev(e_lo);
                e_lo = self.finish_left_regions(reg_lo, None)?;
                let first = self.mesh.onext(e_lo);
                let last = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, first, last, Some(e), true)?;
                return Ok(true);
            }

            // Split whichever edge passes on the wrong side of the event and
            // let the caller splice it in.
            let event_v = self.event;
            if edge_sign(dst_up, event, isect) >= 0.0 {
                let above = self.above(reg_up)?;
                self.regions[above].dirty = true;
                self.regions[reg_up].dirty = true;
                self.mesh.split_edge(e_up.sym());
                self.place_at_event(self.mesh.org(e_up), event_v);
            }
            if edge_sign(dst_lo, event, isect) <= 0.0 {
                self.regions[reg_up].dirty = true;
                self.regions[reg_lo].dirty = true;
                self.mesh.split_edge(e_lo.sym());
                self.place_at_event(self.mesh.org(e_lo), event_v);
            }
            return Ok(false);
        }

        // General case: split both edges and join them at a new vertex.
        trace!("edges {:?} and {:?} cross at ({}, {})", e_up, e_lo, isect.s, isect.t);
        self.mesh.split_edge(e_up.sym());
        self.mesh.split_edge(e_lo.sym());
        let oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(oprev, e_up);
        let v = self.mesh.org(e_up);
        self.mesh[v].s = isect.s;
        self.mesh[v].t = isect.t;
        self.enqueue(v);
        self.intersect_data(v, [org_up_v, dst_up_v, org_lo_v, dst_lo_v]);

        let above = self.above(reg_up)?;
        self.regions[above].dirty = true;
        self.regions[reg_up].dirty = true;
        self.regions[reg_lo].dirty = true;
        Ok(false)
    }

    fn place_at_event(&mut self, v: VertId, event: VertId) {
        let (s, t, coords) = {
            let ev = &self.mesh[event];
            (ev.s, ev.t, ev.coords)
        };
        let vert = &mut self.mesh[v];
        vert.s = s;
        vert.t = t;
        vert.coords = coords;
        vert.idx = UNDEF;
    }

    /// Blends the position of the intersection vertex `isect` from the
    /// endpoints of the two crossing edges and asks the combine hook for its
    /// `idx`.
    fn intersect_data(&mut self, isect: VertId, sources: [VertId; 4]) {
        let at = self.mesh[isect].point();
        let mut weights: [Real; 4] = [0.0; 4];
        let up = edge_weights(self.mesh[sources[0]].point(), self.mesh[sources[1]].point(), at);
        let lo = edge_weights(self.mesh[sources[2]].point(), self.mesh[sources[3]].point(), at);
        weights[..2].copy_from_slice(&up);
        weights[2..].copy_from_slice(&lo);

        let mut coords = Vec3::ZERO;
        let mut idx = [UNDEF; 4];
        for (i, &src) in sources.iter().enumerate() {
            coords += self.mesh[src].coords * weights[i];
            idx[i] = self.mesh[src].idx;
        }
        let new_idx = (self.combine)(coords, idx, weights);
        let vert = &mut self.mesh[isect];
        vert.coords = coords;
        vert.idx = new_idx;
    }

    /// Re-checks every dirty region, starting at the lowest dirty one at or
    /// below `reg_up` and walking up, until none is dirty.
    pub(super) fn walk_dirty_regions(&mut self, mut reg_up: RegionId) -> Result<(), InternalError> {
        let mut reg_lo = self.region_below(reg_up);

        loop {
            while let Some(lo) = reg_lo.filter(|&r| self.regions[r].dirty) {
                reg_up = lo;
                reg_lo = self.region_below(lo);
            }
            if !self.regions[reg_up].dirty {
                reg_lo = Some(reg_up);
                match self.region_above(reg_up) {
                    Some(up) if self.regions[up].dirty => reg_up = up,
                    _ => return Ok(()),
                }
            }
            let mut lo = reg_lo.ok_or(InternalError::MissingRegion)?;
            self.regions[reg_up].dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up)? {
                // A temporary edge is no longer needed once its vertex has
                // a real right-going edge.
                if self.regions[lo].fix_upper_edge {
                    self.delete_region(lo);
                    self.mesh.delete_edge(e_lo);
                    lo = self.below(reg_up)?;
                    e_lo = self.e_up(lo);
                } else if self.regions[reg_up].fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.above(lo)?;
                    e_up = self.e_up(reg_up);
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                let event = self.event;
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.regions[reg_up].fix_upper_edge
                    && !self.regions[lo].fix_upper_edge
                    && (self.mesh.dst(e_up) == event || self.mesh.dst(e_lo) == event)
                {
                    if self.check_for_intersect(reg_up)? {
                        return Ok(());
                    }
                } else {
                    self.check_for_right_splice(reg_up)?;
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo) {
                // Two edges forming a zero-area loop: keep one.
                add_winding(&mut *self.mesh, e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.above(lo)?;
            }
            reg_lo = Some(lo);
        }
    }
}

/// Weights of `org` and `dst` for a point `at` on their edge, summing to
/// one half and inversely proportional to the L1 distance.
fn edge_weights(org: Point, dst: Point, at: Point) -> [Real; 2] {
    let t1 = vert_l1_dist(org, at);
    let t2 = vert_l1_dist(dst, at);
    let sum = t1 + t2;
    if sum <= 0.0 {
        return [0.25, 0.25];
    }
    [0.5 * t2 / sum, 0.5 * t1 / sum]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn weights_favour_the_nearer_endpoint() {
        let w = edge_weights(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(1.0, 0.0));
        assert_abs_diff_eq!(w[0], 0.375);
        assert_abs_diff_eq!(w[1], 0.125);
        assert_abs_diff_eq!(w[0] + w[1], 0.5);
    }

    #[test]
    fn weights_of_a_collapsed_edge_split_evenly() {
        let p = Point::new(2.0, 3.0);
        assert_eq!(edge_weights(p, p, p), [0.25, 0.25]);
    }
}
