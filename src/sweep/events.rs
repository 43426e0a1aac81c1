// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Event handling. A vertex with no active incident edge is a *left* vertex:
// everything attached to it goes right. Otherwise the regions that end at
// the vertex are closed first and the right-going edges, if any, are added.

use log::trace;

use super::{add_winding, edge_leq, Sweep};
use crate::error::InternalError;
use crate::geom::{edge_sign, vert_eq, vert_leq};
use crate::handle::{EdgeId, RegionId, VertId};

impl Sweep<'_, '_> {
    pub(super) fn sweep_event(&mut self, v_event: VertId) -> Result<(), InternalError> {
        self.event = v_event;
        trace!(
            "sweep event {:?} at ({}, {})",
            v_event,
            self.mesh[v_event].s,
            self.mesh[v_event].t
        );

        // Look for a left-going edge that is already in the dictionary.
        let start = self.mesh[v_event].an_edge;
        let mut e = start;
        while self.mesh[e].active_region.is_none() {
            e = self.mesh.onext(e);
            if e == start {
                return self.connect_left_vertex(v_event);
            }
        }

        let reg_up = self.top_left_region(self.active_region(e)?)?;
        let reg = self.below(reg_up)?;
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, None)?;

        if self.mesh.onext(e_bottom_left) == e_top_left {
            self.connect_right_vertex(reg_up, e_bottom_left)
        } else {
            let first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true)
        }
    }

    /// The first region above every edge that shares `reg.e_up`'s origin.
    /// A temporary edge found there is replaced by a real connection.
    pub(super) fn top_left_region(&mut self, mut reg: RegionId) -> Result<RegionId, InternalError> {
        let org = self.mesh.org(self.e_up(reg));
        loop {
            reg = self.above(reg)?;
            if self.mesh.org(self.e_up(reg)) != org {
                break;
            }
        }

        if self.regions[reg].fix_upper_edge {
            let below = self.below(reg)?;
            let from = self.e_up(below).sym();
            let to = self.mesh.lnext(self.e_up(reg));
            let e = self.mesh.connect(from, to);
            self.fix_upper_edge(reg, e);
            reg = self.above(reg)?;
        }
        Ok(reg)
    }

    /// The first region above every edge that shares `reg.e_up`'s
    /// destination.
    pub(super) fn top_right_region(&self, mut reg: RegionId) -> Result<RegionId, InternalError> {
        let dst = self.mesh.dst(self.e_up(reg));
        loop {
            reg = self.above(reg)?;
            if self.mesh.dst(self.e_up(reg)) != dst {
                return Ok(reg);
            }
        }
    }

    /// Closes every region from `reg_first` downwards whose lower edge ends
    /// at the event, stopping at `reg_last` if given. The edges are spliced
    /// into the event's origin ring in dictionary order. Returns the lowest
    /// left-going edge.
    pub(super) fn finish_left_regions(
        &mut self,
        reg_first: RegionId,
        reg_last: Option<RegionId>,
    ) -> Result<EdgeId, InternalError> {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);

        while Some(reg_prev) != reg_last {
            self.regions[reg_prev].fix_upper_edge = false;
            let reg = self.below(reg_prev)?;
            let mut e = self.e_up(reg);

            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.regions[reg].fix_upper_edge {
                    self.finish_region(reg_prev)?;
                    break;
                }
                // The lower edge was temporary; connect it to the left
                // boundary instead.
                let lprev = self.mesh.lprev(e_prev);
                e = self.mesh.connect(lprev, e.sym());
                self.fix_upper_edge(reg, e);
            }

            if self.mesh.onext(e_prev) != e {
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                self.mesh.splice(e_prev, e);
            }
            self.finish_region(reg_prev)?;
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        Ok(e_prev)
    }

    /// Inserts the right-going edges from `e_first` up to (not including)
    /// `e_last`, counter-clockwise around their shared origin, below
    /// `reg_up`. Their regions get winding numbers and edges of equal slope
    /// are merged. `e_top_left` is the edge just above the new ones in the
    /// origin ring; `None` means there are no left-going edges.
    pub(super) fn add_right_edges(
        &mut self,
        reg_up: RegionId,
        e_first: EdgeId,
        e_last: EdgeId,
        e_top_left: Option<EdgeId>,
        clean_up: bool,
    ) -> Result<(), InternalError> {
        let mut e = e_first;
        loop {
            debug_assert!(vert_leq(self.mesh.org_point(e), self.mesh.dst_point(e)));
            self.add_region_below(reg_up, e.sym());
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = match e_top_left {
            Some(e) => e,
            None => {
                let below = self.below(reg_up)?;
                self.mesh.rprev(self.e_up(below))
            }
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.below(reg_prev)?;
            let e = self.e_up(reg).sym();
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Relink e directly below e_prev.
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                let prev_oprev = self.mesh.oprev(e_prev);
                self.mesh.splice(prev_oprev, e);
            }

            let winding = self.regions[reg_prev].winding - self.mesh[e].winding;
            let inside = self.is_inside(winding);
            self.regions[reg].winding = winding;
            self.regions[reg].inside = inside;

            self.regions[reg_prev].dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev)? {
                add_winding(&mut *self.mesh, e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.regions[reg_prev].dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev)?;
        }
        Ok(())
    }

    /// The event has left-going edges but none going right. A temporary
    /// edge is added to the nearer of the two bounding edges' right ends
    /// unless one of them passes through the event.
    pub(super) fn connect_right_vertex(
        &mut self,
        mut reg_up: RegionId,
        mut e_bottom_left: EdgeId,
    ) -> Result<(), InternalError> {
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.below(reg_up)?;
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up)?;
        }

        let event = self.mesh[self.event].point();
        if vert_eq(self.mesh.org_point(e_up), event) {
            let oprev = self.mesh.oprev(e_top_left);
            self.mesh.splice(oprev, e_up);
            reg_up = self.top_left_region(reg_up)?;
            let below = self.below(reg_up)?;
            e_top_left = self.e_up(below);
            self.finish_left_regions(below, Some(reg_lo))?;
            degenerate = true;
        }
        if vert_eq(self.mesh.org_point(e_lo), event) {
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, oprev);
            e_bottom_left = self.finish_left_regions(reg_lo, None)?;
            degenerate = true;
        }
        if degenerate {
            let first = self.mesh.onext(e_bottom_left);
            return self.add_right_edges(reg_up, first, e_top_left, Some(e_top_left), true);
        }

        let target = if vert_leq(self.mesh.org_point(e_lo), self.mesh.org_point(e_up)) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let lprev = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(lprev, target);

        // Cleanup is deferred so the new edge survives until it is marked.
        let onext = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, onext, Some(onext), false)?;
        let reg_new = self.active_region(e_new.sym())?;
        self.regions[reg_new].fix_upper_edge = true;
        self.walk_dirty_regions(reg_up)
    }

    /// The event lies on the upper edge of `reg_up` (or on its endpoints).
    fn connect_left_degenerate(
        &mut self,
        mut reg_up: RegionId,
        v_event: VertId,
    ) -> Result<(), InternalError> {
        let e = self.e_up(reg_up);
        let event = self.mesh[v_event].point();

        if vert_eq(self.mesh.org_point(e), event) {
            // An unprocessed vertex at the same place: merge and wait for it
            // to come out of the queue.
            let an_edge = self.mesh[v_event].an_edge;
            self.mesh.splice(e, an_edge);
            return Ok(());
        }

        if !vert_eq(self.mesh.dst_point(e), event) {
            // Splice the event into the edge passing through it.
            self.mesh.split_edge(e.sym());
            if self.regions[reg_up].fix_upper_edge {
                let unused = self.mesh.onext(e);
                self.mesh.delete_edge(unused);
                self.regions[reg_up].fix_upper_edge = false;
            }
            let an_edge = self.mesh[v_event].an_edge;
            self.mesh.splice(an_edge, e);
            return self.sweep_event(v_event);
        }

        // The event coincides with the already processed e.dst: add its
        // right-going edges there.
        reg_up = self.top_right_region(reg_up)?;
        let reg = self.below(reg_up)?;
        let mut e_top_right = self.e_up(reg).sym();
        let e_last = self.mesh.onext(e_top_right);
        let mut e_top_left = Some(e_last);
        if self.regions[reg].fix_upper_edge {
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right);
            e_top_right = self.mesh.oprev(e_last);
        }
        let an_edge = self.mesh[v_event].an_edge;
        self.mesh.splice(an_edge, e_top_right);
        if !self.mesh.edge_goes_left(e_last) {
            e_top_left = None;
        }
        let first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, first, e_last, e_top_left, true)
    }

    /// Handles a vertex with only right-going edges: find the region that
    /// contains it and, if that region is inside, connect the vertex to the
    /// nearer right end of its bounding edges.
    pub(super) fn connect_left_vertex(&mut self, v_event: VertId) -> Result<(), InternalError> {
        let query = self.mesh[v_event].an_edge.sym();
        let node = {
            let mesh = &*self.mesh;
            let regions = &*self.regions;
            let event = self.event;
            self.dict
                .search(|r| edge_leq(mesh, event, query, regions[r].e_up))
        };
        let reg_up = self.dict.key(node).ok_or(InternalError::MissingRegion)?;
        // Only happens when every vertex projects onto one point.
        let Some(reg_lo) = self.region_below(reg_up) else {
            return Ok(());
        };
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);

        let event = self.mesh[v_event].point();
        if edge_sign(self.mesh.dst_point(e_up), event, self.mesh.org_point(e_up)) == 0.0 {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        let reg = if vert_leq(self.mesh.dst_point(e_lo), self.mesh.dst_point(e_up)) {
            reg_up
        } else {
            reg_lo
        };

        if self.regions[reg_up].inside || self.regions[reg].fix_upper_edge {
            let an_edge = self.mesh[v_event].an_edge;
            let e_new = if reg == reg_up {
                let to = self.mesh.lnext(e_up);
                self.mesh.connect(an_edge.sym(), to)
            } else {
                let from = self.mesh.dnext(e_lo);
                self.mesh.connect(from, an_edge).sym()
            };
            if self.regions[reg].fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let reg_new = self.add_region_below(reg_up, e_new);
                self.compute_winding(reg_new)?;
            }
            self.sweep_event(v_event)
        } else {
            // Outside the polygon: nothing to connect to.
            let an_edge = self.mesh[v_event].an_edge;
            self.add_right_edges(reg_up, an_edge, an_edge, None, true)
        }
    }
}
