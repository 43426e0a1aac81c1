// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line computation of the interior of a planar subdivision.
//
// Vertices are processed left to right in `vert_leq` order. The edges that
// cross the sweep line are kept in a dictionary ordered bottom to top; the
// strip between one such edge and the next one below it is an *active
// region*, which carries the winding number of that strip. When the sweep
// is done every face of the mesh has its `inside` flag set and every inside
// face is monotone in `s`.
//
// Submodules:
//   - `events`: per-vertex event handling (left and right vertices).
//   - `intersect`: splice and intersection repairs of the edge order.

mod events;
mod intersect;

use glam::Vec3;
use log::trace;

use crate::dict::Dict;
use crate::error::InternalError;
use crate::geom::{edge_eval, edge_sign, vert_eq, vert_leq, Point, Real};
use crate::handle::{EdgeId, NodeId, RegionId, VertId};
use crate::mesh::{Mesh, E_HEAD, F_HEAD, V_HEAD};
use crate::pool::Pool;
use crate::priorityq::{PriorityQueue, QueueKey};
use crate::tess::WindingRule;

/// The strip between `e_up` and the next edge below it in the dictionary.
#[derive(Clone, Debug)]
pub struct ActiveRegion {
    /// Upper edge, directed right to left.
    pub e_up: EdgeId,
    pub node_up: NodeId,
    pub winding: i32,
    pub inside: bool,
    /// One of the two far-away bounding regions.
    pub sentinel: bool,
    /// The upper or lower edge changed; the pair must be re-checked.
    pub dirty: bool,
    /// `e_up` is a temporary edge that will be replaced once a better
    /// connection for its right vertex is known.
    pub fix_upper_edge: bool,
}

impl ActiveRegion {
    fn new(e_up: EdgeId) -> Self {
        ActiveRegion {
            e_up,
            node_up: NodeId::new(0),
            winding: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }
}

/// Event queue entry. Queued vertices never move, so the position is
/// captured at insertion.
#[derive(Clone, Copy, Debug)]
pub struct VertexKey {
    pub point: Point,
    pub vert: VertId,
}

impl QueueKey for VertexKey {
    #[inline]
    fn leq(&self, other: &Self) -> bool {
        vert_leq(self.point, other.point)
    }
}

/// Called when an intersection vertex is created, with its combined
/// position, the `idx` of the four source vertices and their weights.
/// Returns the `idx` for the new vertex.
pub type CombineHook<'c> = dyn FnMut(Vec3, [u32; 4], [Real; 4]) -> u32 + 'c;

/// Storage of the sweep, kept between calls so allocations are reused.
#[derive(Default)]
pub struct SweepState {
    dict: Dict<RegionId>,
    regions: Pool<RegionId, ActiveRegion>,
    pq: PriorityQueue<VertexKey>,
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.dict.clear();
        self.regions.reset();
        self.pq.reset();
    }
}

/// Runs the sweep over `mesh`, whose vertices must already carry their
/// projected `s`/`t` coordinates inside `bounds`. On return every face is
/// classified and inside faces are monotone.
pub fn compute_interior(
    mesh: &mut Mesh,
    state: &mut SweepState,
    rule: WindingRule,
    bounds: (Point, Point),
    combine: &mut CombineHook<'_>,
) -> Result<(), InternalError> {
    state.reset();
    let SweepState { dict, regions, pq } = state;
    let mut sweep = Sweep {
        mesh,
        dict,
        regions,
        pq,
        rule,
        event: V_HEAD,
        combine,
    };
    let result = sweep.run(bounds);
    state.reset();
    result
}

/// Whether the region of `e1` lies at or below the region of `e2` at the
/// current event.
///
/// Edges whose destination is the event itself are ordered by slope; all
/// others by their height at the event's `s`.
fn edge_leq(mesh: &Mesh, event: VertId, e1: EdgeId, e2: EdgeId) -> bool {
    let ev = mesh[event].point();
    let (o1, d1) = (mesh.org_point(e1), mesh.dst_point(e1));
    let (o2, d2) = (mesh.org_point(e2), mesh.dst_point(e2));

    if mesh.dst(e1) == event {
        if mesh.dst(e2) == event {
            if vert_leq(o1, o2) {
                return edge_sign(d2, o1, o2) <= 0.0;
            }
            return edge_sign(d1, o2, o1) >= 0.0;
        }
        return edge_sign(d2, ev, o2) <= 0.0;
    }
    if mesh.dst(e2) == event {
        return edge_sign(d1, ev, o1) >= 0.0;
    }

    edge_eval(d1, ev, o1) >= edge_eval(d2, ev, o2)
}

/// `dst` absorbs the winding of `src` on both halves.
fn add_winding(mesh: &mut Mesh, dst: EdgeId, src: EdgeId) {
    mesh[dst].winding += mesh[src].winding;
    mesh[dst.sym()].winding += mesh[src.sym()].winding;
}

pub(crate) struct Sweep<'a, 'c> {
    mesh: &'a mut Mesh,
    dict: &'a mut Dict<RegionId>,
    regions: &'a mut Pool<RegionId, ActiveRegion>,
    pq: &'a mut PriorityQueue<VertexKey>,
    rule: WindingRule,
    /// The vertex currently being processed.
    event: VertId,
    combine: &'a mut CombineHook<'c>,
}

impl Sweep<'_, '_> {
    fn run(&mut self, bounds: (Point, Point)) -> Result<(), InternalError> {
        self.remove_degenerate_edges();
        self.init_priority_queue();
        self.init_edge_dict(bounds);

        while let Some(key) = self.pq.extract_min() {
            let v = key.vert;
            self.mesh[v].pq_handle = None;
            // Coincident vertices are merged before the event is handled.
            while let Some(next) = self.pq.minimum() {
                if !vert_eq(next.point, key.point) {
                    break;
                }
                self.pq.extract_min();
                self.mesh[next.vert].pq_handle = None;
                let (a, b) = (self.mesh[v].an_edge, self.mesh[next.vert].an_edge);
                self.mesh.splice(a, b);
            }
            self.sweep_event(v)?;
        }

        self.done_edge_dict()?;
        self.remove_degenerate_faces();
        Ok(())
    }

    // ─── regions ───

    #[inline]
    fn region_above(&self, reg: RegionId) -> Option<RegionId> {
        self.dict.key(self.dict.succ(self.regions[reg].node_up))
    }

    #[inline]
    fn region_below(&self, reg: RegionId) -> Option<RegionId> {
        self.dict.key(self.dict.pred(self.regions[reg].node_up))
    }

    #[inline]
    fn above(&self, reg: RegionId) -> Result<RegionId, InternalError> {
        self.region_above(reg).ok_or(InternalError::MissingRegion)
    }

    #[inline]
    fn below(&self, reg: RegionId) -> Result<RegionId, InternalError> {
        self.region_below(reg).ok_or(InternalError::MissingRegion)
    }

    #[inline]
    fn e_up(&self, reg: RegionId) -> EdgeId {
        self.regions[reg].e_up
    }

    fn active_region(&self, e: EdgeId) -> Result<RegionId, InternalError> {
        self.mesh[e].active_region.ok_or(InternalError::MissingActiveRegion)
    }

    /// Inserts a region for `e_new_up` directly below `reg_above`.
    fn add_region_below(&mut self, reg_above: RegionId, e_new_up: EdgeId) -> RegionId {
        let reg = self.regions.alloc(ActiveRegion::new(e_new_up));
        let mesh = &*self.mesh;
        let regions = &*self.regions;
        let event = self.event;
        let node = self.dict.insert_before(regions[reg_above].node_up, reg, |a, b| {
            edge_leq(mesh, event, regions[a].e_up, regions[b].e_up)
        });
        self.regions[reg].node_up = node;
        self.mesh[e_new_up].active_region = Some(reg);
        reg
    }

    fn delete_region(&mut self, reg: RegionId) {
        let r = &self.regions[reg];
        debug_assert!(!r.fix_upper_edge || self.mesh[r.e_up].winding == 0);
        let (e_up, node) = (r.e_up, r.node_up);
        self.mesh[e_up].active_region = None;
        self.dict.delete(node);
        self.regions.free(reg);
    }

    /// Replaces a temporary upper edge with `new_edge`.
    fn fix_upper_edge(&mut self, reg: RegionId, new_edge: EdgeId) {
        debug_assert!(self.regions[reg].fix_upper_edge);
        let old = self.e_up(reg);
        self.mesh.delete_edge(old);
        let r = &mut self.regions[reg];
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        self.mesh[new_edge].active_region = Some(reg);
    }

    #[inline]
    fn is_inside(&self, winding: i32) -> bool {
        self.rule.is_inside(winding)
    }

    fn compute_winding(&mut self, reg: RegionId) -> Result<(), InternalError> {
        let above = self.above(reg)?;
        let winding = self.regions[above].winding + self.mesh[self.e_up(reg)].winding;
        let inside = self.is_inside(winding);
        let r = &mut self.regions[reg];
        r.winding = winding;
        r.inside = inside;
        Ok(())
    }

    /// The region is leaving the sweep for good: its face takes the
    /// region's classification.
    fn finish_region(&mut self, reg: RegionId) -> Result<(), InternalError> {
        let e = self.e_up(reg);
        let f = self
            .mesh
            .lface(e)
            .ok_or(InternalError::BadTopology("finished region has no face"))?;
        self.mesh[f].inside = self.regions[reg].inside;
        self.mesh[f].an_edge = e;
        self.delete_region(reg);
        Ok(())
    }

    /// Takes `v` out of the event queue if it is still waiting there.
    fn dequeue(&mut self, v: VertId) -> Result<(), InternalError> {
        if let Some(handle) = self.mesh[v].pq_handle.take() {
            self.pq.remove(handle).ok_or(InternalError::StaleQueueHandle)?;
        }
        Ok(())
    }

    fn enqueue(&mut self, v: VertId) {
        let key = VertexKey {
            point: self.mesh[v].point(),
            vert: v,
        };
        self.mesh[v].pq_handle = Some(self.pq.insert(key));
    }

    // ─── setup and teardown ───

    /// Removes zero-length edges and contours of fewer than three edges.
    fn remove_degenerate_edges(&mut self) {
        let mesh = &mut *self.mesh;
        let mut e = mesh[E_HEAD].next;
        while e != E_HEAD {
            let mut e_next = mesh[e].next;
            let mut e_lnext = mesh.lnext(e);

            if vert_eq(mesh.org_point(e), mesh.dst_point(e)) && mesh.lnext(e_lnext) != e {
                trace!("removing zero-length edge {:?}", e);
                mesh.splice(e_lnext, e);
                mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = mesh.lnext(e);
            }
            if mesh.lnext(e_lnext) == e {
                trace!("removing degenerate contour at {:?}", e);
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == e_next.sym() {
                        e_next = mesh[e_next].next;
                    }
                    mesh.delete_edge(e_lnext);
                }
                if e == e_next || e == e_next.sym() {
                    e_next = mesh[e_next].next;
                }
                mesh.delete_edge(e);
            }
            e = e_next;
        }
    }

    fn init_priority_queue(&mut self) {
        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            self.enqueue(v);
            v = self.mesh[v].next;
        }
        self.pq.init();
    }

    /// A horizontal edge at height `t` spanning `[smin, smax]` that bounds
    /// the dictionary.
    fn add_sentinel(&mut self, smin: Real, smax: Real, t: Real) {
        let e = self.mesh.make_edge();
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        self.mesh[org].s = smax;
        self.mesh[org].t = t;
        self.mesh[dst].s = smin;
        self.mesh[dst].t = t;
        self.event = dst;

        let reg = self.regions.alloc(ActiveRegion {
            sentinel: true,
            ..ActiveRegion::new(e)
        });
        let mesh = &*self.mesh;
        let regions = &*self.regions;
        let event = self.event;
        let node = self
            .dict
            .insert(reg, |a, b| edge_leq(mesh, event, regions[a].e_up, regions[b].e_up));
        self.regions[reg].node_up = node;
    }

    fn init_edge_dict(&mut self, (bmin, bmax): (Point, Point)) {
        let w = (bmax.s - bmin.s) + 0.01;
        let h = (bmax.t - bmin.t) + 0.01;
        let smin = bmin.s - w;
        let smax = bmax.s + w;
        let tmin = bmin.t - h;
        let tmax = bmax.t + h;

        self.add_sentinel(smin, smax, tmin);
        self.add_sentinel(smin, smax, tmax);
    }

    /// After the last event only the sentinels remain, plus at most one
    /// temporary edge.
    fn done_edge_dict(&mut self) -> Result<(), InternalError> {
        let mut fixed_edges = 0;
        while let Some(reg) = self.dict.key(self.dict.min()) {
            let r = &self.regions[reg];
            if !r.sentinel {
                if !r.fix_upper_edge {
                    return Err(InternalError::ResidualRegion);
                }
                fixed_edges += 1;
                if fixed_edges > 1 {
                    return Err(InternalError::ResidualRegion);
                }
            }
            if r.winding != 0 {
                return Err(InternalError::ResidualWinding(r.winding));
            }
            self.delete_region(reg);
        }
        Ok(())
    }

    /// Deletes faces bounded by only two edges, merging their winding into
    /// the neighbouring edge.
    fn remove_degenerate_faces(&mut self) {
        let mesh = &mut *self.mesh;
        let mut f = mesh[F_HEAD].next;
        while f != F_HEAD {
            let f_next = mesh[f].next;
            let e = mesh[f].an_edge;
            if mesh.lnext(mesh.lnext(e)) == e {
                let onext = mesh.onext(e);
                add_winding(mesh, onext, e);
                mesh.delete_edge(e);
            }
            f = f_next;
        }
    }
}
