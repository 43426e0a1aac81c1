// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh in the Guibas/Stolfi style.
//
// Storage:
//   - Vertices, faces and half-edges live in Vec arenas addressed by typed
//     ids. Half-edges come in pairs at indices 2k and 2k+1, so `e.sym()` is
//     a bit flip.
//   - Index 0 of every arena is a dummy list head: vertices and faces form
//     circular doubly-linked lists through V_HEAD and F_HEAD. Edge pairs are
//     linked through E_HEAD; the primary half's `next` is the next pair and
//     the secondary half's `next` is the previous pair.
//   - Deleted elements are unlinked but their slots are only recycled when
//     the whole mesh is reset.
//
// Orientation: `onext` is the next edge counter-clockwise around the origin,
// `lnext` the next edge counter-clockwise around the left face.

mod delaunay;
mod tessellate;

use std::ops::{Index, IndexMut};

use glam::Vec3;

use crate::error::InternalError;
use crate::geom::{Point, Real};
use crate::handle::{EdgeId, FaceId, PqHandle, RegionId, VertId};

pub const V_HEAD: VertId = VertId::new(0);
pub const F_HEAD: FaceId = FaceId::new(0);
pub const E_HEAD: EdgeId = EdgeId::new(0);

/// Sentinel for "no output id" and "no source vertex".
pub const UNDEF: u32 = u32::MAX;

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertId,
    pub prev: VertId,
    /// Some edge with this vertex as origin.
    pub an_edge: EdgeId,
    pub coords: Vec3,
    pub s: Real,
    pub t: Real,
    /// Live while the vertex waits in the event queue.
    pub pq_handle: Option<PqHandle>,
    /// Dense output id.
    pub n: u32,
    /// Index of the input vertex, or of a synthesized payload slot.
    pub idx: u32,
}

impl Vertex {
    fn head() -> Self {
        Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            an_edge: E_HEAD,
            coords: Vec3::ZERO,
            s: 0.0,
            t: 0.0,
            pq_handle: None,
            n: UNDEF,
            idx: UNDEF,
        }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.s, self.t)
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceId,
    pub prev: FaceId,
    pub an_edge: EdgeId,
    pub n: u32,
    pub inside: bool,
}

impl Face {
    fn head() -> Self {
        Face {
            next: F_HEAD,
            prev: F_HEAD,
            an_edge: E_HEAD,
            n: UNDEF,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub next: EdgeId,
    pub onext: EdgeId,
    pub lnext: EdgeId,
    pub org: VertId,
    /// `None` once the face has been zapped.
    pub lface: Option<FaceId>,
    pub active_region: Option<RegionId>,
    /// Change in winding number when crossing from the right face to the
    /// left face.
    pub winding: i32,
    pub mark: bool,
}

impl HalfEdge {
    fn unlinked(id: EdgeId, next: EdgeId) -> Self {
        HalfEdge {
            next,
            onext: id,
            lnext: id.sym(),
            org: V_HEAD,
            lface: None,
            active_region: None,
            winding: 0,
            mark: false,
        }
    }
}

pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<HalfEdge>,
}

impl Index<VertId> for Mesh {
    type Output = Vertex;
    #[inline(always)]
    fn index(&self, v: VertId) -> &Vertex {
        &self.verts[v.idx()]
    }
}

impl IndexMut<VertId> for Mesh {
    #[inline(always)]
    fn index_mut(&mut self, v: VertId) -> &mut Vertex {
        &mut self.verts[v.idx()]
    }
}

impl Index<FaceId> for Mesh {
    type Output = Face;
    #[inline(always)]
    fn index(&self, f: FaceId) -> &Face {
        &self.faces[f.idx()]
    }
}

impl IndexMut<FaceId> for Mesh {
    #[inline(always)]
    fn index_mut(&mut self, f: FaceId) -> &mut Face {
        &mut self.faces[f.idx()]
    }
}

impl Index<EdgeId> for Mesh {
    type Output = HalfEdge;
    #[inline(always)]
    fn index(&self, e: EdgeId) -> &HalfEdge {
        &self.edges[e.idx()]
    }
}

impl IndexMut<EdgeId> for Mesh {
    #[inline(always)]
    fn index_mut(&mut self, e: EdgeId) -> &mut HalfEdge {
        &mut self.edges[e.idx()]
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        let mut mesh = Mesh {
            verts: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
        };
        mesh.push_heads();
        mesh
    }

    fn push_heads(&mut self) {
        self.verts.push(Vertex::head());
        self.faces.push(Face::head());
        self.edges.push(HalfEdge::unlinked(E_HEAD, E_HEAD));
        self.edges.push(HalfEdge::unlinked(E_HEAD.sym(), E_HEAD));
    }

    /// Drops all elements but keeps the arenas' capacity.
    pub fn reset(&mut self) {
        self.verts.clear();
        self.faces.clear();
        self.edges.clear();
        self.push_heads();
    }

    pub fn is_empty(&self) -> bool {
        self.verts[V_HEAD.idx()].next == V_HEAD
    }

    // ─── navigation ───

    #[inline(always)]
    pub fn onext(&self, e: EdgeId) -> EdgeId {
        self[e].onext
    }

    #[inline(always)]
    pub fn lnext(&self, e: EdgeId) -> EdgeId {
        self[e].lnext
    }

    #[inline(always)]
    pub fn org(&self, e: EdgeId) -> VertId {
        self[e].org
    }

    #[inline(always)]
    pub fn dst(&self, e: EdgeId) -> VertId {
        self[e.sym()].org
    }

    #[inline(always)]
    pub fn lface(&self, e: EdgeId) -> Option<FaceId> {
        self[e].lface
    }

    #[inline(always)]
    pub fn rface(&self, e: EdgeId) -> Option<FaceId> {
        self[e.sym()].lface
    }

    #[inline(always)]
    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        self[e.sym()].lnext
    }

    #[inline(always)]
    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        self[e].onext.sym()
    }

    #[inline(always)]
    pub fn rprev(&self, e: EdgeId) -> EdgeId {
        self[e.sym()].onext
    }

    #[inline(always)]
    pub fn dnext(&self, e: EdgeId) -> EdgeId {
        self.rprev(e).sym()
    }

    #[inline(always)]
    pub fn org_point(&self, e: EdgeId) -> Point {
        self[self.org(e)].point()
    }

    #[inline(always)]
    pub fn dst_point(&self, e: EdgeId) -> Point {
        self[self.dst(e)].point()
    }

    /// Whether the face left of `e` exists and is marked inside.
    #[inline]
    pub fn left_inside(&self, e: EdgeId) -> bool {
        self.lface(e).map_or(false, |f| self[f].inside)
    }

    #[inline]
    pub fn right_inside(&self, e: EdgeId) -> bool {
        self.left_inside(e.sym())
    }

    pub fn vertex_ids(&self) -> VertIter<'_> {
        VertIter {
            mesh: self,
            cur: self[V_HEAD].next,
        }
    }

    pub fn face_ids(&self) -> FaceIter<'_> {
        FaceIter {
            mesh: self,
            cur: self[F_HEAD].next,
        }
    }

    /// Number of edges around `f`.
    pub fn face_len(&self, f: FaceId) -> usize {
        let start = self[f].an_edge;
        let mut e = start;
        let mut n = 0;
        loop {
            n += 1;
            e = self.lnext(e);
            if e == start {
                return n;
            }
        }
    }

    // ─── primitive list surgery ───

    /// Allocates an isolated edge pair and links it into the edge list
    /// before `e_next`.
    fn make_edge_pair(&mut self, e_next: EdgeId) -> EdgeId {
        let e_next = e_next.primary();
        let e_prev = self[e_next.sym()].next;
        let e = EdgeId::new(self.edges.len() as u32);
        self.edges.push(HalfEdge::unlinked(e, e_next));
        self.edges.push(HalfEdge::unlinked(e.sym(), e_prev));
        self[e_prev].next = e;
        self[e_next.sym()].next = e;
        e
    }

    /// Exchanges `a.onext` and `b.onext`. This either joins two origin rings
    /// into one or splits one in two, and does the opposite to the left-face
    /// rings.
    fn splice_rings(&mut self, a: EdgeId, b: EdgeId) {
        let a_onext = self[a].onext;
        let b_onext = self[b].onext;
        self[a_onext.sym()].lnext = b;
        self[b_onext.sym()].lnext = a;
        self[a].onext = b_onext;
        self[b].onext = a_onext;
    }

    /// Creates a vertex for the origin ring of `e_orig`, placed before
    /// `v_next` in the vertex list.
    fn make_vertex(&mut self, e_orig: EdgeId, v_next: VertId) -> VertId {
        let v_new = VertId::new(self.verts.len() as u32);
        let v_prev = self[v_next].prev;
        self.verts.push(Vertex {
            next: v_next,
            prev: v_prev,
            an_edge: e_orig,
            ..Vertex::head()
        });
        self[v_prev].next = v_new;
        self[v_next].prev = v_new;

        let mut e = e_orig;
        loop {
            self[e].org = v_new;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
        v_new
    }

    /// Creates a face for the left ring of `e_orig`, placed before `f_next`.
    /// The new face inherits `f_next.inside`, which is what callers want when
    /// one face has just been split in two.
    fn make_face(&mut self, e_orig: EdgeId, f_next: FaceId) -> FaceId {
        let f_new = FaceId::new(self.faces.len() as u32);
        let f_prev = self[f_next].prev;
        let inside = self[f_next].inside;
        self.faces.push(Face {
            next: f_next,
            prev: f_prev,
            an_edge: e_orig,
            n: UNDEF,
            inside,
        });
        self[f_prev].next = f_new;
        self[f_next].prev = f_new;

        let mut e = e_orig;
        loop {
            self[e].lface = Some(f_new);
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
        f_new
    }

    fn kill_edge(&mut self, e_del: EdgeId) {
        let e_del = e_del.primary();
        let e_next = self[e_del].next;
        let e_prev = self[e_del.sym()].next;
        self[e_next.sym()].next = e_prev;
        self[e_prev].next = e_next;
    }

    fn kill_vertex(&mut self, v_del: VertId, new_org: Option<VertId>) {
        if let Some(org) = new_org {
            let start = self[v_del].an_edge;
            let mut e = start;
            loop {
                self[e].org = org;
                e = self.onext(e);
                if e == start {
                    break;
                }
            }
        }
        let Vertex { prev, next, .. } = self[v_del];
        self[next].prev = prev;
        self[prev].next = next;
    }

    fn kill_face(&mut self, f_del: FaceId, new_lface: Option<FaceId>) {
        let start = self[f_del].an_edge;
        let mut e = start;
        loop {
            self[e].lface = new_lface;
            e = self.lnext(e);
            if e == start {
                break;
            }
        }
        let Face { prev, next, .. } = self[f_del];
        self[next].prev = prev;
        self[prev].next = next;
    }

    // ─── mesh operations ───

    /// A new edge with two new vertices and a single face on both sides.
    pub fn make_edge(&mut self) -> EdgeId {
        let e = self.make_edge_pair(E_HEAD);
        self.make_vertex(e, V_HEAD);
        self.make_vertex(e.sym(), V_HEAD);
        self.make_face(e, F_HEAD);
        e
    }

    /// The basic topology change. If `e_org` and `e_dst` have distinct
    /// origins they are merged (destroying `e_dst.org`), otherwise that
    /// vertex is split in two. Likewise their left faces are merged or split.
    pub fn splice(&mut self, e_org: EdgeId, e_dst: EdgeId) {
        if e_org == e_dst {
            return;
        }

        let mut joining_vertices = false;
        let org_org = self.org(e_org);
        let dst_org = self.org(e_dst);
        if dst_org != org_org {
            joining_vertices = true;
            self.kill_vertex(dst_org, Some(org_org));
        }

        let mut joining_loops = false;
        let org_face = self.lface(e_org);
        let dst_face = self.lface(e_dst);
        if dst_face != org_face {
            joining_loops = true;
            if let Some(f) = dst_face {
                self.kill_face(f, org_face);
            }
        }

        self.splice_rings(e_dst, e_org);

        if !joining_vertices {
            self.make_vertex(e_dst, org_org);
            self[org_org].an_edge = e_org;
        }
        if !joining_loops {
            if let Some(f) = org_face {
                self.make_face(e_dst, f);
                self[f].an_edge = e_org;
            }
        }
    }

    /// Removes `e_del` together with anything it leaves isolated. Faces on
    /// both sides are joined, or the face is split if both sides were the
    /// same.
    pub fn delete_edge(&mut self, e_del: EdgeId) {
        let e_del_sym = e_del.sym();

        let mut joining_loops = false;
        let lface = self.lface(e_del);
        let rface = self.rface(e_del);
        if lface != rface {
            joining_loops = true;
            if let Some(f) = lface {
                self.kill_face(f, rface);
            }
        }

        if self.onext(e_del) == e_del {
            let org = self.org(e_del);
            self.kill_vertex(org, None);
        } else {
            let oprev = self.oprev(e_del);
            if let Some(r) = self.rface(e_del) {
                self[r].an_edge = oprev;
            }
            let org = self.org(e_del);
            self[org].an_edge = self.onext(e_del);

            self.splice_rings(e_del, oprev);
            if !joining_loops {
                if let Some(f) = self.lface(e_del) {
                    self.make_face(e_del, f);
                }
            }
        }

        if self.onext(e_del_sym) == e_del_sym {
            let org = self.org(e_del_sym);
            self.kill_vertex(org, None);
            if let Some(f) = self.lface(e_del_sym) {
                self.kill_face(f, None);
            }
        } else {
            let oprev = self.oprev(e_del_sym);
            if let Some(f) = self.lface(e_del) {
                self[f].an_edge = oprev;
            }
            let org = self.org(e_del_sym);
            self[org].an_edge = self.onext(e_del_sym);
            self.splice_rings(e_del_sym, oprev);
        }

        self.kill_edge(e_del);
    }

    /// New edge `e_new` from `e_org.dst` to a new vertex, such that
    /// `e_new == e_org.lnext`. The new vertex has no coordinates yet.
    pub fn add_edge_vertex(&mut self, e_org: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new.sym();

        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);

        let dst = self.dst(e_org);
        self[e_new].org = dst;
        self.make_vertex(e_new_sym, dst);
        let lface = self.lface(e_org);
        self[e_new].lface = lface;
        self[e_new_sym].lface = lface;
        e_new
    }

    /// Splits `e_org` in two at a new vertex. `e_org` keeps its origin and
    /// now ends at the new vertex; the returned edge continues to the old
    /// destination. Windings are copied.
    pub fn split_edge(&mut self, e_org: EdgeId) -> EdgeId {
        let temp = self.add_edge_vertex(e_org);
        let e_new = temp.sym();

        let e_org_sym = e_org.sym();
        let oprev = self.oprev(e_org_sym);
        self.splice_rings(e_org_sym, oprev);
        self.splice_rings(e_org_sym, e_new);

        let new_org = self.org(e_new);
        self[e_org_sym].org = new_org;
        let new_dst = self.dst(e_new);
        self[new_dst].an_edge = e_new.sym();
        let rface = self.rface(e_org);
        self[e_new.sym()].lface = rface;
        self[e_new].winding = self[e_org].winding;
        self[e_new.sym()].winding = self[e_org_sym].winding;
        e_new
    }

    /// New edge from `e_org.dst` to `e_dst.org`, returned with `e_org` as
    /// its `lprev`. Splits the shared left face, or joins two faces into one.
    pub fn connect(&mut self, e_org: EdgeId, e_dst: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new.sym();

        let mut joining_loops = false;
        let org_face = self.lface(e_org);
        let dst_face = self.lface(e_dst);
        if dst_face != org_face {
            joining_loops = true;
            if let Some(f) = dst_face {
                self.kill_face(f, org_face);
            }
        }

        let lnext = self.lnext(e_org);
        self.splice_rings(e_new, lnext);
        self.splice_rings(e_new_sym, e_dst);

        self[e_new].org = self.dst(e_org);
        self[e_new_sym].org = self.org(e_dst);
        self[e_new].lface = org_face;
        self[e_new_sym].lface = org_face;

        if let Some(f) = org_face {
            self[f].an_edge = e_new_sym;
            if !joining_loops {
                self.make_face(e_new, f);
            }
        }
        e_new
    }

    /// Destroys face `f_zap`. Its edges lose their left face; edges left
    /// with no face on either side are deleted along with any isolated
    /// vertices.
    pub fn zap_face(&mut self, f_zap: FaceId) {
        let start = self[f_zap].an_edge;
        let mut e_next = self.lnext(start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self[e].lface = None;
            if self.rface(e).is_none() {
                if self.onext(e) == e {
                    let org = self.org(e);
                    self.kill_vertex(org, None);
                } else {
                    let org = self.org(e);
                    self[org].an_edge = self.onext(e);
                    let oprev = self.oprev(e);
                    self.splice_rings(e, oprev);
                }
                let e_sym = e.sym();
                if self.onext(e_sym) == e_sym {
                    let org = self.org(e_sym);
                    self.kill_vertex(org, None);
                } else {
                    let org = self.org(e_sym);
                    self[org].an_edge = self.onext(e_sym);
                    let oprev = self.oprev(e_sym);
                    self.splice_rings(e_sym, oprev);
                }
                self.kill_edge(e);
            }
            if e == start {
                break;
            }
        }

        let Face { prev, next, .. } = self[f_zap];
        self[next].prev = prev;
        self[prev].next = next;
    }

    /// Validates the ring invariants of every face, vertex and edge.
    pub fn check(&self) -> Result<(), InternalError> {
        let ring_ok = |e: EdgeId| {
            e.sym() != e
                && e.sym().sym() == e
                && self.onext(self.lnext(e)).sym() == e
                && self.lnext(self.onext(e).sym()) == e
        };
        let limit = self.edges.len() + 1;

        let mut f_prev = F_HEAD;
        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            if self[f].prev != f_prev {
                return Err(InternalError::BadTopology("face list back-link"));
            }
            let start = self[f].an_edge;
            let mut e = start;
            let mut steps = 0;
            loop {
                if !ring_ok(e) {
                    return Err(InternalError::BadTopology("face ring"));
                }
                if self.lface(e) != Some(f) {
                    return Err(InternalError::BadTopology("edge left face"));
                }
                e = self.lnext(e);
                steps += 1;
                if e == start {
                    break;
                }
                if steps > limit {
                    return Err(InternalError::BadTopology("unterminated face ring"));
                }
            }
            f_prev = f;
            f = self[f].next;
        }
        if self[F_HEAD].prev != f_prev {
            return Err(InternalError::BadTopology("face list tail"));
        }

        let mut v_prev = V_HEAD;
        let mut v = self[V_HEAD].next;
        while v != V_HEAD {
            if self[v].prev != v_prev {
                return Err(InternalError::BadTopology("vertex list back-link"));
            }
            let start = self[v].an_edge;
            let mut e = start;
            let mut steps = 0;
            loop {
                if !ring_ok(e) {
                    return Err(InternalError::BadTopology("vertex ring"));
                }
                if self.org(e) != v {
                    return Err(InternalError::BadTopology("edge origin"));
                }
                e = self.onext(e);
                steps += 1;
                if e == start {
                    break;
                }
                if steps > limit {
                    return Err(InternalError::BadTopology("unterminated vertex ring"));
                }
            }
            v_prev = v;
            v = self[v].next;
        }
        if self[V_HEAD].prev != v_prev {
            return Err(InternalError::BadTopology("vertex list tail"));
        }

        let mut e_prev = E_HEAD;
        let mut e = self[E_HEAD].next;
        while e != E_HEAD {
            if self[e.sym()].next != e_prev {
                return Err(InternalError::BadTopology("edge list back-link"));
            }
            if !ring_ok(e) || self.org(e) == V_HEAD || self.dst(e) == V_HEAD {
                return Err(InternalError::BadTopology("edge ring"));
            }
            e_prev = e;
            e = self[e].next;
        }
        if self[E_HEAD.sym()].next != e_prev {
            return Err(InternalError::BadTopology("edge list tail"));
        }
        Ok(())
    }
}

pub struct VertIter<'a> {
    mesh: &'a Mesh,
    cur: VertId,
}

impl Iterator for VertIter<'_> {
    type Item = VertId;

    fn next(&mut self) -> Option<VertId> {
        if self.cur == V_HEAD {
            return None;
        }
        let v = self.cur;
        self.cur = self.mesh[v].next;
        Some(v)
    }
}

pub struct FaceIter<'a> {
    mesh: &'a Mesh,
    cur: FaceId,
}

impl Iterator for FaceIter<'_> {
    type Item = FaceId;

    fn next(&mut self) -> Option<FaceId> {
        if self.cur == F_HEAD {
            return None;
        }
        let f = self.cur;
        self.cur = self.mesh[f].next;
        Some(f)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A closed polygon loop in the mesh, built the way contours are added.
    pub(crate) fn polygon(mesh: &mut Mesh, pts: &[(Real, Real)]) -> EdgeId {
        let mut e_opt: Option<EdgeId> = None;
        for &(s, t) in pts {
            let e = match e_opt {
                None => {
                    let e = mesh.make_edge();
                    mesh.splice(e, e.sym());
                    e
                }
                Some(prev) => {
                    mesh.split_edge(prev);
                    mesh.lnext(prev)
                }
            };
            let org = mesh.org(e);
            mesh[org].coords = Vec3::new(s, t, 0.0);
            mesh[org].s = s;
            mesh[org].t = t;
            mesh[e].winding = 1;
            mesh[e.sym()].winding = -1;
            e_opt = Some(e);
        }
        e_opt.unwrap_or(E_HEAD)
    }

    #[test]
    fn new_mesh_is_empty_and_consistent() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_ids().count(), 0);
        mesh.check().unwrap();
    }

    #[test]
    fn make_edge_creates_two_vertices_one_face() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        assert_eq!(mesh.vertex_ids().count(), 2);
        assert_eq!(mesh.face_ids().count(), 1);
        assert_ne!(mesh.org(e), mesh.dst(e));
        assert_eq!(mesh.lface(e), mesh.rface(e));
        assert_eq!(mesh.lnext(e), e.sym());
        assert_eq!(mesh.onext(e), e);
        mesh.check().unwrap();
    }

    #[test]
    fn self_splice_closes_a_loop_into_two_faces() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        mesh.splice(e, e.sym());
        assert_eq!(mesh.vertex_ids().count(), 1);
        assert_eq!(mesh.face_ids().count(), 2);
        assert_eq!(mesh.org(e), mesh.dst(e));
        mesh.check().unwrap();
    }

    #[test]
    fn triangle_loop_has_two_faces_of_three_edges() {
        let mut mesh = Mesh::new();
        polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(mesh.vertex_ids().count(), 3);
        let faces: Vec<_> = mesh.face_ids().collect();
        assert_eq!(faces.len(), 2);
        for f in faces {
            assert_eq!(mesh.face_len(f), 3);
        }
        mesh.check().unwrap();
    }

    #[test]
    fn split_edge_inserts_a_vertex_and_copies_winding() {
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        let before = mesh.vertex_ids().count();
        let e_new = mesh.split_edge(e);
        assert_eq!(mesh.vertex_ids().count(), before + 1);
        assert_eq!(mesh.dst(e), mesh.org(e_new));
        assert_eq!(mesh.lnext(e), e_new);
        assert_eq!(mesh[e_new].winding, mesh[e].winding);
        assert_eq!(mesh[e_new.sym()].winding, mesh[e.sym()].winding);
        mesh.check().unwrap();
    }

    #[test]
    fn connect_splits_a_face() {
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let f = mesh.lface(e).unwrap();
        assert_eq!(mesh.face_len(f), 4);
        let e2 = mesh.lnext(mesh.lnext(mesh.lnext(e)));
        let diag = mesh.connect(e, e2);
        assert_eq!(mesh.face_ids().count(), 3);
        assert_eq!(mesh.org(diag), mesh.dst(e));
        assert_eq!(mesh.dst(diag), mesh.org(e2));
        assert_eq!(mesh.face_len(mesh.lface(diag).unwrap()), 3);
        assert_eq!(mesh.face_len(mesh.rface(diag).unwrap()), 3);
        mesh.check().unwrap();
    }

    #[test]
    fn delete_edge_rejoins_faces() {
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let e2 = mesh.lnext(mesh.lnext(mesh.lnext(e)));
        let diag = mesh.connect(e, e2);
        mesh.delete_edge(diag);
        assert_eq!(mesh.face_ids().count(), 2);
        assert_eq!(mesh.vertex_ids().count(), 4);
        mesh.check().unwrap();
    }

    #[test]
    fn delete_isolated_edge_removes_everything() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        mesh.delete_edge(e);
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_ids().count(), 0);
        assert_eq!(mesh[E_HEAD].next, E_HEAD);
        mesh.check().unwrap();
    }

    #[test]
    fn splicing_two_loops_merges_vertices() {
        let mut mesh = Mesh::new();
        let a = polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let b = polygon(&mut mesh, &[(0.0, 0.0), (-1.0, 0.0), (0.0, -1.0)]);
        assert_eq!(mesh.vertex_ids().count(), 6);
        mesh.splice(a, b);
        assert_eq!(mesh.vertex_ids().count(), 5);
        assert_eq!(mesh.org(a), mesh.org(b));
        mesh.check().unwrap();
    }

    #[test]
    fn zap_face_removes_edges_with_no_remaining_face() {
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let inner = mesh.lface(e).unwrap();
        let outer = mesh.rface(e).unwrap();
        mesh.zap_face(inner);
        assert_eq!(mesh.face_ids().count(), 1);
        mesh.zap_face(outer);
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_ids().count(), 0);
        mesh.check().unwrap();
    }

    #[test]
    fn reset_keeps_the_heads_only() {
        let mut mesh = Mesh::new();
        polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        mesh.reset();
        assert!(mesh.is_empty());
        assert_eq!(mesh.edges.len(), 2);
        mesh.check().unwrap();
    }
}
