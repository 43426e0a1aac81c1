// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Edge-flip refinement of a triangulation towards constrained Delaunay.
// Only edges with an inside face on both sides are ever flipped, so the
// contour edges act as constraints.

use super::{Mesh, F_HEAD};
use crate::geom::{Point, Real};
use crate::handle::EdgeId;

/// Positive when `v` lies inside the circle through `v0`, `v1`, `v2`
/// (counter-clockwise), negative outside, zero when cocircular.
pub fn in_circle(v: Point, v0: Point, v1: Point, v2: Point) -> Real {
    let (adx, ady) = (v0.s - v.s, v0.t - v.t);
    let (bdx, bdy) = (v1.s - v.s, v1.t - v.t);
    let (cdx, cdy) = (v2.s - v.s, v2.t - v.t);

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * bc_det + b_lift * ca_det + c_lift * ab_det
}

impl Mesh {
    /// An edge with inside faces on both sides.
    pub fn edge_is_internal(&self, e: EdgeId) -> bool {
        self.left_inside(e) && self.right_inside(e)
    }

    /// The apex opposite `e` in the right triangle lies strictly outside the
    /// circumcircle of the left triangle.
    pub fn edge_is_locally_delaunay(&self, e: EdgeId) -> bool {
        let opposite = self.org_point(self.lnext(self.lnext(e.sym())));
        let v0 = self.org_point(self.lnext(e));
        let v1 = self.org_point(self.lnext(self.lnext(e)));
        let v2 = self.org_point(e);
        in_circle(opposite, v0, v1, v2) < 0.0
    }

    /// Replaces the diagonal `edge` of the quad formed by its two triangles
    /// with the other diagonal. Both faces must be triangles.
    pub fn flip_edge(&mut self, edge: EdgeId) {
        let a0 = edge;
        let a1 = self.lnext(a0);
        let a2 = self.lnext(a1);
        let b0 = edge.sym();
        let b1 = self.lnext(b0);
        let b2 = self.lnext(b1);
        debug_assert!(self.lnext(a2) == a0 && self.lnext(b2) == b0);

        let a_org = self.org(a0);
        let a_opp = self.org(a2);
        let b_org = self.org(b0);
        let b_opp = self.org(b2);
        let fa = self.lface(a0);
        let fb = self.lface(b0);

        self[a0].org = b_opp;
        self[a0].onext = b1.sym();
        self[b0].org = a_opp;
        self[b0].onext = a1.sym();
        self[a2].onext = b0;
        self[b2].onext = a0;
        self[b1].onext = a2.sym();
        self[a1].onext = b2.sym();

        self[a0].lnext = a2;
        self[a2].lnext = b1;
        self[b1].lnext = a0;
        self[b0].lnext = b2;
        self[b2].lnext = a1;
        self[a1].lnext = b0;

        self[a1].lface = fb;
        self[b1].lface = fa;
        if let Some(f) = fa {
            self[f].an_edge = a0;
        }
        if let Some(f) = fb {
            self[f].an_edge = b0;
        }

        if self[a_org].an_edge == a0 {
            self[a_org].an_edge = b1;
        }
        if self[b_org].an_edge == b0 {
            self[b_org].an_edge = a1;
        }
    }

    /// Flips non-Delaunay interior edges until none remain or the iteration
    /// budget (square of the inside face count) runs out.
    pub fn refine_delaunay(&mut self) {
        let mut stack: Vec<EdgeId> = Vec::new();
        let mut inside_faces = 0usize;

        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            if self[f].inside {
                let start = self[f].an_edge;
                let mut e = start;
                loop {
                    let internal = self.edge_is_internal(e);
                    self[e].mark = internal;
                    if internal && !self[e.sym()].mark {
                        stack.push(e);
                    }
                    e = self.lnext(e);
                    if e == start {
                        break;
                    }
                }
                inside_faces += 1;
            }
            f = self[f].next;
        }

        let max_iter = inside_faces * inside_faces;
        let mut iter = 0;
        while iter < max_iter {
            let Some(e) = stack.pop() else { break };
            self[e].mark = false;
            self[e.sym()].mark = false;
            if !self.edge_is_locally_delaunay(e) {
                self.flip_edge(e);
                let opposite = [
                    self.lnext(e),
                    self.lprev(e),
                    self.lnext(e.sym()),
                    self.lprev(e.sym()),
                ];
                for nb in opposite {
                    if !self[nb].mark && self.edge_is_internal(nb) {
                        self[nb].mark = true;
                        self[nb.sym()].mark = true;
                        stack.push(nb);
                    }
                }
            }
            iter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::polygon;
    use super::*;

    fn p(s: Real, t: Real) -> Point {
        Point::new(s, t)
    }

    #[test]
    fn in_circle_signs() {
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        assert!(in_circle(p(0.5, 0.5), a, b, c) > 0.0);
        assert!(in_circle(p(5.0, 5.0), a, b, c) < 0.0);
        assert_eq!(in_circle(p(2.0, 2.0), a, b, c), 0.0);
    }

    #[test]
    fn boundary_edges_are_not_internal_from_either_side() {
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)]);
        let f = mesh.lface(e).unwrap();
        mesh[f].inside = true;
        assert!(mesh.left_inside(e) && !mesh.right_inside(e));
        assert!(!mesh.edge_is_internal(e));
        assert!(!mesh.edge_is_internal(e.sym()));

        mesh.tessellate_interior().unwrap();
        let diagonals = mesh
            .face_ids()
            .filter(|&f| mesh[f].inside)
            .flat_map(|f| {
                let start = mesh[f].an_edge;
                [start, mesh.lnext(start), mesh.lnext(mesh.lnext(start))]
            })
            .filter(|&e| mesh.edge_is_internal(e))
            .count();
        // The one diagonal, seen from each of its two triangles.
        assert_eq!(diagonals, 2);
    }

    #[test]
    fn flip_fixes_a_sliver_diagonal() {
        // A kite whose fan triangulation from the far-left vertex produces a
        // long diagonal; the Delaunay diagonal is the short one.
        let mut mesh = Mesh::new();
        let e = polygon(&mut mesh, &[(0.0, 0.0), (5.0, -1.0), (10.0, 0.0), (5.0, 1.0)]);
        let f = mesh.lface(e).unwrap();
        mesh[f].inside = true;
        mesh.tessellate_interior().unwrap();
        mesh.refine_delaunay();
        mesh.check().unwrap();

        let mut internal = Vec::new();
        let mut edge = mesh[crate::mesh::E_HEAD].next;
        while edge != crate::mesh::E_HEAD {
            if mesh.edge_is_internal(edge) {
                internal.push(edge);
            }
            edge = mesh[edge].next;
        }
        assert_eq!(internal.len(), 1);
        let (o, d) = (mesh.org_point(internal[0]), mesh.dst_point(internal[0]));
        assert_eq!(o.s, 5.0);
        assert_eq!(d.s, 5.0);
        assert!(mesh.edge_is_locally_delaunay(internal[0]));
    }
}
