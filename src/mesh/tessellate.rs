// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Face-level passes that run after the sweep has classified every face.

use super::{Mesh, E_HEAD, F_HEAD};
use crate::error::InternalError;
use crate::geom::{edge_sign, vert_ccw, vert_leq, Real};
use crate::handle::{EdgeId, FaceId};

impl Mesh {
    #[inline]
    pub fn edge_goes_left(&self, e: EdgeId) -> bool {
        vert_leq(self.dst_point(e), self.org_point(e))
    }

    #[inline]
    pub fn edge_goes_right(&self, e: EdgeId) -> bool {
        vert_leq(self.org_point(e), self.dst_point(e))
    }

    /// Triangulates a face that is monotone in `s`.
    ///
    /// The boundary is walked from the rightmost vertex as an upper chain
    /// (`up`) and a lower chain (`lo`). Triangles are cut off whichever chain
    /// has the leftmost pending vertex as long as the diagonal turns the
    /// right way or the chain edge goes backwards, and the leftover fan is
    /// closed from the leftmost vertex.
    pub fn tessellate_mono_region(&mut self, face: FaceId) -> Result<(), InternalError> {
        let mut up = self[face].an_edge;
        if self.lnext(up) == up || self.lnext(self.lnext(up)) == up {
            return Err(InternalError::DegenerateFace);
        }

        let limit = self.face_len(face);
        let mut steps = 0;
        while vert_leq(self.dst_point(up), self.org_point(up)) {
            up = self.lprev(up);
            steps += 1;
            if steps > limit {
                return Err(InternalError::DegenerateFace);
            }
        }
        while vert_leq(self.org_point(up), self.dst_point(up)) {
            up = self.lnext(up);
            steps += 1;
            if steps > 2 * limit {
                return Err(InternalError::DegenerateFace);
            }
        }
        let mut lo = self.lprev(up);

        while self.lnext(up) != lo {
            if vert_leq(self.dst_point(up), self.org_point(lo)) {
                // up.dst is further left: fan from lo.org.
                while self.lnext(lo) != up
                    && (self.edge_goes_left(self.lnext(lo))
                        || edge_sign(
                            self.org_point(lo),
                            self.dst_point(lo),
                            self.dst_point(self.lnext(lo)),
                        ) <= 0.0)
                {
                    let lo_lnext = self.lnext(lo);
                    lo = self.connect(lo_lnext, lo).sym();
                }
                lo = self.lprev(lo);
            } else {
                // lo.org is further left: fan from up.dst.
                while self.lnext(lo) != up
                    && (self.edge_goes_right(self.lprev(up))
                        || edge_sign(
                            self.dst_point(up),
                            self.org_point(up),
                            self.org_point(self.lprev(up)),
                        ) >= 0.0)
                {
                    let up_lprev = self.lprev(up);
                    up = self.connect(up, up_lprev).sym();
                }
                up = self.lnext(up);
            }
        }

        if self.lnext(lo) == up {
            return Err(InternalError::DegenerateFace);
        }
        while self.lnext(self.lnext(lo)) != up {
            let lo_lnext = self.lnext(lo);
            lo = self.connect(lo_lnext, lo).sym();
        }
        Ok(())
    }

    /// Triangulates every inside face. Faces created along the way are
    /// linked before the face being split, so the walk never revisits them.
    pub fn tessellate_interior(&mut self) -> Result<(), InternalError> {
        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            let next = self[f].next;
            if self[f].inside {
                self.tessellate_mono_region(f)?;
            }
            f = next;
        }
        Ok(())
    }

    /// Zaps every face not marked inside.
    pub fn discard_exterior(&mut self) {
        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            let next = self[f].next;
            if !self[f].inside {
                self.zap_face(f);
            }
            f = next;
        }
    }

    /// Rewrites every edge winding: boundary edges between inside and
    /// outside get `value` (signed so the inside is on the left), all
    /// others get zero or, with `keep_only_boundary`, are deleted.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) {
        let mut e = self[E_HEAD].next;
        while e != E_HEAD {
            let e_next = self[e].next;
            let left = self.left_inside(e);
            if self.right_inside(e) != left {
                self[e].winding = if left { value } else { -value };
            } else if !keep_only_boundary {
                self[e].winding = 0;
            } else {
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Greedily deletes edges between two inside faces when the merged face
    /// stays convex and has at most `max_verts` vertices.
    pub fn merge_convex_faces(&mut self, max_verts: usize) {
        let mut e = self[E_HEAD].next;
        while e != E_HEAD {
            let mut e_next = self[e].next;
            let e_sym = e.sym();

            let (Some(lf), Some(rf)) = (self.lface(e), self.rface(e)) else {
                e = e_next;
                continue;
            };
            if !self[lf].inside || !self[rf].inside {
                e = e_next;
                continue;
            }
            if self.face_len(lf) + self.face_len(rf) - 2 > max_verts {
                e = e_next;
                continue;
            }

            //      vf--ve--vd
            //          ^|
            // left   e ||   right
            //          |v
            //      va--vb--vc
            let va = self.org_point(self.lprev(e));
            let vb = self.org_point(e);
            let vc = self.dst_point(self.lnext(e_sym));
            let vd = self.org_point(self.lprev(e_sym));
            let ve = self.org_point(e_sym);
            let vf = self.dst_point(self.lnext(e));

            if vert_ccw(va, vb, vc) && vert_ccw(vd, ve, vf) {
                if e == e_next || e == e_next.sym() {
                    e_next = self[e_next].next;
                }
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    /// Twice the signed area of `f` in sweep coordinates; positive for a
    /// counter-clockwise boundary.
    pub fn face_area(&self, f: FaceId) -> Real {
        let start = self[f].an_edge;
        let mut e = start;
        let mut area = 0.0;
        loop {
            let o = self.org_point(e);
            let d = self.dst_point(e);
            area += (o.s - d.s) * (o.t + d.t);
            e = self.lnext(e);
            if e == start {
                return area;
            }
        }
    }
}
