// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Projection of the input onto the 2D sweep plane.

use glam::Vec3;

use crate::geom::{Point, Real};
use crate::mesh::Mesh;

/// Index of the component with the largest magnitude.
fn long_axis(v: Vec3) -> usize {
    let mut i = 0;
    if v.y.abs() > v.x.abs() {
        i = 1;
    }
    if v.z.abs() > v[i].abs() {
        i = 2;
    }
    i
}

/// Index of the component with the smallest magnitude.
fn short_axis(v: Vec3) -> usize {
    let mut i = 0;
    if v.y.abs() < v.x.abs() {
        i = 1;
    }
    if v.z.abs() < v[i].abs() {
        i = 2;
    }
    i
}

/// A normal for the plane of the input. The two extreme vertices along the
/// axis of greatest spread are joined with the vertex that maximizes the
/// triangle area.
pub(crate) fn compute_normal(mesh: &Mesh) -> Vec3 {
    let mut min_val = Vec3::splat(Real::MAX);
    let mut max_val = Vec3::splat(Real::MIN);
    let mut min_vert = [Vec3::ZERO; 3];
    let mut max_vert = [Vec3::ZERO; 3];

    for v in mesh.vertex_ids() {
        let c = mesh[v].coords;
        for i in 0..3 {
            if c[i] < min_val[i] {
                min_val[i] = c[i];
                min_vert[i] = c;
            }
            if c[i] > max_val[i] {
                max_val[i] = c[i];
                max_vert[i] = c;
            }
        }
    }

    let spread = max_val - min_val;
    let mut i = 0;
    if spread.y > spread.x {
        i = 1;
    }
    if spread.z > spread[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // Every vertex at the same place.
        return Vec3::Z;
    }

    let v2 = max_vert[i];
    let d1 = min_vert[i] - v2;
    let mut best = Vec3::ZERO;
    let mut max_len2 = 0.0;
    for v in mesh.vertex_ids() {
        let t_norm = d1.cross(mesh[v].coords - v2);
        let len2 = t_norm.length_squared();
        if len2 > max_len2 {
            max_len2 = len2;
            best = t_norm;
        }
    }

    if max_len2 <= 0.0 {
        // Collinear input: any normal orthogonal to the line does.
        let mut n = Vec3::ZERO;
        n[short_axis(d1)] = 1.0;
        return n;
    }
    best
}

/// Flips `t` when the contours with positive winding come out clockwise.
fn check_orientation(mesh: &mut Mesh) -> bool {
    let area: Real = mesh
        .face_ids()
        .filter(|&f| mesh[mesh[f].an_edge].winding > 0)
        .map(|f| mesh.face_area(f))
        .sum();
    if area >= 0.0 {
        return false;
    }
    let verts: Vec<_> = mesh.vertex_ids().collect();
    for v in verts {
        mesh[v].t = -mesh[v].t;
    }
    true
}

/// Assigns `s`/`t` to every vertex from a basis orthogonal to `normal`
/// (computed when zero). Returns the bounding box in sweep coordinates and
/// the normal the projection looked along.
pub(crate) fn project(mesh: &mut Mesh, normal: Vec3) -> ((Point, Point), Vec3) {
    let computed = normal == Vec3::ZERO;
    let mut norm = if computed { compute_normal(mesh) } else { normal };

    let i = long_axis(norm);
    let mut s_unit = Vec3::ZERO;
    let mut t_unit = Vec3::ZERO;
    s_unit[(i + 1) % 3] = 1.0;
    t_unit[(i + 2) % 3] = if norm[i] > 0.0 { 1.0 } else { -1.0 };

    let verts: Vec<_> = mesh.vertex_ids().collect();
    for &v in &verts {
        let c = mesh[v].coords;
        mesh[v].s = c.dot(s_unit);
        mesh[v].t = c.dot(t_unit);
    }
    if computed && check_orientation(mesh) {
        norm = -norm;
    }

    let mut bmin = Point::new(Real::MAX, Real::MAX);
    let mut bmax = Point::new(Real::MIN, Real::MIN);
    for &v in &verts {
        let p = mesh[v].point();
        bmin = Point::new(bmin.s.min(p.s), bmin.t.min(p.t));
        bmax = Point::new(bmax.s.max(p.s), bmax.t.max(p.t));
    }
    ((bmin, bmax), norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::polygon;

    fn lift(mesh: &mut Mesh, f: impl Fn(Vec3) -> Vec3) {
        let verts: Vec<_> = mesh.vertex_ids().collect();
        for v in verts {
            let c = mesh[v].coords;
            mesh[v].coords = f(c);
        }
    }

    #[test]
    fn axes() {
        assert_eq!(long_axis(Vec3::new(0.1, -3.0, 2.0)), 1);
        assert_eq!(short_axis(Vec3::new(0.1, -3.0, 2.0)), 0);
        assert_eq!(long_axis(Vec3::new(1.0, 1.0, 1.0)), 0);
    }

    #[test]
    fn normal_of_xy_square_is_z() {
        let mut mesh = Mesh::new();
        polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let n = compute_normal(&mesh).normalize();
        assert!(n.x.abs() < 1e-6 && n.y.abs() < 1e-6 && (n.z.abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn collinear_input_gets_an_orthogonal_axis() {
        let mut mesh = Mesh::new();
        polygon(&mut mesh, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let n = compute_normal(&mesh);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn projected_ccw_contour_has_positive_area() {
        for flip in [false, true] {
            let mut mesh = Mesh::new();
            let pts: &[(Real, Real)] = if flip {
                &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
            } else {
                &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            };
            let e = polygon(&mut mesh, pts);
            project(&mut mesh, Vec3::ZERO);
            let f = mesh.lface(e).unwrap();
            assert!(mesh.face_area(f) > 0.0, "winding +1 face should be CCW");
        }
    }

    #[test]
    fn explicit_normal_selects_the_plane() {
        let mut mesh = Mesh::new();
        polygon(&mut mesh, &[(0.0, 0.0), (2.0, 0.0), (2.0, 3.0), (0.0, 3.0)]);
        // Move the square into the xz plane.
        lift(&mut mesh, |c| Vec3::new(c.x, 5.0, c.y));
        let ((bmin, bmax), n) = project(&mut mesh, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(n, Vec3::Y);
        assert_eq!((bmax.s - bmin.s, bmax.t - bmin.t), (3.0, 2.0));
    }
}
