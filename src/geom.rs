// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Predicates on projected sweep coordinates. Every ordering decision the
// sweep makes goes through these functions, so they must agree exactly with
// each other: `vert_leq` is the event order, `edge_eval`/`edge_sign` place a
// vertex above or below an edge.

pub type Real = f32;

/// A vertex position in sweep coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub s: Real,
    pub t: Real,
}

impl Point {
    #[inline]
    pub const fn new(s: Real, t: Real) -> Self {
        Point { s, t }
    }

    /// Swap the roles of `s` and `t`.
    #[inline]
    pub const fn transposed(self) -> Self {
        Point { s: self.t, t: self.s }
    }
}

/// Lexicographic order: `s` first, ties broken by `t`.
#[inline]
pub fn vert_leq(u: Point, v: Point) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

#[inline]
pub fn vert_eq(u: Point, v: Point) -> bool {
    u.s == v.s && u.t == v.t
}

/// Lexicographic order with `s` and `t` swapped.
#[inline]
pub fn trans_leq(u: Point, v: Point) -> bool {
    vert_leq(u.transposed(), v.transposed())
}

/// For `u <= v <= w`, returns the signed vertical distance from the edge
/// `uw` to `v`, evaluated at `v.s`. Zero when `uw` is vertical.
///
/// The interpolation is done from whichever endpoint is closer to `v`, which
/// keeps the result accurate for long edges.
pub fn edge_eval(u: Point, v: Point, w: Point) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r <= 0.0 {
        return 0.0;
    }
    if gap_l < gap_r {
        (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
    } else {
        (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
    }
}

/// Same sign as [`edge_eval`] without the division.
pub fn edge_sign(u: Point, v: Point, w: Point) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.0
    }
}

#[inline]
pub fn trans_eval(u: Point, v: Point, w: Point) -> Real {
    edge_eval(u.transposed(), v.transposed(), w.transposed())
}

#[inline]
pub fn trans_sign(u: Point, v: Point, w: Point) -> Real {
    edge_sign(u.transposed(), v.transposed(), w.transposed())
}

/// True when `u`, `v`, `w` turn counter-clockwise (or are collinear).
#[inline]
pub fn vert_ccw(u: Point, v: Point, w: Point) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.0
}

#[inline]
pub fn vert_l1_dist(u: Point, v: Point) -> Real {
    (u.s - v.s).abs() + (u.t - v.t).abs()
}

/// Returns `(b*x + a*y) / (a + b)`, clamping negative weights to zero and
/// falling back to the midpoint when both are zero. The result always lies
/// between `x` and `y`.
pub fn interpolate(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = a.max(0.0);
    let b = b.max(0.0);
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Intersection of edges `(o1, d1)` and `(o2, d2)`.
///
/// Each coordinate is solved independently from a sorted arrangement of the
/// four endpoints, so the point is guaranteed to lie inside the bounding box
/// of the overlap even when the edges only touch or barely miss.
pub fn edge_intersect(o1: Point, d1: Point, o2: Point, d2: Point) -> Point {
    let s = intersect_coord(o1, d1, o2, d2, vert_leq, edge_eval, edge_sign, |p| p.s);
    let t = intersect_coord(o1, d1, o2, d2, trans_leq, trans_eval, trans_sign, |p| p.t);
    Point { s, t }
}

#[allow(clippy::too_many_arguments)]
fn intersect_coord(
    mut o1: Point,
    mut d1: Point,
    mut o2: Point,
    mut d2: Point,
    leq: fn(Point, Point) -> bool,
    eval: fn(Point, Point, Point) -> Real,
    sign: fn(Point, Point, Point) -> Real,
    coord: fn(Point) -> Real,
) -> Real {
    if !leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }

    if !leq(o2, d1) {
        // No overlap along this axis.
        return (coord(o2) + coord(d1)) / 2.0;
    }
    let (mut z1, mut z2, far) = if leq(d1, d2) {
        (eval(o1, o2, d1), eval(o2, d1, d2), d1)
    } else {
        (sign(o1, o2, d1), -sign(o1, d2, d1), d2)
    };
    if z1 + z2 < 0.0 {
        z1 = -z1;
        z2 = -z2;
    }
    interpolate(z1, coord(o2), z2, coord(far))
}
