// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Shared test utilities.

#![allow(dead_code)]

use std::collections::HashMap;

use polytess::{ElementType, Tessellator, Vec3, WindingRule, UNDEF};

/// Signed area of a triangle in the xy plane.
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Vertex ids of each output polygon with the padding removed. Only valid
/// for `Polygons` output.
pub fn polygons<D: Clone>(tess: &Tessellator<D>, poly_size: usize) -> Vec<Vec<u32>> {
    tess.elements()
        .chunks(poly_size)
        .map(|p| p.iter().copied().take_while(|&i| i != UNDEF).collect())
        .collect()
}

/// Signed xy area of one polygon of the output.
pub fn polygon_area<D: Clone>(tess: &Tessellator<D>, poly: &[u32]) -> f32 {
    let v = tess.vertices();
    let n = poly.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = v[poly[i] as usize];
        let b = v[poly[(i + 1) % n] as usize];
        area += a.x * b.y - a.y * b.x;
    }
    area * 0.5
}

/// Sum of absolute polygon areas.
pub fn total_area<D: Clone>(tess: &Tessellator<D>, poly_size: usize) -> f32 {
    polygons(tess, poly_size)
        .iter()
        .map(|p| polygon_area(tess, p).abs())
        .sum()
}

pub fn centroid<D: Clone>(tess: &Tessellator<D>, poly: &[u32]) -> Vec3 {
    let sum: Vec3 = poly.iter().map(|&i| tess.vertices()[i as usize]).sum();
    sum / poly.len() as f32
}

fn verify_vertices<D: Clone>(tess: &Tessellator<D>) {
    for (i, v) in tess.vertices().iter().enumerate() {
        assert!(v.is_finite(), "vertex {} = {:?} is not finite", i, v);
    }
    assert_eq!(tess.vertex_indices().len(), tess.vertex_count());
    assert_eq!(tess.vertex_data().len(), tess.vertex_count());
}

/// Every vertex finite and every element id either `UNDEF` or in range.
pub fn verify_valid_output<D: Clone>(tess: &Tessellator<D>) {
    verify_vertices(tess);
    for (i, &idx) in tess.elements().iter().enumerate() {
        if idx == UNDEF {
            continue;
        }
        assert!(
            (idx as usize) < tess.vertex_count(),
            "element[{}] = {} out of range (vertex_count={})",
            i,
            idx,
            tess.vertex_count()
        );
    }
}

/// Every vertex finite and every `(start, count)` contour record inside the
/// vertex array, with the contours covering it back to back.
pub fn verify_valid_contours<D: Clone>(tess: &Tessellator<D>) {
    verify_vertices(tess);
    let elements = tess.elements();
    assert_eq!(elements.len(), 2 * tess.element_count());
    let mut next = 0;
    for (i, pair) in elements.chunks_exact(2).enumerate() {
        let (start, count) = (pair[0] as usize, pair[1] as usize);
        assert_eq!(start, next, "contour {} starts at {}", i, start);
        assert!(count >= 3, "contour {} has {} vertices", i, count);
        assert!(
            start + count <= tess.vertex_count(),
            "contour {} = ({}, {}) out of range (vertex_count={})",
            i,
            start,
            count,
            tess.vertex_count()
        );
        next = start + count;
    }
    assert_eq!(next, tess.vertex_count());
}

/// Number of polygons using each undirected edge.
pub fn edge_uses<D: Clone>(tess: &Tessellator<D>, poly_size: usize) -> HashMap<(u32, u32), usize> {
    let mut uses = HashMap::new();
    for p in polygons(tess, poly_size) {
        for i in 0..p.len() {
            let (a, b) = (p[i], p[(i + 1) % p.len()]);
            *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    uses
}

/// Tessellates 2D contours into triangles.
pub fn tessellate_contours<C: AsRef<[f32]>>(contours: &[C], rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new();
    for c in contours {
        tess.add_contour_flat(2, c.as_ref()).expect("valid contour");
    }
    tess.tessellate(rule, ElementType::Polygons, 3, None)
        .unwrap_or_else(|e| panic!("tessellation failed for {:?}: {}", rule, e));
    tess
}

pub const UNIT_SQUARE: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

pub fn square(x0: f32, y0: f32, size: f32) -> Vec<f32> {
    vec![x0, y0, x0 + size, y0, x0 + size, y0 + size, x0, y0 + size]
}

pub fn square_cw(x0: f32, y0: f32, size: f32) -> Vec<f32> {
    vec![x0, y0, x0, y0 + size, x0 + size, y0 + size, x0 + size, y0]
}
