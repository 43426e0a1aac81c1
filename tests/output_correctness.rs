// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Output correctness: area preservation, valid indices, shared edges.

mod helpers;

use approx::assert_abs_diff_eq;
use polytess::{ContourOrientation, ContourVertex, ElementType, Tessellator, Vec3, WindingRule, UNDEF};

use helpers::{square, UNIT_SQUARE};

fn tessellate_simple(vertices: &[f32]) -> Tessellator {
    helpers::tessellate_contours(&[vertices], WindingRule::Positive)
}

#[test]
fn unit_square_gives_two_triangles() {
    let tess = tessellate_simple(&UNIT_SQUARE);
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertex_count(), 4);
    assert_eq!(tess.elements().len(), 6);
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 1.0, epsilon = 1e-6);
    helpers::verify_valid_output(&tess);

    let mut src = tess.vertex_indices().to_vec();
    src.sort_unstable();
    assert_eq!(src, vec![0, 1, 2, 3]);
}

#[test]
fn single_triangle_passes_through() {
    let tess = tessellate_simple(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    assert_eq!(tess.element_count(), 1);
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 0.5, epsilon = 1e-6);
}

#[test]
fn concave_polygon_area() {
    // An "L" of area 3.
    let l = [0.0, 0.0, 2.0, 0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.0, 2.0];
    let tess = tessellate_simple(&l);
    assert_eq!(tess.element_count(), 4);
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 3.0, epsilon = 1e-5);
}

#[test]
fn square_with_hole_leaves_hole_empty() {
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);
    let tess = helpers::tessellate_contours(&[&outer, &inner], WindingRule::Odd);

    assert_eq!(tess.element_count(), 8);
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 12.0, epsilon = 1e-4);
    for p in helpers::polygons(&tess, 3) {
        let c = helpers::centroid(&tess, &p);
        let in_hole = c.x > 1.0 && c.x < 3.0 && c.y > 1.0 && c.y < 3.0;
        assert!(!in_hole, "triangle {:?} lies in the hole", p);
    }
}

#[test]
fn triangles_share_edges_manifold() {
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);
    let tess = helpers::tessellate_contours(&[&outer, &inner], WindingRule::Odd);

    let uses = helpers::edge_uses(&tess, 3);
    assert!(uses.values().all(|&n| n == 1 || n == 2));
    let boundary = uses.values().filter(|&&n| n == 1).count();
    assert_eq!(boundary, 8, "only the input edges are boundary edges");
}

#[test]
fn triangles_follow_the_normal() {
    let mut tess: Tessellator = Tessellator::new();
    let star = [
        0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 2.0, 1.0, 0.0, 4.0,
    ];
    tess.add_contour_flat(2, &star).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, Some(Vec3::Z))
        .unwrap();
    for p in helpers::polygons(&tess, 3) {
        assert!(helpers::polygon_area(&tess, &p) > 0.0, "{:?} is clockwise", p);
    }
}

#[test]
fn duplicate_vertices_are_merged() {
    let verts = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let tess = tessellate_simple(&verts);
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertex_count(), 4);
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 1.0, epsilon = 1e-6);
    assert!(tess.vertex_indices().iter().all(|&i| i != UNDEF && i < 5));
}

#[test]
fn repeated_runs_are_identical() {
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);
    let bow: [f32; 8] = [5.0, 0.0, 7.0, 2.0, 7.0, 0.0, 5.0, 2.0];
    let run = || helpers::tessellate_contours(&[&outer[..], &inner[..], &bow[..]], WindingRule::NonZero);
    let a = run();
    let b = run();
    assert_eq!(a.vertices(), b.vertices());
    assert_eq!(a.elements(), b.elements());
    assert_eq!(a.vertex_indices(), b.vertex_indices());
}

#[test]
fn payloads_reach_output() {
    let mut tess = Tessellator::<u32>::new();
    let verts: Vec<ContourVertex<u32>> = UNIT_SQUARE
        .chunks_exact(2)
        .enumerate()
        .map(|(i, c)| ContourVertex::with_data(Vec3::new(c[0], c[1], 0.0), 100 + i as u32))
        .collect();
    tess.add_contour(&verts, ContourOrientation::Original).unwrap();
    tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, None)
        .unwrap();
    for (data, &src) in tess.vertex_data().iter().zip(tess.vertex_indices()) {
        assert_eq!(*data, Some(100 + src));
    }
}

#[test]
fn degenerate_input_produces_nothing() {
    // Collinear and single-point contours enclose no area.
    let tess = helpers::tessellate_contours(
        &[&[0.0, 0.0, 1.0, 1.0, 2.0, 2.0][..], &[3.0, 3.0][..], &[5.0, 5.0, 6.0, 5.0][..]],
        WindingRule::NonZero,
    );
    assert_eq!(tess.element_count(), 0);
}
