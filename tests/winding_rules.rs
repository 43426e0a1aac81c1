// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Winding rule correctness with area verification.

mod helpers;

use approx::assert_abs_diff_eq;
use polytess::{ElementType, TessOption, Tessellator, Vec3, WindingRule};

use helpers::{square, square_cw};

/// Three nested squares of side 6, 4 and 2 with the same orientation. Winding
/// numbers from the outside in are 1, 2 and 3 (negated when clockwise).
fn nested_squares(rule: WindingRule, clockwise: bool) -> Tessellator {
    let make = if clockwise { square_cw } else { square };
    let mut tess = Tessellator::new();
    for (origin, size) in [(-3.0, 6.0), (-2.0, 4.0), (-1.0, 2.0)] {
        tess.add_contour_flat(2, &make(origin, origin, size)).unwrap();
    }
    tess.tessellate(rule, ElementType::Polygons, 3, Some(Vec3::Z))
        .unwrap_or_else(|e| panic!("{:?}: {}", rule, e));
    helpers::verify_valid_output(&tess);
    tess
}

#[test]
fn nested_ccw_squares() {
    let cases = [
        (WindingRule::Odd, 24.0),
        (WindingRule::NonZero, 36.0),
        (WindingRule::Positive, 36.0),
        (WindingRule::Negative, 0.0),
        (WindingRule::AbsGeqTwo, 16.0),
    ];
    for (rule, expected) in cases {
        let tess = nested_squares(rule, false);
        assert_abs_diff_eq!(helpers::total_area(&tess, 3), expected, epsilon = 1e-3);
    }
}

#[test]
fn nested_cw_squares() {
    let cases = [
        (WindingRule::Odd, 24.0),
        (WindingRule::NonZero, 36.0),
        (WindingRule::Positive, 0.0),
        (WindingRule::Negative, 36.0),
        (WindingRule::AbsGeqTwo, 16.0),
    ];
    for (rule, expected) in cases {
        let tess = nested_squares(rule, true);
        assert_abs_diff_eq!(helpers::total_area(&tess, 3), expected, epsilon = 1e-3);
    }
}

#[test]
fn empty_rule_gives_no_polygons() {
    let tess = nested_squares(WindingRule::Negative, false);
    assert_eq!(tess.element_count(), 0);
    assert!(tess.elements().is_empty());
}

#[test]
fn overlapping_squares() {
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 1.0, 2.0);
    let cases = [
        (WindingRule::NonZero, 7.0),
        (WindingRule::Odd, 6.0),
        (WindingRule::AbsGeqTwo, 1.0),
    ];
    for (rule, expected) in cases {
        let tess = helpers::tessellate_contours(&[&a, &b], rule);
        assert_abs_diff_eq!(helpers::total_area(&tess, 3), expected, epsilon = 1e-4);
        helpers::verify_valid_output(&tess);
    }
}

#[test]
fn opposite_contours_cancel_under_nonzero() {
    let a = square(0.0, 0.0, 2.0);
    let b = square_cw(0.0, 0.0, 2.0);
    let tess = helpers::tessellate_contours(&[&a, &b], WindingRule::NonZero);
    assert_eq!(tess.element_count(), 0);
}

#[test]
fn reverse_contours_per_contour() {
    // The option applies to contours added while it is set.
    let mut tess: Tessellator = Tessellator::new();
    tess.add_contour_flat(2, &square(0.0, 0.0, 4.0)).unwrap();
    tess.set_option(TessOption::ReverseContours, true);
    tess.add_contour_flat(2, &square(1.0, 1.0, 2.0)).unwrap();
    tess.tessellate(WindingRule::Positive, ElementType::Polygons, 3, Some(Vec3::Z))
        .unwrap();
    assert_abs_diff_eq!(helpers::total_area(&tess, 3), 12.0, epsilon = 1e-4);
}
