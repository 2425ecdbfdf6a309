#![allow(dead_code)]

use mlobject::codec::{BinaryMask, Polygon};
use mlobject::geometry::{ImageSize, Quad};

pub const EPS: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= EPS,
        "{}: {} != {}",
        what,
        actual,
        expected
    );
}

pub fn assert_quad_close(actual: Quad, expected: Quad) {
    assert_close(actual.0, expected.0, "component 0");
    assert_close(actual.1, expected.1, "component 1");
    assert_close(actual.2, expected.2, "component 2");
    assert_close(actual.3, expected.3, "component 3");
}

/// Axis-aligned rectangle as a polygon, clockwise from the top-left corner.
pub fn rect_polygon(x: f64, y: f64, w: f64, h: f64) -> Polygon {
    vec![x, y, x + w, y, x + w, y + h, x, y + h]
}

/// Dense mask with the pixels of `[x, x+w) x [y, y+h)` set.
pub fn rect_mask(size: ImageSize, x: u32, y: u32, w: u32, h: u32) -> BinaryMask {
    BinaryMask::from_fn(size, |row, col| {
        (y..y + h).contains(&row) && (x..x + w).contains(&col)
    })
}
