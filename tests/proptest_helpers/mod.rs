#![allow(dead_code)]

use mlobject::geometry::{ImageSize, Quad};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Tolerance for comparing pixel quantities derived through relative space.
pub fn eps_for_size(size: ImageSize) -> f64 {
    size.height.max(size.width) as f64 * 1e-9
}

pub fn arb_image_size() -> impl Strategy<Value = ImageSize> {
    (1u32..=2000, 1u32..=2000).prop_map(|(h, w)| ImageSize::new(h, w))
}

/// A YOLO box that lies entirely inside the unit square.
pub fn arb_yolo_inside() -> impl Strategy<Value = Quad> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b, c, d)| {
        let (x1, x2) = if a <= b { (a, b) } else { (b, a) };
        let (y1, y2) = if c <= d { (c, d) } else { (d, c) };
        ((x1 + x2) / 2.0, (y1 + y2) / 2.0, x2 - x1, y2 - y1)
    })
}

/// Any YOLO box, including ones that stick out of the image.
pub fn arb_yolo_any() -> impl Strategy<Value = Quad> {
    (-0.5f64..1.5, -0.5f64..1.5, 0.0f64..2.0, 0.0f64..2.0)
}

/// Any VOC box, including inverted and out-of-image corners.
pub fn arb_voc_any() -> impl Strategy<Value = Quad> {
    (
        -500.0f64..2500.0,
        -500.0f64..2500.0,
        -500.0f64..2500.0,
        -500.0f64..2500.0,
    )
}

/// An integer rectangle `(x, y, w, h)` inside an image of `size`.
pub fn arb_rect_in(size: ImageSize) -> impl Strategy<Value = (u32, u32, u32, u32)> {
    (0..size.width, 0..size.height).prop_flat_map(move |(x, y)| {
        (
            Just(x),
            Just(y),
            1..=size.width - x,
            1..=size.height - y,
        )
    })
}
