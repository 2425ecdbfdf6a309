//! Fuzz target for polygon rasterisation and merging.
//!
//! Bytes become a small image size followed by `i16` coordinates, scaled
//! down so vertices land in and around the image.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mlobject::codec::{CocoRleCodec, MaskCodec};
use mlobject::geometry::ImageSize;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 || data.len() > 64 * 1024 {
        return;
    }

    let size = ImageSize::new(u32::from(data[0] % 64) + 1, u32::from(data[1] % 64) + 1);
    let split = usize::from(data[2] % 4) + 1;

    let coords: Vec<f64> = data[3..]
        .chunks_exact(2)
        .map(|pair| f64::from(i16::from_le_bytes([pair[0], pair[1]])) / 256.0)
        .collect();
    if coords.is_empty() {
        return;
    }

    let chunk = coords.len().div_ceil(split).max(1);
    let polygons: Vec<Vec<f64>> = coords.chunks(chunk).map(<[f64]>::to_vec).collect();

    let codec = CocoRleCodec;
    let Ok(rles) = codec.fr_polygons(&polygons, size) else {
        return;
    };
    for rle in &rles {
        assert_eq!(rle.run_total(), size.pixel_count());
    }
    if let Ok(merged) = codec.merge(&rles) {
        assert!(codec.area(&merged) <= size.pixel_count());
    }
});
