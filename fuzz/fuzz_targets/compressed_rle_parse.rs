//! Fuzz target for COCO compressed RLE strings.
//!
//! The first two bytes pick the mask size; the rest is fed to the counts
//! parser. Anything that parses is then decoded, checking for panics,
//! overflows, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mlobject::codec::{CocoRleCodec, CompressedRle, MaskCodec, Rle};
use mlobject::geometry::ImageSize;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 1024 * 1024 {
        return;
    }

    let size = ImageSize::new(u32::from(data[0]) + 1, u32::from(data[1]) + 1);
    let Ok(counts) = std::str::from_utf8(&data[2..]) else {
        return;
    };

    let compressed = CompressedRle {
        size,
        counts: counts.to_string(),
    };
    let Ok(rle) = Rle::from_compressed(&compressed) else {
        return;
    };

    let codec = CocoRleCodec;
    let _ = codec.area(&rle);
    let _ = codec.to_bbox(&rle);
    if let Ok(mask) = codec.decode(&rle) {
        assert_eq!(mask.count(), codec.area(&rle));
    }
});
