//! COCO-compatible run-length encoding.
//!
//! Mirrors the mask API shipped with the COCO tools (`maskApi.c`): the
//! polygon scan conversion, the union walk over two run streams, the bounding
//! box extraction and the ASCII count compression all reproduce its output
//! exactly, so RLEs produced here can be dropped into COCO result files.

use crate::error::CodecError;
use crate::geometry::{ImageSize, Quad};

use super::{BinaryMask, CompressedRle, MaskCodec, Polygon, Rle};

/// Upsampling factor used while walking polygon edges.
const POLY_SCALE: f64 = 5.0;

/// The bundled [`MaskCodec`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CocoRleCodec;

/// Counts are `u32`, so larger images cannot be encoded.
fn check_size(size: ImageSize) -> Result<u64, CodecError> {
    let n = size.pixel_count();
    if n > u32::MAX as u64 {
        return Err(CodecError::ImageTooLarge {
            size: size.as_array(),
        });
    }
    Ok(n)
}

fn check_runs(rle: &Rle) -> Result<u64, CodecError> {
    let expected = rle.size.pixel_count();
    let actual = rle.run_total();
    if expected != actual {
        return Err(CodecError::MalformedRle { expected, actual });
    }
    Ok(expected)
}

impl MaskCodec for CocoRleCodec {
    fn decode(&self, rle: &Rle) -> Result<BinaryMask, CodecError> {
        check_runs(rle)?;
        let h = rle.height() as u64;
        let mut mask = BinaryMask::new(rle.size);
        let mut idx = 0u64;
        for (i, &c) in rle.counts.iter().enumerate() {
            let c = c as u64;
            if i % 2 == 1 {
                for p in idx..idx + c {
                    mask.set((p % h) as u32, (p / h) as u32, true);
                }
            }
            idx += c;
        }
        Ok(mask)
    }

    fn encode(&self, mask: &BinaryMask) -> Result<Rle, CodecError> {
        check_size(mask.size())?;
        let mut counts = Vec::new();
        let mut prev = false;
        let mut run = 0u32;
        for col in 0..mask.width() {
            for row in 0..mask.height() {
                let v = mask.get(row, col);
                if v != prev {
                    counts.push(run);
                    run = 0;
                    prev = v;
                }
                run += 1;
            }
        }
        counts.push(run);
        Ok(Rle::new(mask.size(), counts))
    }

    fn fr_polygons(&self, polygons: &[Polygon], size: ImageSize) -> Result<Vec<Rle>, CodecError> {
        check_size(size)?;
        polygons
            .iter()
            .enumerate()
            .map(|(index, xy)| {
                validate_polygon(xy)
                    .map_err(|reason| CodecError::InvalidPolygon { index, reason })?;
                Ok(fr_poly(xy, size))
            })
            .collect()
    }

    fn merge(&self, rles: &[Rle]) -> Result<Rle, CodecError> {
        let (first, rest) = rles.split_first().ok_or(CodecError::EmptyMerge)?;
        check_runs(first)?;
        let mut counts = first.counts.clone();
        for rle in rest {
            if rle.size != first.size {
                return Err(CodecError::SizeMismatch {
                    expected: first.size.as_array(),
                    actual: rle.size.as_array(),
                });
            }
            check_runs(rle)?;
            counts = union_runs(&counts, &rle.counts);
        }
        Ok(Rle::new(first.size, counts))
    }

    fn area(&self, rle: &Rle) -> u64 {
        rle.counts.iter().skip(1).step_by(2).map(|&c| c as u64).sum()
    }

    fn to_bbox(&self, rle: &Rle) -> Quad {
        let h = rle.height() as u64;
        let w = rle.width() as u64;
        // A trailing foreground run without a closing background run is
        // ignored, as in the COCO API.
        let m = rle.counts.len() / 2 * 2;
        if h == 0 || w == 0 || m == 0 {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let (mut xs, mut ys, mut xe, mut ye) = (w, h, 0u64, 0u64);
        let mut xp = 0u64;
        let mut cc = 0u64;
        for (j, &c) in rle.counts[..m].iter().enumerate() {
            cc += c as u64;
            let t = cc.saturating_sub((j % 2) as u64);
            let y = t % h;
            let x = t / h;
            if j % 2 == 0 {
                xp = x;
            } else if xp < x {
                // The run wraps into another column, so it covers full columns.
                ys = 0;
                ye = h - 1;
            }
            xs = xs.min(x);
            xe = xe.max(x);
            ys = ys.min(y);
            ye = ye.max(y);
        }
        (
            xs as f64,
            ys as f64,
            (xe - xs + 1) as f64,
            (ye - ys + 1) as f64,
        )
    }
}

fn validate_polygon(xy: &[f64]) -> Result<(), String> {
    if xy.len() % 2 != 0 {
        return Err(format!("odd number of coordinates ({})", xy.len()));
    }
    if xy.len() < 6 {
        return Err(format!("needs at least 3 vertices, got {}", xy.len() / 2));
    }
    if let Some(v) = xy.iter().find(|v| !v.is_finite()) {
        return Err(format!("non-finite coordinate {}", v));
    }
    // Upsampled vertices are 32-bit integers in the COCO API.
    let limit = i32::MAX as f64 / POLY_SCALE;
    if let Some(v) = xy.iter().find(|v| v.abs() > limit) {
        return Err(format!("coordinate {} is outside +/-{}", v, limit));
    }
    Ok(())
}

/// Scan-converts one polygon.
///
/// The outline is upsampled by [`POLY_SCALE`], walked edge by edge, and
/// every crossing of a pixel column centre becomes a run boundary.
fn fr_poly(xy: &[f64], size: ImageSize) -> Rle {
    let h = size.height as i64;
    let w = size.width as i64;
    let k = xy.len() / 2;

    let mut x: Vec<i64> = (0..k)
        .map(|j| (POLY_SCALE * xy[j * 2] + 0.5) as i64)
        .collect();
    let mut y: Vec<i64> = (0..k)
        .map(|j| (POLY_SCALE * xy[j * 2 + 1] + 0.5) as i64)
        .collect();
    x.push(x[0]);
    y.push(y[0]);

    // Dense boundary points along every edge.
    let mut u: Vec<i64> = Vec::new();
    let mut v: Vec<i64> = Vec::new();
    for j in 0..k {
        let (mut xs, mut xe, mut ys, mut ye) = (x[j], x[j + 1], y[j], y[j + 1]);
        let dx = xe.abs_diff(xs) as i64;
        let dy = ys.abs_diff(ye) as i64;
        let flip = (dx >= dy && xs > xe) || (dx < dy && ys > ye);
        if flip {
            std::mem::swap(&mut xs, &mut xe);
            std::mem::swap(&mut ys, &mut ye);
        }
        if dx >= dy {
            let s = if dx == 0 {
                0.0
            } else {
                (ye - ys) as f64 / dx as f64
            };
            for d in 0..=dx {
                let t = if flip { dx - d } else { d };
                u.push(t + xs);
                v.push((ys as f64 + s * t as f64 + 0.5) as i64);
            }
        } else {
            let s = (xe - xs) as f64 / dy as f64;
            for d in 0..=dy {
                let t = if flip { dy - d } else { d };
                v.push(t + ys);
                u.push((xs as f64 + s * t as f64 + 0.5) as i64);
            }
        }
    }

    // Points where the outline crosses a column centre, downsampled.
    let mut starts: Vec<u64> = Vec::new();
    for j in 1..u.len() {
        if u[j] == u[j - 1] {
            continue;
        }
        let xd_raw = if u[j] < u[j - 1] { u[j] } else { u[j] - 1 };
        let xd = (xd_raw as f64 + 0.5) / POLY_SCALE - 0.5;
        if xd.floor() != xd || xd < 0.0 || xd > (w - 1) as f64 {
            continue;
        }
        let yd_raw = if v[j] < v[j - 1] { v[j] } else { v[j - 1] };
        let yd = ((yd_raw as f64 + 0.5) / POLY_SCALE - 0.5).clamp(0.0, h as f64).ceil();
        starts.push(xd as u64 * h as u64 + yd as u64);
    }

    // Sorted boundary offsets become run lengths; zero-length runs are
    // folded into their neighbours.
    starts.push(size.pixel_count());
    starts.sort_unstable();
    let mut prev = 0u64;
    let diffs: Vec<u64> = starts
        .iter()
        .map(|&t| {
            let d = t - prev;
            prev = t;
            d
        })
        .collect();

    let mut counts: Vec<u32> = Vec::with_capacity(diffs.len());
    let mut iter = diffs.into_iter();
    if let Some(first) = iter.next() {
        counts.push(first as u32);
    }
    while let Some(d) = iter.next() {
        if d > 0 {
            counts.push(d as u32);
        } else if let Some(next) = iter.next() {
            if let Some(last) = counts.last_mut() {
                *last += next as u32;
            }
        }
    }

    Rle::new(size, counts)
}

/// Walks two run streams of equal total length and emits their union.
fn union_runs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut ca = a.first().copied().unwrap_or(0) as u64;
    let mut cb = b.first().copied().unwrap_or(0) as u64;
    let (mut ia, mut ib) = (1usize, 1usize);
    let (mut va, mut vb, mut v) = (false, false, false);
    let mut cc = 0u64;
    loop {
        let c = ca.min(cb);
        cc += c;

        ca -= c;
        if ca == 0 && ia < a.len() {
            ca = a[ia] as u64;
            ia += 1;
            va = !va;
        }
        cb -= c;
        if cb == 0 && ib < b.len() {
            cb = b[ib] as u64;
            ib += 1;
            vb = !vb;
        }
        let remaining = ca + cb;

        let vp = v;
        v = va || vb;
        if v != vp || remaining == 0 {
            out.push(cc as u32);
            cc = 0;
        }
        if remaining == 0 {
            return out;
        }
    }
}

impl Rle {
    /// Packs the counts into the COCO ASCII format.
    ///
    /// From the fourth run on, each count is stored as the difference to the
    /// count two places earlier. Values are written as little-endian groups
    /// of five bits with a continuation flag, offset by 48 into printable
    /// ASCII.
    pub fn to_compressed(&self) -> CompressedRle {
        let mut s = String::new();
        for (i, &cnt) in self.counts.iter().enumerate() {
            let mut x = cnt as i64;
            if i > 2 {
                x -= self.counts[i - 2] as i64;
            }
            loop {
                let mut c = (x & 0x1f) as u8;
                x >>= 5;
                let more = if c & 0x10 != 0 { x != -1 } else { x != 0 };
                if more {
                    c |= 0x20;
                }
                s.push((c + 48) as char);
                if !more {
                    break;
                }
            }
        }
        CompressedRle {
            size: self.size,
            counts: s,
        }
    }

    /// Unpacks COCO ASCII counts.
    ///
    /// The run total is not checked here; [`MaskCodec::decode`] does that.
    pub fn from_compressed(compressed: &CompressedRle) -> Result<Self, CodecError> {
        let bytes = compressed.counts.as_bytes();
        let mut counts: Vec<u32> = Vec::new();
        let mut p = 0usize;
        while p < bytes.len() {
            let mut x = 0i64;
            let mut k = 0u32;
            loop {
                let byte = *bytes
                    .get(p)
                    .ok_or_else(|| invalid_counts("string ends inside a value"))?;
                if !(48..48 + 64).contains(&byte) {
                    return Err(invalid_counts(format!(
                        "unexpected character {:?} at offset {}",
                        byte as char, p
                    )));
                }
                if k >= 12 {
                    return Err(invalid_counts(format!("value at offset {} is too long", p)));
                }
                let c = (byte - 48) as i64;
                x |= (c & 0x1f) << (5 * k);
                p += 1;
                k += 1;
                if c & 0x20 == 0 {
                    if c & 0x10 != 0 {
                        x |= -1i64 << (5 * k);
                    }
                    break;
                }
            }
            if counts.len() > 2 {
                x += counts[counts.len() - 2] as i64;
            }
            let count = u32::try_from(x)
                .map_err(|_| invalid_counts(format!("run length {} out of range", x)))?;
            counts.push(count);
        }
        Ok(Rle::new(compressed.size, counts))
    }
}

fn invalid_counts(reason: impl Into<String>) -> CodecError {
    CodecError::InvalidCompressedCounts {
        reason: reason.into(),
    }
}
