//! Mask encodings and the collaborators that convert between them.
//!
//! A mask can be held in three forms:
//!
//! - [`Rle`]: column-major run lengths, the canonical form.
//! - [`Polygon`]s: one flat `[x1, y1, x2, y2, ...]` vertex list per contour.
//! - [`BinaryMask`]: a dense `height x width` grid.
//!
//! The conversions are owned by two traits so that any conformant
//! implementation can be substituted:
//!
//! - [`MaskCodec`]: RLE encode/decode, polygon rasterisation, union, area
//!   and bounding box extraction. [`CocoRleCodec`] follows the COCO API.
//! - [`PolygonTracer`]: dense mask to contours. [`ContourTracer`] uses
//!   border following from `imageproc`.

pub mod contour;
pub mod rle;

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::geometry::{ImageSize, Quad};

pub use contour::{ContourTracer, TraceOptions};
pub use rle::CocoRleCodec;

/// A single contour as a flat `[x1, y1, x2, y2, ...]` coordinate list.
pub type Polygon = Vec<f64>;

/// Uncompressed run-length encoding of a binary mask.
///
/// Runs are taken in column-major order and alternate between background
/// and foreground, starting with background (so a mask whose first pixel is
/// set starts with a zero-length run). Serializes to the COCO JSON shape
/// `{"size": [h, w], "counts": [...]}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rle {
    pub size: ImageSize,
    pub counts: Vec<u32>,
}

impl Rle {
    pub fn new(size: ImageSize, counts: Vec<u32>) -> Self {
        Self { size, counts }
    }

    /// An all-background RLE.
    ///
    /// Fails with [`CodecError::ImageTooLarge`] when the pixel count does not
    /// fit a single `u32` run.
    pub fn empty(size: ImageSize) -> Result<Self, CodecError> {
        let total = u32::try_from(size.pixel_count()).map_err(|_| CodecError::ImageTooLarge {
            size: size.as_array(),
        })?;
        Ok(Self {
            size,
            counts: vec![total],
        })
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Sum of all runs. Equals `height * width` for a well-formed RLE.
    pub fn run_total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

/// RLE with its counts packed into the COCO ASCII string format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressedRle {
    pub size: ImageSize,
    pub counts: String,
}

/// A dense binary mask, stored row-major with one byte (0 or 1) per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryMask {
    size: ImageSize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// An all-background mask.
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            data: vec![0; size.pixel_count() as usize],
        }
    }

    /// Builds a mask from a row-major buffer. Any non-zero byte is
    /// foreground.
    ///
    /// Returns `None` if the buffer length does not match the size.
    pub fn from_raw(size: ImageSize, data: Vec<u8>) -> Option<Self> {
        if data.len() as u64 != size.pixel_count() {
            return None;
        }
        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();
        Some(Self { size, data })
    }

    /// Builds a mask by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(size);
        for row in 0..size.height {
            for col in 0..size.width {
                if f(row, col) {
                    mask.set(row, col, true);
                }
            }
        }
        mask
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.size.width as usize + col as usize
    }

    /// Returns whether the pixel at `(row, col)` is foreground.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the mask.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> bool {
        self.data[self.index(row, col)] != 0
    }

    /// # Panics
    ///
    /// Panics if the position is outside the mask.
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, value: bool) {
        let idx = self.index(row, col);
        self.data[idx] = u8::from(value);
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }

    /// The row-major buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Converts to an 8-bit image with foreground at 255, surrounded by
    /// `border` pixels of background on every side.
    ///
    /// Pixel `(row, col)` of the mask lands at `(col + border, row + border)`.
    pub fn to_gray_image(&self, border: u32) -> GrayImage {
        GrayImage::from_fn(
            self.size.width + 2 * border,
            self.size.height + 2 * border,
            |x, y| {
                let inside = x >= border
                    && y >= border
                    && x - border < self.size.width
                    && y - border < self.size.height;
                Luma([if inside && self.get(y - border, x - border) { 255 } else { 0 }])
            },
        )
    }
}

impl std::fmt::Debug for BinaryMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryMask")
            .field("size", &self.size)
            .field("count", &self.count())
            .finish()
    }
}

/// RLE encode/decode and the operations derived from it.
pub trait MaskCodec {
    /// Expands an RLE into a dense mask.
    fn decode(&self, rle: &Rle) -> Result<BinaryMask, CodecError>;

    /// Compresses a dense mask into an RLE.
    fn encode(&self, mask: &BinaryMask) -> Result<Rle, CodecError>;

    /// Rasterises each polygon separately, one RLE per polygon.
    fn fr_polygons(&self, polygons: &[Polygon], size: ImageSize) -> Result<Vec<Rle>, CodecError>;

    /// Pixel-wise union of same-sized RLEs.
    fn merge(&self, rles: &[Rle]) -> Result<Rle, CodecError>;

    /// Number of foreground pixels.
    fn area(&self, rle: &Rle) -> u64;

    /// Tight COCO-form `(x, y, w, h)` box around the foreground.
    fn to_bbox(&self, rle: &Rle) -> Quad;
}

/// Extracts polygon contours from a dense mask.
pub trait PolygonTracer {
    fn trace(&self, mask: &BinaryMask) -> Result<Vec<Polygon>, CodecError>;
}
