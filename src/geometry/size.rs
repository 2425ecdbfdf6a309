//! Image dimensions.

use serde::{Deserialize, Serialize};

/// The size of the image an annotation lives on, in `(height, width)`
/// order.
///
/// Serializes as `[height, width]`, the same layout COCO uses for the
/// `size` field of an RLE.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

impl ImageSize {
    #[inline]
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.height as u64 * self.width as u64
    }

    #[inline]
    pub fn as_array(&self) -> [u32; 2] {
        [self.height, self.width]
    }

    #[inline]
    pub(crate) fn height_f64(&self) -> f64 {
        self.height as f64
    }

    #[inline]
    pub(crate) fn width_f64(&self) -> f64 {
        self.width as f64
    }
}

impl From<(u32, u32)> for ImageSize {
    fn from((height, width): (u32, u32)) -> Self {
        Self::new(height, width)
    }
}

impl From<[u32; 2]> for ImageSize {
    fn from([height, width]: [u32; 2]) -> Self {
        Self::new(height, width)
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        size.as_array()
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}
