//! The nine derived quantities of a box in one coordinate space.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::size::ImageSize;
use super::space::{Normalized, Pixel};

/// Corners, dimensions, center and area of an axis-aligned box.
///
/// The `TSpace` parameter is either [`Pixel`] or [`Normalized`]. A
/// [`BoundingBox`](super::BoundingBox) carries one of each, computed once at
/// construction.
#[derive(Clone, Copy, PartialEq)]
pub struct Extent<TSpace> {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub w: f64,
    pub h: f64,
    pub xc: f64,
    pub yc: f64,
    pub area: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Extent<TSpace> {
    /// Derives width, height, center and area from already-clamped corners.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let w = x2 - x1;
        let h = y2 - y1;
        Self {
            x1,
            y1,
            x2,
            y2,
            w,
            h,
            xc: x1 + w / 2.0,
            yc: y1 + h / 2.0,
            area: w * h,
            _space: PhantomData,
        }
    }

    /// Returns `(x1, y1, x2, y2)`.
    #[inline]
    pub fn corners(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

impl Extent<Pixel> {
    /// Divides every quantity by the image width or height.
    ///
    /// The relative area is recomputed from the relative extents rather than
    /// divided, so `area == w * h` holds in both spaces.
    pub fn to_normalized(&self, size: ImageSize) -> Extent<Normalized> {
        let width = size.width_f64();
        let height = size.height_f64();
        let w = self.w / width;
        let h = self.h / height;
        Extent {
            x1: self.x1 / width,
            y1: self.y1 / height,
            x2: self.x2 / width,
            y2: self.y2 / height,
            w,
            h,
            xc: self.xc / width,
            yc: self.yc / height,
            area: w * h,
            _space: PhantomData,
        }
    }
}

impl Extent<Normalized> {
    /// Scales corners and extents up to pixels.
    ///
    /// Center and area are recomputed from the scaled values.
    pub fn to_pixel(&self, size: ImageSize) -> Extent<Pixel> {
        let width = size.width_f64();
        let height = size.height_f64();
        let x1 = self.x1 * width;
        let y1 = self.y1 * height;
        let w = self.w * width;
        let h = self.h * height;
        Extent {
            x1,
            y1,
            x2: self.x2 * width,
            y2: self.y2 * height,
            w,
            h,
            xc: x1 + w / 2.0,
            yc: y1 + h / 2.0,
            area: w * h,
            _space: PhantomData,
        }
    }
}

impl<TSpace> std::fmt::Debug for Extent<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extent")
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .field("x2", &self.x2)
            .field("y2", &self.y2)
            .field("w", &self.w)
            .field("h", &self.h)
            .field("xc", &self.xc)
            .field("yc", &self.yc)
            .field("area", &self.area)
            .finish()
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Extent<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Extent", 9)?;
        state.serialize_field("x1", &self.x1)?;
        state.serialize_field("y1", &self.y1)?;
        state.serialize_field("x2", &self.x2)?;
        state.serialize_field("y2", &self.y2)?;
        state.serialize_field("w", &self.w)?;
        state.serialize_field("h", &self.h)?;
        state.serialize_field("xc", &self.xc)?;
        state.serialize_field("yc", &self.yc)?;
        state.serialize_field("area", &self.area)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Extent<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only the corners are authoritative; everything else is re-derived.
        #[derive(Deserialize)]
        struct ExtentData {
            x1: f64,
            y1: f64,
            x2: f64,
            y2: f64,
        }
        let data = ExtentData::deserialize(deserializer)?;
        Ok(Extent::from_corners(data.x1, data.y1, data.x2, data.y2))
    }
}
