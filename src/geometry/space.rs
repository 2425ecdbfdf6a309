//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters so that absolute pixel
//! quantities and image-relative quantities cannot be mixed up.

use std::fmt;

/// Marker for absolute pixel space, anchored to the image size.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker for image-relative space, where the image spans `[0, 1]` on
/// both axes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
