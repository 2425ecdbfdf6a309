//! Bounding box geometry.
//!
//! A [`BoundingBox`] is built from exactly one of three encodings and keeps
//! a single canonical form: absolute pixel corners, clamped to the image.
//! Everything else is derived at construction.
//!
//! | encoding | components                 | space    |
//! |----------|----------------------------|----------|
//! | YOLO     | `(xc, yc, w, h)`           | relative |
//! | VOC      | `(x1, y1, x2, y2)`         | pixels   |
//! | COCO     | `(x1, y1, w, h)`           | pixels   |
//!
//! VOC and COCO clamp their corners in pixel space and divide down. YOLO
//! clamps in relative space first and scales up. The order matters at the
//! image border, so it is fixed per encoding.
//!
//! # Example
//!
//! ```
//! use mlobject::geometry::{BoundingBox, BoxInput, ImageSize};
//!
//! let bbox = BoundingBox::new(ImageSize::new(100, 100), BoxInput::Coco((30.0, 30.0, 40.0, 40.0)))
//!     .with_label("person");
//! assert_eq!(bbox.voc(), (30.0, 30.0, 70.0, 70.0));
//! assert_eq!(bbox.yolo(), (0.5, 0.5, 0.4, 0.4));
//! ```

mod bbox;
mod extent;
mod size;
mod space;

pub use bbox::{BoundingBox, BoxData, BoxInput, Quad, DEFAULT_CONFIDENCE};
pub use extent::Extent;
pub use size::ImageSize;
pub use space::{Normalized, Pixel};
