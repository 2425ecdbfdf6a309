//! Bounding boxes convertible between YOLO, VOC and COCO encodings.

use serde::{Deserialize, Serialize};

use super::extent::Extent;
use super::size::ImageSize;
use super::space::{Normalized, Pixel};
use crate::error::MlObjectError;

/// A fixed four-component box encoding.
pub type Quad = (f64, f64, f64, f64);

/// Confidence assigned when the caller does not provide one.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// The encoding a [`BoundingBox`] is constructed from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxInput {
    /// `(xc, yc, w, h)`, all relative to the image size.
    Yolo(Quad),
    /// `(x1, y1, x2, y2)` absolute pixel corners.
    Voc(Quad),
    /// `(x1, y1, w, h)` absolute top-left corner and extent.
    Coco(Quad),
}

impl BoxInput {
    /// Picks the first encoding present, in yolo, voc, coco order.
    ///
    /// Fails with [`MlObjectError::MissingEncoding`] if all three are `None`.
    pub fn first_of(
        yolo: Option<Quad>,
        voc: Option<Quad>,
        coco: Option<Quad>,
    ) -> Result<Self, MlObjectError> {
        yolo.map(BoxInput::Yolo)
            .or(voc.map(BoxInput::Voc))
            .or(coco.map(BoxInput::Coco))
            .ok_or(MlObjectError::MissingEncoding {
                expected: "yolo, voc or coco",
            })
    }

    fn name(&self) -> &'static str {
        match self {
            BoxInput::Yolo(_) => "yolo",
            BoxInput::Voc(_) => "voc",
            BoxInput::Coco(_) => "coco",
        }
    }
}

/// Serializable snapshot of a box: metadata plus its VOC corners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxData {
    pub label: Option<String>,
    pub confidence: f64,
    pub voc_bbox: Quad,
}

/// An axis-aligned box on an image of known size.
///
/// The clamped absolute corners are the canonical geometry; every other
/// quantity, absolute or relative, is derived once in [`BoundingBox::new`]
/// and read back as a plain field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    image_size: ImageSize,
    label: Option<String>,
    confidence: f64,
    #[serde(rename = "absolute")]
    abs: Extent<Pixel>,
    #[serde(rename = "relative")]
    rel: Extent<Normalized>,
}

/// Clamps a `(lo, hi)` span to `[0, bound]` with `hi >= lo`.
fn clamp_span(lo: f64, hi: f64, bound: f64) -> (f64, f64) {
    let lo = lo.max(0.0).min(bound);
    let hi = hi.min(bound).max(lo);
    (lo, hi)
}

impl BoundingBox {
    /// Builds a box from one encoding, clamping it to the image.
    pub fn new(image_size: ImageSize, input: BoxInput) -> Self {
        let (abs, rel) = match input {
            BoxInput::Yolo(yolo) => {
                // YOLO clamps in relative space; pixel space is scaled from it.
                let rel = from_yolo(yolo);
                (rel.to_pixel(image_size), rel)
            }
            BoxInput::Voc(voc) => {
                let abs = from_voc(voc, image_size);
                (abs, abs.to_normalized(image_size))
            }
            BoxInput::Coco((x1, y1, w, h)) => {
                let abs = from_voc((x1, y1, x1 + w, y1 + h), image_size);
                (abs, abs.to_normalized(image_size))
            }
        };

        tracing::trace!(
            encoding = input.name(),
            %image_size,
            voc = ?abs.corners(),
            "built bounding box"
        );

        Self {
            image_size,
            label: None,
            confidence: DEFAULT_CONFIDENCE,
            abs,
            rel,
        }
    }

    /// Builds a box from optional encodings, honouring yolo > voc > coco.
    pub fn from_encodings(
        image_size: ImageSize,
        yolo: Option<Quad>,
        voc: Option<Quad>,
        coco: Option<Quad>,
    ) -> Result<Self, MlObjectError> {
        Ok(Self::new(image_size, BoxInput::first_of(yolo, voc, coco)?))
    }

    /// Attaches a class label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches a confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub(crate) fn with_metadata(mut self, label: Option<String>, confidence: f64) -> Self {
        self.label = label;
        self.confidence = confidence;
        self
    }

    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[inline]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[inline]
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// All pixel-space quantities.
    #[inline]
    pub fn absolute(&self) -> &Extent<Pixel> {
        &self.abs
    }

    /// All image-relative quantities.
    #[inline]
    pub fn relative(&self) -> &Extent<Normalized> {
        &self.rel
    }

    /// Returns `(xc_r, yc_r, w_r, h_r)`.
    pub fn yolo(&self) -> Quad {
        (self.rel.xc, self.rel.yc, self.rel.w, self.rel.h)
    }

    /// Returns `(x1_a, y1_a, x2_a, y2_a)`.
    pub fn voc(&self) -> Quad {
        self.abs.corners()
    }

    /// Returns `(x1_a, y1_a, w_a, h_a)`.
    pub fn coco(&self) -> Quad {
        (self.abs.x1, self.abs.y1, self.abs.w, self.abs.h)
    }

    pub fn data(&self) -> BoxData {
        BoxData {
            label: self.label.clone(),
            confidence: self.confidence,
            voc_bbox: self.voc(),
        }
    }
}

macro_rules! scalar_accessors {
    ($space:ident: $($name:ident => $field:ident),* $(,)?) => {
        impl BoundingBox {
            $(
                #[inline]
                pub fn $name(&self) -> f64 {
                    self.$space.$field
                }
            )*
        }
    };
}

scalar_accessors!(abs:
    x1_a => x1, y1_a => y1, x2_a => x2, y2_a => y2,
    w_a => w, h_a => h, xc_a => xc, yc_a => yc, area_a => area,
);

scalar_accessors!(rel:
    x1_r => x1, y1_r => y1, x2_r => x2, y2_r => y2,
    w_r => w, h_r => h, xc_r => xc, yc_r => yc, area_r => area,
);

fn from_yolo((xc, yc, w, h): Quad) -> Extent<Normalized> {
    let (x1, x2) = clamp_span(xc - w / 2.0, xc + w / 2.0, 1.0);
    let (y1, y2) = clamp_span(yc - h / 2.0, yc + h / 2.0, 1.0);
    Extent::from_corners(x1, y1, x2, y2)
}

fn from_voc((x1, y1, x2, y2): Quad, size: ImageSize) -> Extent<Pixel> {
    let (cx1, cx2) = clamp_span(x1, x2, size.width_f64());
    let (cy1, cy2) = clamp_span(y1, y2, size.height_f64());
    if (cx1, cy1, cx2, cy2) != (x1, y1, x2, y2) {
        tracing::debug!(
            requested = ?(x1, y1, x2, y2),
            clamped = ?(cx1, cy1, cx2, cy2),
            %size,
            "clamped box to image bounds"
        );
    }
    Extent::from_corners(cx1, cy1, cx2, cy2)
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x1, y1, x2, y2) = self.voc();
        write!(
            f,
            "{} ({:.3}) [{}, {}, {}, {}] on {}",
            self.label.as_deref().unwrap_or("<unlabeled>"),
            self.confidence,
            x1,
            y1,
            x2,
            y2,
            self.image_size
        )
    }
}
