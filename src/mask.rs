//! Instance masks with consistent RLE, polygon and dense views.
//!
//! A [`Mask`] keeps its RLE as the canonical form. Whichever encoding it was
//! built from, the other one is derived through a [`MaskCodec`] and a
//! [`PolygonTracer`], and its [`BoundingBox`] comes from the RLE's tight
//! COCO box.
//!
//! Going from RLE to polygons is lossy: traced outlines run through the
//! centres of boundary pixels, so re-rasterising them yields a slightly
//! smaller pixel set. The reverse direction is exact up to the codec's scan
//! conversion.
//!
//! # Example
//!
//! ```
//! use mlobject::geometry::ImageSize;
//! use mlobject::mask::{Mask, MaskInput};
//!
//! let square = vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0];
//! let mask = Mask::new(ImageSize::new(20, 20), MaskInput::Polygons(vec![square]))?;
//! assert_eq!(mask.area(), 100);
//! assert_eq!(mask.bbox().voc(), (0.0, 0.0, 10.0, 10.0));
//! # Ok::<(), mlobject::MlObjectError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::codec::{
    BinaryMask, CocoRleCodec, ContourTracer, MaskCodec, Polygon, PolygonTracer, Rle,
};
use crate::error::MlObjectError;
use crate::geometry::{BoundingBox, BoxInput, ImageSize, DEFAULT_CONFIDENCE};

/// The encoding a [`Mask`] is constructed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskInput {
    Rle(Rle),
    Polygons(Vec<Polygon>),
}

impl MaskInput {
    /// Picks the RLE if present, otherwise the polygons.
    ///
    /// An empty polygon list counts as absent. Fails with
    /// [`MlObjectError::MissingEncoding`] if nothing usable is left.
    pub fn first_of(
        rle: Option<Rle>,
        polygons: Option<Vec<Polygon>>,
    ) -> Result<Self, MlObjectError> {
        rle.map(MaskInput::Rle)
            .or_else(|| {
                polygons
                    .filter(|p| !p.is_empty())
                    .map(MaskInput::Polygons)
            })
            .ok_or(MlObjectError::MissingEncoding {
                expected: "rle or polygons",
            })
    }
}

/// Serializable snapshot of a mask: metadata plus its polygons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskData {
    pub label: Option<String>,
    pub confidence: f64,
    pub polygons: Vec<Polygon>,
}

/// A segmentation mask on an image of known size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mask {
    image_size: ImageSize,
    label: Option<String>,
    confidence: f64,
    rle: Rle,
    polygons: Vec<Polygon>,
    area: u64,
    bbox: BoundingBox,
}

impl Mask {
    /// Builds a mask with the bundled [`CocoRleCodec`] and a default
    /// [`ContourTracer`].
    pub fn new(image_size: ImageSize, input: MaskInput) -> Result<Self, MlObjectError> {
        Self::with_backends(image_size, input, &CocoRleCodec, &ContourTracer::default())
    }

    /// Builds a mask from optional encodings, preferring the RLE.
    pub fn from_encodings(
        image_size: ImageSize,
        rle: Option<Rle>,
        polygons: Option<Vec<Polygon>>,
    ) -> Result<Self, MlObjectError> {
        Self::new(image_size, MaskInput::first_of(rle, polygons)?)
    }

    /// Builds a mask with a caller-supplied codec and tracer.
    ///
    /// Errors from either collaborator are returned unchanged.
    pub fn with_backends<C, T>(
        image_size: ImageSize,
        input: MaskInput,
        codec: &C,
        tracer: &T,
    ) -> Result<Self, MlObjectError>
    where
        C: MaskCodec + ?Sized,
        T: PolygonTracer + ?Sized,
    {
        let (rle, polygons) = match input {
            MaskInput::Rle(rle) => {
                let dense = codec.decode(&rle)?;
                let polygons = tracer.trace(&dense)?;
                tracing::debug!(
                    %image_size,
                    polygons = polygons.len(),
                    "traced polygons from rle"
                );
                (rle, polygons)
            }
            MaskInput::Polygons(polygons) => {
                let rles = codec.fr_polygons(&polygons, image_size)?;
                let rle = codec.merge(&rles)?;
                tracing::debug!(
                    %image_size,
                    polygons = polygons.len(),
                    runs = rle.counts.len(),
                    "encoded polygons to rle"
                );
                (rle, polygons)
            }
        };

        let area = codec.area(&rle);
        let bbox = BoundingBox::new(image_size, BoxInput::Coco(codec.to_bbox(&rle)));

        Ok(Self {
            image_size,
            label: None,
            confidence: DEFAULT_CONFIDENCE,
            rle,
            polygons,
            area,
            bbox,
        })
    }

    /// Attaches a class label to the mask and its box.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self.sync_bbox_metadata()
    }

    /// Attaches a confidence score to the mask and its box.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self.sync_bbox_metadata()
    }

    fn sync_bbox_metadata(mut self) -> Self {
        self.bbox = self
            .bbox
            .with_metadata(self.label.clone(), self.confidence);
        self
    }

    /// Decodes the RLE into a dense mask.
    ///
    /// Nothing is cached; every call decodes again.
    pub fn get_mask(&self) -> Result<BinaryMask, MlObjectError> {
        self.get_mask_with(&CocoRleCodec)
    }

    /// Alias for [`Mask::get_mask`].
    pub fn mask(&self) -> Result<BinaryMask, MlObjectError> {
        self.get_mask()
    }

    /// Decodes the RLE with a caller-supplied codec.
    pub fn get_mask_with<C: MaskCodec + ?Sized>(
        &self,
        codec: &C,
    ) -> Result<BinaryMask, MlObjectError> {
        Ok(codec.decode(&self.rle)?)
    }

    /// Number of foreground pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        self.area
    }

    #[inline]
    pub fn rle(&self) -> &Rle {
        &self.rle
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
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
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    #[inline]
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    pub fn data(&self) -> MaskData {
        MaskData {
            label: self.label.clone(),
            confidence: self.confidence,
            polygons: self.polygons.clone(),
        }
    }
}
