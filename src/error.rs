use thiserror::Error;

/// The main error type for mlobject operations.
#[derive(Debug, Error)]
pub enum MlObjectError {
    #[error("Missing encoding: please supply one of {expected}")]
    MissingEncoding { expected: &'static str },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to write JSON output: {0}")]
    JsonOutput(#[from] serde_json::Error),
}

/// Errors raised by a mask codec or polygon tracer.
///
/// These pass through [`MlObjectError::Codec`] untouched; the core types
/// never inspect or recover from them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("Malformed RLE: run lengths sum to {actual} but the mask has {expected} pixels")]
    MalformedRle { expected: u64, actual: u64 },

    #[error("RLE size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch { expected: [u32; 2], actual: [u32; 2] },

    #[error("Image of size {size:?} has too many pixels for 32-bit run lengths")]
    ImageTooLarge { size: [u32; 2] },

    #[error("Cannot merge an empty list of RLEs")]
    EmptyMerge,

    #[error("Invalid polygon at index {index}: {reason}")]
    InvalidPolygon { index: usize, reason: String },

    #[error("Invalid compressed RLE counts: {reason}")]
    InvalidCompressedCounts { reason: String },

    #[error("Polygon tracing failed: {0}")]
    Trace(String),
}
