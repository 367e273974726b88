//! Codec trait and shared types.
//!
//! The batch pipeline is written against [`ImageCodec`] so its control flow
//! can be tested with a mock instead of real HEIC fixtures. The production
//! implementation is [`LibheifCodec`](super::heif::LibheifCodec).

use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Metadata carried from source to destination as opaque blobs.
///
/// Field mapping:
/// - `exif`: TIFF-structured EXIF payload, written verbatim into the JPEG
///   APP1 segment after the `Exif\0\0` identifier
/// - `icc_profile`: raw ICC profile, chunked into APP2 segments
/// - `orientation`: EXIF tag 0x0112 where readable — informational for
///   callers; viewers act on the copy inside `exif`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub exif: Option<Vec<u8>>,
    pub icc_profile: Option<Vec<u8>>,
    pub orientation: Option<u16>,
}

impl ImageMetadata {
    /// True when there is nothing to attach to the output.
    pub fn is_empty(&self) -> bool {
        self.exif.is_none() && self.icc_profile.is_none()
    }
}

/// A decoded source image: pixels plus whatever metadata the decoder exposed.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbImage,
    pub metadata: ImageMetadata,
}

/// Trait for source-image decoders.
pub trait ImageCodec {
    /// Decode `path` into RGB pixels and extract its metadata blobs.
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;
}
