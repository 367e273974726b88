//! Decode/encode seam.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **HEIC/HEIF decode** | `libheif-rs` (libheif container + HEVC) |
//! | **Orientation tag** | `nom-exif` |
//! | **JPEG encode** | `image` crate `JpegEncoder` |
//! | **EXIF / ICC segments** | written here (APP1/APP2 spliced after SOI) |
//!
//! The module is split into:
//! - **Backend**: [`ImageCodec`] trait + shared metadata types
//! - **Heif**: the production [`LibheifCodec`] decoder
//! - **Jpeg**: encoding, metadata segment layout, atomic file writes

pub mod backend;
pub mod heif;
pub mod jpeg;

pub use backend::{CodecError, DecodedImage, ImageCodec, ImageMetadata};
pub use heif::LibheifCodec;
pub use jpeg::{MetadataCheck, Quality};
