//! libheif-backed decoder.
//!
//! libheif handles the HEIF container and HEVC payload; this module turns its
//! interleaved RGB plane into an [`RgbImage`] and pulls out the metadata
//! blobs:
//!
//! - EXIF: HEIF stores the payload behind a 4-byte offset to the TIFF header
//!   ([`normalize_exif`]) — the JPEG writer wants the bare TIFF bytes
//! - ICC: raw profile straight off the image handle
//! - Orientation: parsed from the file with nom-exif, `None` when unreadable

use super::backend::{CodecError, DecodedImage, ImageCodec, ImageMetadata};
use image::RgbImage;
use libheif_rs::{ColorSpace, HeifContext, ImageHandle, ItemId, LibHeif, RgbChroma};
use nom_exif::{Exif, ExifIter, ExifTag, MediaParser, MediaSource};
use std::path::Path;

/// Production codec: decodes HEIC/HEIF via libheif.
pub struct LibheifCodec {
    lib_heif: LibHeif,
}

impl LibheifCodec {
    pub fn new() -> Self {
        Self {
            lib_heif: LibHeif::new(),
        }
    }
}

impl Default for LibheifCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for LibheifCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let decode_err = |message: String| CodecError::Decode {
            path: path.to_path_buf(),
            message,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| decode_err("path is not valid UTF-8".into()))?;
        let ctx =
            HeifContext::read_from_file(path_str).map_err(|e| decode_err(e.to_string()))?;
        let handle = ctx
            .primary_image_handle()
            .map_err(|e| decode_err(e.to_string()))?;

        let exif = read_exif_block(&handle);
        let icc_profile = handle.color_profile_raw().map(|p| p.data);
        let orientation = read_orientation(path);

        let image = self
            .lib_heif
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(|e| decode_err(e.to_string()))?;
        let pixels = interleaved_to_rgb(&image)
            .ok_or_else(|| decode_err("decoder returned no interleaved RGB plane".into()))?;

        Ok(DecodedImage {
            pixels,
            metadata: ImageMetadata {
                exif,
                icc_profile,
                orientation,
            },
        })
    }
}

/// Pull the raw EXIF metadata block off the image handle, normalized to bare
/// TIFF bytes. `None` when the file carries no EXIF or the block is mangled;
/// missing metadata never fails a conversion.
fn read_exif_block(handle: &ImageHandle) -> Option<Vec<u8>> {
    let mut ids: Vec<ItemId> = vec![0; 1];
    let count = handle.metadata_block_ids(&mut ids, b"Exif");
    if count == 0 {
        return None;
    }
    let raw = handle.metadata(ids[0]).ok()?;
    normalize_exif(&raw)
}

/// HEIF Exif item payload: a 4-byte big-endian offset to the TIFF header,
/// then the data. Some encoders also put the JPEG-style `Exif\0\0` identifier
/// at the offset target; strip it so only TIFF bytes remain.
fn normalize_exif(raw: &[u8]) -> Option<Vec<u8>> {
    if raw.starts_with(b"II") || raw.starts_with(b"MM") {
        return Some(raw.to_vec());
    }
    if raw.len() < 4 {
        return None;
    }
    let offset = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
    let rest = raw.get(4 + offset..)?;
    let rest = rest.strip_prefix(b"Exif\0\0".as_slice()).unwrap_or(rest);
    (rest.starts_with(b"II") || rest.starts_with(b"MM")).then(|| rest.to_vec())
}

/// Best-effort orientation read (EXIF tag 0x0112). Any parse problem maps to
/// `None`; the conversion does not depend on it.
fn read_orientation(path: &Path) -> Option<u16> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).ok()?;
    if !ms.has_exif() {
        return None;
    }
    let iter: ExifIter = parser.parse(ms).ok()?;
    let exif: Exif = iter.into();
    exif.get(ExifTag::Orientation)?.as_u16()
}

/// Copy libheif's interleaved RGB plane (stride-padded rows) into a tightly
/// packed buffer.
fn interleaved_to_rgb(image: &libheif_rs::Image) -> Option<RgbImage> {
    let planes = image.planes();
    let plane = planes.interleaved?;
    let row_bytes = plane.width as usize * 3;

    let mut buf = Vec::with_capacity(row_bytes * plane.height as usize);
    for row in 0..plane.height as usize {
        let start = row * plane.stride;
        buf.extend_from_slice(plane.data.get(start..start + row_bytes)?);
    }
    RgbImage::from_raw(plane.width, plane.height, buf)
}
