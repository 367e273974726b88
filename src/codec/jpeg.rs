//! JPEG encoding with metadata segments.
//!
//! The `image` crate's encoder produces the compressed scan; EXIF and ICC are
//! spliced in afterwards as raw APPn segments:
//!
//! - EXIF → one APP1 segment, `Exif\0\0` + TIFF payload
//! - ICC → APP2 segments, `ICC_PROFILE\0` + chunk index/total, split because
//!   a segment length field is 16 bits
//!
//! Writes are atomic: encode fully in memory, write to a temp file in the
//! destination directory, then rename without clobbering.

use super::backend::{CodecError, ImageMetadata};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use std::io::Write;
use std::path::Path;

/// JPEG quality (1–100). Values outside the range are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP1: u8 = 0xE1;
const APP2: u8 = 0xE2;
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";
const ICC_IDENTIFIER: &[u8] = b"ICC_PROFILE\0";

/// Max payload bytes per APPn segment: 16-bit length field, minus the two
/// length bytes it counts.
const MAX_SEGMENT_PAYLOAD: usize = 65533;

/// Encoded JPEG plus any non-fatal metadata problems hit along the way.
#[derive(Debug)]
pub struct EncodedJpeg {
    pub bytes: Vec<u8>,
    pub warnings: Vec<String>,
}

/// Encode `pixels` as a JPEG at `quality`, attaching the metadata blobs.
///
/// Metadata that cannot be represented (an EXIF block too large for a single
/// APP1 segment, an ICC profile needing more chunks than the one-byte chunk
/// count can address) is dropped with a warning instead of failing the
/// conversion.
pub fn encode(
    pixels: &RgbImage,
    metadata: &ImageMetadata,
    quality: Quality,
) -> Result<EncodedJpeg, CodecError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8);
    encoder
        .encode_image(pixels)
        .map_err(|e| CodecError::Encode(e.to_string()))?;

    let mut warnings = Vec::new();
    let mut segments: Vec<Vec<u8>> = Vec::new();

    if let Some(exif) = &metadata.exif {
        match exif_segment(exif) {
            Some(segment) => segments.push(segment),
            None => warnings.push(format!(
                "EXIF block too large for an APP1 segment ({} bytes), dropped",
                exif.len()
            )),
        }
    }
    if let Some(icc) = &metadata.icc_profile {
        match icc_segments(icc) {
            Some(markers) => segments.extend(markers),
            None => warnings.push(format!(
                "ICC profile too large to embed ({} bytes), dropped",
                icc.len()
            )),
        }
    }

    let bytes = insert_after_soi(bytes, &segments)?;
    Ok(EncodedJpeg { bytes, warnings })
}

/// Write `bytes` to `destination` atomically: temp file in the same
/// directory, then a no-clobber rename. A failed write leaves no partial
/// destination behind.
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let dir = destination.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(bytes)?;
    tmp.persist_noclobber(destination)
        .map_err(|e| CodecError::Io(e.error))?;
    Ok(())
}

/// Which metadata segments actually made it into a written JPEG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataCheck {
    pub exif_preserved: bool,
    pub icc_preserved: bool,
}

/// Best-effort post-write check of the destination file.
///
/// Walks the APPn segments ahead of the scan data and reports which metadata
/// blobs are present. Any read or parse problem just reports the blobs as
/// absent; verification never fails a conversion.
pub fn verify_metadata(path: &Path) -> MetadataCheck {
    std::fs::read(path)
        .map(|bytes| scan_segments(&bytes))
        .unwrap_or_default()
}

fn scan_segments(bytes: &[u8]) -> MetadataCheck {
    let mut check = MetadataCheck::default();
    if !bytes.starts_with(&SOI) {
        return check;
    }

    let mut pos = SOI.len();
    while pos + 4 <= bytes.len() && bytes[pos] == 0xFF {
        let marker = bytes[pos + 1];
        // SOS starts the entropy-coded data; no metadata past this point.
        if marker == 0xDA {
            break;
        }
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let Some(payload) = bytes.get(pos + 4..pos + 2 + length) else {
            break;
        };
        if marker == APP1 && payload.starts_with(EXIF_IDENTIFIER) {
            check.exif_preserved = true;
        }
        if marker == APP2 && payload.starts_with(ICC_IDENTIFIER) {
            check.icc_preserved = true;
        }
        pos += 2 + length;
    }
    check
}

fn app_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + 2) as u16;
    let mut segment = Vec::with_capacity(payload.len() + 4);
    segment.push(0xFF);
    segment.push(marker);
    segment.extend_from_slice(&length.to_be_bytes());
    segment.extend_from_slice(payload);
    segment
}

/// Build the APP1 EXIF segment, or `None` if the payload cannot fit.
fn exif_segment(exif: &[u8]) -> Option<Vec<u8>> {
    let mut payload = Vec::with_capacity(EXIF_IDENTIFIER.len() + exif.len());
    payload.extend_from_slice(EXIF_IDENTIFIER);
    payload.extend_from_slice(exif);
    (payload.len() <= MAX_SEGMENT_PAYLOAD).then(|| app_segment(APP1, &payload))
}

/// Build APP2 ICC segments. Large profiles span several segments, each
/// tagged with a 1-based chunk index and the chunk count — both single
/// bytes, so a profile needing more than 255 chunks cannot be embedded at
/// all and yields `None`.
fn icc_segments(icc: &[u8]) -> Option<Vec<Vec<u8>>> {
    let max_chunk = MAX_SEGMENT_PAYLOAD - ICC_IDENTIFIER.len() - 2;
    let chunks: Vec<&[u8]> = icc.chunks(max_chunk).collect();
    let total = u8::try_from(chunks.len()).ok()?;

    let markers = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut payload = Vec::with_capacity(ICC_IDENTIFIER.len() + 2 + chunk.len());
            payload.extend_from_slice(ICC_IDENTIFIER);
            payload.push((i + 1) as u8);
            payload.push(total);
            payload.extend_from_slice(chunk);
            app_segment(APP2, &payload)
        })
        .collect();
    Some(markers)
}

/// Splice raw segments in right after the SOI marker.
fn insert_after_soi(jpeg: Vec<u8>, segments: &[Vec<u8>]) -> Result<Vec<u8>, CodecError> {
    if segments.is_empty() {
        return Ok(jpeg);
    }
    if jpeg.len() < 2 || jpeg[..2] != SOI {
        return Err(CodecError::Encode(
            "encoder produced data without an SOI marker".into(),
        ));
    }

    let extra: usize = segments.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(jpeg.len() + extra);
    out.extend_from_slice(&SOI);
    for segment in segments {
        out.extend_from_slice(segment);
    }
    out.extend_from_slice(&jpeg[2..]);
    Ok(out)
}
