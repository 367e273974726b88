//! Source→destination path mapping.
//!
//! Pure path math, no filesystem access: given a discovered HEIC file, decide
//! where its JPEG lands. Directory creation is the batch loop's job.

use std::path::{Path, PathBuf};

/// Extensions recognized as HEIC/HEIF input (matched case-insensitively).
pub const HEIC_EXTENSIONS: &[&str] = &["heic", "heif"];

/// True if `path` carries a `.heic`/`.heif` extension in any case.
pub fn is_heic_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| HEIC_EXTENSIONS.iter().any(|h| ext.eq_ignore_ascii_case(h)))
}

/// Compute the destination `.jpg` path for a source file.
///
/// Without an output root the destination sits next to the source. With one,
/// the source's path relative to `input_root` is mirrored under `output_root`:
///
/// ```text
/// input/trip/IMG_0001.HEIC  --(-o out)-->  out/trip/IMG_0001.jpg
/// input/trip/IMG_0001.HEIC  ----------->   input/trip/IMG_0001.jpg
/// ```
///
/// A source outside `input_root` falls back to its bare filename under the
/// output root (cannot happen for paths produced by
/// [`discover`](crate::discover::discover)).
pub fn map_destination(source: &Path, input_root: &Path, output_root: Option<&Path>) -> PathBuf {
    match output_root {
        None => source.with_extension("jpg"),
        Some(out) => {
            let relative = source
                .strip_prefix(input_root)
                .unwrap_or_else(|_| source.file_name().map(Path::new).unwrap_or(source));
            out.join(relative).with_extension("jpg")
        }
    }
}
