//! # heic2jpg
//!
//! Batch converter from HEIC/HEIF to JPEG that carries the source's metadata
//! (EXIF block, ICC color profile, orientation) over to the output. It walks
//! an input folder recursively, converts each file it finds, and either drops
//! the `.jpg` next to its source or mirrors the directory structure into a
//! separate output root.
//!
//! # Pipeline
//!
//! Every file goes through the same linear per-file pipeline:
//!
//! ```text
//! discover  →  map destination  →  convert one  →  record outcome
//! ```
//!
//! with three terminal outcomes per file: `Converted`, `Skipped` (the
//! destination already exists), or `Failed` (decode or write error). One
//! file's failure never stops the batch — failures are counted, reported,
//! and processing moves on to the next file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Recursive walk of the input root, case-insensitive `.heic`/`.heif` selection |
//! | [`naming`] | Pure source→destination path mapping (`.jpg` swap, output-root mirroring) |
//! | [`codec`] | Decode/encode seam: [`codec::ImageCodec`] trait, libheif decoder, JPEG writer |
//! | [`convert`] | Batch orchestration: per-file outcomes, stats, event emission |
//! | [`output`] | Formatting of conversion events into timestamped log lines |
//!
//! # Design Decisions
//!
//! ## Skip-If-Exists Idempotence
//!
//! A destination file is never overwritten. Re-running the tool over the same
//! tree converts nothing new and costs almost nothing — already-converted
//! files are skipped before the source is even opened. There are no in-run
//! retries; re-running the batch *is* the retry mechanism.
//!
//! ## Outcomes, Not Exceptions
//!
//! The per-file operation returns an explicit [`convert::Outcome`] value
//! rather than propagating errors upward. The batch loop aggregates outcomes
//! into [`convert::ConversionStats`], which makes the continue-on-failure
//! contract directly testable.
//!
//! ## Injected Event Sink
//!
//! The converter holds no global logger. Callers pass an optional
//! `mpsc::Sender<ConvertEvent>`; the CLI runs a printer thread that renders
//! events through [`output`]. Library callers can pass `None` and work from
//! the returned stats alone.
//!
//! ## Atomic Writes
//!
//! JPEGs are encoded fully in memory, written to a temp file in the
//! destination directory, and renamed into place without clobbering. A
//! failure mid-write leaves no partial destination file behind.

pub mod codec;
pub mod convert;
pub mod discover;
pub mod naming;
pub mod output;
