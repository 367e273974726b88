//! Batch conversion.
//!
//! The per-file pipeline repeated over the discovered list: map the
//! destination, convert, record the outcome. Only discovery errors abort a
//! run; every per-file problem becomes a `Failed` count and processing
//! continues with the next file.

use crate::codec::{ImageCodec, LibheifCodec, MetadataCheck, Quality, jpeg};
use crate::discover::{self, DiscoverError};
use crate::naming::map_destination;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),
}

/// Terminal result for one file.
///
/// Per-file state machine: `Discovered → {Skipped | Converted | Failed}`,
/// terminal in all three cases. No in-run retries — re-running the batch is
/// the retry mechanism, and skip-if-exists makes that cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Destination written. `warnings` lists metadata that could not be
    /// carried over, and `check` reports what a read-back of the written
    /// file actually found (both non-fatal).
    Converted {
        warnings: Vec<String>,
        check: MetadataCheck,
    },
    /// Destination already existed; the source was not read.
    Skipped,
    /// Decode or write failed; no destination file was left behind.
    Failed { reason: String },
}

/// Aggregate counts for one batch run.
///
/// `total == converted + skipped + failed` holds after every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ConversionStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted { .. } => self.converted += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Fraction of discovered files that converted; 0.0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.converted as f64 / self.total as f64
        }
    }
}

/// Progress events emitted over the injected sink.
///
/// The converter never prints or logs on its own; the caller decides what to
/// do with these (the CLI renders them via [`output`](crate::output)).
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    /// Discovery finished; `count` files will be processed.
    Discovered { count: usize },
    /// Computed source→destination mapping (verbose detail).
    Mapped {
        source: PathBuf,
        destination: PathBuf,
    },
    Converted {
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped {
        source: PathBuf,
        destination: PathBuf,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
    /// A metadata blob was dropped while converting `source`.
    MetadataDropped {
        source: PathBuf,
        reason: String,
    },
    /// Read-back of the written destination for `source`.
    Verified {
        source: PathBuf,
        check: MetadataCheck,
    },
    /// Batch finished.
    Summary { stats: ConversionStats },
}

pub type EventSink = Sender<ConvertEvent>;

fn emit(events: Option<&EventSink>, event: ConvertEvent) {
    if let Some(tx) = events {
        // A dropped receiver just means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Convert a single file. Never panics and never leaves a partial
/// destination: every failure mode folds into [`Outcome::Failed`].
///
/// The destination's parent directory is created only once there are encoded
/// bytes to write, so skipped and failed files leave no empty directories
/// behind.
pub fn convert_one(
    codec: &impl ImageCodec,
    source: &Path,
    destination: &Path,
    quality: Quality,
) -> Outcome {
    if destination.exists() {
        return Outcome::Skipped;
    }

    let decoded = match codec.decode(source) {
        Ok(decoded) => decoded,
        Err(e) => return Outcome::Failed { reason: e.to_string() },
    };
    let encoded = match jpeg::encode(&decoded.pixels, &decoded.metadata, quality) {
        Ok(encoded) => encoded,
        Err(e) => return Outcome::Failed { reason: e.to_string() },
    };
    if let Err(e) = prepare_destination_dir(destination) {
        return Outcome::Failed { reason: e.to_string() };
    }
    match jpeg::write_atomic(destination, &encoded.bytes) {
        Ok(()) => Outcome::Converted {
            warnings: encoded.warnings,
            check: jpeg::verify_metadata(destination),
        },
        Err(e) => Outcome::Failed { reason: e.to_string() },
    }
}

/// Convert every HEIC/HEIF file under `input_root` with the production
/// libheif codec. See [`convert_folder_with_codec`].
pub fn convert_folder(
    input_root: &Path,
    output_root: Option<&Path>,
    quality: Quality,
    events: Option<EventSink>,
) -> Result<ConversionStats, ConvertError> {
    let codec = LibheifCodec::new();
    convert_folder_with_codec(&codec, input_root, output_root, quality, events)
}

/// Convert a folder using a specific codec (allows testing with a mock).
///
/// Files are processed strictly one at a time; each file's decoded pixels
/// and metadata buffers are dropped before the next file starts.
pub fn convert_folder_with_codec(
    codec: &impl ImageCodec,
    input_root: &Path,
    output_root: Option<&Path>,
    quality: Quality,
    events: Option<EventSink>,
) -> Result<ConversionStats, ConvertError> {
    let events = events.as_ref();
    let files = discover::discover(input_root)?;
    emit(events, ConvertEvent::Discovered { count: files.len() });

    let mut stats = ConversionStats {
        total: files.len(),
        ..Default::default()
    };

    for source in &files {
        let destination = map_destination(source, input_root, output_root);
        emit(
            events,
            ConvertEvent::Mapped {
                source: source.clone(),
                destination: destination.clone(),
            },
        );

        let outcome = convert_one(codec, source, &destination, quality);
        stats.record(&outcome);

        match &outcome {
            Outcome::Converted { warnings, check } => {
                for warning in warnings {
                    emit(
                        events,
                        ConvertEvent::MetadataDropped {
                            source: source.clone(),
                            reason: warning.clone(),
                        },
                    );
                }
                emit(
                    events,
                    ConvertEvent::Converted {
                        source: source.clone(),
                        destination: destination.clone(),
                    },
                );
                emit(
                    events,
                    ConvertEvent::Verified {
                        source: source.clone(),
                        check: *check,
                    },
                );
            }
            Outcome::Skipped => emit(
                events,
                ConvertEvent::Skipped {
                    source: source.clone(),
                    destination: destination.clone(),
                },
            ),
            Outcome::Failed { reason } => emit(
                events,
                ConvertEvent::Failed {
                    source: source.clone(),
                    reason: reason.clone(),
                },
            ),
        }
    }

    emit(events, ConvertEvent::Summary { stats });
    Ok(stats)
}

/// Create the destination's parent directory. Idempotent.
fn prepare_destination_dir(destination: &Path) -> std::io::Result<()> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
