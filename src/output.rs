//! Event formatting for the CLI.
//!
//! Pure event→line rendering, kept out of the converter so the library never
//! writes to stdout. Lines follow the classic `timestamp - LEVEL - message`
//! shape.

use crate::convert::{ConversionStats, ConvertEvent};
use chrono::Local;
use std::path::Path;

/// Render one event as a log line. `None` means the event sits below the
/// current verbosity (the source→destination mapping is DEBUG-only).
pub fn format_event(event: &ConvertEvent, verbose: bool) -> Option<String> {
    match event {
        ConvertEvent::Discovered { count } => Some(line(
            "INFO",
            &format!("Found {count} HEIC file(s) to convert"),
        )),
        ConvertEvent::Mapped {
            source,
            destination,
        } => verbose.then(|| {
            line(
                "DEBUG",
                &format!("{} -> {}", source.display(), destination.display()),
            )
        }),
        ConvertEvent::Converted {
            source,
            destination,
        } => Some(line(
            "INFO",
            &format!(
                "Converted: {} -> {}",
                file_name(source),
                file_name(destination)
            ),
        )),
        ConvertEvent::Skipped { source, .. } => Some(line(
            "INFO",
            &format!("Skipping {} - output already exists", file_name(source)),
        )),
        ConvertEvent::Failed { source, reason } => Some(line(
            "ERROR",
            &format!("Error converting {}: {reason}", source.display()),
        )),
        ConvertEvent::MetadataDropped { source, reason } => Some(line(
            "WARNING",
            &format!("{}: {reason}", file_name(source)),
        )),
        ConvertEvent::Verified { source, check } => {
            if !check.exif_preserved {
                Some(line(
                    "WARNING",
                    &format!("{}: no EXIF data preserved", file_name(source)),
                ))
            } else {
                let icc = if check.icc_preserved {
                    "ICC profile preserved"
                } else {
                    "no ICC profile to preserve"
                };
                verbose.then(|| {
                    line(
                        "DEBUG",
                        &format!("{}: EXIF preserved, {icc}", file_name(source)),
                    )
                })
            }
        }
        ConvertEvent::Summary { stats } => Some(line("INFO", &summary(stats))),
    }
}

/// One-line end-of-run summary with a zero-safe success rate.
pub fn summary(stats: &ConversionStats) -> String {
    format!(
        "Conversion summary: total {}, converted {}, skipped {}, failed {}, success rate {:.1}%",
        stats.total,
        stats.converted,
        stats.skipped,
        stats.failed,
        stats.success_rate() * 100.0
    )
}

fn line(level: &str, message: &str) -> String {
    format!(
        "{} - {level} - {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MetadataCheck;
    use std::path::PathBuf;

    fn converted() -> ConvertEvent {
        ConvertEvent::Converted {
            source: PathBuf::from("/in/a.heic"),
            destination: PathBuf::from("/in/a.jpg"),
        }
    }

    #[test]
    fn info_events_render_at_any_verbosity() {
        let rendered = format_event(&converted(), false).unwrap();
        assert!(rendered.contains(" - INFO - "));
        assert!(rendered.contains("Converted: a.heic -> a.jpg"));
    }

    #[test]
    fn mapping_detail_is_debug_only() {
        let event = ConvertEvent::Mapped {
            source: PathBuf::from("/in/a.heic"),
            destination: PathBuf::from("/out/a.jpg"),
        };
        assert_eq!(format_event(&event, false), None);

        let rendered = format_event(&event, true).unwrap();
        assert!(rendered.contains(" - DEBUG - "));
        assert!(rendered.contains("/in/a.heic -> /out/a.jpg"));
    }

    #[test]
    fn failures_render_at_error_level() {
        let event = ConvertEvent::Failed {
            source: PathBuf::from("/in/bad.heic"),
            reason: "truncated box".into(),
        };
        let rendered = format_event(&event, false).unwrap();
        assert!(rendered.contains(" - ERROR - "));
        assert!(rendered.contains("truncated box"));
    }

    #[test]
    fn missing_exif_after_write_warns_at_any_verbosity() {
        let event = ConvertEvent::Verified {
            source: PathBuf::from("/in/a.heic"),
            check: MetadataCheck::default(),
        };
        let rendered = format_event(&event, false).unwrap();
        assert!(rendered.contains(" - WARNING - "));
        assert!(rendered.contains("a.heic: no EXIF data preserved"));
    }

    #[test]
    fn successful_verification_is_debug_only() {
        let event = ConvertEvent::Verified {
            source: PathBuf::from("/in/a.heic"),
            check: MetadataCheck {
                exif_preserved: true,
                icc_preserved: true,
            },
        };
        assert_eq!(format_event(&event, false), None);

        let rendered = format_event(&event, true).unwrap();
        assert!(rendered.contains(" - DEBUG - "));
        assert!(rendered.contains("EXIF preserved, ICC profile preserved"));
    }

    #[test]
    fn summary_guards_against_zero_total() {
        let rendered = summary(&ConversionStats::default());
        assert!(rendered.contains("total 0"));
        assert!(rendered.contains("success rate 0.0%"));
    }

    #[test]
    fn summary_reports_rate_over_total() {
        let stats = ConversionStats {
            total: 4,
            converted: 3,
            skipped: 0,
            failed: 1,
        };
        assert!(summary(&stats).contains("success rate 75.0%"));
    }
}
