use clap::Parser;
use heic2jpg::codec::Quality;
use heic2jpg::{convert, output};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "heic2jpg")]
#[command(about = "Convert HEIC images to JPG format while preserving metadata")]
#[command(long_about = "\
Convert HEIC images to JPG format while preserving metadata

Walks the input folder recursively, converts every .heic/.heif file to a
.jpg carrying the source's EXIF and ICC metadata, and skips files whose
output already exists — re-running over the same tree is cheap and safe.

Without -o, each .jpg lands next to its source. With -o, the input
directory structure is mirrored under the output folder.

Individual conversion failures are reported and counted but do not stop
the run or change the exit code; the run fails only when the input folder
is invalid (exit 2) or contains no HEIC files at all (exit 1).")]
#[command(version)]
struct Cli {
    /// Folder containing HEIC images
    input_folder: PathBuf,

    /// Output folder (default: convert next to each source file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JPG quality (1-100)
    #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (tx, rx) = mpsc::channel();
    let verbose = cli.verbose;
    let printer = std::thread::spawn(move || {
        for event in rx {
            if let Some(line) = output::format_event(&event, verbose) {
                println!("{line}");
            }
        }
    });

    let result = convert::convert_folder(
        &cli.input_folder,
        cli.output.as_deref(),
        Quality::new(cli.quality),
        Some(tx),
    );
    printer.join().unwrap();

    match result {
        Ok(stats) if stats.total == 0 => {
            eprintln!("No HEIC files found in {}", cli.input_folder.display());
            ExitCode::from(1)
        }
        // Per-file failures show up in the summary, not the exit code.
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}
