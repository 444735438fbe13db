//! text-compressor: compress and decompress UTF-8 text files.
//!
//! Usage:
//!   text-compressor compress INPUT OUTPUT [--algo rle|huffman] [--force] [--verbose]
//!   text-compressor decompress INPUT OUTPUT [--force] [--verbose]
//!   text-compressor bench [FILES...] [--seed N] [--sample-bytes N]
//!
//! Exit codes: 0 on success, 1 for usage, overwrite and I/O problems, 2 for
//! archives that are unrecognized or damaged.

mod bench;
mod config;
mod input_gen;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use text_compressor_core::{detect_algorithm, Algorithm, CompressionStats};
use thiserror::Error;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Action, Config};

/// Failures reported by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    #[error("{} is not a recognized archive", .0.display())]
    UnrecognizedArchive(PathBuf),

    #[error("{algorithm} did not reproduce {name} on decompression")]
    RoundTripMismatch { name: String, algorithm: Algorithm },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Codec(#[from] text_compressor_core::Error),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::UnrecognizedArchive(_) => 2,
            CliError::Codec(err) if err.is_corruption() => 2,
            _ => 1,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => {
            // --help and --version arrive here as well
            if let Err(io_err) = err.print() {
                eprintln!("error: could not write usage message: {}", io_err);
            }
            return ExitCode::from(usage_exit_code(&err));
        }
    };

    init_tracing(config.log_level);

    if config.print_config {
        config.print();
    }

    match run(&config.action) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

/// Exit code for a failed parse; help and version requests succeed.
fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn init_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {}", err);
    }
}

fn run(action: &Action) -> Result<(), CliError> {
    match action {
        Action::Compress {
            input,
            output,
            algorithm,
            force,
            verbose,
        } => {
            ensure_writable(output, *force)?;
            let stats = algorithm.compressor().compress(input, output)?;
            report(&stats, *verbose);
        }
        Action::Decompress {
            input,
            output,
            force,
            verbose,
        } => {
            ensure_writable(output, *force)?;
            let algorithm = sniff_algorithm(input)?;
            debug!(%algorithm, input = %input.display(), "detected archive format");
            let stats = algorithm.compressor().decompress(input, output)?;
            report(&stats, *verbose);
        }
        Action::Bench {
            files,
            seed,
            sample_bytes,
        } => {
            let inputs = bench::load_inputs(files, *seed, *sample_bytes)?;
            let rows = bench::run(&inputs)?;
            print!("{}", bench::format_table(&rows));
        }
    }
    Ok(())
}

fn ensure_writable(output: &Path, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(CliError::OutputExists(output.to_path_buf()));
    }
    Ok(())
}

/// Identify the codec from the archive's leading magic bytes.
fn sniff_algorithm(path: &Path) -> Result<Algorithm, CliError> {
    let mut head = Vec::with_capacity(4);
    File::open(path)?.take(4).read_to_end(&mut head)?;
    detect_algorithm(&head).ok_or_else(|| CliError::UnrecognizedArchive(path.to_path_buf()))
}

fn report(stats: &CompressionStats, verbose: bool) {
    if verbose {
        println!("{}", stats);
        println!("saved {:.1}%", stats.savings_percent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn compress(input: &Path, output: &Path, algorithm: Algorithm, force: bool) -> Action {
        Action::Compress {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            algorithm,
            force,
            verbose: false,
        }
    }

    fn decompress(input: &Path, output: &Path, force: bool) -> Action {
        Action::Decompress {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            force,
            verbose: true,
        }
    }

    #[test]
    fn test_usage_exit_codes() {
        let help = Config::from_args(["text-compressor", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);

        let missing = Config::from_args(["text-compressor", "compress", "in.txt"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing), 1);

        let unknown = Config::from_args(["text-compressor", "shrink"]).unwrap_err();
        assert_eq!(usage_exit_code(&unknown), 1);
    }

    #[test]
    fn test_round_trip_through_detection() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.txt");
        fs::write(&source, "she sells sea shells 🐚🐚").unwrap();

        for algorithm in Algorithm::ALL {
            let archive = dir.path().join(format!("in{}", algorithm.extension()));
            let restored = dir.path().join(format!("{}.txt", algorithm));

            run(&compress(&source, &archive, algorithm, false)).unwrap();
            run(&decompress(&archive, &restored, false)).unwrap();
            assert_eq!(
                fs::read_to_string(&restored).unwrap(),
                "she sells sea shells 🐚🐚"
            );
        }
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.txt");
        let archive = dir.path().join("in.huff");
        fs::write(&source, "abc").unwrap();
        fs::write(&archive, "keep me").unwrap();

        let err = run(&compress(&source, &archive, Algorithm::Huffman, false)).unwrap_err();
        assert!(matches!(err, CliError::OutputExists(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(fs::read_to_string(&archive).unwrap(), "keep me");

        run(&compress(&source, &archive, Algorithm::Huffman, true)).unwrap();
        assert_eq!(&fs::read(&archive).unwrap()[..4], b"HUF1");
    }

    #[test]
    fn test_unrecognized_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("mystery.bin");
        let restored = dir.path().join("out.txt");
        fs::write(&archive, b"PK\x03\x04rest").unwrap();

        let err = run(&decompress(&archive, &restored, false)).unwrap_err();
        assert!(matches!(err, CliError::UnrecognizedArchive(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!restored.exists());
    }

    #[test]
    fn test_corrupted_archive_exit_code() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.txt");
        let archive = dir.path().join("in.huff");
        let restored = dir.path().join("out.txt");
        fs::write(&source, "corruption should be caught").unwrap();
        run(&compress(&source, &archive, Algorithm::Huffman, false)).unwrap();

        // Damage the stored checksum
        let mut bytes = fs::read(&archive).unwrap();
        bytes[5] ^= 0x01;
        fs::write(&archive, &bytes).unwrap();

        let err = run(&decompress(&archive, &restored, false)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!restored.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.huff");
        let out = dir.path().join("out.txt");

        let err = run(&decompress(&missing, &out, false)).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), 1);

        let err = run(&compress(&missing, &out, Algorithm::Rle, false)).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_archive_decodes_as_huffman() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("empty.huff");
        let restored = dir.path().join("empty.txt");
        fs::write(&archive, b"").unwrap();

        run(&decompress(&archive, &restored, false)).unwrap();
        assert_eq!(fs::read_to_string(&restored).unwrap(), "");
    }

    #[test]
    fn test_bench_generated_sample() {
        let action = Action::Bench {
            files: Vec::new(),
            seed: 7,
            sample_bytes: 2048,
        };
        run(&action).unwrap();
    }
}
