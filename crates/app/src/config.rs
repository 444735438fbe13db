//! Configuration for the text-compressor application.
//!
//! Command-line arguments are parsed with clap and resolved into a `Config`
//! with every default filled in, so a run can be printed and reproduced.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use text_compressor_core::Algorithm;
use tracing::Level;

/// Default size of generated benchmark text (64 KiB)
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(name = "text-compressor")]
#[command(version)]
#[command(about = "Lossless text compression using RLE or Huffman coding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    /// Print resolved configuration
    #[arg(long, global = true)]
    print_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT file and write to OUTPUT
    Compress {
        input: PathBuf,
        output: PathBuf,

        /// Compression algorithm to use (rle, huffman)
        #[arg(short, long, default_value = "huffman")]
        algo: Algorithm,

        /// Overwrite OUTPUT if it exists
        #[arg(short, long)]
        force: bool,

        /// Print statistics after completion
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decompress INPUT archive to OUTPUT text file
    Decompress {
        input: PathBuf,
        output: PathBuf,

        /// Overwrite OUTPUT if it exists
        #[arg(short, long)]
        force: bool,

        /// Print statistics after completion
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare every algorithm on the given files (or on generated text)
    Bench {
        files: Vec<PathBuf>,

        /// Random seed for generated sample text
        #[arg(long)]
        seed: Option<u64>,

        /// Size of generated sample text in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        sample_bytes: usize,
    },
}

/// What the run should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Compress {
        input: PathBuf,
        output: PathBuf,
        algorithm: Algorithm,
        force: bool,
        verbose: bool,
    },
    Decompress {
        input: PathBuf,
        output: PathBuf,
        force: bool,
        verbose: bool,
    },
    Bench {
        files: Vec<PathBuf>,
        seed: u64,
        sample_bytes: usize,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub action: Action,

    /// Maximum level of emitted log events
    pub log_level: Level,

    /// Whether to print detailed config
    pub print_config: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name first).
    ///
    /// If `bench` gets no `--seed`, a time-based seed is chosen and shown by
    /// `--print-config` so the run can be repeated.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;

        let action = match cli.command {
            Command::Compress {
                input,
                output,
                algo,
                force,
                verbose,
            } => Action::Compress {
                input,
                output,
                algorithm: algo,
                force,
                verbose,
            },
            Command::Decompress {
                input,
                output,
                force,
                verbose,
            } => Action::Decompress {
                input,
                output,
                force,
                verbose,
            },
            Command::Bench {
                files,
                seed,
                sample_bytes,
            } => Action::Bench {
                files,
                seed: seed.unwrap_or_else(time_seed),
                sample_bytes,
            },
        };

        Ok(Config {
            action,
            log_level: cli.log_level,
            print_config: cli.print_config,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.action {
            Action::Compress {
                input,
                output,
                algorithm,
                force,
                verbose,
            } => {
                println!("Command:     compress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
                println!("Algorithm:   {}", algorithm);
                println!("Force:       {}", force);
                println!("Verbose:     {}", verbose);
            }
            Action::Decompress {
                input,
                output,
                force,
                verbose,
            } => {
                println!("Command:     decompress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
                println!("Algorithm:   (detected from archive)");
                println!("Force:       {}", force);
                println!("Verbose:     {}", verbose);
            }
            Action::Bench {
                files,
                seed,
                sample_bytes,
            } => {
                println!("Command:     bench");
                if files.is_empty() {
                    println!("Input:       generated sample ({} bytes)", sample_bytes);
                    println!("Seed:        {}", seed);
                } else {
                    for file in files {
                        println!("Input file:  {}", file.display());
                    }
                }
            }
        }
        println!("Log level:   {}", self.log_level);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
