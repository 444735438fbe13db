//! Benchmark runner: every algorithm over every input.
//!
//! Each input is compressed and decompressed in memory with each codec. The
//! round trip is verified before a row is reported, so a table only ever
//! shows ratios for archives that actually decode.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use text_compressor_core::{Algorithm, Error, Timer};
use tracing::debug;

use crate::input_gen::generate_sample_text;
use crate::CliError;

const NAME_WIDTH: usize = 20;

/// One named text to benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchInput {
    pub name: String,
    pub text: String,
}

/// Result of one algorithm on one input.
#[derive(Debug, Clone)]
pub struct BenchRow {
    pub name: String,
    pub original_bytes: usize,
    pub algorithm: Algorithm,
    pub compressed_bytes: usize,
    pub elapsed: Duration,
}

impl BenchRow {
    /// Compressed / original; 0.0 for empty inputs.
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.original_bytes as f64
        }
    }
}

/// Read the benchmark inputs, or generate one sample when `files` is empty.
pub fn load_inputs(
    files: &[PathBuf],
    seed: u64,
    sample_bytes: usize,
) -> Result<Vec<BenchInput>, CliError> {
    if files.is_empty() {
        return Ok(vec![BenchInput {
            name: format!("sample-{}", seed),
            text: generate_sample_text(seed, sample_bytes),
        }]);
    }

    files
        .iter()
        .map(|path| -> Result<BenchInput, CliError> {
            let text = String::from_utf8(fs::read(path)?).map_err(Error::from)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(BenchInput { name, text })
        })
        .collect()
}

/// Run every algorithm over every input.
///
/// Only compression is timed. Fails if any codec does not reproduce its
/// input exactly.
pub fn run(inputs: &[BenchInput]) -> Result<Vec<BenchRow>, CliError> {
    let mut rows = Vec::with_capacity(inputs.len() * Algorithm::ALL.len());

    for input in inputs {
        for algorithm in Algorithm::ALL {
            let codec = algorithm.compressor();

            let (archive, elapsed) = Timer::time(|| codec.compress_text(&input.text));
            let archive = archive?;

            if codec.decompress_bytes(&archive)? != input.text {
                return Err(CliError::RoundTripMismatch {
                    name: input.name.clone(),
                    algorithm,
                });
            }

            debug!(
                input = %input.name,
                %algorithm,
                original_bytes = input.text.len(),
                compressed_bytes = archive.len(),
                "benchmarked"
            );

            rows.push(BenchRow {
                name: input.name.clone(),
                original_bytes: input.text.len(),
                algorithm,
                compressed_bytes: archive.len(),
                elapsed,
            });
        }
    }

    Ok(rows)
}

/// Render rows as a fixed-width table, header first.
pub fn format_table(rows: &[BenchRow]) -> String {
    let mut out = format_line("File", "Orig KB", "Algo", "Ratio", "Time");
    for row in rows {
        out.push_str(&format_line(
            &truncate_name(&row.name),
            &format!("{:.1}", row.original_bytes as f64 / 1024.0),
            row.algorithm.name(),
            &format!("{:.2}", row.ratio()),
            &format!("{:.2}ms", row.elapsed.as_secs_f64() * 1000.0),
        ));
    }
    out
}

fn format_line(name: &str, kb: &str, algo: &str, ratio: &str, time: &str) -> String {
    format!(
        "{:<width$}{:>10}{:>10}{:>8}{:>9}\n",
        name,
        kb,
        algo,
        ratio,
        time,
        width = NAME_WIDTH
    )
}

/// Shorten names that would run into the next column.
fn truncate_name(name: &str) -> String {
    if name.chars().count() < NAME_WIDTH {
        return name.to_string();
    }
    let mut short: String = name.chars().take(NAME_WIDTH - 2).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generated_input_when_no_files() {
        let inputs = load_inputs(&[], 42, 4096).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "sample-42");
        assert_eq!(inputs[0].text.len(), 4096);
    }

    #[test]
    fn test_load_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "aaaa").unwrap();
        fs::write(&b, "hello").unwrap();

        let inputs = load_inputs(&[a, b], 0, 0).unwrap();
        assert_eq!(inputs[0].name, "a.txt");
        assert_eq!(inputs[0].text, "aaaa");
        assert_eq!(inputs[1].name, "b.txt");
    }

    #[test]
    fn test_load_rejects_binary_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xC3, 0x28]).unwrap();

        let err = load_inputs(&[path], 0, 0).unwrap_err();
        assert!(matches!(err, CliError::Codec(Error::Utf8(_))));
    }

    #[test]
    fn test_run_covers_every_algorithm() {
        let inputs = vec![
            BenchInput {
                name: "runs".to_string(),
                text: "x".repeat(1000),
            },
            BenchInput {
                name: "empty".to_string(),
                text: String::new(),
            },
        ];

        let rows = run(&inputs).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].algorithm, Algorithm::Rle);
        assert_eq!(rows[1].algorithm, Algorithm::Huffman);

        // 4 runs of 255/255/255/235 behind a 5-byte header
        assert_eq!(rows[0].compressed_bytes, 13);
        assert!(rows[1].ratio() < 0.2);
        assert_eq!(rows[3].ratio(), 0.0);
    }

    #[test]
    fn test_table_layout() {
        let rows = vec![BenchRow {
            name: "a_rather_long_file_name.txt".to_string(),
            original_bytes: 2048,
            algorithm: Algorithm::Huffman,
            compressed_bytes: 1024,
            elapsed: Duration::from_micros(1500),
        }];

        let table = format_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[0],
            "File                   Orig KB      Algo   Ratio     Time"
        );
        assert_eq!(
            lines[1],
            "a_rather_long_file…        2.0   huffman    0.50   1.50ms"
        );
    }

    #[test]
    fn test_short_names_untouched() {
        assert_eq!(truncate_name("notes.txt"), "notes.txt");
        assert_eq!(truncate_name(&"n".repeat(19)), "n".repeat(19));
        assert_eq!(truncate_name(&"n".repeat(20)).chars().count(), 19);
    }
}
