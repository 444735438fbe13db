//! The compressor contract and the algorithm registry.
//!
//! A `Compressor` turns text into a framed archive and back. The provided
//! `compress`/`decompress` methods add file handling and statistics on top
//! of the two in-memory operations each codec implements.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::framing;
use crate::huffman;
use crate::rle;
use crate::stats::{CompressionStats, Timer};

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Rle,
    Huffman,
}

impl Algorithm {
    /// Every algorithm, in registry order.
    pub const ALL: [Algorithm; 2] = [Algorithm::Rle, Algorithm::Huffman];

    /// Registry name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Rle => "rle",
            Algorithm::Huffman => "huffman",
        }
    }

    /// Leading four bytes of a non-empty archive.
    pub fn magic(self) -> [u8; 4] {
        match self {
            Algorithm::Rle => framing::RLE_MAGIC,
            Algorithm::Huffman => framing::HUFFMAN_MAGIC,
        }
    }

    /// Conventional archive file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Algorithm::Rle => ".rle",
            Algorithm::Huffman => ".huff",
        }
    }

    /// A codec instance for this algorithm.
    pub fn compressor(self) -> Box<dyn Compressor> {
        match self {
            Algorithm::Rle => Box::new(RleCompressor),
            Algorithm::Huffman => Box::new(HuffmanCompressor),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Case-insensitive lookup by registry name.
    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Look up a codec by algorithm name (case-insensitive).
///
/// # Errors
/// `Error::UnsupportedAlgorithm` for unknown names.
pub fn compressor_for(name: &str) -> Result<Box<dyn Compressor>> {
    Ok(name.parse::<Algorithm>()?.compressor())
}

/// Text-to-archive codec.
pub trait Compressor {
    /// The algorithm this codec implements.
    fn algorithm(&self) -> Algorithm;

    /// Encode `text` into a complete archive, header included.
    fn compress_text(&self, text: &str) -> Result<Vec<u8>>;

    /// Validate and decode a complete archive.
    fn decompress_bytes(&self, archive: &[u8]) -> Result<String>;

    /// Compress the UTF-8 text file at `source` into an archive at `dest`.
    ///
    /// `dest` is only written once encoding has succeeded, and appears
    /// complete or not at all.
    ///
    /// # Errors
    /// - `Error::Io` if either file can't be accessed
    /// - `Error::Utf8` if `source` is not UTF-8 text
    /// - any encoding error from the codec
    fn compress(&self, source: &Path, dest: &Path) -> Result<CompressionStats> {
        let text = String::from_utf8(fs::read(source)?)?;

        let (archive, elapsed) = Timer::time(|| self.compress_text(&text));
        let archive = archive?;
        write_whole(dest, &archive)?;

        let stats = CompressionStats::new(self.algorithm(), text.len(), archive.len(), elapsed);
        info!(
            source = %source.display(),
            dest = %dest.display(),
            algorithm = %stats.algorithm,
            original_bytes = stats.original_size,
            compressed_bytes = stats.compressed_size,
            "compressed"
        );
        Ok(stats)
    }

    /// Decompress the archive at `source` into a text file at `dest`.
    ///
    /// `dest` is left untouched unless the archive decodes completely and
    /// the text is fully written.
    ///
    /// # Errors
    /// - `Error::Io` if either file can't be accessed
    /// - framing, checksum or UTF-8 errors if the archive is damaged
    fn decompress(&self, source: &Path, dest: &Path) -> Result<CompressionStats> {
        let archive = fs::read(source)?;

        let (text, elapsed) = Timer::time(|| self.decompress_bytes(&archive));
        let text = text?;
        write_whole(dest, text.as_bytes())?;

        let stats = CompressionStats::new(self.algorithm(), text.len(), archive.len(), elapsed);
        info!(
            source = %source.display(),
            dest = %dest.display(),
            algorithm = %stats.algorithm,
            original_bytes = stats.original_size,
            compressed_bytes = stats.compressed_size,
            "decompressed"
        );
        Ok(stats)
    }
}

/// Write `bytes` to a temporary file beside `dest`, then rename it into place.
///
/// A failed write removes the temporary file and leaves `dest` as it was.
fn write_whole(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(dest).map_err(|err| err.error)?;
    Ok(())
}

/// Run-length codec: `RLE1`, version byte, `(count, value)` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCompressor;

impl Compressor for RleCompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rle
    }

    fn compress_text(&self, text: &str) -> Result<Vec<u8>> {
        Ok(framing::frame_rle(&rle::encode(text)))
    }

    fn decompress_bytes(&self, archive: &[u8]) -> Result<String> {
        rle::decode(framing::unframe_rle(archive)?)
    }
}

/// Static Huffman codec; see [`crate::huffman`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCompressor;

impl Compressor for HuffmanCompressor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Huffman
    }

    fn compress_text(&self, text: &str) -> Result<Vec<u8>> {
        huffman::encode(text)
    }

    fn decompress_bytes(&self, archive: &[u8]) -> Result<String> {
        huffman::decode(archive)
    }
}
