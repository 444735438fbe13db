//! Archive framing for both codecs.
//!
//! Each codec's raw payload is wrapped in a small self-describing header so
//! a decompressor can tell what it was handed and whether it survived.
//!
//! # Huffman archive
//!
//! ```text
//! +----------------------+
//! | Magic (4 bytes)      |  "HUF1"
//! +----------------------+
//! | version (1)          |  0x01
//! +----------------------+
//! | crc32 (4)            |  u32 little-endian, over the original text bytes
//! +----------------------+
//! | tree_section_len (2) |  u16 big-endian
//! +----------------------+
//! | tree section         |  pre-order tree, then u24 big-endian count of
//! | (variable)           |  meaningful payload bits
//! +----------------------+
//! | payload              |  code bits, zero-padded to a byte boundary
//! | (variable)           |
//! +----------------------+
//! ```
//!
//! # RLE archive
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  "RLE1"
//! +------------------+
//! | version (1)      |  0x01
//! +------------------+
//! | (count, value)*  |  one pair per run, count in 1-255
//! +------------------+
//! ```
//!
//! # CRC Coverage
//!
//! The Huffman CRC32 covers the decoded text only. A damaged tree or
//! payload shows up as a different decoded byte sequence and fails the
//! check. RLE archives carry no checksum.

use crate::compressor::Algorithm;
use crate::error::{FramingError, Result};

/// Magic tag for Huffman archives
pub const HUFFMAN_MAGIC: [u8; 4] = *b"HUF1";

/// Huffman archive format version
pub const HUFFMAN_VERSION: u8 = 1;

/// Magic + version + crc32 + tree_section_len
pub const HUFFMAN_HEADER_SIZE: usize = 11;

/// Magic tag for RLE archives
pub const RLE_MAGIC: [u8; 4] = *b"RLE1";

/// RLE archive format version
pub const RLE_VERSION: u8 = 1;

/// Magic + version
pub const RLE_HEADER_SIZE: usize = 5;

/// A parsed Huffman archive, borrowing its sections from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanArchive<'a> {
    /// CRC32 of the original text bytes
    pub checksum: u32,

    /// Serialized tree followed by the 3-byte meaningful-bit count
    pub tree_section: &'a [u8],

    /// Padded code bits
    pub payload: &'a [u8],
}

/// CRC32 (IEEE) of `data`, as stored in Huffman archives.
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Assemble a Huffman archive from its parts.
///
/// `tree_section` holds at most 256 leaves and 255 internal nodes plus the
/// bit count, so its length always fits the u16 field.
pub fn serialize_huffman_archive(checksum: u32, tree_section: &[u8], payload: &[u8]) -> Vec<u8> {
    let total_size = HUFFMAN_HEADER_SIZE + tree_section.len() + payload.len();
    let mut archive = Vec::with_capacity(total_size);

    archive.extend_from_slice(&HUFFMAN_MAGIC);
    archive.push(HUFFMAN_VERSION);
    archive.extend_from_slice(&checksum.to_le_bytes());
    archive.extend_from_slice(&(tree_section.len() as u16).to_be_bytes());

    archive.extend_from_slice(tree_section);
    archive.extend_from_slice(payload);

    archive
}

/// Split a Huffman archive into its sections.
///
/// The checksum is returned, not verified; it covers the decoded text.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the header or tree section is cut off
/// - `FramingError::InvalidMagic` / `FramingError::UnsupportedVersion` if
///   the header doesn't match
pub fn parse_huffman_archive(bytes: &[u8]) -> Result<HuffmanArchive<'_>> {
    check_header(bytes, HUFFMAN_MAGIC, HUFFMAN_VERSION, HUFFMAN_HEADER_SIZE)?;

    let mut crc = [0u8; 4];
    crc.copy_from_slice(&bytes[5..9]);
    let tree_section_len = u16::from_be_bytes([bytes[9], bytes[10]]) as usize;

    let tree_end = HUFFMAN_HEADER_SIZE + tree_section_len;
    if bytes.len() < tree_end {
        return Err(FramingError::FrameTooShort {
            required: tree_end,
            actual: bytes.len(),
        }
        .into());
    }

    Ok(HuffmanArchive {
        checksum: u32::from_le_bytes(crc),
        tree_section: &bytes[HUFFMAN_HEADER_SIZE..tree_end],
        payload: &bytes[tree_end..],
    })
}

/// Prefix an RLE payload with its magic and version.
pub fn frame_rle(payload: &[u8]) -> Vec<u8> {
    let mut archive = Vec::with_capacity(RLE_HEADER_SIZE + payload.len());
    archive.extend_from_slice(&RLE_MAGIC);
    archive.push(RLE_VERSION);
    archive.extend_from_slice(payload);
    archive
}

/// Validate an RLE archive header and return the pair payload.
pub fn unframe_rle(bytes: &[u8]) -> Result<&[u8]> {
    check_header(bytes, RLE_MAGIC, RLE_VERSION, RLE_HEADER_SIZE)?;
    Ok(&bytes[RLE_HEADER_SIZE..])
}

/// Guess the codec that produced `bytes` from its first four bytes.
///
/// Huffman-encoding empty text produces an empty archive, so an empty
/// buffer is reported as Huffman.
pub fn detect_algorithm(bytes: &[u8]) -> Option<Algorithm> {
    if bytes.is_empty() {
        return Some(Algorithm::Huffman);
    }

    match bytes.get(..4) {
        Some(magic) if magic == RLE_MAGIC => Some(Algorithm::Rle),
        Some(magic) if magic == HUFFMAN_MAGIC => Some(Algorithm::Huffman),
        _ => None,
    }
}

/// Check length, magic and version of a 5-byte-prefixed archive.
fn check_header(bytes: &[u8], magic: [u8; 4], version: u8, header_size: usize) -> Result<()> {
    if bytes.len() < header_size {
        // Report a wrong magic before a short length, so that feeding
        // the wrong kind of file gives the more useful error.
        let prefix = &bytes[..bytes.len().min(4)];
        if prefix != &magic[..prefix.len()] {
            return Err(FramingError::InvalidMagic {
                expected: magic,
                actual: prefix.to_vec(),
            }
            .into());
        }
        return Err(FramingError::FrameTooShort {
            required: header_size,
            actual: bytes.len(),
        }
        .into());
    }

    if bytes[..4] != magic {
        return Err(FramingError::InvalidMagic {
            expected: magic,
            actual: bytes[..4].to_vec(),
        }
        .into());
    }

    if bytes[4] != version {
        return Err(FramingError::UnsupportedVersion {
            expected: version,
            actual: bytes[4],
        }
        .into());
    }

    Ok(())
}
