//! text-compressor-core: lossless text compression with RLE and Huffman coding
//!
//! This library turns UTF-8 text into a self-describing binary archive and
//! back, using one of two interchangeable algorithms:
//! - Run-length encoding over bytes
//! - Static Huffman coding with the tree stored in the archive
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: MSB-first bit writer/reader with meaningful-bit accounting
//! - `huffman`: tree construction, code tables, tree serialization, codec
//! - `rle`: `(count, value)` run coding
//! - `framing`: archive headers, checksums, format detection
//! - `compressor`: the `Compressor` trait and the algorithm registry
//! - `stats`: sizes, ratio and timing of each call
//!
//! # Design Principles
//!
//! - **No panics**: malformed archives surface as structured errors
//! - **All or nothing**: decode returns the exact original text or fails
//! - **No shared state**: every call owns its trees and bit buffers
//!
//! # Example
//! ```
//! use text_compressor_core::{compressor_for, Compressor};
//!
//! let huffman = compressor_for("huffman").unwrap();
//! let archive = huffman.compress_text("abracadabra").unwrap();
//! assert_eq!(huffman.decompress_bytes(&archive).unwrap(), "abracadabra");
//! ```

pub mod bitio;
pub mod compressor;
pub mod error;
pub mod framing;
pub mod huffman;
pub mod rle;
pub mod stats;

// Re-export commonly used types
pub use compressor::{compressor_for, Algorithm, Compressor, HuffmanCompressor, RleCompressor};
pub use error::{Error, Result};
pub use framing::detect_algorithm;
pub use stats::{CompressionStats, Timer};
