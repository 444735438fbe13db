//! Error types for the text-compressor codecs.
//!
//! All operations return structured errors rather than panicking.
//! A decode either returns the exact original text or one of these errors;
//! partial output is never handed back.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: bad widths, out-of-range values, reads past the meaningful bits
/// - Huffman: malformed tree sections or payloads that cannot be framed
/// - Framing: bad magic/version, truncated archives, odd RLE payloads
/// - CRC: decoded bytes don't match the stored checksum
/// - UTF-8: recovered bytes are not valid text
/// - Algorithm lookup and file I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past the declared bit count)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., malformed tree section)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Archive framing error (e.g., invalid header, truncated archive)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// CRC validation failed, indicating archive corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Recovered bytes are not valid UTF-8
    #[error("invalid UTF-8 in decoded text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Algorithm name not present in the registry
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error means the archive itself is damaged or not an
    /// archive at all, as opposed to a caller or environment problem.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::Crc { .. } | Error::Framing(_) | Error::Huffman(_) | Error::Utf8(_)
        )
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the declared number of meaningful bits
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Field width outside 0-64
    #[error("invalid bit count: {0}")]
    InvalidBitCount(u32),

    /// Value does not fit in the requested field width
    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange { value: u64, width: u32 },
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Tree section holds a marker that is neither leaf nor internal
    #[error("invalid tree marker {marker:#04x} at offset {position}")]
    InvalidTreeMarker { marker: u8, position: usize },

    /// Serialized tree nests deeper than any byte alphabet can produce
    #[error("tree depth exceeds maximum {max}")]
    TreeTooDeep { max: usize },

    /// Encoded payload does not fit the 24-bit meaningful-bit field
    #[error("encoded payload of {bits} bits exceeds maximum {max}")]
    PayloadTooLarge { bits: usize, max: usize },
}

/// Archive framing errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: Vec<u8> },

    /// Unknown format version
    #[error("unsupported version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u8, actual: u8 },

    /// Archive is too short to contain the section it declares
    #[error("archive too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// RLE payload is not a whole number of (count, value) pairs
    #[error("RLE payload length {0} is not even")]
    OddPayloadLength(usize),

    /// Tree section ended before the tree and its bit count were read
    #[error("tree section overrun: tree needs {required} bytes, section holds {actual}")]
    TreeSectionOverrun { required: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
