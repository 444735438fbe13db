//! Bit-level I/O utilities for reading and writing individual bits.
//!
//! `BitWriter` and `BitReader` carry the Huffman payload. Both operate in
//! MSB-first (most significant bit first) order within each byte.
//!
//! # Meaningful bits vs. padding
//! - `BitWriter` counts every bit written through `write_bit`/`write_bits`
//!   as meaningful. `pad_to_byte` fills the current byte but takes its
//!   padding back out of the count, so `nbits()` never reports structure.
//! - `BitReader` is scoped to a declared number of meaningful bits and
//!   refuses to read into the trailing padding.
//!
//! # Example
//! ```
//! use text_compressor_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap(); // 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap(); // 1, 1
//! writer.pad_to_byte(false);
//! // Total: 10111 -> padded to 10111000
//! assert_eq!(writer.nbits(), 5);
//!
//! let nbits = writer.nbits();
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::with_len(&bytes, nbits);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.read_bit().is_err());
//! ```

use crate::error::{BitIoError, Result};

/// Widest field `write_bits`/`read_bits` accept.
const MAX_FIELD_WIDTH: u32 = 64;

/// Writes bits MSB-first into a growable byte buffer.
///
/// # Invariants
/// - `bytes` is never empty; its last byte is the one being filled
/// - `cursor` is the next free bit position in that byte (0-7)
/// - `nbits <= (bytes.len() - 1) * 8 + cursor`
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes followed by the byte currently being filled
    bytes: Vec<u8>,
    /// Next free bit position in the last byte (0 = MSB)
    cursor: u8,
    /// Meaningful bits written so far (padding excluded)
    nbits: usize,
}

impl BitWriter {
    /// Create a new BitWriter with a single empty working byte.
    pub fn new() -> Self {
        Self {
            bytes: vec![0],
            cursor: 0,
            nbits: 0,
        }
    }

    /// Append one bit at the cursor.
    pub fn write_bit(&mut self, bit: bool) {
        let last = self.bytes.len() - 1;
        if bit {
            self.bytes[last] |= 1 << (7 - self.cursor);
        }
        self.cursor += 1;
        self.nbits += 1;

        if self.cursor == 8 {
            self.bytes.push(0);
            self.cursor = 0;
        }
    }

    /// Write the low `width` bits of `value`, MSB-first.
    ///
    /// For example, writing value=0b101 with width=3 writes bits 1, 0, 1.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if width > 64
    /// - `BitIoError::ValueOutOfRange` if value >= 2^width
    pub fn write_bits(&mut self, value: u64, width: u32) -> Result<()> {
        if width > MAX_FIELD_WIDTH {
            return Err(BitIoError::InvalidBitCount(width).into());
        }
        if width < MAX_FIELD_WIDTH && value >> width != 0 {
            return Err(BitIoError::ValueOutOfRange { value, width }.into());
        }

        for shift in (0..width).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }

        Ok(())
    }

    /// Fill the rest of the current byte with `pad_bit`.
    ///
    /// No-op when already byte-aligned. Padding is structural and is not
    /// counted in `nbits()`.
    pub fn pad_to_byte(&mut self, pad_bit: bool) {
        if self.cursor == 0 {
            return;
        }

        let pad = 8 - self.cursor as usize;
        for _ in 0..pad {
            self.write_bit(pad_bit);
        }
        self.nbits -= pad;
    }

    /// The accumulated bytes.
    ///
    /// When the cursor sits at a byte boundary after at least one full byte,
    /// the untouched working byte is left out. A writer that has seen no
    /// bits at all still yields its single zero byte.
    pub fn as_bytes(&self) -> &[u8] {
        if self.cursor == 0 && self.bytes.len() > 1 {
            &self.bytes[..self.bytes.len() - 1]
        } else {
            &self.bytes
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// A partial final byte is returned as-is (zero-filled); call
    /// `pad_to_byte` first to choose the fill bit explicitly.
    pub fn finish(mut self) -> Vec<u8> {
        if self.cursor == 0 && self.bytes.len() > 1 {
            self.bytes.pop();
        }
        self.bytes
    }

    /// Meaningful bits written so far.
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Bits physically present in the buffer, padding included.
    pub fn bit_len(&self) -> usize {
        (self.bytes.len() - 1) * 8 + self.cursor as usize
    }

    /// True when the cursor sits on a byte boundary.
    pub fn is_aligned(&self) -> bool {
        self.cursor == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, up to a declared bit count.
///
/// The declared count excludes trailing padding; reads past it fail with
/// `BitIoError::UnexpectedEof`. Iterating a reader yields bits until that
/// point and then stops.
///
/// # Invariants
/// - `bits_read <= total_bits`
/// - the cursor only moves forward
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Meaningful bits in `data`
    total_bits: usize,
    /// Bits consumed so far (0 = MSB of first byte)
    bits_read: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_len(data, data.len() * 8)
    }

    /// Create a reader that treats only the first `total_bits` bits of
    /// `data` as meaningful.
    pub fn with_len(data: &'a [u8], total_bits: usize) -> Self {
        Self {
            data,
            total_bits,
            bits_read: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once `bits_left()` is 0, or if the
    /// declared length runs past the end of the buffer.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bits_read >= self.total_bits {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let byte = *self
            .data
            .get(self.bits_read / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.bits_read % 8)) & 1;
        self.bits_read += 1;

        Ok(bit == 1)
    }

    /// Read `width` bits and assemble them MSB-first.
    ///
    /// Bits consumed before an end-of-stream failure stay consumed.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if width > 64
    /// - `BitIoError::UnexpectedEof` if the stream runs out mid-field
    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        if width > MAX_FIELD_WIDTH {
            return Err(BitIoError::InvalidBitCount(width).into());
        }

        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | self.read_bit()? as u64;
        }

        Ok(value)
    }

    /// Meaningful bits not yet read.
    pub fn bits_left(&self) -> usize {
        self.total_bits - self.bits_read
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bits_read
    }

    /// Check if every meaningful bit has been read.
    pub fn is_empty(&self) -> bool {
        self.bits_left() == 0
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bits_left()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn bits_of(pattern: &[u8]) -> Vec<bool> {
        pattern.iter().map(|&b| b == 1).collect()
    }

    #[test]
    fn test_single_byte_round_trip() {
        let pattern = bits_of(&[1, 0, 1, 1, 0, 0, 0, 1]);
        let mut writer = BitWriter::new();
        for &bit in &pattern {
            writer.write_bit(bit);
        }
        writer.pad_to_byte(false);

        let nbits = writer.nbits();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0xB1]);

        let mut reader = BitReader::with_len(&bytes, nbits);
        let read: Vec<bool> = (0..8).map(|_| reader.read_bit().unwrap()).collect();
        assert_eq!(read, pattern);
        assert_eq!(reader.bits_left(), 0);
    }

    #[test]
    fn test_write_read_various_widths() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b1111_0000, 8).unwrap();
        writer.pad_to_byte(false);
        assert_eq!(writer.nbits(), 11);

        let mut reader = BitReader::with_len(writer.as_bytes(), writer.nbits());
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(8).unwrap(), 0b1111_0000);
        assert_eq!(reader.bits_left(), 0);
    }

    #[test]
    fn test_padding_not_counted() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.pad_to_byte(false);

        assert_eq!(writer.nbits(), 1);
        assert_eq!(writer.bit_len(), 8);
        assert_eq!(writer.finish(), vec![0b1000_0000]);
    }

    #[test]
    fn test_pad_with_ones() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b00, 2).unwrap();
        writer.pad_to_byte(true);

        assert_eq!(writer.nbits(), 2);
        assert_eq!(writer.as_bytes(), &[0b0011_1111]);
    }

    #[test]
    fn test_pad_when_aligned_is_noop() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xAB, 8).unwrap();
        assert!(writer.is_aligned());
        writer.pad_to_byte(true);

        assert_eq!(writer.nbits(), 8);
        assert_eq!(writer.as_bytes(), &[0xAB]);
    }

    #[test]
    fn test_no_stray_trailing_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xABCD, 16).unwrap();
        assert_eq!(writer.as_bytes(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_fresh_writer_yields_one_zero_byte() {
        let writer = BitWriter::new();
        assert_eq!(writer.nbits(), 0);
        assert_eq!(writer.finish(), vec![0]);
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1010101111110000, 16).unwrap();

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10101011, 0b11110000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(16).unwrap(), 0b1010101111110000);
    }

    #[test]
    fn test_64_bit_values() {
        let mut writer = BitWriter::new();
        let val = 0x123456789ABCDEF0u64;
        writer.write_bits(val, 64).unwrap();
        writer.write_bits(u64::MAX, 64).unwrap();

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(64).unwrap(), val);
        assert_eq!(reader.read_bits(64).unwrap(), u64::MAX);
    }

    #[test]
    fn test_value_out_of_range() {
        let mut writer = BitWriter::new();
        let err = writer.write_bits(0b1000, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::BitIo(BitIoError::ValueOutOfRange { value: 8, width: 3 })
        ));
        // Nothing was written
        assert_eq!(writer.nbits(), 0);
    }

    #[test]
    fn test_zero_width() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 0).unwrap();
        assert!(writer.write_bits(1, 0).is_err());
        assert_eq!(writer.nbits(), 0);

        let mut reader = BitReader::new(&[0xFF]);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_width_too_large() {
        let mut writer = BitWriter::new();
        assert!(matches!(
            writer.write_bits(0, 65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));

        let mut reader = BitReader::new(&[0; 16]);
        assert!(matches!(
            reader.read_bits(65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));
    }

    #[test]
    fn test_reader_eof_at_declared_length() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 3).unwrap();

        let mut reader = BitReader::with_len(writer.as_bytes(), writer.nbits());
        reader.read_bits(3).unwrap();
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_read_past_end() {
        let data = vec![0b10101010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(8).unwrap(), 0b10101010);
        assert!(reader.read_bits(1).is_err());
    }

    #[test]
    fn test_declared_length_beyond_buffer() {
        let data = [0xFF];
        let mut reader = BitReader::with_len(&data, 12);
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_partial_read_keeps_cursor() {
        let data = [0b1100_0000];
        let mut reader = BitReader::with_len(&data, 2);
        assert!(reader.read_bits(3).is_err());
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.bits_left(), 0);
    }

    #[test]
    fn test_iterator_stops_at_declared_length() {
        let data = [0b1011_0110];
        let bits: Vec<bool> = BitReader::with_len(&data, 5).collect();
        assert_eq!(bits, bits_of(&[1, 0, 1, 1, 0]));
    }

    #[test]
    fn test_bits_left() {
        let data = vec![0xFF, 0xFF];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.bits_left(), 16);
        reader.read_bits(5).unwrap();
        assert_eq!(reader.bits_left(), 11);
        reader.read_bits(11).unwrap();
        assert_eq!(reader.bits_left(), 0);
        assert!(reader.is_empty());
    }
}
