//! Byte-oriented run-length coding.
//!
//! The payload is a flat list of `(count, value)` byte pairs. Each pair is
//! a run of up to 255 copies of one byte; longer runs continue in the next
//! pair. Runs are over UTF-8 bytes, not characters.

use tracing::debug;

use crate::error::{FramingError, Result};

/// Longest run a single pair can hold.
pub const MAX_RUN: u8 = u8::MAX;

/// Encode `text` as `(count, value)` pairs.
///
/// Empty text yields an empty payload.
pub fn encode(text: &str) -> Vec<u8> {
    let data = text.as_bytes();
    let Some((&first, rest)) = data.split_first() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut value = first;
    let mut count = 1u8;

    for &byte in rest {
        if byte == value && count < MAX_RUN {
            count += 1;
        } else {
            out.extend_from_slice(&[count, value]);
            value = byte;
            count = 1;
        }
    }
    out.extend_from_slice(&[count, value]);

    debug!(input_bytes = data.len(), runs = out.len() / 2, "rle encode");
    out
}

/// Expand `(count, value)` pairs back into text.
///
/// A pair with a count of zero expands to nothing.
///
/// # Errors
/// - `FramingError::OddPayloadLength` if the payload is not whole pairs
/// - `Error::Utf8` if the expanded bytes are not valid UTF-8
pub fn decode(buf: &[u8]) -> Result<String> {
    if buf.len() % 2 != 0 {
        return Err(FramingError::OddPayloadLength(buf.len()).into());
    }

    let total: usize = buf.chunks_exact(2).map(|pair| pair[0] as usize).sum();
    let mut out = Vec::with_capacity(total);

    for pair in buf.chunks_exact(2) {
        let (count, value) = (pair[0], pair[1]);
        out.resize(out.len() + count as usize, value);
    }

    debug!(runs = buf.len() / 2, output_bytes = out.len(), "rle decode");
    Ok(String::from_utf8(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_round_trip() {
        let long_run = "A".repeat(300);
        for text in [
            "",
            "A",
            "AAAAA",
            long_run.as_str(),
            "ABABABAB",
            "😀😀😀😀😀",
            "aaabccccd\n\n\n",
        ] {
            assert_eq!(decode(&encode(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_known_encoding() {
        assert_eq!(encode("AAAAA"), vec![0x05, 0x41]);
        assert_eq!(decode(&[0x05, 0x41]).unwrap(), "AAAAA");
        assert_eq!(encode("AAB"), vec![0x02, b'A', 0x01, b'B']);
    }

    #[test]
    fn test_empty() {
        assert!(encode("").is_empty());
        assert_eq!(decode(&[]).unwrap(), "");
    }

    #[test]
    fn test_long_run_is_split() {
        let text = "x".repeat(300);
        let encoded = encode(&text);
        assert_eq!(encoded, vec![255, b'x', 45, b'x']);
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn test_exact_max_run() {
        let encoded = encode(&"z".repeat(255));
        assert_eq!(encoded, vec![255, b'z']);

        let encoded = encode(&"z".repeat(256));
        assert_eq!(encoded, vec![255, b'z', 1, b'z']);
    }

    #[test]
    fn test_multibyte_runs_are_bytewise() {
        // "é" is 0xC3 0xA9; no two adjacent bytes are equal
        assert_eq!(encode("éé"), vec![1, 0xC3, 1, 0xA9, 1, 0xC3, 1, 0xA9]);
    }

    #[test]
    fn test_odd_length_rejected() {
        assert!(matches!(
            decode(&[0x05, 0x41, 0x02]),
            Err(Error::Framing(FramingError::OddPayloadLength(3)))
        ));
    }

    #[test]
    fn test_zero_count_expands_to_nothing() {
        assert_eq!(decode(&[0x00, 0x41, 0x03, 0x42]).unwrap(), "BBB");
        assert_eq!(decode(&[0x02, 0x41, 0x00, 0x42]).unwrap(), "AA");
        assert_eq!(decode(&[0x00, 0xFF]).unwrap(), "");
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(decode(&[0x01, 0xFF]), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_random_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let alphabet = ['A', 'B', 'C'];
        for _ in 0..100 {
            let len = rng.gen_range(1..=512);
            let text: String = (0..len)
                .map(|_| *alphabet.choose(&mut rng).unwrap())
                .collect();
            assert_eq!(decode(&encode(&text)).unwrap(), text);
        }
    }
}
