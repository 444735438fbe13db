//! Sample text generation for benchmarking.
//!
//! When `bench` is given no files, we generate text with interesting
//! compression characteristics so both algorithms have something to show.
//!
//! # Design
//!
//! Generated text has:
//! - Some highly compressible sections (runs of one character)
//! - Some moderately compressible sections (English-like words)
//! - Some structured sections (a short phrase repeated)
//! - Some multi-byte sections (accented letters, CJK, emoji)
//!
//! Output is always valid UTF-8 and exactly the requested size.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const WORDS: &[&str] = &[
    "the", "of", "and", "to", "in", "is", "was", "that", "for", "it", "with", "as", "his", "on",
    "be", "at", "by", "had", "not", "are", "but", "from", "or", "have", "an", "they", "which",
    "one", "you", "were", "her", "all", "she", "there", "would", "their", "we", "him", "been",
    "has", "when", "who", "will", "more", "no", "if", "out", "so", "said",
];

const WIDE_CHARS: &[char] = &[
    'é', 'ü', 'ñ', 'ø', 'ß', 'ç', 'λ', 'Ж',
    '中', '文', '日', '本', '✓', '→', '🎉', '🦀',
];

/// Generate sample text with mixed compressibility.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: UTF-8 length of the result
///
/// # Returns
/// Text of exactly `size_bytes` bytes.
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(size_bytes);

    while text.len() < size_bytes {
        let before = text.len();
        let section_len = (size_bytes - text.len()).min(rng.gen_range(64..=1024));
        let limit = text.len() + section_len;

        // Choose section type randomly
        let section_type: u8 = rng.gen_range(0..10);

        match section_type {
            // 30% highly compressible (runs of one character)
            0..=2 => {
                while text.len() < limit {
                    let ch = *b"aeiou .-=*".choose(&mut rng).unwrap_or(&b' ') as char;
                    let run = rng.gen_range(8..=300);
                    for _ in 0..run {
                        if !push_within(&mut text, ch, limit) {
                            break;
                        }
                    }
                }
            }

            // 40% moderately compressible (English-like words)
            3..=6 => {
                while text.len() < limit {
                    let word = WORDS.choose(&mut rng).unwrap_or(&"the");
                    let sep = if rng.gen_ratio(1, 12) { '\n' } else { ' ' };
                    if !push_str_within(&mut text, word, limit)
                        || !push_within(&mut text, sep, limit)
                    {
                        break;
                    }
                }
            }

            // 20% structured (a short phrase repeated)
            7..=8 => {
                let phrase = generate_phrase(&mut rng);
                while push_str_within(&mut text, &phrase, limit) {}
                for ch in phrase.chars() {
                    if !push_within(&mut text, ch, limit) {
                        break;
                    }
                }
            }

            // 10% multi-byte characters
            _ => {
                while text.len() < limit {
                    let ch = *WIDE_CHARS.choose(&mut rng).unwrap_or(&'é');
                    if !push_within(&mut text, ch, limit) {
                        break;
                    }
                }
            }
        }

        // Nothing chosen fits in what is left; finish with spaces
        if text.len() == before {
            text.extend(std::iter::repeat(' ').take(size_bytes - text.len()));
        }
    }

    text
}

/// Generate a short phrase of a few words.
fn generate_phrase(rng: &mut ChaCha8Rng) -> String {
    let words = rng.gen_range(2..=6);
    let mut phrase = (0..words)
        .map(|_| *WORDS.choose(rng).unwrap_or(&"and"))
        .collect::<Vec<_>>()
        .join(" ");
    phrase.push_str(". ");
    phrase
}

/// Append `ch` if the text stays within `limit` bytes.
fn push_within(text: &mut String, ch: char, limit: usize) -> bool {
    if text.len() + ch.len_utf8() > limit {
        return false;
    }
    text.push(ch);
    true
}

/// Append `s` whole if the text stays within `limit` bytes.
fn push_str_within(text: &mut String, s: &str, limit: usize) -> bool {
    if s.is_empty() || text.len() + s.len() > limit {
        return false;
    }
    text.push_str(s);
    true
}
