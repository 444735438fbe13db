//! Static Huffman codec over the UTF-8 bytes of a text.
//!
//! The encoder counts byte frequencies, builds a full binary tree by
//! repeatedly merging the two lightest nodes, and writes each byte's
//! root-to-leaf path (left = 0, right = 1) into a bit stream. The tree is
//! stored in the archive, so decoding needs nothing but the archive.
//!
//! # Tie-breaking
//!
//! Leaves enter the priority queue in ascending symbol order and merged
//! nodes follow in creation order. Among equal weights the earliest entry
//! is taken first, and the first node taken becomes the left child. Only
//! the round trip depends on this; the exact code assignment is not part
//! of the format.
//!
//! # Degenerate alphabets
//!
//! A text made of one repeated byte yields a tree that is a single leaf.
//! That symbol gets the one-bit code `0`, so the stored bit count equals the
//! number of repetitions and the decoder rebuilds the text from it alone.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, FramingError, HuffmanError, Result};
use crate::framing;

/// Tree section marker for an internal node.
pub const INTERNAL_MARKER: u8 = 0x00;

/// Tree section marker for a leaf; followed by the symbol byte.
pub const LEAF_MARKER: u8 = 0x01;

/// Width of the meaningful-bit count that trails the serialized tree.
const BIT_COUNT_BYTES: usize = 3;

/// Largest payload the 24-bit count field can describe.
pub const MAX_PAYLOAD_BITS: usize = (1 << 24) - 1;

/// Deepest leaf a 256-symbol alphabet can produce.
const MAX_CODE_LEN: usize = 255;

/// A Huffman tree node.
///
/// Children are owned by their parent; every internal node has exactly two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(u8),
    Internal(Box<Node>, Box<Node>),
}

impl Node {
    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Priority queue entry: lightest weight first, then earliest insertion.
struct Weighted {
    weight: u64,
    seq: usize,
    node: Node,
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weighted {}

/// Count how often each byte value occurs.
pub fn frequencies(data: &[u8]) -> [u64; 256] {
    let mut freqs = [0u64; 256];
    for &byte in data {
        freqs[byte as usize] += 1;
    }
    freqs
}

/// Build a Huffman tree from a frequency table.
///
/// Returns `None` when every frequency is zero.
pub fn build_tree(freqs: &[u64; 256]) -> Option<Node> {
    let mut heap: BinaryHeap<Weighted> = freqs
        .iter()
        .enumerate()
        .filter(|&(_, &weight)| weight > 0)
        .enumerate()
        .map(|(seq, (symbol, &weight))| Weighted {
            weight,
            seq,
            node: Node::Leaf(symbol as u8),
        })
        .collect();

    let mut next_seq = heap.len();
    loop {
        let first = heap.pop()?;
        let Some(second) = heap.pop() else {
            return Some(first.node);
        };

        heap.push(Weighted {
            weight: first.weight + second.weight,
            seq: next_seq,
            node: Node::Internal(Box::new(first.node), Box::new(second.node)),
        });
        next_seq += 1;
    }
}

/// Prefix-free code for every symbol present in a tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    /// Indexed by symbol; empty for symbols not in the tree
    codes: Vec<Vec<bool>>,
}

impl CodeTable {
    /// Derive codes from root-to-leaf paths.
    ///
    /// A tree that is a single leaf maps its symbol to the code `0`.
    pub fn from_tree(root: &Node) -> Self {
        let mut table = Self {
            codes: vec![Vec::new(); 256],
        };

        match root {
            Node::Leaf(symbol) => table.codes[*symbol as usize] = vec![false],
            Node::Internal(..) => table.assign(root, &mut Vec::new()),
        }

        table
    }

    fn assign(&mut self, node: &Node, path: &mut Vec<bool>) {
        match node {
            Node::Leaf(symbol) => self.codes[*symbol as usize] = path.clone(),
            Node::Internal(left, right) => {
                path.push(false);
                self.assign(left, path);
                path.pop();

                path.push(true);
                self.assign(right, path);
                path.pop();
            }
        }
    }

    /// Code for `symbol`; empty if the symbol never occurred.
    pub fn code(&self, symbol: u8) -> &[bool] {
        &self.codes[symbol as usize]
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| !code.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encoded length in bits of input with the given frequencies.
    pub fn encoded_bits(&self, freqs: &[u64; 256]) -> u64 {
        freqs
            .iter()
            .zip(&self.codes)
            .map(|(&freq, code)| freq * code.len() as u64)
            .sum()
    }
}

/// Append the pre-order serialization of `node` to `out`.
pub fn serialize_tree(node: &Node, out: &mut Vec<u8>) {
    match node {
        Node::Leaf(symbol) => {
            out.push(LEAF_MARKER);
            out.push(*symbol);
        }
        Node::Internal(left, right) => {
            out.push(INTERNAL_MARKER);
            serialize_tree(left, out);
            serialize_tree(right, out);
        }
    }
}

/// Rebuild a tree from the front of `bytes`.
///
/// Returns the tree and the number of bytes it occupied, so the caller can
/// find whatever follows it.
///
/// # Errors
/// - `FramingError::TreeSectionOverrun` if `bytes` ends mid-tree
/// - `HuffmanError::InvalidTreeMarker` on an unknown marker byte
/// - `HuffmanError::TreeTooDeep` if leaves sit deeper than 255 levels
pub fn deserialize_tree(bytes: &[u8]) -> Result<(Node, usize)> {
    let mut pos = 0;
    let node = deserialize_node(bytes, &mut pos, 0)?;
    Ok((node, pos))
}

fn deserialize_node(bytes: &[u8], pos: &mut usize, depth: usize) -> Result<Node> {
    let marker = next_byte(bytes, pos)?;
    match marker {
        LEAF_MARKER => Ok(Node::Leaf(next_byte(bytes, pos)?)),
        INTERNAL_MARKER => {
            if depth >= MAX_CODE_LEN {
                return Err(HuffmanError::TreeTooDeep { max: MAX_CODE_LEN }.into());
            }
            let left = deserialize_node(bytes, pos, depth + 1)?;
            let right = deserialize_node(bytes, pos, depth + 1)?;
            Ok(Node::Internal(Box::new(left), Box::new(right)))
        }
        _ => Err(HuffmanError::InvalidTreeMarker {
            marker,
            position: *pos - 1,
        }
        .into()),
    }
}

fn next_byte(bytes: &[u8], pos: &mut usize) -> Result<u8> {
    let byte = *bytes.get(*pos).ok_or(FramingError::TreeSectionOverrun {
        required: *pos + 1,
        actual: bytes.len(),
    })?;
    *pos += 1;
    Ok(byte)
}

/// Compress `text` into a complete Huffman archive.
///
/// Empty text yields an empty archive.
///
/// # Errors
/// `HuffmanError::PayloadTooLarge` if the code bits don't fit the 24-bit
/// count field.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let data = text.as_bytes();
    let freqs = frequencies(data);
    let Some(root) = build_tree(&freqs) else {
        return Ok(Vec::new());
    };
    let table = CodeTable::from_tree(&root);

    let total_bits = table.encoded_bits(&freqs) as usize;
    if total_bits > MAX_PAYLOAD_BITS {
        return Err(HuffmanError::PayloadTooLarge {
            bits: total_bits,
            max: MAX_PAYLOAD_BITS,
        }
        .into());
    }

    let mut writer = BitWriter::new();
    for &byte in data {
        for &bit in table.code(byte) {
            writer.write_bit(bit);
        }
    }
    writer.pad_to_byte(false);
    debug_assert_eq!(writer.nbits(), total_bits);
    let payload = writer.finish();

    let mut tree_section = Vec::with_capacity(3 * table.len() + BIT_COUNT_BYTES);
    serialize_tree(&root, &mut tree_section);
    tree_section.extend_from_slice(&(total_bits as u32).to_be_bytes()[1..]);

    debug!(
        input_bytes = data.len(),
        symbols = table.len(),
        tree_section_bytes = tree_section.len(),
        payload_bits = total_bits,
        "huffman encode"
    );

    Ok(framing::serialize_huffman_archive(
        framing::checksum(data),
        &tree_section,
        &payload,
    ))
}

/// Recover the text from a Huffman archive.
///
/// Empty input yields empty text.
///
/// # Errors
/// - framing/tree errors if the archive is malformed
/// - `Error::Crc` if the decoded bytes don't match the stored checksum
/// - `Error::Utf8` if they are not valid UTF-8
pub fn decode(buf: &[u8]) -> Result<String> {
    if buf.is_empty() {
        return Ok(String::new());
    }

    let archive = framing::parse_huffman_archive(buf)?;
    let section = archive.tree_section;
    let (root, tree_len) = deserialize_tree(section)?;

    let count_end = tree_len + BIT_COUNT_BYTES;
    let count = section
        .get(tree_len..count_end)
        .ok_or(FramingError::TreeSectionOverrun {
            required: count_end,
            actual: section.len(),
        })?;
    let total_bits = u32::from_be_bytes([0, count[0], count[1], count[2]]) as usize;

    let decoded = match &root {
        // The leaf's symbol was seen at least once, even if the count is 0
        Node::Leaf(symbol) => vec![*symbol; total_bits.max(1)],
        Node::Internal(..) => {
            if total_bits > archive.payload.len() * 8 {
                return Err(FramingError::FrameTooShort {
                    required: buf.len() - archive.payload.len() + total_bits.div_ceil(8),
                    actual: buf.len(),
                }
                .into());
            }
            walk(&root, BitReader::with_len(archive.payload, total_bits))
        }
    };

    debug!(
        archive_bytes = buf.len(),
        symbols = root.leaf_count(),
        payload_bits = total_bits,
        output_bytes = decoded.len(),
        "huffman decode"
    );

    let actual = framing::checksum(&decoded);
    if actual != archive.checksum {
        return Err(Error::Crc {
            expected: archive.checksum,
            actual,
        });
    }

    Ok(String::from_utf8(decoded)?)
}

/// Follow bits from the root, emitting a symbol at every leaf.
///
/// `root` must be an internal node. A code cut short by the end of the
/// stream emits nothing; the checksum catches it.
fn walk(root: &Node, reader: BitReader<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(reader.bits_left() / 2);
    let mut node = root;

    for bit in reader {
        if let Node::Internal(left, right) = node {
            node = if bit { right.as_ref() } else { left.as_ref() };
        }
        if let Node::Leaf(symbol) = node {
            out.push(*symbol);
            node = root;
        }
    }

    out
}
