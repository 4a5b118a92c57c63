use log::{debug, error, info, trace};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{CodecError, Result};
use crate::tools::freq_count::freqs;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A full binary tree over at most 256 leaves has at most this many nodes.
const MAX_NODES: usize = 511;
/// Size of the little-endian payload bit length field.
const LEN_BYTES: usize = 4;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    /// Smallest byte value found in this subtree, used to break weight ties
    pub syms: u8,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, syms: u8, node_data: NodeData) -> Node {
        Node {
            weight,
            syms,
            node_data,
        }
    }
}

impl Ord for Node {
    /// Sort Nodes by decreasing weight and decreasing symbol value, so a BinaryHeap pops
    /// the lightest node first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.syms.cmp(&self.syms))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the huffman tree for a frequency table, or None if every count is zero.
pub fn build_tree(freqs: &[u32]) -> Option<Node> {
    let mut heap: BinaryHeap<Node> = freqs
        .iter()
        .enumerate()
        .filter(|(_, &f)| f > 0)
        .map(|(sym, &f)| Node::new(f as u64, sym as u8, NodeData::Leaf(sym as u8)))
        .collect();

    // Repeatedly merge the two lightest nodes. The lighter one goes on the left.
    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        heap.push(Node::new(
            left.weight + right.weight,
            left.syms.min(right.syms),
            NodeData::Kids(Box::new(left), Box::new(right)),
        ));
    }
    heap.pop()
}

/// Returns (code, length) for every byte value. Unused bytes have length 0. A tree with a
/// single leaf gives that leaf the one bit code 0.
pub fn code_table(root: &Node) -> Vec<(u64, u8)> {
    let mut table = vec![(0_u64, 0_u8); 256];
    match &root.node_data {
        NodeData::Leaf(sym) => table[*sym as usize] = (0, 1),
        NodeData::Kids(..) => assign_codes(root, 0, 0, &mut table),
    }
    table
}

fn assign_codes(node: &Node, code: u64, len: u8, table: &mut [(u64, u8)]) {
    match &node.node_data {
        NodeData::Leaf(sym) => table[*sym as usize] = (code, len),
        NodeData::Kids(left, right) => {
            assign_codes(left, code << 1, len + 1, table);
            assign_codes(right, code << 1 | 1, len + 1, table);
        }
    }
}

/// Write the tree shape in preorder (1 = leaf, 0 = internal), collecting leaf values as we go.
fn write_shape(node: &Node, bw: &mut BitWriter, leaves: &mut Vec<u8>) {
    match &node.node_data {
        NodeData::Leaf(sym) => {
            bw.out_bit(true);
            leaves.push(*sym);
        }
        NodeData::Kids(left, right) => {
            bw.out_bit(false);
            write_shape(left, bw, leaves);
            write_shape(right, bw, leaves);
        }
    }
}

/// Puts a code of up to 64 bits on the stream.
fn out_code(bw: &mut BitWriter, code: u64, len: u8) {
    if len > 32 {
        bw.out_bits(len - 32, (code >> 32) as u32);
        bw.out_bits(32, code as u32);
    } else {
        bw.out_bits(len, code as u32);
    }
}

/// Static (two pass) huffman encoding. The output holds the tree shape bits padded to a byte,
/// the leaf values in preorder, the payload length in bits (u32 LE), and the packed codes.
/// Empty input gives empty output.
pub fn huf_encode(data: &[u8]) -> Result<Vec<u8>> {
    // First pass: count, build the tree and the code table
    let freqs = freqs(data);
    let Some(root) = build_tree(&freqs) else {
        return Ok(Vec::new());
    };
    let codes = code_table(&root);

    // The payload length has to fit the 32 bit length field
    let bits: u64 = freqs
        .iter()
        .zip(&codes)
        .map(|(&f, &(_, len))| f as u64 * len as u64)
        .sum();
    if bits > u32::MAX as u64 {
        return Err(CodecError::InputTooLarge(data.len()));
    }

    let mut bw = BitWriter::new(data.len() / 2 + 600);
    let mut leaves = Vec::with_capacity(256);
    write_shape(&root, &mut bw, &mut leaves);
    bw.flush();
    debug!(
        "Huffman tree has {} leaves, shape ends at {}",
        leaves.len(),
        bw.loc()
    );
    leaves.iter().for_each(|&sym| bw.out8(sym));
    bw.out32_le(bits as u32);

    // Second pass: the codes themselves
    for &byte in data {
        let (code, len) = codes[byte as usize];
        out_code(&mut bw, code, len);
    }
    trace!("Huffman payload ends at {}", bw.loc());
    bw.flush();

    info!(
        "Huffman encoded {} bytes into {} bytes ({} payload bits)",
        data.len(),
        bw.output.len(),
        bits
    );
    Ok(bw.output)
}

/// Read the preorder shape bits. Returns the bits and the number of bytes they occupy.
fn read_shape(data: &[u8]) -> Result<(Vec<bool>, usize)> {
    let mut br = BitReader::new(data);
    let mut shape = Vec::new();
    // Number of subtrees still to be read
    let mut pending = 1_usize;
    while pending > 0 {
        if shape.len() == MAX_NODES {
            return Err(CodecError::malformed("huffman tree has too many nodes"));
        }
        let is_leaf = br
            .bool_bit()
            .ok_or_else(|| CodecError::malformed("huffman tree shape is truncated"))?;
        shape.push(is_leaf);
        if is_leaf {
            pending -= 1;
        } else {
            pending += 1;
        }
    }
    let bytes = shape.len().div_ceil(8);
    Ok((shape, bytes))
}

/// Rebuild the tree from preorder shape bits and leaf values.
fn grow_tree(
    shape: &mut impl Iterator<Item = bool>,
    leaves: &mut impl Iterator<Item = u8>,
) -> Result<Node> {
    let is_leaf = shape
        .next()
        .ok_or_else(|| CodecError::malformed("huffman tree shape is truncated"))?;
    if is_leaf {
        let sym = leaves
            .next()
            .ok_or_else(|| CodecError::malformed("huffman leaf values are truncated"))?;
        Ok(Node::new(0, sym, NodeData::Leaf(sym)))
    } else {
        let left = grow_tree(shape, leaves)?;
        let right = grow_tree(shape, leaves)?;
        Ok(Node::new(
            0,
            left.syms.min(right.syms),
            NodeData::Kids(Box::new(left), Box::new(right)),
        ))
    }
}

/// Decode data written by huf_encode.
pub fn huf_decode(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    // Get the tree shape and leaf values
    let (shape, shape_bytes) = read_shape(data)?;
    let leaf_count = shape.iter().filter(|&&b| b).count();
    let header = shape_bytes + leaf_count + LEN_BYTES;
    if data.len() < header {
        error!("Huffman header needs {} bytes, have {}", header, data.len());
        return Err(CodecError::malformed("huffman header is truncated"));
    }
    let leaves = &data[shape_bytes..shape_bytes + leaf_count];
    let mut seen = [false; 256];
    for &sym in leaves {
        if seen[sym as usize] {
            return Err(CodecError::malformed(format!(
                "huffman leaf value {} appears twice",
                sym
            )));
        }
        seen[sym as usize] = true;
    }
    let root = grow_tree(&mut shape.into_iter(), &mut leaves.iter().copied())?;

    // Get the payload length and make sure it matches what is left
    let len_at = shape_bytes + leaf_count;
    let bits = u32::from_le_bytes([
        data[len_at],
        data[len_at + 1],
        data[len_at + 2],
        data[len_at + 3],
    ]) as usize;
    let payload = &data[header..];
    if payload.len() != bits.div_ceil(8) {
        error!(
            "Huffman payload declares {} bits but holds {} bytes",
            bits,
            payload.len()
        );
        return Err(CodecError::malformed(format!(
            "huffman payload declares {} bits but holds {} bytes",
            bits,
            payload.len()
        )));
    }
    debug!("Huffman tree has {} leaves, {} payload bits", leaf_count, bits);

    let mut br = BitReader::new(payload);
    let mut out = Vec::with_capacity(bits / 2);

    // A lone leaf uses the one bit code 0 for every occurrence
    if let NodeData::Leaf(sym) = root.node_data {
        for _ in 0..bits {
            match br.bit() {
                Some(0) => out.push(sym),
                _ => return Err(CodecError::corrupt("unexpected bit in single symbol payload")),
            }
        }
        return Ok(out);
    }

    let mut node = &root;
    for _ in 0..bits {
        let bit = br
            .bit()
            .ok_or_else(|| CodecError::malformed("huffman payload is truncated"))?;
        if let NodeData::Kids(left, right) = &node.node_data {
            let next: &Node = if bit == 1 { right } else { left };
            node = next;
        }
        if let NodeData::Leaf(sym) = node.node_data {
            out.push(sym);
            node = &root;
        }
    }
    if !std::ptr::eq(node, &root) {
        error!("Huffman payload ends inside a code at {}", br.loc());
        return Err(CodecError::corrupt("payload ends inside a code"));
    }
    info!("Huffman decoded {} bytes", out.len());
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tie_break_test() {
        // Equal weights: the smaller byte value is merged (and placed) first
        let mut f = vec![0_u32; 256];
        f[b'c' as usize] = 1;
        f[b'a' as usize] = 1;
        f[b'b' as usize] = 2;
        let root = build_tree(&f).unwrap();
        let codes = code_table(&root);
        // a+c (weight 2, syms a) and b (weight 2, syms b): the a+c subtree goes left
        assert_eq!(codes[b'a' as usize], (0b00, 2));
        assert_eq!(codes[b'c' as usize], (0b01, 2));
        assert_eq!(codes[b'b' as usize], (0b1, 1));
    }

    #[test]
    fn single_symbol_test() {
        let data = b"AAAAAAAAAA";
        let encoded = huf_encode(data).unwrap();
        assert_eq!(encoded, vec![0x80, b'A', 10, 0, 0, 0, 0, 0]);
        assert_eq!(huf_decode(&encoded).unwrap(), data.to_vec());
    }

    #[test]
    fn single_symbol_one_bit_test() {
        let encoded = vec![0x80, b'A', 3, 0, 0, 0, 0b0100_0000];
        assert!(matches!(
            huf_decode(&encoded),
            Err(CodecError::TreeCorruption(_))
        ));
    }

    #[test]
    fn empty_test() {
        assert!(huf_encode(&[]).unwrap().is_empty());
        assert!(huf_decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn round_trip_test() {
        let data = "She sells sea shells by the sea shore. The shells she sells are surely seashells.";
        let encoded = huf_encode(data.as_bytes()).unwrap();
        assert!(encoded.len() < data.len());
        assert_eq!(huf_decode(&encoded).unwrap(), data.as_bytes());
    }

    #[test]
    fn all_bytes_test() {
        let data: Vec<u8> = (0..=255_u8).cycle().take(256 * 12).collect();
        let encoded = huf_encode(&data).unwrap();
        // 256 equally likely symbols take exactly 8 bits each
        let header = 64 + 256 + 4;
        assert_eq!(encoded.len(), header + data.len());
        assert_eq!(huf_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn payload_bound_test() {
        let data = b"abcdefghabcdefgaaaabbbcd";
        let encoded = huf_encode(data).unwrap();
        let (shape, shape_bytes) = read_shape(&encoded).unwrap();
        let leaves = shape.iter().filter(|&&b| b).count();
        let at = shape_bytes + leaves;
        let bits = u32::from_le_bytes(encoded[at..at + 4].try_into().unwrap());
        assert!(bits as usize <= 8 * data.len());
    }

    #[test]
    fn malformed_test() {
        let encoded = huf_encode(b"hello huffman").unwrap();
        // Drop the last payload byte
        assert!(matches!(
            huf_decode(&encoded[..encoded.len() - 1]),
            Err(CodecError::MalformedContainer(_))
        ));
        // Shape that never completes
        assert!(matches!(
            huf_decode(&[0x00]),
            Err(CodecError::MalformedContainer(_))
        ));
        // Two leaves with the same value
        assert!(matches!(
            huf_decode(&[0b0110_0000, b'x', b'x', 0, 0, 0, 0]),
            Err(CodecError::MalformedContainer(_))
        ));
    }

    #[test]
    fn truncated_code_test() {
        // Tree: 0 -> (0 -> a, b), 1 -> c ; payload "0" stops inside the code for a or b
        let encoded = vec![0b0011_1000, b'a', b'b', b'c', 1, 0, 0, 0, 0b0000_0000];
        assert!(matches!(
            huf_decode(&encoded),
            Err(CodecError::TreeCorruption(_))
        ));
    }
}
