//! Adaptive (one pass) huffman coding using the FGK algorithm.
//!
//! Encoder and decoder start from the same three node tree (root, EOF, NYT) and apply the
//! same update after every symbol, so no code table is ever transmitted. A byte seen for
//! the first time is sent as the NYT ("not yet transmitted") code followed by its 8 raw bits.
//! The stream ends with the EOF code and zero padding.
//!
//! Nodes live in an arena and refer to each other by index. Every node carries an order
//! number; listing nodes by increasing order gives non-decreasing weights and puts siblings
//! next to each other (the sibling property). The root has order 516.
//!
use log::{debug, error, trace};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{CodecError, Result};

/// Order number of the root. 256 byte leaves plus EOF and NYT need 515 nodes below it.
pub const ROOT_ORDER: usize = 516;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Byte(u8),
    Eof,
    Nyt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeData {
    Kids { left: usize, right: usize },
    Leaf(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    weight: u64,
    order: usize,
    parent: Option<usize>,
    node_data: NodeData,
}

/// The shared model of an adaptive huffman stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveTree {
    nodes: Vec<Node>,
    /// Node index for each order number
    by_order: Vec<Option<usize>>,
    /// Leaf index for each byte value seen so far
    leaves: Vec<Option<usize>>,
    root: usize,
    nyt: usize,
    eof: usize,
}

impl AdaptiveTree {
    /// Fresh tree: the root with NYT on the left and EOF on the right.
    pub fn new() -> Self {
        // EOF carries a fixed weight of 1 so NYT is the only leaf that ever weighs 0
        let nodes = vec![
            Node {
                weight: 1,
                order: ROOT_ORDER,
                parent: None,
                node_data: NodeData::Kids { left: 2, right: 1 },
            },
            Node {
                weight: 1,
                order: ROOT_ORDER - 1,
                parent: Some(0),
                node_data: NodeData::Leaf(Symbol::Eof),
            },
            Node {
                weight: 0,
                order: ROOT_ORDER - 2,
                parent: Some(0),
                node_data: NodeData::Leaf(Symbol::Nyt),
            },
        ];
        let mut by_order = vec![None; ROOT_ORDER + 1];
        by_order[ROOT_ORDER] = Some(0);
        by_order[ROOT_ORDER - 1] = Some(1);
        by_order[ROOT_ORDER - 2] = Some(2);
        Self {
            nodes,
            by_order,
            leaves: vec![None; 256],
            root: 0,
            nyt: 2,
            eof: 1,
        }
    }

    /// True if the byte already has its own leaf.
    pub fn contains(&self, byte: u8) -> bool {
        self.leaves[byte as usize].is_some()
    }

    /// Puts the code for a node on the stream (root to leaf, left 0, right 1).
    fn write_code(&self, node: usize, bw: &mut BitWriter) {
        let mut path = Vec::with_capacity(32);
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            if let NodeData::Kids { right, .. } = self.nodes[parent].node_data {
                path.push(right == current);
            }
            current = parent;
        }
        path.iter().rev().for_each(|&bit| bw.out_bit(bit));
    }

    /// Turn NYT into an internal node with a new NYT on the left and a leaf for `byte` on the
    /// right. Returns the new leaf.
    fn split_nyt(&mut self, byte: u8) -> usize {
        let old = self.nyt;
        let order = self.nodes[old].order;
        let new_nyt = self.nodes.len();
        let leaf = new_nyt + 1;
        self.nodes.push(Node {
            weight: 0,
            order: order - 2,
            parent: Some(old),
            node_data: NodeData::Leaf(Symbol::Nyt),
        });
        self.nodes.push(Node {
            weight: 0,
            order: order - 1,
            parent: Some(old),
            node_data: NodeData::Leaf(Symbol::Byte(byte)),
        });
        self.nodes[old].node_data = NodeData::Kids {
            left: new_nyt,
            right: leaf,
        };
        self.by_order[order - 2] = Some(new_nyt);
        self.by_order[order - 1] = Some(leaf);
        self.nyt = new_nyt;
        self.leaves[byte as usize] = Some(leaf);
        leaf
    }

    /// Highest ordered node with the same weight as `node` (the block leader).
    fn leader(&self, node: usize) -> usize {
        let weight = self.nodes[node].weight;
        let mut leader = node;
        for order in self.nodes[node].order + 1..=ROOT_ORDER {
            match self.by_order[order] {
                Some(n) if self.nodes[n].weight == weight => leader = n,
                _ => break,
            }
        }
        leader
    }

    fn replace_child(&mut self, parent: usize, old: usize, new: usize) {
        if let NodeData::Kids { left, right } = &mut self.nodes[parent].node_data {
            if *left == old {
                *left = new;
            } else if *right == old {
                *right = new;
            }
        }
    }

    /// Exchange the tree positions (and order numbers) of two nodes, subtrees included.
    fn swap(&mut self, a: usize, b: usize) {
        let (Some(pa), Some(pb)) = (self.nodes[a].parent, self.nodes[b].parent) else {
            error!("Asked to swap the root of the adaptive tree");
            return;
        };
        if pa == pb {
            if let NodeData::Kids { left, right } = &mut self.nodes[pa].node_data {
                std::mem::swap(left, right);
            }
        } else {
            self.replace_child(pa, a, b);
            self.replace_child(pb, b, a);
            self.nodes[a].parent = Some(pb);
            self.nodes[b].parent = Some(pa);
        }
        let (oa, ob) = (self.nodes[a].order, self.nodes[b].order);
        self.nodes[a].order = ob;
        self.nodes[b].order = oa;
        self.by_order[oa] = Some(b);
        self.by_order[ob] = Some(a);
    }

    /// Increment weights from `node` up to the root, swapping each node with its block leader
    /// first so the sibling property survives the increment.
    fn update(&mut self, node: usize) {
        let mut current = Some(node);
        while let Some(n) = current {
            let leader = self.leader(n);
            if leader != n && Some(leader) != self.nodes[n].parent {
                self.swap(n, leader);
            }
            self.nodes[n].weight += 1;
            current = self.nodes[n].parent;
        }
    }

    /// Encode one byte and update the model.
    pub fn encode_symbol(&mut self, byte: u8, bw: &mut BitWriter) {
        match self.leaves[byte as usize] {
            Some(leaf) => {
                self.write_code(leaf, bw);
                self.update(leaf);
            }
            None => {
                self.write_code(self.nyt, bw);
                bw.out8(byte);
                let leaf = self.split_nyt(byte);
                self.update(leaf);
            }
        }
    }

    /// Encode the end of stream marker. The model is not updated.
    pub fn encode_eof(&self, bw: &mut BitWriter) {
        self.write_code(self.eof, bw);
    }

    /// Decode one symbol and update the model. Returns None at EOF.
    pub fn decode_symbol<R: std::io::Read>(&mut self, br: &mut BitReader<R>) -> Result<Option<u8>> {
        let mut node = self.root;
        while let NodeData::Kids { left, right } = self.nodes[node].node_data {
            let bit = br
                .bit()
                .ok_or_else(|| CodecError::corrupt("bitstream ended before the EOF code"))?;
            node = if bit == 1 { right } else { left };
        }
        match self.nodes[node].node_data {
            NodeData::Leaf(Symbol::Eof) => Ok(None),
            NodeData::Leaf(Symbol::Nyt) => {
                let byte = br
                    .byte()
                    .ok_or_else(|| CodecError::corrupt("bitstream ended inside an escaped byte"))?;
                if self.contains(byte) {
                    error!("Escaped byte {} is already in the tree at {}", byte, br.loc());
                    return Err(CodecError::corrupt(format!(
                        "escaped byte {} is already in the tree",
                        byte
                    )));
                }
                let leaf = self.split_nyt(byte);
                self.update(leaf);
                Ok(Some(byte))
            }
            NodeData::Leaf(Symbol::Byte(byte)) => {
                self.update(node);
                Ok(Some(byte))
            }
            NodeData::Kids { .. } => Err(CodecError::corrupt("walk stopped on an internal node")),
        }
    }

    /// Checks the sibling property: weights do not decrease with order, siblings hold adjacent
    /// orders below their parent, and every internal node weighs the sum of its children.
    pub fn sibling_property_holds(&self) -> bool {
        let lowest = ROOT_ORDER + 1 - self.nodes.len();
        let mut last_weight = 0;
        for order in lowest..=ROOT_ORDER {
            let Some(n) = self.by_order[order] else {
                return false;
            };
            let node = &self.nodes[n];
            if node.order != order || node.weight < last_weight {
                return false;
            }
            last_weight = node.weight;
            if let NodeData::Kids { left, right } = node.node_data {
                let (l, r) = (&self.nodes[left], &self.nodes[right]);
                if l.order + 1 != r.order
                    || r.order >= order
                    || l.weight + r.weight != node.weight
                    || l.parent != Some(n)
                    || r.parent != Some(n)
                {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for AdaptiveTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Adaptive huffman encode. Returns the bitstream, padded with zeros after the EOF code.
pub fn adaptive_encode(data: &[u8]) -> Vec<u8> {
    let mut tree = AdaptiveTree::new();
    let mut bw = BitWriter::new(data.len() / 2 + 16);
    for &byte in data {
        tree.encode_symbol(byte, &mut bw);
    }
    tree.encode_eof(&mut bw);
    trace!("Adaptive stream ends at {}", bw.loc());
    bw.flush();
    debug!(
        "Adaptive huffman encoded {} bytes into {} bytes",
        data.len(),
        bw.output.len()
    );
    bw.output
}

/// Adaptive huffman decode of a bitstream written by adaptive_encode.
pub fn adaptive_decode(bits: &[u8]) -> Result<Vec<u8>> {
    let mut tree = AdaptiveTree::new();
    let mut br = BitReader::new(bits);
    let mut out = Vec::with_capacity(bits.len() * 2);
    while let Some(byte) = tree.decode_symbol(&mut br)? {
        out.push(byte);
    }
    debug!(
        "Adaptive huffman decoded {} bytes into {} bytes",
        bits.len(),
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn initial_tree_test() {
        let tree = AdaptiveTree::new();
        assert!(tree.sibling_property_holds());
        assert_eq!(tree.nodes[tree.root].weight, 1);
        // NYT is the left child of the root, EOF the right
        let mut bw = BitWriter::new(4);
        tree.write_code(tree.nyt, &mut bw);
        tree.encode_eof(&mut bw);
        bw.flush();
        assert_eq!(bw.output, vec![0b0100_0000]);
    }

    #[test]
    fn empty_stream_test() {
        let bits = adaptive_encode(&[]);
        assert_eq!(bits, vec![0b1000_0000]);
        assert!(adaptive_decode(&bits).unwrap().is_empty());
    }

    #[test]
    fn first_symbol_test() {
        // NYT code "0", raw 'a', then EOF which keeps the code "1"
        let bits = adaptive_encode(b"a");
        assert_eq!(bits, vec![0b0011_0000, 0b1100_0000]);
        assert_eq!(adaptive_decode(&bits).unwrap(), b"a".to_vec());
    }

    #[test]
    fn sibling_property_test() {
        let mut tree = AdaptiveTree::new();
        let mut bw = BitWriter::new(1024);
        for &b in b"abracadabra, abracadabra! mississippi river" {
            tree.encode_symbol(b, &mut bw);
            assert!(tree.sibling_property_holds());
        }
    }

    #[test]
    fn lock_step_test() {
        let data = b"* The rain in Spain stays mainly in the plain.
* Peter piper picked a peck of pickled peppers.
* Colorless green ideas sleep furiously.";
        let mut encoder = AdaptiveTree::new();
        let mut bw = BitWriter::new(data.len());
        let mut snapshots = Vec::with_capacity(data.len());
        for &b in data.iter() {
            encoder.encode_symbol(b, &mut bw);
            snapshots.push(encoder.clone());
        }
        encoder.encode_eof(&mut bw);
        bw.flush();

        let mut decoder = AdaptiveTree::new();
        let mut br = BitReader::new(bw.output.as_slice());
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(decoder.decode_symbol(&mut br).unwrap(), Some(data[i]));
            assert_eq!(&decoder, snapshot);
            assert!(decoder.sibling_property_holds());
        }
        assert_eq!(decoder.decode_symbol(&mut br).unwrap(), None);
    }

    #[test]
    fn all_bytes_test() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut data: Vec<u8> = (0..=255).collect();
        data.extend((0..5000).map(|_| rng.gen::<u8>()));
        let bits = adaptive_encode(&data);
        assert_eq!(adaptive_decode(&bits).unwrap(), data);
    }

    #[test]
    fn skewed_test() {
        let mut data = vec![b'x'; 4000];
        data.extend_from_slice(b"yyz");
        let bits = adaptive_encode(&data);
        assert!(bits.len() < 600);
        assert_eq!(adaptive_decode(&bits).unwrap(), data);
    }

    #[test]
    fn truncated_test() {
        let bits = adaptive_encode(b"hello, adaptive world");
        assert!(matches!(
            adaptive_decode(&bits[..bits.len() / 2]),
            Err(CodecError::TreeCorruption(_))
        ));
        assert!(matches!(
            adaptive_decode(&[]),
            Err(CodecError::TreeCorruption(_))
        ));
    }

    #[test]
    fn repeated_escape_test() {
        // NYT + 'a', then NYT again (now "00") + 'a' a second time
        let bits = vec![0b0011_0000, 0b1000_1100, 0b0010_0000];
        assert!(matches!(
            adaptive_decode(&bits),
            Err(CodecError::TreeCorruption(_))
        ));
    }
}
