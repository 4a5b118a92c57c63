use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::CodecError;

/// The named pipelines. Each one is a fixed chain of stages run over whole in-memory buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// LZW on its own
    Lzw,
    /// Burrows-Wheeler transform only (block plus 4-byte key)
    Bwt,
    /// BWT, then LZW
    BwtLzw,
    /// BWT, move-to-front, then LZW
    BwtMtfLzw,
    /// BWT, move-to-front, then static huffman
    BwtMtfHuffman,
    /// BWT, move-to-front, then adaptive huffman in a checksummed container
    BwtMtfAdaptive,
    /// Adaptive huffman in a checksummed container
    AdaptiveHuffman,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Lzw,
        Operation::Bwt,
        Operation::BwtLzw,
        Operation::BwtMtfLzw,
        Operation::BwtMtfHuffman,
        Operation::BwtMtfAdaptive,
        Operation::AdaptiveHuffman,
    ];

    /// Name used to select the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Lzw => "lzw",
            Operation::Bwt => "bwt",
            Operation::BwtLzw => "bwt-lzw",
            Operation::BwtMtfLzw => "bwt-mtf-lzw",
            Operation::BwtMtfHuffman => "bwt-mtf-huffman",
            Operation::BwtMtfAdaptive => "bwt-mtf-adaptive",
            Operation::AdaptiveHuffman => "adaptive-huffman",
        }
    }

    /// True if the output is wrapped in the magic/length/CRC container.
    pub fn uses_container(&self) -> bool {
        matches!(self, Operation::BwtMtfAdaptive | Operation::AdaptiveHuffman)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Operation {
    type Err = CodecError;

    /// Names are matched without regard to case. "huffman" is accepted for adaptive-huffman.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "huffman" {
            return Ok(Operation::AdaptiveHuffman);
        }
        Operation::ALL
            .iter()
            .find(|op| op.name() == wanted)
            .copied()
            .ok_or_else(|| CodecError::unsupported(s.trim()))
    }
}
