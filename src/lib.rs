//! Block-sorting, multi-codec compression library.
//!
//! Provides byte-exact, in-memory codecs that can be chained into pipelines:
//! - Burrows-Wheeler transform built on a suffix array (direct sort or SA-IS)
//! - Move-to-front recoding
//! - Static two pass huffman coding with a serialized tree
//! - Adaptive one pass (FGK) huffman coding in a CRC-checked container
//! - LZW with fixed 14 bit codes
//!
//! Basic usage:
//!
//! ```
//! use bwzip::{process, Mode};
//!
//! let packed = process("bwt-mtf-adaptive", Mode::Compress, b"banana bandana").unwrap();
//! let unpacked = process("bwt-mtf-adaptive", Mode::Decompress, &packed.data).unwrap();
//! assert_eq!(unpacked.data, b"banana bandana");
//! ```
//!
//! The library reports progress through the `log` crate and never installs a logger itself.
//!
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod dictionary;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::compress;
pub use compression::decompress::{decompress, Decompressed};
pub use compression::operation::Operation;
pub use compression::pipeline::{process, run, Outcome};
pub use error::{CodecError, Result};
pub use tools::options::{CodecOpts, Mode, SortAlgorithm};
pub use tools::stats::CompressionStats;
