//! The compression module runs the named pipelines.
//!
//! Compression chains these stages, depending on the operation chosen:
//! - Burrows Wheeler Transform: Sort the data to increase the probability of runs of identical bytes.
//! - Move To Front transform: Turn those runs into runs of small values, mostly zero.
//! - Entropy or dictionary coding: static huffman, adaptive huffman or LZW.
//!
//! Decompression runs the inverse stages in reverse order. Adaptive huffman output is wrapped
//! in a container carrying a CRC-32 of the original data, which is checked once every stage
//! has been undone.
//!
//! - operation: The closed set of pipelines and their names.
//! - container: Magic, length and CRC framing for adaptive streams.
//! - compress / decompress: Stage dispatch for each operation.
//! - pipeline: Name based entry point with compression statistics.
//!
pub mod compress;
pub mod container;
pub mod decompress;
pub mod operation;
pub mod pipeline;
