//! The tools module provides the small helpers shared by the codec pipelines.
//!
//! The tools are:
//! - crc: CRC-32 checksum used by the adaptive Huffman container.
//! - freq_count: Byte frequency count for the static Huffman coder.
//! - mtf: Move-To-Front transform and its inverse.
//! - options: Configuration for a pipeline run.
//! - stats: Compression rate report.
//!
pub mod crc;
pub mod freq_count;
pub mod mtf;
pub mod options;
pub mod stats;
