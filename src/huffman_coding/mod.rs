//! The huffman_coding module holds the two entropy coders.
//!
//! - huffman: Static, two pass coding. Frequencies are counted first, and the tree shape and
//!   leaf values travel in front of the payload so the decoder can rebuild the same tree.
//! - adaptive: One pass FGK coding. Both sides grow the same tree as symbols go by, so no table
//!   is transmitted. New bytes are escaped with the NYT code and the stream closes with an EOF code.
//!
pub mod adaptive;
pub mod huffman;
