//! The bwt_algorithms module holds the block-sorting transform.
//!
//! The Burrows-Wheeler Transform (BWT) reorders a block so that bytes which occur in similar
//! contexts end up next to each other. This produces runs that the later stages compress well.
//!
//! The transform needs a suffix array of the block. Two sorting algorithms are available:
//! - suffix_array: direct comparison sort for small blocks and SA-IS for everything else.
//! - bwt_sort: forward and inverse transform, plus the packed form with a 4-byte key trailer.
//!
pub mod bwt_sort;
pub mod suffix_array;
