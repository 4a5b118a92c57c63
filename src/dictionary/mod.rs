//! The dictionary module holds the LZW coder.
//!
//! Codes are a fixed 14 bits wide. Codes 0-255 stand for single bytes, 256-16382 for strings
//! learned while coding, and 16383 marks the end of the data. Once every code is taken the
//! dictionary simply stops growing.
//!
pub mod lzw;
