//! The bitstream module forms the bit-level I/O subsystem shared by the entropy and dictionary coders.
//!
//! All codes are packed most-significant-bit first. A partial final byte is padded with zero bits.
//!
//! - bitwriter: Packs variable width codes into an in-memory byte buffer.
//! - bitreader: Reads single bits or fixed width fields back from any `Read` source.
//!
pub mod bitreader;
pub mod bitwriter;
