//! Container for adaptive huffman streams.
//!
//! Layout: 4 magic bytes (5A 52 41 48), the total container length as a little-endian u64,
//! the CRC-32 of the uncompressed data as a little-endian u32, then the bitstream.
//!
use log::{debug, error};

use crate::error::{CodecError, Result};

pub const MAGIC: [u8; 4] = [0x5A, 0x52, 0x41, 0x48];
pub const HEADER_LEN: usize = 16;

/// A parsed container. The payload borrows from the input.
#[derive(Debug, PartialEq, Eq)]
pub struct Container<'a> {
    pub crc: u32,
    pub payload: &'a [u8],
}

/// Wrap a bitstream together with the CRC of the data it encodes.
pub fn wrap(payload: &[u8], crc: u32) -> Vec<u8> {
    let total = (HEADER_LEN + payload.len()) as u64;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(payload);
    debug!("Container holds {} bytes, crc {:#010x}", total, crc);
    out
}

/// Check the header and split off the payload.
pub fn unwrap(data: &[u8]) -> Result<Container<'_>> {
    if data.len() < HEADER_LEN {
        error!("Container of {} bytes is shorter than its header", data.len());
        return Err(CodecError::malformed(format!(
            "container of {} bytes is shorter than its header",
            data.len()
        )));
    }
    if data[0..4] != MAGIC {
        error!("Container magic is {:02x?}", &data[0..4]);
        return Err(CodecError::malformed("container magic does not match"));
    }
    let mut len = [0_u8; 8];
    len.copy_from_slice(&data[4..12]);
    let total = u64::from_le_bytes(len);
    if total != data.len() as u64 {
        error!(
            "Container says it holds {} bytes, found {}",
            total,
            data.len()
        );
        return Err(CodecError::malformed(format!(
            "container says it holds {} bytes, found {}",
            total,
            data.len()
        )));
    }
    let crc = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
    Ok(Container {
        crc,
        payload: &data[HEADER_LEN..],
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wrap_test() {
        let wrapped = wrap(&[0xAB, 0xCD], 0x1234_5678);
        assert_eq!(
            wrapped,
            vec![
                0x5A, 0x52, 0x41, 0x48, 18, 0, 0, 0, 0, 0, 0, 0, 0x78, 0x56, 0x34, 0x12, 0xAB,
                0xCD
            ]
        );
        let container = unwrap(&wrapped).unwrap();
        assert_eq!(container.crc, 0x1234_5678);
        assert_eq!(container.payload, &[0xAB, 0xCD]);
    }

    #[test]
    fn bad_magic_test() {
        let mut wrapped = wrap(&[1, 2, 3], 0);
        wrapped[0] = b'B';
        assert!(matches!(
            unwrap(&wrapped),
            Err(CodecError::MalformedContainer(_))
        ));
    }

    #[test]
    fn length_mismatch_test() {
        let mut wrapped = wrap(&[1, 2, 3], 0);
        wrapped.push(4);
        assert!(matches!(
            unwrap(&wrapped),
            Err(CodecError::MalformedContainer(_))
        ));
        assert!(matches!(
            unwrap(&wrapped[..10]),
            Err(CodecError::MalformedContainer(_))
        ));
    }
}
