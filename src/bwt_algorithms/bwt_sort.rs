use super::suffix_array::suffix_array;
use crate::error::{CodecError, Result};
use crate::tools::freq_count::freqs;
use crate::tools::options::SortAlgorithm;
use log::{debug, error, info};

/// Size of the little-endian sentinel index trailer in the packed form.
pub const KEY_BYTES: usize = 4;

/// Burrows-Wheeler-Transform on top of a sentinel-terminated suffix array.
/// This returns a u32 key (the row holding the sentinel) and a u8 vec of the BWT data, which
/// has the same length as the input.
pub fn bwt_encode(data: &[u8], algorithm: SortAlgorithm) -> Result<(u32, Vec<u8>)> {
    // The key has to fit in a u32 and the sentinel needs one more row
    if data.len() >= u32::MAX as usize {
        return Err(CodecError::InputTooLarge(data.len()));
    }

    // Shift every byte up by one so 0 is free for the sentinel
    let symbols: Vec<u32> = data
        .iter()
        .map(|&b| b as u32 + 1)
        .chain(std::iter::once(0))
        .collect();
    let sa = suffix_array(&symbols, 257, algorithm);

    // Get key and BWT output. The row whose suffix starts the data holds the sentinel.
    let mut key = 0_u32;
    let mut bwt = Vec::with_capacity(data.len());
    for (row, &idx) in sa.iter().enumerate() {
        if idx == 0 {
            key = row as u32;
        } else {
            bwt.push(data[idx as usize - 1]);
        }
    }
    info!("BWT encoded {} bytes. Key is {}.", data.len(), key);
    Ok((key, bwt))
}

/// Decode a Burrows-Wheeler-Transform using the T1/T2 rank tables.
pub fn bwt_decode(key: u32, bwt_in: &[u8]) -> Result<Vec<u8>> {
    let end = bwt_in.len();
    let key = key as usize;

    // An empty block keeps the sentinel in row 0; otherwise row 0 is always the sentinel suffix.
    if (end == 0 && key != 0) || (end > 0 && (key == 0 || key > end)) {
        error!("BWT key {} is out of range for a block of {} bytes", key, end);
        return Err(CodecError::malformed(format!(
            "BWT key {} is out of range for a block of {} bytes",
            key, end
        )));
    }

    // T2: count of symbols smaller than each byte value, counting the sentinel
    let freq = freqs(bwt_in);
    let mut t2 = [0_u32; 256];
    let mut sum = 1_u32;
    for (v, &count) in freq.iter().enumerate() {
        t2[v] = sum;
        sum += count;
    }

    // T1: occurrences of each byte earlier in the block
    let mut seen = [0_u32; 256];
    let t1: Vec<u32> = bwt_in
        .iter()
        .map(|&b| {
            let rank = seen[b as usize];
            seen[b as usize] += 1;
            rank
        })
        .collect();

    // Walk backwards from the row that starts with the sentinel
    let mut data = vec![0_u8; end];
    let mut nxt = 0_usize;
    for i in (0..end).rev() {
        let byte = bwt_in[nxt];
        data[i] = byte;
        nxt = (t1[nxt] + t2[byte as usize]) as usize;
        // Rows past the sentinel row are stored one slot lower
        if nxt >= key {
            nxt -= 1;
        }
    }
    debug!("BWT decoded {} bytes.", end);
    Ok(data)
}

/// Forward transform in packed form: BWT data followed by the 4-byte little-endian key.
pub fn bwt_encode_packed(data: &[u8], algorithm: SortAlgorithm) -> Result<Vec<u8>> {
    let (key, mut bwt) = bwt_encode(data, algorithm)?;
    bwt.extend_from_slice(&key.to_le_bytes());
    Ok(bwt)
}

/// Inverse of bwt_encode_packed.
pub fn bwt_decode_packed(packed: &[u8]) -> Result<Vec<u8>> {
    if packed.len() < KEY_BYTES {
        error!("BWT block of {} bytes is too short to hold a key", packed.len());
        return Err(CodecError::malformed(format!(
            "BWT block of {} bytes is too short to hold a key",
            packed.len()
        )));
    }
    let (bwt, trailer) = packed.split_at(packed.len() - KEY_BYTES);
    let key = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    bwt_decode(key, bwt)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn banana_encode_test() {
        let (key, bwt) = bwt_encode(b"banana", SortAlgorithm::Simple).unwrap();
        assert_eq!(key, 4);
        assert_eq!(bwt, b"annbaa".to_vec());
    }

    #[test]
    fn banana_decode_test() {
        assert_eq!(bwt_decode(4, b"annbaa").unwrap(), b"banana".to_vec());
    }

    #[test]
    fn edge_cases_test() {
        for data in [&b""[..], b"x", b"zzzzzzzzzzzzzzzz", b"ab", b"ba"] {
            let (key, bwt) = bwt_encode(data, SortAlgorithm::Auto).unwrap();
            assert_eq!(bwt.len(), data.len());
            assert_eq!(bwt_decode(key, &bwt).unwrap(), data.to_vec());
        }
    }

    #[test]
    fn sais_and_simple_agree_test() {
        let data = "If Peter Piper picked a peck of pickled peppers, where's the peck of pickled peppers Peter Piper picked?".repeat(5);
        let simple = bwt_encode(data.as_bytes(), SortAlgorithm::Simple).unwrap();
        let sais = bwt_encode(data.as_bytes(), SortAlgorithm::Sais).unwrap();
        assert_eq!(simple, sais);
        assert_eq!(bwt_decode(sais.0, &sais.1).unwrap(), data.as_bytes());
    }

    #[test]
    fn packed_test() {
        let packed = bwt_encode_packed(b"banana", SortAlgorithm::Auto).unwrap();
        assert_eq!(packed, b"annbaa\x04\x00\x00\x00".to_vec());
        assert_eq!(bwt_decode_packed(&packed).unwrap(), b"banana".to_vec());
        let empty = bwt_encode_packed(b"", SortAlgorithm::Auto).unwrap();
        assert_eq!(empty, vec![0, 0, 0, 0]);
        assert!(bwt_decode_packed(&empty).unwrap().is_empty());
    }

    #[test]
    fn bad_key_test() {
        assert!(matches!(
            bwt_decode(0, b"annbaa"),
            Err(CodecError::MalformedContainer(_))
        ));
        assert!(matches!(
            bwt_decode(7, b"annbaa"),
            Err(CodecError::MalformedContainer(_))
        ));
        assert!(matches!(
            bwt_decode(1, b""),
            Err(CodecError::MalformedContainer(_))
        ));
        assert!(matches!(
            bwt_decode_packed(&[1, 2, 3]),
            Err(CodecError::MalformedContainer(_))
        ));
    }
}
