/// Encode data using the Move To Front transform. Every call starts from the identity
/// table 0..=255.
pub fn mtf_encode(data: &[u8]) -> Vec<u8> {
    let mut index: [u8; 256] = std::array::from_fn(|i| i as u8);
    data.iter()
        .map(|&byte| {
            // The byte is always present, so the search cannot fail
            let idx = index.iter().position(|&c| c == byte).unwrap_or_default();
            // Shift everything in front of the symbol back one slot and put it at the front
            index.copy_within(0..idx, 1);
            index[0] = byte;
            idx as u8
        })
        .collect()
}

/// Decode Move To Front indices back to the symbols they stand for.
pub fn mtf_decode(codes: &[u8]) -> Vec<u8> {
    let mut index: [u8; 256] = std::array::from_fn(|i| i as u8);
    codes
        .iter()
        .map(|&code| {
            let idx = code as usize;
            let byte = index[idx];
            index.copy_within(0..idx, 1);
            index[0] = byte;
            byte
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{mtf_decode, mtf_encode};

    #[test]
    fn mtf_encode_test() {
        assert_eq!(mtf_encode(b"aaabbb"), vec![97, 0, 0, 98, 0, 0]);
        assert_eq!(mtf_encode(b"bananaaa"), vec![98, 98, 110, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn mtf_decode_test() {
        assert_eq!(mtf_decode(&[98, 98, 110, 1, 1, 1, 0, 0]), b"bananaaa".to_vec());
    }

    #[test]
    fn mtf_round_trip_test() {
        let data: Vec<u8> = (0..=255_u8).rev().chain(0..=255).collect();
        assert_eq!(mtf_decode(&mtf_encode(&data)), data);
        assert!(mtf_encode(&[]).is_empty());
    }
}
