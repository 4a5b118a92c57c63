//! CRC-32 (IEEE, reflected polynomial 0xEDB88320) used to verify adaptive Huffman containers.

/// Byte-at-a-time lookup table, built on first use and shared by every caller.
static CRC_TABLE: std::sync::LazyLock<[u32; 256]> = std::sync::LazyLock::new(|| {
    let mut table = [0_u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = i as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
        *entry = crc;
    }
    table
});

/// Continues a CRC over more data. Start a fresh checksum with `crc = 0`; feeding the
/// result of one call into the next gives the same value as a single call over the
/// concatenated data.
pub fn do_crc(crc: u32, data: &[u8]) -> u32 {
    let table = &*CRC_TABLE;
    let crc = data.iter().fold(!crc, |crc, &byte| {
        (crc >> 8) ^ table[((crc ^ byte as u32) & 0xff) as usize]
    });
    !crc
}

/// Returns the CRC-32 of a complete buffer.
pub fn crc32(data: &[u8]) -> u32 {
    do_crc(0, data)
}

#[cfg(test)]
mod test {
    use super::{crc32, do_crc};

    #[test]
    fn check_value_test() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty_test() {
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn incremental_test() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let (a, b) = data.split_at(17);
        assert_eq!(do_crc(do_crc(0, a), b), crc32(data));
        assert_eq!(crc32(data), 0x414F_A339);
    }
}
