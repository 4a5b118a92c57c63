/// Returns a 256-entry frequency count of the input data.
pub fn freqs(data: &[u8]) -> Vec<u32> {
    let mut freqs = vec![0_u32; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

#[cfg(test)]
mod test {
    use super::freqs;

    #[test]
    fn freqs_test() {
        let f = freqs(b"abracadabra");
        assert_eq!(f[b'a' as usize], 5);
        assert_eq!(f[b'b' as usize], 2);
        assert_eq!(f[b'r' as usize], 2);
        assert_eq!(f[b'c' as usize], 1);
        assert_eq!(f.iter().sum::<u32>(), 11);
    }
}
