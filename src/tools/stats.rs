use std::fmt::{Display, Formatter};

/// Input and output sizes of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub input_len: usize,
    pub output_len: usize,
}

impl CompressionStats {
    pub fn new(input_len: usize, output_len: usize) -> Self {
        Self {
            input_len,
            output_len,
        }
    }

    /// Bytes saved. Negative when the output grew.
    pub fn difference(&self) -> i64 {
        self.input_len as i64 - self.output_len as i64
    }

    /// Percentage of the input saved. Zero for empty input.
    pub fn rate(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        self.difference() as f64 * 100.0 / self.input_len as f64
    }
}

impl Display for CompressionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.2}% saved)",
            self.input_len,
            self.output_len,
            self.rate()
        )
    }
}

#[cfg(test)]
mod test {
    use super::CompressionStats;

    #[test]
    fn rate_test() {
        let stats = CompressionStats::new(200, 50);
        assert_eq!(stats.difference(), 150);
        assert_eq!(stats.rate(), 75.0);
        assert_eq!(stats.to_string(), "200 -> 50 bytes (75.00% saved)");
    }

    #[test]
    fn growth_test() {
        let stats = CompressionStats::new(4, 8);
        assert_eq!(stats.difference(), -4);
        assert_eq!(stats.rate(), -100.0);
        assert_eq!(CompressionStats::new(0, 0).rate(), 0.0);
    }
}
