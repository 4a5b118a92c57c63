use log::error;

/// Creates a bitstream for output.
#[derive(Debug)]
pub struct BitWriter {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
}

impl BitWriter {
    /// Create a new BitWriter with an output buffer of the size specified. Call flush()
    /// to push any partial byte to the buffer before taking the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        // Keep only the bits not yet written so the queue never overflows
        self.queue &= (1_u64 << self.q_bits) - 1;
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.queue = self.queue << 1 | bit as u64;
        self.q_bits += 1;
        self.write_stream();
    }

    /// Puts the `n` least significant bits of `value` on the stream, most significant first.
    pub fn out_bits(&mut self, n: u8, value: u32) {
        if n == 0 {
            return;
        }
        if n > 32 {
            error!("Asked to write {} bits. Only 32 bits fit in a single write.", n);
            return;
        }
        self.queue <<= n;
        self.queue |= (value as u64) & ((1_u64 << n) - 1);
        self.q_bits += n;
        self.write_stream();
    }

    /// Puts an 8 bit byte on the stream.
    pub fn out8(&mut self, data: u8) {
        self.out_bits(8, data as u32);
    }

    /// Puts a 32 bit word on the stream in little-endian byte order.
    pub fn out32_le(&mut self, data: u32) {
        data.to_le_bytes().iter().for_each(|&b| self.out8(b));
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits.
    pub fn flush(&mut self) {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits;
            self.q_bits = 8;
            self.write_stream();
            if self.q_bits > 0 {
                error!("Stuff left in the BitWriter queue.");
            }
        }
    }

    /// Returns the output, dropping any bits that do not complete a byte.
    pub fn into_whole_bytes(self) -> Vec<u8> {
        self.output
    }

    /// Number of bits written so far, including bits still in the queue.
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bit_len() / 8, self.bit_len() % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out_bits_test() {
        let mut bw = BitWriter::new(100);
        bw.out_bits(4, 0b0010);
        bw.out_bits(4, 0b0001);
        bw.out_bits(12, 0b0010_0000_0101);
        bw.flush();
        assert_eq!(bw.output, vec![0x21, 0x20, 0x50]);
        assert_eq!(bw.bit_len(), 24);
    }

    #[test]
    fn out_bit_and_loc_test() {
        let mut bw = BitWriter::new(100);
        for bit in [true, false, true] {
            bw.out_bit(bit);
        }
        assert_eq!("[0.3]", &bw.loc());
        bw.flush();
        assert_eq!(bw.output, vec![0b1010_0000]);
        assert_eq!("[1.0]", &bw.loc());
    }

    #[test]
    fn out8_test() {
        let mut bw = BitWriter::new(100);
        "Hello".bytes().for_each(|b| bw.out8(b));
        bw.flush();
        assert_eq!(bw.output, "Hello".as_bytes());
        assert_eq!(bw.bit_len(), 40);
    }

    #[test]
    fn out32_le_test() {
        let mut bw = BitWriter::new(100);
        bw.out32_le(0x0403_0201);
        assert_eq!(bw.output, vec![1, 2, 3, 4]);
    }

    #[test]
    fn whole_bytes_test() {
        let mut bw = BitWriter::new(100);
        bw.out_bits(14, 0x3fff);
        bw.out_bits(14, 0);
        assert_eq!(bw.into_whole_bytes(), vec![0xff, 0xfc, 0x00]);
    }
}
