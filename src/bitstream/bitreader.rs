//! BitReader: reads a packed, MSB-first bitstream.
//!
//! Works with any I/O source that supports the read() call, including plain byte slices.
//!
use log::error;

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    consumed: usize,
    source: R,
}

impl<R: std::io::Read> BitReader<R> {
    /// Creates a new BitReader. Reads from the source in chunks of up to 64k.
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            bit_index: 0,
            consumed: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> bool {
        // Only try to read more data when the cursor has reached the end of the buffer
        if self.cursor == self.buffer.len() {
            self.consumed += self.cursor;
            self.cursor = 0;
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = match self.source.read(&mut self.buffer) {
                Ok(size) => size,
                Err(e) => {
                    error!("Unable to read source data: {}", e);
                    0
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                self.buffer.truncate(0);
                return false;
            }
            self.buffer.truncate(size);
            self.bit_index = 0;
        }
        true
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.bit_index == 0 && !self.have_data() {
            return None;
        }
        let bit = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<usize> of the next n bits (n <= 32), or None if the source runs dry first.
    pub fn bint(&mut self, mut n: usize) -> Option<usize> {
        /*
        Read whatever is left of a partial byte first, then whole bytes, then the
        leading bits of one more byte.
        */
        let mut result = 0_usize;

        if self.bit_index > 0 && n > 0 {
            let needed = n.min(8 - self.bit_index);
            result = ((self.buffer[self.cursor] & BIT_MASK >> self.bit_index)
                >> (8 - self.bit_index - needed)) as usize;
            self.bit_index += needed;
            if self.bit_index == 8 {
                self.cursor += 1;
            }
            self.bit_index %= 8;
            n -= needed;
        }
        while n >= 8 {
            if !self.have_data() {
                return None;
            }
            result = result << 8 | (self.buffer[self.cursor]) as usize;
            self.cursor += 1;
            n -= 8;
        }
        if n > 0 {
            if !self.have_data() {
                return None;
            }
            result = result << n | (self.buffer[self.cursor] >> (8 - n)) as usize;
            self.bit_index = n;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read.
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if the source holds fewer than n bytes.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        (0..n).map(|_| self.byte()).collect()
    }

    /// Debugging function. Report current position as [bytes.bits].
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.consumed + self.cursor, self.bit_index)
    }
}
