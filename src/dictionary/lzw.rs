use log::{debug, error, info};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{CodecError, Result};

/// Width of every code on the stream.
pub const MAX_BITS: u8 = 14;
/// Shift applied to the next byte when hashing a (prefix, byte) pair.
const HASH_BITS: usize = MAX_BITS as usize - 8;
/// End of data marker.
pub const MAX_VALUE: u16 = (1 << MAX_BITS) - 1;
/// Largest code that can be assigned to a dictionary entry.
pub const MAX_CODE: u16 = MAX_VALUE - 1;
/// Slots in the hash table. Prime, and larger than the number of codes.
pub const TABLE_SIZE: usize = 18041;
/// First code available for learned strings.
const FIRST_CODE: u16 = 256;

/// Open addressed string table used while compressing. Each slot holds the code assigned to
/// a (prefix code, next byte) pair.
struct StringTable {
    codes: Vec<Option<u16>>,
    prefixes: Vec<u16>,
    chars: Vec<u8>,
    next_code: u16,
}

impl StringTable {
    fn new() -> Self {
        Self {
            codes: vec![None; TABLE_SIZE],
            prefixes: vec![0; TABLE_SIZE],
            chars: vec![0; TABLE_SIZE],
            next_code: FIRST_CODE,
        }
    }

    /// Returns the slot holding (prefix, byte), or the empty slot where it belongs.
    fn find_match(&self, prefix: u16, byte: u8) -> usize {
        let mut index = ((byte as usize) << HASH_BITS) ^ prefix as usize;
        let offset = if index == 0 { 1 } else { TABLE_SIZE - index };
        loop {
            match self.codes[index] {
                None => return index,
                Some(_) if self.prefixes[index] == prefix && self.chars[index] == byte => {
                    return index
                }
                _ => {}
            }
            index = if index >= offset {
                index - offset
            } else {
                index + TABLE_SIZE - offset
            };
        }
    }

    fn is_full(&self) -> bool {
        self.next_code > MAX_CODE
    }

    /// Assign the next code to (prefix, byte) at `index`. Returns false once the codes run out.
    fn insert(&mut self, index: usize, prefix: u16, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.codes[index] = Some(self.next_code);
        self.prefixes[index] = prefix;
        self.chars[index] = byte;
        self.next_code += 1;
        true
    }
}

/// LZW compress. The stream ends with the end marker and a zero flush code; bits of the flush
/// code that do not complete a byte are dropped.
pub fn lzw_encode(data: &[u8]) -> Vec<u8> {
    encode_with(&mut StringTable::new(), data)
}

fn encode_with(table: &mut StringTable, data: &[u8]) -> Vec<u8> {
    let mut bw = BitWriter::new(data.len() + 8);
    let mut full = table.is_full();

    if let Some((&first, rest)) = data.split_first() {
        let mut string = first as u16;
        for &byte in rest {
            let index = table.find_match(string, byte);
            if let Some(code) = table.codes[index] {
                string = code;
                continue;
            }
            if !table.insert(index, string, byte) && !full {
                debug!("LZW dictionary is full after {} codes", MAX_CODE);
                full = true;
            }
            bw.out_bits(MAX_BITS, string as u32);
            string = byte as u16;
        }
        bw.out_bits(MAX_BITS, string as u32);
    }
    bw.out_bits(MAX_BITS, MAX_VALUE as u32);
    bw.out_bits(MAX_BITS, 0);

    let out = bw.into_whole_bytes();
    info!("LZW encoded {} bytes into {} bytes", data.len(), out.len());
    out
}

/// Reads the next code, treating a stream that runs out before the end marker as malformed.
fn read_code<R: std::io::Read>(br: &mut BitReader<R>) -> Result<u16> {
    br.bint(MAX_BITS as usize)
        .map(|code| code as u16)
        .ok_or_else(|| {
            error!("LZW stream ends without an end marker at {}", br.loc());
            CodecError::malformed("LZW stream ends without an end marker")
        })
}

/// LZW decompress data written by lzw_encode.
pub fn lzw_decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut br = BitReader::new(data);
    let mut prefixes = vec![0_u16; TABLE_SIZE];
    let mut chars = vec![0_u8; TABLE_SIZE];
    let mut next_code = FIRST_CODE;
    let mut stack: Vec<u8> = Vec::with_capacity(256);
    let mut out = Vec::with_capacity(data.len() * 2);

    // The first code is always a plain byte (or the end marker for empty data)
    let mut old_code = read_code(&mut br)?;
    if old_code == MAX_VALUE {
        return Ok(out);
    }
    if old_code >= FIRST_CODE {
        return Err(CodecError::malformed(format!(
            "LZW stream starts with code {}",
            old_code
        )));
    }
    let mut last_char = old_code as u8;
    out.push(last_char);

    loop {
        let new_code = read_code(&mut br)?;
        if new_code == MAX_VALUE {
            break;
        }

        // A code one past the table is the string just decoded plus its own first byte
        let mut current = if new_code >= next_code {
            if new_code > next_code {
                error!("LZW code {} is past the next free code {}", new_code, next_code);
                return Err(CodecError::malformed(format!(
                    "LZW code {} is past the next free code {}",
                    new_code, next_code
                )));
            }
            stack.push(last_char);
            old_code
        } else {
            new_code
        };

        // Walk back through the prefixes, collecting the string in reverse
        while current >= FIRST_CODE {
            stack.push(chars[current as usize]);
            current = prefixes[current as usize];
        }
        stack.push(current as u8);
        last_char = current as u8;
        out.extend(stack.drain(..).rev());

        if next_code <= MAX_CODE {
            prefixes[next_code as usize] = old_code;
            chars[next_code as usize] = last_char;
            next_code += 1;
        }
        old_code = new_code;
    }

    info!("LZW decoded {} bytes into {} bytes", data.len(), out.len());
    Ok(out)
}
