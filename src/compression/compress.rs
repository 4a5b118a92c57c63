use log::{debug, info};

use super::container;
use super::operation::Operation;
use crate::bwt_algorithms::bwt_sort::bwt_encode_packed;
use crate::dictionary::lzw::lzw_encode;
use crate::error::Result;
use crate::huffman_coding::adaptive::adaptive_encode;
use crate::huffman_coding::huffman::huf_encode;
use crate::tools::crc::crc32;
use crate::tools::mtf::mtf_encode;
use crate::tools::options::CodecOpts;

/*
    Every operation materialises each intermediate stage in memory and hands it to the next.
    The BWT stages always work on the packed form (block plus 4-byte key), so the later stages
    never need to know the key is there. Operations that carry a container get it wrapped
    around the final stage, with the crc of the original input.
*/

/// Compress data with the operation named in opts.
pub fn compress(opts: &CodecOpts, data: &[u8]) -> Result<Vec<u8>> {
    info!("Compressing {} bytes using {}", data.len(), opts.operation);
    let algorithm = opts.algorithm;

    let encoded = match opts.operation {
        Operation::Lzw => lzw_encode(data),
        Operation::Bwt => bwt_encode_packed(data, algorithm)?,
        Operation::BwtLzw => lzw_encode(&bwt_encode_packed(data, algorithm)?),
        Operation::BwtMtfLzw => lzw_encode(&mtf_encode(&bwt_encode_packed(data, algorithm)?)),
        Operation::BwtMtfHuffman => huf_encode(&mtf_encode(&bwt_encode_packed(data, algorithm)?))?,
        Operation::BwtMtfAdaptive => {
            adaptive_encode(&mtf_encode(&bwt_encode_packed(data, algorithm)?))
        }
        Operation::AdaptiveHuffman => adaptive_encode(data),
    };
    let out = if opts.operation.uses_container() {
        container::wrap(&encoded, checksum(data))
    } else {
        encoded
    };

    info!("Compressed to {} bytes", out.len());
    Ok(out)
}

fn checksum(data: &[u8]) -> u32 {
    let crc = crc32(data);
    debug!("Input crc is {:#010x}", crc);
    crc
}
