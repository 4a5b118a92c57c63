use log::{info, warn};

use super::container;
use super::operation::Operation;
use crate::bwt_algorithms::bwt_sort::bwt_decode_packed;
use crate::dictionary::lzw::lzw_decode;
use crate::error::{CodecError, Result};
use crate::huffman_coding::adaptive::adaptive_decode;
use crate::huffman_coding::huffman::huf_decode;
use crate::tools::crc::crc32;
use crate::tools::mtf::mtf_decode;
use crate::tools::options::CodecOpts;

/// Output of a decompression. A checksum mismatch does not stop decoding; it is reported
/// in `warning` next to the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    pub data: Vec<u8>,
    pub warning: Option<CodecError>,
}

impl Decompressed {
    /// Returns the data, or the warning as an error if there was one.
    pub fn into_verified(self) -> Result<Vec<u8>> {
        match self.warning {
            Some(warning) => Err(warning),
            None => Ok(self.data),
        }
    }
}

/// Decompress data produced by compress() with the same operation.
pub fn decompress(opts: &CodecOpts, data: &[u8]) -> Result<Decompressed> {
    info!("Decompressing {} bytes using {}", data.len(), opts.operation);

    let (payload, stored_crc) = if opts.operation.uses_container() {
        let container = container::unwrap(data)?;
        (container.payload, Some(container.crc))
    } else {
        (data, None)
    };

    let decoded = match opts.operation {
        Operation::Lzw => lzw_decode(payload)?,
        Operation::Bwt => bwt_decode_packed(payload)?,
        Operation::BwtLzw => bwt_decode_packed(&lzw_decode(payload)?)?,
        Operation::BwtMtfLzw => bwt_decode_packed(&mtf_decode(&lzw_decode(payload)?))?,
        Operation::BwtMtfHuffman => bwt_decode_packed(&mtf_decode(&huf_decode(payload)?))?,
        Operation::BwtMtfAdaptive => bwt_decode_packed(&mtf_decode(&adaptive_decode(payload)?))?,
        Operation::AdaptiveHuffman => adaptive_decode(payload)?,
    };
    let result = match stored_crc {
        Some(stored) => verified(decoded, stored),
        None => plain(decoded),
    };

    info!("Decompressed to {} bytes", result.data.len());
    Ok(result)
}

fn plain(data: Vec<u8>) -> Decompressed {
    Decompressed {
        data,
        warning: None,
    }
}

/// Compare the stored crc with the crc of the fully decoded data.
fn verified(data: Vec<u8>, stored: u32) -> Decompressed {
    let computed = crc32(&data);
    let warning = if computed != stored {
        warn!(
            "Checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored, computed
        );
        Some(CodecError::ChecksumMismatch { stored, computed })
    } else {
        None
    };
    Decompressed { data, warning }
}
