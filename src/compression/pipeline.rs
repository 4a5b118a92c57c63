use log::info;

use super::compress::compress;
use super::decompress::decompress;
use super::operation::Operation;
use crate::error::{CodecError, Result};
use crate::tools::options::{CodecOpts, Mode};
use crate::tools::stats::CompressionStats;

/// Result of a pipeline run selected by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub data: Vec<u8>,
    pub warning: Option<CodecError>,
    pub stats: CompressionStats,
}

/// Run the operation called `name` in the given mode. Unknown names fail before any data is touched.
pub fn process(name: &str, mode: Mode, data: &[u8]) -> Result<Outcome> {
    let operation: Operation = name.parse()?;
    let opts = CodecOpts::new().with_operation(operation).with_mode(mode);
    run(&opts, data)
}

/// Run the operation and mode set in opts.
pub fn run(opts: &CodecOpts, data: &[u8]) -> Result<Outcome> {
    let (out, warning) = match opts.op_mode {
        Mode::Compress => (compress(opts, data)?, None),
        Mode::Decompress => {
            let decoded = decompress(opts, data)?;
            (decoded.data, decoded.warning)
        }
    };
    let stats = match opts.op_mode {
        Mode::Compress => CompressionStats::new(data.len(), out.len()),
        Mode::Decompress => CompressionStats::new(out.len(), data.len()),
    };
    info!("{} {}: {}", opts.op_mode, opts.operation, stats);
    Ok(Outcome {
        data: out,
        warning,
        stats,
    })
}
