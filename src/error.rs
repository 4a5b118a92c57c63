//! Error type shared by every codec stage.
use thiserror::Error;

/// Errors reported by the codecs and the pipeline orchestrator.
///
/// A full LZW dictionary is not an error: the coder simply stops adding entries.
/// `ChecksumMismatch` is normally carried as a warning next to decoded data rather
/// than returned as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("huffman tree corruption: {0}")]
    TreeCorruption(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("input of {0} bytes is too large for a single block")]
    InputTooLarge(usize),
}

impl CodecError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        CodecError::MalformedContainer(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        CodecError::TreeCorruption(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        CodecError::UnsupportedOperation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod test {
    use super::CodecError;

    #[test]
    fn display_test() {
        let e = CodecError::ChecksumMismatch {
            stored: 0xCBF43926,
            computed: 0,
        };
        assert_eq!(
            e.to_string(),
            "checksum mismatch: stored 0xcbf43926, computed 0x00000000"
        );
        assert_eq!(
            CodecError::malformed("bad magic").to_string(),
            "malformed container: bad magic"
        );
    }
}
