use std::{fmt::Display, fmt::Formatter};

use crate::compression::operation::Operation;

/// Compress or Decompress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Suffix sorting algorithm used by the Burrows-Wheeler transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    /// Simple for small blocks, SA-IS for everything else
    Auto,
    /// Direct comparison sort of all suffixes
    Simple,
    /// Induced sorting (SA-IS), linear time
    Sais,
}

impl Display for SortAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOpts {
    /// Pipeline to run
    pub operation: Operation,
    /// Compress/Decompress
    pub op_mode: Mode,
    /// Suffix sorting algorithm used by the BWT stage
    pub algorithm: SortAlgorithm,
}

impl CodecOpts {
    pub fn new() -> Self {
        Self {
            operation: Operation::BwtMtfAdaptive,
            op_mode: Mode::Compress,
            algorithm: SortAlgorithm::Auto,
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_mode(mut self, op_mode: Mode) -> Self {
        self.op_mode = op_mode;
        self
    }

    pub fn with_algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl Default for CodecOpts {
    fn default() -> Self {
        Self::new()
    }
}
