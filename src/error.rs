//! Error types for FASTA reading and writing.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for `seqio` operations
pub type Result<T> = std::result::Result<T, SeqprepError>;

#[derive(Debug, Error)]
pub enum SeqprepError {
    /// Input could not be opened/read, or output could not be created/written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid FASTA
    #[error("Invalid FASTA in {} at line {line}: {msg}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },
}

impl SeqprepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeqprepError::Io { path: path.into(), source }
    }
}
