use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the prime stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The bound argument is not a base-10 `i64`.
    #[error("invalid upper bound {input:?}: {source}")]
    InvalidBound {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// `--chunk-blocks 0`.
    #[error("chunk length must be at least one wheel block")]
    InvalidChunkLength,

    /// The bootstrap segment cannot hold every prime up to √bound.
    #[error("bootstrap segment ends at {end}, too short to sieve up to {bound}")]
    BootstrapTooShort { bound: u64, end: u64 },

    #[error("cannot create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write prime stream: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidBound { .. } | Error::InvalidChunkLength => 2,
            Error::BootstrapTooShort { .. } | Error::CreateOutput { .. } | Error::Io(_) => 1,
        }
    }

    /// The consumer closed the stream before we finished writing.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::Io(err) if err.kind() == io::ErrorKind::BrokenPipe)
    }
}
