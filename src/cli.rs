//! Command-line surface.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::sweep::SweepConfig;

#[derive(Debug, Parser)]
#[command(name = "primer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Emits primes as 64-bit little-endian binary numbers to stdout.",
    long_about = None
)]
pub struct Cli {
    /// Inclusive upper bound for the emitted primes
    #[arg(value_name = "BOUND", allow_negative_numbers = true)]
    pub bound: String,

    /// Write the stream to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Wheel blocks (30030 numbers each) per sweep chunk [default: bootstrap length]
    #[arg(long, value_name = "BLOCKS")]
    pub chunk_blocks: Option<usize>,
}

impl Cli {
    pub fn bound(&self) -> Result<i64> {
        parse_bound(&self.bound)
    }

    pub fn sweep_config(&self) -> Result<SweepConfig> {
        let chunk_blocks = match self.chunk_blocks {
            Some(blocks) => Some(NonZeroUsize::new(blocks).ok_or(Error::InvalidChunkLength)?),
            None => None,
        };
        Ok(SweepConfig { chunk_blocks })
    }
}

/// Parses a base-10 `i64` bound.
pub fn parse_bound(input: &str) -> Result<i64> {
    input.parse::<i64>().map_err(|source| Error::InvalidBound {
        input: input.to_owned(),
        source,
    })
}
