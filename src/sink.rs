//! Output side of the stream.
//!
//! Each prime becomes exactly [`PRIME_WIDTH`] little-endian bytes with no
//! framing, so the k-th prime sits at byte offset `8 · (k - 1)` and the
//! output can be memory-mapped as a flat `[u64]` on little-endian hosts.

use std::io::{self, BufWriter, Write};

/// Bytes per emitted prime.
pub const PRIME_WIDTH: usize = std::mem::size_of::<u64>();

/// Receives primes in strictly increasing order.
pub trait PrimeSink {
    fn emit(&mut self, prime: u64) -> io::Result<()>;

    /// Called once after the last prime.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes primes as 64-bit little-endian integers.
pub struct LittleEndianSink<W: Write> {
    writer: BufWriter<W>,
    bytes_written: u64,
}

impl<W: Write> LittleEndianSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: BufWriter::new(writer), bytes_written: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes buffered bytes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

impl<W: Write> PrimeSink for LittleEndianSink<W> {
    #[inline]
    fn emit(&mut self, prime: u64) -> io::Result<()> {
        self.writer.write_all(&prime.to_le_bytes())?;
        self.bytes_written += PRIME_WIDTH as u64;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Collects primes in memory.
impl PrimeSink for Vec<u64> {
    #[inline]
    fn emit(&mut self, prime: u64) -> io::Result<()> {
        self.push(prime);
        Ok(())
    }
}
