//! Segmented, wheel-factorized Sieve of Eratosthenes that streams every prime
//! up to a bound as 64-bit little-endian integers.
//!
//! - [`wheel`]: the mod-30030 residue table
//! - [`segment`]: bit-packed sieve window over whole wheel blocks
//! - [`sweep`]: bootstrap self-sieve followed by the chunked sweep
//! - [`sink`]: byte encoding of the output stream

pub mod cli;
pub mod error;
mod math;
pub mod segment;
pub mod sink;
pub mod sweep;
pub mod wheel;

pub use error::{Error, Result};
pub use sink::{LittleEndianSink, PrimeSink, PRIME_WIDTH};
pub use sweep::{stream_primes, SweepConfig, SweepStats};
