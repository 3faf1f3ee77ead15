//! Bootstrap-then-sweep driver.
//!
//! Strategy:
//!   1. Emit the wheel primes 2..=13, which have no bit in any segment.
//!   2. Bootstrap: one segment over `[0, ⌈√N⌉)` rounded up to whole wheel
//!      blocks. Walk its survivors in order; each one is a prime, is emitted,
//!      and immediately sieves the rest of the same segment from `17p`.
//!   3. Sweep: cover `[bootstrap_end, N]` with fresh chunk segments, sieve each
//!      chunk with every bootstrap survivor, and emit what is left.
//!
//! Memory is one bootstrap segment plus one chunk, never a bitmap of size N.
//! The run stops the moment a value above N would be emitted; that stop is a
//! `ControlFlow::Break` carried back through enumeration, not a process exit.

use std::num::NonZeroUsize;
use std::ops::ControlFlow;

use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::math::ceil_sqrt;
use crate::segment::Segment;
use crate::sink::PrimeSink;
use crate::wheel::{SIZE, WHEEL_PRIMES};

/// Tuning for a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepConfig {
    /// Wheel blocks per sweep chunk. `None` reuses the bootstrap length.
    pub chunk_blocks: Option<NonZeroUsize>,
}

/// What a finished sweep did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Primes handed to the sink.
    pub emitted: u64,
    pub largest: Option<u64>,
    pub bootstrap_blocks: usize,
    pub chunk_blocks: usize,
    /// Chunk segments built after the bootstrap.
    pub chunks: u64,
    pub bootstrap_bytes: usize,
    /// Largest storage held by any single chunk.
    pub peak_chunk_bytes: usize,
}

/// Why the sweep stopped early.
enum Halt {
    BoundExceeded,
    Sink(std::io::Error),
}

struct Emitter<'a, S: ?Sized> {
    bound: u64,
    sink: &'a mut S,
    stats: SweepStats,
}

impl<S: PrimeSink + ?Sized> Emitter<'_, S> {
    #[inline]
    fn emit(&mut self, prime: u64) -> ControlFlow<Halt> {
        if prime > self.bound {
            return ControlFlow::Break(Halt::BoundExceeded);
        }
        if let Err(err) = self.sink.emit(prime) {
            return ControlFlow::Break(Halt::Sink(err));
        }
        self.stats.emitted += 1;
        self.stats.largest = Some(prime);
        ControlFlow::Continue(())
    }
}

/// Streams every prime `≤ bound` into `sink` in increasing order.
///
/// A bound below 2 produces no output. The sink is finished (flushed) before
/// returning successfully.
pub fn stream_primes<S>(bound: i64, config: &SweepConfig, sink: &mut S) -> Result<SweepStats>
where
    S: PrimeSink + ?Sized,
{
    if bound < 2 {
        debug!(bound, "bound below 2, nothing to emit");
        sink.finish()?;
        return Ok(SweepStats::default());
    }
    let bound = bound as u64;
    let bootstrap_blocks = bootstrap_blocks(bound)?;
    let chunk_blocks = config.chunk_blocks.map_or(bootstrap_blocks, NonZeroUsize::get);

    let mut emitter = Emitter {
        bound,
        sink: &mut *sink,
        stats: SweepStats { bootstrap_blocks, chunk_blocks, ..SweepStats::default() },
    };
    let flow = run(&mut emitter);
    let stats = emitter.stats;
    if let ControlFlow::Break(Halt::Sink(err)) = flow {
        return Err(Error::Io(err));
    }
    sink.finish()?;

    info!(
        bound,
        emitted = stats.emitted,
        largest = ?stats.largest,
        chunks = stats.chunks,
        bootstrap_bytes = stats.bootstrap_bytes,
        peak_chunk_bytes = stats.peak_chunk_bytes,
        "prime stream complete"
    );
    Ok(stats)
}

fn run<S: PrimeSink + ?Sized>(emitter: &mut Emitter<'_, S>) -> ControlFlow<Halt> {
    for p in WHEEL_PRIMES {
        emitter.emit(p)?;
    }

    let mut bootstrap = Segment::new(0, emitter.stats.bootstrap_blocks);
    emitter.stats.bootstrap_bytes = bootstrap.storage_bytes();
    debug!(
        blocks = bootstrap.blocks(),
        end = bootstrap.end(),
        "sieving bootstrap segment"
    );

    bootstrap.sieve_self(|p| emitter.emit(p))?;

    let chunk_blocks = emitter.stats.chunk_blocks;
    let chunk_span = chunk_blocks as u64 * SIZE;
    let mut offset = bootstrap.end();
    debug!(offset, chunk_blocks, "sweeping chunks");

    // TODO: chunks only read the finished bootstrap, so they could be sieved
    // on a worker pool and drained in offset order.
    while offset <= emitter.bound {
        let mut chunk = Segment::new(offset, chunk_blocks);
        for p in bootstrap.survivors() {
            chunk.sieve(p);
        }
        emitter.stats.chunks += 1;
        emitter.stats.peak_chunk_bytes = emitter.stats.peak_chunk_bytes.max(chunk.storage_bytes());
        trace!(offset, end = chunk.end(), "chunk sieved");

        chunk.for_each_survivor(|p| emitter.emit(p))?;
        offset += chunk_span;
    }
    ControlFlow::Continue(())
}

/// Wheel blocks needed so the bootstrap segment reaches `⌈√bound⌉`.
///
/// Guarantees `(blocks · SIZE)² ≥ bound`: every composite up to `bound` has a
/// prime factor inside the bootstrap segment.
pub fn bootstrap_blocks(bound: u64) -> Result<usize> {
    let blocks = ceil_sqrt(bound).div_ceil(SIZE).max(1);
    let end = blocks * SIZE;
    if u128::from(end) * u128::from(end) < u128::from(bound) {
        return Err(Error::BootstrapTooShort { bound, end });
    }
    Ok(blocks as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primes_up_to(bound: i64) -> Vec<u64> {
        let mut out = Vec::new();
        stream_primes(bound, &SweepConfig::default(), &mut out).unwrap();
        out
    }

    fn with_chunk_blocks(blocks: usize) -> SweepConfig {
        SweepConfig { chunk_blocks: NonZeroUsize::new(blocks) }
    }

    fn oracle(bound: u64) -> Vec<u64> {
        primal::Primes::all()
            .take_while(|&p| p as u64 <= bound)
            .map(|p| p as u64)
            .collect()
    }

    #[test]
    fn test_small_primes() {
        assert_eq!(primes_up_to(10), vec![2, 3, 5, 7]);
        assert_eq!(primes_up_to(20), vec![2, 3, 5, 7, 11, 13, 17, 19]);
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(primes_up_to(i64::MIN), Vec::<u64>::new());
        assert_eq!(primes_up_to(-7), Vec::<u64>::new());
        assert_eq!(primes_up_to(0), Vec::<u64>::new());
        assert_eq!(primes_up_to(1), Vec::<u64>::new());
        assert_eq!(primes_up_to(2), vec![2]);
        assert_eq!(primes_up_to(3), vec![2, 3]);
    }

    #[test]
    fn test_wheel_prime_boundary() {
        for bound in 13..=16 {
            assert_eq!(primes_up_to(bound), vec![2, 3, 5, 7, 11, 13], "bound={}", bound);
        }
        assert_eq!(primes_up_to(17), vec![2, 3, 5, 7, 11, 13, 17]);
    }

    #[test]
    fn test_known_counts() {
        assert_eq!(primes_up_to(100).len(), 25);
        assert_eq!(primes_up_to(1_000).len(), 168);
        assert_eq!(primes_up_to(10_000).len(), 1_229);
        assert_eq!(primes_up_to(100_000).len(), 9_592);
        assert_eq!(primes_up_to(1_000_000).len(), 78_498);
    }

    #[test]
    fn test_boundary_primes() {
        assert_eq!(*primes_up_to(29).last().unwrap(), 29);
        assert_eq!(*primes_up_to(500_000).last().unwrap(), 499_979);
    }

    #[test]
    fn test_matches_oracle_around_segment_edges() {
        let size = SIZE as i64;
        for bound in [size - 1, size, size + 1, 2 * size, 2 * size + 1, 5 * size + 7] {
            assert_eq!(primes_up_to(bound), oracle(bound as u64), "bound={}", bound);
        }
    }

    #[test]
    fn test_chunk_length_does_not_change_output() {
        let expected = oracle(2_000_000);
        for blocks in [1, 3, 7, 100] {
            let mut out = Vec::new();
            stream_primes(2_000_000, &with_chunk_blocks(blocks), &mut out).unwrap();
            assert_eq!(out, expected, "chunk_blocks={}", blocks);
        }
    }

    #[test]
    fn test_stats() {
        let mut out = Vec::new();
        let stats = stream_primes(1_000_000, &SweepConfig::default(), &mut out).unwrap();
        assert_eq!(stats.emitted, 78_498);
        assert_eq!(stats.largest, Some(999_983));
        assert_eq!(stats.bootstrap_blocks, 1);
        assert_eq!(stats.chunk_blocks, 1);
        // chunks start at 30030, 60060, ..., 990990
        assert_eq!(stats.chunks, 33);
        assert_eq!(stats.bootstrap_bytes, 720);
        assert_eq!(stats.peak_chunk_bytes, 720);

        let stats = stream_primes(20_000, &SweepConfig::default(), &mut Vec::new()).unwrap();
        assert_eq!(stats.chunks, 0);
    }

    #[test]
    fn test_memory_stays_at_chunk_length() {
        let config = with_chunk_blocks(2);
        let small = stream_primes(200_000, &config, &mut Vec::new()).unwrap();
        let large = stream_primes(3_000_000, &config, &mut Vec::new()).unwrap();
        assert!(large.chunks > small.chunks);
        assert_eq!(small.peak_chunk_bytes, 1_440);
        assert_eq!(large.peak_chunk_bytes, 1_440);
        assert_eq!(small.bootstrap_bytes, large.bootstrap_bytes);
    }

    #[test]
    fn test_bootstrap_blocks_cover_square_root() {
        assert_eq!(bootstrap_blocks(2).unwrap(), 1);
        assert_eq!(bootstrap_blocks(SIZE * SIZE).unwrap(), 1);
        assert_eq!(bootstrap_blocks(SIZE * SIZE + 1).unwrap(), 2);
        assert_eq!(bootstrap_blocks(982_451_653).unwrap(), 2);
        for bound in [3, 1_000, 901_800_901, 1 << 40, i64::MAX as u64] {
            let end = bootstrap_blocks(bound).unwrap() as u128 * SIZE as u128;
            assert!(end * end >= bound as u128, "bound={}", bound);
            assert!((end - SIZE as u128) * (end - SIZE as u128) < bound as u128 || end == SIZE as u128);
        }
    }

    struct FailingSink {
        accepted: usize,
    }

    impl PrimeSink for FailingSink {
        fn emit(&mut self, _prime: u64) -> std::io::Result<()> {
            if self.accepted == 10 {
                return Err(std::io::ErrorKind::BrokenPipe.into());
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_stops_sweep() {
        let mut sink = FailingSink { accepted: 0 };
        let err = stream_primes(1_000_000, &SweepConfig::default(), &mut sink).unwrap_err();
        assert!(err.is_broken_pipe());
        assert_eq!(sink.accepted, 10);
    }
}
