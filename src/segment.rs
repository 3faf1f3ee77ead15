//! Wheel-packed sieve segment.
//!
//! A [`Segment`] covers `[offset, offset + blocks · SIZE)` with one bit per
//! wheel-representable number. Bit layout is block-major, index-minor:
//!
//! ```text
//! position = block · BITS + WHEEL.index_of(n % SIZE)
//! ```
//!
//! A set bit means "composite" (or 1). Unset bits that survive sieving are
//! primes. Because residues ascend within a block and blocks ascend with
//! position, scanning positions upward visits values in increasing order.

use std::ops::ControlFlow;

use crate::math::minus_mod;
use crate::wheel::{BITS, FIRST_SIEVING_MULTIPLIER, SIZE, WHEEL, WORDS_PER_BLOCK};

/// Bit-packed primality state for a contiguous, wheel-aligned range.
#[derive(Debug)]
pub struct Segment {
    offset: u64,
    blocks: usize,
    words: Vec<u64>,
}

impl Segment {
    /// Allocates a segment of `blocks` wheel periods starting at `offset`.
    ///
    /// `offset` must be a multiple of [`SIZE`]. When it is zero the bit for
    /// the number 1 is marked up front.
    pub fn new(offset: u64, blocks: usize) -> Self {
        debug_assert_eq!(offset % SIZE, 0, "segment offset must be wheel-aligned");
        let mut words = vec![0u64; blocks * WORDS_PER_BLOCK];
        if offset == 0 && blocks > 0 {
            // 1 sits at packed index 0
            words[0] |= 1;
        }
        Self { offset, blocks, words }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// One past the last number covered.
    pub fn end(&self) -> u64 {
        self.offset + self.span()
    }

    /// Heap bytes held by the bit storage.
    pub fn storage_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }

    fn span(&self) -> u64 {
        self.blocks as u64 * SIZE
    }

    // ─── Marking ───────────────────────────────────────────────────────────

    /// Marks every multiple of `p` in the segment, starting from the first
    /// multiple at or after `offset`.
    pub fn sieve(&mut self, p: u64) {
        let first = self.offset + minus_mod(self.offset, p);
        self.sieve_from(p, first);
    }

    /// Marks `start, start + p, start + 2p, ...` up to the end of the segment.
    ///
    /// A `start` below the segment is advanced to the first value at or after
    /// `offset` in the same residue class mod `p`. Values without a wheel bit
    /// are stepped over.
    pub fn sieve_from(&mut self, p: u64, start: u64) {
        debug_assert!(p > 1, "sieving step must exceed 1");
        let span = self.span();
        let mut local = match start.checked_sub(self.offset) {
            Some(local) => local,
            None => minus_mod(self.offset - start, p),
        };
        while local < span {
            let block = (local / SIZE) as usize;
            if let Some(index) = WHEEL.index_of((local % SIZE) as usize) {
                let bit = block * BITS + index;
                self.words[bit >> 6] |= 1u64 << (bit & 63);
            }
            local += p;
        }
    }

    /// Discovers the primes of a segment that starts at zero by sieving it
    /// with its own survivors.
    ///
    /// Survivors are visited in increasing order. Each one is handed to `f`
    /// and then strikes its multiples from `17p` onward, so every smaller
    /// prime has already done its marking by the time a position is read.
    /// Stops at the first `Break` from `f`.
    pub fn sieve_self<B, F>(&mut self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(u64) -> ControlFlow<B>,
    {
        debug_assert_eq!(self.offset, 0, "self-sieving needs every smaller prime in range");
        let mut cursor = 0;
        while let Some(position) = self.next_survivor(cursor) {
            let p = self.value_at(position);
            f(p)?;
            self.sieve_from(p, FIRST_SIEVING_MULTIPLIER * p);
            cursor = position + 1;
        }
        ControlFlow::Continue(())
    }

    // ─── Enumeration ───────────────────────────────────────────────────────

    /// Whether `value` is known not to be a candidate prime: marked, or
    /// without a wheel bit. `value` must lie in `[offset, end)`.
    pub fn is_marked(&self, value: u64) -> bool {
        debug_assert!(
            (self.offset..self.end()).contains(&value),
            "{} outside segment [{}, {})",
            value,
            self.offset,
            self.end()
        );
        let local = value - self.offset;
        match WHEEL.index_of((local % SIZE) as usize) {
            Some(index) => {
                let bit = (local / SIZE) as usize * BITS + index;
                self.words[bit >> 6] & (1u64 << (bit & 63)) != 0
            }
            None => true,
        }
    }

    /// Number represented by bit `position`.
    #[inline]
    pub fn value_at(&self, position: usize) -> u64 {
        let block = (position / BITS) as u64;
        self.offset + block * SIZE + WHEEL.residue_at(position % BITS)
    }

    /// Position of the first unmarked bit at or after `from`.
    ///
    /// Only reads storage, so callers may sieve between calls; this is how the
    /// bootstrap pass discovers primes and applies them to the same segment.
    pub fn next_survivor(&self, from: usize) -> Option<usize> {
        let mut wi = from >> 6;
        if wi >= self.words.len() {
            return None;
        }
        let mut candidates = !self.words[wi] & (!0u64 << (from & 63));
        loop {
            if candidates != 0 {
                return Some((wi << 6) + candidates.trailing_zeros() as usize);
            }
            wi += 1;
            if wi == self.words.len() {
                return None;
            }
            candidates = !self.words[wi];
        }
    }

    /// Iterates surviving values in increasing order.
    pub fn survivors(&self) -> Survivors<'_> {
        Survivors { segment: self, cursor: 0 }
    }

    /// Calls `f` for every surviving value in increasing order, stopping at the
    /// first `Break`.
    pub fn for_each_survivor<B, F>(&self, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(u64) -> ControlFlow<B>,
    {
        for (wi, &word) in self.words.iter().enumerate() {
            // Kernighan: walk only the unmarked bits
            let mut w = !word;
            while w != 0 {
                let tz = w.trailing_zeros() as usize;
                f(self.value_at((wi << 6) + tz))?;
                w &= w - 1;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Iterator over a segment's surviving values. See [`Segment::survivors`].
pub struct Survivors<'a> {
    segment: &'a Segment,
    cursor: usize,
}

impl Iterator for Survivors<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let position = self.segment.next_survivor(self.cursor)?;
        self.cursor = position + 1;
        Some(self.segment.value_at(position))
    }
}
