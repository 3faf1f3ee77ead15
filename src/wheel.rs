//! Mod-30030 wheel.
//!
//! Every block of `SIZE` consecutive integers is stored in `BITS` bits, one per
//! residue coprime to 2·3·5·7·11·13. Residues sharing a factor with a wheel
//! prime have no bit at all, so their multiples never cost storage or marking.
//!
//! The table is evaluated at compile time into [`WHEEL`].

// ─── Wheel geometry ────────────────────────────────────────────────────────

/// Modulus of the wheel: the product of the first six primes.
pub const SIZE: u64 = 2 * 3 * 5 * 7 * 11 * 13;

/// φ(SIZE) = 1·2·4·6·10·12, the number of representable residues per block.
pub const BITS: usize = 2 * 4 * 6 * 10 * 12;

/// `u64` words per block. `BITS` is a multiple of 64, so blocks never share a word.
pub const WORDS_PER_BLOCK: usize = BITS / 64;

/// Primes excluded from the wheel's index space. They are emitted as literals.
pub const WHEEL_PRIMES: [u64; 6] = [2, 3, 5, 7, 11, 13];

/// Smallest multiplier with no wheel-prime factor. For any prime `p`, the
/// multiples `2p..=16p` have no storage bit, so re-sieving starts at `17p`.
pub const FIRST_SIEVING_MULTIPLIER: u64 = 17;

const NOT_REPRESENTABLE: u16 = u16::MAX;

// ─── Table ─────────────────────────────────────────────────────────────────

/// Residue ↔ packed-index mapping for one wheel period.
pub struct WheelTable {
    index_of: [u16; SIZE as usize],
    residue_at: [u16; BITS],
}

/// The process-wide wheel table.
pub static WHEEL: WheelTable = WheelTable::new();

impl WheelTable {
    const fn new() -> Self {
        let mut index_of = [NOT_REPRESENTABLE; SIZE as usize];
        let mut residue_at = [0u16; BITS];
        let mut next = 0;
        let mut n = 0;
        while n < SIZE as usize {
            if coprime_to_wheel(n as u64) {
                residue_at[next] = n as u16;
                index_of[n] = next as u16;
                next += 1;
            }
            n += 1;
        }
        assert!(next == BITS, "wheel residue count must equal φ(SIZE)");
        Self { index_of, residue_at }
    }

    /// Packed index of `residue` (`0 ≤ residue < SIZE`), or `None` if it shares
    /// a factor with a wheel prime.
    #[inline]
    pub fn index_of(&self, residue: usize) -> Option<usize> {
        match self.index_of[residue] {
            NOT_REPRESENTABLE => None,
            index => Some(index as usize),
        }
    }

    /// Residue stored at packed `index`. Ascending in `index`.
    #[inline]
    pub fn residue_at(&self, index: usize) -> u64 {
        self.residue_at[index] as u64
    }
}

const fn coprime_to_wheel(n: u64) -> bool {
    let mut i = 0;
    while i < WHEEL_PRIMES.len() {
        if n % WHEEL_PRIMES[i] == 0 {
            return false;
        }
        i += 1;
    }
    true
}
