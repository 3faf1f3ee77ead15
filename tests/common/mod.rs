//! Helpers shared by the integration tests.

#![allow(dead_code)]

use primer::PRIME_WIDTH;

/// Splits a raw stream into little-endian `u64` values.
pub fn decode(bytes: &[u8]) -> Vec<u64> {
    assert_eq!(bytes.len() % PRIME_WIDTH, 0, "stream length must be a multiple of 8");
    bytes
        .chunks_exact(PRIME_WIDTH)
        .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Primes up to `bound` from the `primal` crate.
pub fn oracle(bound: u64) -> Vec<u64> {
    primal::Primes::all()
        .take_while(|&p| p as u64 <= bound)
        .map(|p| p as u64)
        .collect()
}
