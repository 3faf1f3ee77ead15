/// Integer square root — safe for all u64 values.
/// Newton-corrected from an f64 seed.
#[inline]
pub(crate) fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x > 0 && x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map_or(false, |sq| sq <= n) {
        x += 1;
    }
    x
}

/// Smallest `r` with `r² ≥ n`.
#[inline]
pub(crate) fn ceil_sqrt(n: u64) -> u64 {
    let r = isqrt(n);
    if r * r < n {
        r + 1
    } else {
        r
    }
}

/// Computes `-x mod p`, the distance from `x` up to the next multiple of `p`.
#[inline]
pub(crate) fn minus_mod(x: u64, p: u64) -> u64 {
    (p - x % p) % p
}
