//! # Field Arithmetic
//!
//! The prime field used for every transform. 61441 is prime, its unit group
//! has order 61440 = 2^12 * 15, so it carries roots of unity of every power
//! of two up to 4096, and every element fits in a `u16`.

/// Storage type for a single field element. Always holds a value in `[0, MODULUS)`.
pub type Element = u16;

/// The field size.
pub const MODULUS: u64 = 61441;

/// Largest power of two dividing `MODULUS - 1`; upper bound on any transform length.
pub const ROOT_ORDER: usize = 4096;

/// `log2(ROOT_ORDER)`.
pub const LOG2_ROOT_ORDER: u32 = 12;

/// An element of multiplicative order exactly `ROOT_ORDER`.
pub const PRIMITIVE_ROOT: u64 = 39003;

/// `PRIMITIVE_ROOT ^ e mod MODULUS`, by binary exponentiation.
///
/// A root of unity of order `2^s` (for `s <= LOG2_ROOT_ORDER`) is
/// `mod_pow(ROOT_ORDER >> s)`.
pub fn mod_pow(mut e: u64) -> u64 {
    let mut base = PRIMITIVE_ROOT;
    let mut accum = 1u64;
    while e != 0 {
        if e & 1 == 1 {
            accum = accum * base % MODULUS;
        }
        base = base * base % MODULUS;
        e >>= 1;
    }
    accum
}

/// Multiplicative inverse of `v` modulo `MODULUS`, by the extended Euclidean algorithm.
///
/// `v` is reduced first. Zero has no inverse and maps to zero.
pub fn invert(v: u64) -> u64 {
    let (mut old_r, mut r) = ((v % MODULUS) as i64, MODULUS as i64);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }
    if old_r != 1 {
        return 0;
    }
    old_s.rem_euclid(MODULUS as i64) as u64
}

#[inline]
pub(crate) fn add(a: u64, b: u64) -> u64 {
    (a + b) % MODULUS
}

#[inline]
pub(crate) fn sub(a: u64, b: u64) -> u64 {
    (MODULUS + a - b) % MODULUS
}

#[inline]
pub(crate) fn mul(a: u64, b: u64) -> u64 {
    a * b % MODULUS
}

/// Reduce an arbitrary count into the field.
#[inline]
pub fn reduce(count: usize) -> Element {
    (count as u64 % MODULUS) as Element
}
