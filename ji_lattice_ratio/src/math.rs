// Operations on ratios used throughout the lattice: octave normalization,
// cents, prime factorization and prime limit, and fraction formatting.
//
// `normalize` stays exact. Instead of taking a floating-point log2 and
// scaling by the resulting power of two, it strips factors of two from both
// components and picks the shift from integer bit lengths, which gives the
// same exponent without rounding trouble near octave boundaries.
//
// `to_cents` is the only lossy function here and is for display only.

use crate::error::RatioError;
use crate::ratio::Ratio;
use num_integer::gcd;
use std::collections::BTreeMap;

/// Width used when fractions are padded for tabular output.
pub const DEFAULT_FRACTION_WIDTH: usize = 12;

/// Move `ratio` by octaves into [1, 2).
///
/// The result is `ratio * 2^k` for the unique integer `k` that lands in the
/// range. Fails with `RatioError::Overflow` only if the shifted component no
/// longer fits in 64 bits.
pub fn normalize(ratio: Ratio) -> Result<Ratio, RatioError> {
    let (n, d) = ratio.odd_part();
    let n_bits = 64 - i64::from(n.leading_zeros());
    let d_bits = 64 - i64::from(d.leading_zeros());

    // Equal bit lengths put the shifted quotient in (1/2, 2).
    let mut shift = d_bits - n_bits;
    let (num, den) = shifted(n, d, shift);
    if num < den {
        shift += 1;
    }
    let (num, den) = shifted(n, d, shift);

    let num = u64::try_from(num).map_err(|_| RatioError::Overflow)?;
    let den = u64::try_from(den).map_err(|_| RatioError::Overflow)?;
    // Odd parts of a reduced ratio are coprime, and only one side carries
    // the power of two, so the result is already in lowest terms.
    Ok(Ratio::from_reduced(num, den))
}

/// `n * 2^shift / d`, with the power of two on whichever side keeps it integral.
fn shifted(n: u64, d: u64, shift: i64) -> (u128, u128) {
    let n = u128::from(n);
    let d = u128::from(d);
    if shift >= 0 {
        (n << shift, d)
    } else {
        (n, d << -shift)
    }
}

/// Size of `ratio` in cents, `1200 * log2(ratio)` rounded to the nearest cent.
pub fn to_cents(ratio: Ratio) -> i64 {
    let log2 = (ratio.numer() as f64).log2() - (ratio.denom() as f64).log2();
    (1200.0 * log2).round() as i64
}

/// Odd primes below this bound are removed by trial division. Whatever is
/// left has only large prime factors and is split with Pollard's rho.
const TRIAL_DIVISION_LIMIT: u64 = 1 << 10;

/// Witnesses that make Miller-Rabin deterministic for every `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Prime factorization of `n` as `prime -> exponent`. Empty for `n <= 1`.
///
/// Small factors come from trial division; large cofactors from Pollard's
/// rho with a Miller-Rabin primality check, so a 64-bit prime costs a few
/// modular exponentiations rather than ~2^32 divisions.
pub fn factorize(mut n: u64) -> BTreeMap<u64, u32> {
    let mut factors = BTreeMap::new();
    if n < 2 {
        return factors;
    }
    let twos = n.trailing_zeros();
    if twos > 0 {
        factors.insert(2, twos);
        n >>= twos;
    }
    let mut p = 3u64;
    while p < TRIAL_DIVISION_LIMIT && p * p <= n {
        while n % p == 0 {
            *factors.entry(p).or_insert(0) += 1;
            n /= p;
        }
        p += 2;
    }
    split_large(n, &mut factors);
    factors
}

fn split_large(n: u64, factors: &mut BTreeMap<u64, u32>) {
    if n == 1 {
        return;
    }
    if is_prime(n) {
        *factors.entry(n).or_insert(0) += 1;
        return;
    }
    let d = rho_divisor(n);
    split_large(d, factors);
    split_large(n / d, factors);
}

/// Deterministic primality test for 64-bit integers.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    WITNESSES.iter().all(|&a| {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    })
}

/// A non-trivial divisor of the odd composite `n`.
fn rho_divisor(n: u64) -> u64 {
    let mut c = 1u64;
    loop {
        let step = |x: u64| {
            ((u128::from(mul_mod(x, x, n)) + u128::from(c)) % u128::from(n)) as u64
        };
        let (mut x, mut y, mut d) = (2u64, 2u64, 1u64);
        while d == 1 {
            x = step(x);
            y = step(step(y));
            d = gcd(x.abs_diff(y), n);
        }
        if d != n {
            return d;
        }
        c += 1;
    }
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// `base^exp mod m` for `m >= 2`.
fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// The largest prime dividing the numerator or denominator, or `None` for
/// 1/1, which has no prime factors.
///
/// Factoring the two components separately gives the same answer as factoring
/// their product, without the risk of overflow.
pub fn prime_limit(ratio: Ratio) -> Option<u64> {
    let largest = |n: u64| factorize(n).into_keys().next_back();
    largest(ratio.numer()).max(largest(ratio.denom()))
}

/// Format as `n/d`, right-aligned to `width` when padding is requested.
pub fn show_fraction(ratio: Ratio, padding: Option<usize>) -> String {
    let text = ratio.to_string();
    match padding {
        Some(width) => format!("{text:>width$}"),
        None => text,
    }
}
