//! Modular arithmetic over arbitrary-precision nonnegative integers.
//!
//! This is the leaf layer the group types (`src/groups`) build on: plain
//! [`BigUint`] operations with no group-membership invariants attached.
//! Everything here is infallible except modular inversion, which can fail
//! for non-invertible operands.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// `(a * b) mod m`.
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `(base ^ exp) mod m`.
pub fn pow_mod(base: &BigUint, exp: &BigUint, m: &BigUint) -> BigUint {
    base.modpow(exp, m)
}

/// Modular inverse of `a` modulo `m`, via the extended Euclidean algorithm.
/// Returns `None` if `a` and `m` are not coprime (in particular if `a` is 0).
pub fn inv_mod(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if a.is_zero() || m.is_zero() {
        return None;
    }
    let (g, x, _y) = extended_gcd(a.clone(), m.clone());
    if g != BigUint::one() {
        return None;
    }
    Some(x.mod_floor(m))
}

/// Extended Euclidean algorithm over signed bignums, returning `(gcd, x, y)`
/// such that `a*x + b*y = gcd`. Internally promotes to `BigInt` to track
/// sign during the recursion, then normalizes `x` back into `[0, b)`.
fn extended_gcd(a: BigUint, b: BigUint) -> (BigUint, BigUint, BigUint) {
    use num_bigint::BigInt;

    fn egcd(a: BigInt, b: BigInt) -> (BigInt, BigInt, BigInt) {
        if b.is_zero() {
            (a, BigInt::one(), BigInt::zero())
        } else {
            let (q, r) = a.div_mod_floor(&b);
            let (g, x1, y1) = egcd(b.clone(), r);
            let x = y1.clone();
            let y = x1 - &q * &y1;
            (g, x, y)
        }
    }

    let a_signed = BigInt::from(a);
    let b_signed = BigInt::from(b.clone());
    let (g, x, y) = egcd(a_signed, b_signed.clone());
    let b_int = BigInt::from(b);
    let x_norm = ((x % &b_int) + &b_int) % &b_int;
    let y_norm = y;
    let g_unsigned = g.to_biguint().unwrap_or_else(BigUint::zero);
    let x_unsigned = x_norm.to_biguint().unwrap_or_else(BigUint::zero);
    // y is only used for the identity a*x + b*y = gcd; callers here only need x.
    let _ = y_norm;
    (g_unsigned, x_unsigned, BigUint::zero())
}

/// Minimum-length big-endian encoding of a nonnegative integer: no leading
/// zero byte unless the value is zero, in which case the encoding is the
/// single byte `0x00`.
pub fn integer_to_bytes(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        vec![0u8]
    } else {
        n.to_bytes_be()
    }
}

/// Inverse of [`integer_to_bytes`].
pub fn bytes_to_integer(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Miller-Rabin probabilistic primality test. `rounds` witnesses are drawn
/// from a small fixed base set augmented with randomly chosen witnesses so
/// that the false-positive probability is negligible for cryptographic
/// parameter validation (this is a construction-time check, not a hot path).
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    let zero = BigUint::zero();
    let one = BigUint::one();
    let two = &one + &one;

    if n < &two {
        return false;
    }
    if n == &two || n == &BigUint::from(3u32) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    let small_witnesses: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    let mut rng = rand::thread_rng();
    let mut witnesses: Vec<BigUint> = small_witnesses
        .iter()
        .map(|w| BigUint::from(*w))
        .filter(|w| w < n)
        .collect();
    while witnesses.len() < rounds as usize {
        use num_bigint::RandBigInt;
        let w = rng.gen_biguint_range(&two, &n_minus_one);
        witnesses.push(w);
    }

    'witness: for a in witnesses.iter().take(rounds.max(witnesses.len() as u32) as usize) {
        if a == &zero {
            continue;
        }
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 0..r - 1 {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
