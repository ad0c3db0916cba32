//! Randomness sources: a thin `Randomness` capability trait over any CSPRNG,
//! uniform sampling of `Zq` exponents, and a deterministic key-derivation
//! path (`kdf_to_zq`) used to derive verifiable Pedersen commitment keys
//! from a public seed rather than a secret one.

use hkdf::Hkdf;
use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};
use sha3::Sha3_256;

use crate::bignat;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{ZqElement, ZqGroup};

/// The library's default CSPRNG. Callers that want determinism (tests,
/// test-vector replay) construct their own `rand::rngs::StdRng` seeded
/// explicitly instead of using this type.
pub use rand::rngs::OsRng as DefaultRng;

/// Capability every randomness source used by this crate must provide.
/// Implemented generically for any `RngCore + CryptoRng`, so call sites
/// take `&mut impl Randomness` rather than a concrete RNG type.
pub trait Randomness {
    fn gen_bytes(&mut self, len: usize) -> Vec<u8>;

    /// Uniformly random integer in `[0, bound)`. `bound` must be nonzero.
    fn gen_biguint_below(&mut self, bound: &BigUint) -> BigUint;
}

impl<R: RngCore + CryptoRng> Randomness for R {
    fn gen_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.fill_bytes(&mut buf);
        buf
    }

    fn gen_biguint_below(&mut self, bound: &BigUint) -> BigUint {
        self.gen_biguint_range(&BigUint::from(0u32), bound)
    }
}

/// Draws a uniformly random element of `Zq`.
pub fn random_exponent(group: &ZqGroup, rng: &mut impl Randomness) -> ZqElement {
    let v = rng.gen_biguint_below(group.order());
    group
        .element(v)
        .expect("value reduced below q is always a valid Zq element")
}

/// Draws `n` independent uniformly random elements of `Zq`.
pub fn random_exponent_vector(group: &ZqGroup, n: usize, rng: &mut impl Randomness) -> Vec<ZqElement> {
    (0..n).map(|_| random_exponent(group, rng)).collect()
}

/// Deterministically derives a `Zq` element from `seed` and `label` using
/// HKDF-Expand (SHA3-256) followed by rejection sampling: each candidate is
/// drawn from the next `ceil(bitlen(q)/8)` expanded bytes, reduced against
/// `q`'s bit length (not its value) by masking the top byte, and rejected if
/// still `>= q`, incrementing a counter appended to the label on retry. This
/// keeps commitment keys independently reproducible from a public seed
/// without relying on any entropy a verifier cannot also supply.
pub fn kdf_to_zq(group: &ZqGroup, seed: &[u8], label: &[u8]) -> CryptoResult<ZqElement> {
    let q = group.order();
    if q.bits() == 0 {
        return Err(CryptoError::InvalidInput("Zq order must be nonzero".into()));
    }
    let byte_len = ((q.bits() + 7) / 8) as usize;
    let top_bits = q.bits() % 8;
    let top_mask: u8 = if top_bits == 0 { 0xff } else { (1u16 << top_bits) as u8 - 1 };

    for counter in 0u32..1000 {
        let hk = Hkdf::<Sha3_256>::new(Some(seed), label);
        let mut info = Vec::with_capacity(label.len() + 4);
        info.extend_from_slice(b"kdf-to-zq");
        info.extend_from_slice(&counter.to_be_bytes());
        let mut okm = vec![0u8; byte_len];
        hk.expand(&info, &mut okm)
            .map_err(|_| CryptoError::InvalidInput("requested KDF output too long".into()))?;
        okm[0] &= top_mask;
        let candidate = bignat::bytes_to_integer(&okm);
        if &candidate < q {
            return group.element(candidate);
        }
        tracing::trace!(counter, "kdf_to_zq candidate out of range, rejection-sampling again");
    }
    Err(CryptoError::PreconditionViolated(
        "kdf_to_zq failed to find a valid candidate after 1000 attempts".into(),
    ))
}
