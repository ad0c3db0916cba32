//! Multi-recipient ElGamal over a [`GqGroup`]: a single ciphertext encrypts
//! an `l`-vector of messages, one randomness `r` shared across all of them,
//! each message under its own recipient public key.
//!
//! ```text
//! gamma   = g^r
//! phi_i   = m_i * pk_i^r          for i in 0..l
//! ```
//!
//! This is the shape the shuffle argument and the decryption proof both
//! operate on: a batch of `N` such ciphertexts, all sharing the same `l`
//! public keys, gets permuted and re-randomized by the mixnet, then
//! jointly decrypted with a proof of correct decryption.

use serde::Serialize;

use crate::containers::GroupObject;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, GqGroup, ZqElement};
use crate::random::{random_exponent, random_exponent_vector, Randomness};
use std::sync::Arc;
use zeroize::Zeroize;

/// The `l` public keys a multi-recipient ciphertext is encrypted under.
#[derive(Debug, Clone, Serialize)]
pub struct ElGamalPublicKey {
    keys: Vec<GqElement>,
}

impl ElGamalPublicKey {
    pub fn new(keys: Vec<GqElement>) -> CryptoResult<Self> {
        if keys.is_empty() {
            return Err(CryptoError::InvalidInput(
                "an ElGamal public key must have at least one recipient".into(),
            ));
        }
        let group = keys[0].group().clone();
        if keys.iter().any(|k| k.group() != &group) {
            return Err(CryptoError::GroupMismatch(
                "all recipient keys must belong to the same Gq group".into(),
            ));
        }
        Ok(ElGamalPublicKey { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[GqElement] {
        &self.keys
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.keys[0].group()
    }
}

/// A full `l`-recipient secret key: `sk = (x_1, ..., x_l)`, paired with a
/// [`ElGamalPublicKey`] of `pk_i = g^x_i`.
#[derive(Debug, Clone)]
pub struct ElGamalPrivateKey {
    keys: Vec<ZqElement>,
}

impl ElGamalPrivateKey {
    pub fn new(keys: Vec<ZqElement>) -> CryptoResult<Self> {
        if keys.is_empty() {
            return Err(CryptoError::InvalidInput(
                "an ElGamal private key must have at least one recipient slot".into(),
            ));
        }
        let group = keys[0].group().clone();
        if keys.iter().any(|k| k.group() != &group) {
            return Err(CryptoError::GroupMismatch(
                "all private key slots must belong to the same Zq group".into(),
            ));
        }
        Ok(ElGamalPrivateKey { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[ZqElement] {
        &self.keys
    }
}

/// Best-effort: overwrite every secret scalar in place before the backing
/// allocation is freed, so a secret key's bit pattern does not linger in
/// memory past its owner's scope any longer than necessary.
impl Drop for ElGamalPrivateKey {
    fn drop(&mut self) {
        for k in self.keys.iter_mut() {
            k.zeroize();
        }
    }
}

/// Generates an `l`-recipient key pair: `sk_i` uniform in `[0, q)`,
/// `pk_i = g^{sk_i}`.
pub fn generate_key_pair(
    group: &Arc<GqGroup>,
    l: usize,
    rng: &mut impl Randomness,
) -> CryptoResult<(ElGamalPrivateKey, ElGamalPublicKey)> {
    if l == 0 {
        return Err(CryptoError::InvalidInput(
            "a key pair must cover at least one recipient".into(),
        ));
    }
    tracing::debug!(l, "generating multi-recipient ElGamal key pair");
    let zq = group.corresponding_zq();
    let sk = random_exponent_vector(&zq, l, rng);
    let pk = sk
        .iter()
        .map(|x| group.generator().exp(x))
        .collect::<CryptoResult<Vec<_>>>()?;
    Ok((ElGamalPrivateKey::new(sk)?, ElGamalPublicKey::new(pk)?))
}

/// A key pair for one recipient slot: `pk = g^sk`.
#[derive(Debug, Clone)]
pub struct ElGamalKeyPair {
    sk: ZqElement,
    pk: GqElement,
}

impl ElGamalKeyPair {
    pub fn generate(group: &Arc<GqGroup>, rng: &mut impl Randomness) -> Self {
        let zq = group.corresponding_zq();
        let sk = random_exponent(&zq, rng);
        let pk = group.generator().exp(&sk).expect("zq order matches group");
        ElGamalKeyPair { sk, pk }
    }

    pub fn from_secret(group: &Arc<GqGroup>, sk: ZqElement) -> CryptoResult<Self> {
        let pk = group.generator().exp(&sk)?;
        Ok(ElGamalKeyPair { sk, pk })
    }

    pub fn secret_key(&self) -> &ZqElement {
        &self.sk
    }

    pub fn public_key(&self) -> &GqElement {
        &self.pk
    }
}

/// A single multi-recipient ciphertext: one `gamma`, `l` `phi`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ciphertext {
    gamma: GqElement,
    phis: Vec<GqElement>,
}

impl Ciphertext {
    pub fn new(gamma: GqElement, phis: Vec<GqElement>) -> CryptoResult<Self> {
        if phis.is_empty() {
            return Err(CryptoError::InvalidInput(
                "a ciphertext must have at least one phi component".into(),
            ));
        }
        if phis.iter().any(|p| p.group() != gamma.group()) {
            return Err(CryptoError::GroupMismatch(
                "gamma and every phi must belong to the same Gq group".into(),
            ));
        }
        Ok(Ciphertext { gamma, phis })
    }

    pub fn gamma(&self) -> &GqElement {
        &self.gamma
    }

    pub fn phis(&self) -> &[GqElement] {
        &self.phis
    }

    pub fn l(&self) -> usize {
        self.phis.len()
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.gamma.group()
    }

    /// Component-wise product with `other` (the homomorphic ciphertext
    /// multiplication every re-encryption and the multi-exponentiation
    /// argument build on).
    pub fn multiply(&self, other: &Ciphertext) -> CryptoResult<Ciphertext> {
        if self.l() != other.l() {
            return Err(CryptoError::ShapeError(
                "ciphertexts being multiplied must have the same number of phis".into(),
            ));
        }
        let gamma = self.gamma.multiply(&other.gamma)?;
        let phis = self
            .phis
            .iter()
            .zip(other.phis.iter())
            .map(|(a, b)| a.multiply(b))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ciphertext::new(gamma, phis)
    }

    /// Raises every component to `exponent`.
    pub fn exponentiate(&self, exponent: &ZqElement) -> CryptoResult<Ciphertext> {
        let gamma = self.gamma.exp(exponent)?;
        let phis = self
            .phis
            .iter()
            .map(|p| p.exp(exponent))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ciphertext::new(gamma, phis)
    }
}

impl GroupObject for Ciphertext {
    type GroupKey = Arc<GqGroup>;

    fn group_key(&self) -> Self::GroupKey {
        self.gamma.group().clone()
    }

    fn element_size(&self) -> usize {
        1 + self.phis.len()
    }
}

/// Encrypts `messages` (length `l <= k`) under shared randomness `r` and a
/// public key of length `k`. Only the first `l` recipient keys are used,
/// so the phi vector is truncated to `l` when `l < k`.
pub fn encrypt(pk: &ElGamalPublicKey, messages: &[GqElement], r: &ZqElement) -> CryptoResult<Ciphertext> {
    if messages.is_empty() {
        return Err(CryptoError::InvalidInput(
            "a message vector must have at least one entry".into(),
        ));
    }
    if messages.len() > pk.len() {
        return Err(CryptoError::ShapeError(format!(
            "message vector of length {} exceeds public key length {}",
            messages.len(),
            pk.len()
        )));
    }
    let group = pk.group();
    let gamma = group.generator().exp(r)?;
    let phis = messages
        .iter()
        .zip(pk.keys().iter())
        .map(|(m, y)| -> CryptoResult<GqElement> { m.multiply(&y.exp(r)?) })
        .collect::<CryptoResult<Vec<_>>>()?;
    Ciphertext::new(gamma, phis)
}

/// Encrypts `messages` with a freshly drawn randomness, returning the
/// ciphertext and the randomness used (the latter needed by the caller to
/// build a proof of correct encryption, if one is required upstream).
pub fn encrypt_with_fresh_randomness(
    pk: &ElGamalPublicKey,
    messages: &[GqElement],
    rng: &mut impl Randomness,
) -> CryptoResult<(Ciphertext, ZqElement)> {
    let zq = pk.group().corresponding_zq();
    let r = random_exponent(&zq, rng);
    let ct = encrypt(pk, messages, &r)?;
    Ok((ct, r))
}

/// Decrypts `ct` given at least `ct.l()` per-recipient secret keys (in the
/// same order as the original public key); only the first `ct.l()` are used.
pub fn decrypt(ct: &Ciphertext, secret_keys: &[ZqElement]) -> CryptoResult<Vec<GqElement>> {
    if secret_keys.len() < ct.l() {
        return Err(CryptoError::ShapeError(format!(
            "expected at least {} secret keys, got {}",
            ct.l(),
            secret_keys.len()
        )));
    }
    ct.phis()
        .iter()
        .zip(secret_keys.iter())
        .map(|(phi, sk)| -> CryptoResult<GqElement> {
            let shared_secret = ct.gamma().exp(sk)?;
            phi.multiply(&shared_secret.invert())
        })
        .collect()
}

/// The neutral ciphertext encrypting `l` copies of the group identity with
/// randomness `r`: `ones(pk, r).multiply(&ct)` re-randomizes `ct` without
/// changing the messages it carries.
pub fn ones(pk: &ElGamalPublicKey, r: &ZqElement) -> CryptoResult<Ciphertext> {
    let identity = pk.group().identity();
    let messages: Vec<GqElement> = (0..pk.len()).map(|_| identity.clone()).collect();
    encrypt(pk, &messages, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::SeedableRng;

    fn group() -> Arc<GqGroup> {
        Arc::new(GqGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap())
    }

    #[test]
    fn encrypt_then_decrypt_recovers_messages() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let kp1 = ElGamalKeyPair::generate(&group, &mut rng);
        let kp2 = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp1.public_key().clone(), kp2.public_key().clone()]).unwrap();

        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        let (ct, _r) = encrypt_with_fresh_randomness(&pk, &[m1.clone(), m2.clone()], &mut rng).unwrap();

        let recovered = decrypt(&ct, &[kp1.secret_key().clone(), kp2.secret_key().clone()]).unwrap();
        assert_eq!(recovered, vec![m1, m2]);
    }

    #[test]
    fn ones_is_a_re_randomization_neutral_element() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let kp = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp.public_key().clone()]).unwrap();

        let m = group.element(BigUint::from(9u32)).unwrap();
        let zq = group.corresponding_zq();
        let r1 = random_exponent(&zq, &mut rng);
        let ct = encrypt(&pk, &[m.clone()], &r1).unwrap();

        let r2 = random_exponent(&zq, &mut rng);
        let neutral = ones(&pk, &r2).unwrap();
        let rerandomized = ct.multiply(&neutral).unwrap();

        let recovered = decrypt(&rerandomized, &[kp.secret_key().clone()]).unwrap();
        assert_eq!(recovered, vec![m]);
    }

    #[test]
    fn multiply_is_homomorphic_over_messages() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let kp = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp.public_key().clone()]).unwrap();

        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        let zq = group.corresponding_zq();
        let ct1 = encrypt(&pk, &[m1.clone()], &random_exponent(&zq, &mut rng)).unwrap();
        let ct2 = encrypt(&pk, &[m2.clone()], &random_exponent(&zq, &mut rng)).unwrap();

        let product = ct1.multiply(&ct2).unwrap();
        let recovered = decrypt(&product, &[kp.secret_key().clone()]).unwrap();
        assert_eq!(recovered, vec![m1.multiply(&m2).unwrap()]);
    }

    #[test]
    fn rejects_mismatched_recipient_counts() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let kp = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp.public_key().clone()]).unwrap();
        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        assert!(encrypt_with_fresh_randomness(&pk, &[m1, m2], &mut rng).is_err());
    }

    #[test]
    fn message_vector_shorter_than_public_key_truncates_phis() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let kp1 = ElGamalKeyPair::generate(&group, &mut rng);
        let kp2 = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp1.public_key().clone(), kp2.public_key().clone()]).unwrap();

        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let zq = group.corresponding_zq();
        let r = random_exponent(&zq, &mut rng);
        let ct = encrypt(&pk, &[m1.clone()], &r).unwrap();
        assert_eq!(ct.l(), 1);

        let recovered = decrypt(&ct, &[kp1.secret_key().clone(), kp2.secret_key().clone()]).unwrap();
        assert_eq!(recovered, vec![m1]);
    }

    #[test]
    fn generate_key_pair_produces_a_matching_public_key() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(6);
        let (sk, pk) = generate_key_pair(&group, 3, &mut rng).unwrap();
        assert_eq!(sk.len(), 3);
        assert_eq!(pk.len(), 3);
        for (x, y) in sk.keys().iter().zip(pk.keys().iter()) {
            assert_eq!(&group.generator().exp(x).unwrap(), y);
        }
    }

    #[test]
    fn generate_key_pair_round_trips_through_encrypt_decrypt() {
        let group = group();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let (sk, pk) = generate_key_pair(&group, 2, &mut rng).unwrap();
        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        let (ct, _r) = encrypt_with_fresh_randomness(&pk, &[m1.clone(), m2.clone()], &mut rng).unwrap();
        let recovered = decrypt(&ct, sk.keys()).unwrap();
        assert_eq!(recovered, vec![m1, m2]);
    }
}
