//! The zero-knowledge argument engine: a family of Sigma-protocols over
//! `Gq`/`Zq`, each proving knowledge of a witness satisfying an algebraic
//! relation on Pedersen-committed vectors, composed into the apex shuffle
//! argument ([`shuffle`]).
//!
//! Every sub-argument follows the same three-move shape: the prover blinds
//! its witness with fresh randomness and commits to the blind, a
//! Fiat-Shamir challenge is derived from the whole transcript so far, and
//! the prover reveals a challenge-blinded opening the verifier checks
//! against a public algebraic identity. This "blind, challenge, reveal"
//! pattern is shared by every module here; [`fiat_shamir_challenge`] and
//! [`commit_scalar`] are the two primitives every sub-argument builds on.

pub mod hadamard;
pub mod multi_exponentiation;
pub mod product_argument;
pub mod shuffle;
pub mod single_value_product;
pub mod zero_argument;

use crate::commitment::CommitmentKey;
use crate::error::CryptoResult;
use crate::groups::{GqElement, ZqElement, ZqGroup};
use crate::hashing::Hashable;
use crate::random::kdf_to_zq;

/// Derives a `Zq` challenge from a transcript of [`Hashable`] values via the
/// recursive hash followed by rejection sampling into `Zq`.
pub fn fiat_shamir_challenge(zq: &ZqGroup, transcript: Vec<Hashable>) -> CryptoResult<ZqElement> {
    let digest = crate::hashing::hash_elements(transcript)?;
    kdf_to_zq(zq, &digest, b"fiat-shamir-challenge")
}

pub(crate) fn hashable(e: &GqElement) -> Hashable {
    Hashable::integer(e.value().clone())
}

/// A single-scalar Pedersen commitment `h^r * g_0^v`, used throughout the
/// argument engine to hide an intermediate coefficient that only needs to
/// carry one field element rather than a whole vector.
pub(crate) fn commit_scalar(ck: &CommitmentKey, value: &ZqElement, randomness: &ZqElement) -> CryptoResult<GqElement> {
    ck.h().exp(randomness)?.multiply(&ck.g()[0].exp(value)?)
}
