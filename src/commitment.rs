//! Pedersen vector and matrix commitments over `Gq`.
//!
//! A [`CommitmentKey`] of size `n` is `(h, g_1, ..., g_n)`; committing to a
//! length-`n` message vector `m` with randomness `r` yields
//! `h^r * prod(g_i^m_i)`. Binding relies on nobody knowing a discrete-log
//! relation between `h` and the `g_i`s, so the key's generators are derived
//! deterministically from a public seed by hashing-then-squaring into the
//! quadratic-residue subgroup, rather than chosen by whoever runs the
//! protocol.

use num_bigint::BigUint;
use serde::Serialize;

use crate::bignat;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, GqGroup, ZqElement};
use crate::hashing::{hash_elements, Hashable};
use std::sync::Arc;

/// A Pedersen commitment key `(h, g_1, ..., g_n)` for vectors of length `n`.
#[derive(Debug, Clone, Serialize)]
pub struct CommitmentKey {
    h: GqElement,
    g: Vec<GqElement>,
}

impl CommitmentKey {
    pub fn new(h: GqElement, g: Vec<GqElement>) -> CryptoResult<Self> {
        if g.is_empty() {
            return Err(CryptoError::InvalidInput(
                "a commitment key must cover at least one message slot".into(),
            ));
        }
        if g.iter().any(|gi| gi.group() != h.group()) {
            return Err(CryptoError::GroupMismatch(
                "h and every g_i must belong to the same Gq group".into(),
            ));
        }
        let generator = h.group().generator();
        if h.is_identity() || h == generator {
            return Err(CryptoError::InvalidInput(
                "commitment key's h must not be the identity or the group generator".into(),
            ));
        }
        if let Some(bad) = g.iter().find(|gi| gi.is_identity() || *gi == &generator) {
            return Err(CryptoError::InvalidInput(format!(
                "commitment key generator {} must not be the identity or the group generator",
                bad.value()
            )));
        }
        Ok(CommitmentKey { h, g })
    }

    pub fn h(&self) -> &GqElement {
        &self.h
    }

    pub fn g(&self) -> &[GqElement] {
        &self.g
    }

    pub fn n(&self) -> usize {
        self.g.len()
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.h.group()
    }

    /// The first `n` generators, for committing to shorter vectors with the
    /// same key prefix (used when sub-arguments operate on a slice of a
    /// larger witness).
    pub fn truncate(&self, n: usize) -> CryptoResult<CommitmentKey> {
        if n == 0 || n > self.g.len() {
            return Err(CryptoError::ShapeError(format!(
                "cannot truncate a {}-element commitment key to {n}",
                self.g.len()
            )));
        }
        CommitmentKey::new(self.h.clone(), self.g[..n].to_vec())
    }

    /// `h^r * prod(g_i^m_i)`.
    pub fn commit(&self, messages: &[ZqElement], randomness: &ZqElement) -> CryptoResult<GqElement> {
        if messages.len() != self.g.len() {
            return Err(CryptoError::ShapeError(format!(
                "expected {} messages for this commitment key, got {}",
                self.g.len(),
                messages.len()
            )));
        }
        let mut acc = self.h.exp(randomness)?;
        for (gi, mi) in self.g.iter().zip(messages.iter()) {
            acc = acc.multiply(&gi.exp(mi)?)?;
        }
        Ok(acc)
    }

    /// Commits to each column of `messages` (an `n x m` matrix, `n` matching
    /// this key) with its own randomness, yielding `m` commitments.
    pub fn commit_matrix(
        &self,
        messages: &[Vec<ZqElement>],
        randomness: &[ZqElement],
    ) -> CryptoResult<Vec<GqElement>> {
        if messages.len() != randomness.len() {
            return Err(CryptoError::ShapeError(
                "one randomness value is required per column".into(),
            ));
        }
        messages
            .iter()
            .zip(randomness.iter())
            .map(|(col, r)| self.commit(col, r))
            .collect()
    }
}

/// Deterministically derives a verifiable commitment key of size `n` from a
/// public `seed`: each generator is obtained by hashing `(seed, label)` to
/// an integer mod `p` and squaring it into the quadratic-residue subgroup,
/// retrying with an incremented counter on the rare identity/zero
/// collision. No party ever learns a discrete-log relation between the
/// resulting generators, since nobody chooses them directly.
pub fn derive_commitment_key(group: &Arc<GqGroup>, n: usize, seed: &[u8]) -> CryptoResult<CommitmentKey> {
    tracing::debug!(n, "deriving verifiable commitment key");
    if n == 0 {
        return Err(CryptoError::InvalidInput(
            "commitment key size must be at least 1".into(),
        ));
    }
    // Derived one at a time, each rejecting every value already claimed by an
    // earlier generator in this same key, so the final (h, g_1, ..., g_n)
    // tuple is n+1 pairwise-distinct values rather than merely n+1 members.
    let mut used = std::collections::HashSet::new();
    let h = derive_generator(group, seed, "h", &mut used)?;
    let g = (0..n)
        .map(|i| derive_generator(group, seed, &format!("g-{i}"), &mut used))
        .collect::<CryptoResult<Vec<_>>>()?;
    CommitmentKey::new(h, g)
}

fn derive_generator(
    group: &Arc<GqGroup>,
    seed: &[u8],
    label: &str,
    used: &mut std::collections::HashSet<BigUint>,
) -> CryptoResult<GqElement> {
    for counter in 0u32..1000 {
        let digest = hash_elements(vec![
            Hashable::bytes(seed.to_vec()),
            Hashable::text(label.to_string()),
            Hashable::integer(BigUint::from(counter)),
        ])?;
        let candidate = bignat::bytes_to_integer(&digest) % group.p();
        let squared = bignat::pow_mod(&candidate, &BigUint::from(2u32), group.p());
        if squared <= BigUint::from(1u32) || squared == *group.g_value() || used.contains(&squared) {
            tracing::trace!(label, counter, "commitment generator candidate rejected, retrying");
            continue;
        }
        used.insert(squared.clone());
        return group.element(squared);
    }
    Err(CryptoError::PreconditionViolated(format!(
        "failed to derive a commitment generator for label {label} after 1000 attempts"
    )))
}
