//! The quadratic-residue subgroup `Gq` of `(Z/pZ)*` where `p = 2q+1` is a
//! safe prime, together with its elements.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::bignat;
use crate::containers::GroupObject;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::zq::{ZqElement, ZqGroup};

/// The carrier `(p, q, g)` of the prime-order subgroup `Gq` of `Z/pZ`.
///
/// Two `GqGroup`s are considered the same group iff their `(p, q, g)`
/// triples are equal; this is the basis for the `GroupMismatch` check that
/// every binary group operation performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GqGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl GqGroup {
    /// Builds a `GqGroup`, checking `p = 2q+1`, that both are (probabilistic)
    /// primes, and that `g` is a generator candidate (`1 < g < p`, `g != 1`,
    /// and `g` is a quadratic residue mod `p`).
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> CryptoResult<Self> {
        let two = BigUint::from(2u32);
        if &two * &q + BigUint::one() != p {
            return Err(CryptoError::InvalidInput(
                "p must equal 2q+1 for a safe-prime group".into(),
            ));
        }
        if !bignat::is_probable_prime(&p, 20) {
            return Err(CryptoError::InvalidInput("p is not prime".into()));
        }
        if !bignat::is_probable_prime(&q, 20) {
            return Err(CryptoError::InvalidInput("q is not prime".into()));
        }
        if g <= BigUint::one() || g >= p {
            return Err(CryptoError::InvalidInput(
                "generator must satisfy 1 < g < p".into(),
            ));
        }
        let group = GqGroup { p, q, g: g.clone() };
        if !group.is_quadratic_residue(&g) {
            return Err(CryptoError::InvalidInput(
                "g is not a quadratic residue mod p".into(),
            ));
        }
        Ok(group)
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g_value(&self) -> &BigUint {
        &self.g
    }

    fn is_quadratic_residue(&self, v: &BigUint) -> bool {
        v.modpow(&self.q, &self.p) == BigUint::one()
    }

    /// `1 <= v < p` and `v^q = 1 (mod p)`.
    pub fn is_member(&self, v: &BigUint) -> bool {
        v >= &BigUint::one() && v < &self.p && self.is_quadratic_residue(v)
    }

    /// Builds the `Zq` group that pairs with this `Gq` (same order `q`).
    pub fn corresponding_zq(self: &Arc<Self>) -> ZqGroup {
        ZqGroup::new(self.q.clone())
    }

    /// The identity element `1`.
    pub fn identity(self: &Arc<Self>) -> GqElement {
        GqElement {
            value: BigUint::one(),
            group: self.clone(),
        }
    }

    /// The group's distinguished generator `g`.
    pub fn generator(self: &Arc<Self>) -> GqElement {
        GqElement {
            value: self.g.clone(),
            group: self.clone(),
        }
    }

    /// Constructs a member element, failing with `InvalidInput` if `v` is
    /// not a member of this group.
    pub fn element(self: &Arc<Self>, v: BigUint) -> CryptoResult<GqElement> {
        if !self.is_member(&v) {
            return Err(CryptoError::InvalidInput(format!(
                "{v} is not a member of Gq (p={}, q={})",
                self.p, self.q
            )));
        }
        Ok(GqElement {
            value: v,
            group: self.clone(),
        })
    }

    /// Returns the first `r` small primes that are members of this group,
    /// iterating odd candidates from 5 upward by +-2 and skipping
    /// non-members.
    ///
    /// Fails distinctly for each of the three documented preconditions:
    /// `r >= 10000`, `r > q - 4`, and `g` not in `{2, 3, 4}`.
    pub fn small_prime_group_members(self: &Arc<Self>, r: usize) -> CryptoResult<Vec<GqElement>> {
        if r >= 10_000 {
            return Err(CryptoError::PreconditionViolated(
                "r must be less than 10000".into(),
            ));
        }
        let four = BigUint::from(4u32);
        if self.q < four || BigUint::from(r) > &self.q - &four {
            return Err(CryptoError::PreconditionViolated(
                "r must not exceed q - 4".into(),
            ));
        }
        let allowed_generators: [u32; 3] = [2, 3, 4];
        if !allowed_generators
            .iter()
            .any(|g| BigUint::from(*g) == self.g)
        {
            return Err(CryptoError::PreconditionViolated(
                "g must be one of {2, 3, 4} to enumerate small prime members".into(),
            ));
        }

        let mut found = Vec::with_capacity(r);
        let mut candidate = BigUint::from(5u32);

        while found.len() < r {
            if candidate >= self.p {
                return Err(CryptoError::PreconditionViolated(format!(
                    "fewer than {r} small prime members exist below p"
                )));
            }
            if bignat::is_probable_prime(&candidate, 16) && self.is_member(&candidate) {
                found.push(self.element(candidate.clone())?);
            }
            candidate += BigUint::from(2u32);
        }
        Ok(found)
    }
}

/// An element of `Gq`: an integer in `1..p` that is a quadratic residue
/// mod `p`. Every operation that produces a new element carries the same
/// group reference as its operands.
///
/// `GqElement` itself only serializes as its bare integer value: the group
/// context (`p`, `q`, `g`) is carried once per test vector or wire message
/// rather than duplicated on every element, so deserializing a standalone
/// `GqElement` is not possible — reconstruct it via [`GqGroup::element`].
#[derive(Debug, Clone)]
pub struct GqElement {
    value: BigUint,
    group: Arc<GqGroup>,
}

impl PartialEq for GqElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.group == other.group
    }
}
impl Eq for GqElement {}

impl Serialize for GqElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.to_str_radix(10).serialize(serializer)
    }
}

impl GroupObject for GqElement {
    type GroupKey = Arc<GqGroup>;

    fn group_key(&self) -> Self::GroupKey {
        self.group.clone()
    }

    fn element_size(&self) -> usize {
        1
    }
}

impl GqElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        &self.group
    }

    fn check_same_group(&self, other: &GqGroup) -> CryptoResult<()> {
        if self.group.as_ref() != other {
            return Err(CryptoError::GroupMismatch(
                "operands belong to different Gq groups".into(),
            ));
        }
        Ok(())
    }

    /// `self * other mod p`.
    pub fn multiply(&self, other: &GqElement) -> CryptoResult<GqElement> {
        self.check_same_group(&other.group)?;
        Ok(GqElement {
            value: bignat::mul_mod(&self.value, &other.value, &self.group.p),
            group: self.group.clone(),
        })
    }

    /// `self ^ exponent mod p`, where `exponent` lives in the paired `Zq`.
    pub fn exp(&self, exponent: &ZqElement) -> CryptoResult<GqElement> {
        if exponent.group().order() != &self.group.q {
            return Err(CryptoError::GroupMismatch(
                "exponent's Zq order does not match this element's Gq order".into(),
            ));
        }
        Ok(GqElement {
            value: bignat::pow_mod(&self.value, exponent.value(), &self.group.p),
            group: self.group.clone(),
        })
    }

    /// `self^-1 mod p`, computed as `self^(p-2) mod p`.
    pub fn invert(&self) -> GqElement {
        let p_minus_two = &self.group.p - BigUint::from(2u32);
        GqElement {
            value: bignat::pow_mod(&self.value, &p_minus_two, &self.group.p),
            group: self.group.clone(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.value == BigUint::one()
    }
}
