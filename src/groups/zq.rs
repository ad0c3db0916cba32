//! `Zq`: the additive/multiplicative group of integers modulo the order
//! `q` of a paired `Gq` subgroup.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::bignat;
use crate::containers::GroupObject;
use crate::error::{CryptoError, CryptoResult};

/// The carrier of `Zq`: just its modulus `q`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZqGroup {
    q: BigUint,
}

impl ZqGroup {
    pub fn new(q: BigUint) -> Self {
        ZqGroup { q }
    }

    pub fn order(&self) -> &BigUint {
        &self.q
    }

    pub fn zero(&self) -> ZqElement {
        ZqElement {
            value: BigUint::zero(),
            group: self.clone(),
        }
    }

    pub fn one(&self) -> ZqElement {
        ZqElement {
            value: BigUint::one() % &self.q,
            group: self.clone(),
        }
    }

    /// Builds an element, reducing `v` modulo `q`. `ZqElement` is always
    /// non-negative and `< q`, so any non-negative `v` is accepted and
    /// normalized rather than rejected.
    pub fn element(&self, v: BigUint) -> CryptoResult<ZqElement> {
        if self.q.is_zero() {
            return Err(CryptoError::InvalidInput("Zq order must be nonzero".into()));
        }
        Ok(ZqElement {
            value: v % &self.q,
            group: self.clone(),
        })
    }
}

/// An element of `Zq`: an integer in `[0, q)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZqElement {
    value: BigUint,
    group: ZqGroup,
}

impl ZqElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn group(&self) -> &ZqGroup {
        &self.group
    }

    fn check_same_group(&self, other: &ZqGroup) -> CryptoResult<()> {
        if &self.group != other {
            return Err(CryptoError::GroupMismatch(
                "operands belong to different Zq groups".into(),
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &ZqElement) -> CryptoResult<ZqElement> {
        self.check_same_group(&other.group)?;
        Ok(ZqElement {
            value: (&self.value + &other.value) % &self.group.q,
            group: self.group.clone(),
        })
    }

    pub fn sub(&self, other: &ZqElement) -> CryptoResult<ZqElement> {
        self.check_same_group(&other.group)?;
        let q = &self.group.q;
        let value = ((&self.value + q) - &other.value) % q;
        Ok(ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    pub fn mul(&self, other: &ZqElement) -> CryptoResult<ZqElement> {
        self.check_same_group(&other.group)?;
        Ok(ZqElement {
            value: bignat::mul_mod(&self.value, &other.value, &self.group.q),
            group: self.group.clone(),
        })
    }

    pub fn negate(&self) -> ZqElement {
        let q = &self.group.q;
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            q - &self.value
        };
        ZqElement {
            value,
            group: self.group.clone(),
        }
    }

    /// Multiplicative inverse modulo `q`; `None` if `self` is zero (or, in
    /// the degenerate case, not coprime to `q`).
    pub fn invert(&self) -> Option<ZqElement> {
        bignat::inv_mod(&self.value, &self.group.q).map(|value| ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn from_u64(group: &ZqGroup, n: u64) -> ZqElement {
        ZqElement {
            value: BigUint::from(n) % &group.q,
            group: group.clone(),
        }
    }
}

impl GroupObject for ZqElement {
    type GroupKey = ZqGroup;

    fn group_key(&self) -> Self::GroupKey {
        self.group.clone()
    }

    fn element_size(&self) -> usize {
        1
    }
}

/// Overwrites this element's value with zero in place. `BigUint` does not
/// itself implement `Zeroize` (it is a thin `Vec<u32>` wrapper with no
/// guaranteed non-reallocating in-place clear), so this is the same
/// best-effort "overwrite the value, drop the old allocation" pattern used
/// for secret scalars wrapped around general-purpose bignum types elsewhere
/// in the ecosystem, rather than a guaranteed no-trace memory scrub.
impl Zeroize for ZqElement {
    fn zeroize(&mut self) {
        self.value = BigUint::zero();
    }
}
