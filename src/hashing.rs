//! The recursive hash used for Fiat-Shamir challenges and commitment-key
//! derivation.
//!
//! Every value fed to the transcript is one of four shapes (`Hashable`).
//! Byte-strings, text, and integers hash their canonical byte encoding
//! directly; a singleton list is transparent (`recursiveHash([x]) ==
//! recursiveHash(x)`, required by the idempotence property callers rely on
//! to wrap a single statement field in a list without changing its digest);
//! a list of two or more items hashes the concatenation of its children's
//! own digests, so the recursion's domain separation comes from structure
//! (how many digests are concatenated, and at what depth) rather than a
//! leading type tag. An empty list is rejected rather than silently hashing
//! to the same digest as "no list at all".

use num_bigint::BigUint;
use sha3::{Digest, Sha3_256};

use crate::bignat;
use crate::error::{CryptoError, CryptoResult};

/// A value that can be absorbed into the recursive hash.
#[derive(Debug, Clone)]
pub enum Hashable {
    Bytes(Vec<u8>),
    Text(String),
    Integer(BigUint),
    List(Vec<Hashable>),
}

impl Hashable {
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Hashable::Bytes(b.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Hashable::Text(s.into())
    }

    pub fn integer(n: BigUint) -> Self {
        Hashable::Integer(n)
    }

    pub fn list(items: Vec<Hashable>) -> Self {
        Hashable::List(items)
    }
}

/// Returns the digest of a single [`Hashable`] tree, using the library's
/// default digest algorithm (SHA3-256).
pub fn recursive_hash(value: &Hashable) -> CryptoResult<[u8; 32]> {
    match value {
        Hashable::Bytes(b) => Ok(Sha3_256::digest(b).into()),
        Hashable::Text(s) => Ok(Sha3_256::digest(s.as_bytes()).into()),
        Hashable::Integer(n) => Ok(Sha3_256::digest(bignat::integer_to_bytes(n)).into()),
        Hashable::List(items) => {
            if items.is_empty() {
                return Err(CryptoError::InvalidInput(
                    "recursive hash input lists must be non-empty".into(),
                ));
            }
            if items.len() == 1 {
                return recursive_hash(&items[0]);
            }
            let mut concatenated = Vec::with_capacity(items.len() * 32);
            for item in items {
                concatenated.extend_from_slice(&recursive_hash(item)?);
            }
            Ok(Sha3_256::digest(&concatenated).into())
        }
    }
}

/// Hashes a top-level list of values, which is the shape every Fiat-Shamir
/// challenge derivation in this crate uses
/// (`recursive_hash(&Hashable::list(vec![...]))`).
pub fn hash_elements(elements: Vec<Hashable>) -> CryptoResult<[u8; 32]> {
    recursive_hash(&Hashable::list(elements))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_integer_with_same_bytes_do_not_collide() {
        let as_text = Hashable::text("12");
        let as_integer = Hashable::integer(BigUint::from(12u32));
        assert_ne!(recursive_hash(&as_text).unwrap(), recursive_hash(&as_integer).unwrap());
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(recursive_hash(&Hashable::list(vec![])).is_err());
    }

    #[test]
    fn hash_is_deterministic() {
        let v = Hashable::list(vec![Hashable::text("a"), Hashable::integer(BigUint::from(7u32))]);
        assert_eq!(recursive_hash(&v).unwrap(), recursive_hash(&v).unwrap());
    }

    #[test]
    fn list_order_is_significant() {
        let a = Hashable::list(vec![Hashable::text("a"), Hashable::text("b")]);
        let b = Hashable::list(vec![Hashable::text("b"), Hashable::text("a")]);
        assert_ne!(recursive_hash(&a).unwrap(), recursive_hash(&b).unwrap());
    }

    #[test]
    fn singleton_list_is_idempotent() {
        let x = Hashable::text("a");
        let wrapped = Hashable::list(vec![Hashable::text("a")]);
        assert_eq!(recursive_hash(&x).unwrap(), recursive_hash(&wrapped).unwrap());
    }

    #[test]
    fn singleton_wrapping_is_transparent_through_nesting() {
        // A length-2 list and a singleton list wrapping that same length-2
        // list must hash identically, since the outer singleton is
        // transparent by the idempotence rule.
        let flat = Hashable::list(vec![Hashable::text("a"), Hashable::text("b")]);
        let nested = Hashable::list(vec![Hashable::list(vec![Hashable::text("a"), Hashable::text("b")])]);
        assert_eq!(recursive_hash(&flat).unwrap(), recursive_hash(&nested).unwrap());
    }
}
