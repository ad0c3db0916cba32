//! Deterministic, queue-backed randomness source for fixture-driven tests.
//!
//! Unlike seeding a CSPRNG (which is deterministic but opaque — the caller
//! can't predict which values come out), [`QueuedRandomness`] replays an
//! exact, caller-supplied sequence of samples. This is what lets a
//! cross-implementation JSON test vector ("the prover drew these exact
//! exponents") be replayed bit-exactly, and it enforces the "one draw per
//! documented sample" contract from the spec's concurrency model: every
//! queued value must be consumed exactly once, in order, or the fixture was
//! wired up wrong.

use std::collections::VecDeque;

use num_bigint::BigUint;

use crate::random::Randomness;

/// A [`Randomness`] source backed by two pre-filled queues (one for
/// `gen_biguint_below`, one for `gen_bytes`), consumed strictly in FIFO
/// order. Panics if more samples are drawn than were queued, or if a queued
/// `BigUint` does not fit the bound it is drawn against — both indicate the
/// fixture does not match the number or shape of samples the protocol under
/// test actually draws.
#[derive(Debug, Default)]
pub struct QueuedRandomness {
    integers: VecDeque<BigUint>,
    bytes: VecDeque<Vec<u8>>,
}

impl QueuedRandomness {
    pub fn new() -> Self {
        QueuedRandomness::default()
    }

    /// Builds a queue pre-filled with `integers`, to be returned in order by
    /// successive `gen_biguint_below` calls.
    pub fn from_integers(integers: impl IntoIterator<Item = BigUint>) -> Self {
        QueuedRandomness {
            integers: integers.into_iter().collect(),
            bytes: VecDeque::new(),
        }
    }

    pub fn push_integer(&mut self, value: BigUint) {
        self.integers.push_back(value);
    }

    pub fn push_bytes(&mut self, value: Vec<u8>) {
        self.bytes.push_back(value);
    }

    /// Number of integer samples not yet consumed; a non-zero value at the
    /// end of a test usually means the fixture over-provisioned samples.
    pub fn remaining_integers(&self) -> usize {
        self.integers.len()
    }
}

impl Randomness for QueuedRandomness {
    fn gen_bytes(&mut self, len: usize) -> Vec<u8> {
        let value = self
            .bytes
            .pop_front()
            .expect("QueuedRandomness: gen_bytes called more times than fixtures were queued");
        assert_eq!(
            value.len(),
            len,
            "QueuedRandomness: queued byte fixture length does not match the requested length"
        );
        value
    }

    fn gen_biguint_below(&mut self, bound: &BigUint) -> BigUint {
        let value = self
            .integers
            .pop_front()
            .expect("QueuedRandomness: gen_biguint_below called more times than fixtures were queued");
        assert!(
            &value < bound,
            "QueuedRandomness: queued integer fixture is not below the requested bound"
        );
        value
    }
}
