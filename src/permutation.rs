//! Permutations of `{0, ..., n-1}`: the witness a shuffle argument proves
//! knowledge of, and the service that draws one uniformly at random via
//! Fisher-Yates.

use crate::error::{CryptoError, CryptoResult};
use crate::random::Randomness;

/// A permutation of `{0, ..., n-1}`, stored as `sigma` where `sigma[i]` is
/// the new position of the element originally at index `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    sigma: Vec<usize>,
}

impl Permutation {
    /// Validates that `sigma` is a bijection on `{0, ..., sigma.len()-1}`.
    pub fn new(sigma: Vec<usize>) -> CryptoResult<Self> {
        let n = sigma.len();
        let mut seen = vec![false; n];
        for &s in &sigma {
            if s >= n || seen[s] {
                return Err(CryptoError::InvalidInput(
                    "sigma must be a bijection on {0, ..., n-1}".into(),
                ));
            }
            seen[s] = true;
        }
        Ok(Permutation { sigma })
    }

    pub fn identity(n: usize) -> Self {
        Permutation { sigma: (0..n).collect() }
    }

    pub fn len(&self) -> usize {
        self.sigma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sigma.is_empty()
    }

    pub fn at(&self, i: usize) -> usize {
        self.sigma[i]
    }

    /// Checked variant of [`Permutation::at`] for callers handling
    /// caller-supplied indices rather than an internal `0..n` loop bound.
    pub fn get(&self, i: usize) -> CryptoResult<usize> {
        self.sigma.get(i).copied().ok_or_else(|| {
            CryptoError::InvalidInput(format!("index {i} out of range for a permutation of length {}", self.sigma.len()))
        })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sigma
    }

    /// Applies the permutation to `items`: the value at index `i` moves to
    /// index `sigma[i]` in the result.
    pub fn apply<T: Clone>(&self, items: &[T]) -> CryptoResult<Vec<T>> {
        if items.len() != self.sigma.len() {
            return Err(CryptoError::ShapeError(format!(
                "permutation of length {} cannot be applied to {} items",
                self.sigma.len(),
                items.len()
            )));
        }
        let mut out = items.to_vec();
        for (i, item) in items.iter().enumerate() {
            out[self.sigma[i]] = item.clone();
        }
        Ok(out)
    }

    /// The inverse permutation, `tau` such that `tau[sigma[i]] == i`.
    pub fn inverse(&self) -> Permutation {
        let mut tau = vec![0usize; self.sigma.len()];
        for (i, &s) in self.sigma.iter().enumerate() {
            tau[s] = i;
        }
        Permutation { sigma: tau }
    }

    /// Draws a permutation of `{0, ..., n-1}` uniformly at random via
    /// Fisher-Yates.
    pub fn random(n: usize, rng: &mut impl Randomness) -> Permutation {
        let mut values: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let bound = num_bigint::BigUint::from(i as u64 + 1);
            let j = bignat_to_usize(rng.gen_biguint_below(&bound));
            values.swap(i, j);
        }
        // `values[i]` now holds the value that should end up at position i;
        // invert it into the `sigma[i] = new position of i` convention.
        let mut sigma = vec![0usize; n];
        for (new_pos, &original) in values.iter().enumerate() {
            sigma[original] = new_pos;
        }
        Permutation { sigma }
    }
}

fn bignat_to_usize(v: num_bigint::BigUint) -> usize {
    let digits = v.to_u64_digits();
    digits.first().copied().unwrap_or(0) as usize
}
