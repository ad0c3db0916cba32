//! Hadamard argument: proves that a committed vector `b` (length `n`) is
//! the element-wise (Hadamard) product of the `m` committed columns of a
//! matrix `A`.
//!
//! The chain of partial products `P_1 = A_1`, `P_k = P_{k-1} circ A_k` is
//! committed column by column; each consecutive pair is checked with one
//! [`crate::zkp::zero_argument`] instance, weighted by the powers of a
//! fresh per-step Fiat-Shamir challenge so that a single weighted-sum-is-
//! zero check implies the per-coordinate equality (Schwartz-Zippel) rather
//! than just its sum.

use serde::Serialize;

use crate::commitment::CommitmentKey;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement, ZqGroup};
use crate::hashing::Hashable;
use crate::random::Randomness;
use crate::verification_result::VerificationResult;
use crate::zkp::zero_argument::{self, ZeroArgumentProof, ZeroArgumentStatement, ZeroArgumentWitness};
use crate::zkp::{fiat_shamir_challenge, hashable};

#[derive(Debug, Clone, Serialize)]
pub struct HadamardStatement {
    pub ck: CommitmentKey,
    pub c_a: Vec<GqElement>,
    pub c_b: GqElement,
}

#[derive(Debug, Clone)]
pub struct HadamardWitness {
    pub a: Vec<Vec<ZqElement>>,
    pub r_a: Vec<ZqElement>,
    pub b: Vec<ZqElement>,
    pub r_b: ZqElement,
}

#[derive(Debug, Clone, Serialize)]
pub struct HadamardProof {
    pub c_intermediate: Vec<GqElement>,
    pub steps: Vec<ZeroArgumentProof>,
}

fn powers(y: &ZqElement, n: usize) -> CryptoResult<Vec<ZqElement>> {
    let zq = y.group().clone();
    let mut out = Vec::with_capacity(n);
    let mut cur = zq.one();
    for _ in 0..n {
        cur = cur.mul(y)?;
        out.push(cur.clone());
    }
    Ok(out)
}

fn zq_order(ck: &CommitmentKey) -> ZqGroup {
    ck.group().corresponding_zq()
}

pub fn prove(
    statement: &HadamardStatement,
    witness: &HadamardWitness,
    rng: &mut impl Randomness,
) -> CryptoResult<HadamardProof> {
    let m = witness.a.len();
    let n = statement.ck.n();
    if m == 0 || statement.c_a.len() != m {
        return Err(CryptoError::ShapeError("hadamard argument requires at least one column".into()));
    }
    if witness.b.len() != n {
        return Err(CryptoError::ShapeError("witness b must have the commitment key's length".into()));
    }

    if m == 1 {
        return Err(CryptoError::InvalidInput(
            "hadamard argument requires m >= 2; m = 1 is ill-defined".into(),
        ));
    }

    let zq = zq_order(&statement.ck);
    let mut partials: Vec<Vec<ZqElement>> = vec![witness.a[0].clone()];
    let mut partial_r: Vec<ZqElement> = vec![witness.r_a[0].clone()];
    for k in 1..m {
        let prev = &partials[k - 1];
        let next: Vec<ZqElement> = prev
            .iter()
            .zip(witness.a[k].iter())
            .map(|(p, a)| p.mul(a))
            .collect::<CryptoResult<Vec<_>>>()?;
        partials.push(next);
        // only the final partial product's randomness is fixed (to r_b); intermediate
        // commitments use fresh randomness chosen by the prover.
        if k == m - 1 {
            partial_r.push(witness.r_b.clone());
        } else {
            partial_r.push(crate::random::random_exponent(&zq, rng));
        }
    }

    let mut c_intermediate = Vec::with_capacity(m.saturating_sub(2));
    for k in 1..m - 1 {
        c_intermediate.push(statement.ck.commit(&partials[k], &partial_r[k])?);
    }

    let mut steps = Vec::with_capacity(m - 1);
    for k in 1..m {
        let c_prev = if k == 1 { statement.c_a[0].clone() } else { c_intermediate[k - 2].clone() };
        let c_cur = if k == m - 1 { statement.c_b.clone() } else { c_intermediate[k - 1].clone() };
        let transcript = vec![
            hashable(&c_prev),
            hashable(&statement.c_a[k]),
            hashable(&c_cur),
            Hashable::text(format!("hadamard-step-{k}")),
        ];
        let y = fiat_shamir_challenge(&zq, transcript)?;
        let weights = powers(&y, n)?;

        let step_statement = ZeroArgumentStatement {
            ck: statement.ck.clone(),
            c_u: c_prev,
            c_v: statement.c_a[k].clone(),
            c_w: c_cur,
            weights,
        };
        let step_witness = ZeroArgumentWitness {
            u: partials[k - 1].clone(),
            r_u: partial_r[k - 1].clone(),
            v: witness.a[k].clone(),
            r_v: witness.r_a[k].clone(),
            w: partials[k].clone(),
            r_w: partial_r[k].clone(),
        };
        steps.push(zero_argument::prove(&step_statement, &step_witness, rng)?);
    }

    Ok(HadamardProof { c_intermediate, steps })
}

pub fn verify(statement: &HadamardStatement, proof: &HadamardProof) -> CryptoResult<VerificationResult> {
    let m = statement.c_a.len();
    let n = statement.ck.n();
    let zq = zq_order(&statement.ck);

    if m == 1 {
        return Err(CryptoError::InvalidInput(
            "hadamard argument requires m >= 2; m = 1 is ill-defined".into(),
        ));
    }
    if proof.steps.len() != m - 1 || proof.c_intermediate.len() != m.saturating_sub(2) {
        return Ok(VerificationResult::failed("hadamard proof has the wrong number of steps"));
    }

    let mut result = VerificationResult::valid();
    for k in 1..m {
        let c_prev = if k == 1 { statement.c_a[0].clone() } else { proof.c_intermediate[k - 2].clone() };
        let c_cur = if k == m - 1 { statement.c_b.clone() } else { proof.c_intermediate[k - 1].clone() };
        let transcript = vec![
            hashable(&c_prev),
            hashable(&statement.c_a[k]),
            hashable(&c_cur),
            Hashable::text(format!("hadamard-step-{k}")),
        ];
        let y = fiat_shamir_challenge(&zq, transcript)?;
        let weights = powers(&y, n)?;
        let step_statement = ZeroArgumentStatement {
            ck: statement.ck.clone(),
            c_u: c_prev,
            c_v: statement.c_a[k].clone(),
            c_w: c_cur,
            weights,
        };
        result = result.combine(zero_argument::verify(&step_statement, &proof.steps[k - 1])?);
    }
    Ok(result)
}
