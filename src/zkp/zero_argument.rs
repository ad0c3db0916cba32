//! Zero argument: proves, for committed vectors `u`, `v`, `w` and a public
//! weight vector, that
//!
//! ```text
//! sum_i weights[i] * (u_i * v_i - w_i) = 0
//! ```
//!
//! This is the bilinear primitive [`crate::zkp::hadamard`] chains to check
//! pairwise element-wise products. The all-ones weight vector with `w` the
//! zero vector recovers the plain "inner product is zero" statement.
//!
//! As with [`crate::zkp::single_value_product`], the polynomial
//! `F(x) = sum_i weights_i * ((u_i+x d_{u,i})(v_i+x d_{v,i}) - (w_i+x d_{w,i}))`
//! has constant term `0` by hypothesis, so it factors as `x*e1 + x^2*e2`;
//! `e2` depends only on the ephemeral blinds and is revealed directly, `e1`
//! is hidden behind a scalar commitment opened via the challenge response.

use serde::Serialize;

use crate::commitment::CommitmentKey;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement, ZqGroup};
use crate::hashing::Hashable;
use crate::random::{random_exponent, random_exponent_vector, Randomness};
use crate::verification_result::VerificationResult;
use crate::zkp::{commit_scalar, fiat_shamir_challenge, hashable};

#[derive(Debug, Clone, Serialize)]
pub struct ZeroArgumentStatement {
    pub ck: CommitmentKey,
    pub c_u: GqElement,
    pub c_v: GqElement,
    pub c_w: GqElement,
    pub weights: Vec<ZqElement>,
}

#[derive(Debug, Clone)]
pub struct ZeroArgumentWitness {
    pub u: Vec<ZqElement>,
    pub r_u: ZqElement,
    pub v: Vec<ZqElement>,
    pub r_v: ZqElement,
    pub w: Vec<ZqElement>,
    pub r_w: ZqElement,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZeroArgumentProof {
    pub c_du: GqElement,
    pub c_dv: GqElement,
    pub c_dw: GqElement,
    pub c_e1: GqElement,
    pub e2: ZqElement,
    pub z_u: Vec<ZqElement>,
    pub z_ru: ZqElement,
    pub z_v: Vec<ZqElement>,
    pub z_rv: ZqElement,
    pub z_w: Vec<ZqElement>,
    pub z_rw: ZqElement,
    pub t: ZqElement,
}

fn weighted_inner(weights: &[ZqElement], a: &[ZqElement], b: &[ZqElement]) -> CryptoResult<ZqElement> {
    let zq = weights[0].group().clone();
    let mut acc = zq.zero();
    for ((wi, ai), bi) in weights.iter().zip(a.iter()).zip(b.iter()) {
        acc = acc.add(&wi.mul(&ai.mul(bi)?)?)?;
    }
    Ok(acc)
}

fn weighted_sum(weights: &[ZqElement], a: &[ZqElement]) -> CryptoResult<ZqElement> {
    let zq = weights[0].group().clone();
    let mut acc = zq.zero();
    for (wi, ai) in weights.iter().zip(a.iter()) {
        acc = acc.add(&wi.mul(ai)?)?;
    }
    Ok(acc)
}

pub fn prove(
    statement: &ZeroArgumentStatement,
    witness: &ZeroArgumentWitness,
    rng: &mut impl Randomness,
) -> CryptoResult<ZeroArgumentProof> {
    let n = statement.ck.n();
    if witness.u.len() != n || witness.v.len() != n || witness.w.len() != n || statement.weights.len() != n {
        return Err(CryptoError::ShapeError(
            "zero argument requires u, v, w, and weights to all have the commitment key's length".into(),
        ));
    }
    let zq: ZqGroup = statement.weights[0].group().clone();

    let d_u = random_exponent_vector(&zq, n, rng);
    let d_v = random_exponent_vector(&zq, n, rng);
    let d_w = random_exponent_vector(&zq, n, rng);
    let r_du = random_exponent(&zq, rng);
    let r_dv = random_exponent(&zq, rng);
    let r_dw = random_exponent(&zq, rng);
    let c_du = statement.ck.commit(&d_u, &r_du)?;
    let c_dv = statement.ck.commit(&d_v, &r_dv)?;
    let c_dw = statement.ck.commit(&d_w, &r_dw)?;

    let e2 = weighted_inner(&statement.weights, &d_u, &d_v)?;
    let cross_uv = weighted_inner(&statement.weights, &witness.u, &d_v)?
        .add(&weighted_inner(&statement.weights, &d_u, &witness.v)?)?;
    let e1 = cross_uv.sub(&weighted_sum(&statement.weights, &d_w)?)?;
    let s1 = random_exponent(&zq, rng);
    let c_e1 = commit_scalar(&statement.ck, &e1, &s1)?;

    let transcript = vec![
        hashable(&statement.c_u),
        hashable(&statement.c_v),
        hashable(&statement.c_w),
        hashable(&c_du),
        hashable(&c_dv),
        hashable(&c_dw),
        hashable(&c_e1),
        Hashable::integer(e2.value().clone()),
    ];
    let x = fiat_shamir_challenge(&zq, transcript)?;

    let blend = |a: &[ZqElement], d: &[ZqElement]| -> CryptoResult<Vec<ZqElement>> {
        a.iter().zip(d.iter()).map(|(ai, di)| x.mul(ai)?.add(di)).collect()
    };
    let z_u = blend(&witness.u, &d_u)?;
    let z_v = blend(&witness.v, &d_v)?;
    let z_w = blend(&witness.w, &d_w)?;
    let z_ru = x.mul(&witness.r_u)?.add(&r_du)?;
    let z_rv = x.mul(&witness.r_v)?.add(&r_dv)?;
    let z_rw = x.mul(&witness.r_w)?.add(&r_dw)?;
    let t = x.mul(&s1)?;

    Ok(ZeroArgumentProof {
        c_du,
        c_dv,
        c_dw,
        c_e1,
        e2,
        z_u,
        z_ru,
        z_v,
        z_rv,
        z_w,
        z_rw,
        t,
    })
}

pub fn verify(statement: &ZeroArgumentStatement, proof: &ZeroArgumentProof) -> CryptoResult<VerificationResult> {
    let zq = statement.weights[0].group().clone();
    let transcript = vec![
        hashable(&statement.c_u),
        hashable(&statement.c_v),
        hashable(&statement.c_w),
        hashable(&proof.c_du),
        hashable(&proof.c_dv),
        hashable(&proof.c_dw),
        hashable(&proof.c_e1),
        Hashable::integer(proof.e2.value().clone()),
    ];
    let x = fiat_shamir_challenge(&zq, transcript)?;

    let mut result = VerificationResult::valid();
    result = result.combine(VerificationResult::check(
        statement.ck.commit(&proof.z_u, &proof.z_ru)? == statement.c_u.exp(&x)?.multiply(&proof.c_du)?,
        "zero argument: u-opening check failed",
    ));
    result = result.combine(VerificationResult::check(
        statement.ck.commit(&proof.z_v, &proof.z_rv)? == statement.c_v.exp(&x)?.multiply(&proof.c_dv)?,
        "zero argument: v-opening check failed",
    ));
    result = result.combine(VerificationResult::check(
        statement.ck.commit(&proof.z_w, &proof.z_rw)? == statement.c_w.exp(&x)?.multiply(&proof.c_dw)?,
        "zero argument: w-opening check failed",
    ));

    let inner = weighted_inner(&statement.weights, &proof.z_u, &proof.z_v)?;
    let sum_w = weighted_sum(&statement.weights, &proof.z_w)?;
    let x_sq = x.mul(&x)?;
    let v = inner.sub(&sum_w)?.sub(&x_sq.mul(&proof.e2)?)?;
    let lhs = commit_scalar(&statement.ck, &v, &proof.t)?;
    let rhs = proof.c_e1.exp(&x)?;
    result = result.combine(VerificationResult::check(lhs == rhs, "zero argument: coefficient consistency check failed"));

    Ok(result)
}
