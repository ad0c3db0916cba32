//! Single-value-product argument: proves knowledge of an opening `(a, r)`
//! of a commitment `c_a` to a length-`n` vector whose entries multiply to a
//! public value `b`.
//!
//! The identity the argument rests on: for fresh random blinds `d`,
//! `prod(a_i + x*d_i)` is, as a polynomial in the challenge `x`, exactly
//! `sum_{k=0}^{n} x^k * e_k` with `e_n = prod(a_i) = b` and
//! `e_0 = prod(d_i)`. The prover commits to the `n-1` middle coefficients
//! before the challenge is drawn; after the challenge, revealing the
//! blinded vector `z = a + x*d` lets the verifier recompute `prod(z_i)`
//! itself and check it against the committed coefficients homomorphically,
//! without ever learning `a`.

use serde::Serialize;

use crate::commitment::CommitmentKey;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement, ZqGroup};
use crate::hashing::Hashable;
use crate::verification_result::VerificationResult;
use crate::zkp::{commit_scalar, fiat_shamir_challenge, hashable};

#[derive(Debug, Clone, Serialize)]
pub struct SingleValueProductStatement {
    pub ck: CommitmentKey,
    pub c_a: GqElement,
    pub b: ZqElement,
}

#[derive(Debug, Clone)]
pub struct SingleValueProductWitness {
    pub a: Vec<ZqElement>,
    pub r: ZqElement,
}

#[derive(Debug, Clone, Serialize)]
pub enum SingleValueProductProof {
    /// `n == 1`: a direct Schnorr proof that `c_a` opens to `(b, r)`.
    Degenerate { t: GqElement, s: ZqElement },
    General {
        c_d: GqElement,
        e0: ZqElement,
        c_e: Vec<GqElement>,
        z: Vec<ZqElement>,
        z_r: ZqElement,
        s_combined: ZqElement,
    },
}

fn zq_of(b: &ZqElement) -> ZqGroup {
    b.group().clone()
}

/// Multiplies two little-endian coefficient-list polynomials over `Zq`.
fn poly_mul(p: &[ZqElement], q: &[ZqElement], zq: &ZqGroup) -> CryptoResult<Vec<ZqElement>> {
    let mut out = vec![zq.zero(); p.len() + q.len() - 1];
    for (i, pi) in p.iter().enumerate() {
        for (j, qj) in q.iter().enumerate() {
            let term = pi.mul(qj)?;
            out[i + j] = out[i + j].add(&term)?;
        }
    }
    Ok(out)
}

pub fn prove(
    statement: &SingleValueProductStatement,
    witness: &SingleValueProductWitness,
    rng: &mut impl crate::random::Randomness,
) -> CryptoResult<SingleValueProductProof> {
    let n = witness.a.len();
    if statement.ck.n() != n {
        return Err(CryptoError::ShapeError(
            "commitment key size must match the witness length".into(),
        ));
    }
    let zq = zq_of(&statement.b);

    if n == 1 {
        let k = crate::random::random_exponent(&zq, rng);
        let t = statement.ck.h().exp(&k)?;
        let x = fiat_shamir_challenge(&zq, vec![hashable(&statement.c_a), hashable(&t), Hashable::integer(statement.b.value().clone())])?;
        let s = k.add(&x.mul(&witness.r)?)?;
        return Ok(SingleValueProductProof::Degenerate { t, s });
    }

    let d: Vec<ZqElement> = crate::random::random_exponent_vector(&zq, n, rng);
    let r_d = crate::random::random_exponent(&zq, rng);
    let c_d = statement.ck.commit(&d, &r_d)?;

    // P(x) = prod_i (a_i + x d_i), coefficients e_0..e_n little-endian.
    let mut poly = vec![zq.one()];
    for i in 0..n {
        poly = poly_mul(&poly, &[d[i].clone(), witness.a[i].clone()], &zq)?;
    }
    let e0 = poly[0].clone();
    let s_k: Vec<ZqElement> = (1..n).map(|_| crate::random::random_exponent(&zq, rng)).collect();
    let c_e: Vec<GqElement> = (1..n)
        .map(|k| commit_scalar(&statement.ck, &poly[k], &s_k[k - 1]))
        .collect::<CryptoResult<Vec<_>>>()?;

    let mut transcript = vec![hashable(&statement.c_a), Hashable::integer(statement.b.value().clone()), hashable(&c_d), Hashable::integer(e0.value().clone())];
    transcript.extend(c_e.iter().map(hashable));
    let x = fiat_shamir_challenge(&zq, transcript)?;

    let z: Vec<ZqElement> = witness
        .a
        .iter()
        .zip(d.iter())
        .map(|(a_i, d_i)| x.mul(a_i)?.add(d_i))
        .collect::<CryptoResult<Vec<_>>>()?;
    let z_r = x.mul(&witness.r)?.add(&r_d)?;
    let mut s_combined = zq.zero();
    for (k, s) in s_k.iter().enumerate() {
        let power = x.value().modpow(&num_bigint::BigUint::from((k + 1) as u64), zq.order());
        let weighted = zq.element(power)?.mul(s)?;
        s_combined = s_combined.add(&weighted)?;
    }

    Ok(SingleValueProductProof::General {
        c_d,
        e0,
        c_e,
        z,
        z_r,
        s_combined,
    })
}

pub fn verify(statement: &SingleValueProductStatement, proof: &SingleValueProductProof) -> CryptoResult<VerificationResult> {
    let n = statement.ck.n();
    let zq = zq_of(&statement.b);

    match proof {
        SingleValueProductProof::Degenerate { t, s } => {
            if n != 1 {
                return Ok(VerificationResult::failed("degenerate proof used for n != 1"));
            }
            let x = fiat_shamir_challenge(&zq, vec![hashable(&statement.c_a), hashable(t), Hashable::integer(statement.b.value().clone())])?;
            let lhs = statement.ck.h().exp(s)?;
            let target_commitment = statement.ck.commit(&[statement.b.clone()], &zq.zero())?;
            let c_a_over_target = statement.c_a.multiply(&target_commitment.invert())?;
            let rhs = t.multiply(&c_a_over_target.exp(&x)?)?;
            Ok(VerificationResult::check(lhs == rhs, "single-value-product degenerate equation failed"))
        }
        SingleValueProductProof::General { c_d, e0, c_e, z, z_r, s_combined } => {
            if n < 2 {
                return Ok(VerificationResult::failed("general proof requires n >= 2"));
            }
            let mut transcript = vec![hashable(&statement.c_a), Hashable::integer(statement.b.value().clone()), hashable(c_d), Hashable::integer(e0.value().clone())];
            transcript.extend(c_e.iter().map(hashable));
            let x = fiat_shamir_challenge(&zq, transcript)?;

            let mut result = VerificationResult::valid();

            let opening_ok = statement.ck.commit(z, z_r)? == statement.c_a.exp(&x)?.multiply(c_d)?;
            result = result.combine(VerificationResult::check(opening_ok, "svp linear opening check failed"));

            let mut prod_z = zq.one();
            for zi in z {
                prod_z = prod_z.mul(zi)?;
            }
            let x_pow_n = zq.element(x.value().modpow(&num_bigint::BigUint::from(n as u64), zq.order()))?;
            let v = prod_z.sub(&x_pow_n.mul(&statement.b)?)?.sub(e0)?;

            let mut rhs = c_e[0].exp(&x)?;
            for (k, c_ek) in c_e.iter().enumerate().skip(1) {
                let power = x.value().modpow(&num_bigint::BigUint::from((k + 1) as u64), zq.order());
                rhs = rhs.multiply(&c_ek.exp(&zq.element(power)?)?)?;
            }
            let lhs = commit_scalar(&statement.ck, &v, s_combined)?;
            result = result.combine(VerificationResult::check(lhs == rhs, "svp coefficient consistency check failed"));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::GqGroup;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn setup(n: usize) -> (Arc<GqGroup>, CommitmentKey) {
        let group = Arc::new(GqGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap());
        let ck = crate::commitment::derive_commitment_key(&group, n, b"svp-test").unwrap();
        (group, ck)
    }

    #[test]
    fn completeness_for_general_case() {
        let (group, ck) = setup(3);
        let zq = group.corresponding_zq();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let a = vec![zq.element(2u32.into()).unwrap(), zq.element(3u32.into()).unwrap(), zq.element(4u32.into()).unwrap()];
        let r = crate::random::random_exponent(&zq, &mut rng);
        let c_a = ck.commit(&a, &r).unwrap();
        let b = zq.element(24u32.into()).unwrap();
        let statement = SingleValueProductStatement { ck, c_a, b };
        let witness = SingleValueProductWitness { a, r };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(verify(&statement, &proof).unwrap().is_valid());
    }

    #[test]
    fn completeness_for_degenerate_case() {
        let (group, ck) = setup(1);
        let zq = group.corresponding_zq();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let a = vec![zq.element(5u32.into()).unwrap()];
        let r = crate::random::random_exponent(&zq, &mut rng);
        let c_a = ck.commit(&a, &r).unwrap();
        let statement = SingleValueProductStatement { ck, c_a, b: a[0].clone() };
        let witness = SingleValueProductWitness { a, r };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(verify(&statement, &proof).unwrap().is_valid());
    }

    #[test]
    fn rejects_wrong_product() {
        let (group, ck) = setup(3);
        let zq = group.corresponding_zq();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let a = vec![zq.element(2u32.into()).unwrap(), zq.element(3u32.into()).unwrap(), zq.element(4u32.into()).unwrap()];
        let r = crate::random::random_exponent(&zq, &mut rng);
        let c_a = ck.commit(&a, &r).unwrap();
        let wrong_b = zq.element(25u32.into()).unwrap();
        let statement = SingleValueProductStatement { ck, c_a, b: wrong_b };
        let witness = SingleValueProductWitness { a, r };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(!verify(&statement, &proof).unwrap().is_valid());
    }
}
