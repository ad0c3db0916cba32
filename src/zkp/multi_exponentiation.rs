//! Multi-exponentiation argument: proves knowledge of a committed exponent
//! vector `e` and a re-randomization exponent `rho` such that
//!
//! ```text
//! prod_i(inputs[i] ^ e_i) * Enc(pk, ones; rho) = target
//! ```
//!
//! for public ElGamal ciphertexts `inputs` and `target`. This is the
//! piece of the shuffle argument that ties a (committed, permutation-shaped)
//! exponent vector to the actual re-encrypted output ciphertexts.

use serde::Serialize;

use crate::commitment::CommitmentKey;
use crate::elgamal::{self, Ciphertext, ElGamalPublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement};
use crate::hashing::Hashable;
use crate::random::{random_exponent, random_exponent_vector, Randomness};
use crate::verification_result::VerificationResult;
use crate::zkp::{fiat_shamir_challenge, hashable};

#[derive(Debug, Clone, Serialize)]
pub struct MultiExponentiationStatement {
    pub ck: CommitmentKey,
    pub pk: ElGamalPublicKey,
    pub inputs: Vec<Ciphertext>,
    pub target: Ciphertext,
    pub c_e: GqElement,
}

#[derive(Debug, Clone)]
pub struct MultiExponentiationWitness {
    pub e: Vec<ZqElement>,
    pub r_e: ZqElement,
    pub rho: ZqElement,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiExponentiationProof {
    pub c_d: GqElement,
    pub t_d: Ciphertext,
    pub z: Vec<ZqElement>,
    pub z_r: ZqElement,
    pub z_rho: ZqElement,
}

fn combine(inputs: &[Ciphertext], exponents: &[ZqElement]) -> CryptoResult<Ciphertext> {
    if inputs.len() != exponents.len() || inputs.is_empty() {
        return Err(CryptoError::ShapeError(
            "multi-exponentiation requires one exponent per input ciphertext".into(),
        ));
    }
    let mut acc = inputs[0].exponentiate(&exponents[0])?;
    for (ct, e) in inputs.iter().zip(exponents.iter()).skip(1) {
        acc = acc.multiply(&ct.exponentiate(e)?)?;
    }
    Ok(acc)
}

pub fn prove(
    statement: &MultiExponentiationStatement,
    witness: &MultiExponentiationWitness,
    rng: &mut impl Randomness,
) -> CryptoResult<MultiExponentiationProof> {
    let n = statement.ck.n();
    if witness.e.len() != n || statement.inputs.len() != n {
        return Err(CryptoError::ShapeError(
            "multi-exponentiation witness/instance length must match the commitment key".into(),
        ));
    }
    let zq = statement.ck.group().corresponding_zq();

    let d = random_exponent_vector(&zq, n, rng);
    let r_d = random_exponent(&zq, rng);
    let rho_d = random_exponent(&zq, rng);
    let c_d = statement.ck.commit(&d, &r_d)?;
    let t_d = combine(&statement.inputs, &d)?.multiply(&elgamal::ones(&statement.pk, &rho_d)?)?;

    let mut transcript = vec![
        hashable(&statement.c_e),
        hashable(statement.target.gamma()),
        hashable(&c_d),
        hashable(t_d.gamma()),
    ];
    transcript.extend(statement.target.phis().iter().map(hashable));
    transcript.extend(t_d.phis().iter().map(hashable));
    let x = fiat_shamir_challenge(&zq, transcript)?;

    let z: Vec<ZqElement> = witness.e.iter().zip(d.iter()).map(|(ei, di)| x.mul(ei)?.add(di)).collect::<CryptoResult<Vec<_>>>()?;
    let z_r = x.mul(&witness.r_e)?.add(&r_d)?;
    let z_rho = x.mul(&witness.rho)?.add(&rho_d)?;

    Ok(MultiExponentiationProof { c_d, t_d, z, z_r, z_rho })
}

pub fn verify(statement: &MultiExponentiationStatement, proof: &MultiExponentiationProof) -> CryptoResult<VerificationResult> {
    let zq = statement.ck.group().corresponding_zq();

    let mut transcript = vec![
        hashable(&statement.c_e),
        hashable(statement.target.gamma()),
        hashable(&proof.c_d),
        hashable(proof.t_d.gamma()),
    ];
    transcript.extend(statement.target.phis().iter().map(hashable));
    transcript.extend(proof.t_d.phis().iter().map(hashable));
    let x = fiat_shamir_challenge(&zq, transcript)?;

    let mut result = VerificationResult::valid();
    let opening_ok = statement.ck.commit(&proof.z, &proof.z_r)? == statement.c_e.exp(&x)?.multiply(&proof.c_d)?;
    result = result.combine(VerificationResult::check(opening_ok, "multi-exponentiation: exponent-opening check failed"));

    let lhs = combine(&statement.inputs, &proof.z)?.multiply(&elgamal::ones(&statement.pk, &proof.z_rho)?)?;
    let rhs = statement.target.exponentiate(&x)?.multiply(&proof.t_d)?;
    result = result.combine(VerificationResult::check(lhs == rhs, "multi-exponentiation: combination check failed"));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::ElGamalKeyPair;
    use crate::groups::GqGroup;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn setup(n: usize) -> (Arc<GqGroup>, CommitmentKey, ElGamalPublicKey, ElGamalKeyPair) {
        let group = Arc::new(GqGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap());
        let ck = crate::commitment::derive_commitment_key(&group, n, b"multiexp-test").unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(40);
        let kp = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp.public_key().clone()]).unwrap();
        (group, ck, pk, kp)
    }

    #[test]
    fn completeness_of_the_combination_relation() {
        let (group, ck, pk, _kp) = setup(2);
        let mut rng = rand::rngs::StdRng::seed_from_u64(41);
        let zq = group.corresponding_zq();

        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        let ct1 = elgamal::encrypt(&pk, &[m1], &random_exponent(&zq, &mut rng)).unwrap();
        let ct2 = elgamal::encrypt(&pk, &[m2], &random_exponent(&zq, &mut rng)).unwrap();
        let inputs = vec![ct1, ct2];

        let e = vec![zq.element(3u32.into()).unwrap(), zq.element(5u32.into()).unwrap()];
        let rho = random_exponent(&zq, &mut rng);
        let target = combine(&inputs, &e).unwrap().multiply(&elgamal::ones(&pk, &rho).unwrap()).unwrap();

        let r_e = random_exponent(&zq, &mut rng);
        let c_e = ck.commit(&e, &r_e).unwrap();

        let statement = MultiExponentiationStatement { ck, pk, inputs, target, c_e };
        let witness = MultiExponentiationWitness { e, r_e, rho };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(verify(&statement, &proof).unwrap().is_valid());
    }

    #[test]
    fn rejects_a_wrong_target() {
        let (group, ck, pk, _kp) = setup(2);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let zq = group.corresponding_zq();

        let m1 = group.element(BigUint::from(4u32)).unwrap();
        let m2 = group.element(BigUint::from(6u32)).unwrap();
        let ct1 = elgamal::encrypt(&pk, &[m1], &random_exponent(&zq, &mut rng)).unwrap();
        let ct2 = elgamal::encrypt(&pk, &[m2], &random_exponent(&zq, &mut rng)).unwrap();
        let inputs = vec![ct1, ct2];

        let e = vec![zq.element(3u32.into()).unwrap(), zq.element(5u32.into()).unwrap()];
        let rho = random_exponent(&zq, &mut rng);
        let wrong_rho = random_exponent(&zq, &mut rng);
        let target = combine(&inputs, &e).unwrap().multiply(&elgamal::ones(&pk, &wrong_rho).unwrap()).unwrap();

        let r_e = random_exponent(&zq, &mut rng);
        let c_e = ck.commit(&e, &r_e).unwrap();

        let statement = MultiExponentiationStatement { ck, pk, inputs, target, c_e };
        let witness = MultiExponentiationWitness { e, r_e, rho };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(!verify(&statement, &proof).unwrap().is_valid());
    }
}
