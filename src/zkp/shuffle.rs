//! The shuffle argument: proves that a public list of output ciphertexts is
//! a permutation of a public list of input ciphertexts, each re-randomized,
//! without revealing the permutation or any re-randomization exponent.
//!
//! Two challenges tie everything together. First, `u` is derived from the
//! full (input, output) transcript; the prover commits to
//! `psi_i = u^{sigma(i)+1}` where `sigma` is the secret permutation. Second,
//! `t` is derived from that commitment; [`single_value_product`] proves
//! `{psi_i}` is, with overwhelming probability (Schwartz-Zippel over `t`), a
//! permutation of `{u^1, ..., u^n}` — i.e. that `sigma` really is a
//! permutation rather than an arbitrary exponent vector. Finally
//! [`multi_exponentiation`] proves, using that very same committed `psi`,
//! that `prod_i input_i^{psi_i} * Enc(1; rho) = prod_j output_j^{u^{j+1}}`
//! for a combined re-randomization `rho`, which only holds if the outputs
//! really are the inputs re-encrypted and moved according to `sigma`.
//!
//! This composes two linear-size sub-arguments rather than the recursive
//! O(log n) construction a production mixnet would use, trading proof size
//! for a simpler, directly auditable composition.

use num_bigint::BigUint;
use serde::Serialize;
use zeroize::Zeroize;

use crate::commitment::CommitmentKey;
use crate::elgamal::{ones, Ciphertext, ElGamalPublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement};
use crate::hashing::Hashable;
use crate::permutation::Permutation;
use crate::random::Randomness;
use crate::verification_result::VerificationResult;
use crate::zkp::multi_exponentiation::{self, MultiExponentiationProof, MultiExponentiationStatement, MultiExponentiationWitness};
use crate::zkp::single_value_product::{self, SingleValueProductProof, SingleValueProductStatement, SingleValueProductWitness};
use crate::zkp::{fiat_shamir_challenge, hashable};

#[derive(Debug, Clone, Serialize)]
pub struct ShuffleStatement {
    pub ck: CommitmentKey,
    pub pk: ElGamalPublicKey,
    pub inputs: Vec<Ciphertext>,
    pub outputs: Vec<Ciphertext>,
}

#[derive(Debug, Clone)]
pub struct ShuffleWitness {
    pub permutation: Permutation,
    /// Indexed by *input* position: `re_randomizations[i]` is the exponent
    /// used when `inputs[i]` is re-encrypted on its way to
    /// `outputs[permutation.at(i)]`.
    pub re_randomizations: Vec<ZqElement>,
}

/// Best-effort: overwrite every re-randomization exponent before the witness
/// is dropped, same rationale as [`crate::elgamal::ElGamalPrivateKey`].
impl Drop for ShuffleWitness {
    fn drop(&mut self) {
        for r in self.re_randomizations.iter_mut() {
            r.zeroize();
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShuffleProof {
    pub c_psi: GqElement,
    pub permutation_check: SingleValueProductProof,
    pub combination_check: MultiExponentiationProof,
}

/// Builds the shuffled output ciphertexts from `inputs`, a `permutation`,
/// and one re-randomization exponent per input — the operation a mixnet
/// authority runs, matched by a [`prove`] of its correctness.
pub fn shuffle_ciphertexts(
    pk: &ElGamalPublicKey,
    inputs: &[Ciphertext],
    permutation: &Permutation,
    re_randomizations: &[ZqElement],
) -> CryptoResult<Vec<Ciphertext>> {
    if inputs.len() != permutation.len() || inputs.len() != re_randomizations.len() {
        return Err(CryptoError::ShapeError(
            "shuffle requires one permutation slot and one re-randomization exponent per input".into(),
        ));
    }
    let rerandomized = inputs
        .iter()
        .zip(re_randomizations.iter())
        .map(|(ct, r)| ct.multiply(&ones(pk, r)?))
        .collect::<CryptoResult<Vec<_>>>()?;
    permutation.apply(&rerandomized)
}

fn zq_pow(base: &ZqElement, exponent: usize) -> CryptoResult<ZqElement> {
    let zq = base.group().clone();
    zq.element(base.value().modpow(&BigUint::from(exponent as u64), zq.order()))
}

fn combine_with_challenge_powers(cts: &[Ciphertext], u: &ZqElement) -> CryptoResult<Ciphertext> {
    let mut acc = cts[0].exponentiate(&zq_pow(u, 1)?)?;
    for (j, ct) in cts.iter().enumerate().skip(1) {
        acc = acc.multiply(&ct.exponentiate(&zq_pow(u, j + 1)?)?)?;
    }
    Ok(acc)
}

fn derive_u(statement: &ShuffleStatement) -> CryptoResult<ZqElement> {
    let zq = statement.ck.group().corresponding_zq();
    let mut transcript = vec![Hashable::text("shuffle-u".to_string())];
    for ct in statement.inputs.iter().chain(statement.outputs.iter()) {
        transcript.push(hashable(ct.gamma()));
        transcript.extend(ct.phis().iter().map(hashable));
    }
    fiat_shamir_challenge(&zq, transcript)
}

fn derive_t(ck: &CommitmentKey, c_psi: &GqElement, u: &ZqElement) -> CryptoResult<ZqElement> {
    let zq = ck.group().corresponding_zq();
    let transcript = vec![
        Hashable::text("shuffle-t".to_string()),
        hashable(c_psi),
        Hashable::integer(u.value().clone()),
    ];
    fiat_shamir_challenge(&zq, transcript)
}

fn permutation_check_target(n: usize, u: &ZqElement, t: &ZqElement) -> CryptoResult<ZqElement> {
    let zq = u.group().clone();
    let mut acc = zq.one();
    for i in 0..n {
        acc = acc.mul(&zq_pow(u, i + 1)?.sub(t)?)?;
    }
    Ok(acc)
}

pub fn prove(statement: &ShuffleStatement, witness: &ShuffleWitness, rng: &mut impl Randomness) -> CryptoResult<ShuffleProof> {
    let n = statement.ck.n();
    tracing::debug!(n, "proving shuffle argument");
    if statement.inputs.len() != n || statement.outputs.len() != n || witness.permutation.len() != n || witness.re_randomizations.len() != n {
        return Err(CryptoError::ShapeError(
            "shuffle argument requires the commitment key, inputs, outputs, and witness to all have matching length".into(),
        ));
    }
    let zq = statement.ck.group().corresponding_zq();

    let u = derive_u(statement)?;
    let psi: Vec<ZqElement> = (0..n).map(|i| zq_pow(&u, witness.permutation.at(i) + 1)).collect::<CryptoResult<Vec<_>>>()?;
    let r_psi = crate::random::random_exponent(&zq, rng);
    let c_psi = statement.ck.commit(&psi, &r_psi)?;

    let mut rho_combined = zq.zero();
    for (r_i, psi_i) in witness.re_randomizations.iter().zip(psi.iter()) {
        rho_combined = rho_combined.add(&r_i.mul(psi_i)?)?;
    }

    let t = derive_t(&statement.ck, &c_psi, &u)?;
    let g_prod = statement.ck.g().iter().skip(1).try_fold(statement.ck.g()[0].clone(), |acc, g| acc.multiply(g))?;
    let shifted_c = c_psi.multiply(&g_prod.exp(&t.negate())?)?;
    let shifted: Vec<ZqElement> = psi.iter().map(|p| p.sub(&t)).collect::<CryptoResult<Vec<_>>>()?;
    let target_product = permutation_check_target(n, &u, &t)?;

    let svp_statement = SingleValueProductStatement { ck: statement.ck.clone(), c_a: shifted_c, b: target_product };
    let svp_witness = SingleValueProductWitness { a: shifted, r: r_psi.clone() };
    let permutation_check = single_value_product::prove(&svp_statement, &svp_witness, rng)?;

    let target = combine_with_challenge_powers(&statement.outputs, &u)?;
    let multiexp_statement = MultiExponentiationStatement {
        ck: statement.ck.clone(),
        pk: statement.pk.clone(),
        inputs: statement.inputs.clone(),
        target,
        c_e: c_psi.clone(),
    };
    let multiexp_witness = MultiExponentiationWitness { e: psi, r_e: r_psi, rho: rho_combined };
    let combination_check = multi_exponentiation::prove(&multiexp_statement, &multiexp_witness, rng)?;

    Ok(ShuffleProof { c_psi, permutation_check, combination_check })
}

pub fn verify(statement: &ShuffleStatement, proof: &ShuffleProof) -> CryptoResult<VerificationResult> {
    let n = statement.ck.n();
    tracing::debug!(n, "verifying shuffle argument");
    if statement.inputs.len() != n || statement.outputs.len() != n {
        return Ok(VerificationResult::failed("shuffle statement lengths do not match the commitment key"));
    }

    let u = derive_u(statement)?;
    let t = derive_t(&statement.ck, &proof.c_psi, &u)?;
    let g_prod = statement.ck.g().iter().skip(1).try_fold(statement.ck.g()[0].clone(), |acc, g| acc.multiply(g))?;
    let shifted_c = proof.c_psi.multiply(&g_prod.exp(&t.negate())?)?;
    let target_product = permutation_check_target(n, &u, &t)?;

    let svp_statement = SingleValueProductStatement { ck: statement.ck.clone(), c_a: shifted_c, b: target_product };
    let mut result = single_value_product::verify(&svp_statement, &proof.permutation_check)?;

    let target = combine_with_challenge_powers(&statement.outputs, &u)?;
    let multiexp_statement = MultiExponentiationStatement {
        ck: statement.ck.clone(),
        pk: statement.pk.clone(),
        inputs: statement.inputs.clone(),
        target,
        c_e: proof.c_psi.clone(),
    };
    result = result.combine(multi_exponentiation::verify(&multiexp_statement, &proof.combination_check)?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::{encrypt, ElGamalKeyPair};
    use crate::groups::GqGroup;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn setup(n: usize) -> (Arc<GqGroup>, CommitmentKey, ElGamalPublicKey) {
        let group = Arc::new(GqGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap());
        let ck = crate::commitment::derive_commitment_key(&group, n, b"shuffle-test").unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(50);
        let kp = ElGamalKeyPair::generate(&group, &mut rng);
        let pk = ElGamalPublicKey::new(vec![kp.public_key().clone()]).unwrap();
        (group, ck, pk)
    }

    #[test]
    fn completeness_of_a_three_element_shuffle() {
        let (group, ck, pk) = setup(3);
        let zq = group.corresponding_zq();
        let mut rng = rand::rngs::StdRng::seed_from_u64(51);

        let messages = [4u32, 9u32, 16u32];
        let inputs: Vec<Ciphertext> = messages
            .iter()
            .map(|m| encrypt(&pk, &[group.element((*m).into()).unwrap()], &crate::random::random_exponent(&zq, &mut rng)).unwrap())
            .collect();

        let permutation = Permutation::new(vec![2, 0, 1]).unwrap();
        let re_randomizations: Vec<ZqElement> = (0..3).map(|_| crate::random::random_exponent(&zq, &mut rng)).collect();
        let outputs = shuffle_ciphertexts(&pk, &inputs, &permutation, &re_randomizations).unwrap();

        let statement = ShuffleStatement { ck, pk, inputs, outputs };
        let witness = ShuffleWitness { permutation, re_randomizations };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(verify(&statement, &proof).unwrap().is_valid());
    }

    #[test]
    fn rejects_outputs_that_are_not_a_genuine_shuffle() {
        let (group, ck, pk) = setup(3);
        let zq = group.corresponding_zq();
        let mut rng = rand::rngs::StdRng::seed_from_u64(52);

        let messages = [4u32, 9u32, 16u32];
        let inputs: Vec<Ciphertext> = messages
            .iter()
            .map(|m| encrypt(&pk, &[group.element((*m).into()).unwrap()], &crate::random::random_exponent(&zq, &mut rng)).unwrap())
            .collect();

        let permutation = Permutation::new(vec![2, 0, 1]).unwrap();
        let re_randomizations: Vec<ZqElement> = (0..3).map(|_| crate::random::random_exponent(&zq, &mut rng)).collect();
        let mut outputs = shuffle_ciphertexts(&pk, &inputs, &permutation, &re_randomizations).unwrap();
        // tamper: swap two outputs, breaking the committed permutation's correspondence
        outputs.swap(0, 1);

        let statement = ShuffleStatement { ck, pk, inputs, outputs };
        let witness = ShuffleWitness { permutation, re_randomizations };
        let proof = prove(&statement, &witness, &mut rng).unwrap();
        assert!(!verify(&statement, &proof).unwrap().is_valid());
    }
}
