//! Product argument: proves that every entry of a committed `n x m` matrix
//! `A` (given as `m` column commitments) multiplies together to a public
//! scalar `b`.
//!
//! Composed exactly as the name suggests: a [`crate::zkp::hadamard`] proof
//! ties the columns to their element-wise product `h` (committed fresh),
//! then a [`crate::zkp::single_value_product`] proof ties `prod(h_i)` to
//! `b`.

use serde::Serialize;

use crate::commitment::CommitmentKey;
use crate::error::{CryptoError, CryptoResult};
use crate::groups::{GqElement, ZqElement};
use crate::random::Randomness;
use crate::verification_result::VerificationResult;
use crate::zkp::hadamard::{self, HadamardProof, HadamardStatement, HadamardWitness};
use crate::zkp::single_value_product::{self, SingleValueProductProof, SingleValueProductStatement, SingleValueProductWitness};

#[derive(Debug, Clone, Serialize)]
pub struct ProductStatement {
    pub ck: CommitmentKey,
    pub c_a: Vec<GqElement>,
    pub b: ZqElement,
}

#[derive(Debug, Clone)]
pub struct ProductWitness {
    pub a: Vec<Vec<ZqElement>>,
    pub r_a: Vec<ZqElement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductProof {
    pub c_h: GqElement,
    pub hadamard: HadamardProof,
    pub svp: SingleValueProductProof,
}

pub fn prove(statement: &ProductStatement, witness: &ProductWitness, rng: &mut impl Randomness) -> CryptoResult<ProductProof> {
    let n = statement.ck.n();
    let m = witness.a.len();
    if m == 0 || witness.a.iter().any(|col| col.len() != n) {
        return Err(CryptoError::ShapeError(
            "product argument requires m >= 1 columns, each of length n".into(),
        ));
    }
    let zq = statement.ck.group().corresponding_zq();

    let mut h = witness.a[0].clone();
    for col in witness.a.iter().skip(1) {
        h = h.iter().zip(col.iter()).map(|(x, y)| x.mul(y)).collect::<CryptoResult<Vec<_>>>()?;
    }
    let r_h = crate::random::random_exponent(&zq, rng);
    let c_h = statement.ck.commit(&h, &r_h)?;

    let hadamard_statement = HadamardStatement {
        ck: statement.ck.clone(),
        c_a: statement.c_a.clone(),
        c_b: c_h.clone(),
    };
    let hadamard_witness = HadamardWitness {
        a: witness.a.clone(),
        r_a: witness.r_a.clone(),
        b: h.clone(),
        r_b: r_h.clone(),
    };
    let hadamard_proof = hadamard::prove(&hadamard_statement, &hadamard_witness, rng)?;

    let svp_statement = SingleValueProductStatement {
        ck: statement.ck.clone(),
        c_a: c_h.clone(),
        b: statement.b.clone(),
    };
    let svp_witness = SingleValueProductWitness { a: h, r: r_h };
    let svp_proof = single_value_product::prove(&svp_statement, &svp_witness, rng)?;

    Ok(ProductProof { c_h, hadamard: hadamard_proof, svp: svp_proof })
}

pub fn verify(statement: &ProductStatement, proof: &ProductProof) -> CryptoResult<VerificationResult> {
    let hadamard_statement = HadamardStatement {
        ck: statement.ck.clone(),
        c_a: statement.c_a.clone(),
        c_b: proof.c_h.clone(),
    };
    let svp_statement = SingleValueProductStatement {
        ck: statement.ck.clone(),
        c_a: proof.c_h.clone(),
        b: statement.b.clone(),
    };
    let mut result = hadamard::verify(&hadamard_statement, &proof.hadamard)?;
    result = result.combine(single_value_product::verify(&svp_statement, &proof.svp)?);
    Ok(result)
}
