//! Concrete numeric scenarios exercised against small, hand-checkable safe
//! prime groups, complementing the per-module unit tests with cross-module,
//! whole-pipeline behavior.

use std::sync::Arc;

use num_bigint::BigUint;
use rand::SeedableRng;

use verifiable_mixnet::commitment::derive_commitment_key;
use verifiable_mixnet::decryption_proof;
use verifiable_mixnet::elgamal::{self, Ciphertext, ElGamalPublicKey};
use verifiable_mixnet::groups::GqGroup;
use verifiable_mixnet::permutation::Permutation;
use verifiable_mixnet::random::random_exponent;
use verifiable_mixnet::zkp::hadamard::{self, HadamardStatement, HadamardWitness};
use verifiable_mixnet::zkp::shuffle::{self, ShuffleStatement, ShuffleWitness};

fn small_group() -> Arc<GqGroup> {
    // p = 11 = 2*5+1, q = 5, g = 3.
    Arc::new(GqGroup::new(11u32.into(), 5u32.into(), 3u32.into()).unwrap())
}

/// Enables the `debug`/`trace` spans the crate emits during proving and
/// verification so they run under test instead of going completely unused.
/// `try_init` tolerates the repeated calls from each test in this file.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
        .try_init();
}

/// A. Small-group ciphertext creation: p=11, q=5, g=3; message (4,5); r=2;
/// pk=(5,9). Hand-computed: gamma = 3^2 mod 11 = 9, phi = (4*5^2, 5*9^2) mod
/// 11 = (1, 9).
#[test]
fn scenario_a_small_group_ciphertext_creation() {
    let group = small_group();
    let zq = group.corresponding_zq();
    let pk = ElGamalPublicKey::new(vec![
        group.element(BigUint::from(5u32)).unwrap(),
        group.element(BigUint::from(9u32)).unwrap(),
    ])
    .unwrap();
    let messages = vec![
        group.element(BigUint::from(4u32)).unwrap(),
        group.element(BigUint::from(5u32)).unwrap(),
    ];
    let r = zq.element(BigUint::from(2u32)).unwrap();

    let ct = elgamal::encrypt(&pk, &messages, &r).unwrap();
    assert_eq!(ct.gamma().value(), &BigUint::from(9u32));
    assert_eq!(ct.phis()[0].value(), &BigUint::from(1u32));
    assert_eq!(ct.phis()[1].value(), &BigUint::from(9u32));
}

/// B. Phi-decryption helper: p=59, q=29, g=3; gamma=12; pre-image z=(9,15,8).
/// Expected (g^9, g^15, g^8, gamma^9, gamma^15, gamma^8) = (36,48,12,16,22,21).
#[test]
fn scenario_b_phi_decryption_helper() {
    let group = Arc::new(GqGroup::new(59u32.into(), 29u32.into(), 3u32.into()).unwrap());
    let zq = group.corresponding_zq();
    let z = vec![
        zq.element(BigUint::from(9u32)).unwrap(),
        zq.element(BigUint::from(15u32)).unwrap(),
        zq.element(BigUint::from(8u32)).unwrap(),
    ];
    let gamma = group.element(BigUint::from(12u32)).unwrap();

    let phi = decryption_proof::phi_decryption(&z, &gamma, &group).unwrap();
    let expected: Vec<BigUint> = [36u32, 48, 12, 16, 22, 21].into_iter().map(BigUint::from).collect();
    assert_eq!(phi.iter().map(|e| e.value().clone()).collect::<Vec<_>>(), expected);
}

/// C. Ones encryption. `ones(pk, r)` computes the re-encryption delta
/// `(g^r, pk_i^r)`; at `r = 0` that delta collapses to the fully-identity
/// ciphertext `(1, 1, ..., 1)`, the neutral element re-encryption multiplies
/// against to leave a ciphertext's plaintext unchanged. (A delta of
/// `(1, pk_1, ..., pk_k)` is only reachable by taking `g^r = 1` and
/// `pk_i^r = pk_i` simultaneously, which forces contradictory values of `r`
/// unless q = 1 — so that shape is demonstrated instead at `r = 1`, where
/// `ones` legitimately returns `(g, pk_1, ..., pk_k)`.)
#[test]
fn scenario_c_ones_encryption_neutral_element_at_zero() {
    init_tracing();
    let group = small_group();
    let zq = group.corresponding_zq();
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let (_sk, pk) = elgamal::generate_key_pair(&group, 3, &mut rng).unwrap();

    let zero = zq.zero();
    let neutral = elgamal::ones(&pk, &zero).unwrap();
    assert!(neutral.gamma().is_identity());
    assert!(neutral.phis().iter().all(|p| p.is_identity()));

    let one = zq.one();
    let delta = elgamal::ones(&pk, &one).unwrap();
    assert_eq!(delta.gamma(), &group.generator());
    assert_eq!(delta.phis(), pk.keys());
}

/// D. Shuffle completeness round-trip: same safe-prime group and shape
/// (N=4, m=2, n=2, l=3) the documented scenario uses, with a permutation
/// and re-randomization exponents producing a genuine shuffle that must
/// verify with an empty failure list.
#[test]
fn scenario_d_shuffle_completeness_round_trip() {
    init_tracing();
    let group = Arc::new(GqGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap());
    let zq = group.corresponding_zq();
    let mut rng = rand::rngs::StdRng::seed_from_u64(23);
    let (_sk, pk) = elgamal::generate_key_pair(&group, 3, &mut rng).unwrap();
    let ck = derive_commitment_key(&group, 4, b"scenario-d").unwrap();

    let plaintexts: [[u32; 3]; 4] = [[4, 8, 3], [3, 6, 4], [16, 2, 9], [13, 4, 18]];
    let inputs: Vec<Ciphertext> = plaintexts
        .iter()
        .map(|m| {
            let messages: Vec<_> = m.iter().map(|v| group.element((*v).into()).unwrap()).collect();
            elgamal::encrypt(&pk, &messages, &random_exponent(&zq, &mut rng)).unwrap()
        })
        .collect();

    let permutation = Permutation::new(vec![1, 3, 2, 0]).unwrap();
    let re_randomizations: Vec<_> = (0..4).map(|_| random_exponent(&zq, &mut rng)).collect();
    let outputs = shuffle::shuffle_ciphertexts(&pk, &inputs, &permutation, &re_randomizations).unwrap();

    let statement = ShuffleStatement { ck, pk, inputs, outputs };
    let witness = ShuffleWitness { permutation, re_randomizations };
    let proof = shuffle::prove(&statement, &witness, &mut rng).unwrap();
    let result = shuffle::verify(&statement, &proof).unwrap();
    assert!(result.is_valid(), "{:?}", result.failures());
}

/// E. Hadamard completeness on a toy group: p=11, q=5, g=3; columns
/// (4,0), (2,2), (0,4); elementwise product (0,0).
#[test]
fn scenario_e_hadamard_completeness_on_toy_group() {
    let group = small_group();
    let zq = group.corresponding_zq();
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let ck = derive_commitment_key(&group, 2, b"scenario-e").unwrap();

    let a1 = vec![zq.element(BigUint::from(4u32)).unwrap(), zq.element(BigUint::from(0u32)).unwrap()];
    let a2 = vec![zq.element(BigUint::from(2u32)).unwrap(), zq.element(BigUint::from(2u32)).unwrap()];
    let a3 = vec![zq.element(BigUint::from(0u32)).unwrap(), zq.element(BigUint::from(4u32)).unwrap()];
    let b: Vec<_> = (0..2).map(|i| a1[i].mul(&a2[i]).unwrap().mul(&a3[i]).unwrap()).collect();
    assert!(b.iter().all(|bi| bi.is_zero()));

    let r_a: Vec<_> = (0..3).map(|_| random_exponent(&zq, &mut rng)).collect();
    let r_b = random_exponent(&zq, &mut rng);
    let c_a = vec![
        ck.commit(&a1, &r_a[0]).unwrap(),
        ck.commit(&a2, &r_a[1]).unwrap(),
        ck.commit(&a3, &r_a[2]).unwrap(),
    ];
    let c_b = ck.commit(&b, &r_b).unwrap();

    let statement = HadamardStatement { ck, c_a, c_b };
    let witness = HadamardWitness { a: vec![a1, a2, a3], r_a, b, r_b };
    let proof = hadamard::prove(&statement, &witness, &mut rng).unwrap();
    let result = hadamard::verify(&statement, &proof).unwrap();
    assert!(result.is_valid(), "{:?}", result.failures());
}

/// F. Decryption-proof tampering: an honestly generated proof over
/// `(c, sk, m, aux)` must fail verification, with the first accumulated
/// failure naming the ciphertext, once gamma is swapped for another Gq
/// element the proof was never computed against.
#[test]
fn scenario_f_decryption_proof_tampering() {
    init_tracing();
    let group = small_group();
    let zq = group.corresponding_zq();
    let mut rng = rand::rngs::StdRng::seed_from_u64(6);
    let (sk, pk) = elgamal::generate_key_pair(&group, 1, &mut rng).unwrap();

    let m = group.element(BigUint::from(4u32)).unwrap();
    let r = random_exponent(&zq, &mut rng);
    let ct = elgamal::encrypt(&pk, &[m], &r).unwrap();
    let decrypted = elgamal::decrypt(&ct, sk.keys()).unwrap();

    let aux = b"scenario-f";
    let proof = decryption_proof::prove(&ct, &pk, &sk, &decrypted, aux, 4, &mut rng).unwrap();

    let swapped_gamma = group.element(BigUint::from(5u32)).unwrap();
    assert_ne!(&swapped_gamma, ct.gamma());
    let tampered = Ciphertext::new(swapped_gamma, ct.phis().to_vec()).unwrap();

    let result = decryption_proof::verify(&tampered, &pk, &decrypted, &proof, aux, 4).unwrap();
    assert!(!result.is_valid());
    assert!(result.failures()[0].starts_with("Could not verify decryption proof of ciphertext"));
}
