#![allow(dead_code)]

pub mod bignat;
pub mod commitment;
pub mod containers;
pub mod decryption_proof;
pub mod elgamal;
pub mod error;
pub mod groups;
pub mod hashing;
pub mod permutation;
pub mod random;
pub mod testing;
pub mod verification_result;
pub mod zkp;
