//! The crate's single error taxonomy.
//!
//! Construction-time preconditions and prover entry points fail fast with one
//! of these variants. Verifiers never return `CryptoError` for an algebraic
//! check failure — those accumulate into a [`crate::verification_result::VerificationResult`]
//! instead. `CryptoError` is reserved for caller bugs: malformed inputs,
//! mismatched groups, inconsistent shapes, and the handful of global
//! preconditions spec'd for specific routines.

use thiserror::Error;

/// Errors raised by construction, proving, and shape-validation routines.
///
/// At most one variant applies per call; the taxonomy is intentionally flat
/// rather than nested so that callers can match on it directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// An argument was null/empty/out of range/in the wrong domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two operands belong to incompatible groups.
    #[error("group mismatch: {0}")]
    GroupMismatch(String),

    /// Vector/matrix dimensions were inconsistent across related inputs.
    #[error("shape error: {0}")]
    ShapeError(String),

    /// A prover was given a statement/witness pair that does not satisfy
    /// the claimed relation.
    #[error("witness inconsistent with statement: {0}")]
    WitnessInconsistent(String),

    /// The configured hash's bit length would bias a Fiat-Shamir challenge
    /// taken modulo q.
    #[error("hash output bit length too large relative to the group order: {0}")]
    BitLengthTooLarge(String),

    /// A global precondition on a routine's parameters failed.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
