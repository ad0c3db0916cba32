//! `VerificationResult`: the accumulating monoid every verifier in
//! `src/zkp` and `src/decryption_proof.rs` returns instead of bailing out on
//! the first failed algebraic check. Composing two results is commutative
//! and associative (`combine` just concatenates failure messages), so a
//! verifier can run every independent check it has and report all of them
//! at once rather than hiding later failures behind an early `?`.

use std::fmt;

/// The outcome of a verification routine: either fully valid, or invalid
/// with every failure message collected along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationResult {
    failures: Vec<String>,
}

impl VerificationResult {
    pub fn valid() -> Self {
        VerificationResult { failures: Vec::new() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        VerificationResult {
            failures: vec![message.into()],
        }
    }

    /// Turns a boolean check into a result, attaching `message` only if the
    /// check failed.
    pub fn check(condition: bool, message: impl Into<String>) -> Self {
        if condition {
            VerificationResult::valid()
        } else {
            VerificationResult::failed(message)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Merges `self` with `other`, keeping every failure message from both.
    pub fn combine(mut self, other: VerificationResult) -> VerificationResult {
        self.failures.extend(other.failures);
        self
    }

    /// Folds an iterator of results into one, short-circuiting nothing:
    /// every failure from every input is preserved.
    pub fn combine_all(results: impl IntoIterator<Item = VerificationResult>) -> VerificationResult {
        results.into_iter().fold(VerificationResult::valid(), VerificationResult::combine)
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "valid")
        } else {
            write!(f, "invalid: {}", self.failures.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combining_valid_results_stays_valid() {
        let r = VerificationResult::valid().combine(VerificationResult::valid());
        assert!(r.is_valid());
    }

    #[test]
    fn combine_all_collects_every_failure() {
        let r = VerificationResult::combine_all(vec![
            VerificationResult::failed("a"),
            VerificationResult::valid(),
            VerificationResult::failed("b"),
        ]);
        assert!(!r.is_valid());
        assert_eq!(r.failures(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn check_attaches_message_only_on_failure() {
        assert!(VerificationResult::check(true, "unreachable").is_valid());
        let r = VerificationResult::check(false, "boom");
        assert_eq!(r.failures(), &["boom".to_string()]);
    }
}
