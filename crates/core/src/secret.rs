//! Shared-secret comparison for inbound provider callbacks.

use sha2::{Digest, Sha256};

/// Compare a caller-supplied secret against the configured one.
///
/// Both sides are reduced to SHA-256 digests before comparing so the
/// comparison time does not depend on how long a matching prefix is.
/// An empty configured secret never matches.
pub fn secrets_match(expected: &str, provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }
    Sha256::digest(expected.as_bytes()) == Sha256::digest(provided.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_secret_matches() {
        assert!(secrets_match("s3cret", Some("s3cret")));
    }

    #[test]
    fn different_or_missing_secret_does_not_match() {
        assert!(!secrets_match("s3cret", Some("s3cre")));
        assert!(!secrets_match("s3cret", Some("")));
        assert!(!secrets_match("s3cret", None));
    }

    #[test]
    fn empty_expected_secret_never_matches() {
        assert!(!secrets_match("", Some("")));
        assert!(!secrets_match("", None));
    }
}
