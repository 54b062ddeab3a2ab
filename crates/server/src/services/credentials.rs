//! Constant-time comparison of submitted credentials.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compare a submitted password or API key with the configured one.
///
/// Both sides are run through HMAC-SHA256 under a fresh random key and the
/// digests are compared in constant time, so neither the content nor the
/// length of the expected value leaks through timing.
#[must_use]
pub fn secret_matches(candidate: &str, expected: &SecretString) -> bool {
    let key: [u8; 32] = rand::random();

    let Ok(mut expected_mac) = HmacSha256::new_from_slice(&key) else {
        return false;
    };
    expected_mac.update(expected.expose_secret().as_bytes());
    let expected_tag = expected_mac.finalize().into_bytes();

    let Ok(mut candidate_mac) = HmacSha256::new_from_slice(&key) else {
        return false;
    };
    candidate_mac.update(candidate.as_bytes());
    candidate_mac.verify_slice(&expected_tag).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_secret() {
        let expected = SecretString::from("correct horse battery staple");
        assert!(secret_matches("correct horse battery staple", &expected));
    }

    #[test]
    fn test_mismatched_secret() {
        let expected = SecretString::from("correct horse battery staple");
        assert!(!secret_matches("correct horse battery", &expected));
        assert!(!secret_matches("", &expected));
        assert!(!secret_matches("Correct horse battery staple", &expected));
    }
}
