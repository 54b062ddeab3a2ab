//! Stateless admin session tokens.
//!
//! A token is `<issued>-<nonce>-<tag>`:
//!
//! - `issued` - issue time as base-36 Unix milliseconds
//! - `nonce` - random base-36 `u64`
//! - `tag` - first 8 bytes of HMAC-SHA256(secret, "<issued>-<nonce>"), hex
//!
//! Nothing is stored server side; a token is valid while its tag verifies and
//! it is younger than [`SessionTokens::MAX_AGE`].

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of MAC bytes kept in the token.
const TAG_LEN: usize = 8;

/// Issues and validates session tokens for one secret.
#[derive(Clone)]
pub struct SessionTokens {
    mac: HmacSha256,
    max_age: Duration,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("mac", &"[REDACTED]")
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionTokens {
    /// Tokens expire once they are this old.
    pub const MAX_AGE: Duration = Duration::hours(24);

    /// Build the token service from the session secret.
    ///
    /// # Errors
    ///
    /// Returns an error if HMAC rejects the key length (it accepts any
    /// length, so this does not happen in practice).
    pub fn new(secret: &SecretString) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret.expose_secret().as_bytes())?,
            max_age: Self::MAX_AGE,
        })
    }

    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a token stamped with the current time.
    #[must_use]
    pub fn issue(&self) -> String {
        self.issue_at(Utc::now())
    }

    #[must_use]
    pub fn issue_at(&self, now: DateTime<Utc>) -> String {
        let issued = to_base36(u64::try_from(now.timestamp_millis()).unwrap_or(0));
        let nonce = to_base36(rand::random::<u64>());
        let payload = format!("{issued}-{nonce}");
        let tag = self.tag(&payload);
        format!("{payload}-{tag}")
    }

    /// Check a token against the current time.
    #[must_use]
    pub fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Utc::now())
    }

    /// Check a token against `now`.
    ///
    /// Valid iff it has exactly three segments, was not issued in the future,
    /// its age is strictly less than the max age, and its tag verifies.
    #[must_use]
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut parts = token.split('-');
        let (Some(issued), Some(nonce), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        let (Some(issued_ms), Some(_)) = (from_base36(issued), from_base36(nonce)) else {
            return false;
        };
        let Ok(now_ms) = u64::try_from(now.timestamp_millis()) else {
            return false;
        };
        if issued_ms > now_ms {
            return false;
        }

        let age_ms = now_ms - issued_ms;
        let max_age_ms = u64::try_from(self.max_age.num_milliseconds()).unwrap_or(0);
        if age_ms >= max_age_ms {
            return false;
        }

        let Ok(tag_bytes) = hex::decode(tag) else {
            return false;
        };
        if tag_bytes.len() != TAG_LEN {
            return false;
        }

        let mut mac = self.mac.clone();
        mac.update(format!("{issued}-{nonce}").as_bytes());
        mac.verify_truncated_left(&tag_bytes).is_ok()
    }

    fn tag(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let bytes = mac.finalize().into_bytes();
        hex::encode(bytes.iter().take(TAG_LEN).copied().collect::<Vec<u8>>())
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        #[allow(clippy::cast_possible_truncation)] // remainder is < 36
        let digit = (value % 36) as usize;
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(s, 36).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens() -> SessionTokens {
        SessionTokens::new(&SecretString::from("k9$Qm2!vX7#pL4@wR8^zT1&nB6*cF3%h")).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_base36_round_trip() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(from_base36("10"), Some(36));
        assert_eq!(from_base36("+10"), None);
        assert_eq!(from_base36(""), None);
    }

    #[test]
    fn test_issued_token_shape() {
        let token = tokens().issue_at(now());
        let parts: Vec<_> = token.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            from_base36(parts[0]),
            Some(u64::try_from(now().timestamp_millis()).unwrap())
        );
        assert_eq!(parts[2].len(), 16);
        assert!(parts[2].bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let svc = tokens();
        assert!(svc.validate_at(&svc.issue_at(now()), now()));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let svc = tokens();
        let token = svc.issue_at(now());

        let just_before = now() + SessionTokens::MAX_AGE - Duration::milliseconds(1);
        let exactly = now() + SessionTokens::MAX_AGE;

        assert!(svc.validate_at(&token, just_before));
        assert!(!svc.validate_at(&token, exactly));
    }

    #[test]
    fn test_future_token_is_rejected() {
        let svc = tokens();
        let token = svc.issue_at(now() + Duration::minutes(5));
        assert!(!svc.validate_at(&token, now()));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let svc = tokens();
        for token in ["", "abc", "a-b", "a-b-c-d", "!!-abc-0011223344556677", "-abc-0011"] {
            assert!(!svc.validate_at(token, now()), "accepted {token:?}");
        }
    }

    #[test]
    fn test_tampered_timestamp_is_rejected() {
        let svc = tokens();
        let token = svc.issue_at(now());
        let mut parts: Vec<String> = token.split('-').map(String::from).collect();
        parts[0] = to_base36(u64::try_from(now().timestamp_millis()).unwrap() + 1000);
        let forged = parts.join("-");

        assert!(!svc.validate_at(&forged, now() + Duration::seconds(2)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other =
            SessionTokens::new(&SecretString::from("Zp4&Lw9!Qe2#Rt7$Yu1%Io8^Pa3*Sd6@")).unwrap();
        let token = other.issue_at(now());
        assert!(!tokens().validate_at(&token, now()));
    }

    #[test]
    fn test_nonces_differ() {
        let svc = tokens();
        assert_ne!(svc.issue_at(now()), svc.issue_at(now()));
    }
}
