use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::SessionId;

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes[..]);
    bytes
}

/// Generate a PKCE code verifier: 128 random bytes, base64url encoded.
pub fn generate_code_verifier() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<128>())
}

/// Derive the PKCE code challenge: base64url of the verifier's SHA-256.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Generate a random state parameter for CSRF protection.
pub fn generate_state() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<16>())
}

/// Generate a random OIDC nonce.
pub fn generate_nonce() -> String {
    URL_SAFE_NO_PAD.encode(random_bytes::<16>())
}

/// Generate a cryptographically random session ID: 18 random bytes, hex.
pub fn generate_session_id() -> SessionId {
    let id = random_bytes::<18>()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    SessionId::new(id)
}

/// Absolute token expiry in epoch seconds. Providers that omit
/// `expires_in` default to one hour.
pub fn token_expiry(now: DateTime<Utc>, expires_in: Option<u64>) -> i64 {
    now.timestamp() + expires_in.unwrap_or(3600) as i64
}

/// True when the tokens' remaining lifetime has fallen below the refresh
/// buffer (including already-expired tokens).
pub fn needs_refresh(token_expiry: i64, now: DateTime<Utc>, buffer: Duration) -> bool {
    token_expiry - now.timestamp() < buffer.as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifier_is_long_and_url_safe() {
        let verifier = generate_code_verifier();
        // 128 raw bytes encode to 171 base64url characters.
        assert_eq!(verifier.len(), 171);
        assert!(verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn verifier_is_unique() {
        assert_ne!(generate_code_verifier(), generate_code_verifier());
    }

    #[test]
    fn challenge_matches_rfc7636_appendix_b() {
        // Known vector from RFC 7636.
        assert_eq!(
            code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn challenge_is_deterministic() {
        let verifier = generate_code_verifier();
        assert_eq!(code_challenge(&verifier), code_challenge(&verifier));
    }

    #[test]
    fn state_and_nonce_are_distinct() {
        let state = generate_state();
        let nonce = generate_nonce();
        assert_eq!(state.len(), 22); // 16 bytes, unpadded base64url
        assert_ne!(state, nonce);
    }

    #[test]
    fn session_id_is_36_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.as_str().len(), 36);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_expiry_defaults_to_one_hour() {
        let now = Utc::now();
        assert_eq!(token_expiry(now, None), now.timestamp() + 3600);
        assert_eq!(token_expiry(now, Some(600)), now.timestamp() + 600);
    }

    #[test]
    fn refresh_only_inside_buffer() {
        let now = Utc::now();
        let buffer = Duration::from_secs(300);

        // Plenty of lifetime left: no refresh.
        assert!(!needs_refresh(now.timestamp() + 3600, now, buffer));
        // Inside the buffer: refresh.
        assert!(needs_refresh(now.timestamp() + 60, now, buffer));
        // Already expired: refresh.
        assert!(needs_refresh(now.timestamp() - 10, now, buffer));
    }
}
