//! Credential hashing and session-cookie signing
//!
//! Passwords are stored as bcrypt hashes, never plaintext. Session cookies
//! carry `token.signature` where the signature is SHA-256 over the token and
//! the configured secret key, so a cookie minted under one secret is useless
//! under another.

use crate::{Error, Result};
use sha2::{Digest, Sha256};

/// Hash a plaintext password for storage
pub fn hash_password(plain: &str) -> Result<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a plaintext password against a stored hash
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Signature binding a session token to the secret key
pub fn session_signature(token: &str, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(secret_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cookie value for a session token: `token.signature`
pub fn encode_session_cookie(token: &str, secret_key: &str) -> String {
    format!("{}.{}", token, session_signature(token, secret_key))
}

/// Verify a cookie value and return the embedded token
pub fn decode_session_cookie<'a>(value: &'a str, secret_key: &str) -> Option<&'a str> {
    let (token, signature) = value.split_once('.')?;
    if signature == session_signature(token, secret_key) {
        Some(token)
    } else {
        None
    }
}

/// Random 256-bit secret, hex encoded
pub fn generate_secret_key() -> String {
    use rand::Rng;

    let bytes: [u8; 32] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn cookie_signature_binds_secret() {
        let cookie = encode_session_cookie("token-1", "secret-a");
        assert_eq!(decode_session_cookie(&cookie, "secret-a"), Some("token-1"));
        assert_eq!(decode_session_cookie(&cookie, "secret-b"), None);
    }

    #[test]
    fn tampered_cookie_rejected() {
        let cookie = encode_session_cookie("token-1", "secret-a");
        let tampered = cookie.replace("token-1", "token-2");
        assert_eq!(decode_session_cookie(&tampered, "secret-a"), None);
        assert_eq!(decode_session_cookie("no-dot-here", "secret-a"), None);
    }

    #[test]
    fn generated_secrets_are_distinct() {
        let first = generate_secret_key();
        let second = generate_secret_key();
        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
    }
}
