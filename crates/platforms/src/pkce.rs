//! PKCE (RFC 7636) helpers for OAuth flows against the metadata providers.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};

/// 43-character URL-safe verifier from 32 random bytes.
pub fn generate_code_verifier() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `S256` challenge for `verifier`.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Verifiers awaiting their authorization callback, keyed by OAuth state.
///
/// Owned by the caller and shared by reference; nothing here is global.
#[derive(Debug, Default)]
pub struct CodeVerifierStore {
    verifiers: Mutex<FxHashMap<String, String>>,
}

impl CodeVerifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the verifier previously stored under `state`, if any.
    pub fn insert(&self, state: impl Into<String>, verifier: impl Into<String>) -> Option<String> {
        self.verifiers.lock().insert(state.into(), verifier.into())
    }

    pub fn get(&self, state: &str) -> Option<String> {
        self.verifiers.lock().get(state).cloned()
    }

    /// Removes and returns the verifier for `state`. A verifier is single use.
    pub fn take(&self, state: &str) -> Option<String> {
        self.verifiers.lock().remove(state)
    }

    pub fn len(&self) -> usize {
        self.verifiers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_verifier_shape() {
        let verifier = generate_code_verifier();
        assert_eq!(verifier.len(), 43);
        assert!(
            verifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(verifier, generate_code_verifier());
    }

    #[test]
    fn test_code_challenge_rfc_vector() {
        // RFC 7636 appendix B
        assert_eq!(
            code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_store_insert_get_take() {
        let store = CodeVerifierStore::new();
        assert!(store.is_empty());
        assert_eq!(store.insert("state-1", "verifier-a"), None);
        assert_eq!(store.insert("state-1", "verifier-b").as_deref(), Some("verifier-a"));
        assert_eq!(store.get("state-1").as_deref(), Some("verifier-b"));
        assert_eq!(store.len(), 1);

        assert_eq!(store.take("state-1").as_deref(), Some("verifier-b"));
        assert_eq!(store.take("state-1"), None);
        assert_eq!(store.get("missing"), None);
    }
}
