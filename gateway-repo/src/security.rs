//! API key hashing and the credential validator built on it.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use gateway_types::{CredentialValidator, RepoError};

/// Hashes an API key using SHA-256.
pub fn hash_api_key(key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    hex::encode(hash)
}

/// Verifies an API key against a stored hash using constant-time comparison.
pub fn verify_api_key(input: &str, stored_hash: &str) -> bool {
    let input_hash = hash_api_key(input);
    input_hash.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Accepts a fixed set of API keys. Only their hashes are kept in memory.
pub struct ApiKeyValidator {
    hashes: Vec<String>,
}

impl ApiKeyValidator {
    /// Builds a validator from raw keys; blank entries are ignored.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hashes = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| hash_api_key(&k))
            .collect();
        Self { hashes }
    }
}

#[async_trait]
impl CredentialValidator for ApiKeyValidator {
    async fn verify(&self, credential: &str) -> Result<bool, RepoError> {
        // No early exit: every stored hash is compared.
        let matched = self
            .hashes
            .iter()
            .fold(false, |acc, stored| verify_api_key(credential, stored) | acc);
        Ok(matched)
    }
}
