//! Credential validation port.
//!
//! The gateway only consumes this capability; issuing credentials is the
//! responsibility of whatever sits behind the implementation.

use crate::error::RepoError;

#[async_trait::async_trait]
pub trait CredentialValidator: Send + Sync + 'static {
    /// Returns true when `credential` grants access to the gateway API.
    async fn verify(&self, credential: &str) -> Result<bool, RepoError>;
}
