//! CredentialGate port - opaque API-key gate in front of the backend.

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::foundation::DomainError;

/// Port over the backend's API-key configuration endpoints.
///
/// The session core must not proceed past this gate until `check_status`
/// returns true, and must re-check after any operation fails with the
/// unauthorized signal instead of treating it as a generic error. Key
/// storage and validation are the backend's concern; the key itself is
/// held in `Secret` and never logged.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    /// Whether a valid key is currently configured backend-side.
    async fn check_status(&self) -> Result<bool, DomainError>;

    /// Submits a key for validation and storage. Returns whether the
    /// backend accepted it.
    async fn submit_key(&self, key: Secret<String>) -> Result<bool, DomainError>;

    /// Clears the stored key.
    async fn clear_key(&self) -> Result<(), DomainError>;
}
