//! ProfileGateway port - remote profile creation.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::profile::{CreatedProfile, NewProfile};

/// Port for the profile-creation collaborator.
///
/// Creation semantics (persona generation, storage) are entirely remote;
/// this crate only submits validated attributes and keeps the returned
/// identity and summary for the session's lifetime.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// Creates a remote profile from the given attributes.
    ///
    /// Errors surface as opaque message strings for the error phase.
    async fn create(&self, profile: NewProfile) -> Result<CreatedProfile, DomainError>;
}
