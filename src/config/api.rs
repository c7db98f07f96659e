//! Suggestion backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Smallest and largest refill batch the backend accepts.
pub const MIN_REFILL_BATCH: u8 = 1;
pub const MAX_REFILL_BATCH: u8 = 10;

/// Configuration for the suggestion backend HTTP client
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the suggestion backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Number of suggestions requested per refill
    #[serde(default = "default_batch_size")]
    pub refill_batch_size: u8,
}

impl ApiConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(MIN_REFILL_BATCH..=MAX_REFILL_BATCH).contains(&self.refill_batch_size) {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
            refill_batch_size: default_batch_size(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_batch_size() -> u8 {
    5
}
