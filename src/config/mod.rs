//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BUCKETLIST_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use bucketlist_session::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod api;
mod error;

pub use api::{ApiConfig, MAX_REFILL_BATCH, MIN_REFILL_BATCH};
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Suggestion backend client configuration
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BUCKETLIST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `BUCKETLIST__API__BASE_URL=http://localhost:8080` -> `api.base_url`
    /// - `BUCKETLIST__API__REFILL_BATCH_SIZE=5` -> `api.refill_batch_size`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BUCKETLIST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("BUCKETLIST__API__BASE_URL");
        env::remove_var("BUCKETLIST__API__REQUEST_TIMEOUT_SECS");
        env::remove_var("BUCKETLIST__API__REFILL_BATCH_SIZE");
    }

    #[test]
    fn test_load_defaults_without_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.refill_batch_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BUCKETLIST__API__BASE_URL", "https://api.example.com");
        env::set_var("BUCKETLIST__API__REFILL_BATCH_SIZE", "3");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.refill_batch_size, 3);
    }
}
