//! HTTP implementation of the server-side ports.
//!
//! One `HttpBackend` instance implements every port, sharing a connection
//! pool. Status mapping follows the error taxonomy: 401 is the credential
//! gate signal, 204/404 on `next` is the empty-queue signal, everything
//! else non-success is a network-boundary failure with the status and
//! body preserved in the message.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};

use crate::config::ApiConfig;
use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::profile::{CreatedProfile, NewProfile};
use crate::domain::suggestion::{QueueKey, RejectedSuggestion, Suggestion};
use crate::ports::{
    CredentialGate, FeedbackRecord, FeedbackSink, HistoryReader, ProfileGateway, SuggestionQueue,
};

use super::dto::{
    ApiKeyRequestDto, ApiKeyResponseDto, ApiKeyStatusResponseDto, CreateProfileRequestDto,
    CreateProfileResponseDto, FeedbackRequestDto, RefillRequestDto,
    RejectedSuggestionsResponseDto, SuggestionDto, SuggestionsResponseDto,
};

/// HTTP client for the suggestion backend.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DomainError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn map_transport_error(err: reqwest::Error) -> DomainError {
        if err.is_timeout() {
            DomainError::network("Request timed out")
        } else if err.is_connect() {
            DomainError::network(format!("Connection failed: {}", err))
        } else {
            DomainError::network(err.to_string())
        }
    }

    /// Maps non-success statuses to the error taxonomy.
    async fn handle_status(response: Response) -> Result<Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => Err(DomainError::unauthorized(
                "API key required - please configure your API key",
            )),
            _ => Err(DomainError::network(format!(
                "Request failed with status {}: {}",
                status, body
            ))),
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        response.json::<T>().await.map_err(|e| {
            DomainError::new(
                crate::domain::foundation::ErrorCode::DecodeError,
                format!("Failed to decode response: {}", e),
            )
        })
    }
}

#[async_trait]
impl SuggestionQueue for HttpBackend {
    async fn next(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
    ) -> Result<Option<Suggestion>, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("suggestions/next/{}", profile_id)))
            .query(&[
                ("category", key.category.as_wire_str()),
                ("mode", key.mode.as_wire_str()),
            ])
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        // Empty queue is signaled by status, not by an error body.
        if matches!(
            response.status(),
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND
        ) {
            tracing::debug!(%profile_id, ?key, "suggestion queue empty");
            return Ok(None);
        }

        let response = Self::handle_status(response).await?;
        let dto: SuggestionDto = Self::decode(response).await?;
        Ok(Some(dto.into_domain()))
    }

    async fn refill(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
        batch_size: u8,
    ) -> Result<usize, DomainError> {
        let request = RefillRequestDto {
            profile_id: *profile_id.as_uuid(),
            category: key.category,
            mode: key.mode,
            batch_size,
        };

        let response = self
            .client
            .post(self.url("suggestions/refill"))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let response = Self::handle_status(response).await?;
        let body: SuggestionsResponseDto = Self::decode(response).await?;
        tracing::debug!(
            %profile_id,
            ?key,
            requested = batch_size,
            created = body.suggestions.len(),
            "refill completed"
        );
        Ok(body.suggestions.len())
    }
}

#[async_trait]
impl FeedbackSink for HttpBackend {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), DomainError> {
        let (reason, is_custom_reason) = match record.rejection {
            Some(rejection) => (Some(rejection.reason), Some(rejection.is_custom_reason)),
            None => (None, None),
        };
        let request = FeedbackRequestDto {
            profile_id: *record.profile_id.as_uuid(),
            suggestion_id: *record.suggestion_id.as_uuid(),
            verdict: record.verdict,
            reason,
            is_custom_reason,
        };

        let response = self
            .client
            .post(self.url("suggestions/feedback"))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::handle_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileGateway for HttpBackend {
    async fn create(&self, profile: NewProfile) -> Result<CreatedProfile, DomainError> {
        let submitted_capital = profile.capital;
        let request = CreateProfileRequestDto::from(&profile);

        let response = self
            .client
            .post(self.url("profile"))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let response = Self::handle_status(response).await?;
        let dto: CreateProfileResponseDto = Self::decode(response).await?;
        Ok(dto.into_domain(submitted_capital))
    }
}

#[async_trait]
impl HistoryReader for HttpBackend {
    async fn accepted(&self, profile_id: &ProfileId) -> Result<Vec<Suggestion>, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("suggestions/accepted/{}", profile_id)))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let response = Self::handle_status(response).await?;
        let body: SuggestionsResponseDto = Self::decode(response).await?;
        Ok(body.suggestions.into_iter().map(|s| s.into_domain()).collect())
    }

    async fn rejected(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<RejectedSuggestion>, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("suggestions/rejected/{}", profile_id)))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let response = Self::handle_status(response).await?;
        let body: RejectedSuggestionsResponseDto = Self::decode(response).await?;
        Ok(body.suggestions.into_iter().map(|s| s.into_domain()).collect())
    }
}

#[async_trait]
impl CredentialGate for HttpBackend {
    async fn check_status(&self) -> Result<bool, DomainError> {
        let response = self
            .client
            .get(self.url("config/api-key/status"))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let response = Self::handle_status(response).await?;
        let body: ApiKeyStatusResponseDto = Self::decode(response).await?;
        Ok(body.has_valid_key)
    }

    async fn submit_key(&self, key: Secret<String>) -> Result<bool, DomainError> {
        let request = ApiKeyRequestDto {
            api_key: key.expose_secret().clone(),
        };

        let response = self
            .client
            .post(self.url("config/api-key"))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        // A rejected key comes back as 400 with {valid: false}.
        if response.status() == StatusCode::BAD_REQUEST {
            return Ok(false);
        }
        let response = Self::handle_status(response).await?;
        let body: ApiKeyResponseDto = Self::decode(response).await?;
        if !body.valid {
            tracing::debug!(
                message = body.message.as_deref().unwrap_or(""),
                "api key rejected"
            );
        }
        Ok(body.valid)
    }

    async fn clear_key(&self) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.url("config/api-key"))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::handle_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        let config = ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            request_timeout_secs: 30,
            refill_batch_size: 5,
        };
        HttpBackend::new(&config).unwrap()
    }

    #[test]
    fn url_strips_trailing_slash_from_base() {
        let backend = backend();
        assert_eq!(
            backend.url("config/api-key/status"),
            "http://localhost:8080/api/config/api-key/status"
        );
    }

    #[test]
    fn next_url_embeds_profile_id() {
        let backend = backend();
        let profile_id = ProfileId::new();
        assert_eq!(
            backend.url(&format!("suggestions/next/{}", profile_id)),
            format!("http://localhost:8080/api/suggestions/next/{}", profile_id)
        );
    }
}
