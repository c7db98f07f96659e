//! SessionFlow - orchestrates one suggestion session end to end.
//!
//! All session mutations funnel through this type. Mutating operations are
//! serialized on an async lock so at most one backend call is in flight;
//! `reset` deliberately bypasses that lock (it makes no backend call) and
//! instead invalidates in-flight responses through the context epoch.

use std::sync::Arc;

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::foundation::{DomainError, EventEnvelope, ProfileId, SuggestionId};
use crate::domain::profile::NewProfile;
use crate::domain::session::{SessionContext, SessionError, SessionPhase};
use crate::domain::suggestion::{
    QueueKey, RejectionFeedback, SpendingCategory, Suggestion, SuggestionMode, Verdict,
};
use crate::ports::{CredentialGate, EventPublisher, FeedbackRecord, FeedbackSink, ProfileGateway};
use rust_decimal::Decimal;

use super::queue_client::{QueueClient, QueueOutcome};

/// Event type published when a suggestion is accepted.
pub const SUGGESTION_ACCEPTED: &str = "suggestion.accepted";
/// Event type published when a suggestion is rejected.
pub const SUGGESTION_REJECTED: &str = "suggestion.rejected";

/// Payload of a verdict event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictEvent {
    pub profile_id: ProfileId,
    pub suggestion_id: SuggestionId,
    pub verdict: Verdict,
    /// Declared capital of the profile, carried so history consumers can
    /// derive budget usage without re-fetching the profile.
    pub capital: Decimal,
}

impl VerdictEvent {
    fn into_envelope(self, event_type: &str) -> EventEnvelope {
        let aggregate_id = self.suggestion_id.to_string();
        EventEnvelope::new(
            event_type,
            aggregate_id,
            serde_json::json!({
                "profileId": self.profile_id,
                "suggestionId": self.suggestion_id,
                "verdict": self.verdict,
                "capital": self.capital,
            }),
        )
    }
}

/// Orchestrator for the suggestion session state machine.
pub struct SessionFlow {
    ctx: std::sync::Mutex<SessionContext>,
    op_lock: AsyncMutex<()>,
    profiles: Arc<dyn ProfileGateway>,
    feedback: Arc<dyn FeedbackSink>,
    gate: Arc<dyn CredentialGate>,
    events: Arc<dyn EventPublisher>,
    queue: QueueClient,
}

impl SessionFlow {
    pub fn new(
        profiles: Arc<dyn ProfileGateway>,
        feedback: Arc<dyn FeedbackSink>,
        gate: Arc<dyn CredentialGate>,
        events: Arc<dyn EventPublisher>,
        queue: QueueClient,
    ) -> Self {
        Self {
            ctx: std::sync::Mutex::new(SessionContext::new()),
            op_lock: AsyncMutex::new(()),
            profiles,
            feedback,
            gate,
            events,
            queue,
        }
    }

    /// Current session state, cloned for inspection.
    pub fn snapshot(&self) -> SessionContext {
        self.ctx().clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Credential gate
    // ─────────────────────────────────────────────────────────────────────

    /// Whether the backend currently holds a valid API key.
    pub async fn key_configured(&self) -> Result<bool, SessionError> {
        self.gate.check_status().await.map_err(Into::into)
    }

    /// Submits an API key to the backend. Returns whether it was accepted.
    pub async fn submit_api_key(&self, key: Secret<String>) -> Result<bool, SessionError> {
        self.gate.submit_key(key).await.map_err(Into::into)
    }

    /// Clears the key stored backend-side.
    pub async fn clear_api_key(&self) -> Result<(), SessionError> {
        self.gate.clear_key().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session operations
    // ─────────────────────────────────────────────────────────────────────

    /// Creates the remote profile and advances to category selection.
    pub async fn submit_profile(&self, attrs: NewProfile) -> Result<(), SessionError> {
        let _guard = self.op_lock.lock().await;
        attrs.validate()?;

        let epoch = {
            let ctx = self.ctx();
            if ctx.phase() != SessionPhase::Onboarding {
                return Err(SessionError::invalid_phase("create profile", ctx.phase()));
            }
            ctx.epoch()
        };

        match self.profiles.create(attrs).await {
            Ok(profile) => {
                let mut ctx = self.ctx();
                if !ctx.is_current_epoch(epoch) {
                    tracing::debug!("discarding profile created before reset");
                    return Ok(());
                }
                ctx.profile_created(profile)?;
                Ok(())
            }
            Err(err) => {
                // Creation failures are terminal until reset; only the
                // credential gate stays recoverable in place.
                let err = self.map_backend_error(err).await;
                let mut ctx = self.ctx();
                if ctx.is_current_epoch(epoch) {
                    if matches!(err, SessionError::Gate(_)) {
                        ctx.note_recoverable_error(err.message());
                    } else {
                        ctx.fail(err.message());
                    }
                }
                Err(err)
            }
        }
    }

    /// Selects a spending category and mode, then loads the first
    /// suggestion for that queue key.
    pub async fn select_queue(
        &self,
        category: SpendingCategory,
        mode: SuggestionMode,
    ) -> Result<Option<Suggestion>, SessionError> {
        let _guard = self.op_lock.lock().await;
        let key = QueueKey::new(category, mode);

        let (profile_id, epoch) = {
            let mut ctx = self.ctx();
            ctx.queue_selected(key)?;
            let profile_id = ctx
                .profile()
                .map(|p| p.profile_id)
                .ok_or(SessionError::invalid_phase("select queue", ctx.phase()))?;
            (profile_id, ctx.epoch())
        };

        self.fetch_next(profile_id, key, epoch).await
    }

    /// Accepts the current suggestion and loads the next one.
    pub async fn accept(&self) -> Result<Option<Suggestion>, SessionError> {
        self.resolve_current(Verdict::Accept, None).await
    }

    /// Rejects the current suggestion, optionally with a reason, and loads
    /// the next one.
    pub async fn reject(
        &self,
        rejection: Option<RejectionFeedback>,
    ) -> Result<Option<Suggestion>, SessionError> {
        if let Some(feedback) = &rejection {
            if feedback.reason.trim().is_empty() {
                return Err(SessionError::validation(
                    "reason",
                    "rejection reason must not be empty",
                ));
            }
        }
        self.resolve_current(Verdict::Reject, rejection).await
    }

    /// Unconditional return to onboarding.
    ///
    /// Takes effect immediately, even while a backend call is in flight;
    /// that call's response will be discarded on arrival.
    pub fn reset(&self) {
        self.ctx().reset();
        tracing::info!("session reset to onboarding");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn ctx(&self) -> std::sync::MutexGuard<'_, SessionContext> {
        // Context mutations cannot leave the aggregate half-updated, so a
        // poisoned lock is still safe to recover.
        self.ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Submits a verdict for the current suggestion, publishes the verdict
    /// event, and fetches the next suggestion.
    async fn resolve_current(
        &self,
        verdict: Verdict,
        rejection: Option<RejectionFeedback>,
    ) -> Result<Option<Suggestion>, SessionError> {
        let _guard = self.op_lock.lock().await;

        let (profile_id, capital, suggestion_id, key, epoch) = {
            let ctx = self.ctx();
            let profile = ctx
                .profile()
                .ok_or(SessionError::invalid_phase("submit verdict", ctx.phase()))?;
            let suggestion = ctx
                .current_suggestion()
                .ok_or(SessionError::NoCurrentSuggestion)?;
            let key = ctx
                .queue_key()
                .ok_or(SessionError::invalid_phase("submit verdict", ctx.phase()))?;
            (
                profile.profile_id,
                profile.capital,
                *suggestion.id(),
                key,
                ctx.epoch(),
            )
        };

        let record = match verdict {
            Verdict::Accept => FeedbackRecord::accept(profile_id, suggestion_id),
            Verdict::Reject => FeedbackRecord::reject(profile_id, suggestion_id, rejection),
        };

        // The suggestion stays current until the backend confirms the
        // verdict, so a failed submission can be retried as-is.
        if let Err(err) = self.feedback.submit(record).await {
            let err = self.map_backend_error(err).await;
            tracing::warn!(%suggestion_id, error = %err, "feedback submission failed");
            let mut ctx = self.ctx();
            if ctx.is_current_epoch(epoch) {
                ctx.note_recoverable_error(err.message());
            }
            return Err(err);
        }

        {
            let mut ctx = self.ctx();
            if !ctx.is_current_epoch(epoch) {
                tracing::debug!(%suggestion_id, "discarding verdict applied before reset");
                return Ok(None);
            }
            ctx.verdict_recorded()?;
        }

        let event_type = match verdict {
            Verdict::Accept => SUGGESTION_ACCEPTED,
            Verdict::Reject => SUGGESTION_REJECTED,
        };
        let event = VerdictEvent {
            profile_id,
            suggestion_id,
            verdict,
            capital,
        };
        if let Err(err) = self.events.publish(event.into_envelope(event_type)).await {
            // Verdict is already recorded backend-side; history consumers
            // will catch up on their next full refresh.
            tracing::warn!(%suggestion_id, error = %err, "verdict event publish failed");
        }

        self.fetch_next(profile_id, key, epoch).await
    }

    /// Fetches the next suggestion for the key and installs it, honoring
    /// the epoch captured before the call started.
    async fn fetch_next(
        &self,
        profile_id: ProfileId,
        key: QueueKey,
        epoch: u64,
    ) -> Result<Option<Suggestion>, SessionError> {
        match self.queue.next_or_refill(&profile_id, &key).await {
            Ok(QueueOutcome::Served(suggestion)) => {
                let mut ctx = self.ctx();
                if !ctx.is_current_epoch(epoch) {
                    tracing::debug!(id = %suggestion.id(), "discarding suggestion fetched before reset");
                    return Ok(None);
                }
                ctx.suggestion_ready(suggestion.clone())?;
                Ok(Some(suggestion))
            }
            Ok(QueueOutcome::Exhausted) => {
                let err = SessionError::QueueExhausted;
                let mut ctx = self.ctx();
                if ctx.is_current_epoch(epoch) {
                    ctx.fail(err.message());
                }
                Err(err)
            }
            Err(err) => {
                // A failed suggestion load is terminal until reset or a
                // queue-key change, matching the creation path; only gate
                // errors leave the phase untouched.
                let err = self.map_backend_error(err).await;
                let mut ctx = self.ctx();
                if ctx.is_current_epoch(epoch) {
                    if matches!(err, SessionError::Gate(_)) {
                        ctx.note_recoverable_error(err.message());
                    } else {
                        ctx.fail(err.message());
                    }
                }
                Err(err)
            }
        }
    }

    /// Maps a backend error, re-checking the credential gate when the
    /// unauthorized signal comes back instead of treating it generically.
    async fn map_backend_error(&self, err: DomainError) -> SessionError {
        if !err.is_unauthorized() {
            return err.into();
        }
        let message = match self.gate.check_status().await {
            Ok(true) => "Request rejected despite a configured API key".to_string(),
            Ok(false) => "API key required - please configure your API key".to_string(),
            Err(check_err) => check_err.message,
        };
        SessionError::gate(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemorySuggestionServer;
    use crate::domain::foundation::SuggestionId;
    use crate::domain::profile::Gender;
    use crate::domain::suggestion::PriceBreakdown;
    use crate::ports::{HistoryReader, SuggestionQueue};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    fn suggestion(title: &str, cost: Decimal) -> Suggestion {
        Suggestion::new(
            SuggestionId::new(),
            title,
            "",
            "Travel & Vacation",
            PriceBreakdown::normalized(vec![], "SEK", Some(cost)),
            vec!["Too expensive".into()],
        )
    }

    fn profile_attrs() -> NewProfile {
        NewProfile {
            gender: Gender::Female,
            age: 34,
            capital: dec!(50000),
            mode: None,
        }
    }

    fn key() -> QueueKey {
        QueueKey::new(SpendingCategory::TravelVacation, SuggestionMode::Proven)
    }

    struct Harness {
        server: Arc<InMemorySuggestionServer>,
        bus: Arc<InMemoryEventBus>,
        flow: SessionFlow,
    }

    fn harness() -> Harness {
        let server = Arc::new(InMemorySuggestionServer::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let flow = SessionFlow::new(
            server.clone(),
            server.clone(),
            server.clone(),
            bus.clone(),
            QueueClient::new(server.clone(), 5),
        );
        Harness { server, bus, flow }
    }

    async fn start_session(h: &Harness) -> ProfileId {
        h.flow.submit_profile(profile_attrs()).await.unwrap();
        h.flow
            .snapshot()
            .profile()
            .map(|p| p.profile_id)
            .unwrap()
    }

    #[tokio::test]
    async fn profile_submission_advances_to_category_selection() {
        let h = harness();
        h.flow.submit_profile(profile_attrs()).await.unwrap();
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::CategorySelection);
    }

    #[tokio::test]
    async fn invalid_profile_is_rejected_before_any_call() {
        let h = harness();
        let attrs = NewProfile {
            age: 12,
            ..profile_attrs()
        };
        let err = h.flow.submit_profile(attrs).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation { .. }));
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::Onboarding);
    }

    #[tokio::test]
    async fn select_queue_serves_first_suggestion() {
        let h = harness();
        let profile_id = start_session(&h).await;
        h.server
            .seed_queue(profile_id, key(), vec![suggestion("Skydiving", dec!(2000))]);

        let served = h
            .flow
            .select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
            .await
            .unwrap();
        assert_eq!(served.unwrap().title(), "Skydiving");
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::Suggestions);
    }

    #[tokio::test]
    async fn accept_records_verdict_publishes_event_and_serves_next() {
        let h = harness();
        let profile_id = start_session(&h).await;
        h.server.seed_queue(
            profile_id,
            key(),
            vec![
                suggestion("Skydiving", dec!(2000)),
                suggestion("Pottery class", dec!(500)),
            ],
        );

        h.flow
            .select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
            .await
            .unwrap();
        let next = h.flow.accept().await.unwrap();

        assert_eq!(next.unwrap().title(), "Pottery class");
        assert_eq!(h.bus.events_of_type(SUGGESTION_ACCEPTED).len(), 1);
        let accepted = h.server.accepted(&profile_id).await.unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].title(), "Skydiving");
    }

    #[tokio::test]
    async fn failed_feedback_keeps_current_suggestion_for_retry() {
        let h = harness();
        let profile_id = start_session(&h).await;
        h.server.seed_queue(
            profile_id,
            key(),
            vec![
                suggestion("Skydiving", dec!(2000)),
                suggestion("Pottery class", dec!(500)),
            ],
        );
        h.flow
            .select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
            .await
            .unwrap();

        h.server.fail_next_feedback();
        let err = h.flow.accept().await.unwrap_err();
        assert!(err.is_recoverable());

        let ctx = h.flow.snapshot();
        assert_eq!(ctx.phase(), SessionPhase::Suggestions);
        assert_eq!(ctx.current_suggestion().unwrap().title(), "Skydiving");

        // Retry succeeds with the same suggestion.
        let next = h.flow.accept().await.unwrap();
        assert_eq!(next.unwrap().title(), "Pottery class");
    }

    #[tokio::test]
    async fn exhausted_queue_surfaces_dedicated_error() {
        let h = harness();
        start_session(&h).await;
        // Nothing seeded and no refill batch scripted.
        let err = h
            .flow
            .select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::QueueExhausted);
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::Error);
    }

    #[tokio::test]
    async fn failed_profile_creation_moves_to_error_phase() {
        let h = harness();
        h.server.fail_profile_creation();

        let err = h.flow.submit_profile(profile_attrs()).await.unwrap_err();
        assert!(matches!(err, SessionError::Transient(_)));

        let ctx = h.flow.snapshot();
        assert_eq!(ctx.phase(), SessionPhase::Error);
        assert_eq!(ctx.error_message(), Some("profile creation failed"));

        // Only an explicit reset leaves the error phase.
        h.flow.reset();
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::Onboarding);
    }

    #[tokio::test]
    async fn failed_suggestion_load_moves_to_error_phase() {
        struct FailingQueue;

        #[async_trait]
        impl SuggestionQueue for FailingQueue {
            async fn next(
                &self,
                _profile_id: &ProfileId,
                _key: &QueueKey,
            ) -> Result<Option<Suggestion>, DomainError> {
                Err(DomainError::network("connection refused"))
            }

            async fn refill(
                &self,
                _profile_id: &ProfileId,
                _key: &QueueKey,
                _batch_size: u8,
            ) -> Result<usize, DomainError> {
                Err(DomainError::network("connection refused"))
            }
        }

        let server = Arc::new(InMemorySuggestionServer::new());
        let flow = SessionFlow::new(
            server.clone(),
            server.clone(),
            server.clone(),
            Arc::new(InMemoryEventBus::new()),
            QueueClient::new(Arc::new(FailingQueue), 5),
        );

        flow.submit_profile(profile_attrs()).await.unwrap();
        let err = flow
            .select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Transient(_)));

        let ctx = flow.snapshot();
        assert_eq!(ctx.phase(), SessionPhase::Error);
        assert_eq!(ctx.error_message(), Some("connection refused"));
    }

    #[tokio::test]
    async fn unauthorized_backend_surfaces_gate_error() {
        let h = harness();
        h.server.set_unauthorized();
        let err = h.flow.submit_profile(profile_attrs()).await.unwrap_err();
        assert!(matches!(err, SessionError::Gate(_)));
        // Gate errors are recoverable, not terminal.
        assert_eq!(h.flow.snapshot().phase(), SessionPhase::Onboarding);
    }

    #[tokio::test]
    async fn empty_rejection_reason_is_rejected_client_side() {
        let h = harness();
        let err = h
            .flow
            .reject(Some(RejectionFeedback::custom("   ")))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation { .. }));
    }

    #[tokio::test]
    async fn reset_discards_in_flight_fetch() {
        let h = harness();
        let profile_id = start_session(&h).await;
        h.server
            .seed_queue(profile_id, key(), vec![suggestion("Skydiving", dec!(2000))]);
        let barrier = h.server.hold_next_fetch();

        let flow = Arc::new(h.flow);
        let fetching = {
            let flow = flow.clone();
            tokio::spawn(async move {
                flow.select_queue(SpendingCategory::TravelVacation, SuggestionMode::Proven)
                    .await
            })
        };

        // Let the fetch reach the barrier, reset, then release it.
        tokio::task::yield_now().await;
        flow.reset();
        barrier.notify_one();

        let served = fetching.await.unwrap().unwrap();
        assert!(served.is_none());
        let ctx = flow.snapshot();
        assert_eq!(ctx.phase(), SessionPhase::Onboarding);
        assert!(ctx.current_suggestion().is_none());
    }
}
