//! In-memory suggestion server for testing.
//!
//! Implements every server-side port against local state, allowing the
//! session flow to be exercised without a backend.
//!
//! # Features
//!
//! - Seeded pending queues per (profile, queue key)
//! - Scripted refill batches (empty batches simulate generator exhaustion)
//! - Error injection for feedback and profile creation
//! - Unauthorized-mode for credential gate testing
//! - A fetch barrier for racing reset against an in-flight request
//! - Call counting for verification
//!
//! # Panics
//!
//! Methods panic if internal locks are poisoned. This adapter is for
//! testing; production code talks to the HTTP backend.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::foundation::{
    DomainError, ErrorCode, ProfileId, SuggestionId, Timestamp,
};
use crate::domain::profile::{CreatedProfile, NewProfile};
use crate::domain::suggestion::{QueueKey, RejectedSuggestion, Suggestion, Verdict};
use crate::ports::{
    CredentialGate, FeedbackRecord, FeedbackSink, HistoryReader, ProfileGateway, SuggestionQueue,
};

type QueueSlot = (ProfileId, QueueKey);

#[derive(Default)]
struct ServerState {
    queues: HashMap<QueueSlot, VecDeque<Suggestion>>,
    refill_batches: HashMap<QueueSlot, VecDeque<Vec<Suggestion>>>,
    accepted: HashMap<ProfileId, Vec<Suggestion>>,
    rejected: HashMap<ProfileId, Vec<RejectedSuggestion>>,
    resolved: HashSet<SuggestionId>,
}

/// In-memory stand-in for the suggestion backend.
pub struct InMemorySuggestionServer {
    state: Mutex<ServerState>,
    has_valid_key: AtomicBool,
    unauthorized: AtomicBool,
    fail_next_feedback: AtomicBool,
    fail_profile_creation: AtomicBool,
    next_barrier: Mutex<Option<Arc<Notify>>>,
    next_calls: AtomicUsize,
    refill_calls: AtomicUsize,
    feedback_calls: AtomicUsize,
}

impl InMemorySuggestionServer {
    /// Creates a server with a valid credential and no pending suggestions.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServerState::default()),
            has_valid_key: AtomicBool::new(true),
            unauthorized: AtomicBool::new(false),
            fail_next_feedback: AtomicBool::new(false),
            fail_profile_creation: AtomicBool::new(false),
            next_barrier: Mutex::new(None),
            next_calls: AtomicUsize::new(0),
            refill_calls: AtomicUsize::new(0),
            feedback_calls: AtomicUsize::new(0),
        }
    }

    // === Seeding ===

    /// Appends suggestions to a pending queue.
    pub fn seed_queue(&self, profile_id: ProfileId, key: QueueKey, suggestions: Vec<Suggestion>) {
        let mut state = self.lock_state();
        state
            .queues
            .entry((profile_id, key))
            .or_default()
            .extend(suggestions);
    }

    /// Scripts the next refill response for a queue key.
    ///
    /// Batches are consumed in order; an empty batch simulates a generator
    /// that produced nothing. With no scripted batches, refill yields zero.
    pub fn push_refill_batch(
        &self,
        profile_id: ProfileId,
        key: QueueKey,
        batch: Vec<Suggestion>,
    ) {
        let mut state = self.lock_state();
        state
            .refill_batches
            .entry((profile_id, key))
            .or_default()
            .push_back(batch);
    }

    // === Error injection ===

    /// Makes every operation fail with the unauthorized signal until
    /// a key is submitted.
    pub fn set_unauthorized(&self) {
        self.unauthorized.store(true, Ordering::SeqCst);
        self.has_valid_key.store(false, Ordering::SeqCst);
    }

    /// Fails the next feedback submission with a network error.
    pub fn fail_next_feedback(&self) {
        self.fail_next_feedback.store(true, Ordering::SeqCst);
    }

    /// Fails every profile creation with a network error.
    pub fn fail_profile_creation(&self) {
        self.fail_profile_creation.store(true, Ordering::SeqCst);
    }

    /// Installs a barrier that blocks `next` fetches until notified.
    ///
    /// Lets tests interleave a reset with an in-flight fetch.
    pub fn hold_next_fetch(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self
            .next_barrier
            .lock()
            .expect("InMemorySuggestionServer: barrier lock poisoned") = Some(notify.clone());
        notify
    }

    // === Verification ===

    pub fn next_call_count(&self) -> usize {
        self.next_calls.load(Ordering::SeqCst)
    }

    pub fn refill_call_count(&self) -> usize {
        self.refill_calls.load(Ordering::SeqCst)
    }

    pub fn feedback_call_count(&self) -> usize {
        self.feedback_calls.load(Ordering::SeqCst)
    }

    /// Suggestions resolved so far (accepted or rejected).
    pub fn resolved_ids(&self) -> HashSet<SuggestionId> {
        self.lock_state().resolved.clone()
    }

    /// Pending ids for one queue key.
    pub fn pending_ids(&self, profile_id: ProfileId, key: QueueKey) -> Vec<SuggestionId> {
        self.lock_state()
            .queues
            .get(&(profile_id, key))
            .map(|q| q.iter().map(|s| *s.id()).collect())
            .unwrap_or_default()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state
            .lock()
            .expect("InMemorySuggestionServer: state lock poisoned")
    }

    fn check_authorized(&self) -> Result<(), DomainError> {
        if self.unauthorized.load(Ordering::SeqCst) {
            Err(DomainError::unauthorized("API key required"))
        } else {
            Ok(())
        }
    }

    async fn wait_barrier(&self) {
        let barrier = self
            .next_barrier
            .lock()
            .expect("InMemorySuggestionServer: barrier lock poisoned")
            .clone();
        if let Some(notify) = barrier {
            notify.notified().await;
        }
    }
}

impl Default for InMemorySuggestionServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionQueue for InMemorySuggestionServer {
    async fn next(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
    ) -> Result<Option<Suggestion>, DomainError> {
        self.next_calls.fetch_add(1, Ordering::SeqCst);
        self.check_authorized()?;
        self.wait_barrier().await;

        // Pending head stays queued until a verdict resolves it.
        let state = self.lock_state();
        Ok(state
            .queues
            .get(&(*profile_id, *key))
            .and_then(|q| q.front())
            .cloned())
    }

    async fn refill(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
        _batch_size: u8,
    ) -> Result<usize, DomainError> {
        self.refill_calls.fetch_add(1, Ordering::SeqCst);
        self.check_authorized()?;

        let mut state = self.lock_state();
        let batch = state
            .refill_batches
            .get_mut(&(*profile_id, *key))
            .and_then(|batches| batches.pop_front())
            .unwrap_or_default();
        let count = batch.len();
        state
            .queues
            .entry((*profile_id, *key))
            .or_default()
            .extend(batch);
        Ok(count)
    }
}

#[async_trait]
impl FeedbackSink for InMemorySuggestionServer {
    async fn submit(&self, record: FeedbackRecord) -> Result<(), DomainError> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        self.check_authorized()?;
        if self.fail_next_feedback.swap(false, Ordering::SeqCst) {
            return Err(DomainError::network("feedback submission failed"));
        }

        let mut state = self.lock_state();
        if state.resolved.contains(&record.suggestion_id) {
            return Err(DomainError::new(
                ErrorCode::SuggestionAlreadyResolved,
                format!("Suggestion {} already resolved", record.suggestion_id),
            ));
        }

        // Remove from whichever queue holds it.
        let mut found = None;
        for queue in state.queues.values_mut() {
            if let Some(pos) = queue.iter().position(|s| s.id() == &record.suggestion_id) {
                found = queue.remove(pos);
                break;
            }
        }
        let suggestion = found.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SuggestionNotFound,
                format!("Suggestion {} is not pending", record.suggestion_id),
            )
        })?;

        state.resolved.insert(record.suggestion_id);
        match record.verdict {
            Verdict::Accept => {
                state
                    .accepted
                    .entry(record.profile_id)
                    .or_default()
                    .push(suggestion);
            }
            Verdict::Reject => {
                let (reason, is_custom) = record
                    .rejection
                    .map(|r| (r.reason, r.is_custom_reason))
                    .unwrap_or_default();
                state.rejected.entry(record.profile_id).or_default().push(
                    RejectedSuggestion::new(
                        suggestion,
                        reason,
                        is_custom,
                        Some(Timestamp::now()),
                    ),
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryReader for InMemorySuggestionServer {
    async fn accepted(&self, profile_id: &ProfileId) -> Result<Vec<Suggestion>, DomainError> {
        self.check_authorized()?;
        Ok(self
            .lock_state()
            .accepted
            .get(profile_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn rejected(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<RejectedSuggestion>, DomainError> {
        self.check_authorized()?;
        Ok(self
            .lock_state()
            .rejected
            .get(profile_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProfileGateway for InMemorySuggestionServer {
    async fn create(&self, profile: NewProfile) -> Result<CreatedProfile, DomainError> {
        self.check_authorized()?;
        if self.fail_profile_creation.load(Ordering::SeqCst) {
            return Err(DomainError::network("profile creation failed"));
        }
        Ok(CreatedProfile {
            profile_id: ProfileId::new(),
            profile_summary: format!("A {}-year-old looking for new experiences", profile.age),
            capital: profile.capital,
            mode: profile.mode,
        })
    }
}

#[async_trait]
impl CredentialGate for InMemorySuggestionServer {
    async fn check_status(&self) -> Result<bool, DomainError> {
        Ok(self.has_valid_key.load(Ordering::SeqCst))
    }

    async fn submit_key(&self, key: Secret<String>) -> Result<bool, DomainError> {
        let accepted = !key.expose_secret().is_empty();
        if accepted {
            self.has_valid_key.store(true, Ordering::SeqCst);
            self.unauthorized.store(false, Ordering::SeqCst);
        }
        Ok(accepted)
    }

    async fn clear_key(&self) -> Result<(), DomainError> {
        self.has_valid_key.store(false, Ordering::SeqCst);
        self.unauthorized.store(true, Ordering::SeqCst);
        Ok(())
    }
}
