//! Session context aggregate.
//!
//! All mutable session state lives here, owned and mutated exclusively by
//! the state machine orchestrator. The `epoch` counter gates application
//! of late responses: reset bumps it, and any response captured under an
//! older epoch must be discarded instead of applied.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;
use crate::domain::profile::CreatedProfile;
use crate::domain::suggestion::{QueueKey, Suggestion};

use super::{SessionError, SessionPhase};

/// Aggregate holding one client session's state.
///
/// # Invariants
///
/// - At most one pending (not-yet-verdicted) suggestion is held at a time
/// - Phase changes follow the `SessionPhase` state machine
/// - Reset always succeeds and invalidates in-flight responses via `epoch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    phase: SessionPhase,
    epoch: u64,
    profile: Option<CreatedProfile>,
    queue_key: Option<QueueKey>,
    current: Option<Suggestion>,
    error: Option<String>,
}

impl SessionContext {
    /// Fresh context at onboarding.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Onboarding,
            epoch: 0,
            profile: None,
            queue_key: None,
            current: None,
            error: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Monotonic counter identifying the active session generation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a response captured under `epoch` may still be applied.
    pub fn is_current_epoch(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn profile(&self) -> Option<&CreatedProfile> {
        self.profile.as_ref()
    }

    pub fn queue_key(&self) -> Option<QueueKey> {
        self.queue_key
    }

    /// The single pending suggestion, if one is displayed.
    pub fn current_suggestion(&self) -> Option<&Suggestion> {
        self.current.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations (driven by the state machine orchestrator)
    // ─────────────────────────────────────────────────────────────────────

    /// Unconditional reset to onboarding. Clears all state, bumps the epoch.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::new();
        self.epoch = epoch;
    }

    /// Records the created profile and advances to category selection.
    pub fn profile_created(&mut self, profile: CreatedProfile) -> Result<(), SessionError> {
        self.transition("create profile", SessionPhase::CategorySelection)?;
        self.profile = Some(profile);
        self.error = None;
        Ok(())
    }

    /// Stores the queue key and enters the loading phase.
    pub fn queue_selected(&mut self, key: QueueKey) -> Result<(), SessionError> {
        if self.profile.is_none() {
            return Err(SessionError::invalid_phase("select queue", self.phase));
        }
        self.transition("select queue", SessionPhase::Loading)?;
        self.queue_key = Some(key);
        self.current = None;
        self.error = None;
        Ok(())
    }

    /// Clears the resolved suggestion and re-enters loading for the next one.
    pub fn verdict_recorded(&mut self) -> Result<Suggestion, SessionError> {
        let resolved = self.current.take().ok_or(SessionError::NoCurrentSuggestion)?;
        self.transition("record verdict", SessionPhase::Loading)?;
        self.error = None;
        Ok(resolved)
    }

    /// Installs a freshly fetched pending suggestion.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` if not loading, or if a pending suggestion is
    ///   already held (the at-most-one invariant)
    pub fn suggestion_ready(&mut self, suggestion: Suggestion) -> Result<(), SessionError> {
        if self.current.is_some() {
            return Err(SessionError::invalid_phase("install suggestion", self.phase));
        }
        self.transition("install suggestion", SessionPhase::Suggestions)?;
        self.current = Some(suggestion);
        Ok(())
    }

    /// Moves to the terminal-until-reset error phase with a surfaced message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = SessionPhase::Error;
        self.error = Some(message.into());
        self.current = None;
    }

    /// Records a recoverable failure without leaving the current phase.
    ///
    /// Used for feedback submission errors: the current suggestion stays
    /// in place so the same verdict can be retried.
    pub fn note_recoverable_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn transition(
        &mut self,
        operation: &'static str,
        target: SessionPhase,
    ) -> Result<(), SessionError> {
        if !self.phase.can_transition_to(&target) {
            return Err(SessionError::invalid_phase(operation, self.phase));
        }
        self.phase = target;
        Ok(())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProfileId, SuggestionId};
    use crate::domain::suggestion::{PriceBreakdown, SpendingCategory, SuggestionMode};
    use rust_decimal_macros::dec;

    fn profile() -> CreatedProfile {
        CreatedProfile {
            profile_id: ProfileId::new(),
            profile_summary: "An adventurous person".to_string(),
            capital: dec!(50000),
            mode: None,
        }
    }

    fn suggestion() -> Suggestion {
        Suggestion::new(
            SuggestionId::new(),
            "Hot air balloon ride",
            "Sunrise flight over the valley",
            "Travel & Vacation",
            PriceBreakdown::normalized(vec![], "SEK", Some(dec!(3000))),
            vec!["Too expensive".into()],
        )
    }

    fn key() -> QueueKey {
        QueueKey::new(SpendingCategory::TravelVacation, SuggestionMode::Proven)
    }

    fn context_in_suggestions() -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.profile_created(profile()).unwrap();
        ctx.queue_selected(key()).unwrap();
        ctx.suggestion_ready(suggestion()).unwrap();
        ctx
    }

    #[test]
    fn fresh_context_starts_at_onboarding() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.phase(), SessionPhase::Onboarding);
        assert_eq!(ctx.epoch(), 0);
        assert!(ctx.profile().is_none());
    }

    #[test]
    fn happy_path_reaches_suggestions() {
        let ctx = context_in_suggestions();
        assert_eq!(ctx.phase(), SessionPhase::Suggestions);
        assert!(ctx.current_suggestion().is_some());
    }

    #[test]
    fn queue_selection_requires_profile() {
        let mut ctx = SessionContext::new();
        assert!(ctx.queue_selected(key()).is_err());
    }

    #[test]
    fn at_most_one_pending_suggestion() {
        let mut ctx = context_in_suggestions();
        let err = ctx.suggestion_ready(suggestion()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidPhase { .. }));
    }

    #[test]
    fn verdict_clears_current_and_returns_to_loading() {
        let mut ctx = context_in_suggestions();
        let resolved = ctx.verdict_recorded().unwrap();
        assert_eq!(resolved.title(), "Hot air balloon ride");
        assert_eq!(ctx.phase(), SessionPhase::Loading);
        assert!(ctx.current_suggestion().is_none());
    }

    #[test]
    fn verdict_without_current_fails() {
        let mut ctx = SessionContext::new();
        assert_eq!(
            ctx.verdict_recorded().unwrap_err(),
            SessionError::NoCurrentSuggestion
        );
    }

    #[test]
    fn reset_clears_state_and_bumps_epoch() {
        let mut ctx = context_in_suggestions();
        let old_epoch = ctx.epoch();
        ctx.reset();
        assert_eq!(ctx.phase(), SessionPhase::Onboarding);
        assert!(ctx.profile().is_none());
        assert!(ctx.queue_key().is_none());
        assert!(ctx.current_suggestion().is_none());
        assert!(ctx.error_message().is_none());
        assert_eq!(ctx.epoch(), old_epoch + 1);
        assert!(!ctx.is_current_epoch(old_epoch));
    }

    #[test]
    fn fail_moves_to_error_with_message() {
        let mut ctx = context_in_suggestions();
        ctx.fail("backend unavailable");
        assert_eq!(ctx.phase(), SessionPhase::Error);
        assert_eq!(ctx.error_message(), Some("backend unavailable"));
    }

    #[test]
    fn recoverable_error_preserves_phase_and_suggestion() {
        let mut ctx = context_in_suggestions();
        ctx.note_recoverable_error("feedback failed");
        assert_eq!(ctx.phase(), SessionPhase::Suggestions);
        assert!(ctx.current_suggestion().is_some());
        assert_eq!(ctx.error_message(), Some("feedback failed"));
    }

    #[test]
    fn queue_change_recovers_from_error_phase() {
        let mut ctx = context_in_suggestions();
        ctx.fail("no more suggestions");
        ctx.queue_selected(QueueKey::new(
            SpendingCategory::HealthWellness,
            SuggestionMode::Creative,
        ))
        .unwrap();
        assert_eq!(ctx.phase(), SessionPhase::Loading);
        assert!(ctx.error_message().is_none());
    }
}
