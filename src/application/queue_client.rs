//! QueueClient - suggestion delivery with the single-refill discipline.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::suggestion::{QueueKey, Suggestion};
use crate::ports::SuggestionQueue;

/// Outcome of asking the queue for the next suggestion.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueOutcome {
    /// A suggestion is available for display.
    Served(Suggestion),
    /// Queue empty even after the refill attempt.
    Exhausted,
}

/// Client wrapper over the [`SuggestionQueue`] port.
///
/// A fetch that finds the queue empty triggers at most ONE refill request
/// and then one re-query. A refill that creates nothing, or a re-query
/// that still comes back empty, means the queue key is exhausted; the
/// client never loops on refills.
pub struct QueueClient {
    queue: Arc<dyn SuggestionQueue>,
    batch_size: u8,
}

impl QueueClient {
    pub fn new(queue: Arc<dyn SuggestionQueue>, batch_size: u8) -> Self {
        Self { queue, batch_size }
    }

    /// Fetches the next suggestion, refilling once if the queue is empty.
    pub async fn next_or_refill(
        &self,
        profile_id: &ProfileId,
        key: &QueueKey,
    ) -> Result<QueueOutcome, DomainError> {
        if let Some(suggestion) = self.queue.next(profile_id, key).await? {
            return Ok(QueueOutcome::Served(suggestion));
        }

        tracing::debug!(%profile_id, ?key, batch = self.batch_size, "queue empty, refilling");
        let created = self.queue.refill(profile_id, key, self.batch_size).await?;
        if created == 0 {
            tracing::info!(%profile_id, ?key, "refill produced nothing, queue exhausted");
            return Ok(QueueOutcome::Exhausted);
        }

        match self.queue.next(profile_id, key).await? {
            Some(suggestion) => Ok(QueueOutcome::Served(suggestion)),
            None => Ok(QueueOutcome::Exhausted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SuggestionId;
    use crate::domain::suggestion::{PriceBreakdown, SpendingCategory, SuggestionMode};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn suggestion(title: &str) -> Suggestion {
        Suggestion::new(
            SuggestionId::new(),
            title,
            "",
            "Travel & Vacation",
            PriceBreakdown::normalized(vec![], "SEK", Some(dec!(1000))),
            vec![],
        )
    }

    fn key() -> QueueKey {
        QueueKey::new(SpendingCategory::TravelVacation, SuggestionMode::Proven)
    }

    /// Scripted queue: pops a response per `next` call, counts refills.
    struct ScriptedQueue {
        responses: Mutex<VecDeque<Option<Suggestion>>>,
        refill_created: usize,
        next_calls: Mutex<usize>,
        refill_calls: Mutex<usize>,
    }

    impl ScriptedQueue {
        fn new(responses: Vec<Option<Suggestion>>, refill_created: usize) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                refill_created,
                next_calls: Mutex::new(0),
                refill_calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl SuggestionQueue for ScriptedQueue {
        async fn next(
            &self,
            _profile_id: &ProfileId,
            _key: &QueueKey,
        ) -> Result<Option<Suggestion>, DomainError> {
            *self.next_calls.lock().unwrap() += 1;
            Ok(self.responses.lock().unwrap().pop_front().flatten())
        }

        async fn refill(
            &self,
            _profile_id: &ProfileId,
            _key: &QueueKey,
            _batch_size: u8,
        ) -> Result<usize, DomainError> {
            *self.refill_calls.lock().unwrap() += 1;
            Ok(self.refill_created)
        }
    }

    #[tokio::test]
    async fn served_directly_without_refill() {
        let queue = Arc::new(ScriptedQueue::new(vec![Some(suggestion("Skydiving"))], 5));
        let client = QueueClient::new(queue.clone(), 5);

        let outcome = client.next_or_refill(&ProfileId::new(), &key()).await.unwrap();
        assert!(matches!(outcome, QueueOutcome::Served(s) if s.title() == "Skydiving"));
        assert_eq!(*queue.refill_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_queue_refills_once_then_serves() {
        let queue = Arc::new(ScriptedQueue::new(
            vec![None, Some(suggestion("Pottery class"))],
            5,
        ));
        let client = QueueClient::new(queue.clone(), 5);

        let outcome = client.next_or_refill(&ProfileId::new(), &key()).await.unwrap();
        assert!(matches!(outcome, QueueOutcome::Served(_)));
        assert_eq!(*queue.refill_calls.lock().unwrap(), 1);
        assert_eq!(*queue.next_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn refill_creating_nothing_is_exhausted_without_requery() {
        let queue = Arc::new(ScriptedQueue::new(vec![None], 0));
        let client = QueueClient::new(queue.clone(), 5);

        let outcome = client.next_or_refill(&ProfileId::new(), &key()).await.unwrap();
        assert_eq!(outcome, QueueOutcome::Exhausted);
        assert_eq!(*queue.refill_calls.lock().unwrap(), 1);
        assert_eq!(*queue.next_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_requery_after_refill_is_exhausted_not_looped() {
        let queue = Arc::new(ScriptedQueue::new(vec![None, None], 5));
        let client = QueueClient::new(queue.clone(), 5);

        let outcome = client.next_or_refill(&ProfileId::new(), &key()).await.unwrap();
        assert_eq!(outcome, QueueOutcome::Exhausted);
        // Never a second refill attempt.
        assert_eq!(*queue.refill_calls.lock().unwrap(), 1);
        assert_eq!(*queue.next_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn unauthorized_error_propagates_untouched() {
        struct UnauthorizedQueue;

        #[async_trait]
        impl SuggestionQueue for UnauthorizedQueue {
            async fn next(
                &self,
                _profile_id: &ProfileId,
                _key: &QueueKey,
            ) -> Result<Option<Suggestion>, DomainError> {
                Err(DomainError::unauthorized("API key required"))
            }

            async fn refill(
                &self,
                _profile_id: &ProfileId,
                _key: &QueueKey,
                _batch_size: u8,
            ) -> Result<usize, DomainError> {
                Err(DomainError::unauthorized("API key required"))
            }
        }

        let client = QueueClient::new(Arc::new(UnauthorizedQueue), 5);
        let err = client
            .next_or_refill(&ProfileId::new(), &key())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
