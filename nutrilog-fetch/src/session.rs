//! Typeahead search session.
//!
//! Keystrokes are debounced before a suggestion lookup runs, and every
//! lookup carries a sequence number so that only the most recently issued
//! one may publish its results.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use nutrilog_core::{MIN_QUERY_CHARS, NutritionResult, ValidationError};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::pipeline::LookupPipeline;

/// Quiet period after the last keystroke before suggestions are fetched.
pub const DEBOUNCE: Duration = Duration::from_millis(400);

// ============================================================================
// Events
// ============================================================================

/// Update published to the suggestion list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SuggestionEvent {
    /// Input too short; the list should be emptied.
    Cleared,
    /// Fresh suggestions for `query`.
    Ready {
        /// Sequence number of the lookup.
        seq: u64,
        /// Query the suggestions answer.
        query: String,
        /// At most five results.
        results: Vec<NutritionResult>,
    },
    /// The suggestion lookup failed.
    Failed {
        /// Sequence number of the lookup.
        seq: u64,
        /// Query that failed.
        query: String,
        /// User-facing message.
        message: String,
    },
}

/// Result of an explicit search.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupReply {
    /// This lookup is the latest one issued.
    Current {
        /// Sequence number of the lookup.
        seq: u64,
        /// Results in candidate order.
        results: Vec<NutritionResult>,
    },
    /// A newer lookup was issued while this one ran; its outcome is void.
    Superseded {
        /// Sequence number of the lookup.
        seq: u64,
    },
}

impl LookupReply {
    /// Returns the results if the lookup is current.
    pub fn into_results(self) -> Option<Vec<NutritionResult>> {
        match self {
            Self::Current { results, .. } => Some(results),
            Self::Superseded { .. } => None,
        }
    }
}

// ============================================================================
// Sequencing
// ============================================================================

#[derive(Debug, Default)]
struct RequestSequence(AtomicU64);

impl RequestSequence {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest() == seq
    }
}

// ============================================================================
// Debouncer
// ============================================================================

/// Single pending delayed task; scheduling aborts the previous one.
#[derive(Debug)]
struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Search Session
// ============================================================================

/// Debounced suggestions plus sequenced explicit searches.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct SearchSession {
    pipeline: LookupPipeline,
    sequence: Arc<RequestSequence>,
    debouncer: Debouncer,
    events: mpsc::UnboundedSender<SuggestionEvent>,
}

impl SearchSession {
    /// Creates a session and the receiver its suggestion events go to.
    pub fn new(pipeline: LookupPipeline) -> (Self, mpsc::UnboundedReceiver<SuggestionEvent>) {
        Self::with_debounce(pipeline, DEBOUNCE)
    }

    /// Creates a session with a custom debounce delay.
    pub fn with_debounce(
        pipeline: LookupPipeline,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            pipeline,
            sequence: Arc::new(RequestSequence::default()),
            debouncer: Debouncer::new(delay),
            events,
        };
        (session, rx)
    }

    /// Returns the underlying pipeline.
    pub fn pipeline(&self) -> &LookupPipeline {
        &self.pipeline
    }

    /// Returns the most recently issued sequence number (0 before any lookup).
    pub fn latest_seq(&self) -> u64 {
        self.sequence.latest()
    }

    /// Handles an edit of the search box.
    ///
    /// Any pending suggestion is cancelled. Short input publishes
    /// [`SuggestionEvent::Cleared`]; otherwise a lookup is scheduled after
    /// the debounce delay.
    pub fn on_query_changed(&self, text: &str) {
        self.debouncer.cancel();

        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            let _ = self.events.send(SuggestionEvent::Cleared);
            return;
        }

        let query = query.to_string();
        let pipeline = self.pipeline.clone();
        let sequence = Arc::clone(&self.sequence);
        let events = self.events.clone();

        self.debouncer.schedule(async move {
            let seq = sequence.issue();
            debug!(seq, query = %query, "Running suggestion lookup");

            let outcome = pipeline.suggest(&query).await;
            if !sequence.is_latest(seq) {
                debug!(seq, "Dropping stale suggestions");
                return;
            }

            let event = match outcome {
                Ok(results) => SuggestionEvent::Ready { seq, query, results },
                Err(err) => SuggestionEvent::Failed {
                    seq,
                    query,
                    message: err.user_message(),
                },
            };
            // Receiver gone means nobody is listening any more.
            let _ = events.send(event);
        });
    }

    /// Cancels any pending suggestion without publishing.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }

    /// Runs an explicit search immediately.
    ///
    /// Cancels any pending suggestion first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty or too-short input, or the
    /// search-stage error of a lookup that is still current.
    #[instrument(skip(self))]
    pub async fn submit(&self, text: &str) -> Result<LookupReply, FetchError> {
        self.debouncer.cancel();

        let query = ValidationError::check_query(text)?;
        let seq = self.sequence.issue();

        let outcome = self.pipeline.lookup(query).await;
        if !self.sequence.is_latest(seq) {
            debug!(seq, latest = self.sequence.latest(), "Lookup superseded");
            return Ok(LookupReply::Superseded { seq });
        }

        Ok(LookupReply::Current {
            seq,
            results: outcome?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDatabase;

    fn session(db: MockDatabase) -> (SearchSession, mpsc::UnboundedReceiver<SuggestionEvent>, Arc<MockDatabase>) {
        let db = Arc::new(db);
        let (session, rx) = SearchSession::new(LookupPipeline::new(db.clone()));
        (session, rx, db)
    }

    fn apples() -> MockDatabase {
        MockDatabase::new()
            .with_food(1, "Apple", 52.0)
            .with_food(2, "Apple Juice", 46.0)
            .with_food(3, "Banana", 89.0)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_runs_one_lookup_after_last_keystroke() {
        let (session, mut rx, db) = session(apples());

        session.on_query_changed("ap");
        sleep_ms(100).await;
        session.on_query_changed("app");
        sleep_ms(100).await;
        session.on_query_changed("appl");

        sleep_ms(399).await;
        assert!(rx.try_recv().is_err());
        assert!(db.queries().is_empty());

        sleep_ms(10).await;
        match rx.recv().await.unwrap() {
            SuggestionEvent::Ready { query, results, .. } => {
                assert_eq!(query, "appl");
                assert_eq!(results.len(), 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(db.queries(), vec!["appl"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_publishes_nothing() {
        let (session, mut rx, db) = session(apples());

        session.on_query_changed("apple");
        sleep_ms(200).await;
        session.cancel_pending();

        sleep_ms(1000).await;
        assert!(rx.try_recv().is_err());
        assert!(db.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears() {
        let (session, mut rx, db) = session(apples());

        session.on_query_changed("apple");
        session.on_query_changed(" a ");

        assert_eq!(rx.recv().await.unwrap(), SuggestionEvent::Cleared);
        sleep_ms(1000).await;
        assert!(rx.try_recv().is_err());
        assert!(db.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_capped_at_five() {
        let mut db = MockDatabase::new();
        for id in 1..=9 {
            db = db.with_food(id, &format!("Rice {id}"), 130.0);
        }
        let (session, mut rx, _db) = session(db);

        session.on_query_changed("rice");
        match rx.recv().await.unwrap() {
            SuggestionEvent::Ready { results, .. } => assert_eq!(results.len(), 5),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_suggestion_dropped_on_new_input() {
        let db = apples().with_query_delay("ap", Duration::from_secs(1));
        let (session, mut rx, db) = session(db);

        session.on_query_changed("ap");
        // Past the debounce, lookup for "ap" is in flight.
        sleep_ms(500).await;
        session.on_query_changed("banana");

        match rx.recv().await.unwrap() {
            SuggestionEvent::Ready { query, .. } => assert_eq!(query, "banana"),
            other => panic!("unexpected event: {other:?}"),
        }
        sleep_ms(2000).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(db.queries(), vec!["ap", "banana"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_failure_is_published() {
        let (session, mut rx, _db) = session(MockDatabase::new().with_failing_search());

        session.on_query_changed("apple");
        match rx.recv().await.unwrap() {
            SuggestionEvent::Failed { message, .. } => {
                assert_eq!(message, "Could not reach the food database.");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_cancels_pending_suggestion() {
        let (session, mut rx, db) = session(apples());

        session.on_query_changed("apple");
        let reply = session.submit("banana").await.unwrap();

        let results = reply.into_results().unwrap();
        assert_eq!(results[0].name, "Banana");

        sleep_ms(1000).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(db.queries(), vec!["banana"]);
    }

    #[tokio::test]
    async fn test_submit_validates_input() {
        let (session, _rx, db) = session(apples());

        let err = session.submit("   ").await.unwrap_err();
        assert!(matches!(err, FetchError::Validation(ValidationError::EmptyQuery)));

        let err = session.submit("a").await.unwrap_err();
        assert_eq!(err.user_message(), "Please enter at least 2 characters.");

        assert!(db.queries().is_empty());
        assert_eq!(session.latest_seq(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_submit_is_superseded() {
        let db = apples().with_query_delay("apple", Duration::from_secs(2));
        let (session, _rx, _db) = session(db);

        let slow = session.submit("apple");
        let fast = async {
            sleep_ms(100).await;
            session.submit("banana").await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow.unwrap(), LookupReply::Superseded { seq: 1 });
        match fast.unwrap() {
            LookupReply::Current { seq, results } => {
                assert_eq!(seq, 2);
                assert_eq!(results[0].name, "Banana");
            }
            other @ LookupReply::Superseded { .. } => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_error_is_superseded() {
        let db = MockDatabase::new()
            .with_failing_search()
            .with_query_delay("apple", Duration::from_secs(2));
        let (session, _rx, _db) = session(db);

        let slow = session.submit("apple");
        let fast = async {
            sleep_ms(100).await;
            session.submit("pear").await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow.unwrap(), LookupReply::Superseded { seq: 1 });
        assert!(fast.unwrap_err().is_remote());
    }
}
