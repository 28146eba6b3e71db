//! Two-source selection state machine.
//!
//! The primary channel is always tried first; any failure there is a
//! diagnostic, not an outcome, and control falls through to the
//! fallback. Only a fallback failure is terminal. Modeled as explicit
//! states rather than nested error handling so the transitions stay
//! visible and testable.

use crate::error::RetrievalError;
use crate::model::{FetchResult, Query};
use crate::sources::Retriever;
use tracing::warn;

/// Control states for one invocation.
enum FetchState {
    Init,
    TryingPrimary,
    TryingFallback,
    Succeeded(FetchResult),
    Failed(RetrievalError),
}

/// Runs both channels in order for a single query.
pub struct Orchestrator<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Retriever, F: Retriever> Orchestrator<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Attempt each channel at most once. A primary error is absorbed
    /// and logged; a fallback error is returned to the caller.
    pub async fn run(&self, query: &Query) -> Result<FetchResult, RetrievalError> {
        let mut state = FetchState::Init;
        loop {
            state = match state {
                FetchState::Init => FetchState::TryingPrimary,
                FetchState::TryingPrimary => match self.primary.fetch(query).await {
                    Ok(trains) => FetchState::Succeeded(FetchResult {
                        source: self.primary.source(),
                        trains,
                    }),
                    Err(e) => {
                        warn!("primary channel failed: {e}; falling back to open data");
                        FetchState::TryingFallback
                    }
                },
                FetchState::TryingFallback => match self.fallback.fetch(query).await {
                    Ok(trains) => FetchState::Succeeded(FetchResult {
                        source: self.fallback.source(),
                        trains,
                    }),
                    Err(e) => FetchState::Failed(e),
                },
                FetchState::Succeeded(result) => return Ok(result),
                FetchState::Failed(e) => {
                    warn!("fallback channel also failed: {e}");
                    return Err(e);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Source, TrainAvailability};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeRetriever {
        source: Source,
        outcome: Result<Vec<TrainAvailability>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeRetriever {
        fn new(source: Source, outcome: Result<Vec<TrainAvailability>, String>) -> Self {
            Self {
                source,
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Retriever for FakeRetriever {
        fn source(&self) -> Source {
            self.source
        }

        async fn fetch(
            &self,
            _query: &Query,
        ) -> Result<Vec<TrainAvailability>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .clone()
                .map_err(RetrievalError::Navigation)
        }
    }

    fn query() -> Query {
        Query {
            origin: "FRPAR".to_string(),
            destination: "FRRST".to_string(),
            date: "2026-03-03".to_string(),
        }
    }

    fn train() -> TrainAvailability {
        TrainAvailability {
            train_number: "2501".to_string(),
            train_type: "INOUI".to_string(),
            departure_time: "2026-03-03T07:06".to_string(),
            arrival_time: "2026-03-03T07:45".to_string(),
            seats_available: 64,
            origin: "PARIS EST".to_string(),
            destination: "CHAMPAGNE-ARDENNE TGV".to_string(),
        }
    }

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let primary = FakeRetriever::new(Source::Camoufox, Ok(vec![train()]));
        let fallback = FakeRetriever::new(Source::Opendata, Ok(vec![]));
        let fallback_calls = fallback.calls.clone();

        let result = Orchestrator::new(primary, fallback)
            .run(&query())
            .await
            .unwrap();

        assert_eq!(result.source, Source::Camoufox);
        assert_eq!(result.trains, vec![train()]);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_primary_sequence_is_still_a_success() {
        let primary = FakeRetriever::new(Source::Camoufox, Ok(vec![]));
        let fallback = FakeRetriever::new(Source::Opendata, Ok(vec![train()]));

        let result = Orchestrator::new(primary, fallback)
            .run(&query())
            .await
            .unwrap();

        assert_eq!(result.source, Source::Camoufox);
        assert!(result.trains.is_empty());
    }

    #[tokio::test]
    async fn primary_failure_falls_through_to_fallback() {
        let primary = FakeRetriever::new(Source::Camoufox, Err("timed out".to_string()));
        let fallback = FakeRetriever::new(Source::Opendata, Ok(vec![train()]));
        let primary_calls = primary.calls.clone();
        let fallback_calls = fallback.calls.clone();

        let result = Orchestrator::new(primary, fallback)
            .run(&query())
            .await
            .unwrap();

        assert_eq!(result.source, Source::Opendata);
        // Each channel attempted exactly once; no retry loops.
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failures_surface_the_fallback_error() {
        let primary = FakeRetriever::new(Source::Camoufox, Err("bot wall".to_string()));
        let fallback = FakeRetriever::new(Source::Opendata, Err("503".to_string()));
        let primary_calls = primary.calls.clone();
        let fallback_calls = fallback.calls.clone();

        let err = Orchestrator::new(primary, fallback)
            .run(&query())
            .await
            .unwrap_err();

        assert!(format!("{err}").contains("503"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }
}
