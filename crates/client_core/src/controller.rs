use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{PlaceId, PlaceRecord},
    protocol::{Review, SearchRequest, VibeSummary},
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    error::SearchError,
    search_client::{HttpSearchClient, SearchBackend},
    state::{OverlapPolicy, RequestId, Resolution, SearchMachine, SearchSnapshot},
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum SearchEvent {
    StateChanged(SearchSnapshot),
}

/// Owns the search lifecycle and the one outbound call per submission.
///
/// State sits behind a plain mutex that is only held for a transition, never
/// across the network await, so observers always see a whole snapshot.
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    machine: Mutex<SearchMachine>,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>, policy: OverlapPolicy) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            backend,
            machine: Mutex::new(SearchMachine::new(policy)),
            events,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Arc<Self>> {
        let client = HttpSearchClient::from_settings(settings)?;
        info!(
            base_url = client.base_url(),
            policy = ?settings.overlap_policy,
            "search controller ready"
        );
        Ok(Self::new(Arc::new(client), settings.overlap_policy))
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.lock_machine().snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Enters `Loading` before returning, then runs the search on the Tokio
    /// runtime. Must be called from within a runtime.
    pub fn handle_search(self: &Arc<Self>, request: SearchRequest) -> SearchTask {
        let request_id = {
            let mut machine = self.lock_machine();
            let id = machine.begin();
            let _ = self
                .events
                .send(SearchEvent::StateChanged(machine.snapshot()));
            id
        };
        info!(
            request_id = %request_id,
            query = %request.query,
            city = %request.city,
            "search submitted"
        );

        let guard = SettleGuard {
            controller: Arc::clone(self),
            request_id,
            settled: false,
        };
        let backend = Arc::clone(&self.backend);
        let handle = tokio::spawn(async move {
            let outcome = backend.search(&request).await;
            guard.settle(outcome);
        });

        SearchTask { request_id, handle }
    }

    /// Submits a search and waits for that request to settle.
    pub async fn search_and_wait(self: &Arc<Self>, request: SearchRequest) -> SearchSnapshot {
        self.handle_search(request).wait().await;
        self.snapshot()
    }

    pub async fn fetch_vibe_summary(&self, place_id: PlaceId) -> Result<VibeSummary, SearchError> {
        self.backend.vibe_summary(place_id).await.inspect_err(|err| {
            if !err.is_not_found() {
                warn!(place_id = place_id.0, error = %err, "vibe summary fetch failed");
            }
        })
    }

    /// Lists scraped reviews for a place. An unknown place yields an empty list.
    pub async fn fetch_reviews(&self, place_id: PlaceId) -> Result<Vec<Review>, SearchError> {
        self.backend.reviews(place_id).await.inspect_err(|err| {
            warn!(place_id = place_id.0, error = %err, "review fetch failed");
        })
    }

    pub async fn check_health(&self) -> Result<String, SearchError> {
        self.backend.health().await
    }

    fn settle(&self, request_id: RequestId, outcome: Result<Vec<PlaceRecord>, SearchError>) {
        match &outcome {
            Ok(results) => debug!(request_id = %request_id, results = results.len(), "search succeeded"),
            Err(err) => warn!(request_id = %request_id, error = %err, "search failed"),
        }

        let mut machine = self.lock_machine();
        let resolution = match outcome {
            Ok(results) => machine.resolve(request_id, Ok(results)),
            Err(err) => machine.resolve(request_id, Err(&err)),
        };

        match resolution {
            Resolution::Applied => {
                let _ = self
                    .events
                    .send(SearchEvent::StateChanged(machine.snapshot()));
            }
            Resolution::Superseded => {
                debug!(request_id = %request_id, "discarding outcome of superseded search")
            }
            Resolution::Unknown => {
                debug!(request_id = %request_id, "search already settled")
            }
        }
    }

    fn lock_machine(&self) -> MutexGuard<'_, SearchMachine> {
        // A transition never leaves the machine half-written, so a poisoned
        // lock still guards a consistent value.
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles its request exactly once: with the real outcome, or as a failure
/// when dropped first (task panicked or was torn down with the runtime).
struct SettleGuard {
    controller: Arc<SearchController>,
    request_id: RequestId,
    settled: bool,
}

impl SettleGuard {
    fn settle(mut self, outcome: Result<Vec<PlaceRecord>, SearchError>) {
        self.settled = true;
        self.controller.settle(self.request_id, outcome);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.settle(
                self.request_id,
                Err(SearchError::Abandoned(
                    "search task dropped before completing".to_string(),
                )),
            );
        }
    }
}

pub struct SearchTask {
    pub request_id: RequestId,
    handle: JoinHandle<()>,
}

impl SearchTask {
    pub async fn wait(self) {
        if let Err(err) = self.handle.await {
            warn!(request_id = %self.request_id, "search task did not finish cleanly: {err}");
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
