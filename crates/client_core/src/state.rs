//! Search request lifecycle: `Idle -> Loading -> Success | Failure`.
//!
//! [`SearchMachine`] holds no I/O. The controller calls [`SearchMachine::begin`]
//! when a search is submitted and [`SearchMachine::resolve`] when its network
//! call settles; those are the only two transitions.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::PlaceRecord;

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to do when several searches are in flight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Only the most recently submitted search may change the visible state.
    #[default]
    LatestSubmittedWins,
    /// Every completion is applied; whichever settles last is what the user sees.
    LastResolvedWins,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "latest_submitted_wins" | "latest" => Ok(OverlapPolicy::LatestSubmittedWins),
            "last_resolved_wins" | "last_resolved" => Ok(OverlapPolicy::LastResolvedWins),
            other => Err(format!("unknown overlap policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(Vec<PlaceRecord>),
    Failure(String),
}

impl RequestState {
    pub fn phase(&self) -> LifecyclePhase {
        match self {
            RequestState::Idle => LifecyclePhase::Idle,
            RequestState::Loading => LifecyclePhase::Loading,
            RequestState::Success(_) => LifecyclePhase::Success,
            RequestState::Failure(_) => LifecyclePhase::Failure,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error(&self) -> &str {
        match self {
            RequestState::Failure(message) => message,
            _ => "",
        }
    }

    pub fn results(&self) -> &[PlaceRecord] {
        match self {
            RequestState::Success(results) => results,
            _ => &[],
        }
    }
}

/// Point-in-time copy of the controller state handed to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub state: RequestState,
    /// Most recently submitted request, if any.
    pub latest_request: Option<RequestId>,
    pub in_flight: usize,
}

impl SearchSnapshot {
    pub fn phase(&self) -> LifecyclePhase {
        self.state.phase()
    }

    pub fn loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> &str {
        self.state.error()
    }

    pub fn results(&self) -> &[PlaceRecord] {
        self.state.results()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer search was submitted; the outcome was dropped.
    Superseded,
    /// The id was never started or has already been resolved.
    Unknown,
}

#[derive(Debug)]
pub struct SearchMachine {
    policy: OverlapPolicy,
    state: RequestState,
    next_id: u64,
    latest: Option<RequestId>,
    in_flight: BTreeSet<RequestId>,
}

impl SearchMachine {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            state: RequestState::Idle,
            next_id: 1,
            latest: None,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Enters `Loading`, discarding any previous results or error.
    pub fn begin(&mut self) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.latest = Some(id);
        self.in_flight.insert(id);
        self.state = RequestState::Loading;
        id
    }

    pub fn resolve(
        &mut self,
        id: RequestId,
        outcome: Result<Vec<PlaceRecord>, &SearchError>,
    ) -> Resolution {
        if !self.in_flight.remove(&id) {
            return Resolution::Unknown;
        }

        if self.policy == OverlapPolicy::LatestSubmittedWins && self.latest != Some(id) {
            return Resolution::Superseded;
        }

        self.state = match outcome {
            Ok(results) => RequestState::Success(results),
            Err(err) => RequestState::Failure(err.user_message().to_string()),
        };
        Resolution::Applied
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            state: self.state.clone(),
            latest_request: self.latest,
            in_flight: self.in_flight.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::GENERIC_SEARCH_ERROR;

    fn failure() -> SearchError {
        SearchError::MalformedBody("missing field `results`".to_string())
    }

    #[test]
    fn starts_idle_with_empty_view() {
        let machine = SearchMachine::new(OverlapPolicy::default());
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.phase(), LifecyclePhase::Idle);
        assert!(!snapshot.loading());
        assert_eq!(snapshot.error(), "");
        assert!(snapshot.results().is_empty());
        assert_eq!(snapshot.latest_request, None);
    }

    #[test]
    fn begin_clears_previous_failure() {
        let mut machine = SearchMachine::new(OverlapPolicy::default());
        let first = machine.begin();
        machine.resolve(first, Err(&failure()));
        assert_eq!(machine.state().error(), GENERIC_SEARCH_ERROR);

        machine.begin();
        let snapshot = machine.snapshot();
        assert!(snapshot.loading());
        assert_eq!(snapshot.error(), "");
        assert!(snapshot.results().is_empty());
    }

    #[test]
    fn begin_clears_previous_results() {
        let mut machine = SearchMachine::new(OverlapPolicy::default());
        let first = machine.begin();
        machine.resolve(first, Ok(vec![json!({ "name": "Cafe X" })]));
        assert_eq!(machine.state().results().len(), 1);

        machine.begin();
        assert!(machine.state().is_loading());
        assert!(machine.state().results().is_empty());
    }

    #[test]
    fn success_keeps_records_verbatim() {
        let records = vec![json!({ "name": "Cafe X", "extra": { "nested": [1, 2] } })];
        let mut machine = SearchMachine::new(OverlapPolicy::default());
        let id = machine.begin();

        assert_eq!(machine.resolve(id, Ok(records.clone())), Resolution::Applied);
        assert_eq!(machine.state(), &RequestState::Success(records));
        assert_eq!(machine.snapshot().in_flight, 0);
    }

    #[test]
    fn empty_success_differs_from_failure_only_by_error() {
        let mut ok = SearchMachine::new(OverlapPolicy::default());
        let id = ok.begin();
        ok.resolve(id, Ok(Vec::new()));

        let mut failed = SearchMachine::new(OverlapPolicy::default());
        let id = failed.begin();
        failed.resolve(id, Err(&failure()));

        assert_eq!(ok.state().results(), failed.state().results());
        assert!(!ok.state().is_loading() && !failed.state().is_loading());
        assert_eq!(ok.state().error(), "");
        assert_eq!(failed.state().error(), GENERIC_SEARCH_ERROR);
    }

    #[test]
    fn resolving_twice_is_ignored() {
        let mut machine = SearchMachine::new(OverlapPolicy::default());
        let id = machine.begin();
        machine.resolve(id, Ok(vec![json!(1)]));

        assert_eq!(machine.resolve(id, Err(&failure())), Resolution::Unknown);
        assert_eq!(machine.state().results(), &[json!(1)]);
        assert_eq!(machine.resolve(RequestId(99), Ok(Vec::new())), Resolution::Unknown);
    }

    #[test]
    fn latest_submitted_wins_drops_stale_completion() {
        let mut machine = SearchMachine::new(OverlapPolicy::LatestSubmittedWins);
        let slow = machine.begin();
        let fast = machine.begin();

        machine.resolve(fast, Ok(vec![json!("fast")]));
        assert_eq!(machine.resolve(slow, Ok(vec![json!("slow")])), Resolution::Superseded);

        assert_eq!(machine.state().results(), &[json!("fast")]);
        assert_eq!(machine.snapshot().in_flight, 0);
    }

    #[test]
    fn latest_submitted_wins_stays_loading_until_latest_settles() {
        let mut machine = SearchMachine::new(OverlapPolicy::LatestSubmittedWins);
        let older = machine.begin();
        let newer = machine.begin();

        machine.resolve(older, Err(&failure()));
        assert!(machine.state().is_loading());

        machine.resolve(newer, Ok(Vec::new()));
        assert_eq!(machine.state().phase(), LifecyclePhase::Success);
    }

    #[test]
    fn last_resolved_wins_applies_every_completion() {
        let mut machine = SearchMachine::new(OverlapPolicy::LastResolvedWins);
        let slow = machine.begin();
        let fast = machine.begin();

        assert_eq!(machine.resolve(fast, Ok(vec![json!("fast")])), Resolution::Applied);
        assert!(!machine.state().is_loading());
        assert_eq!(machine.snapshot().in_flight, 1);

        assert_eq!(machine.resolve(slow, Err(&failure())), Resolution::Applied);
        assert_eq!(machine.state().error(), GENERIC_SEARCH_ERROR);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(
            "Last-Resolved-Wins".parse::<OverlapPolicy>(),
            Ok(OverlapPolicy::LastResolvedWins)
        );
        assert_eq!("latest".parse::<OverlapPolicy>(), Ok(OverlapPolicy::LatestSubmittedWins));
        assert!("fifo".parse::<OverlapPolicy>().is_err());
    }
}
