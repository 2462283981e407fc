use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Fetch status of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// No fetch running.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed with this message.
    Error(String),
}

/// Snapshot of one cache entry, as seen by subscribers.
///
/// `data` survives failed refetches, so a view can keep showing the
/// last good result next to the error.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub status: QueryStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Set by invalidation; cleared by the next successful fetch.
    pub invalidated: bool,
    /// Bumped on every change.
    pub version: u64,
}

// Manual impls: `T` itself need not be `Clone` or `Default`.
impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            status: self.status.clone(),
            fetched_at: self.fetched_at,
            invalidated: self.invalidated,
            version: self.version,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            fetched_at: None,
            invalidated: false,
            version: 0,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            QueryStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Data is present, not invalidated, and younger than `stale_after`.
    pub fn is_fresh(&self, stale_after: Duration, now: DateTime<Utc>) -> bool {
        if self.data.is_none() || self.invalidated {
            return false;
        }
        let Some(fetched_at) = self.fetched_at else {
            return false;
        };
        match TimeDelta::from_std(stale_after) {
            Ok(max_age) => now - fetched_at < max_age,
            // Larger than chrono can represent: never stale.
            Err(_) => true,
        }
    }

    /// True until the first fetch settles.
    pub fn is_pending(&self) -> bool {
        self.data.is_none() && !matches!(self.status, QueryStatus::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(at: DateTime<Utc>) -> QueryState<u32> {
        QueryState {
            data: Some(Arc::new(1)),
            fetched_at: Some(at),
            ..QueryState::default()
        }
    }

    #[test]
    fn freshness_respects_age_and_invalidation() {
        let now = Utc::now();
        let state = fetched(now - TimeDelta::seconds(10));
        assert!(state.is_fresh(Duration::from_secs(60), now));
        assert!(!state.is_fresh(Duration::from_secs(5), now));

        let mut invalidated = state.clone();
        invalidated.invalidated = true;
        assert!(!invalidated.is_fresh(Duration::from_secs(60), now));
    }

    #[test]
    fn empty_entry_is_never_fresh() {
        let state = QueryState::<u32>::default();
        assert!(!state.is_fresh(Duration::from_secs(60), Utc::now()));
        assert!(state.is_pending());
    }
}
