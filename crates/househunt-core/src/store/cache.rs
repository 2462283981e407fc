use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{QueryKey, QueryState, QueryStatus};
use crate::error::{CoreError, FailureCause};
use crate::stream::QueryStream;

type Entry<T> = Arc<watch::Sender<QueryState<T>>>;

/// A concurrent, subscribable cache of query results of one type.
///
/// Every entry is a `watch` channel, so any number of views can follow
/// it. Fetching is driven by callers (`ensure` / `refetch`); the cache
/// never refreshes on its own.
pub struct QueryCache<T: Send + Sync + 'static> {
    entries: DashMap<QueryKey, Entry<T>>,
    stale_after: Duration,
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            stale_after,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current state of `key`; an empty state if nothing was cached.
    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        self.entries
            .get(key)
            .map(|e| e.borrow().clone())
            .unwrap_or_default()
    }

    /// Last successfully fetched data for `key`.
    pub fn data(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries.get(key).and_then(|e| e.borrow().data.clone())
    }

    /// Follow `key`. Creates an empty entry if needed.
    pub fn subscribe(&self, key: &QueryKey) -> QueryStream<T> {
        QueryStream::new(self.entry(key).subscribe())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Return cached data while it is fresh, otherwise fetch.
    ///
    /// If a fetch for `key` is already running, this waits for its
    /// outcome instead of issuing another request.
    pub async fn ensure<F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let tx = self.entry(key);
        let now = Utc::now();
        let stale_after = self.stale_after;

        let mut cached = None;
        let claimed = tx.send_if_modified(|state| {
            if state.is_fresh(stale_after, now) {
                cached.clone_from(&state.data);
                return false;
            }
            if state.is_loading() {
                return false;
            }
            state.status = QueryStatus::Loading;
            state.version += 1;
            true
        });

        if let Some(data) = cached {
            debug!(%key, "query cache hit");
            return Ok(data);
        }
        if claimed {
            Self::run_fetch(key, &tx, fetch).await
        } else {
            Self::join_in_flight(key, &tx).await
        }
    }

    /// Always fetch, regardless of freshness or a running fetch.
    ///
    /// Concurrent refetches of one key both complete; the last response
    /// to arrive is what subscribers end up with.
    pub async fn refetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let tx = self.entry(key);
        tx.send_modify(|state| {
            state.status = QueryStatus::Loading;
            state.version += 1;
        });
        Self::run_fetch(key, &tx, fetch).await
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark `key` stale and notify subscribers. Does not fetch.
    ///
    /// Returns `false` if nothing was cached under `key`.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let Some(tx) = self.entries.get(key).map(|e| Arc::clone(e.value())) else {
            return false;
        };
        debug!(%key, "query invalidated");
        tx.send_modify(|state| {
            state.invalidated = true;
            state.version += 1;
        });
        true
    }

    /// Drop the entry for `key`. Subscribers see their stream end.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(%key, "query entry removed");
        }
        removed
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn entry(&self, key: &QueryKey) -> Entry<T> {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(watch::channel(QueryState::default()).0));
        Arc::clone(entry.value())
    }

    async fn run_fetch<F, Fut>(
        key: &QueryKey,
        tx: &watch::Sender<QueryState<T>>,
        fetch: F,
    ) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        debug!(%key, "fetching query");
        let mut guard = LoadingGuard { tx, armed: true };
        let result = fetch().await;
        guard.armed = false;

        match result {
            Ok(value) => {
                let data = Arc::new(value);
                tx.send_modify(|state| {
                    state.data = Some(Arc::clone(&data));
                    state.status = QueryStatus::Idle;
                    state.fetched_at = Some(Utc::now());
                    state.invalidated = false;
                    state.version += 1;
                });
                Ok(data)
            }
            Err(err) => {
                warn!(%key, error = %err, "query fetch failed");
                tx.send_modify(|state| {
                    state.status = QueryStatus::Error(err.to_string());
                    state.version += 1;
                });
                Err(err)
            }
        }
    }

    async fn join_in_flight(
        key: &QueryKey,
        tx: &watch::Sender<QueryState<T>>,
    ) -> Result<Arc<T>, CoreError> {
        debug!(%key, "joining in-flight fetch");
        let mut rx = tx.subscribe();
        let state = rx
            .wait_for(|state| !state.is_loading())
            .await
            .map_err(|_| CoreError::Load {
                key: key.to_string(),
                message: "cache entry closed".into(),
                cause: FailureCause::Other,
            })?;

        match (&state.status, &state.data) {
            (QueryStatus::Error(message), _) => Err(CoreError::Load {
                key: key.to_string(),
                message: message.clone(),
                cause: FailureCause::Other,
            }),
            (_, Some(data)) => Ok(Arc::clone(data)),
            (_, None) => Err(CoreError::Load {
                key: key.to_string(),
                message: "fetch was abandoned".into(),
                cause: FailureCause::Other,
            }),
        }
    }
}

/// Resets `Loading` to `Idle` if a fetch future is dropped midway, so
/// waiters are released.
struct LoadingGuard<'a, T> {
    tx: &'a watch::Sender<QueryState<T>>,
    armed: bool,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.tx.send_if_modified(|state| {
                if state.is_loading() {
                    state.status = QueryStatus::Idle;
                    state.version += 1;
                    true
                } else {
                    false
                }
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::ListingId;

    fn cache() -> QueryCache<Vec<u32>> {
        QueryCache::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn ensure_serves_fresh_data_from_cache() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2])
        };

        let first = cache.ensure(&QueryKey::Houses, fetch).await.unwrap();
        let second = cache.ensure(&QueryKey::Houses, fetch).await.unwrap();
        assert_eq!(*first, vec![1, 2]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_next_ensure_to_fetch() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![u32::try_from(n).unwrap()])
        };

        cache.ensure(&QueryKey::Houses, fetch).await.unwrap();
        assert!(cache.invalidate(&QueryKey::Houses));
        assert!(cache.state(&QueryKey::Houses).invalidated);

        let data = cache.ensure(&QueryKey::Houses, fetch).await.unwrap();
        assert_eq!(*data, vec![1]);
        assert!(!cache.state(&QueryKey::Houses).invalidated);
    }

    #[tokio::test]
    async fn invalidate_unknown_key_is_noop() {
        let cache = cache();
        assert!(!cache.invalidate(&QueryKey::House(ListingId::from("x"))));
        assert!(!cache.contains(&QueryKey::House(ListingId::from("x"))));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_data() {
        let cache = cache();
        cache
            .ensure(&QueryKey::Houses, || async { Ok(vec![7]) })
            .await
            .unwrap();

        let err = cache
            .refetch(&QueryKey::Houses, || async {
                Err(CoreError::Load {
                    key: "houses".into(),
                    message: "boom".into(),
                    cause: FailureCause::Other,
                })
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));

        let state = cache.state(&QueryKey::Houses);
        assert_eq!(state.data.as_deref(), Some(&vec![7]));
        assert!(state.error().is_some());
    }

    #[tokio::test]
    async fn remove_drops_entry() {
        let cache = cache();
        let key = QueryKey::House(ListingId::from("1"));
        cache.ensure(&key, || async { Ok(vec![1]) }).await.unwrap();
        assert!(cache.remove(&key));
        assert!(cache.data(&key).is_none());
        assert!(!cache.remove(&key));
    }

    #[tokio::test]
    async fn dropped_fetch_releases_loading() {
        let cache = cache();
        {
            let fut = cache.ensure(&QueryKey::Houses, || std::future::pending());
            // Poll once so the entry is claimed, then drop it.
            let _ = tokio::time::timeout(Duration::from_millis(5), fut).await;
        }
        assert!(!cache.state(&QueryKey::Houses).is_loading());
    }
}
