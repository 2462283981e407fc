// ── Reactive query streams ──
//
// Subscription type for following one query cache entry.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::QueryState;

/// A subscription to one cache entry.
///
/// Provides point-in-time access to the entry's state and change
/// notification via [`changed()`](Self::changed) or a `Stream`.
pub struct QueryStream<T: Send + Sync + 'static> {
    current: QueryState<T>,
    receiver: watch::Receiver<QueryState<T>>,
}

impl<T: Send + Sync + 'static> QueryStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<QueryState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// State captured at creation or at the last `changed()`.
    pub fn current(&self) -> &QueryState<T> {
        &self.current
    }

    /// Latest state (may be newer than `current()`).
    pub fn latest(&self) -> QueryState<T> {
        self.receiver.borrow().clone()
    }

    /// Latest data, if any fetch ever succeeded.
    pub fn data(&self) -> Option<Arc<T>> {
        self.receiver.borrow().data.clone()
    }

    /// Wait for the next change.
    /// Returns `None` once the entry is removed from the cache.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> QueryWatchStream<T> {
        QueryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current state first, then every later change.
pub struct QueryWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<QueryState<T>>,
}

impl<T: Send + Sync + 'static> Stream for QueryWatchStream<T> {
    type Item = QueryState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
