// ── Query cache ──
//
// Keyed, subscribable cache of remote query results. One `QueryCache`
// exists per payload type; the controller owns one for the collection
// and one for single listings.

mod cache;
mod state;

use std::fmt;

pub use cache::QueryCache;
pub use state::{QueryState, QueryStatus};

use crate::model::ListingId;

/// Stable cache key shared by every view that reads the same data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full listing collection (`GET /api/houses`).
    Houses,
    /// One listing (`GET /api/houses/{id}`).
    House(ListingId),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Houses => f.write_str("houses"),
            Self::House(id) => write!(f, "houses/{id}"),
        }
    }
}
