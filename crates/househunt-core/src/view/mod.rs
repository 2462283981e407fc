// ── View state ──
//
// Framework-agnostic state for the list, detail, map and insert views.
// Each model turns cache snapshots into what a screen draws and user
// actions into `Command`s. Front ends own the models and feed results
// back in.

pub mod detail;
pub mod insert;
pub mod list;
pub mod map;

use std::sync::Arc;

use crate::store::{QueryState, QueryStatus};

pub use detail::{DetailContent, DetailView};
pub use insert::{DiscoveryState, InsertForm, InsertPhase};
pub use list::{ListContent, ListRow, ListView};
pub use map::{Coordinate, MapModel, Marker, MarkerStyle, PopupController};

/// What a view can show for one cache entry.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    Loading,
    Failed(String),
    Ready(Arc<T>),
}

impl<T> Loadable<T> {
    /// An error wins over stale data: a failed fetch is always shown.
    pub fn from_state(state: &QueryState<T>) -> Self {
        match (&state.status, &state.data) {
            (QueryStatus::Error(message), _) => Self::Failed(message.clone()),
            (_, Some(data)) => Self::Ready(Arc::clone(data)),
            (_, None) => Self::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_takes_precedence_over_data() {
        let state = QueryState {
            data: Some(Arc::new(1_u8)),
            status: QueryStatus::Error("down".into()),
            ..QueryState::default()
        };
        assert!(matches!(Loadable::from_state(&state), Loadable::Failed(m) if m == "down"));

        let idle = QueryState::<u8>::default();
        assert!(matches!(Loadable::from_state(&idle), Loadable::Loading));
    }
}
