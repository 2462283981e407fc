// List view: one row per listing, in server order.

use super::Loadable;
use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{Listing, ListingId, Vote};
use crate::nav::Route;
use crate::store::QueryState;

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: ListingId,
    /// "street (zone)"
    pub primary: String,
    /// "N rooms, M m²"
    pub secondary: String,
    pub vote: Option<Vote>,
    /// A delete of this row is in flight.
    pub removing: bool,
}

impl ListRow {
    pub fn map_route(&self) -> Route {
        Route::map_selecting(&self.id)
    }

    pub fn detail_route(&self) -> Route {
        Route::detail(&self.id)
    }
}

/// What the list screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
    Loading,
    Error(String),
    /// The collection loaded and has no items.
    Empty,
    Rows(Vec<ListRow>),
}

/// Build rows in the order given. No sorting, no deduplication.
pub fn rows(listings: &[Listing], removing: Option<&ListingId>) -> Vec<ListRow> {
    listings
        .iter()
        .map(|l| ListRow {
            id: l.id.clone(),
            primary: l.title(),
            secondary: l.size_summary(),
            vote: l.vote,
            removing: removing == Some(&l.id),
        })
        .collect()
}

/// Local state of the list view: the in-flight delete, if any.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    removing: Option<ListingId>,
    error: Option<String>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, state: &QueryState<Vec<Listing>>) -> ListContent {
        match Loadable::from_state(state) {
            Loadable::Loading => ListContent::Loading,
            Loadable::Failed(message) => ListContent::Error(message),
            Loadable::Ready(listings) => Self::content_for(&listings, self.removing.as_ref()),
        }
    }

    fn content_for(listings: &[Listing], removing: Option<&ListingId>) -> ListContent {
        if listings.is_empty() {
            ListContent::Empty
        } else {
            ListContent::Rows(rows(listings, removing))
        }
    }

    /// Delete is disabled for every row while one delete is running.
    pub fn can_remove(&self) -> bool {
        self.removing.is_none()
    }

    pub fn removing(&self) -> Option<&ListingId> {
        self.removing.as_ref()
    }

    /// Start deleting `id`. `None` while another delete is in flight.
    pub fn begin_remove(&mut self, id: &ListingId) -> Option<Command> {
        if !self.can_remove() {
            return None;
        }
        self.removing = Some(id.clone());
        self.error = None;
        Some(Command::RemoveListing { id: id.clone() })
    }

    /// Record the outcome of the delete started by `begin_remove`.
    pub fn finish_remove(&mut self, result: &Result<CommandResult, CoreError>) {
        self.removing = None;
        self.error = result.as_ref().err().map(ToString::to_string);
    }

    /// Message of the last failed delete.
    pub fn mutation_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
