// Detail view: one listing plus an uncommitted vote / comment draft.

use std::sync::Arc;

use super::Loadable;
use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{Listing, ListingId, ListingPatch, Vote, placeholder, placeholder_num};
use crate::nav::Route;
use crate::store::QueryState;

/// What the detail screen shows.
#[derive(Debug, Clone)]
pub enum DetailContent {
    Loading,
    Error(String),
    Ready(Arc<Listing>),
}

/// Read-only fields, in display order.
pub fn fields(listing: &Listing) -> Vec<(&'static str, String)> {
    vec![
        ("Street", placeholder(listing.street.as_deref()).to_owned()),
        ("Zone", placeholder(listing.zone.as_deref()).to_owned()),
        ("City", placeholder(listing.city.as_deref()).to_owned()),
        ("Rooms", placeholder_num(listing.rooms_number)),
        ("Square meters", placeholder_num(listing.square_meters)),
        ("Link", listing.link.clone()),
    ]
}

/// Draft state of the detail view for one listing.
#[derive(Debug, Clone)]
pub struct DetailView {
    id: ListingId,
    draft_vote: Option<Vote>,
    draft_comment: Option<String>,
    updating: bool,
    error: Option<String>,
}

impl DetailView {
    pub fn new(id: ListingId) -> Self {
        Self {
            id,
            draft_vote: None,
            draft_comment: None,
            updating: false,
            error: None,
        }
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn content(&self, state: &QueryState<Listing>) -> DetailContent {
        match Loadable::from_state(state) {
            Loadable::Loading => DetailContent::Loading,
            Loadable::Failed(message) => DetailContent::Error(message),
            Loadable::Ready(listing) => DetailContent::Ready(listing),
        }
    }

    // ── Draft ────────────────────────────────────────────────────────

    /// Vote to show: the draft if any, else the server value.
    pub fn shown_vote(&self, listing: &Listing) -> Option<Vote> {
        self.draft_vote.or(listing.vote)
    }

    /// Comment to show: the draft if any, else the server value.
    pub fn shown_comment<'a>(&'a self, listing: &'a Listing) -> &'a str {
        self.draft_comment
            .as_deref()
            .or(listing.comment.as_deref())
            .unwrap_or("")
    }

    pub fn set_vote(&mut self, vote: Vote) {
        self.draft_vote = Some(vote);
    }

    /// Step the slider from its shown position.
    pub fn nudge_vote(&mut self, listing: &Listing, delta: i64) {
        let base = self.shown_vote(listing).unwrap_or_default();
        self.draft_vote = Some(base.nudge(delta));
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft_comment = Some(comment.into());
    }

    /// Editable comment draft, seeded from the server value on first use.
    pub fn comment_mut(&mut self, listing: &Listing) -> &mut String {
        self.draft_comment
            .get_or_insert_with(|| listing.comment.clone().unwrap_or_default())
    }

    pub fn has_draft(&self) -> bool {
        self.draft_vote.is_some() || self.draft_comment.is_some()
    }

    pub fn discard_draft(&mut self) {
        self.draft_vote = None;
        self.draft_comment = None;
    }

    // ── Update ───────────────────────────────────────────────────────

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Build the update for the drafted fields only.
    ///
    /// `None` when there is nothing to send or an update is running.
    pub fn begin_update(&mut self) -> Option<Command> {
        if self.updating || !self.has_draft() {
            return None;
        }
        self.updating = true;
        self.error = None;
        Some(Command::UpdateListing {
            id: self.id.clone(),
            patch: ListingPatch {
                comment: self.draft_comment.clone(),
                vote: self.draft_vote,
            },
        })
    }

    /// Clear the draft on success; keep it and record the message on failure.
    pub fn finish_update(&mut self, result: &Result<CommandResult, CoreError>) {
        self.updating = false;
        match result {
            Ok(_) => {
                self.discard_draft();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn mutation_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Map with this listing selected.
    pub fn map_route(&self) -> Route {
        Route::map_selecting(&self.id)
    }
}
