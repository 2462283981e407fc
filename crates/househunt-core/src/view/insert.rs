// Insert view: a one-shot form with optional metadata discovery.
//
// The form is Editing until submitted, then Working, then Done or
// Failed. Neither terminal phase leads back to Editing: a new form is
// a new `InsertForm`.

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{DiscoveryResult, ListingId, NewListing, Vote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPhase {
    Editing,
    Working,
    Done { id: Option<ListingId> },
    Failed(String),
}

/// Discovery for the current link.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryState {
    Idle,
    Fetching { link: String },
    Found { link: String, result: DiscoveryResult },
    NotFound,
    Failed(String),
}

/// Local draft of a new listing.
#[derive(Debug, Clone)]
pub struct InsertForm {
    link: String,
    vote: Vote,
    comment: String,
    discovery: DiscoveryState,
    phase: InsertPhase,
    validation: Option<String>,
}

impl Default for InsertForm {
    fn default() -> Self {
        Self {
            link: String::new(),
            vote: Vote::DEFAULT,
            comment: String::new(),
            discovery: DiscoveryState::Idle,
            phase: InsertPhase::Editing,
            validation: None,
        }
    }
}

impl InsertForm {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Fields ───────────────────────────────────────────────────────

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn vote(&self) -> Vote {
        self.vote
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn phase(&self) -> &InsertPhase {
        &self.phase
    }

    pub fn discovery(&self) -> &DiscoveryState {
        &self.discovery
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.phase == InsertPhase::Editing
    }

    /// Replace the link. Any change drops the discovery result.
    pub fn set_link(&mut self, link: impl Into<String>) {
        let link = link.into();
        if link != self.link {
            self.link = link;
            self.discovery = DiscoveryState::Idle;
            self.validation = None;
        }
    }

    /// Edit the link in place, with the same clearing rule as `set_link`.
    pub fn edit_link(&mut self, edit: impl FnOnce(&mut String)) {
        let mut link = self.link.clone();
        edit(&mut link);
        self.set_link(link);
    }

    pub fn set_vote(&mut self, vote: Vote) {
        self.vote = vote;
    }

    pub fn nudge_vote(&mut self, delta: i64) {
        self.vote = self.vote.nudge(delta);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn comment_mut(&mut self) -> &mut String {
        &mut self.comment
    }

    // ── Discovery ────────────────────────────────────────────────────

    /// Start a lookup for the current link and return the link to query.
    pub fn begin_discovery(&mut self) -> Result<String, CoreError> {
        let link = self.link.trim().to_owned();
        if link.is_empty() {
            let err = CoreError::Validation {
                field: "link",
                reason: "enter a link first".into(),
            };
            self.validation = Some(err.to_string());
            return Err(err);
        }
        self.validation = None;
        self.discovery = DiscoveryState::Fetching { link: link.clone() };
        Ok(link)
    }

    /// Apply a lookup result. Ignored if `link` is no longer being fetched.
    ///
    /// Returns whether the result was applied.
    pub fn finish_discovery(
        &mut self,
        link: &str,
        result: Result<DiscoveryResult, CoreError>,
    ) -> bool {
        let current = matches!(&self.discovery, DiscoveryState::Fetching { link: l } if l == link);
        if !current {
            return false;
        }
        self.discovery = match result {
            Ok(result) => DiscoveryState::Found {
                link: link.to_owned(),
                result,
            },
            Err(e) if e.is_not_found() => DiscoveryState::NotFound,
            Err(e) => DiscoveryState::Failed(e.to_string()),
        };
        true
    }

    /// The lookup result for the current link, if any.
    pub fn discovered(&self) -> Option<&DiscoveryResult> {
        match &self.discovery {
            DiscoveryState::Found { link, result } if link.as_str() == self.link.trim() => {
                Some(result)
            }
            _ => None,
        }
    }

    /// Inline, non-fatal discovery message.
    pub fn discovery_message(&self) -> Option<String> {
        match &self.discovery {
            DiscoveryState::NotFound => Some("Not found".to_owned()),
            DiscoveryState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    // ── Submission ───────────────────────────────────────────────────

    /// The payload that would be submitted now.
    pub fn draft(&self) -> NewListing {
        let mut draft = NewListing {
            link: self.link.trim().to_owned(),
            vote: self.vote,
            comment: self.comment.clone(),
            ..NewListing::default()
        };
        if let Some(found) = self.discovered() {
            found.apply_to(&mut draft);
        }
        draft
    }

    /// Validate and switch to Working. Errors leave the form editable.
    pub fn submit(&mut self) -> Result<Command, CoreError> {
        if !self.is_editing() {
            return Err(CoreError::Validation {
                field: "form",
                reason: "already submitted".into(),
            });
        }
        if self.link.trim().is_empty() {
            let err = CoreError::Validation {
                field: "link",
                reason: "a link is required".into(),
            };
            self.validation = Some(err.to_string());
            return Err(err);
        }
        self.validation = None;
        self.phase = InsertPhase::Working;
        Ok(Command::InsertListing(self.draft()))
    }

    /// Move to Done or Failed. Both are terminal.
    pub fn finish_submit(&mut self, result: Result<CommandResult, CoreError>) {
        self.phase = match result {
            Ok(CommandResult::Inserted { id }) => InsertPhase::Done { id },
            Ok(_) => InsertPhase::Done { id: None },
            Err(e) => InsertPhase::Failed(e.to_string()),
        };
    }
}
