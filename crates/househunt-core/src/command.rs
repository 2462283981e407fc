// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller executes each variant against the API and then applies
// the matching cache invalidation.

use crate::model::{ListingId, ListingPatch, NewListing};

/// All possible write operations against the listings API.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InsertListing(NewListing),
    UpdateListing { id: ListingId, patch: ListingPatch },
    RemoveListing { id: ListingId },
}

impl Command {
    /// Verb used in logs and error messages.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InsertListing(_) => "insert",
            Self::UpdateListing { .. } => "update",
            Self::RemoveListing { .. } => "remove",
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The server may or may not echo the new id.
    Inserted { id: Option<ListingId> },
    Updated { id: ListingId },
    Removed { id: ListingId },
}
