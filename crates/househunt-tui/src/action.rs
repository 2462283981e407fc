//! Every state change in the TUI is an `Action` sent through the app loop.

use househunt_core::{
    Command, CommandResult, CoreError, DiscoveryResult, Listing, ListingId, QueryState, Route,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// A short message shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone)]
pub struct Toast {
    pub tone: Tone,
    pub text: String,
}

impl Toast {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// A destructive action waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    RemoveListing { id: ListingId, title: String },
}

impl ConfirmAction {
    /// The question put to the user.
    pub fn prompt(&self) -> String {
        match self {
            Self::RemoveListing { title, .. } => format!("Delete {title}?"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // navigation
    Navigate(Route),
    GoBack,
    ToggleHelp,

    // query cache pushes
    ListingsUpdated(QueryState<Vec<Listing>>),
    ListingUpdated {
        id: ListingId,
        state: QueryState<Listing>,
    },

    // remote work
    /// Execute a write against the API.
    Run(Command),
    CommandFinished {
        command: Command,
        result: Result<CommandResult, CoreError>,
    },
    Discover(String),
    DiscoveryFinished {
        link: String,
        result: Result<DiscoveryResult, CoreError>,
    },

    // y/n dialog
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    /// The user agreed to delete this listing.
    RemoveConfirmed(ListingId),

    Notify(Toast),
}
