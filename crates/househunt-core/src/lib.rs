// househunt-core: Query cache and view state between househunt-api and the front ends.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod nav;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::ClientConfig;
pub use controller::Controller;
pub use error::{CoreError, ErrorKind, FailureCause};
pub use nav::{Mode, Route};
pub use store::{QueryCache, QueryKey, QueryState, QueryStatus};
pub use stream::QueryStream;

pub use model::{DiscoveryResult, Listing, ListingId, ListingPatch, NewListing, Vote};
