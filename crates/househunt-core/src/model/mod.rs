// ── Domain model ──
//
// Validated, front-end facing types. Wire DTOs stay in househunt-api;
// `crate::convert` bridges the two.

mod discovery;
mod listing;

pub use discovery::DiscoveryResult;
pub use listing::{Listing, ListingId, ListingPatch, NewListing, Vote};
pub(crate) use listing::{placeholder, placeholder_num};
