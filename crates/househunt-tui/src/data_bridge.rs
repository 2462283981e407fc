//! Data bridge: forwards query cache changes into the action loop.
//!
//! The collection bridge runs for the whole session. A listing bridge
//! follows one `/houses/{id}` entry while the Detail screen shows it.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use househunt_core::{Controller, ListingId};

use crate::action::Action;

/// Follow the collection entry until cancelled.
///
/// Sends the current snapshot, starts the first fetch, then forwards
/// every change. When a mutation invalidates the collection, one
/// refetch is started; a failed refetch is shown, never retried.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut listings = controller.subscribe_listings();
    let _ = action_tx.send(Action::ListingsUpdated(listings.current().clone()));
    load_listings(&controller);

    let mut was_invalidated = listings.current().invalidated;
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = listings.changed() => {
                let Some(state) = changed else {
                    debug!("collection entry closed");
                    break;
                };
                if state.invalidated && !was_invalidated && !state.is_loading() {
                    debug!("collection invalidated, refetching");
                    load_listings(&controller);
                }
                was_invalidated = state.invalidated;
                if action_tx.send(Action::ListingsUpdated(state)).is_err() {
                    break;
                }
            }
        }
    }
}

/// Follow one listing until cancelled or its entry is dropped.
pub async fn follow_listing(
    controller: Controller,
    id: ListingId,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut listing = controller.subscribe_listing(&id);
    let _ = action_tx.send(Action::ListingUpdated {
        id: id.clone(),
        state: listing.current().clone(),
    });

    let fetcher = controller.clone();
    let fetch_id = id.clone();
    tokio::spawn(async move {
        if let Err(e) = fetcher.listing(&fetch_id).await {
            warn!(id = %fetch_id, error = %e, "listing fetch failed");
        }
    });

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = listing.changed() => {
                let Some(state) = changed else {
                    debug!(%id, "listing entry closed");
                    break;
                };
                let update = Action::ListingUpdated { id: id.clone(), state };
                if action_tx.send(update).is_err() {
                    break;
                }
            }
        }
    }
}

/// Read the collection through the cache. Fresh data is not refetched.
pub fn load_listings(controller: &Controller) {
    let controller = controller.clone();
    tokio::spawn(async move {
        if let Err(e) = controller.listings().await {
            warn!(error = %e, "listing collection fetch failed");
        }
    });
}
