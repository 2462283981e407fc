// ── Controller ──
//
// Entry point for the CLI and TUI. Owns the HTTP client and the query
// caches, serves reads through the cache, and executes commands with
// their refetch / invalidation rules.

use std::sync::Arc;

use tracing::{debug, info, warn};

use househunt_api::{HouseClient, HttpSettings, NewHouseDto, UpdateHouseDto};

use crate::command::{Command, CommandResult};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{DiscoveryResult, Listing, ListingId, ListingPatch, NewListing};
use crate::store::{QueryCache, QueryKey};
use crate::stream::QueryStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Clones share one
/// cache, so every view reading the collection sees the same data.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    client: HouseClient,
    houses: QueryCache<Vec<Listing>>,
    items: QueryCache<Listing>,
}

impl Controller {
    /// Build a controller and its HTTP client. Performs no I/O.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpSettings::new(config.timeout);
        let client =
            HouseClient::new(config.api_url.as_str(), &transport).map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self::with_client(config, client))
    }

    /// Build around an existing client.
    pub fn with_client(config: ClientConfig, client: HouseClient) -> Self {
        let houses = QueryCache::new(config.stale_after);
        let items = QueryCache::new(config.stale_after);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                houses,
                items,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Collection ───────────────────────────────────────────────

    /// The listing collection, from cache while fresh.
    pub async fn listings(&self) -> Result<Arc<Vec<Listing>>, CoreError> {
        self.inner
            .houses
            .ensure(&QueryKey::Houses, || self.fetch_all())
            .await
    }

    /// Fetch the collection now, bypassing freshness.
    pub async fn refresh_listings(&self) -> Result<Arc<Vec<Listing>>, CoreError> {
        self.inner
            .houses
            .refetch(&QueryKey::Houses, || self.fetch_all())
            .await
    }

    /// Cached collection without fetching.
    pub fn listings_snapshot(&self) -> Option<Arc<Vec<Listing>>> {
        self.inner.houses.data(&QueryKey::Houses)
    }

    pub fn subscribe_listings(&self) -> QueryStream<Vec<Listing>> {
        self.inner.houses.subscribe(&QueryKey::Houses)
    }

    // ── Single listing ───────────────────────────────────────────

    /// One listing, from cache while fresh.
    pub async fn listing(&self, id: &ListingId) -> Result<Arc<Listing>, CoreError> {
        let key = QueryKey::House(id.clone());
        self.inner
            .items
            .ensure(&key, || self.fetch_one(&key, id))
            .await
    }

    /// Fetch one listing now, bypassing freshness.
    pub async fn refresh_listing(&self, id: &ListingId) -> Result<Arc<Listing>, CoreError> {
        let key = QueryKey::House(id.clone());
        self.inner
            .items
            .refetch(&key, || self.fetch_one(&key, id))
            .await
    }

    pub fn subscribe_listing(&self, id: &ListingId) -> QueryStream<Listing> {
        self.inner.items.subscribe(&QueryKey::House(id.clone()))
    }

    // ── Cache control ────────────────────────────────────────────

    /// Mark `key` stale. The next read refetches it.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match key {
            QueryKey::Houses => self.inner.houses.invalidate(key),
            QueryKey::House(_) => self.inner.items.invalidate(key),
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Execute a command, then apply its cache rule:
    ///
    /// - insert: the collection is invalidated
    /// - update: the listing is refetched and the collection invalidated
    /// - remove: the listing entry is dropped and the collection refetched
    ///
    /// Success is decided by the mutation alone. A failing follow-up
    /// refetch is logged and left on the cache entry for views to show.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let operation = cmd.operation();
        debug!(operation, "executing command");

        match cmd {
            Command::InsertListing(draft) => self.insert(&draft).await,
            Command::UpdateListing { id, patch } => self.update(id, &patch).await,
            Command::RemoveListing { id } => self.remove(id).await,
        }
    }

    async fn insert(&self, draft: &NewListing) -> Result<CommandResult, CoreError> {
        if draft.link.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "link",
                reason: "a link is required".into(),
            });
        }

        let body = NewHouseDto::from(draft);
        let id = self
            .inner
            .client
            .create_house(&body)
            .await
            .map_err(|e| CoreError::mutation("insert", &e))?
            .map(ListingId::from);
        info!(id = ?id, link = %body.link, "listing inserted");

        self.invalidate(&QueryKey::Houses);
        Ok(CommandResult::Inserted { id })
    }

    async fn update(&self, id: ListingId, patch: &ListingPatch) -> Result<CommandResult, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::Validation {
                field: "update",
                reason: "nothing to update".into(),
            });
        }

        self.inner
            .client
            .update_house(id.as_str(), &UpdateHouseDto::from(patch))
            .await
            .map_err(|e| CoreError::mutation("update", &e))?;
        info!(%id, "listing updated");

        if let Err(e) = self.refresh_listing(&id).await {
            warn!(%id, error = %e, "refetch after update failed");
        }
        self.invalidate(&QueryKey::Houses);
        Ok(CommandResult::Updated { id })
    }

    async fn remove(&self, id: ListingId) -> Result<CommandResult, CoreError> {
        self.inner
            .client
            .delete_house(id.as_str())
            .await
            .map_err(|e| CoreError::mutation("remove", &e))?;
        info!(%id, "listing removed");

        self.inner.items.remove(&QueryKey::House(id.clone()));
        if let Err(e) = self.refresh_listings().await {
            warn!(%id, error = %e, "refetch after remove failed");
        }
        Ok(CommandResult::Removed { id })
    }

    // ── Discovery ────────────────────────────────────────────────

    /// Look up metadata for `link`. Never cached: each call hits the API.
    pub async fn discover(&self, link: &str) -> Result<DiscoveryResult, CoreError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(CoreError::Validation {
                field: "link",
                reason: "a link is required".into(),
            });
        }

        debug!(link, "running discovery");
        let dto = self
            .inner
            .client
            .discover(link)
            .await
            .map_err(|e| CoreError::discovery(link, &e))?;
        Ok(DiscoveryResult::from(dto))
    }

    // ── Fetchers ─────────────────────────────────────────────────

    async fn fetch_all(&self) -> Result<Vec<Listing>, CoreError> {
        let houses = self
            .inner
            .client
            .list_houses()
            .await
            .map_err(|e| CoreError::load(&QueryKey::Houses, &e))?;
        debug!(count = houses.len(), "fetched listings");
        Ok(houses.into_iter().map(Listing::from).collect())
    }

    async fn fetch_one(&self, key: &QueryKey, id: &ListingId) -> Result<Listing, CoreError> {
        let house = self
            .inner
            .client
            .get_house(id.as_str())
            .await
            .map_err(|e| CoreError::load(key, &e))?;
        Ok(Listing::from(house))
    }
}
