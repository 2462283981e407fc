// ── Runtime client configuration ──
//
// Describes *where* the listings API lives and how eagerly cached
// queries go stale. Core never reads config files: the CLI and TUI
// build a `ClientConfig` (usually via househunt-config) and hand it in.

use std::time::Duration;

use url::Url;

/// Default API base when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/";

/// Connection and cache settings for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the listings API (the `/api/...` paths are appended).
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Age after which a cached query is refetched on the next read.
    pub stale_after: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL should parse"),
            timeout: Duration::from_secs(30),
            stale_after: Duration::from_secs(60),
        }
    }
}
