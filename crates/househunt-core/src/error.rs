// ── Core error types ──
//
// User-facing errors from househunt-core. Consumers never match on
// HTTP status codes directly: the constructors below translate
// transport errors into the load / mutation / discovery split the
// views render.

use thiserror::Error;

use crate::model::ListingId;
use crate::store::QueryKey;

/// Coarse classification used by views to pick a message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    /// Fetching the collection or an item failed.
    Load,
    /// Insert, update or delete failed.
    Mutation,
    /// Discovery answered 404. Non-fatal.
    DiscoveryNotFound,
    /// Discovery failed for any other reason. Non-fatal.
    Discovery,
    Other,
}

/// Why a remote call failed, kept for exit codes and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureCause {
    Timeout,
    Unreachable,
    Status(u16),
    #[default]
    Other,
}

impl FailureCause {
    fn of(err: &househunt_api::Error) -> Self {
        match err {
            househunt_api::Error::Transport(e) if e.is_timeout() => Self::Timeout,
            househunt_api::Error::Transport(e) if e.is_connect() => Self::Unreachable,
            other => other.status().map_or(Self::Other, Self::Status),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Failed to load {key}: {message}")]
    Load {
        key: String,
        message: String,
        cause: FailureCause,
    },

    #[error("Failed to {operation} listing: {message}")]
    Mutation {
        operation: &'static str,
        message: String,
        cause: FailureCause,
    },

    #[error("Listing not found: {id}")]
    ListingNotFound { id: ListingId },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("Not found")]
    DiscoveryNotFound { link: String },

    #[error("Discovery failed: {message}")]
    DiscoveryFailed {
        link: String,
        message: String,
        cause: FailureCause,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a failed fetch of `key`.
    pub(crate) fn load(key: &QueryKey, err: &househunt_api::Error) -> Self {
        match key {
            QueryKey::House(id) if err.is_not_found() => Self::ListingNotFound { id: id.clone() },
            _ => Self::Load {
                key: key.to_string(),
                message: describe(err),
                cause: FailureCause::of(err),
            },
        }
    }

    /// Translate a failed insert / update / remove.
    pub(crate) fn mutation(operation: &'static str, err: &househunt_api::Error) -> Self {
        Self::Mutation {
            operation,
            message: describe(err),
            cause: FailureCause::of(err),
        }
    }

    /// Translate a failed discovery lookup. 404 is kept apart from
    /// every other failure.
    pub(crate) fn discovery(link: &str, err: &househunt_api::Error) -> Self {
        if err.is_not_found() {
            Self::DiscoveryNotFound {
                link: link.to_owned(),
            }
        } else {
            Self::DiscoveryFailed {
                link: link.to_owned(),
                message: describe(err),
                cause: FailureCause::of(err),
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { .. } | Self::ListingNotFound { .. } => ErrorKind::Load,
            Self::Mutation { .. } => ErrorKind::Mutation,
            Self::DiscoveryNotFound { .. } => ErrorKind::DiscoveryNotFound,
            Self::DiscoveryFailed { .. } => ErrorKind::Discovery,
            Self::Validation { .. } | Self::Config { .. } => ErrorKind::Other,
        }
    }

    /// Transport-level reason of a remote failure, if this is one.
    pub fn cause(&self) -> Option<FailureCause> {
        match self {
            Self::Load { cause, .. }
            | Self::Mutation { cause, .. }
            | Self::DiscoveryFailed { cause, .. } => Some(*cause),
            Self::ListingNotFound { .. } | Self::DiscoveryNotFound { .. } => {
                Some(FailureCause::Status(404))
            }
            Self::Validation { .. } | Self::Config { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ListingNotFound { .. } | Self::DiscoveryNotFound { .. }
        )
    }
}

/// Short reason for an API error, without the transport prefix noise.
fn describe(err: &househunt_api::Error) -> String {
    match err {
        househunt_api::Error::Status { status, body } => format!("HTTP {status}: {body}"),
        househunt_api::Error::NotFound { url } => format!("not found ({url})"),
        househunt_api::Error::Transport(e) if e.is_timeout() => "request timed out".to_owned(),
        househunt_api::Error::Transport(e) if e.is_connect() => {
            format!("cannot connect: {e}")
        }
        other => other.to_string(),
    }
}
