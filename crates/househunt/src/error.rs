//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use househunt_config::ConfigError;
use househunt_core::{CoreError, FailureCause};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not reach the listings API: {reason}")]
    #[diagnostic(
        code(househunt::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the URL with --api-url or HOUSEHUNT_API_URL."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out: {reason}")]
    #[diagnostic(
        code(househunt::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { reason: String },

    #[error("Listing '{id}' not found")]
    #[diagnostic(
        code(househunt::not_found),
        help("Run: househunt list to see available listings")
    )]
    ListingNotFound { id: String },

    #[error("No metadata found for {link}")]
    #[diagnostic(
        code(househunt::discovery_not_found),
        help("You can still add the listing without discovery: househunt add <link>")
    )]
    DiscoveryNotFound { link: String },

    #[error("{message}")]
    #[diagnostic(code(househunt::api_error))]
    Api { message: String },

    #[error("{field}: {reason}")]
    #[diagnostic(code(househunt::validation))]
    Validation { field: String, reason: String },

    #[error("Not confirmed: {action}")]
    #[diagnostic(
        code(househunt::confirmation_required),
        help("stdin is not a terminal. Pass --yes to confirm up front.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("No profile called '{name}'")]
    #[diagnostic(
        code(househunt::profile_not_found),
        help(
            "Known profiles: {available}\n\
             Add one with `househunt config init`."
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(househunt::config))]
    Config(ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(househunt::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(househunt::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ListingNotFound { .. } | Self::DiscoveryNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Api { .. }
            | Self::ProfileNotFound { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}


impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err.cause() {
            Some(FailureCause::Timeout) => {
                return Self::Timeout {
                    reason: err.to_string(),
                };
            }
            Some(FailureCause::Unreachable) => {
                return Self::ConnectionFailed {
                    reason: err.to_string(),
                };
            }
            _ => {}
        }

        match err {
            CoreError::ListingNotFound { id } => Self::ListingNotFound { id: id.to_string() },
            CoreError::DiscoveryNotFound { link } => Self::DiscoveryNotFound { link },
            CoreError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            other @ (CoreError::Load { .. }
            | CoreError::Mutation { .. }
            | CoreError::DiscoveryFailed { .. }) => Self::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
