//! Shared configuration for the househunt CLI and TUI.
//!
//! A TOML file of named profiles, overridable from the environment,
//! resolved into a `househunt_core::ClientConfig`. The CLI layers its
//! global flags on top.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use househunt_core::ClientConfig;

/// Points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "HOUSEHUNT_CONFIG";

/// Prefix for environment overrides, e.g. `HOUSEHUNT_DEFAULTS__TIMEOUT=5`.
pub const ENV_PREFIX: &str = "HOUSEHUNT_";

/// Variables under [`ENV_PREFIX`] that belong to the front ends, not
/// to the config tree.
const FLAG_VARS: [&str; 5] = ["CONFIG", "PROFILE", "API_URL", "OUTPUT", "LOG"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{name}'")]
    UnknownProfile { name: String },

    #[error("cannot encode config as TOML: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("cannot read config: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// The whole config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".to_owned()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Values used when a profile leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub output: String,
    pub color: String,
    /// Seconds.
    pub timeout: u64,
    /// Seconds before a cached query is refetched on read.
    pub stale_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".to_owned(),
            color: "auto".to_owned(),
            timeout: 30,
            stale_secs: 60,
        }
    }
}

/// One backend the user talks to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// e.g. `http://localhost:8080`
    pub api_url: String,
    pub timeout: Option<u64>,
    pub stale_secs: Option<u64>,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: None,
            stale_secs: None,
        }
    }

    /// Resolve against `defaults` for whatever the profile leaves unset.
    pub fn client_config(&self, defaults: &Defaults) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            api_url: parse_api_url(&self.api_url)?,
            timeout: Duration::from_secs(self.timeout.unwrap_or(defaults.timeout)),
            stale_after: Duration::from_secs(self.stale_secs.unwrap_or(defaults.stale_secs)),
        })
    }
}

impl Config {
    /// The requested profile, else `default_profile`.
    ///
    /// Naming a profile that does not exist is an error. A dangling
    /// `default_profile` is not; it yields `Ok(None)`.
    pub fn select_profile(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<(&str, &Profile)>, ConfigError> {
        let found = |name: &str| {
            self.profiles
                .get_key_value(name)
                .map(|(key, profile)| (key.as_str(), profile))
        };
        match requested {
            Some(name) => found(name)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.to_owned() }),
            None => Ok(self.default_profile.as_deref().and_then(found)),
        }
    }

    /// Pretty TOML, profiles in name order.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        #[derive(Serialize)]
        struct Ordered<'a> {
            default_profile: Option<&'a str>,
            defaults: &'a Defaults,
            profiles: BTreeMap<&'a str, &'a Profile>,
        }

        let ordered = Ordered {
            default_profile: self.default_profile.as_deref(),
            defaults: &self.defaults,
            profiles: self.profiles.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        };
        Ok(toml::to_string_pretty(&ordered)?)
    }

    /// Client settings for the selected profile. Without one, the
    /// built-in URL is combined with `defaults`.
    pub fn client_config(&self, requested: Option<&str>) -> Result<ClientConfig, ConfigError> {
        if let Some((_, profile)) = self.select_profile(requested)? {
            return profile.client_config(&self.defaults);
        }
        Ok(ClientConfig {
            timeout: Duration::from_secs(self.defaults.timeout),
            stale_after: Duration::from_secs(self.defaults.stale_secs),
            ..ClientConfig::default()
        })
    }
}

/// `$HOUSEHUNT_CONFIG` when set, else `config.toml` in the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let dir = ProjectDirs::from("org", "househunt", "househunt").map_or_else(
        || {
            let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
            Path::new(&home).join(".config").join("househunt")
        },
        |dirs| dirs.config_dir().to_path_buf(),
    );
    dir.join("config.toml")
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` if it exists, then `HOUSEHUNT_*` variables.
/// Nested keys use a double underscore: `HOUSEHUNT_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let env = Env::prefixed(ENV_PREFIX).ignore(&FLAG_VARS).split("__");
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env)
        .extract()
        .map_err(ConfigError::from)
}

/// Write `cfg` to [`config_path`] and return where it went.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let text = cfg.to_toml()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}

/// Accept only absolute http(s) URLs.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "api_url".to_owned(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("{raw}: {e}")))?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(invalid(format!("scheme '{}' is not http or https", url.scheme())))
    }
}
