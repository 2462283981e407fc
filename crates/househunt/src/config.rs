//! CLI configuration: the shared `househunt_config` types plus the
//! global-flag overrides (`--profile`, `--api-url`, `--timeout`).

use std::time::Duration;

use househunt_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use househunt_config::{
    Config, Profile, config_path, load_config, parse_api_url, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, sorted, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build the `ClientConfig` for this invocation.
///
/// Order: built-in defaults, config file, `HOUSEHUNT_*` env, then the
/// selected profile, then `--api-url` / `--timeout`.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config()?;
    resolve_with(&cfg, global)
}

fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    if let Some(name) = global.profile.as_deref() {
        if !cfg.profiles.contains_key(name) {
            return Err(CliError::ProfileNotFound {
                name: name.into(),
                available: available_profiles(cfg),
            });
        }
    }

    let mut client = cfg.client_config(global.profile.as_deref())?;
    if let Some(raw) = global.api_url.as_deref() {
        client.api_url = parse_api_url(raw)?;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["househunt"];
        argv.extend_from_slice(args);
        argv.push("list");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, url: &str) -> Config {
        let mut cfg = Config::default();
        let mut profile = Profile::new(url);
        profile.timeout = Some(12);
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn flags_override_the_profile() {
        let cfg = config_with("default", "http://profile.test/");
        let client = resolve_with(
            &cfg,
            &global(&["--api-url", "http://flag.test/", "--timeout", "3"]),
        )
        .unwrap();
        assert_eq!(client.api_url.as_str(), "http://flag.test/");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let cfg = config_with("default", "http://profile.test/");
        let client = resolve_with(&cfg, &global(&[])).unwrap();
        assert_eq!(client.api_url.as_str(), "http://profile.test/");
        assert_eq!(client.timeout, Duration::from_secs(12));
    }

    #[test]
    fn unknown_profile_lists_the_available_ones() {
        let cfg = config_with("home", "http://profile.test/");
        let err = resolve_with(&cfg, &global(&["--profile", "work"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "work");
                assert_eq!(available, "home");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_api_url_flag_is_a_usage_error() {
        let err = resolve_with(&Config::default(), &global(&["--api-url", "ftp://x"])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
