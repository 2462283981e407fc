//! `househunt-tui`: terminal front end for a house-listings backend.
//!
//! Built on [ratatui](https://ratatui.rs) over `househunt-core`'s query
//! cache. A mode switch at the bottom picks Insert, List or Map; list
//! rows open a Detail screen. The starting screen is given as a route
//! (`--route /map?houseId=2`) and the current route is always shown in
//! the status bar.
//!
//! Logs are written to a file (default `/tmp/househunt-tui.log`) so they
//! never corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
#[cfg(test)]
mod testing;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use househunt_core::{ClientConfig, Controller, Route};

use crate::app::App;

/// Terminal UI for tracking house listings.
#[derive(Parser, Debug)]
#[command(name = "househunt-tui", version, about)]
struct Cli {
    /// Starting route, e.g. `/list`, `/map?houseId=2`, `/houses/7`
    #[arg(short, long, default_value = "/list")]
    route: String,

    /// Profile from the config file
    #[arg(short, long, env = "HOUSEHUNT_PROFILE")]
    profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(short = 'u', long, env = "HOUSEHUNT_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HOUSEHUNT_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/househunt-tui.log")]
    log_file: PathBuf,

    /// More logging: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Our own crates log at the `-v` level; `RUST_LOG` replaces that.
fn log_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbose))
        .unwrap_or(&"trace");
    let directives: Vec<String> = ["househunt_tui", "househunt_core", "househunt_api"]
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect();
    EnvFilter::new(directives.join(","))
}

/// Logs go only to `--log-file`; anything on stdout would tear the UI.
/// Keep the guard alive until exit so buffered lines get flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("househunt-tui.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true);
    tracing_subscriber::registry()
        .with(log_filter(cli.verbose))
        .with(layer)
        .init();
    guard
}

/// Config file and profile first, then the URL and timeout flags.
fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let cfg = househunt_config::load_config().wrap_err("failed to load configuration")?;
    let mut client = cfg
        .client_config(cli.profile.as_deref())
        .wrap_err("failed to resolve profile")?;

    if let Some(raw) = cli.api_url.as_deref() {
        client.api_url = househunt_config::parse_api_url(raw)?;
    }
    if let Some(secs) = cli.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = client_config(&cli)?;
    let route = Route::parse(&cli.route);
    info!(api_url = %config.api_url, %route, "starting househunt-tui");

    let controller = Controller::new(config)?;
    let mut app = App::new(controller, route);
    app.run().await?;

    Ok(())
}
