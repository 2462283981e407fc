mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use househunt_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.global.verbose);

    let Err(err) = execute(cli).await else {
        return;
    };
    let status = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(status);
}

/// Logs go to stderr so stdout stays clean for `--output json`.
/// `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = [LevelFilter::WARN, LevelFilter::INFO, LevelFilter::DEBUG]
        .get(usize::from(verbose))
        .copied()
        .unwrap_or(LevelFilter::TRACE);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn execute(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        // Local commands: no backend needed.
        Command::Config(args) => commands::config_cmd::handle(args, global),
        Command::Route { path } => commands::route::handle(&path, global),
        Command::Completions(args) => {
            let mut app = Cli::command();
            clap_complete::generate(args.shell, &mut app, "househunt", &mut std::io::stdout());
            Ok(())
        }

        remote => {
            let settings = config::resolve_client_config(global)?;
            tracing::debug!(api_url = %settings.api_url, ?remote, "running against backend");
            let controller = Controller::new(settings)?;
            commands::dispatch(remote, &controller, global).await
        }
    }
}
