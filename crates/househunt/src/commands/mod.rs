//! Command handlers, one module per area.

pub mod config_cmd;
pub mod discover;
pub mod listings;
pub mod map;
pub mod route;
pub mod util;

use househunt_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Run a command that needs the listings API.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List => listings::list(controller, global).await,
        Command::Show { id } => listings::show(controller, &id, global).await,
        Command::Add(args) => listings::add(controller, args, global).await,
        Command::Update(args) => listings::update(controller, args, global).await,
        Command::Remove { id } => listings::remove(controller, &id, global).await,
        Command::Discover { url } => discover::handle(controller, &url, global).await,
        Command::Map { house_id } => map::handle(controller, house_id.as_deref(), global).await,
        // Route, Config and Completions never reach the API.
        Command::Route { .. } | Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled before dispatch")
        }
    }
}
