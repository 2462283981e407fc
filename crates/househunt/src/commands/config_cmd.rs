//! `househunt config ...`

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            let path = config::config_path();
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Use { name } => use_profile(name, global),
    }
}

/// Table mode prints the file as TOML; plain prints the active profile.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let toml = cfg.to_toml()?;
    let rendered = output::render_single(
        global.output,
        &cfg,
        |_| toml.clone(),
        |c| config::active_profile_name(global, c),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn use_profile(name: String, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config()?;
    if cfg.select_profile(Some(&name)).is_err() {
        return Err(CliError::ProfileNotFound {
            available: config::available_profiles(&cfg),
            name,
        });
    }
    cfg.default_profile = Some(name);
    config::save_config(&cfg)?;
    if !global.quiet {
        let chosen = cfg.default_profile.as_deref().unwrap_or_default();
        eprintln!("Now using profile '{chosen}'");
    }
    Ok(())
}

fn ask<T>(prompt: &str, default: T) -> Result<T, CliError>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: ToString,
{
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

/// Interactive setup. Other profiles already in the file are kept.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    eprintln!("Setting up {}\n", config::config_path().display());

    let name = ask(
        "Profile name",
        global.profile.clone().unwrap_or_else(|| "default".to_owned()),
    )?;
    let api_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(
            global
                .api_url
                .clone()
                .unwrap_or_else(|| househunt_core::config::DEFAULT_API_URL.to_owned()),
        )
        .validate_with(|raw: &String| config::parse_api_url(raw).map(drop).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(prompt_err)?;
    let timeout = ask("Timeout in seconds", global.timeout.unwrap_or(30))?;

    let mut cfg = config::load_config().unwrap_or_default();
    let mut profile = Profile::new(api_url);
    profile.timeout = (timeout != cfg.defaults.timeout).then_some(timeout);
    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());

    let written = config::save_config(&cfg)?;
    eprintln!("\nSaved profile '{name}' to {}", written.display());
    eprintln!("Try it with: househunt list");
    Ok(())
}
