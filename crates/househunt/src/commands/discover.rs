//! `discover <url>`: metadata lookup for a listing link.

use househunt_core::{Controller, CoreError, DiscoveryResult};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn detail(d: &DiscoveryResult) -> String {
    output::detail_lines([
        ("City", opt(d.city.as_deref())),
        ("Zone", opt(d.zone.as_deref())),
        ("Street", opt(d.street.as_deref())),
        ("Lat", opt(d.lat)),
        ("Lng", opt(d.lng)),
        ("Rooms", opt(d.rooms_number)),
        ("Square meters", opt(d.square_meters)),
        ("Cost", opt(d.cost)),
    ])
}

pub async fn handle(
    controller: &Controller,
    url: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let link = url.trim();
    if link.is_empty() {
        return Err(CoreError::Validation {
            field: "url",
            reason: "enter a link first".into(),
        }
        .into());
    }

    let pb = output::spinner(&format!("Discovering {link}"), global);
    let result = controller.discover(link).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let found = result?;
    let out = output::render_single(global.output, &found, detail, DiscoveryResult::headline)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
