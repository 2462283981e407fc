//! `route <path>`: resolve a navigation path without touching the API.

use serde::Serialize;

use househunt_core::{Mode, Route};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Resolved {
    input: String,
    route: String,
    mode: &'static str,
    selected: Option<String>,
    detail: Option<String>,
}

fn resolve(path: &str) -> Resolved {
    let route = Route::parse(path);
    let mode: Mode = route.mode();
    Resolved {
        input: path.to_owned(),
        route: route.to_string(),
        mode: mode.into(),
        selected: match &route {
            Route::Map { selected } => selected.as_ref().map(ToString::to_string),
            _ => None,
        },
        detail: match &route {
            Route::Detail(id) => Some(id.to_string()),
            _ => None,
        },
    }
}

pub fn handle(path: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = resolve(path);
    let out = output::render_single(
        global.output,
        &resolved,
        |r| {
            let mut rows = vec![("Route", r.route.clone()), ("Mode", r.mode.to_owned())];
            if let Some(id) = &r.selected {
                rows.push(("Selected", id.clone()));
            }
            if let Some(id) = &r.detail {
                rows.push(("Listing", id.clone()));
            }
            output::detail_lines(rows)
        },
        |r| r.route.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_paths_fall_back_to_the_list() {
        let r = resolve("/nowhere/at/all");
        assert_eq!(r.route, "/list");
        assert_eq!(r.mode, "list");
    }

    #[test]
    fn map_selection_and_detail_are_reported() {
        let map = resolve("#/map?houseId=2");
        assert_eq!(map.mode, "map");
        assert_eq!(map.selected.as_deref(), Some("2"));

        let detail = resolve("/houses/7");
        assert_eq!(detail.mode, "list");
        assert_eq!(detail.detail.as_deref(), Some("7"));
    }
}
