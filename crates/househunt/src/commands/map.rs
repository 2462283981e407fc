//! `map`: the map model for the current collection, as text.
//!
//! Prints what the map screen would draw: the viewport center, one
//! marker per mapped listing, and which popup is open.

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use househunt_core::view::{MapModel, Marker, PopupController};
use househunt_core::{Controller, ListingId};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct MapReport {
    center: Option<Point>,
    selected: Option<String>,
    open_popup: Option<String>,
    markers: Vec<MarkerReport>,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Point {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct MarkerReport {
    id: String,
    lat: f64,
    lng: f64,
    style: String,
    popup: Vec<String>,
}

#[derive(Tabled)]
struct MarkerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Lat")]
    lat: String,
    #[tabled(rename = "Lng")]
    lng: String,
    #[tabled(rename = "Style")]
    style: String,
}

impl From<&Marker> for MarkerReport {
    fn from(m: &Marker) -> Self {
        Self {
            id: m.id.to_string(),
            lat: m.position.lat,
            lng: m.position.lng,
            style: m.style.class_name(),
            popup: m.popup.lines().to_vec(),
        }
    }
}

fn build_report(model: &MapModel) -> MapReport {
    // The text map is "ready" as soon as it is produced.
    let mut popups = PopupController::new();
    popups.set_markers(model.marker_ids().cloned());
    popups.set_selected(model.selected.clone());
    popups.set_map_ready(true);

    MapReport {
        center: model.center.map(|c| Point {
            lat: c.lat,
            lng: c.lng,
        }),
        selected: model.selected.as_ref().map(ToString::to_string),
        open_popup: popups.open_popup().map(ToString::to_string),
        markers: model.markers.iter().map(MarkerReport::from).collect(),
    }
}

fn render_table(report: &MapReport, model: &MapModel) -> String {
    let Some(center) = report.center else {
        return "No mapped listings".to_owned();
    };
    let rows: Vec<MarkerRow> = report
        .markers
        .iter()
        .map(|m| MarkerRow {
            id: m.id.clone(),
            lat: format!("{:.5}", m.lat),
            lng: format!("{:.5}", m.lng),
            style: m.style.clone(),
        })
        .collect();

    let mut out = format!("Center: {:.5}, {:.5}\n", center.lat, center.lng);
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());

    let open = report
        .open_popup
        .as_deref()
        .and_then(|id| model.marker(&ListingId::from(id)));
    if let Some(marker) = open {
        out.push_str("\n\nPopup ");
        out.push_str(marker.id.as_str());
        for line in marker.popup.lines() {
            out.push_str("\n  ");
            out.push_str(&line);
        }
    }
    out
}

pub async fn handle(
    controller: &Controller,
    house_id: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selected = house_id.map(util::listing_id).transpose()?;
    let listings = controller.listings().await?;
    let model = MapModel::build(&listings, selected.as_ref());
    let report = build_report(&model);

    let out = match global.output {
        OutputFormat::Table => render_table(&report, &model),
        format => output::render_single(
            format,
            &report,
            |_| String::new(),
            |r| {
                r.markers
                    .iter()
                    .map(|m| m.id.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
