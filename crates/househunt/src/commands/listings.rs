//! Listing command handlers: list, show, add, update, remove.

use serde::Serialize;
use tabled::Tabled;

use househunt_core::view::InsertForm;
use househunt_core::view::detail::fields;
use househunt_core::{
    Command as CoreCommand, CommandResult, Controller, Listing, ListingId, ListingPatch, Vote,
};

use crate::cli::{AddArgs, GlobalOpts, OutputFormat, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Listing")]
    title: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Vote")]
    vote: String,
    #[tabled(rename = "Link")]
    link: String,
}

impl ListingRow {
    fn new(l: &Listing, color: bool) -> Self {
        Self {
            id: l.id.to_string(),
            title: l.title(),
            size: l.size_summary(),
            vote: output::vote_cell(l.vote, color),
            link: l.link.clone(),
        }
    }
}

fn detail(l: &Listing, color: bool) -> String {
    let mut rows = vec![("Id", l.id.to_string())];
    rows.extend(fields(l));
    rows.push(("Vote", output::vote_cell(l.vote, color)));
    rows.push(("Comment", l.comment.clone().unwrap_or_default()));
    output::detail_lines(rows)
}

/// Machine-readable outcome of a write.
#[derive(Serialize)]
struct Outcome<'a> {
    operation: &'a str,
    id: Option<&'a str>,
}

fn report(
    global: &GlobalOpts,
    operation: &str,
    id: Option<&ListingId>,
    message: &str,
) -> Result<(), CliError> {
    let outcome = Outcome {
        operation,
        id: id.map(ListingId::as_str),
    };
    match global.output {
        OutputFormat::Table => {
            if !global.quiet {
                eprintln!("{message}");
            }
        }
        format => {
            let out = output::render_single(
                format,
                &outcome,
                |_| String::new(),
                |o| o.id.unwrap_or_default().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let listings = controller.listings().await?;
    let color = output::should_color(global.color);

    if listings.is_empty() && global.output == OutputFormat::Table {
        if !global.quiet {
            eprintln!("No listings yet. Add one with: househunt add <link>");
        }
        return Ok(());
    }

    let out = output::render_list(
        global.output,
        &listings,
        |l| ListingRow::new(l, color),
        |l| l.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(controller: &Controller, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let id = util::listing_id(id)?;
    let listing = controller.listing(&id).await?;
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        listing.as_ref(),
        |l| detail(l, color),
        |l| l.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn add(
    controller: &Controller,
    args: AddArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut form = InsertForm::new();
    form.set_link(args.link);
    form.set_vote(Vote::new(i64::from(args.vote)));
    form.set_comment(args.comment);

    if args.discover {
        let link = form.begin_discovery()?;
        let pb = output::spinner(&format!("Discovering {link}"), global);
        let result = controller.discover(&link).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        form.finish_discovery(&link, result);

        if let Some(message) = form.discovery_message() {
            // Not fatal: the listing is still added, just without metadata.
            tracing::warn!(%link, "discovery: {message}");
            if !global.quiet {
                eprintln!("Discovery: {message}. Adding without metadata.");
            }
        }
    }

    let cmd = form.submit()?;
    let pb = output::spinner("Adding listing", global);
    let result = controller.execute(cmd).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let id = match result? {
        CommandResult::Inserted { id } => id,
        _ => None,
    };
    let message = match &id {
        Some(id) => format!("Listing added: {id}"),
        None => "Listing added".to_owned(),
    };
    report(global, "insert", id.as_ref(), &message)
}

pub async fn update(
    controller: &Controller,
    args: UpdateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::listing_id(&args.id)?;
    let patch = ListingPatch {
        comment: args.comment,
        vote: args.vote.map(|v| Vote::new(i64::from(v))),
    };
    if patch.is_empty() {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "pass --vote and/or --comment".into(),
        });
    }

    controller
        .execute(CoreCommand::UpdateListing {
            id: id.clone(),
            patch,
        })
        .await?;
    report(global, "update", Some(&id), &format!("Listing {id} updated"))
}

pub async fn remove(
    controller: &Controller,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::listing_id(id)?;
    if !util::confirm(&format!("Delete listing '{id}'?"), global.yes)? {
        return Ok(());
    }
    controller
        .execute(CoreCommand::RemoveListing { id: id.clone() })
        .await?;
    report(global, "remove", Some(&id), &format!("Listing {id} removed"))
}
