//! `rotary list`: credential versions matching the query flags.

use crate::cli::{or_dash, CliContext, OutputFormat, SelectionArgs};
use crate::state::{CredentialRef, Selection};
use crate::util::humanize;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only the latest version of each path
    #[arg(long)]
    pub latest: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, PartialEq)]
struct ListItem {
    name: String,
    id: String,
    #[serde(rename = "type")]
    credential_type: String,
    version_created_at: DateTime<Utc>,
    latest: bool,
    transitional: bool,
    deployments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiry_date: Option<DateTime<Utc>>,
}

impl ListItem {
    fn from_credential(c: CredentialRef<'_>) -> Self {
        Self {
            name: c.name.clone(),
            id: c.id.clone(),
            credential_type: c.credential_type.to_string(),
            version_created_at: c.version_created_at,
            latest: c.latest,
            transitional: c.transitional,
            deployments: c.deployments.iter().cloned().collect(),
            expiry_date: c.expiry_date,
        }
    }
}

fn items(selection: &Selection) -> Vec<ListItem> {
    selection.iter().map(ListItem::from_credential).collect()
}

pub fn run(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let mut filters = args.selection.filter_config(ctx.now)?.filters();
    if args.latest {
        filters.push(crate::state::filters::latest());
    }
    let store = ctx.load_store()?;
    let items = items(&store.credentials(&filters));

    if args.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        println!("No credentials found");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Version").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Created").add_attribute(Attribute::Bold),
        Cell::new("Flags").add_attribute(Attribute::Bold),
        Cell::new("Deployments").add_attribute(Attribute::Bold),
        Cell::new("Expires").add_attribute(Attribute::Bold),
    ]);

    for item in items {
        let mut flags = Vec::new();
        if item.latest {
            flags.push("latest");
        }
        if item.transitional {
            flags.push("transitional");
        }
        let expires = item
            .expiry_date
            .map(|e| humanize::relative(e, ctx.now))
            .unwrap_or_default();
        table.add_row(vec![
            item.name,
            item.id,
            item.credential_type,
            humanize::relative(item.version_created_at, ctx.now),
            or_dash(flags.join(",")),
            or_dash(item.deployments.join(",")),
            or_dash(expires),
        ]);
    }

    println!("{}", table);
    Ok(())
}
