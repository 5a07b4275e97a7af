//! `rotary describe`: details of a path or one credential version.

use crate::cli::CliContext;
use crate::models::criteria::RegenerationCriteria;
use crate::state::{CredentialRef, PathRef, Reference};
use crate::util::humanize;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Args;

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Path name (e.g. /cf/admin_password) or version id
    pub reference: String,
}

pub fn run(ctx: &CliContext, args: DescribeArgs) -> Result<()> {
    let criteria = ctx.config.policy.criteria(ctx.now)?;
    let store = ctx.load_store()?;
    let graph = store.snapshot();
    let reference = graph
        .resolve(&args.reference)
        .ok_or_else(|| anyhow!("no path or credential version named '{}'", args.reference))?;

    for (key, value) in describe(reference, &criteria, ctx.now) {
        println!("{}: {}", key, value);
    }
    Ok(())
}

type Lines = Vec<(&'static str, String)>;

fn describe(reference: Reference<'_>, criteria: &RegenerationCriteria, now: DateTime<Utc>) -> Lines {
    match reference {
        Reference::Path(path) => describe_path(path, now),
        Reference::Credential(c) => describe_credential(c, criteria, now),
    }
}

fn join<I: IntoIterator<Item = S>, S: AsRef<str>>(items: I) -> String {
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

fn describe_path(path: PathRef<'_>, now: DateTime<Utc>) -> Lines {
    let mut lines: Lines = vec![
        ("path", path.name.clone()),
        ("update_mode", path.update_mode().to_string()),
        ("deployments", join(&path.deployments)),
    ];
    if let Some(def) = &path.variable_definition {
        if let Some(t) = &def.variable_type {
            lines.push(("variable_type", t.clone()));
        }
    }
    for version in path.versions() {
        let mut flags = Vec::new();
        if version.latest {
            flags.push("latest");
        }
        if version.transitional {
            flags.push("transitional");
        }
        if version.is_deployed() {
            flags.push("deployed");
        }
        lines.push((
            "version",
            format!(
                "{} created {} [{}]",
                version.id,
                humanize::relative(version.version_created_at, now),
                flags.join(",")
            ),
        ));
    }
    lines
}

fn describe_credential(c: CredentialRef<'_>, criteria: &RegenerationCriteria, now: DateTime<Utc>) -> Lines {
    let mut lines: Lines = vec![
        ("id", c.id.clone()),
        ("name", c.name.clone()),
        ("type", c.credential_type.to_string()),
        (
            "created_at",
            format!(
                "{} ({})",
                c.version_created_at.to_rfc3339(),
                humanize::relative(c.version_created_at, now)
            ),
        ),
        ("latest", c.latest.to_string()),
        ("transitional", c.transitional.to_string()),
        ("deployments", join(&c.deployments)),
    ];

    if c.is_certificate() {
        let expiry = c
            .expiry_date
            .map(|e| format!("{} ({})", e.to_rfc3339(), humanize::relative(e, now)))
            .unwrap_or_else(|| "-".to_string());
        lines.push(("expiry_date", expiry));
        lines.push(("certificate_authority", c.certificate_authority.to_string()));
        lines.push(("self_signed", c.self_signed.to_string()));
        lines.push(("signing", c.signing.to_string()));
        lines.push((
            "signed_by",
            c.signer()
                .map(|s| format!("{} ({})", s.name, s.id))
                .unwrap_or_else(|| "-".to_string()),
        ));
        lines.push(("signs", join(c.signed().map(|s| s.credential().id.as_str()))));
        lines.push(("trust_chain", join(c.chain().map(|ca| ca.credential().id.as_str()))));
    }

    lines.push(("next_action", c.next_action(criteria).to_string()));
    lines
}
