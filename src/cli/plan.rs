//! `rotary plan`: dry-run of the next lifecycle action per credential.

use crate::cli::{parse_duration, CliContext, OutputFormat, SelectionArgs};
use crate::models::action::Action;
use crate::models::criteria::RegenerationCriteria;
use crate::models::policy::PolicySection;
use crate::state::{Rules, Selection};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Regenerate values older than this (overrides policy.older_than)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub older_than: Option<Duration>,

    /// Regenerate certificates expiring within this window (overrides policy.expires_within)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub regenerate_expiring: Option<Duration>,

    /// Rotate paths even when their update mode is no-overwrite
    #[arg(long)]
    pub ignore_update_mode: bool,

    /// Include versions that need no action
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl PlanArgs {
    /// Policy from the config file, with flags taking precedence.
    fn criteria(&self, policy: &PolicySection, now: DateTime<Utc>) -> Result<RegenerationCriteria> {
        let mut criteria = policy.criteria(now)?;
        if let Some(age) = self.older_than {
            let at = now.checked_sub_signed(age).context("--older-than out of range")?;
            criteria = criteria.older_than(at);
        }
        if let Some(window) = self.regenerate_expiring {
            let at = now.checked_add_signed(window).context("--regenerate-expiring out of range")?;
            criteria = criteria.expires_before(at);
        }
        if self.ignore_update_mode {
            criteria = criteria.ignore_update_mode(true);
        }
        Ok(criteria)
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct PlanItem {
    name: String,
    id: String,
    #[serde(rename = "type")]
    credential_type: String,
    action: Action,
    reason: &'static str,
}

fn plan(selection: &Selection, criteria: &RegenerationCriteria, all: bool) -> Vec<PlanItem> {
    let rules = Rules::new(criteria);
    selection
        .iter()
        .filter_map(|c| {
            let verdict = rules.evaluate(c);
            if verdict.action == Action::None && !all {
                return None;
            }
            Some(PlanItem {
                name: c.name.clone(),
                id: c.id.clone(),
                credential_type: c.credential_type.to_string(),
                action: verdict.action,
                reason: verdict.reason,
            })
        })
        .collect()
}

pub fn run(ctx: &CliContext, args: PlanArgs) -> Result<()> {
    let criteria = args.criteria(&ctx.config.policy, ctx.now)?;
    let filters = args.selection.filter_config(ctx.now)?.filters();
    let store = ctx.load_store()?;
    let items = plan(&store.credentials(&filters), &criteria, args.all);

    if args.format == OutputFormat::Json {
        let plan = serde_json::json!({
            "generated_at": ctx.now,
            "criteria": criteria,
            "actions": items,
        });
        println!("{}", serde_json::to_string_pretty(&plan).context("serialize plan")?);
        return Ok(());
    }

    if items.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Version").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Action").add_attribute(Attribute::Bold),
        Cell::new("Reason").add_attribute(Attribute::Bold),
    ]);

    let mut totals: BTreeMap<&'static str, usize> = BTreeMap::new();
    for item in &items {
        if item.action.is_pending() {
            *totals.entry(item.action.as_str()).or_default() += 1;
        }
        table.add_row(vec![
            item.name.clone(),
            item.id.clone(),
            item.credential_type.clone(),
            item.action.to_string(),
            item.reason.to_string(),
        ]);
    }

    println!("{}", table);
    if totals.is_empty() {
        println!("\nNo pending actions.");
    } else {
        let summary: Vec<String> = totals.iter().map(|(a, n)| format!("{} {}", n, a)).collect();
        println!("\nPending: {}", summary.join(", "));
    }
    println!("No changes made (dry-run).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixture::*;
    use crate::state::Store;
    use clap::Parser;

    fn store() -> Store {
        let now = now();
        let store = Store::new();
        store
            .update(
                vec![
                    password("old", "/p", now - Duration::days(100)),
                    password("fresh", "/q", now - Duration::days(1)),
                ],
                vec![var("a", "/p", "old"), var("a", "/q", "fresh")],
            )
            .unwrap();
        store
    }

    fn args(older_than: Option<Duration>) -> PlanArgs {
        PlanArgs {
            selection: SelectionArgs::default(),
            older_than,
            regenerate_expiring: None,
            ignore_update_mode: false,
            all: false,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_flags_override_policy() {
        let now = now();
        let policy = PolicySection {
            older_than: Some(std::time::Duration::from_secs(90 * 86400)),
            expires_within: Some(std::time::Duration::from_secs(30 * 86400)),
            ignore_update_mode: false,
        };
        let criteria = args(Some(Duration::days(7))).criteria(&policy, now).unwrap();
        assert_eq!(criteria.older_than, Some(now - Duration::days(7)));
        assert_eq!(criteria.expires_before, Some(now + Duration::days(30)));
        assert!(!criteria.ignore_update_mode);
    }

    #[test]
    fn test_regenerate_expiring_flag() {
        let now = now();
        let cli = crate::cli::Cli::try_parse_from(["rotary", "plan", "--regenerate-expiring", "2w"]).unwrap();
        let args = match cli.command {
            crate::cli::Commands::Plan(args) => args,
            other => panic!("unexpected command {:?}", other),
        };
        let criteria = args.criteria(&PolicySection::default(), now).unwrap();
        assert_eq!(criteria.expires_before, Some(now + Duration::weeks(2)));
        assert!(criteria.older_than.is_none());
    }

    #[test]
    fn test_plan_hides_no_action_rows() {
        let now = now();
        let store = store();
        let criteria = args(Some(Duration::days(30)))
            .criteria(&PolicySection::default(), now)
            .unwrap();

        let items = plan(&store.credentials(&[]), &criteria, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "old");
        assert_eq!(items[0].action, Action::Regenerate);

        let items = plan(&store.credentials(&[]), &criteria, true);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].action, Action::None);
        assert_eq!(items[1].reason, "up to date");
    }

    #[test]
    fn test_plan_json_uses_kebab_case_actions() {
        let now = now();
        let store = store();
        let criteria = RegenerationCriteria::default().older_than(now - Duration::days(30));
        let json = serde_json::to_value(plan(&store.credentials(&[]), &criteria, false)).unwrap();
        assert_eq!(json[0]["action"], "regenerate");
        assert_eq!(json[0]["type"], "password");
    }
}
