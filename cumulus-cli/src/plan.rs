//! Plan - the set of changes that brings live resources to the configuration

use colored::Colorize;
use cumulus_core::differ::{self, Diff};
use cumulus_core::provider::{Provider, ProviderResult};
use cumulus_core::resource::{Resource, State, Value};

use crate::state::StateFile;

/// Changes computed from configuration, state file and live reads
#[derive(Debug, Default)]
pub struct Plan {
    /// One entry per configured resource, in configuration order
    pub diffs: Vec<Diff>,
    /// Resources recorded in state but no longer configured
    pub orphans: Vec<State>,
}

#[derive(Debug, Default, PartialEq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub replace: usize,
    pub delete: usize,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty() && !self.diffs.iter().any(Diff::is_change)
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            delete: self.orphans.len(),
            ..Default::default()
        };
        for diff in &self.diffs {
            match diff {
                Diff::Create(_) => summary.create += 1,
                Diff::Update { .. } => summary.update += 1,
                Diff::Replace { .. } => summary.replace += 1,
                Diff::NoChange(_) => {}
            }
        }
        summary
    }
}

/// Read every configured resource and compare it with the configuration
pub async fn create_plan(
    provider: &dyn Provider,
    resources: &[Resource],
    state: &StateFile,
) -> Result<Plan, String> {
    let mut plan = Plan::default();

    for resource in resources {
        let schema = provider
            .schema(&resource.id.resource_type)
            .ok_or_else(|| format!("Unknown resource type: {}", resource.id.resource_type))?;

        let current = match state.find_resource(&resource.id) {
            Some(recorded) => {
                log::debug!("refreshing {}", resource.id);
                provider
                    .read(&recorded.to_state())
                    .await
                    .map_err(|e| e.to_string())?
            }
            None => State::not_found(resource.id.clone()),
        };

        plan.diffs.push(differ::diff(resource, &current, &schema));
    }

    for recorded in &state.resources {
        let id = recorded.id();
        if !resources.iter().any(|r| r.id == id) {
            log::debug!("{} is no longer configured", id);
            plan.orphans.push(recorded.to_state());
        }
    }

    Ok(plan)
}

/// Delete then recreate, for changes to force-new attributes.
/// The state entry is dropped as soon as the old resource is gone.
pub async fn replace_resource(
    provider: &dyn Provider,
    state: &mut StateFile,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    provider.delete(from).await?;
    state.remove(&from.id);
    provider.create(to).await
}

pub fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up-to-date.".green());
        return;
    }

    for diff in &plan.diffs {
        match diff {
            Diff::Create(resource) => {
                println!("{} {}", "+".green().bold(), resource.id.to_string().bold());
                let mut keys: Vec<_> = resource.attributes.keys().collect();
                keys.sort();
                for key in keys {
                    println!(
                        "    {}: {}",
                        key,
                        format_value(&resource.attributes[key]).green()
                    );
                }
            }
            Diff::Update {
                id,
                from,
                to,
                changed_attributes,
            } => {
                println!("{} {}", "~".yellow().bold(), id.to_string().bold());
                print_changes(from, to, changed_attributes);
            }
            Diff::Replace {
                id,
                from,
                to,
                replaced_by,
            } => {
                println!(
                    "{} {} {}",
                    "±".magenta().bold(),
                    id.to_string().bold(),
                    "(must be replaced)".magenta()
                );
                print_changes(from, to, replaced_by);
            }
            Diff::NoChange(_) => {}
        }
    }

    for state in &plan.orphans {
        println!("{} {}", "-".red().bold(), state.id.to_string().red().bold());
    }

    println!();
    let summary = plan.summary();
    println!(
        "Plan: {} to add, {} to change, {} to replace, {} to destroy.",
        summary.create.to_string().green(),
        summary.update.to_string().yellow(),
        summary.replace.to_string().magenta(),
        summary.delete.to_string().red()
    );
}

fn print_changes(from: &State, to: &Resource, keys: &[String]) {
    for key in keys {
        let old = from
            .attributes
            .get(key)
            .map(format_value)
            .unwrap_or_else(|| "(none)".to_string());
        let new = to
            .attributes
            .get(key)
            .map(format_value)
            .unwrap_or_else(|| "(none)".to_string());
        println!("    {}: {} → {}", key, old.red(), new.green());
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let strs: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", strs.join(", "))
        }
        Value::Map(map) => {
            let mut strs: Vec<_> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            strs.sort();
            format!("{{{}}}", strs.join(", "))
        }
    }
}
