mod config;
mod plan;
mod state;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use cumulus_core::differ::Diff;
use cumulus_core::provider::Provider;
use cumulus_core::resource::{Resource, State};
use cumulus_core::service::Registry;
use cumulus_provider_aws::{AwsProvider, ProviderConfig, service_packages};

use crate::config::ConfigFile;
use crate::plan::{Plan, create_plan, print_plan, replace_resource};
use crate::state::{DEFAULT_STATE_FILE, StateFile};

#[derive(Parser)]
#[command(name = "cumulus")]
#[command(about = "Manage Macie and MediaLive resources", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "cumulus.json")]
    config: PathBuf,

    /// Path to the state file
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// AWS region, overriding the provider block
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the resource types this provider supports
    Types,
    /// Validate the configuration file
    Validate,
    /// Show execution plan without applying changes
    Plan,
    /// Apply changes to reach the desired state
    Apply,
    /// Destroy all resources recorded in the state file
    Destroy {
        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Update the state file from live resources
    Refresh,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Types => run_types(),
        Commands::Validate => run_validate(&cli.config).map(|_| ()),
        Commands::Plan => run_plan(&cli).await,
        Commands::Apply => run_apply(&cli).await,
        Commands::Destroy { auto_approve } => run_destroy(&cli, *auto_approve).await,
        Commands::Refresh => run_refresh(&cli).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_types() -> Result<(), String> {
    let registry = Registry::from_packages(&service_packages()).map_err(|e| e.to_string())?;
    for name in registry.resource_type_names() {
        let service = registry.service_of(name).unwrap_or("-");
        println!("{} {}", name.bold(), format!("({})", service).dimmed());
    }
    Ok(())
}

/// Parse and validate the configuration against the registered schemas
fn run_validate(path: &Path) -> Result<ConfigFile, String> {
    let config = ConfigFile::load(path)?;
    let resources = config.resources()?;
    validate_resources(&resources)?;

    println!(
        "{}",
        format!("Configuration is valid. {} resources.", resources.len()).green()
    );
    Ok(config)
}

fn validate_resources(resources: &[Resource]) -> Result<(), String> {
    let registry = Registry::from_packages(&service_packages()).map_err(|e| e.to_string())?;
    let mut all_errors = Vec::new();

    for resource in resources {
        match registry.resource(&resource.id.resource_type) {
            Some(handler) => {
                if let Err(errors) = handler.schema().validate(&resource.attributes) {
                    for error in errors {
                        all_errors.push(format!("{}: {}", resource.id, error));
                    }
                }
            }
            None => all_errors.push(format!(
                "{}: unknown resource type {}",
                resource.id, resource.id.resource_type
            )),
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors.join("\n"))
    }
}

async fn get_provider(cli: &Cli, config: &ConfigFile) -> Result<AwsProvider, String> {
    let overrides = ProviderConfig {
        region: cli.region.clone(),
        ..Default::default()
    };
    let provider_config = config.provider.clone().merge(overrides);
    AwsProvider::new(&provider_config)
        .await
        .map_err(|e| e.to_string())
}

fn load_state(path: &Path) -> Result<StateFile, String> {
    StateFile::load(path).map_err(|e| e.to_string())
}

async fn prepare(cli: &Cli) -> Result<(AwsProvider, StateFile, Plan), String> {
    let config = run_validate(&cli.config)?;
    let resources = config.resources()?;
    let provider = get_provider(cli, &config).await?;
    let state = load_state(&cli.state)?;

    println!("{}", "Refreshing state...".cyan());
    let plan = create_plan(&provider, &resources, &state).await?;
    println!();
    Ok((provider, state, plan))
}

async fn run_plan(cli: &Cli) -> Result<(), String> {
    let (_, _, plan) = prepare(cli).await?;
    print_plan(&plan);
    Ok(())
}

async fn run_apply(cli: &Cli) -> Result<(), String> {
    let (provider, mut state, plan) = prepare(cli).await?;

    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        return Ok(());
    }

    print_plan(&plan);
    println!();
    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    for diff in &plan.diffs {
        let (label, result) = match diff {
            Diff::NoChange(_) => continue,
            Diff::Create(resource) => (
                format!("Create {}", resource.id),
                provider.create(resource).await,
            ),
            Diff::Update { id, from, to, .. } => {
                (format!("Update {}", id), provider.update(from, to).await)
            }
            Diff::Replace { id, from, to, .. } => (
                format!("Replace {}", id),
                replace_resource(&provider, &mut state, from, to).await,
            ),
        };

        match result {
            Ok(new_state) => {
                state.upsert(&new_state);
                println!("  {} {}", "✓".green(), label);
                success_count += 1;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), label, e);
                failure_count += 1;
            }
        }
        // A replace may have deleted the old resource even when creation failed
        state.save(&cli.state).map_err(|e| e.to_string())?;
    }

    for orphan in &plan.orphans {
        let label = format!("Delete {}", orphan.id);
        match provider.delete(orphan).await {
            Ok(()) => {
                state.remove(&orphan.id);
                state.save(&cli.state).map_err(|e| e.to_string())?;
                println!("  {} {}", "✓".green(), label);
                success_count += 1;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), label, e);
                failure_count += 1;
            }
        }
    }

    println!();
    print_outcome("Apply", "changes applied", success_count, failure_count);
    Ok(())
}

async fn run_destroy(cli: &Cli, auto_approve: bool) -> Result<(), String> {
    let config = ConfigFile::load_or_default(&cli.config)?;
    let provider = get_provider(cli, &config).await?;
    let mut state = load_state(&cli.state)?;

    if state.resources.is_empty() {
        println!("{}", "No resources to destroy.".green());
        return Ok(());
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    for resource in &state.resources {
        println!("  {} {}", "-".red().bold(), resource.id());
    }
    println!();
    println!(
        "Plan: {} to destroy.",
        state.resources.len().to_string().red()
    );
    println!();

    if !auto_approve {
        println!(
            "{}",
            "Do you really want to destroy all resources?"
                .yellow()
                .bold()
        );
        println!(
            "  {}",
            "This action cannot be undone. Type 'yes' to confirm.".yellow()
        );
        print!("\n  Enter a value: ");
        std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| e.to_string())?;

        if input.trim() != "yes" {
            println!();
            println!("{}", "Destroy cancelled.".yellow());
            return Ok(());
        }
        println!();
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    // Newest first, so later resources that reference earlier ones go first
    let recorded: Vec<State> = state.resources.iter().rev().map(|r| r.to_state()).collect();
    for resource in recorded {
        match provider.delete(&resource).await {
            Ok(()) => {
                state.remove(&resource.id);
                state.save(&cli.state).map_err(|e| e.to_string())?;
                println!("  {} Delete {}", "✓".green(), resource.id);
                success_count += 1;
            }
            Err(e) => {
                println!("  {} Delete {} - {}", "✗".red(), resource.id, e);
                failure_count += 1;
            }
        }
    }

    println!();
    print_outcome("Destroy", "resources destroyed", success_count, failure_count);
    Ok(())
}

async fn run_refresh(cli: &Cli) -> Result<(), String> {
    let config = ConfigFile::load_or_default(&cli.config)?;
    let provider = get_provider(cli, &config).await?;
    let mut state = load_state(&cli.state)?;

    let recorded: Vec<State> = state.resources.iter().map(|r| r.to_state()).collect();
    for prior in recorded {
        let current = provider.read(&prior).await.map_err(|e| e.to_string())?;
        if current.exists {
            println!("  {} {}", "✓".green(), current.id);
            state.upsert(&current);
        } else {
            println!("  {} {} {}", "-".red(), prior.id, "(gone)".dimmed());
            state.remove(&prior.id);
        }
    }

    state.save(&cli.state).map_err(|e| e.to_string())?;
    println!();
    println!(
        "{}",
        format!("Refresh complete! {} resources tracked.", state.resources.len()).green()
    );
    Ok(())
}

fn print_outcome(action: &str, noun: &str, success_count: usize, failure_count: usize) {
    if failure_count == 0 {
        println!(
            "{}",
            format!("{} complete! {} {}.", action, success_count, noun)
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "{} failed. {} succeeded, {} failed.",
                action, success_count, failure_count
            )
            .red()
            .bold()
        );
    }
}
