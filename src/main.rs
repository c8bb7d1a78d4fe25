use std::io::{self, Write as _};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use ec2_sweep::api::Ec2Api;
use ec2_sweep::config;
use ec2_sweep::error::SweepError;
use ec2_sweep::models::{InstanceRecord, StateChange};
use ec2_sweep::services::InstanceManager;
use ec2_sweep::utils::format_state;

async fn build_manager_from_env(env_file: Option<&str>) -> InstanceManager {
    config::load_env_file(env_file);
    let api = Ec2Api::connect(config::get_region()).await;
    InstanceManager::new(Arc::new(api))
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table
}

fn print_instances_table(instances: &[InstanceRecord]) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Type", "State"]);
    for instance in instances {
        table.add_row(vec![
            instance.id.clone(),
            instance.instance_type.clone(),
            format_state(&instance.state),
        ]);
    }
    println!("\n{table}\n");
}

fn print_changes_table(changes: &[StateChange]) {
    let mut table = new_table();
    table.set_header(vec!["ID", "Previous State", "Current State"]);
    for change in changes {
        table.add_row(vec![
            change.instance_id.clone(),
            format_state(&change.previous_state),
            format_state(&change.current_state),
        ]);
    }
    println!("\n{table}\n");
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

fn fail(err: SweepError) -> ! {
    tracing::error!(%err, "Provider call failed");
    eprintln!("{}", Paint::new(format!("Error: {}", err)).red());
    process::exit(err.exit_code());
}

#[derive(Parser)]
#[command(
    name = "ec2-sweep",
    author,
    version,
    about = "List and stop EC2 instances",
    long_about = r#"ec2-sweep — list the instances visible to your AWS credentials and stop
them in one batch.

Discovery asks for instances in the running or terminated state, prints
them, and `sweep` then issues a single batch stop against everything found.
Credentials and region come from the standard AWS environment (profile,
AWS_REGION, instance metadata); set SWEEP_REGION or use `--env-file` to
override the region per invocation.

Examples:
  1) See what the configured credentials can reach:
      ec2-sweep list
  2) Stop specific instances:
      ec2-sweep stop i-0abc123 i-0def456
  3) Report and stop everything discovered (asks first):
      ec2-sweep sweep
"#,
    after_help = "Use `ec2-sweep <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered instances
    #[command(about = "List instances", long_about = "Enumerate instances whose lifecycle state is running or terminated and print one row per instance. Use `--json` for machine-readable output.")]
    List {
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Stop instances by id
    #[command(about = "Stop instances by id", long_about = "Issue a single batch stop request covering every given instance id. The provider powers the instances down asynchronously; run `list` again to observe the state transition.")]
    Stop {
        /// Instance ids to stop, e.g. i-0abc123
        #[arg(required = true)]
        instance_ids: Vec<String>,
    },
    /// Report discovered instances, then stop them all
    #[command(about = "Report and stop everything discovered", long_about = "List discovered instances, then issue one batch stop against every listed id. Asks for confirmation unless `--yes` is given; `--dry-run` only shows what would be stopped. Note that discovery includes terminated instances, so those ids land in the stop batch too.")]
    Sweep {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
        /// Show what would be stopped without stopping anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate configuration (credentials / region)
    #[command(about = "Validate configuration and ensure API connectivity.", long_about = "Resolve credentials and region from the environment and attempt a discovery call against the provider. Exits non-zero when the call is rejected.")]
    CheckConfig,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    let env_file = cli.env_file.as_deref();

    match cli.command {
        Commands::List { json } => {
            let manager = build_manager_from_env(env_file).await;
            let instances = match manager.list_all().await {
                Ok(instances) => instances,
                Err(e) => fail(e),
            };
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&instances).unwrap_or_else(|_| "[]".into())
                );
                return;
            }
            if instances.is_empty() {
                println!("{}", Paint::new("No instances found").dim());
                return;
            }
            print_instances_table(&instances);
            println!(
                "{}",
                Paint::new(format!("{} instance(s)", instances.len())).dim()
            );
        }
        Commands::Stop { instance_ids } => {
            let manager = build_manager_from_env(env_file).await;
            match manager.stop(&instance_ids).await {
                Ok(changes) => {
                    println!(
                        "{}",
                        Paint::new(format!(
                            "Stop request accepted for {} instance(s)",
                            changes.len()
                        ))
                        .green()
                    );
                    print_changes_table(&changes);
                }
                Err(e) => fail(e),
            }
        }
        Commands::Sweep { yes, dry_run } => {
            let manager = build_manager_from_env(env_file).await;
            println!("{}", Paint::new("==== Your Instances ====").bold());
            let instances = match manager.list_all().await {
                Ok(instances) => instances,
                Err(e) => fail(e),
            };
            if instances.is_empty() {
                println!("{}", Paint::new("No instances found").dim());
                return;
            }
            print_instances_table(&instances);

            if dry_run {
                println!(
                    "{}",
                    Paint::new(format!(
                        "Dry run: {} instance(s) would be stopped",
                        instances.len()
                    ))
                    .yellow()
                );
                return;
            }
            if !yes
                && !confirm(&format!(
                    "Stop all {} listed instance(s)? This cannot be undone from here",
                    instances.len()
                ))
            {
                println!("{}", Paint::new("Aborted; nothing was stopped").yellow());
                return;
            }

            println!("{}", Paint::new("==== Disabling Instances ====").bold());
            match manager.run_report().await {
                Ok(Some(changes)) => {
                    println!(
                        "{}",
                        Paint::new(format!("Stopped {} instance(s)", changes.len())).green()
                    );
                    print_changes_table(&changes);
                }
                Ok(None) => {
                    // The fleet changed between listing and stopping.
                    println!("{}", Paint::new("No instances left to stop").dim());
                }
                Err(e) => fail(e),
            }
        }
        Commands::CheckConfig => {
            let manager = build_manager_from_env(env_file).await;
            match manager.list_all().await {
                Ok(instances) => {
                    println!(
                        "{}",
                        Paint::new(format!(
                            "Configuration looks valid ({} instance(s) visible)",
                            instances.len()
                        ))
                        .green()
                    );
                }
                Err(e) => {
                    tracing::error!(%e, "Configuration check failed");
                    eprintln!(
                        "{}: {}",
                        Paint::new("Configuration appears invalid").red(),
                        e
                    );
                    process::exit(1);
                }
            }
        }
    }
}
