// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod registry;

use tokio::sync::oneshot;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::{Executor, RunConfig};
use crate::errors::{DepflowError, Result};
use crate::exec::CommandBackend;
use crate::plan::{BuildPlan, resolve};
use crate::registry::ConfigRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the registry-backed resolver
/// - the sequential executor with the shell-command backend
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    let registry = ConfigRegistry::from_config(&cfg);

    info!(root = %args.job, "starting flow with root unit");
    let plan = resolve(&registry, &args.job)?;

    if args.dry_run {
        print_dry_run(&plan, &cfg);
        return Ok(());
    }

    let run_config = RunConfig {
        root: args.job.clone(),
        override_action: args.job_action.clone(),
        fail_on_unstable: args.fail_on_unstable,
    };

    // Ctrl-C → stop the in-flight build and abort the run.
    let (cancel_tx, cancel_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = cancel_tx.send(());
    });

    let backend = CommandBackend::from_config(&cfg);
    let mut executor = Executor::new(backend).with_cancel(cancel_rx);
    let report = executor.execute(&plan, &run_config).await?;

    match report.failed {
        None => Ok(()),
        Some(failed) => Err(DepflowError::BuildFailed {
            unit: failed.unit,
            outcome: failed.outcome,
        }),
    }
}

/// Simple dry-run output: print the resolved build order and actions.
fn print_dry_run(plan: &BuildPlan, cfg: &ConfigFile) {
    println!("depflow dry-run");
    println!("build order ({} units):", plan.len());
    for unit in plan {
        match cfg.unit.get(unit) {
            Some(unit_cfg) => println!("  - {unit}  (cmd: {})", unit_cfg.cmd),
            None => println!("  - {unit}"),
        }
    }
}
