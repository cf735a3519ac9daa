// src/exec/command.rs

//! Process-backed build triggering.
//!
//! Runs each unit's build action through the platform shell with
//! `tokio::process::Command` and reports the terminal outcome over the
//! [`PendingBuild`] handle. The triggered action sees its unit's name in
//! the `DEPFLOW_UNIT` environment variable, so an override action can refer
//! to the unit it currently runs for.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::engine::{UnitName, UnitOutcome};
use crate::errors::{DepflowError, Result};
use crate::exec::backend::{BuildBackend, PendingBuild};

/// Default action and outcome mapping for a single unit.
#[derive(Debug, Clone)]
struct UnitAction {
    cmd: String,
    unstable_exit_codes: Vec<i32>,
}

/// Real backend used by the binary: triggers shell commands.
#[derive(Debug)]
pub struct CommandBackend {
    actions: HashMap<UnitName, UnitAction>,
}

impl CommandBackend {
    /// Build the backend from a validated config.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let actions = cfg
            .unit
            .iter()
            .map(|(name, unit)| {
                (
                    name.clone(),
                    UnitAction {
                        cmd: unit.cmd.clone(),
                        unstable_exit_codes: unit.unstable_exit_codes.clone(),
                    },
                )
            })
            .collect();
        Self { actions }
    }
}

impl BuildBackend for CommandBackend {
    fn trigger_build(
        &mut self,
        unit: &UnitName,
        override_action: Option<&str>,
    ) -> Pin<Box<dyn Future<Output = Result<PendingBuild>> + Send + '_>> {
        let action = self.actions.get(unit).cloned();
        let unit = unit.clone();
        let override_action = override_action.map(str::to_string);

        Box::pin(async move {
            let Some(action) = action else {
                return Err(DepflowError::UnitNotFound(unit));
            };

            // The override replaces the unit's own action verbatim.
            let cmd_text = override_action.unwrap_or(action.cmd);

            info!(unit = %unit, cmd = %cmd_text, "triggering unit build");

            let child = spawn_shell(&unit, &cmd_text)?;

            let (outcome_tx, outcome_rx) = oneshot::channel();
            let (cancel_tx, cancel_rx) = oneshot::channel();
            tokio::spawn(watch_child(
                unit,
                child,
                action.unstable_exit_codes,
                outcome_tx,
                cancel_rx,
            ));

            Ok(PendingBuild::new(outcome_rx, Some(cancel_tx)))
        })
    }
}

/// Spawn the action through the platform shell with piped output.
fn spawn_shell(unit: &UnitName, cmd_text: &str) -> Result<Child> {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_text);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_text);
        c
    };

    cmd.env("DEPFLOW_UNIT", unit)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning build action for unit '{unit}'"))?;
    Ok(child)
}

/// Wait for the child to exit (or be cancelled) and report the outcome.
async fn watch_child(
    unit: UnitName,
    mut child: Child,
    unstable_exit_codes: Vec<i32>,
    outcome_tx: oneshot::Sender<UnitOutcome>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    drain_output(&unit, &mut child);

    let outcome = tokio::select! {
        status_res = child.wait() => match status_res {
            Ok(status) => {
                let code = status.code();
                debug!(unit = %unit, exit_code = code, success = status.success(), "build action exited");
                outcome_from_status(status.success(), code, &unstable_exit_codes)
            }
            Err(err) => {
                warn!(unit = %unit, error = %err, "waiting for build action failed");
                UnitOutcome::Failure
            }
        },
        _ = &mut cancel_rx => {
            info!(unit = %unit, "cancelling build action");
            if let Err(err) = child.kill().await {
                warn!(unit = %unit, error = %err, "failed to kill build action");
            }
            UnitOutcome::Aborted
        }
    };

    // The receiver may already be gone when the run aborted elsewhere.
    let _ = outcome_tx.send(outcome);
}

/// Consume stdout/stderr so pipe buffers don't fill; log at debug.
fn drain_output(unit: &UnitName, child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        let unit = unit.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(unit = %unit, "stdout: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let unit = unit.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(unit = %unit, "stderr: {}", line);
            }
        });
    }
}

fn outcome_from_status(success: bool, code: Option<i32>, unstable: &[i32]) -> UnitOutcome {
    if success {
        return UnitOutcome::Success;
    }
    match code {
        Some(code) if unstable.contains(&code) => UnitOutcome::Unstable,
        Some(_) => UnitOutcome::Failure,
        // Killed by a signal before reporting an exit code.
        None => UnitOutcome::Aborted,
    }
}
