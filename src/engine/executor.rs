// src/engine/executor.rs

//! Sequential plan execution.
//!
//! The executor walks a resolved [`BuildPlan`] strictly in order, triggering
//! one unit at a time through a [`BuildBackend`] and evaluating each terminal
//! outcome against the run's failure policy. Waiting for a triggered build is
//! the only suspension point; there is no parallel fan-out, even for units
//! with no dependency relation to each other.

use std::collections::HashMap;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::engine::listener::{FlowListener, TracingListener};
use crate::engine::{FailedUnit, RunConfig, RunReport, UnitName, UnitOutcome, UnitState};
use crate::errors::Result;
use crate::exec::BuildBackend;
use crate::plan::BuildPlan;

/// Drives a [`BuildPlan`] to completion or abort.
///
/// The plan is immutable and exclusively owned by the run; all shared state
/// (build records, concurrent triggering of the same unit by other runs) is
/// the backend's concern.
pub struct Executor<B: BuildBackend> {
    backend: B,
    listener: Box<dyn FlowListener>,
    cancel_rx: Option<oneshot::Receiver<()>>,
}

impl<B: BuildBackend> Executor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            listener: Box::new(TracingListener),
            cancel_rx: None,
        }
    }

    /// Replace the default tracing listener.
    pub fn with_listener(mut self, listener: Box<dyn FlowListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Attach a cancellation signal (e.g. Ctrl-C).
    ///
    /// When it fires, the in-flight build is asked to stop through its
    /// pending handle and the run aborts; units not yet started are never
    /// triggered.
    pub fn with_cancel(mut self, cancel_rx: oneshot::Receiver<()>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Execute every unit in plan order, honoring the failure policy.
    ///
    /// - `Success` continues to the next unit.
    /// - `Unstable` continues only when `config.fail_on_unstable` is off.
    /// - `Failure` and `Aborted` abort immediately.
    ///
    /// An abort at unit *k* guarantees units *k+1..n* are never triggered;
    /// the report names the offending unit and its outcome.
    pub async fn execute(&mut self, plan: &BuildPlan, config: &RunConfig) -> Result<RunReport> {
        info!(
            root = plan.root().map(String::as_str).unwrap_or(""),
            units = plan.len(),
            fail_on_unstable = config.fail_on_unstable,
            "starting flow run"
        );

        let mut states: HashMap<UnitName, UnitState> = plan
            .iter()
            .map(|unit| (unit.clone(), UnitState::Queued))
            .collect();
        let mut outcomes = Vec::with_capacity(plan.len());

        for unit in plan {
            self.listener.unit_scheduled(unit);

            states.insert(unit.clone(), UnitState::InProgress);
            let mut pending = self
                .backend
                .trigger_build(unit, config.override_action.as_deref())
                .await?;

            // A fired oneshot must not be polled again; drop it afterwards.
            let mut cancelled = false;
            let outcome = match self.cancel_rx.as_mut() {
                Some(cancel_rx) => {
                    tokio::select! {
                        outcome = pending.outcome() => outcome,
                        _ = cancel_rx => {
                            warn!(unit = %unit, "run cancelled; stopping in-flight build");
                            cancelled = true;
                            pending.cancel();
                            pending.outcome().await
                        }
                    }
                }
                None => pending.outcome().await,
            };
            if cancelled {
                self.cancel_rx = None;
            }

            states.insert(unit.clone(), UnitState::Done(outcome));
            outcomes.push((unit.clone(), outcome));
            self.listener.unit_finished(unit, outcome);

            if !outcome.clears_policy(config.fail_on_unstable) {
                warn!(unit = %unit, %outcome, "unit build violated failure policy; aborting run");
                return Ok(RunReport {
                    outcomes,
                    states,
                    failed: Some(FailedUnit {
                        unit: unit.clone(),
                        outcome,
                    }),
                });
            }

            debug!(unit = %unit, %outcome, "unit build accepted; continuing");
        }

        info!(units = plan.len(), "flow run finished successfully");
        Ok(RunReport {
            outcomes,
            states,
            failed: None,
        })
    }
}
