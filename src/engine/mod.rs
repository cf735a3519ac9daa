// src/engine/mod.rs

//! Sequential build execution engine.
//!
//! This module ties together:
//! - the run-level configuration and outcome/policy types
//! - the executor that drives a resolved [`crate::plan::BuildPlan`]
//!   one unit at a time
//! - the listener side channel used for scheduling notifications

use std::collections::HashMap;
use std::fmt;

/// Canonical unit name type used throughout the engine.
pub type UnitName = String;

/// Terminal outcome of a triggered unit build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Success,
    Unstable,
    Failure,
    Aborted,
}

impl UnitOutcome {
    /// Whether this outcome lets the run continue under the given policy.
    ///
    /// `Unstable` is tolerated only when `fail_on_unstable` is off;
    /// `Failure` and `Aborted` always abort.
    pub fn clears_policy(self, fail_on_unstable: bool) -> bool {
        match self {
            UnitOutcome::Success => true,
            UnitOutcome::Unstable => !fail_on_unstable,
            UnitOutcome::Failure | UnitOutcome::Aborted => false,
        }
    }
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitOutcome::Success => "success",
            UnitOutcome::Unstable => "unstable",
            UnitOutcome::Failure => "failure",
            UnitOutcome::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Per-invocation run configuration, supplied by the caller and never
/// reinterpreted by the engine.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the root unit the run was started for.
    pub root: UnitName,

    /// Optional action run for *every* unit in the plan in place of its
    /// default build action. Passed through to the backend unchanged.
    pub override_action: Option<String>,

    /// Treat an unstable unit build as a failure (default `true`).
    pub fail_on_unstable: bool,
}

impl RunConfig {
    pub fn new(root: impl Into<UnitName>) -> Self {
        Self {
            root: root.into(),
            override_action: None,
            fail_on_unstable: true,
        }
    }

    pub fn override_action(mut self, action: impl Into<String>) -> Self {
        self.override_action = Some(action.into());
        self
    }

    pub fn fail_on_unstable(mut self, val: bool) -> Self {
        self.fail_on_unstable = val;
        self
    }
}

/// Per-unit progression within a run.
///
/// Units past an abort point stay `Queued`; they are never triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Queued,
    InProgress,
    Done(UnitOutcome),
}

/// Overall status of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// The unit whose outcome aborted a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUnit {
    pub unit: UnitName,
    pub outcome: UnitOutcome,
}

/// Result of driving a full plan to completion or abort.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Terminal outcomes in the order they were observed.
    pub outcomes: Vec<(UnitName, UnitOutcome)>,

    /// Final per-unit state for every unit in the plan, including units
    /// left `Queued` by an abort.
    pub states: HashMap<UnitName, UnitState>,

    /// Set iff the run aborted; identifies the offending unit.
    pub failed: Option<FailedUnit>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        if self.failed.is_none() {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        }
    }
}

pub mod executor;
pub mod listener;

pub use executor::Executor;
pub use listener::{FlowListener, TracingListener};
