// src/engine/listener.rs

//! Scheduling side channel.
//!
//! The executor reports run progress through a [`FlowListener`] rather than
//! writing to the log directly, so callers can attach their own audit trail.
//! Production code uses [`TracingListener`]; tests can record notifications.

use tracing::info;

use super::{UnitName, UnitOutcome};

/// Observability hook invoked by the executor.
pub trait FlowListener: Send {
    /// Called once per unit, immediately before its build is triggered.
    fn unit_scheduled(&mut self, unit: &UnitName);

    /// Called when a unit's build reaches a terminal outcome.
    fn unit_finished(&mut self, unit: &UnitName, outcome: UnitOutcome) {
        let _ = (unit, outcome);
    }
}

/// Default listener: writes the audit trail to the log.
#[derive(Debug, Default)]
pub struct TracingListener;

impl FlowListener for TracingListener {
    fn unit_scheduled(&mut self, unit: &UnitName) {
        info!(unit = %unit, "scheduling unit");
    }

    fn unit_finished(&mut self, unit: &UnitName, outcome: UnitOutcome) {
        info!(unit = %unit, %outcome, "unit build finished");
    }
}
