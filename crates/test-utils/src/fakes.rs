use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use depflow::engine::{FlowListener, UnitName, UnitOutcome};
use depflow::errors::Result;
use depflow::exec::{BuildBackend, PendingBuild};
use depflow::registry::UnitRegistry;

/// In-memory registry with caller-defined upstream edges.
///
/// Unlike the config-backed registry this accepts any graph, including
/// cyclic ones and edges to unknown units, so resolver error paths can be
/// exercised directly.
#[derive(Debug, Default, Clone)]
pub struct FakeRegistry {
    upstream: HashMap<UnitName, Vec<UnitName>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, name: &str, needs: &[&str]) -> Self {
        self.upstream
            .insert(name.to_string(), needs.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl UnitRegistry for FakeRegistry {
    fn lookup_unit(&self, name: &str) -> Option<UnitName> {
        self.upstream.contains_key(name).then(|| name.to_string())
    }

    fn upstream_of(&self, unit: &UnitName) -> Vec<UnitName> {
        self.upstream.get(unit).cloned().unwrap_or_default()
    }
}

/// A build recorded by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredBuild {
    pub unit: UnitName,
    pub override_action: Option<String>,
}

/// A fake backend that:
/// - records every triggered unit together with the action it was asked to run
/// - immediately reports a scripted outcome (default `Success`).
pub struct FakeBackend {
    outcomes: HashMap<UnitName, UnitOutcome>,
    triggered: Arc<Mutex<Vec<TriggeredBuild>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            triggered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(mut self, unit: &str, outcome: UnitOutcome) -> Self {
        self.outcomes.insert(unit.to_string(), outcome);
        self
    }

    /// Shared handle to the trigger log, for assertions after the backend
    /// has been moved into an executor.
    pub fn triggered(&self) -> Arc<Mutex<Vec<TriggeredBuild>>> {
        Arc::clone(&self.triggered)
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildBackend for FakeBackend {
    fn trigger_build(
        &mut self,
        unit: &UnitName,
        override_action: Option<&str>,
    ) -> Pin<Box<dyn Future<Output = Result<PendingBuild>> + Send + '_>> {
        let outcome = self
            .outcomes
            .get(unit)
            .copied()
            .unwrap_or(UnitOutcome::Success);
        let record = TriggeredBuild {
            unit: unit.clone(),
            override_action: override_action.map(str::to_string),
        };
        let triggered = Arc::clone(&self.triggered);

        Box::pin(async move {
            triggered.lock().unwrap().push(record);
            Ok(PendingBuild::ready(outcome))
        })
    }
}

/// Listener that records scheduling notifications for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    scheduled: Arc<Mutex<Vec<UnitName>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Arc<Mutex<Vec<UnitName>>> {
        Arc::clone(&self.scheduled)
    }
}

impl FlowListener for RecordingListener {
    fn unit_scheduled(&mut self, unit: &UnitName) {
        self.scheduled.lock().unwrap().push(unit.clone());
    }
}
