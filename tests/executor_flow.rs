// tests/executor_flow.rs

//! Executor semantics against a fake backend: ordering, failure policy,
//! override actions, cancellation.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use depflow::engine::{Executor, RunConfig, UnitName, UnitOutcome, UnitState};
use depflow::errors::Result;
use depflow::exec::{BuildBackend, PendingBuild};
use depflow::plan::resolve;
use depflow_test_utils::fakes::{FakeBackend, FakeRegistry, RecordingListener};
use depflow_test_utils::{init_tracing, with_timeout};

fn chain_registry() -> FakeRegistry {
    FakeRegistry::new()
        .with_unit("child_a", &[])
        .with_unit("parent_a", &["child_a"])
}

fn family_registry() -> FakeRegistry {
    FakeRegistry::new()
        .with_unit("child_a", &[])
        .with_unit("child_b", &[])
        .with_unit("parent_a", &["child_a"])
        .with_unit("parent_b", &["child_a", "child_b"])
        .with_unit("grand", &["parent_a", "parent_b"])
}

#[tokio::test]
async fn single_unit_succeeds_with_one_notification() {
    init_tracing();

    let registry = FakeRegistry::new().with_unit("child_a", &[]);
    let plan = resolve(&registry, "child_a").expect("resolve");

    let backend = FakeBackend::new();
    let triggered = backend.triggered();
    let listener = RecordingListener::new();
    let scheduled = listener.scheduled();

    let mut executor = Executor::new(backend).with_listener(Box::new(listener));
    let report = with_timeout(executor.execute(&plan, &RunConfig::new("child_a")))
        .await
        .expect("execute");

    assert!(report.failed.is_none());
    assert_eq!(*scheduled.lock().unwrap(), vec!["child_a".to_string()]);
    assert_eq!(triggered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn chain_triggers_in_plan_order() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let backend = FakeBackend::new();
    let triggered = backend.triggered();
    let listener = RecordingListener::new();
    let scheduled = listener.scheduled();

    let mut executor = Executor::new(backend).with_listener(Box::new(listener));
    let report = with_timeout(executor.execute(&plan, &RunConfig::new("parent_a")))
        .await
        .expect("execute");

    assert!(report.failed.is_none());
    assert_eq!(
        *scheduled.lock().unwrap(),
        vec!["child_a".to_string(), "parent_a".to_string()]
    );
    let order: Vec<UnitName> = triggered.lock().unwrap().iter().map(|t| t.unit.clone()).collect();
    assert_eq!(order, vec!["child_a".to_string(), "parent_a".to_string()]);
}

#[tokio::test]
async fn every_unit_triggers_exactly_once_in_family_graph() {
    init_tracing();

    let plan = resolve(&family_registry(), "grand").expect("resolve");

    let backend = FakeBackend::new();
    let triggered = backend.triggered();

    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &RunConfig::new("grand")))
        .await
        .expect("execute");

    assert!(report.failed.is_none());
    let order: Vec<UnitName> = triggered.lock().unwrap().iter().map(|t| t.unit.clone()).collect();
    assert_eq!(
        order,
        vec![
            "child_a".to_string(),
            "parent_a".to_string(),
            "child_b".to_string(),
            "parent_b".to_string(),
            "grand".to_string()
        ]
    );
}

#[tokio::test]
async fn failure_aborts_before_dependents_run() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let backend = FakeBackend::new().with_outcome("child_a", UnitOutcome::Failure);
    let triggered = backend.triggered();

    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &RunConfig::new("parent_a")))
        .await
        .expect("execute");

    let failed = report.failed.as_ref().expect("run should fail");
    assert_eq!(failed.unit, "child_a");
    assert_eq!(failed.outcome, UnitOutcome::Failure);

    // parent_a was never triggered and stays queued.
    assert_eq!(triggered.lock().unwrap().len(), 1);
    assert_eq!(report.states.get("parent_a"), Some(&UnitState::Queued));
}

#[tokio::test]
async fn aborted_outcome_aborts_regardless_of_policy() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let backend = FakeBackend::new().with_outcome("child_a", UnitOutcome::Aborted);
    let triggered = backend.triggered();

    let config = RunConfig::new("parent_a").fail_on_unstable(false);
    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &config))
        .await
        .expect("execute");

    let failed = report.failed.as_ref().expect("run should fail");
    assert_eq!(failed.outcome, UnitOutcome::Aborted);
    assert_eq!(triggered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unstable_aborts_under_strict_policy() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let backend = FakeBackend::new().with_outcome("child_a", UnitOutcome::Unstable);

    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &RunConfig::new("parent_a")))
        .await
        .expect("execute");

    let failed = report.failed.as_ref().expect("run should fail");
    assert_eq!(failed.unit, "child_a");
    assert_eq!(failed.outcome, UnitOutcome::Unstable);
}

#[tokio::test]
async fn unstable_is_tolerated_when_policy_is_relaxed() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let backend = FakeBackend::new().with_outcome("child_a", UnitOutcome::Unstable);
    let triggered = backend.triggered();

    let config = RunConfig::new("parent_a").fail_on_unstable(false);
    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &config))
        .await
        .expect("execute");

    assert!(report.failed.is_none());
    assert_eq!(triggered.lock().unwrap().len(), 2);
    assert_eq!(
        report.outcomes,
        vec![
            ("child_a".to_string(), UnitOutcome::Unstable),
            ("parent_a".to_string(), UnitOutcome::Success)
        ]
    );
}

#[tokio::test]
async fn later_failure_is_attributed_after_tolerated_unstable() {
    init_tracing();

    let plan = resolve(&family_registry(), "grand").expect("resolve");

    let backend = FakeBackend::new()
        .with_outcome("child_a", UnitOutcome::Unstable)
        .with_outcome("parent_b", UnitOutcome::Failure);
    let triggered = backend.triggered();

    let config = RunConfig::new("grand").fail_on_unstable(false);
    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &config))
        .await
        .expect("execute");

    let failed = report.failed.as_ref().expect("run should fail");
    assert_eq!(failed.unit, "parent_b");
    assert_eq!(failed.outcome, UnitOutcome::Failure);

    // grand comes after parent_b in the plan and must never be triggered.
    let order: Vec<UnitName> = triggered.lock().unwrap().iter().map(|t| t.unit.clone()).collect();
    assert!(!order.contains(&"grand".to_string()));
    assert_eq!(report.states.get("grand"), Some(&UnitState::Queued));
}

#[tokio::test]
async fn override_action_reaches_every_unit() {
    init_tracing();

    let plan = resolve(&family_registry(), "grand").expect("resolve");

    let backend = FakeBackend::new();
    let triggered = backend.triggered();

    let config = RunConfig::new("grand").override_action("make rebuild");
    let mut executor = Executor::new(backend);
    let report = with_timeout(executor.execute(&plan, &config))
        .await
        .expect("execute");

    assert!(report.failed.is_none());
    let builds = triggered.lock().unwrap();
    assert_eq!(builds.len(), 5);
    for build in builds.iter() {
        assert_eq!(build.override_action.as_deref(), Some("make rebuild"));
    }
}

/// Backend whose builds never finish on their own; they only resolve to
/// `Aborted` when cancelled. Used to exercise run cancellation.
struct HangingBackend {
    triggered: Arc<Mutex<Vec<UnitName>>>,
}

impl BuildBackend for HangingBackend {
    fn trigger_build(
        &mut self,
        unit: &UnitName,
        _override_action: Option<&str>,
    ) -> Pin<Box<dyn Future<Output = Result<PendingBuild>> + Send + '_>> {
        let unit = unit.clone();
        let triggered = Arc::clone(&self.triggered);

        Box::pin(async move {
            triggered.lock().unwrap().push(unit);

            let (outcome_tx, outcome_rx) = oneshot::channel();
            let (cancel_tx, cancel_rx) = oneshot::channel();
            tokio::spawn(async move {
                let _ = cancel_rx.await;
                let _ = outcome_tx.send(UnitOutcome::Aborted);
            });

            Ok(PendingBuild::new(outcome_rx, Some(cancel_tx)))
        })
    }
}

#[tokio::test]
async fn cancellation_stops_in_flight_build_and_skips_the_rest() {
    init_tracing();

    let plan = resolve(&chain_registry(), "parent_a").expect("resolve");

    let triggered = Arc::new(Mutex::new(Vec::new()));
    let backend = HangingBackend {
        triggered: Arc::clone(&triggered),
    };

    let (cancel_tx, cancel_rx) = oneshot::channel();
    let mut executor = Executor::new(backend).with_cancel(cancel_rx);

    let config = RunConfig::new("parent_a");
    let handle = tokio::spawn(async move { executor.execute(&plan, &config).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel_tx.send(()).expect("send cancel");

    let report = with_timeout(async { handle.await.expect("join") })
        .await
        .expect("execute");

    let failed = report.failed.as_ref().expect("run should fail");
    assert_eq!(failed.unit, "child_a");
    assert_eq!(failed.outcome, UnitOutcome::Aborted);
    assert_eq!(*triggered.lock().unwrap(), vec!["child_a".to_string()]);
}
