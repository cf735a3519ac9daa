// tests/resolver_order.rs

//! Resolution-order guarantees of the dependency resolver.

use depflow::errors::DepflowError;
use depflow::plan::resolve;
use depflow_test_utils::fakes::FakeRegistry;
use depflow_test_utils::init_tracing;

fn names(plan: &depflow::plan::BuildPlan) -> Vec<&str> {
    plan.iter().map(|u| u.as_str()).collect()
}

#[test]
fn unit_without_deps_resolves_to_itself() {
    init_tracing();

    let registry = FakeRegistry::new().with_unit("child_a", &[]);

    let plan = resolve(&registry, "child_a").expect("resolve");
    assert_eq!(names(&plan), vec!["child_a"]);
    assert_eq!(plan.root().map(String::as_str), Some("child_a"));
}

#[test]
fn single_dep_comes_first() {
    init_tracing();

    let registry = FakeRegistry::new()
        .with_unit("child_a", &[])
        .with_unit("parent_a", &["child_a"]);

    let plan = resolve(&registry, "parent_a").expect("resolve");
    assert_eq!(names(&plan), vec!["child_a", "parent_a"]);
}

#[test]
fn diamond_dep_appears_once_before_both_paths() {
    init_tracing();

    // root needs a and b; both need c.
    let registry = FakeRegistry::new()
        .with_unit("c", &[])
        .with_unit("a", &["c"])
        .with_unit("b", &["c"])
        .with_unit("root", &["a", "b"]);

    let plan = resolve(&registry, "root").expect("resolve");
    assert_eq!(names(&plan), vec!["c", "a", "b", "root"]);
}

#[test]
fn multi_level_graph_resolves_in_discovery_order() {
    init_tracing();

    // grand needs parent_a and parent_b; parent_a needs child_a;
    // parent_b needs child_a and child_b.
    let registry = FakeRegistry::new()
        .with_unit("child_a", &[])
        .with_unit("child_b", &[])
        .with_unit("parent_a", &["child_a"])
        .with_unit("parent_b", &["child_a", "child_b"])
        .with_unit("grand", &["parent_a", "parent_b"]);

    let plan = resolve(&registry, "grand").expect("resolve");
    assert_eq!(
        names(&plan),
        vec!["child_a", "parent_a", "child_b", "parent_b", "grand"]
    );
}

#[test]
fn unrelated_units_keep_registry_order() {
    init_tracing();

    // left and right share no dependency relation; their relative order is
    // the upstream-list order reported for the root.
    let registry = FakeRegistry::new()
        .with_unit("left", &[])
        .with_unit("right", &[])
        .with_unit("root", &["right", "left"]);

    let plan = resolve(&registry, "root").expect("resolve");
    assert_eq!(names(&plan), vec!["right", "left", "root"]);
}

#[test]
fn unknown_root_is_reported() {
    init_tracing();

    let registry = FakeRegistry::new().with_unit("child_a", &[]);

    let err = resolve(&registry, "ghost").unwrap_err();
    assert!(matches!(err, DepflowError::UnitNotFound(name) if name == "ghost"));
}

#[test]
fn unknown_upstream_is_reported() {
    init_tracing();

    let registry = FakeRegistry::new().with_unit("parent_a", &["ghost"]);

    let err = resolve(&registry, "parent_a").unwrap_err();
    assert!(matches!(err, DepflowError::UnitNotFound(name) if name == "ghost"));
}

#[test]
fn two_unit_cycle_fails_fast() {
    init_tracing();

    let registry = FakeRegistry::new()
        .with_unit("a", &["b"])
        .with_unit("b", &["a"]);

    let err = resolve(&registry, "a").unwrap_err();
    assert!(matches!(err, DepflowError::DependencyCycle(_)));
}

#[test]
fn self_cycle_fails_fast() {
    init_tracing();

    let registry = FakeRegistry::new().with_unit("a", &["a"]);

    let err = resolve(&registry, "a").unwrap_err();
    assert!(matches!(err, DepflowError::DependencyCycle(_)));
}

#[test]
fn diamond_is_not_mistaken_for_a_cycle() {
    init_tracing();

    // c is reachable twice but the graph is acyclic.
    let registry = FakeRegistry::new()
        .with_unit("c", &[])
        .with_unit("a", &["c"])
        .with_unit("b", &["c", "a"])
        .with_unit("root", &["a", "b"]);

    let plan = resolve(&registry, "root").expect("resolve");
    assert_eq!(names(&plan), vec!["c", "a", "b", "root"]);
}
