// src/plan/resolver.rs

//! Resolves a root unit into an upstream-first [`BuildPlan`].

use std::collections::HashSet;

use tracing::debug;

use crate::engine::UnitName;
use crate::errors::{DepflowError, Result};
use crate::plan::BuildPlan;
use crate::registry::UnitRegistry;

/// Compute the deduplicated, upstream-first build order for `root`.
///
/// Depth-first post-order: the upstream units of each unit are resolved
/// before the unit itself, in the order the registry reports them. A unit
/// reachable through several paths (diamond) keeps its first-discovery
/// position; later visits are no-ops and never reorder it. The root is
/// always the final element.
///
/// Fails with [`DepflowError::UnitNotFound`] when `root` or any upstream
/// identifier is unknown to the registry, and with
/// [`DepflowError::DependencyCycle`] when the upstream relation loops back
/// into a unit that is still being resolved. Both happen before any unit is
/// triggered.
pub fn resolve(registry: &dyn UnitRegistry, root: &str) -> Result<BuildPlan> {
    let root = registry
        .lookup_unit(root)
        .ok_or_else(|| DepflowError::UnitNotFound(root.to_string()))?;

    let mut state = ResolveState::default();
    visit(registry, &root, &mut state)?;

    debug!(root = %root, units = state.ordered.len(), "resolved build plan");
    Ok(BuildPlan::new(state.ordered))
}

#[derive(Default)]
struct ResolveState {
    ordered: Vec<UnitName>,
    completed: HashSet<UnitName>,
    /// Units on the current traversal path, distinct from `completed`;
    /// re-entering one means the upstream relation is cyclic.
    visiting: HashSet<UnitName>,
}

fn visit(registry: &dyn UnitRegistry, unit: &UnitName, state: &mut ResolveState) -> Result<()> {
    if state.completed.contains(unit) {
        return Ok(());
    }
    if !state.visiting.insert(unit.clone()) {
        return Err(DepflowError::DependencyCycle(format!(
            "upstream relation loops back into unit '{unit}'"
        )));
    }

    for upstream in registry.upstream_of(unit) {
        match registry.lookup_unit(&upstream) {
            Some(upstream) => visit(registry, &upstream, state)?,
            None => return Err(DepflowError::UnitNotFound(upstream)),
        }
    }

    state.visiting.remove(unit);
    state.completed.insert(unit.clone());
    state.ordered.push(unit.clone());
    Ok(())
}
