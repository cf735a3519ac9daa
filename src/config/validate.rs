// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DepflowError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DepflowError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.unit))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_units(cfg)?;
    validate_unit_dependencies(cfg)?;
    validate_graph(cfg)?;
    Ok(())
}

fn ensure_has_units(cfg: &RawConfigFile) -> Result<()> {
    if cfg.unit.is_empty() {
        return Err(DepflowError::ConfigError(
            "config must contain at least one [unit.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_unit_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, unit) in cfg.unit.iter() {
        for dep in unit.needs.iter() {
            if !cfg.unit.contains_key(dep) {
                return Err(DepflowError::ConfigError(format!(
                    "unit '{}' has unknown dependency '{}' in `needs`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(DepflowError::ConfigError(format!(
                    "unit '{}' cannot depend on itself in `needs`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_graph(cfg: &RawConfigFile) -> Result<()> {
    // Build a simple petgraph graph from the units and their dependencies.
    //
    // Edge direction: dep -> unit
    // For:
    //   [unit.B]
    //   needs = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.unit.keys() {
        graph.add_node(name.as_str());
    }

    for (name, unit) in cfg.unit.iter() {
        for dep in unit.needs.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(DepflowError::DependencyCycle(format!(
                "cycle detected in unit dependency graph involving unit '{}'",
                node
            )))
        }
    }
}
