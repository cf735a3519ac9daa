// src/registry.rs

//! Unit registry boundary.
//!
//! Units are owned by whatever hosts them; the engine only holds name
//! references and queries upstream edges on demand. The resolver never
//! reaches a process-wide registry: it is handed a [`UnitRegistry`]
//! implementation explicitly, so tests can substitute fakes.

use std::collections::HashMap;

use crate::config::model::ConfigFile;
use crate::engine::UnitName;

/// Name lookup plus direct upstream edges.
pub trait UnitRegistry: Send + Sync {
    /// Resolve a human-readable identifier to a known unit.
    fn lookup_unit(&self, name: &str) -> Option<UnitName>;

    /// Direct upstream dependencies of `unit`, in the registry's own order.
    ///
    /// Unknown units report no edges; existence is checked through
    /// [`UnitRegistry::lookup_unit`].
    fn upstream_of(&self, unit: &UnitName) -> Vec<UnitName>;
}

/// Registry view over a validated config file.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    upstream: HashMap<UnitName, Vec<UnitName>>,
}

impl ConfigRegistry {
    /// Build the registry from a validated [`ConfigFile`].
    ///
    /// Assumes unknown `needs` references and cycles were rejected during
    /// config validation; the resolver still guards against both.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let upstream = cfg
            .unit
            .iter()
            .map(|(name, unit)| (name.clone(), unit.needs.clone()))
            .collect();
        Self { upstream }
    }

    /// All unit names known to this registry.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.upstream.keys().map(|s| s.as_str())
    }
}

impl UnitRegistry for ConfigRegistry {
    fn lookup_unit(&self, name: &str) -> Option<UnitName> {
        self.upstream.contains_key(name).then(|| name.to_string())
    }

    fn upstream_of(&self, unit: &UnitName) -> Vec<UnitName> {
        self.upstream.get(unit).cloned().unwrap_or_default()
    }
}
