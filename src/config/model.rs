// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [unit.child_a]
/// cmd = "make -C child_a"
///
/// [unit.parent_a]
/// cmd = "make -C parent_a"
/// needs = ["child_a"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// All units from `[unit.<name>]`, keyed by unit name.
    #[serde(default)]
    pub unit: BTreeMap<String, UnitConfig>,
}

/// Validated configuration.
///
/// Constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), which
/// rejects empty configs, unknown or self `needs` references, and cyclic
/// dependency graphs.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub unit: BTreeMap<String, UnitConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(unit: BTreeMap<String, UnitConfig>) -> Self {
        Self { unit }
    }
}

/// `[unit.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Default build action for this unit.
    pub cmd: String,

    /// Direct upstream units that must be built before this one.
    ///
    /// The order given here is the order the resolver visits them in.
    #[serde(default)]
    pub needs: Vec<String>,

    /// Exit codes that mark the build as unstable rather than failed.
    ///
    /// Whether an unstable build aborts the run is decided by the run's
    /// `fail_on_unstable` policy, not here.
    #[serde(default)]
    pub unstable_exit_codes: Vec<i32>,
}
