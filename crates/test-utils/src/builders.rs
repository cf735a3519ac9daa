#![allow(dead_code)]

use std::collections::BTreeMap;

use depflow::config::{ConfigFile, RawConfigFile, UnitConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                unit: BTreeMap::new(),
            },
        }
    }

    pub fn with_unit(mut self, name: &str, unit: UnitConfig) -> Self {
        self.config.unit.insert(name.to_string(), unit);
        self
    }

    /// Raw, unvalidated config, for tests exercising the validation layer.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `UnitConfig`.
pub struct UnitConfigBuilder {
    unit: UnitConfig,
}

impl UnitConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            unit: UnitConfig {
                cmd: cmd.to_string(),
                needs: vec![],
                unstable_exit_codes: vec![],
            },
        }
    }

    pub fn needs(mut self, dep: &str) -> Self {
        self.unit.needs.push(dep.to_string());
        self
    }

    pub fn unstable_exit_code(mut self, code: i32) -> Self {
        self.unit.unstable_exit_codes.push(code);
        self
    }

    pub fn build(self) -> UnitConfig {
        self.unit
    }
}
