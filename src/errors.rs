// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::engine::{UnitName, UnitOutcome};

#[derive(Error, Debug)]
pub enum DepflowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitName),

    #[error("Cycle detected in dependency graph: {0}")]
    DependencyCycle(String),

    #[error("Build of unit '{unit}' ended with {outcome}")]
    BuildFailed { unit: UnitName, outcome: UnitOutcome },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DepflowError>;
