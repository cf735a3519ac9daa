// src/exec/mod.rs

//! Build triggering layer.
//!
//! - [`backend`] defines the `BuildBackend` seam and the `PendingBuild`
//!   handle the executor awaits.
//! - [`command`] is the production backend that runs unit build actions
//!   through the platform shell.

pub mod backend;
pub mod command;

pub use backend::{BuildBackend, PendingBuild};
pub use command::CommandBackend;
