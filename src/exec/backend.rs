// src/exec/backend.rs

//! Pluggable build-trigger backend abstraction.
//!
//! The executor talks to a `BuildBackend` instead of spawning processes
//! directly. Production code uses [`crate::exec::CommandBackend`]; tests can
//! provide their own implementation that reports scripted outcomes without
//! running anything.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::oneshot;

use crate::engine::{UnitName, UnitOutcome};
use crate::errors::Result;

/// Handle for a triggered build that has not yet reached a terminal outcome.
///
/// Awaiting [`PendingBuild::outcome`] is the executor's sole suspension
/// point. [`PendingBuild::cancel`] asks the backend to stop the build; a
/// stopped build is observed as [`UnitOutcome::Aborted`].
#[derive(Debug)]
pub struct PendingBuild {
    outcome_rx: oneshot::Receiver<UnitOutcome>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl PendingBuild {
    pub fn new(
        outcome_rx: oneshot::Receiver<UnitOutcome>,
        cancel_tx: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self {
            outcome_rx,
            cancel_tx,
        }
    }

    /// Handle that is terminal from the start, for backends that know the
    /// outcome without spawning anything.
    pub fn ready(outcome: UnitOutcome) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self {
            outcome_rx: rx,
            cancel_tx: None,
        }
    }

    /// Wait for the terminal outcome of this build.
    ///
    /// A backend that goes away without reporting counts as an aborted
    /// build rather than an error.
    pub async fn outcome(&mut self) -> UnitOutcome {
        match (&mut self.outcome_rx).await {
            Ok(outcome) => outcome,
            Err(_) => UnitOutcome::Aborted,
        }
    }

    /// Ask the backend to stop this build. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Trait abstracting how unit builds are triggered.
///
/// The implementation is free to:
/// - spawn OS processes (production)
/// - hand back pre-resolved outcomes (tests)
pub trait BuildBackend: Send {
    /// Start a build for `unit` and return an awaitable handle.
    ///
    /// When `override_action` is set it replaces the unit's default build
    /// action. The text is opaque to the caller and must reach the build
    /// mechanism unchanged.
    fn trigger_build(
        &mut self,
        unit: &UnitName,
        override_action: Option<&str>,
    ) -> Pin<Box<dyn Future<Output = Result<PendingBuild>> + Send + '_>>;
}
