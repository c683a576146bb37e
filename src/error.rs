//! Error types used by the domvisor scheduler.
//!
//! This module defines [`InjectError`], the single error enum shared by the
//! injection facade, the deferred queues and the module loader.
//!
//! The scheduler itself never enters a terminal failure state: an error in
//! one injection is isolated to that item and surfaced (as a `Result` for
//! module loading, as Bus events during a flush), while subsequent
//! submissions and buffered items keep running.
//!
//! The type provides helper methods (`as_label`, `as_message`) for
//! logging/metrics, matching how subscribers consume events.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced by injection operations.
///
/// - [`InjectError::ModuleLoad`] — the external client-module source could
///   not be read. Returned by `inject_module`; never retried automatically.
/// - [`InjectError::Config`] — the client-module config payload could not be
///   serialized to JSON.
/// - [`InjectError::Apply`] — the target surface rejected an individual
///   operation during immediate application or a queue flush.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InjectError {
    /// Client-module source was unreadable.
    #[error("module {path:?} not loaded: {source}")]
    ModuleLoad {
        /// Path of the module that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Client-module config payload could not be serialized.
    #[error("module config not serializable: {source}")]
    Config {
        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// The target surface rejected an operation.
    #[error("apply failed for {op}: {reason}")]
    Apply {
        /// Short operation label (e.g. `"element"`, `"body_event"`).
        op: &'static str,
        /// Human-readable reason supplied by the surface.
        reason: String,
    },
}

impl InjectError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use domvisor::InjectError;
    ///
    /// let err = InjectError::Apply { op: "element", reason: "no head".into() };
    /// assert_eq!(err.as_label(), "inject_apply_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InjectError::ModuleLoad { .. } => "inject_module_load_failed",
            InjectError::Config { .. } => "inject_config_invalid",
            InjectError::Apply { .. } => "inject_apply_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InjectError::ModuleLoad { path, source } => {
                format!("module {} not loaded: {source}", path.display())
            }
            InjectError::Config { source } => format!("config not serializable: {source}"),
            InjectError::Apply { op, reason } => format!("apply failed for {op}: {reason}"),
        }
    }
}
