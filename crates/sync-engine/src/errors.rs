//! Error types for the synchronization engine.

use driver_adapter::{AdapterError, AdapterErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which condition a timed-out wait was polling for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitKind {
    Exist,
    Displayed,
    Enabled,
    Attribute,
    Text,
    Static,
    NewWindow,
    PageReady,
    Custom,
}

impl fmt::Display for WaitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WaitKind::Exist => "exist",
            WaitKind::Displayed => "displayed",
            WaitKind::Enabled => "enabled",
            WaitKind::Attribute => "attribute",
            WaitKind::Text => "text",
            WaitKind::Static => "static",
            WaitKind::NewWindow => "new-window",
            WaitKind::PageReady => "page-ready",
            WaitKind::Custom => "custom",
        };
        write!(f, "{}", label)
    }
}

/// Engine-level failures surfaced to callers.
///
/// No layer in the engine swallows one of these; every failure is annotated
/// with call-site context and rethrown.
#[derive(Debug, Error, Clone)]
pub enum SyncError {
    /// A wait's condition never became true (or false, in reverse mode)
    /// within budget.
    #[error("{kind} wait timed out after {timeout_ms}ms: {message}")]
    Timeout {
        kind: WaitKind,
        timeout_ms: u64,
        message: String,
    },

    /// The wrapped operation itself rejected after preconditions passed.
    /// The original error text is preserved and only annotated.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Driver transport failure.
    #[error("Driver I/O error: {0}")]
    DriverIo(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SyncError {
    pub fn timeout(kind: WaitKind, timeout: Duration, message: impl Into<String>) -> Self {
        SyncError::Timeout {
            kind,
            timeout_ms: timeout.as_millis() as u64,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::Timeout { .. })
    }

    /// The mutable diagnostic message of whichever variant this is. Used by
    /// the error context binder, which is the only layer allowed to mutate an
    /// in-flight error.
    pub(crate) fn message_mut(&mut self) -> &mut String {
        match self {
            SyncError::Timeout { message, .. } => message,
            SyncError::Execution(message)
            | SyncError::DriverIo(message)
            | SyncError::Internal(message) => message,
        }
    }
}

impl From<AdapterError> for SyncError {
    fn from(err: AdapterError) -> Self {
        match err.kind {
            AdapterErrorKind::DriverIo => SyncError::DriverIo(err.to_string()),
            AdapterErrorKind::Internal => SyncError::Internal(err.to_string()),
            AdapterErrorKind::TargetNotFound
            | AdapterErrorKind::StaleElement
            | AdapterErrorKind::ScriptFailed => SyncError::Execution(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_carries_kind_and_budget() {
        let err = SyncError::timeout(WaitKind::Exist, Duration::from_secs(5), "no element");
        assert_eq!(err.to_string(), "exist wait timed out after 5000ms: no element");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_execution_is_not_timeout() {
        let err = SyncError::Execution("stale element".to_string());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_adapter_error_mapping() {
        let stale = AdapterError::new(AdapterErrorKind::StaleElement).with_hint("gone");
        match SyncError::from(stale) {
            SyncError::Execution(message) => assert!(message.contains("stale element")),
            other => panic!("unexpected variant: {other:?}"),
        }

        let io = AdapterError::new(AdapterErrorKind::DriverIo);
        assert!(matches!(SyncError::from(io), SyncError::DriverIo(_)));
    }
}
