//! Error surface shared by driver implementations.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// High-level error categories surfaced by a driver.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdapterErrorKind {
    #[error("target element not found")]
    TargetNotFound,
    #[error("stale element reference")]
    StaleElement,
    #[error("script evaluation failed")]
    ScriptFailed,
    #[error("driver i/o failure")]
    DriverIo,
    #[error("internal error")]
    Internal,
}

/// Enriched error metadata passed back to the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
    pub retriable: bool,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self {
            kind,
            hint: None,
            retriable: false,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn retriable(mut self, flag: bool) -> Self {
        self.retriable = flag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_hint() {
        let err = AdapterError::new(AdapterErrorKind::StaleElement).with_hint("stale element");
        assert_eq!(err.to_string(), "stale element reference: stale element");
    }

    #[test]
    fn test_display_without_hint() {
        let err = AdapterError::new(AdapterErrorKind::DriverIo);
        assert_eq!(err.to_string(), "driver i/o failure");
    }
}
