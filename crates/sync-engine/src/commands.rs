//! Operation-to-pipeline registration table.
//!
//! Wrapped driver operations are not installed by patching a shared command
//! table at runtime. Instead each operation name maps to an ordered list of
//! pipeline steps, built once at setup, with the real driver call captured as
//! the terminal [`PipelineStep::Invoke`] step.

use crate::errors::SyncError;
use std::collections::HashMap;

/// One stage of a wrapped operation's pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Unconditional existence wait.
    WaitForExist,
    /// If the visibility gate is on and the element is hidden: scroll toward
    /// it, then wait for it to be displayed.
    ScrollIntoViewIfHidden,
    /// If the stability gate is on: wait for the position to settle.
    WaitForStatic,
    /// Execute the wrapped driver operation, exactly once.
    Invoke,
    /// Optional settle pause after the operation.
    PostDelay,
}

/// Immutable mapping from operation name to its pipeline.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: HashMap<String, Vec<PipelineStep>>,
}

impl CommandTable {
    pub const CLICK: &'static str = "click";
    pub const GET_TEXT: &'static str = "getText";
    pub const SET_VALUE: &'static str = "setValue";

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The standard table: click, getText and setValue all run the full
    /// precondition sequence before their single execution attempt.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for operation in [Self::CLICK, Self::GET_TEXT, Self::SET_VALUE] {
            table
                .register(operation, Self::default_steps())
                .expect("standard pipeline steps are valid");
        }
        table
    }

    pub fn default_steps() -> Vec<PipelineStep> {
        vec![
            PipelineStep::WaitForExist,
            PipelineStep::ScrollIntoViewIfHidden,
            PipelineStep::WaitForStatic,
            PipelineStep::Invoke,
            PipelineStep::PostDelay,
        ]
    }

    /// Register a pipeline for an operation. The step list must contain
    /// exactly one `Invoke`, followed only by `PostDelay`.
    pub fn register(
        &mut self,
        operation: impl Into<String>,
        steps: Vec<PipelineStep>,
    ) -> Result<(), SyncError> {
        let operation = operation.into();
        let invoke_count = steps.iter().filter(|s| **s == PipelineStep::Invoke).count();
        if invoke_count != 1 {
            return Err(SyncError::Internal(format!(
                "pipeline for '{}' must contain exactly one invoke step, found {}",
                operation, invoke_count
            )));
        }
        let invoke_at = steps
            .iter()
            .position(|s| *s == PipelineStep::Invoke)
            .expect("invoke step present");
        if steps[invoke_at + 1..]
            .iter()
            .any(|s| *s != PipelineStep::PostDelay)
        {
            return Err(SyncError::Internal(format!(
                "pipeline for '{}' has precondition steps after invoke",
                operation
            )));
        }
        self.entries.insert(operation, steps);
        Ok(())
    }

    pub fn steps(&self, operation: &str) -> Option<&[PipelineStep]> {
        self.entries.get(operation).map(Vec::as_slice)
    }

    pub fn operations(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}
