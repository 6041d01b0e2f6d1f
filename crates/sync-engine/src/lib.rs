//! Synchronization and action-wrapping engine for remote UI automation.
//!
//! Remote-driver primitives (click, read text, set value) are fragile on
//! their own: elements animate, render late, or do not exist yet. This crate
//! wraps them with readiness checks and diagnostic error context:
//! - a generic poll loop with forward and reverse modes ([`wait::poll_until`])
//! - a position-stability detector ([`stability`])
//! - an action pipeline composing existence/visibility/stability checks
//!   before the single execution attempt ([`pipeline`])
//! - call-site capture so asynchronous failures still point at the
//!   originating line ([`context`])

pub mod commands;
pub mod context;
pub mod errors;
pub mod gestures;
pub mod pipeline;
pub mod stability;
pub mod timeouts;
pub mod wait;

pub use commands::{CommandTable, PipelineStep};
pub use context::{with_error_context, ErrorContext};
pub use errors::{SyncError, WaitKind};
pub use gestures::Gestures;
pub use pipeline::{ActionOptions, Actions};
pub use stability::StabilityState;
pub use wait::{poll_until, WaitSpec, Waits};

pub use driver_adapter::{
    AdapterError, AdapterErrorKind, Driver, GestureStep, Point, Size, Target,
};
