//! Remote automation driver abstraction.
//!
//! This crate hosts the seam between the synchronization engine and whatever
//! concrete automation protocol drives the UI (browser or mobile). The engine
//! wires against the [`Driver`] trait only; transports plug in behind it.
//! A scriptable [`MockDriver`] is provided for engine tests.

pub mod errors;
pub mod mock;
pub mod types;

pub use errors::{AdapterError, AdapterErrorKind};
pub use mock::{MockDriver, MockElement};
pub use types::{GestureStep, Point, Size, Target};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Minimal driver capability surface required by the synchronization engine.
///
/// Every method is one remote round trip. Implementations must look the
/// element up fresh on each call; the engine never caches live handles across
/// polls because a handle may refetch after scroll or navigation.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Whether an element matching the target currently exists.
    async fn element_exists(&self, target: &Target) -> Result<bool, AdapterError>;

    /// Whether the element is rendered and visible in the viewport.
    async fn element_displayed(&self, target: &Target) -> Result<bool, AdapterError>;

    /// Whether the element accepts interaction.
    async fn element_enabled(&self, target: &Target) -> Result<bool, AdapterError>;

    /// Read an attribute value from the element.
    async fn get_attribute(&self, target: &Target, name: &str) -> Result<String, AdapterError>;

    /// Read the element's visible text.
    async fn get_text(&self, target: &Target) -> Result<String, AdapterError>;

    /// Current on-screen position of the element.
    async fn get_location(&self, target: &Target) -> Result<Point, AdapterError>;

    /// Size of the automation window / device screen.
    async fn get_window_size(&self) -> Result<Size, AdapterError>;

    /// Handles of all currently open windows/tabs.
    async fn get_window_handles(&self) -> Result<Vec<String>, AdapterError>;

    /// Switch the driver focus to the given window handle.
    async fn switch_window(&self, handle: &str) -> Result<(), AdapterError>;

    /// Perform a low-level touch gesture sequence.
    async fn perform_gesture(&self, steps: &[GestureStep]) -> Result<(), AdapterError>;

    /// Suspend the driver for the given duration.
    async fn pause(&self, duration: Duration) -> Result<(), AdapterError>;

    /// Click the element.
    async fn click(&self, target: &Target) -> Result<(), AdapterError>;

    /// Type a value into the element.
    async fn set_value(&self, target: &Target, value: &str) -> Result<(), AdapterError>;

    /// Evaluate a script in the remote context and return its value.
    async fn execute_script(&self, expression: &str) -> Result<Value, AdapterError>;

    /// All elements matching the target, in query order.
    async fn find_elements(&self, target: &Target) -> Result<Vec<Target>, AdapterError>;
}
