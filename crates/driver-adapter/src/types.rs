//! Element handles, geometry, and gesture data types.

use serde::{Deserialize, Serialize};

/// Opaque handle to a remote UI element.
///
/// Carries the human-readable locator used for diagnostics. The handle holds
/// no live element reference; drivers resolve the selector fresh on every
/// call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    selector: String,
    raw_locator: Option<String>,
}

impl Target {
    /// Create a target from a selector string.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            raw_locator: None,
        }
    }

    /// Attach the underlying raw locator value where it differs from the
    /// display selector (some driver backends expose both).
    pub fn with_raw_locator(mut self, raw: impl Into<String>) -> Self {
        self.raw_locator = Some(raw.into());
        self
    }

    /// The display selector, used for diagnostics by most of the engine.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The raw locator value. Attribute waits diagnose through this accessor;
    /// it falls back to the display selector when no raw value was attached.
    pub fn raw_locator(&self) -> &str {
        self.raw_locator.as_deref().unwrap_or(&self.selector)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)
    }
}

/// On-screen position in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Window or screen dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One step of a low-level touch gesture sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GestureStep {
    /// Press down at the given coordinates.
    Press { at: Point },
    /// Hold for the given number of milliseconds.
    Wait { ms: u64 },
    /// Move the pressed pointer to the given coordinates.
    MoveTo { to: Point },
    /// Release the pointer.
    Release,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_locator_falls_back_to_selector() {
        let target = Target::new("#submit");
        assert_eq!(target.raw_locator(), "#submit");
        assert_eq!(target.selector(), "#submit");
    }

    #[test]
    fn test_raw_locator_when_attached() {
        let target = Target::new("submit button").with_raw_locator("//button[@id='submit']");
        assert_eq!(target.selector(), "submit button");
        assert_eq!(target.raw_locator(), "//button[@id='submit']");
    }

    #[test]
    fn test_gesture_step_serialization() {
        let step = GestureStep::Press {
            at: Point::new(10, 20),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["action"], "press");
        assert_eq!(json["at"]["x"], 10);
    }
}
