//! Scriptable in-memory driver for engine tests.
//!
//! Elements are registered up front with scripted state (existence delays,
//! visibility, position timelines, injected failures). Every driver call is
//! recorded so tests can assert on ordering, mirroring how a real transport
//! would sequence round trips.

use crate::errors::{AdapterError, AdapterErrorKind};
use crate::types::{GestureStep, Point, Size, Target};
use crate::Driver;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Scripted state for one element the mock knows about.
#[derive(Clone, Debug)]
pub struct MockElement {
    selector: String,
    exists_after: Option<Duration>,
    displayed: bool,
    display_on_scroll: bool,
    enabled: bool,
    text: String,
    attributes: HashMap<String, String>,
    positions: Vec<(Duration, Point)>,
    click_error: Option<AdapterError>,
    set_value_error: Option<AdapterError>,
    matches: Vec<String>,
}

impl MockElement {
    /// A present, displayed, enabled element with no scripted quirks.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            exists_after: Some(Duration::ZERO),
            displayed: true,
            display_on_scroll: false,
            enabled: true,
            text: String::new(),
            attributes: HashMap::new(),
            positions: vec![(Duration::ZERO, Point::default())],
            click_error: None,
            set_value_error: None,
            matches: Vec::new(),
        }
    }

    /// Element never comes into existence.
    pub fn never_exists(mut self) -> Self {
        self.exists_after = None;
        self
    }

    /// Element starts to exist only after the given delay.
    pub fn exists_after(mut self, delay: Duration) -> Self {
        self.exists_after = Some(delay);
        self
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Off-screen element that becomes displayed once any gesture runs.
    pub fn displayed_after_scroll(mut self) -> Self {
        self.displayed = false;
        self.display_on_scroll = true;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Position timeline: the element reports the position whose offset is the
    /// latest one not after the sample time. The last entry holds forever.
    pub fn positions(mut self, timeline: Vec<(Duration, Point)>) -> Self {
        self.positions = timeline;
        self
    }

    pub fn fail_click(mut self, error: AdapterError) -> Self {
        self.click_error = Some(error);
        self
    }

    pub fn fail_set_value(mut self, error: AdapterError) -> Self {
        self.set_value_error = Some(error);
        self
    }

    /// Selectors returned by `find_elements`, in query order.
    pub fn matches(mut self, selectors: Vec<&str>) -> Self {
        self.matches = selectors.into_iter().map(String::from).collect();
        self
    }
}

#[derive(Default)]
struct MockState {
    elements: HashMap<String, MockElement>,
    window_handles: Vec<(Duration, Vec<String>)>,
    script_results: Vec<Value>,
    calls: Vec<String>,
    gestures_performed: usize,
}

/// In-memory [`Driver`] with scripted behavior and a recorded call log.
pub struct MockDriver {
    state: Mutex<MockState>,
    window_size: Size,
    started: Instant,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    pub fn new() -> Self {
        let mut state = MockState::default();
        state.window_handles = vec![(Duration::ZERO, vec!["window-0".to_string()])];
        Self {
            state: Mutex::new(state),
            window_size: Size::new(1280, 800),
            started: Instant::now(),
        }
    }

    pub fn with_window_size(mut self, size: Size) -> Self {
        self.window_size = size;
        self
    }

    pub fn add_element(&self, element: MockElement) {
        let mut state = self.state.lock().unwrap();
        state.elements.insert(element.selector.clone(), element);
    }

    /// Replace the window-handle timeline; the latest entry not after the
    /// sample time wins.
    pub fn set_window_handles(&self, timeline: Vec<(Duration, Vec<String>)>) {
        self.state.lock().unwrap().window_handles = timeline;
    }

    /// Queue results returned by `execute_script`, first in first out. When
    /// the queue is empty the mock answers `true`.
    pub fn push_script_result(&self, value: Value) {
        self.state.lock().unwrap().script_results.push(value);
    }

    /// Every driver call made so far, in order, as `op:selector` entries.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of recorded calls matching the given prefix.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn record(&self, call: String) {
        debug!(call = %call, "mock driver call");
        self.state.lock().unwrap().calls.push(call);
    }

    fn element(&self, target: &Target) -> Result<MockElement, AdapterError> {
        let state = self.state.lock().unwrap();
        state.elements.get(target.selector()).cloned().ok_or_else(|| {
            AdapterError::new(AdapterErrorKind::TargetNotFound)
                .with_hint(format!("no scripted element for '{}'", target.selector()))
        })
    }

    fn exists_now(&self, element: &MockElement) -> bool {
        match element.exists_after {
            Some(delay) => self.elapsed() >= delay,
            None => false,
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn element_exists(&self, target: &Target) -> Result<bool, AdapterError> {
        self.record(format!("exists:{}", target.selector()));
        match self.element(target) {
            Ok(element) => Ok(self.exists_now(&element)),
            Err(_) => Ok(false),
        }
    }

    async fn element_displayed(&self, target: &Target) -> Result<bool, AdapterError> {
        self.record(format!("displayed:{}", target.selector()));
        let element = self.element(target)?;
        if !self.exists_now(&element) {
            return Ok(false);
        }
        if element.display_on_scroll {
            let scrolled = self.state.lock().unwrap().gestures_performed > 0;
            return Ok(element.displayed || scrolled);
        }
        Ok(element.displayed)
    }

    async fn element_enabled(&self, target: &Target) -> Result<bool, AdapterError> {
        self.record(format!("enabled:{}", target.selector()));
        let element = self.element(target)?;
        Ok(self.exists_now(&element) && element.enabled)
    }

    async fn get_attribute(&self, target: &Target, name: &str) -> Result<String, AdapterError> {
        self.record(format!("attribute:{}:{}", target.selector(), name));
        let element = self.element(target)?;
        Ok(element.attributes.get(name).cloned().unwrap_or_default())
    }

    async fn get_text(&self, target: &Target) -> Result<String, AdapterError> {
        self.record(format!("text:{}", target.selector()));
        Ok(self.element(target)?.text)
    }

    async fn get_location(&self, target: &Target) -> Result<Point, AdapterError> {
        self.record(format!("location:{}", target.selector()));
        let element = self.element(target)?;
        let elapsed = self.elapsed();
        let mut current = element.positions.first().map(|(_, p)| *p).unwrap_or_default();
        for (offset, point) in &element.positions {
            if *offset <= elapsed {
                current = *point;
            }
        }
        Ok(current)
    }

    async fn get_window_size(&self) -> Result<Size, AdapterError> {
        self.record("window_size".to_string());
        Ok(self.window_size)
    }

    async fn get_window_handles(&self) -> Result<Vec<String>, AdapterError> {
        self.record("window_handles".to_string());
        let elapsed = self.elapsed();
        let state = self.state.lock().unwrap();
        let mut current = Vec::new();
        for (offset, handles) in &state.window_handles {
            if *offset <= elapsed {
                current = handles.clone();
            }
        }
        Ok(current)
    }

    async fn switch_window(&self, handle: &str) -> Result<(), AdapterError> {
        self.record(format!("switch_window:{}", handle));
        Ok(())
    }

    async fn perform_gesture(&self, steps: &[GestureStep]) -> Result<(), AdapterError> {
        self.record(format!("gesture:{}", steps.len()));
        self.state.lock().unwrap().gestures_performed += 1;
        Ok(())
    }

    async fn pause(&self, duration: Duration) -> Result<(), AdapterError> {
        self.record(format!("pause:{}", duration.as_millis()));
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn click(&self, target: &Target) -> Result<(), AdapterError> {
        self.record(format!("click:{}", target.selector()));
        let element = self.element(target)?;
        match element.click_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn set_value(&self, target: &Target, value: &str) -> Result<(), AdapterError> {
        self.record(format!("set_value:{}:{}", target.selector(), value));
        let element = self.element(target)?;
        match element.set_value_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn execute_script(&self, expression: &str) -> Result<Value, AdapterError> {
        self.record(format!("script:{}", expression));
        let mut state = self.state.lock().unwrap();
        if state.script_results.is_empty() {
            Ok(Value::Bool(true))
        } else {
            Ok(state.script_results.remove(0))
        }
    }

    async fn find_elements(&self, target: &Target) -> Result<Vec<Target>, AdapterError> {
        self.record(format!("find_elements:{}", target.selector()));
        let element = self.element(target)?;
        Ok(element.matches.iter().map(Target::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_element_does_not_exist() {
        let driver = MockDriver::new();
        let exists = driver.element_exists(&Target::new("#missing")).await.unwrap();
        assert!(!exists);
    }

    #[tokio::test]
    async fn test_scripted_element_text() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("#label").text("hello"));
        let text = driver.get_text(&Target::new("#label")).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("#a"));
        let target = Target::new("#a");
        driver.element_exists(&target).await.unwrap();
        driver.click(&target).await.unwrap();
        assert_eq!(driver.calls(), vec!["exists:#a", "click:#a"]);
    }

    #[tokio::test]
    async fn test_display_on_scroll_flips_after_gesture() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("#below").displayed_after_scroll());
        let target = Target::new("#below");
        assert!(!driver.element_displayed(&target).await.unwrap());
        driver.perform_gesture(&[GestureStep::Release]).await.unwrap();
        assert!(driver.element_displayed(&target).await.unwrap());
    }
}
