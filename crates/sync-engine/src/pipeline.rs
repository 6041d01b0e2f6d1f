//! Action pipeline - precondition checks wrapped around driver operations.
//!
//! Each wrapped operation runs a fixed, ordered sequence: existence wait,
//! optional scroll-into-view plus visibility wait, optional stability wait,
//! then the single execution attempt and an optional settle pause. The
//! pipeline never retries the operation itself; it only guarantees the
//! preconditions held once before the one attempt.

use crate::commands::{CommandTable, PipelineStep};
use crate::context::{with_error_context, ErrorContext};
use crate::errors::SyncError;
use crate::gestures::Gestures;
use crate::timeouts::DEFAULT_ACTION_TIMEOUT;
use crate::wait::Waits;
use driver_adapter::{Driver, Target};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Per-invocation configuration for a wrapped operation. Each field gates a
/// distinct, idempotent precondition step; none is global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOptions {
    /// Wait for the element to be displayed, scrolling toward it first if it
    /// is currently hidden.
    pub wait_for_displayed: bool,
    /// Wait for the element's screen position to settle.
    pub wait_for_static: bool,
    /// Budget applied to every precondition wait in this invocation.
    pub timeout: Duration,
    /// Pause issued after the operation completes. Not a correctness gate.
    pub post_delay: Duration,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            wait_for_displayed: false,
            wait_for_static: false,
            timeout: DEFAULT_ACTION_TIMEOUT,
            post_delay: Duration::ZERO,
        }
    }
}

impl ActionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(mut self) -> Self {
        self.wait_for_displayed = true;
        self
    }

    pub fn settled(mut self) -> Self {
        self.wait_for_static = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_post_delay(mut self, post_delay: Duration) -> Self {
        self.post_delay = post_delay;
        self
    }
}

/// Wrapped driver operations with readiness checks and diagnostic context.
///
/// Every action takes its [`Target`] explicitly; there is no ambient
/// "current element".
#[derive(Clone)]
pub struct Actions {
    driver: Arc<dyn Driver>,
    waits: Waits,
    gestures: Gestures,
    table: CommandTable,
}

impl Actions {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self::with_table(driver, CommandTable::standard())
    }

    pub fn with_table(driver: Arc<dyn Driver>, table: CommandTable) -> Self {
        Self {
            waits: Waits::new(driver.clone()),
            gestures: Gestures::new(driver.clone()),
            driver,
            table,
        }
    }

    pub fn waits(&self) -> &Waits {
        &self.waits
    }

    pub fn gestures(&self) -> &Gestures {
        &self.gestures
    }

    /// Click the element after its preconditions hold.
    pub async fn click(&self, target: &Target, options: &ActionOptions) -> Result<(), SyncError> {
        let driver = self.driver.as_ref();
        self.run(CommandTable::CLICK, target, options, move || async move {
            Ok(driver.click(target).await?)
        })
        .await
    }

    /// Read the element's text after its preconditions hold.
    pub async fn get_text(
        &self,
        target: &Target,
        options: &ActionOptions,
    ) -> Result<String, SyncError> {
        let driver = self.driver.as_ref();
        self.run(CommandTable::GET_TEXT, target, options, move || async move {
            Ok(driver.get_text(target).await?)
        })
        .await
    }

    /// Type a value into the element after its preconditions hold.
    pub async fn set_value(
        &self,
        target: &Target,
        value: &str,
        options: &ActionOptions,
    ) -> Result<(), SyncError> {
        let driver = self.driver.as_ref();
        self.run(CommandTable::SET_VALUE, target, options, move || async move {
            Ok(driver.set_value(target, value).await?)
        })
        .await
    }

    /// Texts of all matched elements, in query order.
    ///
    /// Bypasses the pipeline: each element is read sequentially with no
    /// individual readiness wait. Deliberately lighter-weight than the
    /// wrapped single-element operations.
    pub async fn get_elements_text(&self, target: &Target) -> Result<Vec<String>, SyncError> {
        let elements = self.driver.find_elements(target).await?;
        let mut values = Vec::with_capacity(elements.len());
        for element in &elements {
            values.push(self.driver.get_text(element).await?);
        }
        Ok(values)
    }

    /// Attribute values of all matched elements, in query order. Same
    /// pipeline bypass as [`Actions::get_elements_text`].
    pub async fn get_elements_attribute(
        &self,
        target: &Target,
        attribute: &str,
    ) -> Result<Vec<String>, SyncError> {
        let elements = self.driver.find_elements(target).await?;
        let mut values = Vec::with_capacity(elements.len());
        for element in &elements {
            values.push(self.driver.get_attribute(element, attribute).await?);
        }
        Ok(values)
    }

    /// Run one operation through its registered pipeline.
    ///
    /// Call-site context is captured synchronously here, before the first
    /// suspension point, so a later failure still points at the invoking
    /// line. Steps run strictly in registered order; the first failure aborts
    /// the rest.
    async fn run<R, F, Fut>(
        &self,
        operation: &str,
        target: &Target,
        options: &ActionOptions,
        invoke: F,
    ) -> Result<R, SyncError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, SyncError>>,
    {
        let ctx = ErrorContext::capture(target.selector());
        let action_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        info!(
            action_id = %action_id,
            operation,
            locator = %target.selector(),
            "executing wrapped operation"
        );

        let steps = self.table.steps(operation).ok_or_else(|| {
            SyncError::Internal(format!("no pipeline registered for operation '{}'", operation))
        })?;

        let result = with_error_context(&ctx, async {
            let mut invoke = Some(invoke);
            let mut output = None;

            for step in steps {
                match step {
                    PipelineStep::WaitForExist => {
                        self.waits
                            .wait_for_exist(target, Some(options.timeout), None)
                            .await?;
                    }
                    PipelineStep::ScrollIntoViewIfHidden => {
                        if options.wait_for_displayed
                            && !self.driver.element_displayed(target).await?
                        {
                            debug!(
                                action_id = %action_id,
                                locator = %target.selector(),
                                "element hidden, scrolling into view"
                            );
                            self.gestures.scroll_to(target).await?;
                            self.waits
                                .wait_for_displayed(target, Some(options.timeout), None)
                                .await?;
                        }
                    }
                    PipelineStep::WaitForStatic => {
                        if options.wait_for_static {
                            self.waits
                                .wait_for_static(target, Some(options.timeout), None)
                                .await?;
                        }
                    }
                    PipelineStep::Invoke => {
                        let invoke = invoke.take().ok_or_else(|| {
                            SyncError::Internal("duplicate invoke step".to_string())
                        })?;
                        output = Some(invoke().await?);
                    }
                    PipelineStep::PostDelay => {
                        if !options.post_delay.is_zero() {
                            // Settle pause only; a pause failure never fails
                            // the action.
                            if let Err(err) = self.driver.pause(options.post_delay).await {
                                debug!(
                                    action_id = %action_id,
                                    error = %err,
                                    "post-delay pause failed, continuing"
                                );
                            }
                        }
                    }
                }
            }

            output.ok_or_else(|| SyncError::Internal("pipeline missing invoke step".to_string()))
        })
        .await;

        if result.is_ok() {
            info!(
                action_id = %action_id,
                operation,
                latency_ms = started.elapsed().as_millis() as u64,
                "wrapped operation completed"
            );
        }
        result
    }
}
