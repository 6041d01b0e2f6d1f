//! Position-stability detection.
//!
//! Single-sample position equality is unreliable for animating or
//! transitioning elements, so the detector samples the element's screen
//! position on a fixed cadence and requires several consecutive identical
//! samples before declaring it motion-settled. This trades latency for
//! correctness; callers are expected to opt in sparingly.

use crate::errors::{SyncError, WaitKind};
use crate::timeouts::{STATIC_POLL_INTERVAL, STATIC_REQUIRED_MATCHES};
use driver_adapter::{Driver, Point, Target};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, trace};

pub(crate) const STATIC_MESSAGE: &str = "Element is not static error";

/// Accumulator local to one stability wait; discarded on completion.
#[derive(Debug, Default)]
pub struct StabilityState {
    last_sample: Option<Point>,
    consecutive_matches: u32,
}

impl StabilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one position sample. A sample equal to the previous one extends
    /// the streak; any difference resets it to zero with no partial credit,
    /// regardless of prior length. Returns the current streak.
    pub fn observe(&mut self, sample: Point) -> u32 {
        match self.last_sample {
            Some(previous) if previous == sample => self.consecutive_matches += 1,
            _ => self.consecutive_matches = 0,
        }
        self.last_sample = Some(sample);
        self.consecutive_matches
    }

    pub fn is_settled(&self) -> bool {
        self.consecutive_matches >= STATIC_REQUIRED_MATCHES
    }
}

/// Poll the element's position until it holds still.
///
/// The sampling cadence is the fixed [`STATIC_POLL_INTERVAL`]; the
/// caller-supplied `timeout` only bounds the total wait.
pub(crate) async fn poll_static(
    driver: &dyn Driver,
    target: &Target,
    timeout: Duration,
    message: &str,
) -> Result<(), SyncError> {
    let start = Instant::now();
    let mut state = StabilityState::new();

    loop {
        let sample = driver.get_location(target).await?;
        let streak = state.observe(sample);
        trace!(locator = %target.selector(), x = sample.x, y = sample.y, streak, "stability sample");

        if state.is_settled() {
            debug!(
                locator = %target.selector(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "element position settled"
            );
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(SyncError::timeout(WaitKind::Static, timeout, message));
        }
        sleep(STATIC_POLL_INTERVAL).await;
    }
}
