//! Touch-gesture helpers built on the driver's low-level gesture sequence.

use crate::errors::SyncError;
use crate::timeouts::GESTURE_SETTLE;
use driver_adapter::{Driver, GestureStep, Point, Target};
use std::sync::Arc;
use tracing::debug;

/// Milliseconds the pointer holds between press and move.
const PRESS_HOLD_MS: u64 = 100;

/// Gesture helpers over a remote driver.
#[derive(Clone)]
pub struct Gestures {
    driver: Arc<dyn Driver>,
}

impl Gestures {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Swipe from one pixel coordinate to another.
    pub async fn swipe(&self, from: Point, to: Point) -> Result<(), SyncError> {
        debug!(?from, ?to, "performing swipe");
        self.driver
            .perform_gesture(&[
                GestureStep::Press { at: from },
                GestureStep::Wait { ms: PRESS_HOLD_MS },
                GestureStep::MoveTo { to },
                GestureStep::Release,
            ])
            .await?;
        self.driver.pause(GESTURE_SETTLE).await?;
        Ok(())
    }

    /// Scroll from mid-screen toward the element's vertical position.
    pub async fn scroll_to(&self, target: &Target) -> Result<(), SyncError> {
        let window = self.driver.get_window_size().await?;
        let start = Point::new(0, (window.height / 2) as i32);
        let destination = self.driver.get_location(target).await?;
        debug!(locator = %target.selector(), from_y = start.y, to_y = destination.y, "scrolling toward element");
        self.swipe(start, Point::new(0, destination.y)).await
    }

    /// Horizontal scroll, right-to-left (advance through a horizontal list).
    pub async fn scroll_forward(&self) -> Result<(), SyncError> {
        let window = self.driver.get_window_size().await?;
        let mid = (window.height / 2) as i32;
        let from = Point::new((window.width * 3 / 4) as i32, mid);
        let to = Point::new((window.width / 4) as i32, mid);
        self.swipe(from, to).await
    }

    /// Horizontal scroll, left-to-right.
    pub async fn scroll_backward(&self) -> Result<(), SyncError> {
        let window = self.driver.get_window_size().await?;
        let mid = (window.height / 2) as i32;
        let from = Point::new((window.width / 4) as i32, mid);
        let to = Point::new((window.width * 3 / 4) as i32, mid);
        self.swipe(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_adapter::{MockDriver, Size};

    #[tokio::test]
    async fn test_swipe_issues_one_gesture_and_a_settle_pause() {
        let driver = Arc::new(MockDriver::new());
        let gestures = Gestures::new(driver.clone());
        gestures
            .swipe(Point::new(50, 50), Point::new(25, 25))
            .await
            .unwrap();
        assert_eq!(driver.call_count("gesture"), 1);
        assert_eq!(driver.call_count("pause:100"), 1);
    }

    #[tokio::test]
    async fn test_scroll_to_reads_window_and_element_position() {
        let driver = Arc::new(MockDriver::new().with_window_size(Size::new(400, 800)));
        driver.add_element(driver_adapter::mock::MockElement::new("#below"));
        let gestures = Gestures::new(driver.clone());
        gestures.scroll_to(&Target::new("#below")).await.unwrap();
        let calls = driver.calls();
        assert_eq!(
            calls,
            vec!["window_size", "location:#below", "gesture:4", "pause:100"]
        );
    }

    #[tokio::test]
    async fn test_horizontal_scrolls_swipe_opposite_directions() {
        let driver = Arc::new(MockDriver::new());
        let gestures = Gestures::new(driver.clone());
        gestures.scroll_forward().await.unwrap();
        gestures.scroll_backward().await.unwrap();
        assert_eq!(driver.call_count("gesture"), 2);
    }
}
