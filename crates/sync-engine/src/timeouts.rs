//! Shared timeout vocabulary.
//!
//! Named duration constants used as defaults throughout the engine. Callers
//! pick from the catalog instead of scattering magic numbers.

use std::time::Duration;

pub const S1: Duration = Duration::from_secs(1);
pub const S2: Duration = Duration::from_secs(2);
pub const S3: Duration = Duration::from_secs(3);
pub const S5: Duration = Duration::from_secs(5);
pub const S10: Duration = Duration::from_secs(10);
pub const S15: Duration = Duration::from_secs(15);
pub const S30: Duration = Duration::from_secs(30);
pub const S45: Duration = Duration::from_secs(45);
pub const S60: Duration = Duration::from_secs(60);
pub const S90: Duration = Duration::from_secs(90);
pub const S120: Duration = Duration::from_secs(120);
pub const S180: Duration = Duration::from_secs(180);

/// Delay between successive predicate evaluations in a wait loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default budget for a wrapped action's precondition waits.
pub const DEFAULT_ACTION_TIMEOUT: Duration = S15;

/// Cadence of position sampling in the stability detector. Deliberately a
/// separate constant: it does not track the caller-facing poll interval, and
/// the caller-supplied timeout only bounds the total wait.
pub const STATIC_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive identical position samples required before an element counts
/// as motion-settled.
pub const STATIC_REQUIRED_MATCHES: u32 = 3;

/// Settle pause issued after a touch gesture completes.
pub const GESTURE_SETTLE: Duration = Duration::from_millis(100);
