//! Double-tap detection for touch devices.

use web_time::{Duration, Instant};

/// Two taps strictly closer together than this form a double-click.
/// Fixed design constant, not configurable.
const DOUBLE_TAP_THRESHOLD: Duration = Duration::from_millis(500);

/// Multi-tap state machine.
///
/// Touch hosts have no native double-click; the session feeds every
/// touch-start through here and treats a recognized double-tap exactly
/// like a desktop double-click.
pub struct TapTracker {
    last_tap: Option<Instant>,
}

impl TapTracker {
    /// Create a tracker with no pending tap.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_tap: None }
    }

    /// Register a tap now. Returns `true` when it completes a double-tap.
    pub fn tap(&mut self) -> bool {
        self.tap_at(Instant::now())
    }

    /// Register a tap at an explicit time (deterministic testing).
    ///
    /// A recognized double-tap clears the pending state, so a third tap
    /// starts a fresh sequence instead of chaining.
    pub fn tap_at(&mut self, at: Instant) -> bool {
        let is_double = self
            .last_tap
            .is_some_and(|last| {
                at.saturating_duration_since(last) < DOUBLE_TAP_THRESHOLD
            });
        self.last_tap = if is_double { None } else { Some(at) };
        is_double
    }
}

impl Default for TapTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_second_tap_is_a_double() {
        let mut tracker = TapTracker::new();
        let start = Instant::now();
        assert!(!tracker.tap_at(start));
        assert!(tracker.tap_at(start + Duration::from_millis(499)));
    }

    #[test]
    fn slow_second_tap_is_not() {
        let mut tracker = TapTracker::new();
        let start = Instant::now();
        assert!(!tracker.tap_at(start));
        assert!(!tracker.tap_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn third_tap_starts_a_fresh_sequence() {
        let mut tracker = TapTracker::new();
        let start = Instant::now();
        let step = Duration::from_millis(100);
        assert!(!tracker.tap_at(start));
        assert!(tracker.tap_at(start + step));
        // The double consumed the pending tap.
        assert!(!tracker.tap_at(start + step * 2));
    }
}
