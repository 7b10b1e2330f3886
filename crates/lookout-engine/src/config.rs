//! Engine Configuration

use std::time::Duration;

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Recompute on a fixed cadence even without notifications.
    /// `None` disables polling.
    pub poll_interval: Option<Duration>,

    /// Minimum delay between a scroll/resize/mutation notification and the
    /// pass it triggers. Notifications inside the window are coalesced.
    pub throttle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: None,
            throttle: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Enable polling every `interval`
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }
}
