//! Tick scheduling
//!
//! Decides when the next reconciliation pass runs. Host notifications
//! (scroll, resize, DOM mutation) are throttled: the first one schedules a
//! pass `throttle` later and further ones are folded into it. New
//! observations are checked without delay. An optional poll cadence covers
//! changes nobody reported.

use std::time::{Duration, Instant};

use crate::Config;

/// Why a pass was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickReason {
    /// Poll interval elapsed
    Poll,
    Scroll,
    Resize,
    /// DOM or style mutation
    Mutation,
    /// A target was newly observed
    Observe,
}

impl TickReason {
    /// Whether requests for this reason are held back by the throttle
    pub fn is_throttled(&self) -> bool {
        !matches!(self, TickReason::Observe)
    }
}

/// Throttled tick scheduler
#[derive(Debug, Clone)]
pub struct TickScheduler {
    throttle: Duration,
    poll_interval: Option<Duration>,
    /// Requested pass not yet run
    scheduled: Option<(Instant, TickReason)>,
    /// Poll cadence is measured from the last pass
    last_tick: Instant,
}

impl TickScheduler {
    /// Create a scheduler whose poll cadence starts at `now`
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            throttle: config.throttle,
            poll_interval: config.poll_interval,
            scheduled: None,
            last_tick: now,
        }
    }

    /// Ask for a pass.
    ///
    /// Throttled reasons are due `throttle` after the first request; later
    /// requests never postpone an already scheduled pass. Returns `true` if
    /// the schedule changed.
    pub fn request(&mut self, reason: TickReason, now: Instant) -> bool {
        let delay = if reason.is_throttled() { self.throttle } else { Duration::ZERO };
        let due = now + delay;

        match self.scheduled {
            Some((scheduled, _)) if scheduled <= due => false,
            _ => {
                self.scheduled = Some((due, reason));
                true
            }
        }
    }

    /// Ask for a pass due at the next [`take_due`](Self::take_due), whatever
    /// clock the caller drives it with.
    pub fn request_immediate(&mut self, reason: TickReason) -> bool {
        self.request(reason, self.last_tick)
    }

    /// Whether a requested pass is waiting
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Earliest instant a pass becomes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        let requested = self.scheduled.map(|(due, _)| due);
        let poll = self.poll_interval.map(|interval| self.last_tick + interval);

        match (requested, poll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Return the reason for a pass if one is due at `now`, marking it run.
    ///
    /// A requested pass wins over a poll that falls due at the same time.
    pub fn take_due(&mut self, now: Instant) -> Option<TickReason> {
        if let Some((due, reason)) = self.scheduled {
            if due <= now {
                self.scheduled = None;
                self.last_tick = now;
                return Some(reason);
            }
        }

        let interval = self.poll_interval?;
        if self.last_tick + interval <= now {
            self.last_tick = now;
            return Some(TickReason::Poll);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_scheduler() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(&Config::default(), start);

        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.take_due(start + ms(1000)), None);
    }

    #[test]
    fn test_throttle_delays_first_request() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(&Config::default(), start);

        assert!(scheduler.request(TickReason::Scroll, start));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(100)));
        assert_eq!(scheduler.take_due(start + ms(99)), None);
        assert_eq!(scheduler.take_due(start + ms(100)), Some(TickReason::Scroll));
        assert!(!scheduler.is_scheduled());
    }

    #[test]
    fn test_requests_coalesce() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(&Config::default(), start);

        scheduler.request(TickReason::Scroll, start);
        assert!(!scheduler.request(TickReason::Resize, start + ms(50)));
        assert!(!scheduler.request(TickReason::Scroll, start + ms(90)));

        assert_eq!(scheduler.take_due(start + ms(100)), Some(TickReason::Scroll));
        assert_eq!(scheduler.take_due(start + ms(150)), None);
    }

    #[test]
    fn test_observe_is_immediate() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(&Config::default(), start);

        scheduler.request(TickReason::Mutation, start);
        assert!(scheduler.request(TickReason::Observe, start + ms(10)));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(10)));
        assert_eq!(scheduler.take_due(start + ms(10)), Some(TickReason::Observe));
    }

    #[test]
    fn test_immediate_request_ignores_wall_clock() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::new(&Config::default(), start);

        scheduler.request(TickReason::Scroll, start);
        assert!(scheduler.request_immediate(TickReason::Observe));
        assert_eq!(scheduler.next_deadline(), Some(start));
        assert_eq!(scheduler.take_due(start), Some(TickReason::Observe));
    }

    #[test]
    fn test_poll_cadence() {
        let start = Instant::now();
        let config = Config::default().with_poll_interval(ms(250));
        let mut scheduler = TickScheduler::new(&config, start);

        assert_eq!(scheduler.next_deadline(), Some(start + ms(250)));
        assert_eq!(scheduler.take_due(start + ms(200)), None);
        assert_eq!(scheduler.take_due(start + ms(260)), Some(TickReason::Poll));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(510)));
    }

    #[test]
    fn test_requested_pass_resets_poll() {
        let start = Instant::now();
        let config = Config::default().with_poll_interval(ms(250));
        let mut scheduler = TickScheduler::new(&config, start);

        scheduler.request(TickReason::Resize, start + ms(100));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(200)));
        assert_eq!(scheduler.take_due(start + ms(200)), Some(TickReason::Resize));
        assert_eq!(scheduler.next_deadline(), Some(start + ms(450)));
    }
}
