//! Engine - Main entry point

use std::time::{Duration, Instant};

use lookout_dom::{LayoutQuery, NodeId};
use lookout_observer::{
    IntersectionEntry, Observer, ObserverConfig, ObserverId, ObserverInit, Registry, Result,
};

use crate::{Config, TickReason, TickScheduler};

/// Observer registry paired with a tick scheduler
pub struct Engine<L> {
    config: Config,
    registry: Registry<L>,
    scheduler: TickScheduler,
    started: Instant,
}

impl<L: LayoutQuery> Engine<L> {
    /// Create an engine over `layout`; entry times count from now
    pub fn new(layout: L, config: Config) -> Self {
        Self::with_start(layout, config, Instant::now())
    }

    /// Create an engine whose clock starts at `started`
    pub fn with_start(layout: L, config: Config, started: Instant) -> Self {
        tracing::info!(
            "Lookout Engine {} initialized (poll {:?}, throttle {:?})",
            crate::VERSION,
            config.poll_interval,
            config.throttle
        );
        Self {
            scheduler: TickScheduler::new(&config, started),
            registry: Registry::new(layout),
            config,
            started,
        }
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry<L> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<L> {
        &mut self.registry
    }

    pub fn layout(&self) -> &L {
        self.registry.layout()
    }

    /// Mutable layout access. Call [`Engine::notify`] afterwards so the
    /// change is picked up before the next poll.
    pub fn layout_mut(&mut self) -> &mut L {
        self.registry.layout_mut()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn create<F>(&mut self, callback: F, init: ObserverInit) -> Result<ObserverId>
    where
        F: FnMut(&[IntersectionEntry], &mut Observer<'_, L>) + 'static,
    {
        self.registry.create(callback, init)
    }

    /// Watch `target` and schedule an immediate pass
    pub fn observe(&mut self, id: ObserverId, target: NodeId) -> Result<()> {
        self.registry.observe(id, target)?;
        self.scheduler.request_immediate(TickReason::Observe);
        Ok(())
    }

    pub fn unobserve(&mut self, id: ObserverId, target: NodeId) {
        self.registry.unobserve(id, target)
    }

    pub fn disconnect(&mut self, id: ObserverId) {
        self.registry.disconnect(id)
    }

    pub fn release(&mut self, id: ObserverId) {
        self.registry.release(id)
    }

    pub fn take_records(&mut self, id: ObserverId) -> Vec<IntersectionEntry> {
        self.registry.take_records(id)
    }

    pub fn observer_config(&self, id: ObserverId) -> Option<&ObserverConfig> {
        self.registry.config(id)
    }

    /// Report a host event (scroll, resize, mutation) at `now`
    pub fn notify(&mut self, reason: TickReason, now: Instant) {
        if self.scheduler.request(reason, now) {
            tracing::trace!("Tick requested: {:?}", reason);
        }
    }

    /// Milliseconds between engine start and `now`
    pub fn timestamp(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64() * 1000.0
    }

    /// Run a pass if one is due at `now`.
    ///
    /// Returns the number of callbacks invoked, or `None` when nothing was due.
    pub fn advance(&mut self, now: Instant) -> Option<usize> {
        let reason = self.scheduler.take_due(now)?;
        let time = self.timestamp(now);
        let delivered = self.registry.tick(time);
        tracing::debug!("Tick ({:?}) at {:.1}ms delivered to {} observers", reason, time, delivered);
        Some(delivered)
    }

    /// Drive the engine for `duration`, sleeping until each due pass.
    ///
    /// Returns the number of passes run.
    pub async fn run_for(&mut self, duration: Duration) -> usize {
        let end = Instant::now() + duration;
        let mut passes = 0;

        loop {
            let now = Instant::now();
            if self.advance(now).is_some() {
                passes += 1;
            }
            if now >= end {
                break;
            }
            let wake = self.scheduler.next_deadline().map_or(end, |due| due.min(end));
            smol::Timer::at(wake).await;
        }

        passes
    }
}
