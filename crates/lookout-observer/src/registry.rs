//! Observer registry and reconciliation
//!
//! The [`Registry`] owns the layout collaborator and every observer. One
//! [`Registry::tick`] runs a reconciliation pass over all live observers and
//! then dispatches each observer's queued entries to its callback.

use std::collections::HashMap;
use std::fmt;

use lookout_dom::{LayoutQuery, NodeId};

use crate::config::{ObserverConfig, ObserverInit};
use crate::crossing::TargetState;
use crate::geometry::compute_intersection;
use crate::queue::RecordQueue;
use crate::{IntersectionEntry, ObserverError, Result};

/// Observer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Delivery handler: receives the batch and a handle to its observer
pub type Callback<L> = Box<dyn FnMut(&[IntersectionEntry], &mut Observer<'_, L>)>;

struct ObserverSlot<L> {
    config: ObserverConfig,
    /// Taken out while the callback runs
    callback: Option<Callback<L>>,
    /// Watched targets in registration order
    targets: Vec<(NodeId, TargetState)>,
    queue: RecordQueue,
}

impl<L> fmt::Debug for ObserverSlot<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("config", &self.config)
            .field("targets", &self.targets)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

/// Holds all observers and drives reconciliation passes
pub struct Registry<L> {
    layout: L,
    observers: HashMap<ObserverId, ObserverSlot<L>>,
    /// Observers taking part in reconciliation, in registration order
    live: Vec<ObserverId>,
    /// Observers with entries queued during the last pass
    pending: Vec<ObserverId>,
    next_id: u64,
}

impl<L: fmt::Debug> fmt::Debug for Registry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("layout", &self.layout)
            .field("observers", &self.observers)
            .field("live", &self.live)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<L: LayoutQuery> Registry<L> {
    /// Create an empty registry reading geometry from `layout`
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            observers: HashMap::new(),
            live: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Mutable access for hosts that own their layout through the registry
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    /// Create an observer.
    ///
    /// The observer joins reconciliation when it first observes a target.
    pub fn create<F>(&mut self, callback: F, init: ObserverInit) -> Result<ObserverId>
    where
        F: FnMut(&[IntersectionEntry], &mut Observer<'_, L>) + 'static,
    {
        let config = ObserverConfig::parse(init, &self.layout)?;
        let id = ObserverId(self.next_id);
        self.next_id += 1;

        tracing::debug!(
            "Created observer {} (root {:?}, margin {}, thresholds {:?})",
            id,
            config.root(),
            config.root_margin(),
            config.thresholds()
        );
        self.observers.insert(
            id,
            ObserverSlot {
                config,
                callback: Some(Box::new(callback)),
                targets: Vec::new(),
                queue: RecordQueue::new(),
            },
        );
        Ok(id)
    }

    /// Start watching `target`. Takes effect at the next pass.
    ///
    /// Watching a target twice is a no-op. A disconnected observer rejoins
    /// the registry.
    pub fn observe(&mut self, id: ObserverId, target: NodeId) -> Result<()> {
        let slot = self.observers.get_mut(&id).ok_or(ObserverError::UnknownObserver(id))?;
        if !self.layout.is_element(target) {
            return Err(ObserverError::InvalidTarget(target));
        }

        if !slot.targets.iter().any(|(t, _)| *t == target) {
            slot.targets.push((target, TargetState::default()));
            tracing::debug!("Observer {} watching {}", id, target);
        }
        if !self.live.contains(&id) {
            self.live.push(id);
        }
        Ok(())
    }

    /// Stop watching `target`, discarding its state. No-op if not watched.
    pub fn unobserve(&mut self, id: ObserverId, target: NodeId) {
        if let Some(slot) = self.observers.get_mut(&id) {
            let before = slot.targets.len();
            slot.targets.retain(|(t, _)| *t != target);
            if slot.targets.len() != before {
                tracing::debug!("Observer {} stopped watching {}", id, target);
            }
        }
    }

    /// Drop every target and queued entry and leave the registry.
    /// Any scheduled delivery is cancelled. Idempotent.
    pub fn disconnect(&mut self, id: ObserverId) {
        if let Some(slot) = self.observers.get_mut(&id) {
            slot.targets.clear();
            slot.queue.clear();
        }
        let before = self.live.len();
        self.live.retain(|&live| live != id);
        self.pending.retain(|&pending| pending != id);
        if self.live.len() != before {
            tracing::debug!("Disconnected observer {}", id);
        }
    }

    /// Disconnect and forget an observer entirely
    pub fn release(&mut self, id: ObserverId) {
        self.disconnect(id);
        if self.observers.remove(&id).is_some() {
            tracing::debug!("Released observer {}", id);
        }
    }

    /// Return and clear the observer's queued entries without waiting for
    /// delivery
    pub fn take_records(&mut self, id: ObserverId) -> Vec<IntersectionEntry> {
        self.observers.get_mut(&id).map(|slot| slot.queue.take()).unwrap_or_default()
    }

    /// Validated configuration of an observer
    pub fn config(&self, id: ObserverId) -> Option<&ObserverConfig> {
        self.observers.get(&id).map(|slot| &slot.config)
    }

    /// Targets watched by an observer, in registration order
    pub fn targets(&self, id: ObserverId) -> Vec<NodeId> {
        self.observers
            .get(&id)
            .map(|slot| slot.targets.iter().map(|(t, _)| *t).collect())
            .unwrap_or_default()
    }

    /// Whether the observer currently takes part in reconciliation
    pub fn is_live(&self, id: ObserverId) -> bool {
        self.live.contains(&id)
    }

    /// Number of observers taking part in reconciliation
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Recompute every watched target and queue entries for threshold
    /// crossings. Observers whose queue grew are scheduled for delivery.
    ///
    /// Returns the number of entries queued.
    pub fn reconcile(&mut self, time: f64) -> usize {
        let Self { layout, observers, live, pending, .. } = self;
        let mut queued = 0;

        for id in live.iter() {
            let Some(slot) = observers.get_mut(id) else {
                continue;
            };
            let before = slot.queue.len();

            for (target, state) in slot.targets.iter_mut() {
                let geometry = compute_intersection(&*layout, &slot.config, *target);
                if state.update(&geometry, slot.config.thresholds()) {
                    tracing::trace!(
                        "Observer {} target {} crossed into {:?} (ratio {})",
                        id,
                        target,
                        state.bucket,
                        geometry.intersection_ratio
                    );
                    slot.queue.push(IntersectionEntry::new(time, *target, geometry));
                }
            }

            let added = slot.queue.len() - before;
            if added > 0 && !pending.contains(id) {
                pending.push(*id);
            }
            queued += added;
        }

        tracing::debug!("Reconciled {} observers, {} entries queued", live.len(), queued);
        queued
    }

    /// Hand each scheduled observer's queued entries to its callback.
    ///
    /// Entries queued while callbacks run wait for the next delivery.
    /// Returns the number of callbacks invoked.
    pub fn deliver(&mut self) -> usize {
        let scheduled = std::mem::take(&mut self.pending);
        let mut delivered = 0;

        for id in scheduled {
            let Some(slot) = self.observers.get_mut(&id) else {
                continue;
            };
            // Drained by take_records since the pass.
            if slot.queue.is_empty() {
                continue;
            }
            let Some(mut callback) = slot.callback.take() else {
                continue;
            };
            let entries = slot.queue.take();
            let config = slot.config.clone();

            tracing::debug!("Delivering {} entries to observer {}", entries.len(), id);
            callback(&entries, &mut Observer { registry: &mut *self, id, config });
            delivered += 1;

            if let Some(slot) = self.observers.get_mut(&id) {
                if slot.callback.is_none() {
                    slot.callback = Some(callback);
                }
            }
        }

        delivered
    }

    /// Run one reconciliation pass and deliver its results
    pub fn tick(&mut self, time: f64) -> usize {
        self.reconcile(time);
        self.deliver()
    }
}

/// Handle passed to callbacks for the observer being delivered to
pub struct Observer<'a, L> {
    registry: &'a mut Registry<L>,
    id: ObserverId,
    config: ObserverConfig,
}

impl<L: LayoutQuery> Observer<'_, L> {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn root(&self) -> crate::Root {
        self.config.root()
    }

    pub fn root_margin(&self) -> String {
        self.config.root_margin()
    }

    pub fn thresholds(&self) -> &[f64] {
        self.config.thresholds()
    }

    /// Read-only view of the layout
    pub fn layout(&self) -> &L {
        self.registry.layout()
    }

    pub fn observe(&mut self, target: NodeId) -> Result<()> {
        self.registry.observe(self.id, target)
    }

    pub fn unobserve(&mut self, target: NodeId) {
        self.registry.unobserve(self.id, target)
    }

    pub fn disconnect(&mut self) {
        self.registry.disconnect(self.id)
    }

    pub fn take_records(&mut self) -> Vec<IntersectionEntry> {
        self.registry.take_records(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_dom::LayoutTree;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<IntersectionEntry>>>>;

    fn recording(log: &Log) -> impl FnMut(&[IntersectionEntry], &mut Observer<'_, LayoutTree>) + 'static {
        let log = Rc::clone(log);
        move |entries, _| log.borrow_mut().push(entries.to_vec())
    }

    fn setup() -> (Registry<LayoutTree>, NodeId, NodeId) {
        let mut tree = LayoutTree::new(800.0, 600.0);
        let root = tree.create_element(0.0, 0.0, 200.0, 200.0);
        let target = tree.create_element(0.0, 0.0, 20.0, 20.0);
        tree.append_child(NodeId::DOCUMENT, root);
        tree.append_child(root, target);
        (Registry::new(tree), root, target)
    }

    #[test]
    fn test_create_and_observe() {
        let (mut registry, root, target) = setup();
        let log = Log::default();
        let id = registry.create(recording(&log), ObserverInit::default().root(root)).unwrap();

        assert!(!registry.is_live(id));
        registry.observe(id, target).unwrap();
        registry.observe(id, target).unwrap();
        assert!(registry.is_live(id));
        assert_eq!(registry.targets(id), vec![target]);

        assert_eq!(registry.tick(0.0), 1);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0][0].intersection_ratio, 1.0);
    }

    #[test]
    fn test_observe_non_element() {
        let (mut registry, _, _) = setup();
        let text = registry.layout_mut().create_text();
        let id = registry.create(|_, _| {}, ObserverInit::default()).unwrap();

        assert_eq!(registry.observe(id, text), Err(ObserverError::InvalidTarget(text)));
        assert!(registry.targets(id).is_empty());
        assert!(!registry.is_live(id));
    }

    #[test]
    fn test_released_observer() {
        let (mut registry, _, target) = setup();
        let id = registry.create(|_, _| {}, ObserverInit::default()).unwrap();
        registry.release(id);

        assert_eq!(registry.observe(id, target), Err(ObserverError::UnknownObserver(id)));
        assert!(registry.config(id).is_none());
        assert!(registry.take_records(id).is_empty());
    }

    #[test]
    fn test_reconcile_without_delivery() {
        let (mut registry, root, target) = setup();
        let log = Log::default();
        let id = registry.create(recording(&log), ObserverInit::default().root(root)).unwrap();
        registry.observe(id, target).unwrap();

        assert_eq!(registry.reconcile(5.0), 1);
        assert!(log.borrow().is_empty());

        let records = registry.take_records(id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, 5.0);
        assert_eq!(registry.deliver(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_disconnect_cancels_delivery() {
        let (mut registry, root, target) = setup();
        let log = Log::default();
        let id = registry.create(recording(&log), ObserverInit::default().root(root)).unwrap();
        registry.observe(id, target).unwrap();

        registry.reconcile(0.0);
        registry.disconnect(id);
        registry.disconnect(id);
        assert_eq!(registry.deliver(), 0);
        assert!(log.borrow().is_empty());
        assert!(!registry.is_live(id));
        assert!(registry.targets(id).is_empty());
    }

    #[test]
    fn test_observe_after_disconnect_rejoins() {
        let (mut registry, root, target) = setup();
        let log = Log::default();
        let id = registry.create(recording(&log), ObserverInit::default().root(root)).unwrap();
        registry.observe(id, target).unwrap();
        registry.tick(0.0);
        registry.disconnect(id);

        registry.observe(id, target).unwrap();
        registry.tick(1.0);
        // Fresh state: the initial crossing is reported again.
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_callback_receives_observer_handle() {
        let (mut registry, root, target) = setup();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let id = registry
            .create(
                move |_, observer| {
                    *sink.borrow_mut() = Some((observer.id(), observer.root_margin()));
                    observer.disconnect();
                },
                ObserverInit::default().root(root).root_margin("5px"),
            )
            .unwrap();
        registry.observe(id, target).unwrap();
        registry.tick(0.0);

        assert_eq!(*seen.borrow(), Some((id, "5px 5px 5px 5px".to_string())));
        assert!(!registry.is_live(id));
    }

    #[test]
    fn test_callback_survives_delivery() {
        let (mut registry, root, target) = setup();
        let log = Log::default();
        let id = registry.create(recording(&log), ObserverInit::default().root(root)).unwrap();
        registry.observe(id, target).unwrap();
        registry.tick(0.0);

        registry.layout_mut().set_offset(target, 500.0, 0.0);
        registry.tick(1.0);
        assert_eq!(log.borrow().len(), 2);
        assert!(!log.borrow()[1][0].is_intersecting);
    }
}
