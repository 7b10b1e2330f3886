//! Lookout Observer - intersection observation
//!
//! Reports when the visible fraction of watched elements crosses configured
//! thresholds, relative to a root element or the viewport.
//!
//! # Example
//! ```rust
//! use lookout_dom::{LayoutTree, NodeId};
//! use lookout_observer::{ObserverInit, Registry};
//!
//! let mut tree = LayoutTree::new(800.0, 600.0);
//! let target = tree.create_element(0.0, 0.0, 100.0, 100.0);
//! tree.append_child(NodeId::DOCUMENT, target);
//!
//! let mut registry = Registry::new(tree);
//! let observer = registry
//!     .create(|entries, _observer| {
//!         for entry in entries {
//!             println!("{} visible: {}", entry.target, entry.intersection_ratio);
//!         }
//!     }, ObserverInit::default().threshold([0.0, 0.5, 1.0]))
//!     .unwrap();
//! registry.observe(observer, target).unwrap();
//! registry.tick(0.0);
//! ```

mod config;
mod crossing;
mod entry;
mod error;
mod geometry;
mod margin;
mod queue;
mod registry;
mod threshold;

pub use config::{ObserverConfig, ObserverInit, Root};
pub use crossing::TargetState;
pub use entry::IntersectionEntry;
pub use error::{ObserverError, Result};
pub use geometry::{compute_intersection, IntersectionGeometry};
pub use margin::{MarginValue, RootMargin};
pub use queue::RecordQueue;
pub use registry::{Callback, Observer, ObserverId, Registry};
pub use threshold::{bucket_index, Threshold};
