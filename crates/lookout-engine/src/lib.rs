//! Lookout Engine
//!
//! Drives intersection observers over a host layout: host events and new
//! observations request passes, a throttled scheduler decides when they run,
//! and an async driver sleeps between them.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use lookout_engine::{Config, Engine};
//! use lookout_engine::dom::{LayoutTree, NodeId};
//! use lookout_engine::observer::ObserverInit;
//!
//! let mut tree = LayoutTree::new(800.0, 600.0);
//! let target = tree.create_element(0.0, 0.0, 100.0, 100.0);
//! tree.append_child(NodeId::DOCUMENT, target);
//!
//! let mut engine = Engine::new(tree, Config::default());
//! let id = engine
//!     .create(|entries, _| println!("{} entries", entries.len()), ObserverInit::default())
//!     .unwrap();
//! engine.observe(id, target).unwrap();
//! smol::block_on(engine.run_for(Duration::from_millis(10)));
//! ```

mod config;
mod engine;
mod scheduler;

pub use config::Config;
pub use engine::Engine;
pub use scheduler::{TickReason, TickScheduler};

// Re-export core sub-crates
pub use lookout_dom as dom;
pub use lookout_observer as observer;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
