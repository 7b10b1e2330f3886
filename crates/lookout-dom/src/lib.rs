//! Lookout DOM - element geometry
//!
//! Rectangles, overflow classification, and the layout query interface that
//! intersection observers read geometry through. [`LayoutTree`] is an
//! arena-backed implementation used by simple hosts and by tests.

mod geometry;
mod query;
mod tree;

pub use geometry::{DOMRect, Overflow};
pub use query::LayoutQuery;
pub use tree::{LayoutNode, LayoutTree, NodeKind};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const DOCUMENT: NodeId = NodeId(0);

    /// Build an ID from a raw index, for hosts with their own node storage
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
