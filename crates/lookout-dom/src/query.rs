//! Layout query interface
//!
//! Read-only capability that hosts implement so observers can measure
//! elements without owning or mutating the tree.

use std::collections::HashSet;

use crate::{DOMRect, NodeId, Overflow};

/// Geometry collaborator consumed by intersection observers.
pub trait LayoutQuery {
    /// The document node; ancestor walks for viewport-rooted observers end here.
    fn document(&self) -> NodeId;

    /// Whether `node` is an element that can be observed or used as a root.
    fn is_element(&self, node: NodeId) -> bool;

    /// Parent of `node`, `None` for the document node and for detached subtrees.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Border box of `node` in viewport coordinates.
    ///
    /// Returns `None` when the node is detached from the document or has not
    /// been laid out.
    fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect>;

    /// Overflow policy of `node`.
    fn overflow(&self, node: NodeId) -> Overflow;

    /// Rect that a clipping container restricts its descendants to.
    fn clip_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.bounding_client_rect(node)
    }

    /// The global viewport, used when an observer has no explicit root.
    fn viewport(&self) -> DOMRect;

    /// Whether `node` is attached to the document. A parent chain that loops
    /// back on itself is not attached.
    fn is_connected(&self, node: NodeId) -> bool {
        let document = self.document();
        let mut seen = HashSet::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == document {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.parent(id);
        }
        false
    }
}
