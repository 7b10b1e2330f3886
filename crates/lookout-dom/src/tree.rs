//! Layout tree (arena-based allocation)
//!
//! Each node stores its offset from the parent's border box origin, its size,
//! overflow policy, scroll offset and translation. Viewport coordinates are
//! computed on demand by walking the parent chain.

use crate::{DOMRect, LayoutQuery, NodeId, Overflow};

/// Kind of layout node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
}

/// A node in the layout tree.
///
/// Structure is only changed through [`LayoutTree`], which keeps parent and
/// child links consistent and acyclic.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Offset from the parent's border box origin
    offset: (f64, f64),
    size: (f64, f64),
    overflow: Overflow,
    /// Scroll offset applied to children
    scroll: (f64, f64),
    /// `translate()` transform, applied to this node and its subtree
    translation: (f64, f64),
    /// `false` models `display: none`; no box is generated
    displayed: bool,
}

impl LayoutNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            offset: (0.0, 0.0),
            size: (0.0, 0.0),
            overflow: Overflow::Visible,
            scroll: (0.0, 0.0),
            translation: (0.0, 0.0),
            displayed: true,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn scroll(&self) -> (f64, f64) {
        self.scroll
    }

    pub fn translation(&self) -> (f64, f64) {
        self.translation
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }
}

/// Arena-based layout tree with a document node at [`NodeId::DOCUMENT`]
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    viewport: DOMRect,
}

impl LayoutTree {
    /// Create a tree containing only the document, with a viewport of the given size
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            nodes: vec![LayoutNode::new(NodeKind::Document)],
            viewport: DOMRect::from_xywh(0.0, 0.0, viewport_width, viewport_height),
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree, document included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached element box at `(x, y)` relative to its future parent
    pub fn create_element(&mut self, x: f64, y: f64, width: f64, height: f64) -> NodeId {
        let mut node = LayoutNode::new(NodeKind::Element);
        node.offset = (x, y);
        node.size = (width, height);
        self.push(node)
    }

    /// Create a detached text node
    pub fn create_text(&mut self) -> NodeId {
        self.push(LayoutNode::new(NodeKind::Text))
    }

    fn push(&mut self, node: LayoutNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_adopt(parent, child) {
            return;
        }
        self.remove(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Insert `child` into `parent` before `reference`, or at the end if
    /// `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if !self.can_adopt(parent, child) {
            return;
        }
        self.remove(child);
        if let Some(node) = self.get_mut(parent) {
            match node.children.iter().position(|&c| c == reference) {
                Some(index) => node.children.insert(index, child),
                None => node.children.push(child),
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == NodeId::DOCUMENT {
            return false;
        }
        // Refuse to create a cycle.
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                tracing::warn!("Refusing to insert {} into its own subtree", child);
                return false;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        true
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        tracing::trace!("Detached {} from {}", id, parent);
    }

    /// Move a node relative to its parent
    pub fn set_offset(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(node) = self.get_mut(id) {
            node.offset = (x, y);
        }
    }

    /// Resize a node
    pub fn set_size(&mut self, id: NodeId, width: f64, height: f64) {
        if let Some(node) = self.get_mut(id) {
            node.size = (width, height);
        }
    }

    /// Change a node's overflow policy
    pub fn set_overflow(&mut self, id: NodeId, overflow: Overflow) {
        if let Some(node) = self.get_mut(id) {
            node.overflow = overflow;
        }
    }

    /// Toggle box generation for a node (`display: none` when false)
    pub fn set_displayed(&mut self, id: NodeId, displayed: bool) {
        if let Some(node) = self.get_mut(id) {
            node.displayed = displayed;
        }
    }

    /// Set a `translate(dx, dy)` transform. Layout is unaffected; the node
    /// and its descendants are painted shifted.
    pub fn set_translation(&mut self, id: NodeId, dx: f64, dy: f64) {
        if let Some(node) = self.get_mut(id) {
            node.translation = (dx, dy);
        }
    }

    /// Scroll a container (or the document) to the given offset.
    ///
    /// Ignored for elements whose overflow does not allow scrolling.
    pub fn scroll_to(&mut self, id: NodeId, x: f64, y: f64) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        if node.kind == NodeKind::Element && !node.overflow.is_scrollable() {
            tracing::trace!("Ignoring scroll on non-scrollable {}", id);
            return;
        }
        node.scroll = (x, y);
    }

    /// Resize the viewport
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = DOMRect::from_xywh(0.0, 0.0, width, height);
    }
}

impl LayoutQuery for LayoutTree {
    fn document(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(LayoutNode::is_element)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        let target = self.get(node)?;
        if !target.displayed {
            return None;
        }
        let (mut x, mut y) = target.offset;
        let (mut dx, mut dy) = target.translation;
        let mut current = target.parent;
        // A chain longer than the arena can only be a cycle.
        for _ in 0..self.nodes.len() {
            let id = current?;
            let ancestor = self.get(id)?;
            if !ancestor.displayed {
                return None;
            }
            x += ancestor.offset.0 - ancestor.scroll.0;
            y += ancestor.offset.1 - ancestor.scroll.1;
            dx += ancestor.translation.0;
            dy += ancestor.translation.1;
            if id == NodeId::DOCUMENT {
                return Some(DOMRect::from_xywh(x, y, target.size.0, target.size.1).translate(dx, dy));
            }
            current = ancestor.parent;
        }
        None
    }

    fn overflow(&self, node: NodeId) -> Overflow {
        self.get(node).map(|n| n.overflow).unwrap_or_default()
    }

    fn viewport(&self) -> DOMRect {
        self.viewport
    }
}
