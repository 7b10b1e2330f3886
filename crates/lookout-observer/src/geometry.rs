//! Intersection geometry
//!
//! Measures a target against an observer's root: the target's border box is
//! clipped by every clipping ancestor up to the root, then intersected with
//! the margin-expanded root bounds.

use std::collections::HashSet;

use lookout_dom::{DOMRect, LayoutQuery, NodeId};

use crate::config::{ObserverConfig, Root};

/// Result of measuring one target against one observer root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionGeometry {
    /// Unclipped target rect, empty when the target has no box
    pub bounding_client_rect: DOMRect,
    /// Margin-expanded root rect, empty when the root has no box
    pub root_bounds: DOMRect,
    /// Clipped visible part of the target, possibly zero-area
    pub intersection_rect: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

/// Measure `target` against the root described by `config`.
///
/// Detached targets, detached roots and targets outside the root's subtree
/// all come back as not intersecting with ratio 0.
pub fn compute_intersection<L: LayoutQuery + ?Sized>(
    layout: &L,
    config: &ObserverConfig,
    target: NodeId,
) -> IntersectionGeometry {
    let (root_node, root_bounds) = root_bounds(layout, config);
    let target_rect = layout.bounding_client_rect(target);

    let intersection = match (target_rect, root_bounds) {
        (Some(rect), Some(bounds)) => clip_to_root(layout, root_node, target, rect, &bounds),
        _ => None,
    };

    let bounding_client_rect = target_rect.unwrap_or_default();
    let target_area = bounding_client_rect.area();
    let intersection_ratio = match intersection {
        Some(rect) if target_area > 0.0 => (rect.area() / target_area).clamp(0.0, 1.0),
        _ => 0.0,
    };

    IntersectionGeometry {
        bounding_client_rect,
        root_bounds: root_bounds.unwrap_or_default(),
        intersection_rect: intersection.unwrap_or_default(),
        intersection_ratio,
        is_intersecting: intersection.is_some(),
    }
}

/// Root node the ancestor walk stops at, and the effective root rect.
fn root_bounds<L: LayoutQuery + ?Sized>(layout: &L, config: &ObserverConfig) -> (NodeId, Option<DOMRect>) {
    let (node, rect) = match config.root() {
        Root::Viewport => (layout.document(), Some(layout.viewport())),
        Root::Element(node) => (node, layout.bounding_client_rect(node)),
    };
    (node, rect.map(|rect| config.margin().apply(&rect)))
}

/// Walk from `target` up to `root`, narrowing `rect` by every clipping
/// ancestor, then intersect with the root bounds.
///
/// Returns `None` when the rect is clipped away, falls outside the root
/// bounds, or the walk never reaches `root` (including parent chains that
/// cycle without passing through it).
fn clip_to_root<L: LayoutQuery + ?Sized>(
    layout: &L,
    root: NodeId,
    target: NodeId,
    mut rect: DOMRect,
    root_bounds: &DOMRect,
) -> Option<DOMRect> {
    if target == root {
        return rect.intersection(root_bounds);
    }

    let mut seen = HashSet::from([target]);
    let mut current = layout.parent(target);
    while let Some(node) = current {
        if node == root {
            return rect.intersection(root_bounds);
        }
        if !seen.insert(node) {
            tracing::warn!("Parent chain of {} loops at {}", target, node);
            return None;
        }
        if layout.overflow(node).clips() {
            let clip = layout.clip_rect(node)?;
            rect = rect.intersection(&clip)?;
        }
        current = layout.parent(node);
    }

    // Not a descendant of the root.
    None
}
