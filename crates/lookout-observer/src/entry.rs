//! Intersection entries

use lookout_dom::{DOMRect, NodeId};

use crate::geometry::IntersectionGeometry;

/// Snapshot of a target's intersection with its observer's root, taken
/// during the reconciliation pass that detected a threshold crossing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry {
    /// Milliseconds, as supplied to the pass
    pub time: f64,
    pub target: NodeId,
    pub root_bounds: DOMRect,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(time: f64, target: NodeId, geometry: IntersectionGeometry) -> Self {
        Self {
            time,
            target,
            root_bounds: geometry.root_bounds,
            bounding_client_rect: geometry.bounding_client_rect,
            intersection_rect: geometry.intersection_rect,
            intersection_ratio: geometry.intersection_ratio,
            is_intersecting: geometry.is_intersecting,
        }
    }
}
