//! Threshold crossing detection

use crate::geometry::IntersectionGeometry;
use crate::threshold::bucket_index;

/// Last reported observation of one target by one observer.
///
/// A bucket of `None` means "not intersecting, or below every threshold";
/// every target starts there, so the first observation only reports if it
/// lands in a real bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetState {
    pub is_intersecting: bool,
    pub bucket: Option<usize>,
}

impl TargetState {
    /// Record `geometry` and report whether it moved the target into a
    /// different threshold bucket.
    pub fn update(&mut self, geometry: &IntersectionGeometry, thresholds: &[f64]) -> bool {
        let bucket = bucket_index(thresholds, geometry.intersection_ratio, geometry.is_intersecting);
        if bucket == self.bucket {
            return false;
        }
        self.bucket = bucket;
        self.is_intersecting = geometry.is_intersecting;
        true
    }
}
