//! Threshold normalization and bucketing

use crate::ObserverError;

/// Threshold option as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    Single(f64),
    List(Vec<f64>),
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Single(0.0)
    }
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Threshold::Single(value)
    }
}

impl From<Vec<f64>> for Threshold {
    fn from(values: Vec<f64>) -> Self {
        Threshold::List(values)
    }
}

impl From<&[f64]> for Threshold {
    fn from(values: &[f64]) -> Self {
        Threshold::List(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Threshold {
    fn from(values: [f64; N]) -> Self {
        Threshold::List(values.to_vec())
    }
}

impl Threshold {
    /// Validate, sort ascending and deduplicate. An empty list means `[0]`.
    pub fn normalize(self) -> Result<Vec<f64>, ObserverError> {
        let mut values = match self {
            Threshold::Single(value) => vec![value],
            Threshold::List(values) => values,
        };

        if let Some(&bad) = values.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(ObserverError::InvalidThreshold(bad));
        }
        if values.is_empty() {
            values.push(0.0);
        }

        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(values)
    }
}

/// Index of the highest threshold not exceeding `ratio`, or `None` when the
/// target is not intersecting or sits below every threshold.
///
/// `thresholds` must be sorted ascending.
pub fn bucket_index(thresholds: &[f64], ratio: f64, is_intersecting: bool) -> Option<usize> {
    if !is_intersecting {
        return None;
    }
    thresholds.iter().rposition(|&t| t <= ratio)
}
