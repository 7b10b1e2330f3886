//! Pending entry queue

use crate::IntersectionEntry;

/// Append-only buffer of entries waiting for delivery
#[derive(Debug, Default)]
pub struct RecordQueue {
    records: Vec<IntersectionEntry>,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: IntersectionEntry) {
        self.records.push(entry);
    }

    /// Remove and return everything queued so far
    pub fn take(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
