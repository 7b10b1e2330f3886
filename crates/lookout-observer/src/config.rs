//! Observer configuration
//!
//! [`ObserverInit`] is what callers pass in; [`ObserverConfig`] is the
//! validated, canonical form an observer keeps for its whole life.

use lookout_dom::{LayoutQuery, NodeId};

use crate::margin::RootMargin;
use crate::threshold::Threshold;
use crate::ObserverError;

/// Observer construction options
#[derive(Debug, Clone)]
pub struct ObserverInit {
    /// Root element (None = viewport)
    pub root: Option<NodeId>,
    /// Root margin in CSS shorthand
    pub root_margin: String,
    /// Thresholds to report crossings of
    pub threshold: Threshold,
}

impl Default for ObserverInit {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: "0px".to_string(),
            threshold: Threshold::default(),
        }
    }
}

impl ObserverInit {
    pub fn root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = margin.into();
        self
    }

    pub fn threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.threshold = threshold.into();
        self
    }
}

/// Reference region intersections are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// The global viewport
    Viewport,
    Element(NodeId),
}

impl Root {
    /// The element, if any
    pub fn element(&self) -> Option<NodeId> {
        match self {
            Root::Viewport => None,
            Root::Element(node) => Some(*node),
        }
    }
}

/// Validated observer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    root: Root,
    root_margin: RootMargin,
    thresholds: Vec<f64>,
}

impl ObserverConfig {
    /// Validate `init` against the host layout.
    pub fn parse<L: LayoutQuery + ?Sized>(init: ObserverInit, layout: &L) -> Result<Self, ObserverError> {
        let root = match init.root {
            None => Root::Viewport,
            Some(node) if layout.is_element(node) => Root::Element(node),
            Some(node) => return Err(ObserverError::InvalidRoot(node)),
        };
        let root_margin = RootMargin::parse(&init.root_margin)?;
        let thresholds = init.threshold.normalize()?;

        Ok(Self { root, root_margin, thresholds })
    }

    pub fn root(&self) -> Root {
        self.root
    }

    /// Canonical four-component margin, e.g. `"10px 10px 10px 10px"`
    pub fn root_margin(&self) -> String {
        self.root_margin.to_string()
    }

    pub fn margin(&self) -> &RootMargin {
        &self.root_margin
    }

    /// Sorted, deduplicated thresholds; never empty
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}
