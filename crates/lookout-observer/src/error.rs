//! Observer errors

use lookout_dom::NodeId;

use crate::ObserverId;

/// Caller misuse detected while creating or driving an observer.
///
/// Every error aborts the call that raised it with no partial effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObserverError {
    #[error("root {0} must be an Element")]
    InvalidRoot(NodeId),

    #[error("rootMargin must be specified in pixels or percent: {0:?}")]
    InvalidMargin(String),

    #[error("threshold must be a number between 0 and 1: {0}")]
    InvalidThreshold(f64),

    #[error("target {0} must be an Element")]
    InvalidTarget(NodeId),

    #[error("observer {0} has been released")]
    UnknownObserver(ObserverId),
}

pub type Result<T> = std::result::Result<T, ObserverError>;
