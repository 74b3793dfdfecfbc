//! Engine errors.
//!
//! Everything the engine can refuse or abort is an [`EngineError`]. Whether a
//! variant is fatal for the running render pass is decided by the engine and
//! [`EngineConfig`](crate::config::EngineConfig); see each variant.

use thiserror::Error;

/// Errors produced by the reconciliation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A fiber was nested deeper than the configured limit.
    ///
    /// Element values are immutable, so the only way to get here is a
    /// component chain that keeps rendering itself. The work-in-progress
    /// tree is discarded; the committed tree is left as it was.
    #[error("fiber tree exceeded maximum depth {limit} (reached {depth}); cyclic component chain?")]
    CyclicTreeDetected { depth: usize, limit: usize },

    /// A host element tag the adapter cannot realize (empty or containing
    /// whitespace). Only returned when strict element types are enabled,
    /// otherwise the subtree is skipped with a warning.
    #[error("unsupported element type {tag:?}")]
    UnsupportedElementType { tag: String },

    /// `render` or `update` was called while a previous pass was still in
    /// progress and the engine is configured to reject that.
    #[error("render requested while a work-in-progress tree is pending")]
    ConcurrentRenderAttempted,

    /// `update` was called before any tree was committed.
    #[error("no committed tree to re-render")]
    NoCurrentTree,

    /// The engine was stopped and accepts no further work.
    #[error("engine has been stopped")]
    Stopped,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
