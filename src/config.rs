//! Engine configuration.
//!
//! Plain struct with public fields; override what you need and fill the rest
//! from [`Default`]:
//!
//! ```ignore
//! let config = EngineConfig {
//!     concurrent_render: ConcurrentRenderPolicy::Reject,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

/// What to do when `render`/`update` is called while a pass is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrentRenderPolicy {
    /// Overwrite the pending work-in-progress root, abandoning its partial tree.
    #[default]
    Replace,
    /// Refuse with [`EngineError::ConcurrentRenderAttempted`](crate::EngineError::ConcurrentRenderAttempted).
    Reject,
}

/// Tunables for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Stop taking units of work once the slice has less than this left.
    pub yield_threshold: Duration,
    /// Property-name prefix marking an event-handler binding (`onClick` -> `click`).
    pub event_prefix: String,
    /// Deepest fiber allowed before the pass is aborted as cyclic.
    pub max_depth: usize,
    /// Behaviour of re-renders requested mid-pass.
    pub concurrent_render: ConcurrentRenderPolicy,
    /// Abort the pass on malformed host tags instead of skipping the subtree.
    pub strict_element_types: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            event_prefix: "on".to_string(),
            max_depth: 10_000,
            concurrent_render: ConcurrentRenderPolicy::Replace,
            strict_element_types: false,
        }
    }
}
