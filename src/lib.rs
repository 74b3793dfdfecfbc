//! # spark-fiber
//!
//! Incremental fiber reconciler for declarative UI trees.
//!
//! Application code describes the UI as a tree of immutable [`Element`]s.
//! The engine turns that into a tree of mutable host nodes through a
//! [`HostAdapter`], and on every re-render applies only the mutations needed
//! to match the new description.
//!
//! ## Architecture
//!
//! Work is split into one unit per fiber and driven in time slices:
//! ```text
//! render()/update() → WIP root → run_slice() × N → commit → current tree
//!                                   │
//!                   perform_unit_of_work → reconcile_children
//! ```
//!
//! Two fiber generations exist at most: the committed *current* tree and the
//! *work-in-progress* tree. Each is an arena; fibers link to each other by
//! index, and to their previous-generation counterpart through `alternate`.
//!
//! ## Modules
//!
//! - [`types`] - Props, property values, event handlers
//! - [`element`] - Elements, components, `create_element`
//! - [`fiber`] - Fiber arena, effect tags, traversal
//! - [`reconciler`] - Positional child diff and property diff
//! - [`host`] - Host adapter trait and the in-memory host
//! - [`scheduler`] - Deadlines, idle sources, the slice contract
//! - [`engine`] - Render cycle, work loop, commit
//!
//! ## Logging
//!
//! spark-fiber emits [`tracing`] events (`trace` per unit of work, `debug`
//! per pass and slice, `warn` for dropped work). Install any subscriber to
//! see them.

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod fiber;
pub mod host;
pub mod reconciler;
pub mod scheduler;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ConcurrentRenderPolicy, EngineConfig};

pub use element::{create_element, text_element, Child, Component, Element, ElementType};

pub use engine::{Cleanup, Engine, EngineHandle, RenderPhase, RenderStats};

pub use error::{EngineError, Result};

pub use fiber::{EffectTag, Fiber, FiberId, FiberKind, Generation};

pub use host::memory::{HostCall, MemoryHost, NodeId};
pub use host::{HostAdapter, NodeKind};

pub use reconciler::{diff_props, reconcile_children, PropPatch, ReconcileOutcome};

pub use scheduler::{
    Deadline, FrameIdle, IdleSource, InstantDeadline, Scheduler, StepBudget, StepSource, Unbounded,
};
