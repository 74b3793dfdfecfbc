//! Engine - Render cycle, work loop and commit.
//!
//! One [`Engine`] owns everything that changes between renders: the host
//! adapter, the committed tree, the work-in-progress tree and the next-work
//! pointer. Nothing is global; drop the engine and it is all gone.
//!
//! # Render cycle
//!
//! ```text
//!            render() / update()
//!   IDLE ─────────────────────────► WORK_IN_PROGRESS
//!    ▲                                  │  run_slice() × N
//!    │                                  ▼  (next-work drained)
//!    └───────────────────────────── COMMIT
//! ```
//!
//! - [`Engine::render`] installs a root with no alternate around a container.
//! - [`Engine::update`] installs a root whose alternate is the current root,
//!   reusing its container and children.
//! - [`Engine::run_slice`] performs units of work until the deadline runs low,
//!   and commits once nothing is left.
//!
//! The work-in-progress tree and the next-work pointer are always set and
//! cleared together; a partial tree never reaches the host.

mod commit;
mod handle;
mod work;

pub use handle::{Cleanup, EngineHandle};

use crate::config::{ConcurrentRenderPolicy, EngineConfig};
use crate::element::Element;
use crate::error::{EngineError, Result};
use crate::fiber::{FiberId, Generation};
use crate::host::HostAdapter;
use crate::scheduler::{Deadline, IdleSource, Scheduler, Unbounded};
use crate::types::Props;

// =============================================================================
// Types
// =============================================================================

/// Where the engine is in its render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    WorkInProgress,
    Commit,
}

/// Counters for one render pass, from installation to commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Units of work performed.
    pub units: usize,
    /// Host nodes created.
    pub created: usize,
    /// Host nodes appended at commit.
    pub placed: usize,
    /// Host nodes whose props were diffed at commit.
    pub updated: usize,
    /// Subtrees skipped for an unsupported element type.
    pub skipped: usize,
    /// Old fibers dropped without a deletion effect.
    pub abandoned: usize,
    /// Slices the pass took.
    pub slices: usize,
}

// =============================================================================
// Engine
// =============================================================================

/// Incremental reconciliation engine over a host adapter `H`.
pub struct Engine<H: HostAdapter> {
    host: H,
    config: EngineConfig,
    current: Option<Generation<H::Node>>,
    wip: Option<Generation<H::Node>>,
    next_unit: Option<FiberId>,
    phase: RenderPhase,
    handle: EngineHandle,
    stats: RenderStats,
    last_stats: Option<RenderStats>,
}

impl<H: HostAdapter> Engine<H> {
    /// Create an idle engine rendering through `host`.
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            current: None,
            wip: None,
            next_unit: None,
            phase: RenderPhase::Idle,
            handle: EngineHandle::default(),
            stats: RenderStats::default(),
            last_stats: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// A handle for requesting updates or stopping from event handlers.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// The last committed tree.
    pub fn current(&self) -> Option<&Generation<H::Node>> {
        self.current.as_ref()
    }

    /// The tree being built, if a pass is in progress.
    pub fn work_in_progress(&self) -> Option<&Generation<H::Node>> {
        self.wip.as_ref()
    }

    /// Counters of the most recent committed pass.
    pub fn last_stats(&self) -> Option<RenderStats> {
        self.last_stats
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    /// Whether a pass or an update request is outstanding.
    pub fn has_pending_work(&self) -> bool {
        !self.is_stopped() && (self.wip.is_some() || self.handle.update_pending())
    }

    // -------------------------------------------------------------------------
    // Triggers
    // -------------------------------------------------------------------------

    /// Render `element` into `container`.
    ///
    /// Installs a fresh work-in-progress root with no alternate; nothing
    /// touches the host until the pass is driven to completion.
    pub fn render(&mut self, element: Element, container: H::Node) -> Result<()> {
        if self.is_stopped() {
            return Err(EngineError::Stopped);
        }
        let mut props = Props::new();
        props.set_children(vec![element]);
        tracing::debug!("render installed");
        self.install(Generation::with_root(container, props, None))
    }

    /// Re-render the committed tree.
    ///
    /// The new root reuses the current root's container and children and
    /// points its alternate at the current root, so every fiber gets diffed
    /// against its previous counterpart.
    pub fn update(&mut self) -> Result<()> {
        if self.is_stopped() {
            return Err(EngineError::Stopped);
        }
        let current = self.current.as_ref().ok_or(EngineError::NoCurrentTree)?;
        let root = &current[current.root()];
        let container = root.host.clone().ok_or(EngineError::NoCurrentTree)?;
        let next = Generation::with_root(container, root.props.clone(), Some(current.root()));
        tracing::debug!(fibers = current.len(), "update installed");
        self.install(next)
    }

    fn install(&mut self, root: Generation<H::Node>) -> Result<()> {
        if let Some(pending) = &self.wip {
            match self.config.concurrent_render {
                ConcurrentRenderPolicy::Reject => return Err(EngineError::ConcurrentRenderAttempted),
                ConcurrentRenderPolicy::Replace => {
                    tracing::warn!(
                        abandoned_fibers = pending.len(),
                        "replacing pending work-in-progress tree"
                    );
                }
            }
        }
        self.next_unit = Some(root.root());
        self.wip = Some(root);
        self.phase = RenderPhase::WorkInProgress;
        self.stats = RenderStats::default();
        Ok(())
    }

    fn abandon_work(&mut self) {
        self.wip = None;
        self.next_unit = None;
        self.phase = RenderPhase::Idle;
    }

    /// Stop the engine: drop pending work and refuse new renders.
    ///
    /// The committed tree and host nodes are left as they are.
    pub fn stop(&mut self) {
        self.handle.stop();
        self.abandon_work();
        tracing::debug!("engine stopped");
    }

    // -------------------------------------------------------------------------
    // Work loop
    // -------------------------------------------------------------------------

    /// Run one slice.
    ///
    /// Picks up a requested update, performs units of work until `deadline`
    /// drops below the yield threshold, and commits when the tree is done.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if work remains for another slice.
    ///
    /// # Errors
    ///
    /// A cyclic tree (or an unsupported element type in strict mode)
    /// discards the work-in-progress tree and returns the error. The
    /// committed tree is untouched and the engine is idle again.
    pub fn run_slice(&mut self, deadline: &dyn Deadline) -> Result<bool> {
        if self.is_stopped() {
            self.abandon_work();
            return Ok(false);
        }

        if self.handle.take_update_request() {
            self.apply_update_request()?;
        }

        if self.wip.is_none() {
            return Ok(self.has_pending_work());
        }

        self.stats.slices += 1;
        let mut units = 0usize;
        while let Some(id) = self.next_unit {
            match self.perform_unit_of_work(id) {
                Ok(next) => self.next_unit = next,
                Err(err) => {
                    tracing::debug!(error = %err, "render pass aborted");
                    self.abandon_work();
                    return Err(err);
                }
            }
            units += 1;
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
        }

        if self.next_unit.is_none() {
            self.commit_root();
        } else {
            tracing::debug!(units, "slice exhausted, yielding");
        }

        Ok(self.has_pending_work())
    }

    fn apply_update_request(&mut self) -> Result<()> {
        if self.wip.is_some() && self.config.concurrent_render == ConcurrentRenderPolicy::Reject {
            // Keep it for after the pending pass commits.
            self.handle.request_update();
            return Ok(());
        }
        match self.update() {
            Err(EngineError::NoCurrentTree) => {
                tracing::debug!("update requested before first commit, ignored");
                Ok(())
            }
            other => other,
        }
    }

    /// Drive slices with no time limit until nothing is pending.
    pub fn run_until_idle(&mut self) -> Result<()> {
        while self.run_slice(&Unbounded)? {}
        Ok(())
    }

    /// Run forever on `source`, resubmitting after every slice.
    ///
    /// Returns when the engine is stopped or the source runs dry.
    pub fn run<S: IdleSource>(&mut self, mut source: S) -> Result<()> {
        while !self.is_stopped() {
            let Some(deadline) = source.next_slice() else {
                break;
            };
            self.run_slice(&deadline)?;
        }
        Ok(())
    }
}

impl<H: HostAdapter> Scheduler for Engine<H> {
    fn run_slice(&mut self, deadline: &dyn Deadline) -> Result<bool> {
        Engine::run_slice(self, deadline)
    }
}
