//! Engine handle - Triggering re-renders from outside the engine.
//!
//! Event handlers run inside the host, not inside the engine, so they cannot
//! borrow the engine to call [`Engine::update`](super::Engine::update).
//! Instead they hold an [`EngineHandle`] and *request* an update; the engine
//! installs it at the start of its next slice.
//!
//! # Example
//!
//! ```ignore
//! let handle = engine.handle();
//! let on_click = EventHandler::new(move |_| {
//!     count.set(count.get() + 1);
//!     handle.request_update();
//! });
//! ```

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use spark_signals::{effect, flush_sync};

/// Cleanup function returned by [`EngineHandle::watch`].
///
/// Call it to stop watching.
pub type Cleanup = Box<dyn FnOnce()>;

/// Cloneable handle onto an engine's control flags.
#[derive(Debug, Clone, Default)]
pub struct EngineHandle {
    update_requested: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Ask for a re-render of the committed tree on the next slice.
    ///
    /// Repeated requests before that slice collapse into one.
    pub fn request_update(&self) {
        self.update_requested.store(true, Ordering::SeqCst);
    }

    /// Whether an update request is waiting.
    pub fn update_pending(&self) -> bool {
        self.update_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn take_update_request(&self) -> bool {
        self.update_requested.swap(false, Ordering::SeqCst)
    }

    /// Stop the engine. Pending work is dropped on its next slice and
    /// [`Engine::run`](super::Engine::run) returns.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Request an update whenever the reactive values read by `getter` change.
    ///
    /// `getter` runs inside a spark-signals effect, so any signal it reads
    /// becomes a dependency. The first run only records dependencies and
    /// happens before this returns.
    ///
    /// # Returns
    ///
    /// A cleanup function that stops watching.
    pub fn watch<T: 'static>(&self, getter: impl Fn() -> T + 'static) -> Cleanup {
        let handle = self.clone();
        let primed = Cell::new(false);
        let stop = effect(move || {
            let _ = getter();
            if primed.replace(true) {
                handle.request_update();
            }
        });
        flush_sync();
        Box::new(stop)
    }
}
