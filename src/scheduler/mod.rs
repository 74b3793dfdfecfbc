//! Scheduler - Time-sliced cooperative execution.
//!
//! The engine does its work in slices. Each slice is handed a [`Deadline`];
//! after every unit of work the engine asks how much time is left and yields
//! once it drops below the configured threshold. Nothing inside a unit of
//! work is interruptible.
//!
//! Where slices come from is the host's business, modelled by an
//! [`IdleSource`]: a browser would wrap `requestIdleCallback`, a terminal app
//! its frame tick. [`Engine::run`](crate::Engine::run) resubmits itself to
//! the source after every slice for as long as the engine lives.
//!
//! Deterministic tests use [`StepBudget`], which counts units of work instead
//! of reading a clock.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::error::Result;

// =============================================================================
// Deadlines
// =============================================================================

/// Remaining budget of the current slice.
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

/// Wall-clock deadline.
#[derive(Debug, Clone, Copy)]
pub struct InstantDeadline {
    end: Instant,
}

impl InstantDeadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            end: Instant::now() + budget,
        }
    }

    pub fn at(end: Instant) -> Self {
        Self { end }
    }
}

impl Deadline for InstantDeadline {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }
}

/// Synthetic deadline allowing a fixed number of units of work.
///
/// Every `time_remaining` call consumes one step and reports the steps left
/// as milliseconds, so with the default 1 ms threshold a `StepBudget::new(n)`
/// slice runs exactly `n` units (at least one).
#[derive(Debug)]
pub struct StepBudget {
    remaining: Cell<u32>,
}

impl StepBudget {
    pub fn new(steps: u32) -> Self {
        Self {
            remaining: Cell::new(steps),
        }
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }
}

impl Deadline for StepBudget {
    fn time_remaining(&self) -> Duration {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        Duration::from_millis(u64::from(left))
    }
}

/// Deadline that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

// =============================================================================
// Idle Sources
// =============================================================================

/// Host primitive that hands out idle slices.
pub trait IdleSource {
    type Deadline: Deadline;

    /// Wait for the next idle period. `None` ends the loop.
    fn next_slice(&mut self) -> Option<Self::Deadline>;
}

/// Fixed-length slices separated by an idle gap, on the calling thread.
#[derive(Debug, Clone)]
pub struct FrameIdle {
    slice: Duration,
    gap: Duration,
    remaining: Option<usize>,
}

impl FrameIdle {
    /// Slices of `slice` length, sleeping `gap` before each one.
    pub fn new(slice: Duration, gap: Duration) -> Self {
        Self {
            slice,
            gap,
            remaining: None,
        }
    }

    /// Stop after `frames` slices.
    pub fn limit(mut self, frames: usize) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl IdleSource for FrameIdle {
    type Deadline = InstantDeadline;

    fn next_slice(&mut self) -> Option<InstantDeadline> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        if !self.gap.is_zero() {
            std::thread::sleep(self.gap);
        }
        Some(InstantDeadline::after(self.slice))
    }
}

/// Hands out `StepBudget`s of a fixed size, a fixed number of times.
#[derive(Debug, Clone)]
pub struct StepSource {
    steps: u32,
    slices: usize,
}

impl StepSource {
    pub fn new(steps: u32, slices: usize) -> Self {
        Self { steps, slices }
    }
}

impl IdleSource for StepSource {
    type Deadline = StepBudget;

    fn next_slice(&mut self) -> Option<StepBudget> {
        if self.slices == 0 {
            return None;
        }
        self.slices -= 1;
        Some(StepBudget::new(self.steps))
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Anything that can make progress in bounded slices.
pub trait Scheduler {
    /// Run until `deadline` is nearly spent or there is no more work.
    ///
    /// Returns whether work remains for a later slice.
    fn run_slice(&mut self, deadline: &dyn Deadline) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_budget_counts_down() {
        let budget = StepBudget::new(3);
        assert_eq!(budget.time_remaining(), Duration::from_millis(2));
        assert_eq!(budget.time_remaining(), Duration::from_millis(1));
        assert_eq!(budget.time_remaining(), Duration::ZERO);
        assert_eq!(budget.time_remaining(), Duration::ZERO);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_instant_deadline_expires() {
        let past = InstantDeadline::at(Instant::now());
        assert_eq!(past.time_remaining(), Duration::ZERO);
        let future = InstantDeadline::after(Duration::from_secs(60));
        assert!(future.time_remaining() > Duration::from_secs(1));
    }

    #[test]
    fn test_frame_idle_limit() {
        let mut source = FrameIdle::new(Duration::from_millis(5), Duration::ZERO).limit(2);
        assert!(source.next_slice().is_some());
        assert!(source.next_slice().is_some());
        assert!(source.next_slice().is_none());
    }

    #[test]
    fn test_step_source() {
        let mut source = StepSource::new(4, 1);
        let slice = source.next_slice();
        assert_eq!(slice.map(|s| s.remaining()), Some(4));
        assert!(source.next_slice().is_none());
    }
}
