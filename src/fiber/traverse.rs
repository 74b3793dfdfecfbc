//! Tree traversal utilities.

use super::{FiberId, Generation};

/// An iterator over the direct children of a fiber.
///
/// Created by [`Generation::children`].
#[derive(Debug)]
pub struct Children<'a, N> {
    generation: &'a Generation<N>,
    current: Option<FiberId>,
}

impl<'a, N> Children<'a, N> {
    pub(crate) fn new(generation: &'a Generation<N>, first: Option<FiberId>) -> Self {
        Self {
            generation,
            current: first,
        }
    }
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.current?;
        self.current = self.generation.get(id).and_then(|f| f.sibling);
        Some(id)
    }
}

/// Preorder walk, child before sibling, with an explicit stack.
///
/// Created by [`Generation::descendants`]. Memory is bounded by tree width
/// along the current path rather than call-stack depth.
#[derive(Debug)]
pub struct Preorder<'a, N> {
    generation: &'a Generation<N>,
    stack: Vec<FiberId>,
}

impl<'a, N> Preorder<'a, N> {
    pub(crate) fn new(generation: &'a Generation<N>, first: Option<FiberId>) -> Self {
        Self {
            generation,
            stack: first.into_iter().collect(),
        }
    }
}

impl<N> Iterator for Preorder<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.stack.pop()?;
        if let Some(fiber) = self.generation.get(id) {
            // Sibling goes in first so the child subtree pops before it.
            if let Some(sibling) = fiber.sibling {
                self.stack.push(sibling);
            }
            if let Some(child) = fiber.child {
                self.stack.push(child);
            }
        }
        Some(id)
    }
}
