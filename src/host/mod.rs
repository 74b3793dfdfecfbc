//! Host adapter contract.
//!
//! The engine never touches a platform tree directly. Every node creation and
//! mutation goes through a [`HostAdapter`], injected when the
//! [`Engine`](crate::Engine) is built. A DOM binding, a terminal renderer and
//! the in-memory [`MemoryHost`](memory::MemoryHost) used by the tests are all
//! just implementations of this trait.
//!
//! # Call order
//!
//! During work, a newly placed fiber gets `create_node` followed by
//! `set_property`/`add_listener` for each of its props. During commit,
//! placements become `append_child` on the nearest host ancestor and updates
//! become the property diff: `remove_property`/`remove_listener` first, then
//! `set_property` and `remove_listener` + `add_listener` pairs.

pub mod memory;

use std::fmt;

use crate::types::{EventHandler, PropValue};

/// What kind of host node to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// Element node with a tag name.
    Element(&'a str),
    /// Empty text node; content arrives as the `nodeValue` property.
    Text,
}

/// Capability set the engine consumes from a host platform.
pub trait HostAdapter {
    /// Handle to a host node. Cloned into every fiber that reuses the node.
    type Node: Clone + PartialEq + fmt::Debug;

    fn create_node(&mut self, kind: NodeKind<'_>) -> Self::Node;

    fn set_property(&mut self, node: &Self::Node, name: &str, value: &PropValue);

    fn remove_property(&mut self, node: &Self::Node, name: &str);

    /// Bind `handler` for `event` (already stripped of its prefix and lowercased).
    fn add_listener(&mut self, node: &Self::Node, event: &str, handler: &EventHandler);

    /// Unbind the exact `handler` previously bound for `event`.
    fn remove_listener(&mut self, node: &Self::Node, event: &str, handler: &EventHandler);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
}
