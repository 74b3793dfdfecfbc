//! In-memory host - A headless node tree that records every adapter call.
//!
//! `MemoryHost` is a cheap, cloneable handle onto shared state, so a test or
//! an app can keep one clone for inspection and event dispatch while the
//! engine owns another.
//!
//! # Example
//!
//! ```ignore
//! let host = MemoryHost::new();
//! let container = host.create_container("root");
//! let mut engine = Engine::new(host.clone(), EngineConfig::default());
//!
//! engine.render(app(), container)?;
//! engine.run_until_idle()?;
//!
//! assert_eq!(host.to_markup(container), "<root><div>hello</div></root>");
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use super::{HostAdapter, NodeKind};
use crate::types::{Event, EventHandler, PropValue, TEXT_VALUE_PROP};

// =============================================================================
// Types
// =============================================================================

/// Handle to a node of a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create { node: NodeId, kind: String },
    SetProperty { node: NodeId, name: String, value: PropValue },
    RemoveProperty { node: NodeId, name: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    AppendChild { parent: NodeId, child: NodeId },
}

impl HostCall {
    /// Calls that create or restructure nodes, as opposed to property traffic.
    pub fn is_structural(&self) -> bool {
        matches!(self, HostCall::Create { .. } | HostCall::AppendChild { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemoryNodeKind {
    Element(String),
    Text,
}

#[derive(Debug)]
struct MemoryNode {
    kind: MemoryNodeKind,
    props: BTreeMap<String, PropValue>,
    listeners: Vec<(String, EventHandler)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MemoryNode {
    fn new(kind: MemoryNodeKind) -> Self {
        Self {
            kind,
            props: BTreeMap::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryTree {
    nodes: Vec<MemoryNode>,
    calls: Vec<HostCall>,
}

impl MemoryTree {
    fn alloc(&mut self, kind: MemoryNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode::new(kind));
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        let node = self.nodes.get_mut(id.0);
        if node.is_none() {
            tracing::warn!(node = id.0, "memory host: unknown node handle");
        }
        node
    }
}

// =============================================================================
// Memory Host
// =============================================================================

/// Headless host tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    tree: Rc<RefCell<MemoryTree>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to render into. Not recorded as a call.
    pub fn create_container(&self, tag: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .alloc(MemoryNodeKind::Element(tag.to_string()))
    }

    /// Total nodes ever created, containers included.
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    /// Tag of an element node; `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<String> {
        match &self.tree.borrow().nodes.get(id.0)?.kind {
            MemoryNodeKind::Element(tag) => Some(tag.clone()),
            MemoryNodeKind::Text => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.tree
            .borrow()
            .nodes
            .get(id.0)
            .is_some_and(|n| n.kind == MemoryNodeKind::Text)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(id.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.borrow().nodes.get(id.0)?.parent
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<PropValue> {
        self.tree.borrow().nodes.get(id.0)?.props.get(name).cloned()
    }

    /// Rendered content of a text node.
    pub fn text(&self, id: NodeId) -> Option<String> {
        if !self.is_text(id) {
            return None;
        }
        Some(
            self.property(id, TEXT_VALUE_PROP)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        )
    }

    /// Handlers currently bound for `event`, in binding order.
    pub fn listeners(&self, id: NodeId, event: &str) -> Vec<EventHandler> {
        self.tree
            .borrow()
            .nodes
            .get(id.0)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|(e, _)| e == event)
                    .map(|(_, h)| h.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Invoke every handler bound for `event` on `id`. Returns how many ran.
    ///
    /// Handlers run after the tree borrow is released, so they are free to
    /// request re-renders or inspect the host.
    pub fn dispatch(&self, id: NodeId, event: &str) -> usize {
        let handlers = self.listeners(id, event);
        let payload = Event::new(event);
        for handler in &handlers {
            handler.call(&payload);
        }
        handlers.len()
    }

    /// First element with `tag` in preorder below (and including) `root`.
    pub fn find_element(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = tree.nodes.get(id.0)?;
            if node.kind == MemoryNodeKind::Element(tag.to_string()) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Snapshot of recorded calls.
    pub fn calls(&self) -> Vec<HostCall> {
        self.tree.borrow().calls.clone()
    }

    /// Drain recorded calls.
    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.tree.borrow_mut().calls)
    }

    /// Serialize the subtree at `id` as markup. Handlers are omitted.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let (tag, children) = {
            let tree = self.tree.borrow();
            let Some(node) = tree.nodes.get(id.0) else {
                return;
            };
            match &node.kind {
                MemoryNodeKind::Text => {
                    if let Some(value) = node.props.get(TEXT_VALUE_PROP) {
                        let _ = write!(out, "{value}");
                    }
                    return;
                }
                MemoryNodeKind::Element(tag) => {
                    let _ = write!(out, "<{tag}");
                    for (name, value) in &node.props {
                        if value.as_handler().is_none() {
                            let _ = write!(out, " {name}=\"{value}\"");
                        }
                    }
                    out.push('>');
                    (tag.clone(), node.children.clone())
                }
            }
        };
        for child in children {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

impl HostAdapter for MemoryHost {
    type Node = NodeId;

    fn create_node(&mut self, kind: NodeKind<'_>) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let (kind, label) = match kind {
            NodeKind::Element(tag) => (MemoryNodeKind::Element(tag.to_string()), tag.to_string()),
            NodeKind::Text => (MemoryNodeKind::Text, "#text".to_string()),
        };
        let node = tree.alloc(kind);
        tree.calls.push(HostCall::Create { node, kind: label });
        node
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: &PropValue) {
        let mut tree = self.tree.borrow_mut();
        if let Some(n) = tree.node_mut(*node) {
            n.props.insert(name.to_string(), value.clone());
        }
        tree.calls.push(HostCall::SetProperty {
            node: *node,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn remove_property(&mut self, node: &NodeId, name: &str) {
        let mut tree = self.tree.borrow_mut();
        if let Some(n) = tree.node_mut(*node) {
            n.props.remove(name);
        }
        tree.calls.push(HostCall::RemoveProperty {
            node: *node,
            name: name.to_string(),
        });
    }

    fn add_listener(&mut self, node: &NodeId, event: &str, handler: &EventHandler) {
        let mut tree = self.tree.borrow_mut();
        if let Some(n) = tree.node_mut(*node) {
            n.listeners.push((event.to_string(), handler.clone()));
        }
        tree.calls.push(HostCall::AddListener {
            node: *node,
            event: event.to_string(),
        });
    }

    fn remove_listener(&mut self, node: &NodeId, event: &str, handler: &EventHandler) {
        let mut tree = self.tree.borrow_mut();
        if let Some(n) = tree.node_mut(*node) {
            if let Some(pos) = n
                .listeners
                .iter()
                .position(|(e, h)| e == event && h.ptr_eq(handler))
            {
                n.listeners.remove(pos);
            }
        }
        tree.calls.push(HostCall::RemoveListener {
            node: *node,
            event: event.to_string(),
        });
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        // Appending an attached node moves it.
        let old_parent = tree.nodes.get(child.0).and_then(|n| n.parent);
        if let Some(old) = old_parent.and_then(|p| tree.node_mut(p)) {
            old.children.retain(|c| c != child);
        }
        if let Some(n) = tree.node_mut(*child) {
            n.parent = Some(*parent);
        }
        if let Some(p) = tree.node_mut(*parent) {
            p.children.push(*child);
        }
        tree.calls.push(HostCall::AppendChild {
            parent: *parent,
            child: *child,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_build_and_serialize() {
        let mut host = MemoryHost::new();
        let root = host.create_container("root");
        let div = host.create_node(NodeKind::Element("div"));
        host.set_property(&div, "id", &PropValue::from("main"));
        let text = host.create_node(NodeKind::Text);
        host.set_property(&text, TEXT_VALUE_PROP, &PropValue::from(42));
        host.append_child(&div, &text);
        host.append_child(&root, &div);

        assert_eq!(host.to_markup(root), "<root><div id=\"main\">42</div></root>");
        assert_eq!(host.text(text), Some("42".to_string()));
        assert_eq!(host.parent(div), Some(root));
        assert_eq!(host.tag(div), Some("div".to_string()));
        assert_eq!(host.find_element(root, "div"), Some(div));
    }

    #[test]
    fn test_calls_recorded_except_container() {
        let mut host = MemoryHost::new();
        let root = host.create_container("root");
        let node = host.create_node(NodeKind::Element("p"));
        host.append_child(&root, &node);

        let calls = host.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(HostCall::is_structural));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut host = MemoryHost::new();
        let a = host.create_container("a");
        let b = host.create_container("b");
        let child = host.create_node(NodeKind::Element("c"));
        host.append_child(&a, &child);
        host.append_child(&b, &child);
        assert!(host.children(a).is_empty());
        assert_eq!(host.children(b), vec![child]);
    }

    #[test]
    fn test_listeners_removed_by_identity() {
        let mut host = MemoryHost::new();
        let button = host.create_node(NodeKind::Element("button"));
        let hits = Rc::new(Cell::new(0));

        let hits_a = hits.clone();
        let a = EventHandler::new(move |_| hits_a.set(hits_a.get() + 1));
        let hits_b = hits.clone();
        let b = EventHandler::new(move |_| hits_b.set(hits_b.get() + 10));

        host.add_listener(&button, "click", &a);
        host.add_listener(&button, "click", &b);
        assert_eq!(host.dispatch(button, "click"), 2);
        assert_eq!(hits.get(), 11);

        host.remove_listener(&button, "click", &a);
        assert_eq!(host.dispatch(button, "click"), 1);
        assert_eq!(hits.get(), 21);
        assert_eq!(host.dispatch(button, "keydown"), 0);
    }
}
