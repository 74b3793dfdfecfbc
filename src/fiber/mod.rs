//! Fiber tree - Per-generation arenas of mutable tree nodes.
//!
//! The engine keeps at most two generations alive:
//! - **current**: last committed tree, its host nodes are live
//! - **work-in-progress**: being built and diffed, not yet applied
//!
//! # Architecture
//!
//! Fibers are NOT heap objects pointing at each other. Each generation is a
//! flat arena and fibers are indices into it:
//!
//! ```text
//! FiberId(0): Root      (parent=-, child=1, sibling=-, host=container)
//! FiberId(1): div       (parent=0, child=2, sibling=-, alternate=cur#1)
//! FiberId(2): #text     (parent=1, child=-, sibling=3, alternate=cur#2)
//! FiberId(3): button    (parent=1, child=4, sibling=-, alternate=cur#3)
//! ```
//!
//! `parent`/`child`/`sibling` index into the same generation. `alternate`
//! indexes into the *other* generation (the committed one) and is only read
//! while diffing. Dropping a generation drops all of its fibers at once.

mod traverse;

pub use traverse::{Children, Preorder};

use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::element::{Component, ElementType};
use crate::types::Props;

// =============================================================================
// Fiber Id
// =============================================================================

/// Index of a fiber within its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(usize);

impl FiberId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Effect Tag
// =============================================================================

bitflags::bitflags! {
    /// Host mutation a fiber requires at commit.
    ///
    /// `DELETION` is reserved; the reconciler never produces it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EffectTag: u8 {
        const PLACEMENT = 1 << 0;
        const UPDATE = 1 << 1;
        const DELETION = 1 << 2;
    }
}

// =============================================================================
// Fiber
// =============================================================================

/// What a fiber stands for.
#[derive(Clone, Debug)]
pub enum FiberKind {
    /// Implicit root wrapping the container handed to `render`.
    Root,
    Host(Rc<str>),
    Text,
    Component(Component),
}

impl FiberKind {
    /// Whether a new element of `element_type` may reuse a fiber of this kind.
    pub fn matches(&self, element_type: &ElementType) -> bool {
        match (self, element_type) {
            (FiberKind::Host(a), ElementType::Host(b)) => a == b,
            (FiberKind::Text, ElementType::Text) => true,
            (FiberKind::Component(a), ElementType::Component(b)) => a == b,
            _ => false,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &str {
        match self {
            FiberKind::Root => "#root",
            FiberKind::Host(tag) => tag,
            FiberKind::Text => "#text",
            FiberKind::Component(c) => c.name(),
        }
    }
}

impl From<&ElementType> for FiberKind {
    fn from(element_type: &ElementType) -> Self {
        match element_type {
            ElementType::Host(tag) => FiberKind::Host(tag.clone()),
            ElementType::Text => FiberKind::Text,
            ElementType::Component(c) => FiberKind::Component(c.clone()),
        }
    }
}

/// One node of a generation. `N` is the host adapter's node handle.
#[derive(Clone, Debug)]
pub struct Fiber<N> {
    pub kind: FiberKind,
    pub props: Props,
    /// Realized host node, if any. Components never own one.
    pub host: Option<N>,
    pub parent: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    /// Counterpart in the committed generation.
    pub alternate: Option<FiberId>,
    pub effect: EffectTag,
    /// Distance from the root (root = 0).
    pub depth: usize,
}

impl<N> Fiber<N> {
    /// A fresh, unlinked fiber.
    pub fn new(kind: FiberKind, props: Props) -> Self {
        Self {
            kind,
            props,
            host: None,
            parent: None,
            child: None,
            sibling: None,
            alternate: None,
            effect: EffectTag::empty(),
            depth: 0,
        }
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Arena holding one complete fiber tree.
#[derive(Clone, Debug)]
pub struct Generation<N> {
    fibers: Vec<Fiber<N>>,
    root: FiberId,
}

impl<N> Generation<N> {
    /// Start a generation with its root fiber.
    ///
    /// # Arguments
    /// * `container` - Host node the tree renders into
    /// * `props` - Root props; its children are the rendered elements
    /// * `alternate` - Root of the committed generation, when re-rendering
    pub fn with_root(container: N, props: Props, alternate: Option<FiberId>) -> Self {
        let mut root = Fiber::new(FiberKind::Root, props);
        root.host = Some(container);
        root.alternate = alternate;
        Self {
            fibers: vec![root],
            root: FiberId(0),
        }
    }

    pub fn root(&self) -> FiberId {
        self.root
    }

    /// Number of fibers in the arena.
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id.0)
    }

    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.fibers.get_mut(id.0)
    }

    /// Add a fiber to the arena. Links are the caller's job.
    pub fn push(&mut self, fiber: Fiber<N>) -> FiberId {
        let id = FiberId(self.fibers.len());
        self.fibers.push(fiber);
        id
    }

    /// Iterate the direct children of `id` in sibling order.
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        Children::new(self, self.get(id).and_then(|f| f.child))
    }

    /// Preorder walk (child before sibling) of everything below `id`.
    pub fn descendants(&self, id: FiberId) -> Preorder<'_, N> {
        Preorder::new(self, self.get(id).and_then(|f| f.child))
    }

    /// Nearest ancestor of `id` (excluding itself) that owns a host node.
    pub fn host_parent(&self, id: FiberId) -> Option<&N> {
        let mut cursor = self.get(id)?.parent;
        while let Some(pid) = cursor {
            let fiber = self.get(pid)?;
            if let Some(host) = &fiber.host {
                return Some(host);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Next fiber in unit-of-work order after `id`.
    ///
    /// Descend to `child` if present; otherwise take the first `sibling`
    /// found walking up through `parent`. `None` once the root is reached.
    pub fn successor(&self, id: FiberId) -> Option<FiberId> {
        let fiber = self.get(id)?;
        if fiber.child.is_some() {
            return fiber.child;
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if fiber.sibling.is_some() {
                return fiber.sibling;
            }
            cursor = fiber.parent;
        }
        None
    }
}

impl<N> Index<FiberId> for Generation<N> {
    type Output = Fiber<N>;

    fn index(&self, id: FiberId) -> &Fiber<N> {
        &self.fibers[id.0]
    }
}

impl<N> IndexMut<FiberId> for Generation<N> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<N> {
        &mut self.fibers[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root
    /// ├── a
    /// │   ├── a1
    /// │   └── a2
    /// └── b
    ///     └── b1
    fn sample() -> (Generation<u32>, Vec<FiberId>) {
        let mut generation = Generation::with_root(0u32, Props::new(), None);
        let root = generation.root();
        let mut ids = vec![root];
        let add = |generation: &mut Generation<u32>, parent: FiberId, tag: &str, prev: Option<FiberId>| {
            let mut fiber = Fiber::new(FiberKind::Host(Rc::from(tag)), Props::new());
            fiber.parent = Some(parent);
            fiber.depth = generation[parent].depth + 1;
            let id = generation.push(fiber);
            match prev {
                Some(prev) => generation[prev].sibling = Some(id),
                None => generation[parent].child = Some(id),
            }
            id
        };
        let a = add(&mut generation, root, "a", None);
        let a1 = add(&mut generation, a, "a1", None);
        let a2 = add(&mut generation, a, "a2", Some(a1));
        let b = add(&mut generation, root, "b", Some(a));
        let b1 = add(&mut generation, b, "b1", None);
        ids.extend([a, a1, a2, b, b1]);
        (generation, ids)
    }

    fn names(generation: &Generation<u32>, ids: impl Iterator<Item = FiberId>) -> Vec<String> {
        ids.map(|id| generation[id].kind.name().to_string()).collect()
    }

    #[test]
    fn test_successor_order_is_depth_first() {
        let (generation, _) = sample();
        let mut order = Vec::new();
        let mut next = Some(generation.root());
        while let Some(id) = next {
            order.push(id);
            next = generation.successor(id);
        }
        assert_eq!(
            names(&generation, order.into_iter()),
            vec!["#root", "a", "a1", "a2", "b", "b1"]
        );
    }

    #[test]
    fn test_successor_of_childless_root_is_none() {
        let generation = Generation::with_root(0u32, Props::new(), None);
        assert_eq!(generation.successor(generation.root()), None);
    }

    #[test]
    fn test_descendants_preorder() {
        let (generation, _) = sample();
        assert_eq!(
            names(&generation, generation.descendants(generation.root())),
            vec!["a", "a1", "a2", "b", "b1"]
        );
    }

    #[test]
    fn test_children_iterator() {
        let (generation, ids) = sample();
        assert_eq!(names(&generation, generation.children(ids[1])), vec!["a1", "a2"]);
        assert_eq!(names(&generation, generation.children(ids[2])), Vec::<String>::new());
    }

    #[test]
    fn test_host_parent_skips_hostless_fibers() {
        let (mut generation, ids) = sample();
        generation[ids[1]].host = None;
        assert_eq!(generation.host_parent(ids[2]), Some(&0));

        generation[ids[1]].host = Some(7);
        assert_eq!(generation.host_parent(ids[2]), Some(&7));
        assert_eq!(generation.host_parent(generation.root()), None);
    }

    #[test]
    fn test_kind_matches_element_type() {
        let div = FiberKind::Host(Rc::from("div"));
        assert!(div.matches(&ElementType::from("div")));
        assert!(!div.matches(&ElementType::from("span")));
        assert!(!div.matches(&ElementType::Text));
        assert!(FiberKind::Text.matches(&ElementType::Text));
        assert!(!FiberKind::Root.matches(&ElementType::Text));
    }
}
