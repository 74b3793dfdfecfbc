//! Core types for spark-fiber.
//!
//! These types define the foundation that everything builds on.
//! Property values flow from elements into fibers, get diffed by the
//! reconciler and finally reach the host adapter.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::element::Element;

/// Reserved property holding an element's ordered children.
pub const CHILDREN_PROP: &str = "children";

/// Property carrying the content of a text node.
pub const TEXT_VALUE_PROP: &str = "nodeValue";

// =============================================================================
// Events
// =============================================================================

/// Event delivered by a host to a bound handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: String,
}

impl Event {
    /// Create an event of the given kind (`"click"`, `"input"`, ...).
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// The event kind, as the host names it.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Event handler bound through a property such as `onClick`.
///
/// Hosts bind handlers by reference identity, so equality is pointer
/// equality: two handlers compare equal only if they are clones of the
/// same `Rc`.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    /// Wrap a closure as a handler.
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Whether both handlers are the same binding.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// A single property value.
#[derive(Clone, Debug)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    /// Event-handler binding. Only meaningful under an event-prefixed name.
    Handler(EventHandler),
}

impl PropValue {
    /// The handler, if this value is one.
    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// The string, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            // Integral numbers print without a fractional part, like a JS host would.
            PropValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<usize> for PropValue {
    fn from(value: usize) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Property mapping of an element or fiber.
///
/// Values are kept in name order so diffs and host calls are deterministic.
/// The reserved `children` entry is stored apart from the values and never
/// reaches the host.
#[derive(Clone, Debug, Default)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
    children: Vec<Element>,
}

impl Props {
    /// Empty props with no children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value. The reserved `children` name is ignored;
    /// use [`Props::set_children`].
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        if name == CHILDREN_PROP {
            tracing::warn!("ignoring value assigned to reserved `children` property");
            return;
        }
        self.values.insert(name, value.into());
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.remove(name)
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// Whether a value is present under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate values in name order (children excluded).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of values (children excluded).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no values (children are not counted).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The ordered child elements.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Replace the child elements.
    pub fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_handler_equality_is_identity() {
        let a = EventHandler::new(|_| {});
        let b = EventHandler::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(PropValue::from(a.clone()), PropValue::Handler(a));
    }

    #[test]
    fn test_handler_call() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let handler = EventHandler::new(move |event| {
            assert_eq!(event.kind(), "click");
            hits_clone.set(hits_clone.get() + 1);
        });
        handler.call(&Event::new("click"));
        handler.call(&Event::new("click"));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_number_display() {
        assert_eq!(PropValue::from(0).to_string(), "0");
        assert_eq!(PropValue::from(-12).to_string(), "-12");
        assert_eq!(PropValue::from(1.5).to_string(), "1.5");
        assert_eq!(PropValue::from("x").to_string(), "x");
    }

    #[test]
    fn test_mixed_kinds_never_equal() {
        assert_ne!(PropValue::from("1"), PropValue::from(1));
        assert_ne!(PropValue::from(true), PropValue::from("true"));
    }

    #[test]
    fn test_children_name_is_reserved() {
        let props = Props::new().with("id", "a").with(CHILDREN_PROP, "nope");
        assert_eq!(props.len(), 1);
        assert!(!props.contains(CHILDREN_PROP));
        assert!(props.children().is_empty());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let props: Props = [("b", 2), ("a", 1), ("c", 3)].into_iter().collect();
        let names: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
