//! Elements - Immutable descriptions of the UI tree.
//!
//! Application code builds a fresh element tree on every render; the engine
//! consumes it immediately and keeps nothing but the props it copied into
//! fibers.
//!
//! # Example
//!
//! ```ignore
//! use spark_fiber::{create_element, Child, Props};
//!
//! let tree = create_element(
//!     "div",
//!     Props::new().with("id", "root"),
//!     vec![Child::from("count: "), Child::from(0), button],
//! );
//! ```
//!
//! String and numeric children become text elements (type [`ElementType::Text`],
//! props `{ nodeValue, children: [] }`).

mod component;

pub use component::Component;

use std::rc::Rc;

use crate::types::{PropValue, Props, TEXT_VALUE_PROP};

// =============================================================================
// Element Type
// =============================================================================

/// What an element describes.
#[derive(Clone, Debug)]
pub enum ElementType {
    /// A host node with the given tag name.
    Host(Rc<str>),
    /// A host text node; its content lives in the `nodeValue` prop.
    Text,
    /// A function component rendering exactly one child element.
    Component(Component),
}

impl ElementType {
    /// Host tag name, if this is a host element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            ElementType::Host(tag) => Some(tag),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Host(tag) => tag,
            ElementType::Text => "#text",
            ElementType::Component(c) => c.name(),
        }
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementType::Host(a), ElementType::Host(b)) => a == b,
            (ElementType::Text, ElementType::Text) => true,
            (ElementType::Component(a), ElementType::Component(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        ElementType::Component(component)
    }
}

// =============================================================================
// Element
// =============================================================================

#[derive(Debug)]
struct ElementData {
    element_type: ElementType,
    props: Props,
}

/// Immutable element. Cloning is cheap (shared).
#[derive(Clone, Debug)]
pub struct Element(Rc<ElementData>);

impl Element {
    /// Build an element from a type and a complete props mapping.
    pub fn new(element_type: impl Into<ElementType>, props: Props) -> Self {
        Self(Rc::new(ElementData {
            element_type: element_type.into(),
            props,
        }))
    }

    pub fn element_type(&self) -> &ElementType {
        &self.0.element_type
    }

    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// Shorthand for `props().children()`.
    pub fn children(&self) -> &[Element] {
        self.0.props.children()
    }
}

// =============================================================================
// Children
// =============================================================================

/// A child passed to [`create_element`]: either an element or a primitive
/// that becomes a text element.
#[derive(Clone, Debug)]
pub enum Child {
    Element(Element),
    Text(PropValue),
}

impl Child {
    fn into_element(self) -> Element {
        match self {
            Child::Element(element) => element,
            Child::Text(value) => text_element(value),
        }
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(PropValue::from(text))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(PropValue::from(text))
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Text(PropValue::from(value))
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Text(PropValue::from(value))
    }
}

impl From<u32> for Child {
    fn from(value: u32) -> Self {
        Child::Text(PropValue::from(value))
    }
}

impl From<usize> for Child {
    fn from(value: usize) -> Self {
        Child::Text(PropValue::from(value))
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Text(PropValue::from(value))
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Create an element.
///
/// # Arguments
///
/// * `element_type` - Host tag (`"div"`), or a [`Component`]
/// * `props` - Property values; any `children` entry is ignored
/// * `children` - Ordered children; strings and numbers become text elements
pub fn create_element(
    element_type: impl Into<ElementType>,
    mut props: Props,
    children: impl IntoIterator<Item = Child>,
) -> Element {
    props.set_children(children.into_iter().map(Child::into_element).collect());
    Element::new(element_type, props)
}

/// Create a text element holding `value` in its `nodeValue` prop.
pub fn text_element(value: impl Into<PropValue>) -> Element {
    Element::new(ElementType::Text, Props::new().with(TEXT_VALUE_PROP, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(_props: &Props) -> Element {
        create_element("span", Props::new(), vec![])
    }

    #[test]
    fn test_primitive_children_become_text() {
        let el = create_element(
            "div",
            Props::new().with("id", "root"),
            vec![Child::from("count: "), Child::from(3)],
        );

        assert_eq!(el.element_type().tag(), Some("div"));
        assert_eq!(el.children().len(), 2);
        for child in el.children() {
            assert_eq!(child.element_type(), &ElementType::Text);
            assert!(child.children().is_empty());
        }
        assert_eq!(
            el.children()[0].props().get(TEXT_VALUE_PROP),
            Some(&PropValue::from("count: "))
        );
        assert_eq!(
            el.children()[1].props().get(TEXT_VALUE_PROP),
            Some(&PropValue::from(3))
        );
    }

    #[test]
    fn test_element_children_kept_in_order() {
        let a = create_element("a", Props::new(), vec![]);
        let b = create_element("b", Props::new(), vec![]);
        let parent = create_element("p", Props::new(), vec![a.into(), b.into()]);
        let tags: Vec<_> = parent
            .children()
            .iter()
            .map(|c| c.element_type().name().to_string())
            .collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_type_equality() {
        assert_eq!(ElementType::from("div"), ElementType::from("div".to_string()));
        assert_ne!(ElementType::from("div"), ElementType::from("span"));
        assert_ne!(ElementType::from("div"), ElementType::Text);

        let c1 = ElementType::from(Component::new("Empty", empty));
        let c2 = ElementType::from(Component::new("Empty", empty));
        assert_eq!(c1, c2);
        assert_ne!(c1, ElementType::from("Empty"));
    }
}
