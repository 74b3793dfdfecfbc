//! Function components.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use super::Element;
use crate::types::Props;

/// A function component: props in, exactly one child element out.
///
/// Two components are the same type when their render functions have the
/// same Rust type. A `fn` item or a closure defined at one site is therefore
/// stable across renders, even if the `Component` value is rebuilt each time.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    type_id: TypeId,
    render: Rc<dyn Fn(&Props) -> Element>,
}

impl Component {
    /// Wrap a render function.
    pub fn new<F>(name: &'static str, render: F) -> Self
    where
        F: Fn(&Props) -> Element + 'static,
    {
        Self {
            name,
            type_id: TypeId::of::<F>(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the component.
    pub fn render(&self, props: &Props) -> Element {
        (self.render)(props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
