//! Property diffing.
//!
//! Turns two property mappings into the host operations that move a node
//! from one to the other.
//!
//! # Algorithm
//!
//! 1. Every name present before but absent now is removed (a bound handler
//!    is unbound instead).
//! 2. Every name present now whose value differs from before is written.
//!    Handlers are never overwritten in place: the old binding is removed
//!    and the new one added, since hosts track handlers by identity.
//! 3. Equal values produce nothing.
//!
//! A name is an event binding when it carries the event prefix (`on` by
//! default) *and* its value is a [`PropValue::Handler`]. `onClick` binds
//! `click`.

use crate::host::HostAdapter;
use crate::types::{EventHandler, PropValue, Props};

/// One host operation produced by [`diff_props`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropPatch {
    Remove { name: String },
    Set { name: String, value: PropValue },
    RemoveListener { event: String, handler: EventHandler },
    AddListener { event: String, handler: EventHandler },
}

/// Event name bound by a property name: prefix stripped, lowercased.
///
/// Returns `None` when `name` lacks the prefix or has nothing after it.
pub fn event_name(name: &str, prefix: &str) -> Option<String> {
    let rest = name.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_lowercase())
}

fn binding<'a>(name: &str, value: &'a PropValue, prefix: &str) -> Option<(String, &'a EventHandler)> {
    let handler = value.as_handler()?;
    Some((event_name(name, prefix)?, handler))
}

/// Compute the operations turning `old` into `new`.
///
/// Removals come first, then writes, each in name order.
pub fn diff_props(old: &Props, new: &Props, event_prefix: &str) -> Vec<PropPatch> {
    let mut patches = Vec::new();

    for (name, old_value) in old.iter() {
        if new.contains(name) {
            continue;
        }
        match binding(name, old_value, event_prefix) {
            Some((event, handler)) => patches.push(PropPatch::RemoveListener {
                event,
                handler: handler.clone(),
            }),
            None => patches.push(PropPatch::Remove {
                name: name.to_string(),
            }),
        }
    }

    for (name, new_value) in new.iter() {
        let old_value = old.get(name);
        if old_value == Some(new_value) {
            continue;
        }

        if let Some((event, handler)) = old_value.and_then(|v| binding(name, v, event_prefix)) {
            patches.push(PropPatch::RemoveListener {
                event,
                handler: handler.clone(),
            });
        }

        match binding(name, new_value, event_prefix) {
            Some((event, handler)) => patches.push(PropPatch::AddListener {
                event,
                handler: handler.clone(),
            }),
            None => patches.push(PropPatch::Set {
                name: name.to_string(),
                value: new_value.clone(),
            }),
        }
    }

    patches
}

/// Replay patches against a host node.
pub fn apply_patches<H: HostAdapter>(host: &mut H, node: &H::Node, patches: &[PropPatch]) {
    for patch in patches {
        match patch {
            PropPatch::Remove { name } => host.remove_property(node, name),
            PropPatch::Set { name, value } => host.set_property(node, name, value),
            PropPatch::RemoveListener { event, handler } => {
                host.remove_listener(node, event, handler)
            }
            PropPatch::AddListener { event, handler } => host.add_listener(node, event, handler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(patches: &[PropPatch]) -> Vec<String> {
        patches
            .iter()
            .map(|p| match p {
                PropPatch::Remove { name } => format!("-{name}"),
                PropPatch::Set { name, .. } => format!("={name}"),
                PropPatch::RemoveListener { event, .. } => format!("-@{event}"),
                PropPatch::AddListener { event, .. } => format!("+@{event}"),
            })
            .collect()
    }

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("onClick", "on"), Some("click".to_string()));
        assert_eq!(event_name("onKeyDown", "on"), Some("keydown".to_string()));
        assert_eq!(event_name("on", "on"), None);
        assert_eq!(event_name("title", "on"), None);
    }

    #[test]
    fn test_initial_diff_sets_everything() {
        let click = EventHandler::new(|_| {});
        let new = Props::new()
            .with("id", "btn")
            .with("onClick", click)
            .with("disabled", false);
        let patches = diff_props(&Props::new(), &new, "on");
        assert_eq!(names(&patches), vec!["=disabled", "=id", "+@click"]);
    }

    #[test]
    fn test_identical_props_produce_nothing() {
        let click = EventHandler::new(|_| {});
        let props = Props::new().with("id", "a").with("onClick", click);
        assert!(diff_props(&props, &props.clone(), "on").is_empty());
    }

    #[test]
    fn test_symmetric_difference_and_changes() {
        let old = Props::new().with("a", 1).with("b", 2).with("c", 3);
        let new = Props::new().with("b", 2).with("c", 4).with("d", 5);
        let patches = diff_props(&old, &new, "on");
        assert_eq!(names(&patches), vec!["-a", "=c", "=d"]);
    }

    #[test]
    fn test_changed_handler_is_remove_then_add() {
        let first = EventHandler::new(|_| {});
        let second = EventHandler::new(|_| {});
        let old = Props::new().with("onClick", first.clone());
        let new = Props::new().with("onClick", second.clone());

        let patches = diff_props(&old, &new, "on");
        assert_eq!(
            patches,
            vec![
                PropPatch::RemoveListener {
                    event: "click".to_string(),
                    handler: first,
                },
                PropPatch::AddListener {
                    event: "click".to_string(),
                    handler: second,
                },
            ]
        );
    }

    #[test]
    fn test_removed_handler_is_unbound() {
        let click = EventHandler::new(|_| {});
        let old = Props::new().with("onClick", click).with("id", "x");
        let new = Props::new().with("id", "x");
        assert_eq!(names(&diff_props(&old, &new, "on")), vec!["-@click"]);
    }

    #[test]
    fn test_prefixed_plain_value_is_a_property() {
        let old = Props::new().with("online", true);
        let new = Props::new().with("online", false);
        assert_eq!(names(&diff_props(&old, &new, "on")), vec!["=online"]);
    }

    #[test]
    fn test_custom_prefix() {
        let click = EventHandler::new(|_| {});
        let new = Props::new().with("handleClick", click.clone()).with("onClick", click);
        let patches = diff_props(&Props::new(), &new, "handle");
        assert_eq!(names(&patches), vec!["+@click", "=onClick"]);
    }
}
