//! Unit of work - Realize one fiber and diff its children.

use super::Engine;
use crate::element::Element;
use crate::error::{EngineError, Result};
use crate::fiber::{EffectTag, Fiber, FiberId, FiberKind};
use crate::host::{HostAdapter, NodeKind};
use crate::reconciler::{apply_patches, diff_props, reconcile_children};
use crate::types::Props;

/// Host tags the engine refuses to hand to an adapter.
pub(crate) fn is_supported_tag(tag: &str) -> bool {
    !tag.is_empty() && !tag.chars().any(char::is_whitespace)
}

/// Create the host node for a fiber and apply all of its props.
fn realize<H: HostAdapter>(host: &mut H, event_prefix: &str, fiber: &mut Fiber<H::Node>, kind: NodeKind<'_>) {
    let node = host.create_node(kind);
    let patches = diff_props(&Props::new(), &fiber.props, event_prefix);
    apply_patches(host, &node, &patches);
    fiber.host = Some(node);
}

impl<H: HostAdapter> Engine<H> {
    /// Process fiber `id` of the work-in-progress tree.
    ///
    /// Components are called for their single child. Host and text fibers
    /// get a host node on first visit, then their `children` are diffed.
    ///
    /// # Returns
    ///
    /// The next fiber in traversal order, or `None` when the tree is done.
    pub(super) fn perform_unit_of_work(&mut self, id: FiberId) -> Result<Option<FiberId>> {
        let Engine {
            host,
            config,
            current,
            wip,
            stats,
            ..
        } = self;
        let Some(wip) = wip.as_mut() else {
            return Ok(None);
        };

        let depth = wip[id].depth;
        if depth > config.max_depth {
            return Err(EngineError::CyclicTreeDetected {
                depth,
                limit: config.max_depth,
            });
        }

        stats.units += 1;
        tracing::trace!(fiber = id.index(), kind = wip[id].kind.name(), depth, "unit of work");

        let children: Vec<Element> = match wip[id].kind.clone() {
            FiberKind::Component(component) => vec![component.render(&wip[id].props)],
            FiberKind::Root => wip[id].props.children().to_vec(),
            FiberKind::Host(tag) => {
                if !is_supported_tag(&tag) {
                    if config.strict_element_types {
                        return Err(EngineError::UnsupportedElementType { tag: tag.to_string() });
                    }
                    tracing::warn!(tag = %tag, fiber = id.index(), "skipping subtree with unsupported element type");
                    wip[id].effect = EffectTag::empty();
                    stats.skipped += 1;
                    return Ok(wip.successor(id));
                }
                if wip[id].host.is_none() {
                    realize(host, &config.event_prefix, &mut wip[id], NodeKind::Element(&*tag));
                    stats.created += 1;
                }
                wip[id].props.children().to_vec()
            }
            FiberKind::Text => {
                if wip[id].host.is_none() {
                    realize(host, &config.event_prefix, &mut wip[id], NodeKind::Text);
                    stats.created += 1;
                }
                wip[id].props.children().to_vec()
            }
        };

        let outcome = reconcile_children(wip, current.as_ref(), id, &children);
        stats.abandoned += outcome.abandoned;

        Ok(wip.successor(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_tags() {
        assert!(is_supported_tag("div"));
        assert!(is_supported_tag("my-widget"));
        assert!(!is_supported_tag(""));
        assert!(!is_supported_tag("two words"));
        assert!(!is_supported_tag("tab\t"));
    }
}
