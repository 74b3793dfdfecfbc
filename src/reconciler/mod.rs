//! Reconciler - Positional child diffing.
//!
//! [`reconcile_children`] builds the child chain of one work-in-progress
//! fiber from a list of new elements, matching them against the children of
//! that fiber's alternate in the committed generation.
//!
//! # Matching
//!
//! Purely positional: the Nth new element is compared with the Nth old
//! child and nothing else. There are no keys.
//!
//! - same type at the same position: `UPDATE`, the old host node and the
//!   alternate link are carried over
//! - different type, or no old child there: `PLACEMENT`, no host node yet
//! - old children left over (or displaced by a type change): dropped from
//!   the new chain. No `DELETION` is produced and their host nodes stay where
//!   they are. They are only counted in [`ReconcileOutcome::abandoned`].
//!
//! The routine is shallow; the work loop calls it once per visited fiber.

pub mod props;

pub use props::{apply_patches, diff_props, event_name, PropPatch};

use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberKind, Generation};

/// Counts from one [`reconcile_children`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub placed: usize,
    pub updated: usize,
    /// Old fibers not carried into the new chain.
    pub abandoned: usize,
}

/// Attach a fresh child chain under `parent` built from `elements`.
///
/// # Arguments
///
/// * `wip` - Generation being built; `parent` must belong to it
/// * `current` - Committed generation that `parent.alternate` points into
/// * `parent` - Fiber whose children are being produced
/// * `elements` - New children, in order
pub fn reconcile_children<N: Clone>(
    wip: &mut Generation<N>,
    current: Option<&Generation<N>>,
    parent: FiberId,
    elements: &[Element],
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    let parent_depth = wip[parent].depth;

    let mut old = match (current, wip[parent].alternate) {
        (Some(current), Some(alternate)) => current.get(alternate).and_then(|f| f.child),
        _ => None,
    };
    let mut prev: Option<FiberId> = None;

    for element in elements {
        let old_fiber = old.and_then(|id| current.and_then(|c| c.get(id)).map(|f| (id, f)));

        let mut fiber = Fiber::new(FiberKind::from(element.element_type()), element.props().clone());
        fiber.parent = Some(parent);
        fiber.depth = parent_depth + 1;

        match old_fiber {
            Some((old_id, old_fiber)) if old_fiber.kind.matches(element.element_type()) => {
                fiber.effect = EffectTag::UPDATE;
                fiber.host = old_fiber.host.clone();
                fiber.alternate = Some(old_id);
                outcome.updated += 1;
            }
            Some(_) => {
                fiber.effect = EffectTag::PLACEMENT;
                outcome.placed += 1;
                outcome.abandoned += 1;
            }
            None => {
                fiber.effect = EffectTag::PLACEMENT;
                outcome.placed += 1;
            }
        }

        let id = wip.push(fiber);
        match prev {
            Some(prev) => wip[prev].sibling = Some(id),
            None => wip[parent].child = Some(id),
        }
        prev = Some(id);

        old = old_fiber.and_then(|(_, f)| f.sibling);
    }

    if let Some(current) = current {
        outcome.abandoned += std::iter::successors(old, |id| current.get(*id).and_then(|f| f.sibling)).count();
    }

    if outcome.abandoned > 0 {
        tracing::debug!(
            parent = parent.index(),
            abandoned = outcome.abandoned,
            "old fibers dropped without deletion"
        );
    }

    outcome
}
