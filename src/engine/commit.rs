//! Commit - Apply a finished work-in-progress tree to the host.
//!
//! Runs in one go, only once every unit of work of the generation is done.
//! Fibers are visited in preorder (child subtree before sibling) with an
//! explicit stack:
//!
//! - `PLACEMENT` with a host node: append it to the nearest ancestor that
//!   owns one (components own none and are skipped over)
//! - `UPDATE` with a host node: diff props against the alternate's and
//!   apply the patches
//!
//! Afterwards the work-in-progress tree becomes the current tree and the
//! previous current tree is dropped.

use super::{Engine, RenderPhase, RenderStats};
use crate::fiber::{EffectTag, FiberId, Generation};
use crate::host::HostAdapter;
use crate::reconciler::{apply_patches, diff_props};
use crate::types::Props;

fn commit_work<H: HostAdapter>(
    host: &mut H,
    wip: &Generation<H::Node>,
    current: Option<&Generation<H::Node>>,
    id: FiberId,
    event_prefix: &str,
    stats: &mut RenderStats,
) {
    let fiber = &wip[id];
    let Some(node) = &fiber.host else {
        return;
    };

    if fiber.effect.contains(EffectTag::PLACEMENT) {
        match wip.host_parent(id) {
            Some(parent) => {
                host.append_child(parent, node);
                stats.placed += 1;
            }
            None => tracing::warn!(fiber = id.index(), "placement without a host ancestor"),
        }
    } else if fiber.effect.contains(EffectTag::UPDATE) {
        let empty = Props::new();
        let old = fiber
            .alternate
            .and_then(|alt| current.and_then(|c| c.get(alt)))
            .map_or(&empty, |f| &f.props);
        let patches = diff_props(old, &fiber.props, event_prefix);
        apply_patches(host, node, &patches);
        stats.updated += 1;
    }
}

impl<H: HostAdapter> Engine<H> {
    /// Commit the work-in-progress tree and promote it to current.
    pub(super) fn commit_root(&mut self) {
        let Some(wip) = self.wip.take() else {
            return;
        };
        self.phase = RenderPhase::Commit;

        for id in wip.descendants(wip.root()) {
            commit_work(
                &mut self.host,
                &wip,
                self.current.as_ref(),
                id,
                &self.config.event_prefix,
                &mut self.stats,
            );
        }

        self.current = Some(wip);
        self.next_unit = None;
        self.phase = RenderPhase::Idle;
        self.last_stats = Some(self.stats);

        tracing::debug!(
            units = self.stats.units,
            created = self.stats.created,
            placed = self.stats.placed,
            updated = self.stats.updated,
            skipped = self.stats.skipped,
            abandoned = self.stats.abandoned,
            slices = self.stats.slices,
            "render committed"
        );
    }
}
