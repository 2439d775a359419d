//! Global geometry resolution.
//!
//! A node's global transform is its parent's global transform composed with
//! its own local transform; its global bounds are the axis-aligned box of
//! its four transformed local corners. Resolution walks the tree top-down
//! once per update cycle. A node written by an update, or moved under a new
//! parent, is dirty, and a dirty node recomputes its whole subtree.

use std::collections::HashSet;

use horizon_semantics_core::logging::targets;
use horizon_semantics_geometry::{Rect, Transform3D};

use super::node::NodeId;
use super::tree::SemanticsTree;

impl SemanticsTree {
    /// Resolve global geometry from the root and return the reachable set.
    pub(crate) fn resolve_geometry(&mut self, root_transform: &Transform3D) -> HashSet<NodeId> {
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![(NodeId::ROOT, *root_transform, false)];

        while let Some((id, parent_transform, force)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if !visited.insert(id) {
                tracing::warn!(target: targets::GEOMETRY, ?id, "node reached twice; ignoring cyclic link");
                continue;
            }

            let force = force || node.geometry.geometry_dirty;
            if force {
                let global = parent_transform * node.transform;
                node.geometry.global_transform = global;
                node.geometry.global_bounds = global.map_rect_bounds(&node.rect).unwrap_or_else(|| {
                    tracing::debug!(target: targets::GEOMETRY, ?id, "bounds do not project; using empty bounds");
                    Rect::ZERO
                });
                node.geometry.geometry_dirty = false;
                tracing::trace!(target: targets::GEOMETRY, ?id, bounds = ?node.geometry.global_bounds, "resolved geometry");
            }

            let global = node.geometry.global_transform;
            stack.extend(
                node.children_in_traversal_order
                    .iter()
                    .rev()
                    .map(|&child| (child, global, force)),
            );
        }

        visited
    }

    /// Inverse of a node's local transform, computed on demand.
    ///
    /// A singular transform yields [`Transform3D::ZERO`], which maps no
    /// point, so the node can never be hit.
    pub(crate) fn inverse_transform(&mut self, id: NodeId) -> Option<Transform3D> {
        let node = self.nodes.get_mut(&id)?;
        if node.geometry.inverse_dirty {
            node.geometry.inverse_transform = node.transform.inverse().unwrap_or_else(|| {
                tracing::debug!(target: targets::GEOMETRY, ?id, "singular transform; node is not hittable");
                Transform3D::ZERO
            });
            node.geometry.inverse_dirty = false;
        }
        Some(node.geometry.inverse_transform)
    }
}
