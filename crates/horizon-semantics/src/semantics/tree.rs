//! The semantics node cache.
//!
//! [`SemanticsTree`] owns every cached [`SemanticsNode`] and custom action,
//! indexed by id. Parent and child links are ids resolved through the map,
//! so nodes never hold references to each other.
//!
//! # Update Cycle
//!
//! [`SemanticsTree::apply_update`] runs one full cycle:
//!
//! 1. Each decoded record is applied in buffer order. The node's previous
//!    state is snapshotted first, and any referenced child or custom action
//!    that is not cached yet is created on the spot.
//! 2. Geometry is resolved top-down from the root, which also yields the set
//!    of reachable nodes.
//! 3. Every cached node that was not reached is evicted.

use std::collections::{HashMap, HashSet};

use horizon_semantics_core::logging::targets;
use horizon_semantics_geometry::Transform3D;

use super::decoder::{CustomActionRecord, NodeRecord};
use super::flags::{SemanticsAction, SemanticsFlags};
use super::node::{CustomAccessibilityAction, FIRST_HOST_ACTION_ID, NodeId, SemanticsNode};

/// What happened to the cache during one update cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Non-hidden nodes that were populated before this cycle, in update
    /// order. These are the candidates for change events.
    pub updated: Vec<NodeId>,
    /// Input focus reports of non-hidden updated nodes, in update order.
    pub input_focus: Vec<(NodeId, bool)>,
    /// Nodes reachable from the root after the update.
    pub visited: HashSet<NodeId>,
    /// Nodes removed from the cache because they were not reachable.
    pub evicted: Vec<NodeId>,
}

/// Cache of the engine's semantics tree.
#[derive(Debug, Default)]
pub struct SemanticsTree {
    pub(crate) nodes: HashMap<NodeId, SemanticsNode>,
    custom_actions: HashMap<i32, CustomAccessibilityAction>,
}

impl SemanticsTree {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node is cached.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a cached node.
    pub fn get(&self, id: NodeId) -> Option<&SemanticsNode> {
        self.nodes.get(&id)
    }

    /// Look up a cached node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SemanticsNode> {
        self.nodes.get_mut(&id)
    }

    /// Check if a node is cached.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The root node, if cached.
    pub fn root(&self) -> Option<&SemanticsNode> {
        self.get(NodeId::ROOT)
    }

    /// Look up a node, creating an empty one if it is not cached.
    pub fn get_or_create(&mut self, id: NodeId) -> &mut SemanticsNode {
        self.nodes.entry(id).or_insert_with(|| {
            tracing::trace!(target: targets::TREE, ?id, "created node");
            SemanticsNode::new(id)
        })
    }

    /// Iterate over every cached node in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SemanticsNode> {
        self.nodes.values()
    }

    /// Look up a custom action definition.
    pub fn custom_action(&self, id: i32) -> Option<&CustomAccessibilityAction> {
        self.custom_actions.get(&id)
    }

    /// Look up a custom action, creating a placeholder if it is not defined.
    pub fn get_or_create_custom_action(&mut self, id: i32) -> &mut CustomAccessibilityAction {
        self.custom_actions
            .entry(id)
            .or_insert_with(|| CustomAccessibilityAction::new(id))
    }

    /// Find the custom action the host addresses with `host_action_id`.
    pub fn custom_action_for_host_id(
        &self,
        host_action_id: i32,
    ) -> Option<&CustomAccessibilityAction> {
        self.custom_actions
            .get(&host_action_id.wrapping_sub(FIRST_HOST_ACTION_ID))
    }

    /// Drop every node. Custom action definitions are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Mark a node's geometry for recomputation.
    pub fn mark_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.mark_geometry_dirty();
        }
    }

    /// Apply custom action definitions.
    pub fn apply_custom_actions(&mut self, records: Vec<CustomActionRecord>) {
        for record in records {
            let override_action = match record.override_action_id {
                -1 => None,
                bits => {
                    let action = SemanticsAction::from_bits(bits as u32);
                    if action.is_none() {
                        tracing::warn!(
                            target: targets::TREE,
                            id = record.id,
                            override_action_id = bits,
                            "custom action overrides an unknown action"
                        );
                    }
                    action
                }
            };
            let action = self.get_or_create_custom_action(record.id);
            action.override_action = override_action;
            action.label = record.label;
            action.hint = record.hint;
        }
    }

    /// Run one update cycle with already decoded records.
    ///
    /// `root_transform` positions the root within the host view.
    pub fn apply_update(
        &mut self,
        records: Vec<NodeRecord>,
        root_transform: &Transform3D,
    ) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        for record in records {
            let node = self.apply_record(record);
            if node.is_hidden() {
                continue;
            }
            let id = node.id;
            let had_previous = node.previous.is_some();
            outcome
                .input_focus
                .push((id, node.has_flag(SemanticsFlags::IS_FOCUSED)));
            if had_previous {
                outcome.updated.push(id);
            }
        }

        if !self.contains(NodeId::ROOT) && !self.is_empty() {
            tracing::warn!(
                target: targets::TREE,
                cached = self.len(),
                "update left no root node; evicting the whole tree"
            );
        }

        outcome.visited = self.resolve_geometry(root_transform);
        outcome.evicted = self.evict_unvisited(&outcome.visited);

        tracing::debug!(
            target: targets::TREE,
            nodes = self.len(),
            updated = outcome.updated.len(),
            evicted = outcome.evicted.len(),
            "applied semantics update"
        );
        outcome
    }

    fn apply_record(&mut self, record: NodeRecord) -> &SemanticsNode {
        let id = record.id;

        for &child in record
            .children_in_traversal_order
            .iter()
            .chain(&record.children_in_hit_test_order)
        {
            let child = self.get_or_create(child);
            if child.parent != Some(id) {
                child.parent = Some(id);
                child.mark_geometry_dirty();
            }
        }

        let mut custom_actions = Vec::with_capacity(record.custom_actions.len());
        let mut tap_override = None;
        let mut long_press_override = None;
        for &action_id in &record.custom_actions {
            let action = self.get_or_create_custom_action(action_id);
            match action.override_action {
                Some(SemanticsAction::Tap) => tap_override = Some(action_id),
                Some(SemanticsAction::LongPress) => long_press_override = Some(action_id),
                _ => {
                    if !custom_actions.contains(&action_id) {
                        custom_actions.push(action_id);
                    }
                }
            }
        }

        let node = self.get_or_create(id);
        node.previous = node.populated.then(|| node.snapshot());

        node.mark_geometry_dirty();

        node.flags = record.flags;
        node.actions = record.actions;
        node.text_selection_base = record.text_selection_base;
        node.text_selection_extent = record.text_selection_extent;
        node.scroll_children = record.scroll_children;
        node.scroll_index = record.scroll_index;
        node.scroll_position = record.scroll_position;
        node.scroll_extent_max = record.scroll_extent_max;
        node.scroll_extent_min = record.scroll_extent_min;
        node.label = record.label;
        node.value = record.value;
        node.increased_value = record.increased_value;
        node.decreased_value = record.decreased_value;
        node.hint = record.hint;
        node.text_direction = record.text_direction;
        node.rect = record.rect;
        node.transform = record.transform;
        node.children_in_traversal_order = record.children_in_traversal_order;
        node.children_in_hit_test_order = record.children_in_hit_test_order;
        node.custom_actions = custom_actions;
        node.tap_override = tap_override;
        node.long_press_override = long_press_override;
        node.populated = true;

        tracing::trace!(target: targets::TREE, ?id, flags = ?node.flags, actions = ?node.actions, "updated node");
        node
    }

    fn evict_unvisited(&mut self, visited: &HashSet<NodeId>) -> Vec<NodeId> {
        let evicted: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !visited.contains(id))
            .copied()
            .collect();
        for id in &evicted {
            self.nodes.remove(id);
            tracing::trace!(target: targets::TREE, ?id, "evicted node");
        }
        evicted
    }

    /// Node ids in depth-first traversal order starting at `start`.
    ///
    /// Each node is listed once even if the cached links are cyclic.
    pub fn traversal_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(node.children_in_traversal_order.iter().rev().copied());
        }
        order
    }

    /// Route-scoping nodes reachable from the root, in traversal order.
    pub fn collect_routes(&self) -> Vec<NodeId> {
        self.traversal_from(NodeId::ROOT)
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|node| node.has_flag(SemanticsFlags::SCOPES_ROUTE))
            })
            .collect()
    }

    /// Name of the route scoped by `route`: the first non-empty label of a
    /// route-naming node in its subtree.
    pub fn route_name(&self, route: NodeId) -> Option<String> {
        self.traversal_from(route).into_iter().find_map(|id| {
            let node = self.nodes.get(&id)?;
            if !node.has_flag(SemanticsFlags::NAMES_ROUTE) {
                return None;
            }
            node.label().filter(|label| !label.is_empty()).map(str::to_owned)
        })
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(&cur).and_then(|node| node.parent);
        }
        false
    }

    /// Nearest strict ancestor of `id` matching `predicate`.
    pub fn find_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&SemanticsNode) -> bool,
    ) -> Option<NodeId> {
        let mut current = self.nodes.get(&id)?.parent;
        let mut steps = 0;
        while let Some(cur) = current {
            let node = self.nodes.get(&cur)?;
            if predicate(node) {
                return Some(cur);
            }
            steps += 1;
            if steps > self.nodes.len() {
                return None;
            }
            current = node.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::flags::SemanticsActions;

    fn apply(tree: &mut SemanticsTree, records: Vec<NodeRecord>) -> UpdateOutcome {
        tree.apply_update(records, &Transform3D::IDENTITY)
    }

    #[test]
    fn test_children_created_on_reference() {
        let mut tree = SemanticsTree::new();
        let outcome = apply(&mut tree, vec![NodeRecord::new(0).with_children([1, 2])]);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(NodeId(1)).unwrap().parent(), Some(NodeId::ROOT));
        assert!(!tree.get(NodeId(2)).unwrap().is_populated());
        assert_eq!(outcome.visited.len(), 3);
        assert!(outcome.evicted.is_empty());
        assert!(outcome.updated.is_empty());
    }

    #[test]
    fn test_previous_snapshot_only_after_first_update() {
        let mut tree = SemanticsTree::new();
        apply(&mut tree, vec![NodeRecord::new(0).with_label("a")]);
        assert!(tree.root().unwrap().previous().is_none());

        let outcome = apply(&mut tree, vec![NodeRecord::new(0).with_label("b")]);
        let previous = tree.root().unwrap().previous().unwrap();
        assert_eq!(previous.label.as_deref(), Some("a"));
        assert_eq!(tree.root().unwrap().label(), Some("b"));
        assert_eq!(outcome.updated, vec![NodeId::ROOT]);
    }

    #[test]
    fn test_unreachable_nodes_evicted() {
        let mut tree = SemanticsTree::new();
        apply(
            &mut tree,
            vec![
                NodeRecord::new(0).with_children([1]),
                NodeRecord::new(1).with_children([2]),
                NodeRecord::new(2),
            ],
        );
        assert_eq!(tree.len(), 3);

        let outcome = apply(&mut tree, vec![NodeRecord::new(0)]);
        let mut evicted = outcome.evicted.clone();
        evicted.sort();
        assert_eq!(evicted, vec![NodeId(1), NodeId(2)]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_missing_root_evicts_everything() {
        let mut tree = SemanticsTree::new();
        let outcome = apply(&mut tree, vec![NodeRecord::new(4).with_children([5])]);
        assert!(tree.is_empty());
        assert_eq!(outcome.evicted.len(), 2);
    }

    #[test]
    fn test_hidden_nodes_cached_but_not_reported() {
        let mut tree = SemanticsTree::new();
        let hidden = NodeRecord::new(1).with_flags(SemanticsFlags::IS_HIDDEN | SemanticsFlags::IS_FOCUSED);
        apply(&mut tree, vec![NodeRecord::new(0).with_children([1]), hidden.clone()]);
        let outcome = apply(&mut tree, vec![hidden]);

        assert!(tree.contains(NodeId(1)));
        assert!(outcome.updated.is_empty());
        assert!(outcome.input_focus.is_empty());
    }

    #[test]
    fn test_input_focus_reports() {
        let mut tree = SemanticsTree::new();
        let outcome = apply(
            &mut tree,
            vec![
                NodeRecord::new(0).with_children([1]),
                NodeRecord::new(1).with_flags(SemanticsFlags::IS_TEXT_FIELD | SemanticsFlags::IS_FOCUSED),
            ],
        );
        assert_eq!(
            outcome.input_focus,
            vec![(NodeId(0), false), (NodeId(1), true)]
        );
    }

    #[test]
    fn test_custom_actions_registered_once() {
        let mut tree = SemanticsTree::new();
        tree.apply_custom_actions(vec![
            CustomActionRecord::new(1, "Archive"),
            CustomActionRecord {
                id: 2,
                override_action_id: SemanticsAction::Tap.bits() as i32,
                label: None,
                hint: Some("Open message".into()),
            },
            CustomActionRecord {
                id: 3,
                override_action_id: SemanticsAction::LongPress.bits() as i32,
                label: None,
                hint: Some("Select".into()),
            },
        ]);
        apply(
            &mut tree,
            vec![NodeRecord::new(0).with_custom_actions([1, 2, 3, 1])],
        );

        let root = tree.root().unwrap();
        assert_eq!(root.custom_actions(), &[1]);
        assert_eq!(root.tap_override(), Some(2));
        assert_eq!(root.long_press_override(), Some(3));
    }

    #[test]
    fn test_custom_action_placeholder_then_definition() {
        let mut tree = SemanticsTree::new();
        apply(&mut tree, vec![NodeRecord::new(0).with_custom_actions([7])]);
        assert_eq!(tree.custom_action(7).unwrap().label, None);

        tree.apply_custom_actions(vec![CustomActionRecord::new(7, "Delete")]);
        let action = tree.custom_action_for_host_id(7 + crate::FIRST_HOST_ACTION_ID).unwrap();
        assert_eq!(action.label.as_deref(), Some("Delete"));
    }

    #[test]
    fn test_routes_and_names() {
        let mut tree = SemanticsTree::new();
        apply(
            &mut tree,
            vec![
                NodeRecord::new(0).with_children([1, 2]),
                NodeRecord::new(1)
                    .with_flags(SemanticsFlags::SCOPES_ROUTE)
                    .with_children([3]),
                NodeRecord::new(2)
                    .with_flags(SemanticsFlags::SCOPES_ROUTE)
                    .with_children([4, 5]),
                NodeRecord::new(3).with_flags(SemanticsFlags::NAMES_ROUTE).with_label("Inbox"),
                NodeRecord::new(4).with_flags(SemanticsFlags::NAMES_ROUTE).with_label(""),
                NodeRecord::new(5).with_flags(SemanticsFlags::NAMES_ROUTE).with_label("Settings"),
            ],
        );

        assert_eq!(tree.collect_routes(), vec![NodeId(1), NodeId(2)]);
        assert_eq!(tree.route_name(NodeId(1)).as_deref(), Some("Inbox"));
        assert_eq!(tree.route_name(NodeId(2)).as_deref(), Some("Settings"));
        assert_eq!(tree.route_name(NodeId(0)).as_deref(), Some("Inbox"));
    }

    #[test]
    fn test_cyclic_links_do_not_hang() {
        let mut tree = SemanticsTree::new();
        apply(
            &mut tree,
            vec![
                NodeRecord::new(0).with_children([1]),
                NodeRecord::new(1).with_children([0]),
            ],
        );
        assert_eq!(tree.traversal_from(NodeId::ROOT), vec![NodeId(0), NodeId(1)]);
        assert!(!tree.is_ancestor_or_self(NodeId(5), NodeId(1)));
    }

    #[test]
    fn test_ancestor_queries() {
        let mut tree = SemanticsTree::new();
        apply(
            &mut tree,
            vec![
                NodeRecord::new(0).with_children([1]),
                NodeRecord::new(1)
                    .with_flags(SemanticsFlags::HAS_IMPLICIT_SCROLLING)
                    .with_children([2]),
                NodeRecord::new(2).with_actions(SemanticsActions::from(SemanticsAction::Tap)),
            ],
        );
        assert!(tree.is_ancestor_or_self(NodeId(1), NodeId(2)));
        assert!(tree.is_ancestor_or_self(NodeId(2), NodeId(2)));
        assert!(!tree.is_ancestor_or_self(NodeId(2), NodeId(1)));
        assert_eq!(
            tree.find_ancestor(NodeId(2), |n| n.has_flag(SemanticsFlags::HAS_IMPLICIT_SCROLLING)),
            Some(NodeId(1))
        );
        assert_eq!(
            tree.find_ancestor(NodeId(1), |n| n.has_flag(SemanticsFlags::HAS_IMPLICIT_SCROLLING)),
            None
        );
    }
}
