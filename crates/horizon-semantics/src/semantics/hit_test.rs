//! Hit testing against the cached tree.

use std::collections::HashSet;

use glam::Vec4;
use horizon_semantics_core::logging::targets;
use horizon_semantics_geometry::Point;

use super::node::NodeId;
use super::tree::SemanticsTree;

impl SemanticsTree {
    /// Find the deepest visible node under `point`, given in root coordinates.
    ///
    /// Children are tried in hit-test order and the first one hit wins.
    /// Hidden children are skipped. Returns `None` for an empty cache or a
    /// point outside the root.
    pub fn hit_test(&mut self, point: Point) -> Option<NodeId> {
        let mut visited = HashSet::new();
        let hit = self.hit_test_node(NodeId::ROOT, point.to_homogeneous(), &mut visited);
        tracing::trace!(target: targets::GEOMETRY, ?point, ?hit, "hit test");
        hit
    }

    fn hit_test_node(
        &mut self,
        id: NodeId,
        point: Vec4,
        visited: &mut HashSet<NodeId>,
    ) -> Option<NodeId> {
        if !visited.insert(id) {
            return None;
        }
        let node = self.nodes.get(&id)?;
        let local = Point::from_homogeneous(point)?;
        if !node.rect().contains(local) {
            return None;
        }

        let children = node.children_in_hit_test_order().to_vec();
        for child in children {
            let Some(child_node) = self.nodes.get(&child) else {
                continue;
            };
            if child_node.is_hidden() {
                continue;
            }
            let Some(inverse) = self.inverse_transform(child) else {
                continue;
            };
            let mapped = inverse.transform_vec4(point);
            if let Some(hit) = self.hit_test_node(child, mapped, visited) {
                return Some(hit);
            }
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use horizon_semantics_geometry::{Rect, Transform3D};

    use super::*;
    use crate::semantics::decoder::NodeRecord;
    use crate::semantics::flags::SemanticsFlags;

    fn tree_with(records: Vec<NodeRecord>) -> SemanticsTree {
        let mut tree = SemanticsTree::new();
        tree.apply_update(records, &Transform3D::IDENTITY);
        tree
    }

    fn screen() -> Rect {
        Rect::from_ltrb(0.0, 0.0, 400.0, 800.0)
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = SemanticsTree::new();
        assert_eq!(tree.hit_test(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_outside_root() {
        let mut tree = tree_with(vec![NodeRecord::new(0).with_rect(screen())]);
        assert_eq!(tree.hit_test(Point::new(400.0, 10.0)), None);
        assert_eq!(tree.hit_test(Point::new(10.0, 10.0)), Some(NodeId::ROOT));
    }

    #[test]
    fn test_first_child_in_hit_test_order_wins() {
        let overlap = Rect::from_ltrb(0.0, 0.0, 100.0, 100.0);
        let mut tree = tree_with(vec![
            NodeRecord::new(0)
                .with_rect(screen())
                .with_children([1, 2])
                .with_hit_test_order([2, 1]),
            NodeRecord::new(1).with_rect(overlap),
            NodeRecord::new(2).with_rect(overlap),
        ]);
        assert_eq!(tree.hit_test(Point::new(50.0, 50.0)), Some(NodeId(2)));
    }

    #[test]
    fn test_later_child_hit_where_earlier_does_not_reach() {
        let mut tree = tree_with(vec![
            NodeRecord::new(0).with_rect(screen()).with_children([1, 2]),
            NodeRecord::new(1).with_rect(Rect::from_ltrb(0.0, 0.0, 60.0, 100.0)),
            NodeRecord::new(2).with_rect(Rect::from_ltrb(40.0, 0.0, 100.0, 100.0)),
        ]);
        assert_eq!(tree.hit_test(Point::new(80.0, 50.0)), Some(NodeId(2)));
        assert_eq!(tree.hit_test(Point::new(50.0, 50.0)), Some(NodeId(1)));
    }

    #[test]
    fn test_hidden_child_skipped() {
        let overlap = Rect::from_ltrb(0.0, 0.0, 100.0, 100.0);
        let mut tree = tree_with(vec![
            NodeRecord::new(0).with_rect(screen()).with_children([1, 2]),
            NodeRecord::new(1)
                .with_rect(overlap)
                .with_flags(SemanticsFlags::IS_HIDDEN),
            NodeRecord::new(2).with_rect(overlap),
        ]);
        assert_eq!(tree.hit_test(Point::new(50.0, 50.0)), Some(NodeId(2)));
    }

    #[test]
    fn test_point_mapped_through_child_transform() {
        let mut tree = tree_with(vec![
            NodeRecord::new(0).with_rect(screen()).with_children([1]),
            NodeRecord::new(1)
                .with_transform(Transform3D::translate(100.0, 200.0))
                .with_rect(Rect::from_ltrb(0.0, 0.0, 50.0, 50.0))
                .with_children([2]),
            NodeRecord::new(2)
                .with_transform(Transform3D::translate(10.0, 10.0))
                .with_rect(Rect::from_ltrb(0.0, 0.0, 10.0, 10.0)),
        ]);
        assert_eq!(tree.hit_test(Point::new(115.0, 215.0)), Some(NodeId(2)));
        assert_eq!(tree.hit_test(Point::new(105.0, 205.0)), Some(NodeId(1)));
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0)), Some(NodeId::ROOT));
    }

    #[test]
    fn test_singular_child_never_hit() {
        let mut tree = tree_with(vec![
            NodeRecord::new(0).with_rect(screen()).with_children([1]),
            NodeRecord::new(1)
                .with_transform(Transform3D::scale(0.0, 0.0))
                .with_rect(Rect::from_ltrb(-1000.0, -1000.0, 1000.0, 1000.0)),
        ]);
        assert_eq!(tree.hit_test(Point::new(0.0, 0.0)), Some(NodeId::ROOT));
    }
}
