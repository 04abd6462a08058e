//! Horizontal layout: children in one column beside the parent

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::{LeftColumn, RightColumn, Run};
use super::connection::{distribute, edge_midpoint, point_on_edge, Slot};
use super::error::LayoutError;
use super::strategy::{apply_at, center_with_run, enclose, node_type_of, Axis, LayoutParams, LayoutStrategy};
use super::types::{BoundingBox, ConnectionPoint, Direction, Edge, LayoutType, NodeType};
use super::{begin_node, child_estimates, layout_for_node, measure_node, placed_children, LayoutContext};

/// Children stacked top to bottom to the right (or left) of the parent,
/// vertically centred on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalLayout {
    pub params: LayoutParams,
    /// `Right` or `Left`
    pub direction: Direction,
}

impl HorizontalLayout {
    pub fn new(params: LayoutParams, direction: Direction) -> Self {
        Self { params, direction }
    }

    fn grows_left(&self) -> bool {
        self.direction == Direction::Left
    }

    fn place_children(
        &self,
        tree: &mut Tree,
        node: NodeId,
        children: &[NodeId],
        ctx: &mut LayoutContext<'_>,
    ) -> Result<Run, LayoutError> {
        let own = tree[node].rect();
        let gap = self.params.child_padding;
        if self.grows_left() {
            let mut column = LeftColumn::new(own.x - self.params.parent_padding, own.y, gap);
            for child in children {
                let layout = layout_for_node(tree, *child, ctx, Some(self.direction))?;
                column.add_node(tree, *child, &layout, ctx)?;
            }
            Ok(column.finish())
        } else {
            let mut column = RightColumn::new(own.right() + self.params.parent_padding, own.y, gap);
            for child in children {
                let layout = layout_for_node(tree, *child, ctx, Some(self.direction))?;
                column.add_node(tree, *child, &layout, ctx)?;
            }
            Ok(column.finish())
        }
    }
}

/// Underline attachment of a bare text node: the bottom corner facing `toward`
fn text_anchor(rect: &BoundingBox, toward: Direction) -> ConnectionPoint {
    let along = if toward == Direction::Left { rect.x } else { rect.right() };
    point_on_edge(rect, Edge::Bottom, along)
}

impl LayoutStrategy for HorizontalLayout {
    fn layout_type(&self) -> LayoutType {
        LayoutType::Horizontal
    }

    fn apply_layout(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        apply_at(self, tree, node, x, y, ctx)
    }

    fn apply_layout_relative(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        begin_node(tree, node, x, y, (*self).into(), ctx)?;
        let children = placed_children(tree, node);
        if children.is_empty() {
            return Ok(tree[node].bounding_box);
        }
        let run = self.place_children(tree, node, &children, ctx)?;
        center_with_run(tree, node, &children, &run, Axis::Y);
        Ok(enclose(tree, node, &children))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        let rect = tree[node].rect();
        if node_type_of(tree, node, level_style) == NodeType::Text {
            let away = if self.grows_left() { Direction::Left } else { Direction::Right };
            return text_anchor(&rect, away);
        }
        let edge = if self.grows_left() { Edge::Left } else { Edge::Right };
        let slot = match child {
            Some(child) => Slot {
                index: tree.sibling_index(child),
                count: tree.children(node).len(),
                target: Some(tree[child].rect().center().y),
            },
            None => Slot::lone(),
        };
        distribute(&rect, edge, self.params.connection_points, self.params.width_portion, slot)
    }

    fn child_connection_point(&self, tree: &Tree, node: NodeId, level_style: &LevelStyle) -> ConnectionPoint {
        let rect = tree[node].rect();
        if node_type_of(tree, node, level_style) == NodeType::Text {
            let toward_parent = if self.grows_left() { Direction::Right } else { Direction::Left };
            return text_anchor(&rect, toward_parent);
        }
        let edge = if self.grows_left() { Edge::Right } else { Edge::Left };
        edge_midpoint(&rect, edge)
    }

    fn estimate_node_height(
        &self,
        tree: &Tree,
        node: NodeId,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<f64, LayoutError> {
        let own = measure_node(tree, node, ctx)?.height;
        let children = placed_children(tree, node);
        if children.is_empty() {
            return Ok(own);
        }
        let estimates = child_estimates(tree, &children, ctx)?;
        let stacked = estimates.iter().sum::<f64>()
            + self.params.child_padding * (children.len() - 1) as f64;
        Ok(own.max(stacked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::{fixed_context, FixedMeasurer};
    use crate::layout::{Layout, LayoutFactory};
    use crate::style::{StyleProvider, Stylesheet};
    use pretty_assertions::assert_eq;

    fn layout(direction: Direction) -> HorizontalLayout {
        match LayoutFactory::default().create_layout(LayoutType::Horizontal, 80.0, 20.0, Some(direction), None) {
            Layout::Horizontal(layout) => layout,
            other => panic!("unexpected layout {other:?}"),
        }
    }

    fn two_children() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new("A");
        let root = tree.root();
        let b = tree.add_child(root, "B");
        let c = tree.add_child(root, "C");
        (tree, b, c)
    }

    #[test]
    fn test_children_right_of_parent_centred() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(100.0, 40.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, b, c) = two_children();
        let root = tree.root();

        let bounds = layout(Direction::Right)
            .apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx)
            .unwrap();

        assert_eq!(bounds, BoundingBox::new(0.0, 0.0, 280.0, 100.0));
        assert_eq!(tree[root].rect(), BoundingBox::new(0.0, 30.0, 100.0, 40.0));
        assert_eq!(tree[b].rect(), BoundingBox::new(180.0, 0.0, 100.0, 40.0));
        assert_eq!(tree[c].rect(), BoundingBox::new(180.0, 60.0, 100.0, 40.0));
    }

    #[test]
    fn test_children_left_of_parent() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(100.0, 40.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, b, c) = two_children();
        let root = tree.root();

        let bounds = layout(Direction::Left)
            .apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx)
            .unwrap();

        assert_eq!(bounds, BoundingBox::new(0.0, 0.0, 280.0, 100.0));
        assert_eq!(tree[root].x, 180.0);
        assert_eq!(tree[b].rect().right(), 100.0);
        assert_eq!(tree[c].y, 60.0);
    }

    #[test]
    fn test_tall_parent_centres_children() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(100.0, 40.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let mut tree = Tree::new("A");
        let root = tree.root();
        let b = tree.add_child(root, "B");

        let bounds = layout(Direction::Right)
            .apply_layout(&mut tree, root, 10.0, 10.0, &mut ctx)
            .unwrap();
        assert_eq!(bounds, BoundingBox::new(10.0, 10.0, 280.0, 40.0));
        assert_eq!(tree[b].y, tree[root].y);
    }

    #[test]
    fn test_connection_points() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(100.0, 40.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, b, _) = two_children();
        let root = tree.root();
        let strategy = layout(Direction::Right);
        strategy.apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx).unwrap();

        let level = styles.level_style(1).unwrap();
        let start = strategy.parent_connection_point(&tree, root, &level, Some(b));
        assert_eq!(start, ConnectionPoint::new(100.0, 50.0, Edge::Right));
        let end = strategy.child_connection_point(&tree, b, &level);
        assert_eq!(end, ConnectionPoint::new(180.0, 20.0, Edge::Left));
    }

    #[test]
    fn test_estimate_sums_children() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(100.0, 40.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (tree, ..) = two_children();
        let estimate = layout(Direction::Right)
            .estimate_node_height(&tree, tree.root(), &mut ctx)
            .unwrap();
        assert_eq!(estimate, 100.0);
    }
}
