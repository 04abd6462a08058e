//! Outline layout: children listed below the parent, flush on an alignment line

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::OutlineColumn;
use super::connection::{distribute, edge_midpoint, Slot};
use super::error::LayoutError;
use super::strategy::{apply_at, enclose, LayoutParams, LayoutStrategy};
use super::types::{BoundingBox, ConnectionPoint, Direction, Edge, EdgeAlignment, LayoutType};
use super::{begin_node, child_estimates, layout_for_node, measure_node, placed_children, LayoutContext};

/// Children stacked below the parent like a table of contents
///
/// The alignment line is measured from the parent's near or far edge and
/// offset by `horizontal_shift` in the growth direction. Right outlines put
/// each child's left edge on the line, left outlines its right edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineLayout {
    pub params: LayoutParams,
    /// `Right` or `Left`
    pub direction: Direction,
    pub edge_alignment: EdgeAlignment,
    pub horizontal_shift: f64,
}

impl OutlineLayout {
    pub fn new(
        params: LayoutParams,
        direction: Direction,
        edge_alignment: EdgeAlignment,
        horizontal_shift: f64,
    ) -> Self {
        Self {
            params,
            direction,
            edge_alignment,
            horizontal_shift,
        }
    }

    fn grows_left(&self) -> bool {
        self.direction == Direction::Left
    }

    /// x of the line children are snapped to, for a parent rectangle `own`
    pub fn alignment_line(&self, own: &BoundingBox) -> f64 {
        let shift = self.horizontal_shift;
        match (self.grows_left(), self.edge_alignment) {
            (false, EdgeAlignment::Near) => own.x + shift,
            (false, EdgeAlignment::Far) => own.right() + shift,
            (true, EdgeAlignment::Near) => own.right() - shift,
            (true, EdgeAlignment::Far) => own.x - shift,
        }
    }
}

impl LayoutStrategy for OutlineLayout {
    fn layout_type(&self) -> LayoutType {
        LayoutType::Outline
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

        let own = tree[node].rect();
        let line = self.alignment_line(&own);
        let top = own.bottom() + self.params.parent_padding;
        let mut column = if self.grows_left() {
            OutlineColumn::trailing(line, top, self.params.child_padding)
        } else {
            OutlineColumn::leading(line, top, self.params.child_padding)
        };
        for child in &children {
            let layout = layout_for_node(tree, *child, ctx, Some(self.direction))?;
            column.add_node(tree, *child, &layout, ctx)?;
        }
        column.finish();

        Ok(enclose(tree, node, &children))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        _level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        let slot = match child {
            Some(child) => Slot {
                index: tree.sibling_index(child),
                count: tree.children(node).len(),
                target: Some(tree[child].rect().center().x),
            },
            None => Slot::lone(),
        };
        distribute(
            &tree[node].rect(),
            Edge::Bottom,
            self.params.connection_points,
            self.params.width_portion,
            slot,
        )
    }

    fn child_connection_point(&self, tree: &Tree, node: NodeId, _level_style: &LevelStyle) -> ConnectionPoint {
        let edge = if self.grows_left() { Edge::Right } else { Edge::Left };
        edge_midpoint(&tree[node].rect(), edge)
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
        Ok(own
            + self.params.parent_padding
            + estimates.iter().sum::<f64>()
            + self.params.child_padding * (children.len() - 1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::{fixed_context, FixedMeasurer};
    use crate::layout::{Layout, LayoutExtra, LayoutFactory};
    use crate::style::Stylesheet;

    fn layout(direction: Direction, edge_alignment: EdgeAlignment, shift: f64) -> OutlineLayout {
        let extra = LayoutExtra {
            edge_alignment,
            horizontal_shift: shift,
            ..LayoutExtra::default()
        };
        match LayoutFactory::default().create_layout(LayoutType::Outline, 10.0, 5.0, Some(direction), Some(extra)) {
            Layout::Outline(layout) => layout,
            other => panic!("unexpected layout {other:?}"),
        }
    }

    fn outline_tree() -> (Tree, Vec<NodeId>) {
        let mut tree = Tree::new("a heading");
        let root = tree.root();
        let children = ["x", "medium", "a much longer entry"]
            .into_iter()
            .map(|text| tree.add_child(root, text))
            .collect();
        (tree, children)
    }

    #[test]
    fn test_alignment_lines() {
        let own = BoundingBox::new(0.0, 0.0, 100.0, 20.0);
        assert_eq!(layout(Direction::Right, EdgeAlignment::Near, 20.0).alignment_line(&own), 20.0);
        assert_eq!(layout(Direction::Right, EdgeAlignment::Far, 20.0).alignment_line(&own), 120.0);
        assert_eq!(layout(Direction::Left, EdgeAlignment::Near, 20.0).alignment_line(&own), 80.0);
        assert_eq!(layout(Direction::Left, EdgeAlignment::Far, 20.0).alignment_line(&own), -20.0);
    }

    #[test]
    fn test_right_outline_left_edges_flush() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::per_char(8.0, 16.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, children) = outline_tree();
        let root = tree.root();

        layout(Direction::Right, EdgeAlignment::Near, 24.0)
            .apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx)
            .unwrap();

        assert_eq!(tree[root].rect(), BoundingBox::new(0.0, 0.0, 72.0, 16.0));
        for child in &children {
            assert_eq!(tree[*child].x, 24.0);
        }
        let ys: Vec<f64> = children.iter().map(|c| tree[*c].y).collect();
        assert_eq!(ys, vec![26.0, 47.0, 68.0]);
    }

    #[test]
    fn test_left_outline_right_edges_flush() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::per_char(8.0, 16.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, children) = outline_tree();
        let root = tree.root();

        layout(Direction::Left, EdgeAlignment::Near, 50.0)
            .apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx)
            .unwrap();

        let parent = tree[root].rect();
        for child in &children {
            assert_eq!(tree[*child].rect().right(), parent.x + parent.width - 50.0);
        }
        assert!(tree[root].bounding_box.contains_box(&tree[children[2]].bounding_box));
    }

    #[test]
    fn test_estimate_stacks_below_parent() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::per_char(8.0, 16.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (tree, _) = outline_tree();
        let estimate = layout(Direction::Right, EdgeAlignment::Near, 24.0)
            .estimate_node_height(&tree, tree.root(), &mut ctx)
            .unwrap();
        assert_eq!(estimate, 16.0 + 10.0 + 3.0 * 16.0 + 2.0 * 5.0);
    }
}
