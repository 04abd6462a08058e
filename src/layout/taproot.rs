//! TapRoot layout: two balanced columns hanging below the parent

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::{LeftColumn, RightColumn};
use super::balance::distribute_children_into_columns;
use super::connection::{distribute, edge_midpoint, Slot};
use super::error::LayoutError;
use super::strategy::{apply_at, enclose, LayoutParams, LayoutStrategy};
use super::types::{BoundingBox, ConnectionPoint, Direction, Edge, LayoutType};
use super::{begin_node, child_estimates, layout_for_node, measure_node, placed_children, LayoutContext};

/// Children split into a left and a right column on either side of a
/// vertical trunk through the parent's centre. Both columns start
/// `parent_padding` below the parent and stay top-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapRootLayout {
    pub params: LayoutParams,
}

impl TapRootLayout {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

/// True when `child` hangs in the left column of `parent`
fn in_left_column(tree: &Tree, parent: NodeId, child: NodeId) -> bool {
    tree[child].rect().center().x < tree[parent].rect().center().x
}

impl LayoutStrategy for TapRootLayout {
    fn layout_type(&self) -> LayoutType {
        LayoutType::TapRoot
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

        let estimates = child_estimates(tree, &children, ctx)?;
        let columns = distribute_children_into_columns(&estimates, self.params.child_padding);
        tracing::trace!(
            node = %tree[node].id,
            left = columns.left.len(),
            right = columns.right.len(),
            "balanced taproot columns"
        );

        let own = tree[node].rect();
        let trunk = own.center().x;
        let top = own.bottom() + self.params.parent_padding;
        let half_gap = self.params.parent_padding / 2.0;

        let mut left = LeftColumn::new(trunk - half_gap, top, self.params.child_padding);
        for index in &columns.left {
            let child = children[*index];
            let layout = layout_for_node(tree, child, ctx, Some(Direction::Left))?;
            left.add_node(tree, child, &layout, ctx)?;
        }
        left.finish();

        let mut right = RightColumn::new(trunk + half_gap, top, self.params.child_padding);
        for index in &columns.right {
            let child = children[*index];
            let layout = layout_for_node(tree, child, ctx, Some(Direction::Right))?;
            right.add_node(tree, child, &layout, ctx)?;
        }
        right.finish();

        Ok(enclose(tree, node, &children))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        _level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        // Left-column children come first among the siblings, so sibling
        // order runs left to right along the bottom edge.
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
        let rect = tree[node].rect();
        match tree.parent(node) {
            Some(parent) if in_left_column(tree, parent, node) => edge_midpoint(&rect, Edge::Right),
            _ => edge_midpoint(&rect, Edge::Left),
        }
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
        let columns = distribute_children_into_columns(&estimates, self.params.child_padding);
        Ok(own + self.params.parent_padding + columns.taller(self.params.child_padding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::{fixed_context, FixedMeasurer};
    use crate::layout::{Layout, LayoutFactory};
    use crate::style::{StyleProvider, Stylesheet};

    fn layout() -> TapRootLayout {
        match LayoutFactory::default().create_layout(LayoutType::TapRoot, 40.0, 10.0, None, None) {
            Layout::TapRoot(layout) => layout,
            other => panic!("unexpected layout {other:?}"),
        }
    }

    fn four_children() -> (Tree, Vec<NodeId>) {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let children = ["one", "two", "three", "four"]
            .into_iter()
            .map(|text| tree.add_child(root, text))
            .collect();
        (tree, children)
    }

    #[test]
    fn test_columns_hang_either_side_of_trunk() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(60.0, 20.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, children) = four_children();
        let root = tree.root();

        let bounds = layout().apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx).unwrap();

        // Trunk at root centre; columns 20 either side of it, 40 below the root
        let trunk = tree[root].rect().center().x;
        assert_eq!(tree[children[0]].rect().right(), trunk - 20.0);
        assert_eq!(tree[children[1]].rect().right(), trunk - 20.0);
        assert_eq!(tree[children[2]].x, trunk + 20.0);
        assert_eq!(tree[children[3]].x, trunk + 20.0);
        assert_eq!(tree[children[0]].y, tree[children[2]].y);
        assert_eq!(tree[children[0]].y, 60.0);
        assert_eq!(tree[children[1]].y, 90.0);
        assert_eq!(bounds, BoundingBox::new(0.0, 0.0, 160.0, 110.0));
    }

    #[test]
    fn test_connection_points_face_the_trunk() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(60.0, 20.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (mut tree, children) = four_children();
        let root = tree.root();
        let strategy = layout();
        strategy.apply_layout(&mut tree, root, 0.0, 0.0, &mut ctx).unwrap();
        let level = styles.level_style(2).unwrap();

        let start = strategy.parent_connection_point(&tree, root, &level, Some(children[0]));
        assert_eq!(start.edge, Edge::Bottom);
        assert_eq!(start.y, tree[root].rect().bottom());
        assert_eq!(strategy.child_connection_point(&tree, children[0], &level).edge, Edge::Right);
        assert_eq!(strategy.child_connection_point(&tree, children[3], &level).edge, Edge::Left);
    }

    #[test]
    fn test_estimate_uses_taller_column() {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(60.0, 20.0);
        let mut ctx = fixed_context(&styles, &measurer);
        let (tree, _) = four_children();
        let estimate = layout().estimate_node_height(&tree, tree.root(), &mut ctx).unwrap();
        assert_eq!(estimate, 20.0 + 40.0 + 50.0);
    }
}
