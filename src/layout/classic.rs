//! Classic mind map layout: balanced columns on both sides of the parent

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::{LeftColumn, RightColumn, Run};
use super::balance::distribute_children_into_columns;
use super::connection::{distribute, edge_midpoint, Slot};
use super::error::LayoutError;
use super::strategy::{apply_at, enclose, shift_children, Axis, LayoutParams, LayoutStrategy};
use super::types::{BoundingBox, ConnectionPoint, Direction, Edge, LayoutType};
use super::{begin_node, child_estimates, layout_for_node, measure_node, placed_children, LayoutContext};

/// Children balanced into a column left of the parent and one right of it,
/// each column vertically centred on the parent. Branches grow outwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicLayout {
    pub params: LayoutParams,
}

impl ClassicLayout {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

fn on_left_side(tree: &Tree, parent: NodeId, child: NodeId) -> bool {
    tree[child].rect().center().x < tree[parent].rect().center().x
}

/// Move a finished column so its centre lines up with `center_y`
fn center_column(tree: &mut Tree, members: &[NodeId], run: &Run, center_y: f64) {
    if let Some(bounds) = run.bounds {
        let dy = center_y - (bounds.y + run.main_extent / 2.0);
        if dy != 0.0 {
            shift_children(tree, members, Axis::Y, dy);
        }
    }
}

impl LayoutStrategy for ClassicLayout {
    fn layout_type(&self) -> LayoutType {
        LayoutType::Classic
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
        let own = tree[node].rect();
        let center_y = own.center().y;

        let left_members: Vec<NodeId> = columns.left.iter().map(|i| children[*i]).collect();
        let mut left = LeftColumn::new(own.x - self.params.parent_padding, own.y, self.params.child_padding);
        for child in &left_members {
            let layout = layout_for_node(tree, *child, ctx, Some(Direction::Left))?;
            left.add_node(tree, *child, &layout, ctx)?;
        }
        center_column(tree, &left_members, &left.finish(), center_y);

        let right_members: Vec<NodeId> = columns.right.iter().map(|i| children[*i]).collect();
        let mut right = RightColumn::new(own.right() + self.params.parent_padding, own.y, self.params.child_padding);
        for child in &right_members {
            let layout = layout_for_node(tree, *child, ctx, Some(Direction::Right))?;
            right.add_node(tree, *child, &layout, ctx)?;
        }
        center_column(tree, &right_members, &right.finish(), center_y);

        Ok(enclose(tree, node, &children))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        _level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        let rect = tree[node].rect();
        let Some(child) = child else {
            return edge_midpoint(&rect, Edge::Right);
        };
        let left = on_left_side(tree, node, child);
        let same_side: Vec<NodeId> = tree
            .children(node)
            .iter()
            .copied()
            .filter(|sibling| on_left_side(tree, node, *sibling) == left)
            .collect();
        let slot = Slot {
            index: same_side.iter().position(|s| *s == child).unwrap_or(0),
            count: same_side.len(),
            target: Some(tree[child].rect().center().y),
        };
        let edge = if left { Edge::Left } else { Edge::Right };
        distribute(&rect, edge, self.params.connection_points, self.params.width_portion, slot)
    }

    fn child_connection_point(&self, tree: &Tree, node: NodeId, _level_style: &LevelStyle) -> ConnectionPoint {
        let rect = tree[node].rect();
        match tree.parent(node) {
            Some(parent) if on_left_side(tree, parent, node) => edge_midpoint(&rect, Edge::Right),
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
        Ok(own.max(columns.taller(self.params.child_padding)))
    }
}
