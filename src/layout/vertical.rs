//! Vertical layout: children in one row below or above the parent

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::{DownRow, Run, UpRow};
use super::connection::{distribute, edge_midpoint, Slot};
use super::error::LayoutError;
use super::strategy::{apply_at, center_with_run, enclose, Axis, LayoutParams, LayoutStrategy};
use super::types::{BoundingBox, ConnectionPoint, Direction, Edge, LayoutType};
use super::{begin_node, child_estimates, layout_for_node, measure_node, placed_children, LayoutContext};

/// Children side by side below (or above) the parent, horizontally centred on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalLayout {
    pub params: LayoutParams,
    /// `Down` or `Up`
    pub direction: Direction,
}

impl VerticalLayout {
    pub fn new(params: LayoutParams, direction: Direction) -> Self {
        Self { params, direction }
    }

    fn grows_up(&self) -> bool {
        self.direction == Direction::Up
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
        if self.grows_up() {
            let mut row = UpRow::new(own.y - self.params.parent_padding, own.x, gap);
            for child in children {
                let layout = layout_for_node(tree, *child, ctx, Some(self.direction))?;
                row.add_node(tree, *child, &layout, ctx)?;
            }
            Ok(row.finish())
        } else {
            let mut row = DownRow::new(own.bottom() + self.params.parent_padding, own.x, gap);
            for child in children {
                let layout = layout_for_node(tree, *child, ctx, Some(self.direction))?;
                row.add_node(tree, *child, &layout, ctx)?;
            }
            Ok(row.finish())
        }
    }
}

impl LayoutStrategy for VerticalLayout {
    fn layout_type(&self) -> LayoutType {
        LayoutType::Vertical
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
        center_with_run(tree, node, &children, &run, Axis::X);
        Ok(enclose(tree, node, &children))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        _level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        let edge = if self.grows_up() { Edge::Top } else { Edge::Bottom };
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
            edge,
            self.params.connection_points,
            self.params.width_portion,
            slot,
        )
    }

    fn child_connection_point(&self, tree: &Tree, node: NodeId, _level_style: &LevelStyle) -> ConnectionPoint {
        let edge = if self.grows_up() { Edge::Bottom } else { Edge::Top };
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
        let tallest = child_estimates(tree, &children, ctx)?
            .into_iter()
            .fold(0.0, f64::max);
        Ok(own + self.params.parent_padding + tallest)
    }
}
