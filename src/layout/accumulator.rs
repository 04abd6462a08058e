//! Axis accumulators
//!
//! Each accumulator places siblings one after another along a main axis. The
//! lifecycle is `new`, then `add_node` once per child in sibling order, then
//! `finish`. Children are laid out in the relative phase at a local origin
//! and then moved as a whole so that their *bounding box* lands at the cursor;
//! the cross-axis rule decides which edge touches the accumulator's line.

use crate::tree::{NodeId, Tree};

use super::error::LayoutError;
use super::strategy::{Layout, LayoutStrategy};
use super::types::BoundingBox;
use super::LayoutContext;

/// Summary of a finished accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    /// Union of every placed bounding box, `None` when nothing was placed
    pub bounds: Option<BoundingBox>,
    /// Distance from the first box's leading edge to the last box's trailing edge
    pub main_extent: f64,
    /// Largest cross-axis size among the placed boxes
    pub cross_extent: f64,
    pub count: usize,
}

impl Run {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Main-axis bookkeeping shared by all accumulators
#[derive(Debug, Clone)]
struct Cursor {
    start: f64,
    position: f64,
    end: f64,
    gap: f64,
    cross: f64,
    bounds: Option<BoundingBox>,
    count: usize,
}

impl Cursor {
    fn new(start: f64, gap: f64) -> Self {
        Self {
            start,
            position: start,
            end: start,
            gap,
            cross: 0.0,
            bounds: None,
            count: 0,
        }
    }

    fn record(&mut self, placed: BoundingBox, main: f64, cross: f64) {
        self.end = self.position + main;
        self.position = self.end + self.gap;
        self.cross = self.cross.max(cross);
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(&placed),
            None => placed,
        });
        self.count += 1;
    }

    fn finish(self) -> Run {
        Run {
            bounds: self.bounds,
            main_extent: self.end - self.start,
            cross_extent: self.cross,
            count: self.count,
        }
    }
}

/// Lay `child` out at the local origin
fn lay_out_local(
    tree: &mut Tree,
    child: NodeId,
    layout: &Layout,
    ctx: &mut LayoutContext<'_>,
) -> Result<BoundingBox, LayoutError> {
    layout.apply_layout_relative(tree, child, 0.0, 0.0, ctx)
}

/// Move the subtree by `(dx, dy)` and return its moved bounding box
fn shift(tree: &mut Tree, child: NodeId, local: BoundingBox, dx: f64, dy: f64) -> BoundingBox {
    tree.translate_subtree(child, dx, dy);
    local.translated(dx, dy)
}

/// Children stacked downwards with their bounding boxes' left edges on a line
#[derive(Debug, Clone)]
pub struct RightColumn {
    line: f64,
    cursor: Cursor,
}

impl RightColumn {
    pub fn new(line_x: f64, top: f64, child_padding: f64) -> Self {
        Self {
            line: line_x,
            cursor: Cursor::new(top, child_padding),
        }
    }

    pub fn add_node(
        &mut self,
        tree: &mut Tree,
        child: NodeId,
        layout: &Layout,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        let local = lay_out_local(tree, child, layout, ctx)?;
        let placed = shift(
            tree,
            child,
            local,
            self.line - local.x,
            self.cursor.position - local.y,
        );
        self.cursor.record(placed, local.height, local.width);
        Ok(placed)
    }

    pub fn finish(self) -> Run {
        self.cursor.finish()
    }
}

/// Children stacked downwards with their bounding boxes' right edges on a line
#[derive(Debug, Clone)]
pub struct LeftColumn {
    line: f64,
    cursor: Cursor,
}

impl LeftColumn {
    pub fn new(line_x: f64, top: f64, child_padding: f64) -> Self {
        Self {
            line: line_x,
            cursor: Cursor::new(top, child_padding),
        }
    }

    pub fn add_node(
        &mut self,
        tree: &mut Tree,
        child: NodeId,
        layout: &Layout,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        let local = lay_out_local(tree, child, layout, ctx)?;
        let placed = shift(
            tree,
            child,
            local,
            self.line - local.right(),
            self.cursor.position - local.y,
        );
        self.cursor.record(placed, local.height, local.width);
        Ok(placed)
    }

    pub fn finish(self) -> Run {
        self.cursor.finish()
    }
}

/// Children placed left to right with their bounding boxes' top edges on a line
#[derive(Debug, Clone)]
pub struct DownRow {
    line: f64,
    cursor: Cursor,
}

impl DownRow {
    pub fn new(line_y: f64, left: f64, child_padding: f64) -> Self {
        Self {
            line: line_y,
            cursor: Cursor::new(left, child_padding),
        }
    }

    pub fn add_node(
        &mut self,
        tree: &mut Tree,
        child: NodeId,
        layout: &Layout,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        let local = lay_out_local(tree, child, layout, ctx)?;
        let placed = shift(
            tree,
            child,
            local,
            self.cursor.position - local.x,
            self.line - local.y,
        );
        self.cursor.record(placed, local.width, local.height);
        Ok(placed)
    }

    pub fn finish(self) -> Run {
        self.cursor.finish()
    }
}

/// Children placed left to right with their bounding boxes' bottom edges on a line
#[derive(Debug, Clone)]
pub struct UpRow {
    line: f64,
    cursor: Cursor,
}

impl UpRow {
    pub fn new(line_y: f64, left: f64, child_padding: f64) -> Self {
        Self {
            line: line_y,
            cursor: Cursor::new(left, child_padding),
        }
    }

    pub fn add_node(
        &mut self,
        tree: &mut Tree,
        child: NodeId,
        layout: &Layout,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        let local = lay_out_local(tree, child, layout, ctx)?;
        let placed = shift(
            tree,
            child,
            local,
            self.cursor.position - local.x,
            self.line - local.bottom(),
        );
        self.cursor.record(placed, local.width, local.height);
        Ok(placed)
    }

    pub fn finish(self) -> Run {
        self.cursor.finish()
    }
}

/// Which edge of the child's own rectangle an outline column snaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapEdge {
    Leading,
    Trailing,
}

/// Children stacked downwards with one edge of their *own* rectangle on a line
///
/// Unlike the other columns the snapped edge belongs to the child node, not
/// to its bounding box, so nested outlines stay flush whatever their width.
#[derive(Debug, Clone)]
pub struct OutlineColumn {
    line: f64,
    snap: SnapEdge,
    cursor: Cursor,
}

impl OutlineColumn {
    /// Left edges on the line
    pub fn leading(line_x: f64, top: f64, child_padding: f64) -> Self {
        Self {
            line: line_x,
            snap: SnapEdge::Leading,
            cursor: Cursor::new(top, child_padding),
        }
    }

    /// Right edges on the line
    pub fn trailing(line_x: f64, top: f64, child_padding: f64) -> Self {
        Self {
            line: line_x,
            snap: SnapEdge::Trailing,
            cursor: Cursor::new(top, child_padding),
        }
    }

    pub fn add_node(
        &mut self,
        tree: &mut Tree,
        child: NodeId,
        layout: &Layout,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        let local = lay_out_local(tree, child, layout, ctx)?;
        let own = tree[child].rect();
        let dx = match self.snap {
            SnapEdge::Leading => self.line - own.x,
            SnapEdge::Trailing => self.line - own.right(),
        };
        let placed = shift(tree, child, local, dx, self.cursor.position - local.y);
        self.cursor.record(placed, local.height, local.width);
        Ok(placed)
    }

    pub fn finish(self) -> Run {
        self.cursor.finish()
    }
}
