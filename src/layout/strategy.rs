//! Layout strategy contract
//!
//! [`LayoutStrategy`] is the capability set every strategy provides. The
//! five strategies form the closed [`Layout`] enum, which implements the trait
//! by delegation; [`LayoutFactory`] is the only place strategies are built.

use crate::style::LevelStyle;
use crate::tree::{NodeId, Tree};

use super::accumulator::Run;
use super::classic::ClassicLayout;
use super::config::WidthPortions;
use super::error::LayoutError;
use super::horizontal::HorizontalLayout;
use super::outline::OutlineLayout;
use super::taproot::TapRootLayout;
use super::types::{
    BoundingBox, ConnectionPoint, ConnectionPointMode, Direction, EdgeAlignment, LayoutType,
    NodeType,
};
use super::vertical::VerticalLayout;
use super::LayoutContext;

/// Operations shared by all layout strategies
pub trait LayoutStrategy {
    fn layout_type(&self) -> LayoutType;

    /// Lay out the subtree so its bounding box's top-left corner is at `(x, y)`
    fn apply_layout(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError>;

    /// Lay out the subtree with the node's own rectangle starting at `(x, y)`
    /// before centring, without moving the result into place
    fn apply_layout_relative(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError>;

    /// Where the connector towards `child` leaves `node`
    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint;

    /// Where the connector from the parent arrives at `node`
    fn child_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        level_style: &LevelStyle,
    ) -> ConnectionPoint;

    /// Height the subtree is expected to need, used for column balancing
    fn estimate_node_height(
        &self,
        tree: &Tree,
        node: NodeId,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<f64, LayoutError>;
}

/// Spacing and connector settings common to every strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Gap between a node and its children
    pub parent_padding: f64,
    /// Gap between siblings
    pub child_padding: f64,
    pub connection_points: ConnectionPointMode,
    pub width_portion: f64,
}

/// Optional strategy parameters passed to the factory
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutExtra {
    /// `None` selects the per-layout-type default
    pub width_portion: Option<f64>,
    pub connection_points: ConnectionPointMode,
    pub edge_alignment: EdgeAlignment,
    pub horizontal_shift: f64,
}

/// One of the five layout strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Horizontal(HorizontalLayout),
    Vertical(VerticalLayout),
    TapRoot(TapRootLayout),
    Classic(ClassicLayout),
    Outline(OutlineLayout),
}

macro_rules! delegate {
    ($layout:expr, $strategy:ident => $call:expr) => {
        match $layout {
            Layout::Horizontal($strategy) => $call,
            Layout::Vertical($strategy) => $call,
            Layout::TapRoot($strategy) => $call,
            Layout::Classic($strategy) => $call,
            Layout::Outline($strategy) => $call,
        }
    };
}

impl Layout {
    pub fn params(&self) -> &LayoutParams {
        delegate!(self, s => &s.params)
    }

    /// Growth direction, for the strategies that have one
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Layout::Horizontal(s) => Some(s.direction),
            Layout::Vertical(s) => Some(s.direction),
            Layout::Outline(s) => Some(s.direction),
            Layout::TapRoot(_) | Layout::Classic(_) => None,
        }
    }
}

impl LayoutStrategy for Layout {
    fn layout_type(&self) -> LayoutType {
        delegate!(self, s => s.layout_type())
    }

    fn apply_layout(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        delegate!(self, s => s.apply_layout(tree, node, x, y, ctx))
    }

    fn apply_layout_relative(
        &self,
        tree: &mut Tree,
        node: NodeId,
        x: f64,
        y: f64,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<BoundingBox, LayoutError> {
        delegate!(self, s => s.apply_layout_relative(tree, node, x, y, ctx))
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        level_style: &LevelStyle,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        delegate!(self, s => s.parent_connection_point(tree, node, level_style, child))
    }

    fn child_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        level_style: &LevelStyle,
    ) -> ConnectionPoint {
        delegate!(self, s => s.child_connection_point(tree, node, level_style))
    }

    fn estimate_node_height(
        &self,
        tree: &Tree,
        node: NodeId,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<f64, LayoutError> {
        delegate!(self, s => s.estimate_node_height(tree, node, ctx))
    }
}

macro_rules! into_layout {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Layout {
                fn from(strategy: $ty) -> Self {
                    Layout::$variant(strategy)
                }
            }
        )*
    };
}

into_layout!(
    Horizontal(HorizontalLayout),
    Vertical(VerticalLayout),
    TapRoot(TapRootLayout),
    Classic(ClassicLayout),
    Outline(OutlineLayout)
);

/// Builds strategies from a type and its parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutFactory {
    width_portions: WidthPortions,
}

impl LayoutFactory {
    pub fn new(width_portions: WidthPortions) -> Self {
        Self { width_portions }
    }

    /// Build a strategy
    ///
    /// A direction that does not fit the strategy's axis (for example `up`
    /// for a horizontal layout) is replaced by the strategy's default.
    pub fn create_layout(
        &self,
        layout_type: LayoutType,
        parent_padding: f64,
        child_padding: f64,
        direction: Option<Direction>,
        extra: Option<LayoutExtra>,
    ) -> Layout {
        let extra = extra.unwrap_or_default();
        let params = LayoutParams {
            parent_padding,
            child_padding,
            connection_points: extra.connection_points,
            width_portion: extra
                .width_portion
                .unwrap_or_else(|| self.width_portions.get(layout_type)),
        };
        let horizontal = direction
            .filter(|d| d.is_horizontal())
            .unwrap_or(Direction::Right);
        let vertical = direction
            .filter(|d| !d.is_horizontal())
            .unwrap_or(Direction::Down);

        match layout_type {
            LayoutType::Horizontal => HorizontalLayout::new(params, horizontal).into(),
            LayoutType::Vertical => VerticalLayout::new(params, vertical).into(),
            LayoutType::TapRoot => TapRootLayout::new(params).into(),
            LayoutType::Classic => ClassicLayout::new(params).into(),
            LayoutType::Outline => OutlineLayout::new(
                params,
                horizontal,
                extra.edge_alignment,
                extra.horizontal_shift,
            )
            .into(),
        }
    }

    /// Build a strategy from its textual tag
    pub fn create_layout_from_tag(
        &self,
        tag: &str,
        parent_padding: f64,
        child_padding: f64,
        direction: Option<Direction>,
        extra: Option<LayoutExtra>,
    ) -> Result<Layout, LayoutError> {
        let layout_type: LayoutType = tag.parse()?;
        Ok(self.create_layout(layout_type, parent_padding, child_padding, direction, extra))
    }
}

/// Shared implementation of `apply_layout`: relative pass at the origin, then
/// one translation of the whole subtree
pub(crate) fn apply_at<S: LayoutStrategy + ?Sized>(
    strategy: &S,
    tree: &mut Tree,
    node: NodeId,
    x: f64,
    y: f64,
    ctx: &mut LayoutContext<'_>,
) -> Result<BoundingBox, LayoutError> {
    let local = strategy.apply_layout_relative(tree, node, 0.0, 0.0, ctx)?;
    tree.translate_subtree(node, x - local.x, y - local.y);
    Ok(tree[node].bounding_box)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// Centre the node and its placed children on a shared line along `axis`
///
/// Whichever of the two is smaller along `axis` moves by the difference of
/// the centres, which is half the size difference when both start together.
pub(crate) fn center_with_run(tree: &mut Tree, node: NodeId, children: &[NodeId], run: &Run, axis: Axis) {
    let Some(bounds) = run.bounds else {
        return;
    };
    let own = tree[node].rect();
    let (own_start, own_size, run_start) = match axis {
        Axis::X => (own.x, own.width, bounds.x),
        Axis::Y => (own.y, own.height, bounds.y),
    };
    let delta = (run_start + run.main_extent / 2.0) - (own_start + own_size / 2.0);
    if delta == 0.0 {
        return;
    }
    if run.main_extent > own_size {
        match axis {
            Axis::X => tree[node].x += delta,
            Axis::Y => tree[node].y += delta,
        }
    } else {
        shift_children(tree, children, axis, -delta);
    }
}

/// Move each child subtree by `amount` along `axis`
pub(crate) fn shift_children(tree: &mut Tree, children: &[NodeId], axis: Axis, amount: f64) {
    for child in children {
        match axis {
            Axis::X => tree.translate_subtree(*child, amount, 0.0),
            Axis::Y => tree.translate_subtree(*child, 0.0, amount),
        }
    }
}

/// Recompute the node's bounding box from its rectangle and its children's boxes
pub(crate) fn enclose(tree: &mut Tree, node: NodeId, children: &[NodeId]) -> BoundingBox {
    let bounds = children
        .iter()
        .fold(tree[node].rect(), |acc, child| acc.union(&tree[*child].bounding_box));
    tree[node].bounding_box = bounds;
    bounds
}

/// Node type from the node's style snapshot, else from its level
pub(crate) fn node_type_of(tree: &Tree, node: NodeId, level_style: &LevelStyle) -> NodeType {
    tree[node]
        .style
        .as_ref()
        .map(|style| style.node_type)
        .unwrap_or(level_style.node_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_each_type() {
        let factory = LayoutFactory::default();
        for layout_type in LayoutType::ALL {
            let layout = factory.create_layout(layout_type, 40.0, 10.0, None, None);
            assert_eq!(layout.layout_type(), layout_type);
            assert_eq!(layout.params().parent_padding, 40.0);
            assert_eq!(layout.params().child_padding, 10.0);
        }
    }

    #[test]
    fn test_factory_width_portion_defaults_per_type() {
        let factory = LayoutFactory::default();
        let vertical = factory.create_layout(LayoutType::Vertical, 0.0, 0.0, None, None);
        let taproot = factory.create_layout(LayoutType::TapRoot, 0.0, 0.0, None, None);
        assert_eq!(vertical.params().width_portion, 0.75);
        assert_eq!(taproot.params().width_portion, 0.4);

        let extra = LayoutExtra {
            width_portion: Some(0.3),
            ..LayoutExtra::default()
        };
        let explicit = factory.create_layout(LayoutType::TapRoot, 0.0, 0.0, None, Some(extra));
        assert_eq!(explicit.params().width_portion, 0.3);
    }

    #[test]
    fn test_factory_normalizes_direction() {
        let factory = LayoutFactory::default();
        let layout = factory.create_layout(LayoutType::Horizontal, 0.0, 0.0, Some(Direction::Up), None);
        assert_eq!(layout.direction(), Some(Direction::Right));
        let layout = factory.create_layout(LayoutType::Vertical, 0.0, 0.0, Some(Direction::Up), None);
        assert_eq!(layout.direction(), Some(Direction::Up));
        let layout = factory.create_layout(LayoutType::Classic, 0.0, 0.0, Some(Direction::Left), None);
        assert_eq!(layout.direction(), None);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let result = LayoutFactory::default().create_layout_from_tag("radial", 0.0, 0.0, None, None);
        assert_eq!(result, Err(LayoutError::unknown_layout_type("radial")));
        let layout = LayoutFactory::default()
            .create_layout_from_tag("outline", 0.0, 0.0, Some(Direction::Left), None)
            .unwrap();
        assert_eq!(layout.layout_type(), LayoutType::Outline);
        assert_eq!(layout.direction(), Some(Direction::Left));
    }
}
