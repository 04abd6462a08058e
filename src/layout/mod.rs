//! Layout engine for computing node positions and sizes
//!
//! A pass sizes every visible node from its measured text, places children
//! with the strategy chosen for each node, and leaves absolute geometry and a
//! bounding box on every node of the tree.

pub mod accumulator;
pub mod balance;
pub mod classic;
pub mod config;
pub mod connection;
pub mod dropzone;
pub mod error;
pub mod horizontal;
pub mod outline;
pub mod strategy;
pub mod taproot;
pub mod types;
pub mod vertical;

pub use accumulator::Run;
pub use balance::{distribute_children_into_columns, Columns};
pub use config::{LayoutConfig, WidthPortions};
pub use dropzone::{drop_zones, DropZone, DropZoneKind};
pub use error::LayoutError;
pub use strategy::{Layout, LayoutExtra, LayoutFactory, LayoutParams, LayoutStrategy};
pub use types::*;

use crate::measure::{MeasureCache, TextMeasurer};
use crate::style::{effective, resolve, ConfigKey, ConfigValue, FromConfigValue, NodeStyle, StyleProvider};
use crate::tree::{NodeId, Tree};

/// Everything a strategy needs besides the tree
pub struct LayoutContext<'a> {
    pub styles: &'a dyn StyleProvider,
    pub measurer: &'a dyn TextMeasurer,
    pub config: LayoutConfig,
    /// Measurements of the current pass
    pub cache: MeasureCache,
    factory: LayoutFactory,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        styles: &'a dyn StyleProvider,
        measurer: &'a dyn TextMeasurer,
        config: LayoutConfig,
    ) -> Self {
        let factory = LayoutFactory::new(config.width_portions);
        Self {
            styles,
            measurer,
            config,
            cache: MeasureCache::new(),
            factory,
        }
    }

    pub fn factory(&self) -> &LayoutFactory {
        &self.factory
    }

    /// Forget measurements from earlier passes
    pub fn begin_pass(&mut self) {
        self.cache.clear();
    }
}

/// Lay out the whole tree with its bounding box's top-left corner at `(x, y)`
///
/// Applies the stylesheet's `collapseDepth` global setting first; a depth of
/// zero leaves every node expanded.
pub fn layout_tree(
    tree: &mut Tree,
    styles: &dyn StyleProvider,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
    x: f64,
    y: f64,
) -> Result<BoundingBox, LayoutError> {
    let _span = tracing::debug_span!("layout_tree", nodes = tree.len(), x, y).entered();

    let collapse_depth = styles
        .global_config("collapseDepth", ConfigValue::Number(0.0))
        .as_f64()
        .unwrap_or(0.0);
    if collapse_depth >= 1.0 {
        tree.apply_auto_collapse(collapse_depth as usize);
    }

    let mut ctx = LayoutContext::new(styles, measurer, config.clone());
    ctx.begin_pass();

    let root = tree.root();
    let layout = layout_for_node(tree, root, &ctx, None)?;
    let bounds = layout.apply_layout(tree, root, x, y, &mut ctx)?;

    tracing::debug!(
        width = bounds.width,
        height = bounds.height,
        measured = ctx.cache.misses(),
        reused = ctx.cache.hits(),
        "layout pass finished"
    );
    Ok(bounds)
}

/// Strategy that places the children of `node`
///
/// `side` is the direction the enclosing layout suggests (for example the
/// column a TapRoot child sits in). The direction resolves as: the node's own
/// or an inherited override, then `side`, then the level and global values.
/// Candidates that do not fit the strategy's axis are skipped.
pub fn layout_for_node(
    tree: &Tree,
    node: NodeId,
    ctx: &LayoutContext<'_>,
    side: Option<Direction>,
) -> Result<Layout, LayoutError> {
    let styles = ctx.styles;
    let level = styles.level_style(tree[node].level)?;

    let layout_type = effective(styles, tree, node, ConfigKey::LayoutType)?.unwrap_or(level.layout_type);
    let axis_is_horizontal = layout_type.default_direction().is_horizontal();
    let fits = |direction: &Direction| direction.is_horizontal() == axis_is_horizontal;

    let explicit = resolve(tree, node, ConfigKey::Direction, None, None)
        .map(|value| Direction::from_config_value(ConfigKey::Direction, &value))
        .transpose()?;
    let configured: Option<Direction> = effective(styles, tree, node, ConfigKey::Direction)?;
    let direction = explicit
        .filter(fits)
        .or(side.filter(fits))
        .or(configured.filter(fits));

    let parent_padding = effective(styles, tree, node, ConfigKey::ParentPadding)?.unwrap_or(level.parent_padding);
    let child_padding = effective(styles, tree, node, ConfigKey::ChildPadding)?.unwrap_or(level.child_padding);
    let extra = LayoutExtra {
        width_portion: effective(styles, tree, node, ConfigKey::WidthPortion)?.or(level.width_portion),
        connection_points: effective(styles, tree, node, ConfigKey::ConnectionPoints)?
            .unwrap_or(level.connection_points),
        edge_alignment: effective(styles, tree, node, ConfigKey::EdgeAlignment)?
            .unwrap_or(level.edge_alignment),
        horizontal_shift: effective(styles, tree, node, ConfigKey::HorizontalShift)?
            .unwrap_or(level.horizontal_shift),
    };

    Ok(ctx
        .factory()
        .create_layout(layout_type, parent_padding, child_padding, direction, Some(extra)))
}

/// Size of a node and the style it was measured with
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSize {
    pub style: NodeStyle,
    pub width: f64,
    pub height: f64,
    /// Label lines when the measurer wrapped the text
    pub lines: Vec<String>,
}

/// Measure a node without changing it
///
/// A failed text measurement is not an error: the node gets the configured
/// fallback size and a warning is logged.
pub fn measure_node(
    tree: &Tree,
    node: NodeId,
    ctx: &mut LayoutContext<'_>,
) -> Result<NodeSize, LayoutError> {
    let styles = ctx.styles;
    let style = NodeStyle::resolve(styles, tree, node)?;
    let level = styles.level_style(tree[node].level)?;
    let horizontal_padding = effective(styles, tree, node, ConfigKey::HorizontalPadding)?
        .unwrap_or(level.horizontal_padding);
    let vertical_padding = effective(styles, tree, node, ConfigKey::VerticalPadding)?
        .unwrap_or(level.vertical_padding);
    let max_width: Option<f64> = effective(styles, tree, node, ConfigKey::MaxWidth)?;

    let text = &tree[node].text;
    let (width, height, lines) = match ctx.cache.measure(ctx.measurer, text, &style.text_style(), max_width) {
        Ok(size) => (
            size.width + 2.0 * horizontal_padding,
            size.height + 2.0 * vertical_padding,
            size.lines,
        ),
        Err(err) => {
            tracing::warn!(
                node = %tree[node].id,
                text = %text,
                error = %err,
                "text measurement failed, using fallback size"
            );
            let (width, height) = ctx.config.fallback_size;
            (width, height, Vec::new())
        }
    };
    Ok(NodeSize {
        style,
        width,
        height,
        lines,
    })
}

/// Size and place the node itself at `(x, y)` and record the strategy
///
/// The bounding box starts out as the node's own rectangle. Descendants of a
/// collapsed node are hidden.
pub(crate) fn begin_node(
    tree: &mut Tree,
    node: NodeId,
    x: f64,
    y: f64,
    layout: Layout,
    ctx: &mut LayoutContext<'_>,
) -> Result<(), LayoutError> {
    let size = measure_node(tree, node, ctx)?;
    tracing::trace!(node = %tree[node].id, width = size.width, height = size.height, "sized node");

    let entry = &mut tree[node];
    entry.x = x;
    entry.y = y;
    entry.width = size.width;
    entry.height = size.height;
    entry.bounding_box = entry.rect();
    entry.style = Some(size.style);
    entry.lines = size.lines;
    entry.layout = Some(layout);

    if tree[node].collapsed {
        hide_descendants(tree, node);
    }
    Ok(())
}

/// Reset every descendant to an empty rectangle at the node's corner
fn hide_descendants(tree: &mut Tree, node: NodeId) {
    let (x, y) = (tree[node].x, tree[node].y);
    for id in tree.descendants(node).into_iter().skip(1) {
        let hidden = &mut tree[id];
        hidden.x = x;
        hidden.y = y;
        hidden.width = 0.0;
        hidden.height = 0.0;
        hidden.bounding_box = BoundingBox::new(x, y, 0.0, 0.0);
        hidden.layout = None;
    }
}

/// Children the engine places: none for collapsed nodes
pub(crate) fn placed_children(tree: &Tree, node: NodeId) -> Vec<NodeId> {
    if tree[node].collapsed {
        Vec::new()
    } else {
        tree.children(node).to_vec()
    }
}

/// Subtree height estimates of `children`, each under its own strategy
pub(crate) fn child_estimates(
    tree: &Tree,
    children: &[NodeId],
    ctx: &mut LayoutContext<'_>,
) -> Result<Vec<f64>, LayoutError> {
    children
        .iter()
        .map(|child| {
            let layout = layout_for_node(tree, *child, ctx, None)?;
            layout.estimate_node_height(tree, *child, ctx)
        })
        .collect()
}
