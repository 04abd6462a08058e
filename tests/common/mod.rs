//! Shared fixtures for the integration tests
#![allow(dead_code)]

use mindmap_layout::layout::{ConnectionPointMode, Direction, LayoutType};
use mindmap_layout::measure::{MeasureError, TextMeasurer, TextSize, TextStyle};
use mindmap_layout::style::stylesheet::StyleSettings;
use mindmap_layout::{NodeId, Stylesheet, Tree};

/// Measurer returning predictable sizes instead of font metrics
pub struct StubMeasurer {
    char_width: f64,
    width: Option<f64>,
    height: f64,
}

impl StubMeasurer {
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            char_width: 0.0,
            width: Some(width),
            height,
        }
    }

    pub fn per_char(char_width: f64, height: f64) -> Self {
        Self {
            char_width,
            width: None,
            height,
        }
    }
}

impl TextMeasurer for StubMeasurer {
    fn measure(&self, text: &str, _: &TextStyle, _: Option<f64>) -> Result<TextSize, MeasureError> {
        let width = self
            .width
            .unwrap_or(text.chars().count() as f64 * self.char_width);
        Ok(TextSize::new(width, self.height))
    }
}

/// One level for every depth, no node padding
pub fn single_level(layout_type: LayoutType, parent_padding: f64, child_padding: f64) -> Stylesheet {
    let mut sheet = Stylesheet::empty();
    sheet.set_level(
        1,
        StyleSettings {
            horizontal_padding: Some(0.0),
            vertical_padding: Some(0.0),
            parent_padding: Some(parent_padding),
            child_padding: Some(child_padding),
            layout_type: Some(layout_type),
            connection_points: Some(ConnectionPointMode::DistributeEvenly),
            ..StyleSettings::default()
        },
    );
    sheet
}

/// One style per depth: `levels[0]` for the root, the last entry for every
/// deeper level
pub fn per_level(levels: &[(LayoutType, Option<Direction>)], mode: ConnectionPointMode) -> Stylesheet {
    let mut sheet = Stylesheet::empty();
    for (i, (layout_type, direction)) in levels.iter().enumerate() {
        sheet.set_level(
            i + 1,
            StyleSettings {
                horizontal_padding: Some(4.0),
                vertical_padding: Some(2.0),
                parent_padding: Some(24.0),
                child_padding: Some(8.0),
                layout_type: Some(*layout_type),
                direction: *direction,
                connection_points: Some(mode),
                ..StyleSettings::default()
            },
        );
    }
    sheet
}

/// Directions a strategy can grow in, plus `None` for its default
pub fn directions_for(layout_type: LayoutType) -> Vec<Option<Direction>> {
    match layout_type {
        LayoutType::Horizontal | LayoutType::Outline => vec![None, Some(Direction::Right), Some(Direction::Left)],
        LayoutType::Vertical => vec![None, Some(Direction::Down), Some(Direction::Up)],
        LayoutType::TapRoot | LayoutType::Classic => vec![None],
    }
}

/// Three levels deep, uneven fan-out, text of varying length
pub fn uneven_tree() -> Tree {
    let mut tree = Tree::new("central topic");
    let root = tree.root();
    let texts = ["alpha", "b", "a rather long branch", "delta", "epsilon"];
    for (i, text) in texts.iter().enumerate() {
        let branch = tree.add_child(root, *text);
        for j in 0..i {
            let leaf = tree.add_child(branch, format!("{text} {j}"));
            if j % 2 == 1 {
                tree.add_child(leaf, "deep");
            }
        }
    }
    tree
}

/// Every reachable node in pre-order
pub fn all_nodes(tree: &Tree) -> Vec<NodeId> {
    tree.descendants(tree.root())
}
