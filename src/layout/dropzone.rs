//! Drop targets for reordering nodes by drag and drop

use serde::Serialize;

use crate::tree::{NodeId, Tree};

use super::strategy::Layout;
use super::types::{BoundingBox, Direction};

/// What dropping onto a zone does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropZoneKind {
    /// Insert as the previous sibling of the target
    Before,
    /// Insert as the next sibling of the target
    After,
    /// Append as the last child of the target
    AsChild,
}

/// A rectangle that accepts a dragged node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropZone {
    pub kind: DropZoneKind,
    pub target: NodeId,
    pub rect: BoundingBox,
}

/// Side of the node a strip is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    Below,
    LeftOf,
    RightOf,
}

fn strip(rect: &BoundingBox, side: Side, thickness: f64) -> BoundingBox {
    match side {
        Side::Above => BoundingBox::new(rect.x, rect.y - thickness, rect.width, thickness),
        Side::Below => BoundingBox::new(rect.x, rect.bottom(), rect.width, thickness),
        Side::LeftOf => BoundingBox::new(rect.x - thickness, rect.y, thickness, rect.height),
        Side::RightOf => BoundingBox::new(rect.right(), rect.y, thickness, rect.height),
    }
}

/// Side the node's own children grow towards
fn child_side(layout: Option<&Layout>) -> Side {
    match layout {
        Some(Layout::Horizontal(h)) if h.direction == Direction::Left => Side::LeftOf,
        Some(Layout::Vertical(v)) if v.direction == Direction::Up => Side::Above,
        Some(Layout::Vertical(_) | Layout::TapRoot(_) | Layout::Outline(_)) => Side::Below,
        _ => Side::RightOf,
    }
}

/// Drop zones around `node`, computed from the last layout pass
///
/// Zones may overlap; they are returned in priority order (the child zone
/// first), so a caller hit-testing them should take the first match. The
/// root and hidden nodes get no zones.
pub fn drop_zones(tree: &Tree, node: NodeId, padding: f64) -> Vec<DropZone> {
    let Some(parent) = tree.parent(node) else {
        return Vec::new();
    };
    let entry = &tree[node];
    if entry.width == 0.0 && entry.height == 0.0 {
        return Vec::new();
    }
    let rect = entry.rect();

    let siblings_in_row = matches!(tree[parent].layout, Some(Layout::Vertical(_)));
    let (before, after) = if siblings_in_row {
        (Side::LeftOf, Side::RightOf)
    } else {
        (Side::Above, Side::Below)
    };

    let zone = |kind, side| DropZone {
        kind,
        target: node,
        rect: strip(&rect, side, padding),
    };
    vec![
        zone(DropZoneKind::AsChild, child_side(entry.layout.as_ref())),
        zone(DropZoneKind::Before, before),
        zone(DropZoneKind::After, after),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::FixedMeasurer;
    use crate::layout::{layout_tree, LayoutConfig, LayoutType};
    use crate::style::{ConfigKey, Stylesheet};

    fn laid_out(root_layout: LayoutType) -> (Tree, NodeId) {
        let styles = Stylesheet::flat();
        let measurer = FixedMeasurer::fixed(40.0, 20.0);
        let mut tree = Tree::new("root");
        let root = tree.root();
        tree[root].set_override(ConfigKey::LayoutType, root_layout);
        let child = tree.add_child(root, "child");
        layout_tree(&mut tree, &styles, &measurer, &LayoutConfig::default(), 0.0, 0.0).unwrap();
        (tree, child)
    }

    #[test]
    fn test_root_has_no_zones() {
        let (tree, _) = laid_out(LayoutType::Horizontal);
        assert!(drop_zones(&tree, tree.root(), 5.0).is_empty());
    }

    #[test]
    fn test_column_siblings_get_zones_above_and_below() {
        let (tree, child) = laid_out(LayoutType::Horizontal);
        let rect = tree[child].rect();
        let zones = drop_zones(&tree, child, 5.0);
        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].kind, DropZoneKind::AsChild);
        assert_eq!(zones[0].rect, BoundingBox::new(rect.right(), rect.y, 5.0, 20.0));
        assert_eq!(zones[1].rect, BoundingBox::new(rect.x, rect.y - 5.0, 40.0, 5.0));
        assert_eq!(zones[2].rect, BoundingBox::new(rect.x, rect.bottom(), 40.0, 5.0));
    }

    #[test]
    fn test_row_siblings_get_zones_left_and_right() {
        let (tree, child) = laid_out(LayoutType::Vertical);
        let rect = tree[child].rect();
        let zones = drop_zones(&tree, child, 5.0);
        assert_eq!(zones[1].kind, DropZoneKind::Before);
        assert_eq!(zones[1].rect, BoundingBox::new(rect.x - 5.0, rect.y, 5.0, 20.0));
        assert_eq!(zones[2].rect, BoundingBox::new(rect.right(), rect.y, 5.0, 20.0));
    }
}
