//! Connection point placement along a node edge

use super::types::{BoundingBox, ConnectionPoint, ConnectionPointMode, Edge};

/// Which connector of a parent is being placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Position of the child among the siblings sharing the edge
    pub index: usize,
    /// Number of siblings sharing the edge
    pub count: usize,
    /// Child centre coordinate along the edge (x for top/bottom, y for left/right)
    pub target: Option<f64>,
}

impl Slot {
    /// A slot with no sibling information; always resolves to the edge midpoint
    pub fn lone() -> Self {
        Self {
            index: 0,
            count: 1,
            target: None,
        }
    }
}

/// Start and end coordinate of `edge` along its own axis
fn edge_span(rect: &BoundingBox, edge: Edge) -> (f64, f64) {
    if edge.is_horizontal() {
        (rect.x, rect.right())
    } else {
        (rect.y, rect.bottom())
    }
}

/// The point at `along` on `edge`, clamped to the edge
pub fn point_on_edge(rect: &BoundingBox, edge: Edge, along: f64) -> ConnectionPoint {
    let (start, end) = edge_span(rect, edge);
    let along = along.clamp(start, end);
    match edge {
        Edge::Top => ConnectionPoint::new(along, rect.y, edge),
        Edge::Bottom => ConnectionPoint::new(along, rect.bottom(), edge),
        Edge::Left => ConnectionPoint::new(rect.x, along, edge),
        Edge::Right => ConnectionPoint::new(rect.right(), along, edge),
    }
}

pub fn edge_midpoint(rect: &BoundingBox, edge: Edge) -> ConnectionPoint {
    let (start, end) = edge_span(rect, edge);
    point_on_edge(rect, edge, start + (end - start) / 2.0)
}

/// Place a parent-side connection point according to `mode`
///
/// `width_portion` is the usable fraction of the edge: evenly distributed
/// points spread across it, and points following the child centre are kept
/// out of the `(1 - width_portion) / 2` margin at each end.
pub fn distribute(
    rect: &BoundingBox,
    edge: Edge,
    mode: ConnectionPointMode,
    width_portion: f64,
    slot: Slot,
) -> ConnectionPoint {
    let (start, end) = edge_span(rect, edge);
    let extent = end - start;
    let portion = width_portion.clamp(0.0, 1.0);

    match mode {
        ConnectionPointMode::Single => edge_midpoint(rect, edge),
        ConnectionPointMode::DistributedRelativeToParentSize => match slot.target {
            Some(target) => {
                let margin = extent * (1.0 - portion) / 2.0;
                point_on_edge(rect, edge, target.clamp(start + margin, end - margin))
            }
            None => edge_midpoint(rect, edge),
        },
        ConnectionPointMode::DistributeEvenly => {
            if slot.count <= 1 {
                return edge_midpoint(rect, edge);
            }
            let usable = extent * portion;
            let first = start + (extent - usable) / 2.0;
            let index = slot.index.min(slot.count - 1);
            let along = first + usable * index as f64 / (slot.count - 1) as f64;
            point_on_edge(rect, edge, along)
        }
    }
}

/// True when `point` lies on `edge` of `rect`
pub fn lies_on_edge(rect: &BoundingBox, point: &ConnectionPoint) -> bool {
    let (start, end) = edge_span(rect, point.edge);
    match point.edge {
        Edge::Top => point.y == rect.y && (start..=end).contains(&point.x),
        Edge::Bottom => point.y == rect.bottom() && (start..=end).contains(&point.x),
        Edge::Left => point.x == rect.x && (start..=end).contains(&point.y),
        Edge::Right => point.x == rect.right() && (start..=end).contains(&point.y),
    }
}
