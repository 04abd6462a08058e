//! Core types for the layout engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle: a node's own box or the extent of a subtree
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box contains a point (edges included)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if `other` lies entirely inside this box (edges included)
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this bounding box intersects another
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// The same rectangle moved by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Side of a node's rectangle a connector leaves from or arrives at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// True for the top and bottom edges, which run along the x axis
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// Where a connector line attaches to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionPoint {
    pub x: f64,
    pub y: f64,
    pub edge: Edge,
}

impl ConnectionPoint {
    pub fn new(x: f64, y: f64, edge: Edge) -> Self {
        Self { x, y, edge }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The five layout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Horizontal,
    Vertical,
    #[serde(rename = "taproot")]
    TapRoot,
    Classic,
    Outline,
}

impl LayoutType {
    pub const ALL: [LayoutType; 5] = [
        LayoutType::Horizontal,
        LayoutType::Vertical,
        LayoutType::TapRoot,
        LayoutType::Classic,
        LayoutType::Outline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Horizontal => "horizontal",
            LayoutType::Vertical => "vertical",
            LayoutType::TapRoot => "taproot",
            LayoutType::Classic => "classic",
            LayoutType::Outline => "outline",
        }
    }

    /// Direction used when neither an override nor the level sets one
    pub fn default_direction(&self) -> Direction {
        match self {
            LayoutType::Vertical | LayoutType::TapRoot => Direction::Down,
            LayoutType::Horizontal | LayoutType::Classic | LayoutType::Outline => Direction::Right,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(LayoutType::Horizontal),
            "vertical" => Ok(LayoutType::Vertical),
            "taproot" | "tap-root" => Ok(LayoutType::TapRoot),
            "classic" | "mindmap" => Ok(LayoutType::Classic),
            "outline" => Ok(LayoutType::Outline),
            _ => Err(LayoutError::unknown_layout_type(s)),
        }
    }
}

/// Growth direction of a layout's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            "down" => Ok(Direction::Down),
            "up" => Ok(Direction::Up),
            _ => Err(LayoutError::invalid_value("direction", s, "expected right, left, down or up")),
        }
    }
}

/// How connector attach points are spread along a parent's edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionPointMode {
    /// Always the edge midpoint
    #[default]
    #[serde(rename = "single")]
    Single,
    /// Follows the child's center, clamped to the usable portion of the edge
    #[serde(rename = "distributedRelativeToParentSize")]
    DistributedRelativeToParentSize,
    /// Evenly spaced across the usable portion, by sibling index
    #[serde(rename = "distributeEvenly")]
    DistributeEvenly,
}

impl ConnectionPointMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionPointMode::Single => "single",
            ConnectionPointMode::DistributedRelativeToParentSize => {
                "distributedRelativeToParentSize"
            }
            ConnectionPointMode::DistributeEvenly => "distributeEvenly",
        }
    }
}

impl FromStr for ConnectionPointMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single" => Ok(ConnectionPointMode::Single),
            "distributedRelativeToParentSize" => {
                Ok(ConnectionPointMode::DistributedRelativeToParentSize)
            }
            "distributeEvenly" => Ok(ConnectionPointMode::DistributeEvenly),
            _ => Err(LayoutError::invalid_value(
                "connectionPoints",
                s,
                "expected single, distributedRelativeToParentSize or distributeEvenly",
            )),
        }
    }
}

/// Which parent edge an outline's alignment line is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeAlignment {
    #[default]
    Near,
    Far,
}

impl FromStr for EdgeAlignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "near" => Ok(EdgeAlignment::Near),
            "far" => Ok(EdgeAlignment::Far),
            _ => Err(LayoutError::invalid_value("edgeAlignment", s, "expected near or far")),
        }
    }
}

/// Visual kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Box,
    Text,
}

impl FromStr for NodeType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(NodeType::Box),
            "text" => Ok(NodeType::Text),
            _ => Err(LayoutError::invalid_value("nodeType", s, "expected box or text")),
        }
    }
}
