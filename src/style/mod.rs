//! Style resolution
//!
//! The layout engine never reads configuration straight off a node. It asks a
//! [`StyleProvider`] for the level defaults and for the *effective* value of a
//! key, which the provider resolves with a three-tier cascade:
//!
//! 1. the node's own override (or, for inherited keys, the nearest ancestor's)
//! 2. the value set for the node's level
//! 3. the global default
//!
//! [`resolve`] implements that cascade as a pure function so every provider
//! shares the same precedence rules.

pub mod stylesheet;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::error::LayoutError;
use crate::layout::types::{
    ConnectionPointMode, Direction, EdgeAlignment, LayoutType, NodeType,
};
use crate::measure::TextStyle;
use crate::tree::{NodeId, Tree};

pub use stylesheet::{Stylesheet, StylesheetError};

/// Query interface the layout engine consumes
pub trait StyleProvider {
    /// Fully resolved parameters for a depth level; fails when the level has no style
    fn level_style(&self, level: usize) -> Result<LevelStyle, LayoutError>;

    /// Value the level itself sets for `key`, without the global tier
    fn level_value(&self, level: usize, key: ConfigKey) -> Result<Option<ConfigValue>, LayoutError>;

    /// Global default for `key`
    fn default_value(&self, key: ConfigKey) -> Option<ConfigValue>;

    /// Provider-wide setting that is not tied to a level
    fn global_config(&self, key: &str, default: ConfigValue) -> ConfigValue;

    /// Cascade-resolved value of `key` for `node`
    fn effective_value(
        &self,
        tree: &Tree,
        node: NodeId,
        key: ConfigKey,
    ) -> Result<Option<ConfigValue>, LayoutError> {
        let level = self.level_value(tree[node].level, key)?;
        Ok(resolve(tree, node, key, level, self.default_value(key)))
    }
}

/// Three-tier lookup: node override, then level value, then global default
pub fn resolve(
    tree: &Tree,
    node: NodeId,
    key: ConfigKey,
    level_value: Option<ConfigValue>,
    global_value: Option<ConfigValue>,
) -> Option<ConfigValue> {
    if let Some(value) = tree[node].overrides.get(&key) {
        return Some(value.clone());
    }
    if key.inherits() {
        let inherited = tree
            .ancestors(node)
            .find_map(|ancestor| tree[ancestor].overrides.get(&key));
        if let Some(value) = inherited {
            return Some(value.clone());
        }
    }
    level_value.or(global_value)
}

/// Typed cascade lookup
pub fn effective<T: FromConfigValue>(
    styles: &dyn StyleProvider,
    tree: &Tree,
    node: NodeId,
    key: ConfigKey,
) -> Result<Option<T>, LayoutError> {
    styles
        .effective_value(tree, node, key)?
        .map(|value| T::from_config_value(key, &value))
        .transpose()
}

/// Configuration keys understood by the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigKey {
    LayoutType,
    Direction,
    ParentPadding,
    ChildPadding,
    HorizontalPadding,
    VerticalPadding,
    FontFamily,
    FontSize,
    FontWeight,
    NodeType,
    ConnectionPoints,
    WidthPortion,
    EdgeAlignment,
    HorizontalShift,
    MaxWidth,
    Fill,
    Stroke,
    StrokeWidth,
    TextColor,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 19] = [
        ConfigKey::LayoutType,
        ConfigKey::Direction,
        ConfigKey::ParentPadding,
        ConfigKey::ChildPadding,
        ConfigKey::HorizontalPadding,
        ConfigKey::VerticalPadding,
        ConfigKey::FontFamily,
        ConfigKey::FontSize,
        ConfigKey::FontWeight,
        ConfigKey::NodeType,
        ConfigKey::ConnectionPoints,
        ConfigKey::WidthPortion,
        ConfigKey::EdgeAlignment,
        ConfigKey::HorizontalShift,
        ConfigKey::MaxWidth,
        ConfigKey::Fill,
        ConfigKey::Stroke,
        ConfigKey::StrokeWidth,
        ConfigKey::TextColor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LayoutType => "layoutType",
            ConfigKey::Direction => "direction",
            ConfigKey::ParentPadding => "parentPadding",
            ConfigKey::ChildPadding => "childPadding",
            ConfigKey::HorizontalPadding => "horizontalPadding",
            ConfigKey::VerticalPadding => "verticalPadding",
            ConfigKey::FontFamily => "fontFamily",
            ConfigKey::FontSize => "fontSize",
            ConfigKey::FontWeight => "fontWeight",
            ConfigKey::NodeType => "nodeType",
            ConfigKey::ConnectionPoints => "connectionPoints",
            ConfigKey::WidthPortion => "widthPortion",
            ConfigKey::EdgeAlignment => "edgeAlignment",
            ConfigKey::HorizontalShift => "horizontalShift",
            ConfigKey::MaxWidth => "maxWidth",
            ConfigKey::Fill => "fill",
            ConfigKey::Stroke => "stroke",
            ConfigKey::StrokeWidth => "strokeWidth",
            ConfigKey::TextColor => "textColor",
        }
    }

    /// Keys whose overrides apply to the whole subtree below the node
    pub fn inherits(&self) -> bool {
        matches!(self, ConfigKey::Direction)
    }

    /// Validate a raw textual value (as written in an outline) for this key
    pub fn parse_value(&self, raw: &str) -> Result<ConfigValue, LayoutError> {
        let raw = raw.trim();
        let value = match self {
            ConfigKey::ParentPadding
            | ConfigKey::ChildPadding
            | ConfigKey::HorizontalPadding
            | ConfigKey::VerticalPadding
            | ConfigKey::FontSize
            | ConfigKey::HorizontalShift
            | ConfigKey::MaxWidth
            | ConfigKey::StrokeWidth
            | ConfigKey::WidthPortion => {
                let number: f64 = raw
                    .parse()
                    .map_err(|_| LayoutError::invalid_value(self.name(), raw, "expected a number"))?;
                ConfigValue::Number(self.check_number(number)?)
            }
            ConfigKey::LayoutType => ConfigValue::Text(raw.parse::<LayoutType>()?.as_str().into()),
            ConfigKey::Direction => ConfigValue::Text(raw.parse::<Direction>()?.as_str().into()),
            ConfigKey::ConnectionPoints => {
                ConfigValue::Text(raw.parse::<ConnectionPointMode>()?.as_str().into())
            }
            ConfigKey::EdgeAlignment => {
                raw.parse::<EdgeAlignment>()?;
                ConfigValue::Text(raw.to_ascii_lowercase())
            }
            ConfigKey::NodeType => {
                raw.parse::<NodeType>()?;
                ConfigValue::Text(raw.to_ascii_lowercase())
            }
            ConfigKey::FontFamily
            | ConfigKey::FontWeight
            | ConfigKey::Fill
            | ConfigKey::Stroke
            | ConfigKey::TextColor => ConfigValue::Text(raw.trim_matches('"').to_string()),
        };
        Ok(value)
    }

    /// Range check for numeric keys; every number must be finite
    pub fn check_number(&self, n: f64) -> Result<f64, LayoutError> {
        let problem = match self {
            _ if !n.is_finite() => Some("must be a finite number"),
            ConfigKey::FontSize if n <= 0.0 => Some("must be positive"),
            ConfigKey::ParentPadding
            | ConfigKey::ChildPadding
            | ConfigKey::HorizontalPadding
            | ConfigKey::VerticalPadding
            | ConfigKey::MaxWidth
            | ConfigKey::StrokeWidth
                if n < 0.0 =>
            {
                Some("must not be negative")
            }
            ConfigKey::WidthPortion if !(0.0..=1.0).contains(&n) => Some("must be within 0..=1"),
            _ => None,
        };
        match problem {
            Some(reason) => Err(LayoutError::invalid_value(self.name(), n.to_string(), reason)),
            None => Ok(n),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LayoutError::unknown_key(trimmed))
    }
}

/// A configuration value as stored in overrides and stylesheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<LayoutType> for ConfigValue {
    fn from(value: LayoutType) -> Self {
        ConfigValue::Text(value.as_str().to_string())
    }
}

impl From<Direction> for ConfigValue {
    fn from(value: Direction) -> Self {
        ConfigValue::Text(value.as_str().to_string())
    }
}

impl From<ConnectionPointMode> for ConfigValue {
    fn from(value: ConnectionPointMode) -> Self {
        ConfigValue::Text(value.as_str().to_string())
    }
}

impl From<EdgeAlignment> for ConfigValue {
    fn from(value: EdgeAlignment) -> Self {
        ConfigValue::Text(
            match value {
                EdgeAlignment::Near => "near",
                EdgeAlignment::Far => "far",
            }
            .to_string(),
        )
    }
}

impl From<NodeType> for ConfigValue {
    fn from(value: NodeType) -> Self {
        ConfigValue::Text(
            match value {
                NodeType::Box => "box",
                NodeType::Text => "text",
            }
            .to_string(),
        )
    }
}

/// Conversion from a stored value into the type a key holds
pub trait FromConfigValue: Sized {
    fn from_config_value(key: ConfigKey, value: &ConfigValue) -> Result<Self, LayoutError>;
}

impl FromConfigValue for f64 {
    fn from_config_value(key: ConfigKey, value: &ConfigValue) -> Result<Self, LayoutError> {
        value
            .as_f64()
            .ok_or_else(|| LayoutError::invalid_value(key.name(), value.to_string(), "expected a number"))
    }
}

impl FromConfigValue for String {
    fn from_config_value(key: ConfigKey, value: &ConfigValue) -> Result<Self, LayoutError> {
        match value {
            ConfigValue::Text(s) => Ok(s.clone()),
            ConfigValue::Number(n) => Ok(n.to_string()),
            ConfigValue::Bool(_) => Err(LayoutError::invalid_value(
                key.name(),
                value.to_string(),
                "expected text",
            )),
        }
    }
}

macro_rules! parsed_config_value {
    ($($ty:ty),*) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(key: ConfigKey, value: &ConfigValue) -> Result<Self, LayoutError> {
                    match value {
                        ConfigValue::Text(s) => s.parse(),
                        _ => Err(LayoutError::invalid_value(key.name(), value.to_string(), "expected text")),
                    }
                }
            }
        )*
    };
}

parsed_config_value!(LayoutType, Direction, ConnectionPointMode, EdgeAlignment, NodeType);

/// Fully resolved parameters of one depth level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub horizontal_padding: f64,
    pub vertical_padding: f64,
    /// Gap between a node and its children
    pub parent_padding: f64,
    /// Gap between siblings
    pub child_padding: f64,
    pub layout_type: LayoutType,
    pub direction: Option<Direction>,
    pub node_type: NodeType,
    pub connection_points: ConnectionPointMode,
    /// Usable fraction of a parent's edge; `None` means the per-layout default
    pub width_portion: Option<f64>,
    pub edge_alignment: EdgeAlignment,
    pub horizontal_shift: f64,
    pub max_width: Option<f64>,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub text_color: String,
}

impl LevelStyle {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight.clone(),
        }
    }
}

/// Visual style of a node, snapshotted for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub node_type: NodeType,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub text_color: String,
}

impl NodeStyle {
    /// Resolve every visual key for `node` through the cascade
    pub fn resolve(styles: &dyn StyleProvider, tree: &Tree, node: NodeId) -> Result<Self, LayoutError> {
        let level = styles.level_style(tree[node].level)?;
        Ok(Self {
            font_family: effective(styles, tree, node, ConfigKey::FontFamily)?
                .unwrap_or(level.font_family),
            font_size: effective(styles, tree, node, ConfigKey::FontSize)?.unwrap_or(level.font_size),
            font_weight: effective(styles, tree, node, ConfigKey::FontWeight)?
                .unwrap_or(level.font_weight),
            node_type: effective(styles, tree, node, ConfigKey::NodeType)?.unwrap_or(level.node_type),
            fill: effective(styles, tree, node, ConfigKey::Fill)?.unwrap_or(level.fill),
            stroke: effective(styles, tree, node, ConfigKey::Stroke)?.unwrap_or(level.stroke),
            stroke_width: effective(styles, tree, node, ConfigKey::StrokeWidth)?
                .unwrap_or(level.stroke_width),
            text_color: effective(styles, tree, node, ConfigKey::TextColor)?
                .unwrap_or(level.text_color),
        })
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight.clone(),
        }
    }
}
