//! TOML stylesheets
//!
//! A stylesheet has three sections: `[defaults]` (the global tier of the
//! cascade), `[levels.N]` tables for each depth level, and free-form
//! `[global]` settings such as `collapseDepth`. Levels deeper than the last
//! defined one reuse its style.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::error::LayoutError;
use crate::layout::types::{ConnectionPointMode, Direction, EdgeAlignment, LayoutType, NodeType};

use super::{ConfigKey, ConfigValue, FromConfigValue, LevelStyle, StyleProvider};

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid level key '{0}': levels are numbered from 1")]
    InvalidLevel(String),
    #[error("Invalid stylesheet value: {0}")]
    InvalidValue(#[from] LayoutError),
}

/// Optional style values for one tier of the cascade
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StyleSettings {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub horizontal_padding: Option<f64>,
    pub vertical_padding: Option<f64>,
    pub parent_padding: Option<f64>,
    pub child_padding: Option<f64>,
    pub layout_type: Option<LayoutType>,
    pub direction: Option<Direction>,
    pub node_type: Option<NodeType>,
    pub connection_points: Option<ConnectionPointMode>,
    pub width_portion: Option<f64>,
    pub edge_alignment: Option<EdgeAlignment>,
    pub horizontal_shift: Option<f64>,
    pub max_width: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub text_color: Option<String>,
}

impl StyleSettings {
    /// Value this tier sets for `key`
    pub fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::LayoutType => self.layout_type.map(Into::into),
            ConfigKey::Direction => self.direction.map(Into::into),
            ConfigKey::ParentPadding => self.parent_padding.map(Into::into),
            ConfigKey::ChildPadding => self.child_padding.map(Into::into),
            ConfigKey::HorizontalPadding => self.horizontal_padding.map(Into::into),
            ConfigKey::VerticalPadding => self.vertical_padding.map(Into::into),
            ConfigKey::FontFamily => self.font_family.clone().map(Into::into),
            ConfigKey::FontSize => self.font_size.map(Into::into),
            ConfigKey::FontWeight => self.font_weight.clone().map(Into::into),
            ConfigKey::NodeType => self.node_type.map(Into::into),
            ConfigKey::ConnectionPoints => self.connection_points.map(Into::into),
            ConfigKey::WidthPortion => self.width_portion.map(Into::into),
            ConfigKey::EdgeAlignment => self.edge_alignment.map(Into::into),
            ConfigKey::HorizontalShift => self.horizontal_shift.map(Into::into),
            ConfigKey::MaxWidth => self.max_width.map(Into::into),
            ConfigKey::Fill => self.fill.clone().map(Into::into),
            ConfigKey::Stroke => self.stroke.clone().map(Into::into),
            ConfigKey::StrokeWidth => self.stroke_width.map(Into::into),
            ConfigKey::TextColor => self.text_color.clone().map(Into::into),
        }
    }

    /// Set one key from a cascade value
    pub fn set(&mut self, key: ConfigKey, value: &ConfigValue) -> Result<(), LayoutError> {
        let value = key.parse_value(&value.to_string())?;
        let number = value.as_f64();
        let text = value.as_str().map(str::to_string);
        match key {
            ConfigKey::LayoutType => self.layout_type = Some(FromConfigValue::from_config_value(key, &value)?),
            ConfigKey::Direction => self.direction = Some(FromConfigValue::from_config_value(key, &value)?),
            ConfigKey::NodeType => self.node_type = Some(FromConfigValue::from_config_value(key, &value)?),
            ConfigKey::ConnectionPoints => {
                self.connection_points = Some(FromConfigValue::from_config_value(key, &value)?)
            }
            ConfigKey::EdgeAlignment => {
                self.edge_alignment = Some(FromConfigValue::from_config_value(key, &value)?)
            }
            ConfigKey::ParentPadding => self.parent_padding = number,
            ConfigKey::ChildPadding => self.child_padding = number,
            ConfigKey::HorizontalPadding => self.horizontal_padding = number,
            ConfigKey::VerticalPadding => self.vertical_padding = number,
            ConfigKey::FontSize => self.font_size = number,
            ConfigKey::WidthPortion => self.width_portion = number,
            ConfigKey::HorizontalShift => self.horizontal_shift = number,
            ConfigKey::MaxWidth => self.max_width = number,
            ConfigKey::StrokeWidth => self.stroke_width = number,
            ConfigKey::FontFamily => self.font_family = text,
            ConfigKey::FontWeight => self.font_weight = text,
            ConfigKey::Fill => self.fill = text,
            ConfigKey::Stroke => self.stroke = text,
            ConfigKey::TextColor => self.text_color = text,
        }
        Ok(())
    }

    /// Fill every unset value from `base`
    pub fn merged_over(&self, base: &StyleSettings) -> StyleSettings {
        StyleSettings {
            font_family: self.font_family.clone().or_else(|| base.font_family.clone()),
            font_size: self.font_size.or(base.font_size),
            font_weight: self.font_weight.clone().or_else(|| base.font_weight.clone()),
            horizontal_padding: self.horizontal_padding.or(base.horizontal_padding),
            vertical_padding: self.vertical_padding.or(base.vertical_padding),
            parent_padding: self.parent_padding.or(base.parent_padding),
            child_padding: self.child_padding.or(base.child_padding),
            layout_type: self.layout_type.or(base.layout_type),
            direction: self.direction.or(base.direction),
            node_type: self.node_type.or(base.node_type),
            connection_points: self.connection_points.or(base.connection_points),
            width_portion: self.width_portion.or(base.width_portion),
            edge_alignment: self.edge_alignment.or(base.edge_alignment),
            horizontal_shift: self.horizontal_shift.or(base.horizontal_shift),
            max_width: self.max_width.or(base.max_width),
            fill: self.fill.clone().or_else(|| base.fill.clone()),
            stroke: self.stroke.clone().or_else(|| base.stroke.clone()),
            stroke_width: self.stroke_width.or(base.stroke_width),
            text_color: self.text_color.clone().or_else(|| base.text_color.clone()),
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        for key in ConfigKey::ALL {
            if let Some(ConfigValue::Number(n)) = self.get(key) {
                key.check_number(n)?;
            }
        }
        Ok(())
    }

    /// Values used when neither the stylesheet defaults nor a level set a key
    fn builtin() -> StyleSettings {
        StyleSettings {
            font_family: Some("Helvetica, Arial, sans-serif".to_string()),
            font_size: Some(14.0),
            font_weight: Some("normal".to_string()),
            horizontal_padding: Some(10.0),
            vertical_padding: Some(6.0),
            parent_padding: Some(60.0),
            child_padding: Some(12.0),
            layout_type: Some(LayoutType::Horizontal),
            direction: None,
            node_type: Some(NodeType::Box),
            connection_points: Some(ConnectionPointMode::Single),
            width_portion: None,
            edge_alignment: Some(EdgeAlignment::Near),
            horizontal_shift: Some(20.0),
            max_width: None,
            fill: Some("#ffffff".to_string()),
            stroke: Some("#4a6fa5".to_string()),
            stroke_width: Some(1.5),
            text_color: Some("#222222".to_string()),
        }
    }

    fn into_level_style(self) -> LevelStyle {
        let builtin = StyleSettings::builtin();
        let s = self.merged_over(&builtin);
        LevelStyle {
            font_family: s.font_family.unwrap_or_default(),
            font_size: s.font_size.unwrap_or(14.0),
            font_weight: s.font_weight.unwrap_or_default(),
            horizontal_padding: s.horizontal_padding.unwrap_or_default(),
            vertical_padding: s.vertical_padding.unwrap_or_default(),
            parent_padding: s.parent_padding.unwrap_or_default(),
            child_padding: s.child_padding.unwrap_or_default(),
            layout_type: s.layout_type.unwrap_or(LayoutType::Horizontal),
            direction: s.direction,
            node_type: s.node_type.unwrap_or_default(),
            connection_points: s.connection_points.unwrap_or_default(),
            width_portion: s.width_portion,
            edge_alignment: s.edge_alignment.unwrap_or_default(),
            horizontal_shift: s.horizontal_shift.unwrap_or_default(),
            max_width: s.max_width,
            fill: s.fill.unwrap_or_default(),
            stroke: s.stroke.unwrap_or_default(),
            stroke_width: s.stroke_width.unwrap_or_default(),
            text_color: s.text_color.unwrap_or_default(),
        }
    }
}

/// A stylesheet: global defaults, per-level styles and global settings
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Global tier of the cascade
    pub defaults: StyleSettings,
    /// Level tier of the cascade, keyed by depth (1 = root)
    pub levels: BTreeMap<usize, StyleSettings>,
    /// Settings not tied to a level
    pub global: BTreeMap<String, ConfigValue>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    defaults: StyleSettings,
    #[serde(default)]
    levels: BTreeMap<String, StyleSettings>,
    #[serde(default)]
    global: BTreeMap<String, ConfigValue>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default stylesheet: a classic mind map with horizontal branches
const DEFAULT_STYLESHEET: &str = r##"
[metadata]
name = "classic"
description = "Centered root, branches balanced left and right"

[defaults]
fontFamily = "Helvetica, Arial, sans-serif"
fontSize = 14
fontWeight = "normal"
horizontalPadding = 10
verticalPadding = 6
parentPadding = 40
childPadding = 10
layoutType = "horizontal"
nodeType = "box"
connectionPoints = "single"
edgeAlignment = "near"
horizontalShift = 20
fill = "#ffffff"
stroke = "#4a6fa5"
strokeWidth = 1.5
textColor = "#222222"

[levels.1]
fontSize = 20
fontWeight = "bold"
horizontalPadding = 16
verticalPadding = 10
parentPadding = 80
childPadding = 20
layoutType = "classic"
fill = "#4a6fa5"
stroke = "#2f4f7f"
textColor = "#ffffff"

[levels.2]
fontSize = 16
horizontalPadding = 12
verticalPadding = 8
parentPadding = 60
childPadding = 14
fill = "#dde6f3"

[levels.3]
nodeType = "text"
connectionPoints = "distributeEvenly"

[global]
collapseDepth = 0
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let mut levels = BTreeMap::new();
        for (key, settings) in parsed.levels {
            let level: usize = key
                .parse()
                .ok()
                .filter(|level| *level >= 1)
                .ok_or_else(|| StylesheetError::InvalidLevel(key.clone()))?;
            settings.validate()?;
            levels.insert(level, settings);
        }
        parsed.defaults.validate()?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            defaults: parsed.defaults,
            levels,
            global: parsed.global,
        })
    }

    /// A stylesheet with no levels and no defaults
    pub fn empty() -> Self {
        Self {
            name: None,
            description: None,
            defaults: StyleSettings::default(),
            levels: BTreeMap::new(),
            global: BTreeMap::new(),
        }
    }

    /// One horizontal level with all paddings at zero, so node sizes equal text sizes
    pub fn flat() -> Self {
        let mut sheet = Self::empty();
        sheet.name = Some("flat".to_string());
        sheet.set_level(
            1,
            StyleSettings {
                horizontal_padding: Some(0.0),
                vertical_padding: Some(0.0),
                parent_padding: Some(0.0),
                child_padding: Some(0.0),
                layout_type: Some(LayoutType::Horizontal),
                ..StyleSettings::default()
            },
        );
        sheet
    }

    /// Settings of the deepest defined level at or above `level`
    fn level_settings(&self, level: usize) -> Result<&StyleSettings, LayoutError> {
        if level == 0 {
            return Err(LayoutError::missing_level(level));
        }
        self.levels
            .range(..=level)
            .next_back()
            .map(|(_, settings)| settings)
            .ok_or(LayoutError::missing_level(level))
    }

    /// Set a level's settings, replacing what was there
    pub fn set_level(&mut self, level: usize, settings: StyleSettings) {
        self.levels.insert(level, settings);
    }

    /// Apply the same value to every defined level for one key
    pub fn set_level_value(&mut self, key: ConfigKey, value: &ConfigValue) -> Result<(), LayoutError> {
        for settings in self.levels.values_mut() {
            settings.set(key, value)?;
        }
        Ok(())
    }
}

impl StyleProvider for Stylesheet {
    fn level_style(&self, level: usize) -> Result<LevelStyle, LayoutError> {
        let settings = self.level_settings(level)?;
        Ok(settings.merged_over(&self.defaults).into_level_style())
    }

    fn level_value(&self, level: usize, key: ConfigKey) -> Result<Option<ConfigValue>, LayoutError> {
        Ok(self.level_settings(level)?.get(key))
    }

    fn default_value(&self, key: ConfigKey) -> Option<ConfigValue> {
        self.defaults.get(key).or_else(|| StyleSettings::builtin().get(key))
    }

    fn global_config(&self, key: &str, default: ConfigValue) -> ConfigValue {
        self.global.get(key).cloned().unwrap_or(default)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_str(DEFAULT_STYLESHEET).expect("Default stylesheet should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.name.as_deref(), Some("classic"));
        let root = stylesheet.level_style(1).unwrap();
        assert_eq!(root.layout_type, LayoutType::Classic);
        assert_eq!(root.parent_padding, 80.0);
        let second = stylesheet.level_style(2).unwrap();
        assert_eq!(second.layout_type, LayoutType::Horizontal);
        assert_eq!(second.font_size, 16.0);
    }

    #[test]
    fn test_deep_levels_reuse_last_level() {
        let stylesheet = Stylesheet::default();
        let third = stylesheet.level_style(3).unwrap();
        assert_eq!(stylesheet.level_style(9).unwrap(), third);
        assert_eq!(third.node_type, NodeType::Text);
    }

    #[test]
    fn test_missing_level_fails() {
        let stylesheet = Stylesheet::empty();
        assert_eq!(
            stylesheet.level_style(1),
            Err(LayoutError::MissingLevelStyle { level: 1 })
        );
        assert!(Stylesheet::default().level_style(0).is_err());
    }

    #[test]
    fn test_cascade_through_provider() {
        let stylesheet = Stylesheet::default();
        let mut tree = Tree::new("root");
        let root = tree.root();
        let child = tree.add_child(root, "child");

        let level = stylesheet
            .effective_value(&tree, child, ConfigKey::ChildPadding)
            .unwrap();
        assert_eq!(level, Some(ConfigValue::Number(14.0)));

        tree[child].set_override(ConfigKey::ChildPadding, 3.0);
        let overridden = stylesheet
            .effective_value(&tree, child, ConfigKey::ChildPadding)
            .unwrap();
        assert_eq!(overridden, Some(ConfigValue::Number(3.0)));

        let global = stylesheet
            .effective_value(&tree, child, ConfigKey::StrokeWidth)
            .unwrap();
        assert_eq!(global, Some(ConfigValue::Number(1.5)));
    }

    #[test]
    fn test_global_config() {
        let stylesheet = Stylesheet::default();
        assert_eq!(
            stylesheet.global_config("collapseDepth", ConfigValue::Number(7.0)),
            ConfigValue::Number(0.0)
        );
        assert_eq!(
            stylesheet.global_config("unknown", ConfigValue::Bool(true)),
            ConfigValue::Bool(true)
        );
    }

    #[test]
    fn test_parse_levels_and_reject_bad_keys() {
        let toml_str = r##"
[levels.1]
layoutType = "vertical"
direction = "up"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        let level = stylesheet.level_style(1).unwrap();
        assert_eq!(level.layout_type, LayoutType::Vertical);
        assert_eq!(level.direction, Some(Direction::Up));

        assert!(matches!(
            Stylesheet::from_str("[levels.zero]\nfontSize = 3"),
            Err(StylesheetError::InvalidLevel(_))
        ));
        assert!(Stylesheet::from_str("[levels.1]\ncolour = \"red\"").is_err());
        assert!(matches!(
            Stylesheet::from_str("[levels.1]\nwidthPortion = 3"),
            Err(StylesheetError::InvalidValue(_))
        ));
        assert!(matches!(
            Stylesheet::from_str("[levels.2]\nparentPadding = nan"),
            Err(StylesheetError::InvalidValue(_))
        ));
        assert!(matches!(
            Stylesheet::from_str("[defaults]\nmaxWidth = -10"),
            Err(StylesheetError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_set_level_value() {
        let mut stylesheet = Stylesheet::default();
        stylesheet
            .set_level_value(ConfigKey::LayoutType, &ConfigValue::from("outline"))
            .unwrap();
        assert_eq!(stylesheet.level_style(1).unwrap().layout_type, LayoutType::Outline);
        assert_eq!(stylesheet.level_style(3).unwrap().layout_type, LayoutType::Outline);
    }

    #[test]
    fn test_flat_stylesheet_has_no_padding() {
        let level = Stylesheet::flat().level_style(4).unwrap();
        assert_eq!(level.horizontal_padding, 0.0);
        assert_eq!(level.parent_padding, 0.0);
        assert_eq!(level.layout_type, LayoutType::Horizontal);
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Stylesheet::from_str("this is not valid toml {{{{").is_err());
    }
}
