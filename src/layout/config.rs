//! Configuration for the layout engine

use super::types::LayoutType;

/// Default usable edge fraction for connection points, per layout type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthPortions {
    pub horizontal: f64,
    pub vertical: f64,
    pub taproot: f64,
    pub classic: f64,
    pub outline: f64,
}

impl Default for WidthPortions {
    fn default() -> Self {
        Self {
            horizontal: 0.8,
            vertical: 0.75,
            taproot: 0.4,
            classic: 0.8,
            outline: 0.8,
        }
    }
}

impl WidthPortions {
    pub fn get(&self, layout_type: LayoutType) -> f64 {
        match layout_type {
            LayoutType::Horizontal => self.horizontal,
            LayoutType::Vertical => self.vertical,
            LayoutType::TapRoot => self.taproot,
            LayoutType::Classic => self.classic,
            LayoutType::Outline => self.outline,
        }
    }

    pub fn set(&mut self, layout_type: LayoutType, value: f64) {
        match layout_type {
            LayoutType::Horizontal => self.horizontal = value,
            LayoutType::Vertical => self.vertical = value,
            LayoutType::TapRoot => self.taproot = value,
            LayoutType::Classic => self.classic = value,
            LayoutType::Outline => self.outline = value,
        }
    }
}

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Size (width, height) given to a node whose text could not be measured
    pub fallback_size: (f64, f64),

    /// Width portion used when neither the node, its level nor the defaults set one
    pub width_portions: WidthPortions,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fallback_size: (40.0, 20.0),
            width_portions: WidthPortions::default(),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback node size
    pub fn with_fallback_size(mut self, width: f64, height: f64) -> Self {
        self.fallback_size = (width, height);
        self
    }

    /// Set the default width portion of one layout type
    pub fn with_width_portion(mut self, layout_type: LayoutType, portion: f64) -> Self {
        self.width_portions.set(layout_type, portion);
        self
    }

    pub fn default_width_portion(&self, layout_type: LayoutType) -> f64 {
        self.width_portions.get(layout_type)
    }
}
