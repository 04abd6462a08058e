//! Text measurement
//!
//! The engine sizes nodes through the synchronous [`TextMeasurer`] trait.
//! [`MeasureCache`] memoizes results for one layout pass; the engine clears
//! it at the start of every pass.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Font parameters a measurement depends on
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
}

impl TextStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self.font_weight.as_str(), "bold" | "bolder" | "600" | "700" | "800" | "900")
    }
}

/// Measured extent of a text block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
    /// Line breaks the measurer chose; empty when the text is one line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

impl TextSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }
}

/// Errors a measurer can report
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeasureError {
    #[error("invalid font size {0}")]
    InvalidFontSize(f64),

    #[error("font '{0}' is not available")]
    FontUnavailable(String),

    #[error("measurement failed: {0}")]
    Failed(String),
}

/// Synchronous text measurement
pub trait TextMeasurer {
    /// Size of `text` rendered with `style`, wrapped at `wrap_width` when given
    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<f64>,
    ) -> Result<TextSize, MeasureError>;
}

/// Character-count based measurer
///
/// Uses an average advance of `char_width_factor * font_size` per terminal
/// column (wide CJK glyphs count twice) and `line_height_factor * font_size`
/// per line. Good enough for layout without access to font files.
#[derive(Debug, Clone)]
pub struct ApproximateMeasurer {
    pub char_width_factor: f64,
    pub bold_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for ApproximateMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
            bold_width_factor: 0.65,
            line_height_factor: 1.25,
        }
    }
}

impl ApproximateMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    fn line_width(&self, line: &str, advance: f64) -> f64 {
        line.width() as f64 * advance
    }

    /// Greedy word wrap at `max_width`; words longer than a line stay whole
    fn wrap(&self, text: &str, advance: f64, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if !current.is_empty() && self.line_width(&candidate, advance) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        lines
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<f64>,
    ) -> Result<TextSize, MeasureError> {
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return Err(MeasureError::InvalidFontSize(style.font_size));
        }
        let factor = if style.is_bold() {
            self.bold_width_factor
        } else {
            self.char_width_factor
        };
        let advance = style.font_size * factor;
        let lines: Vec<String> = match wrap_width {
            Some(max) if max > 0.0 => self.wrap(text, advance, max),
            _ => text.split('\n').map(str::to_string).collect(),
        };
        let width = lines
            .iter()
            .map(|line| self.line_width(line, advance))
            .fold(0.0, f64::max);
        let height = lines.len().max(1) as f64 * style.font_size * self.line_height_factor;
        let size = TextSize::new(width, height);
        if lines.len() > 1 {
            Ok(size.with_lines(lines))
        } else {
            Ok(size)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    font_family: String,
    font_size: u64,
    font_weight: String,
    wrap_width: Option<u64>,
}

impl MeasureKey {
    fn new(text: &str, style: &TextStyle, wrap_width: Option<f64>) -> Self {
        Self {
            text: text.to_string(),
            font_family: style.font_family.clone(),
            font_size: style.font_size.to_bits(),
            font_weight: style.font_weight.clone(),
            wrap_width: wrap_width.map(f64::to_bits),
        }
    }
}

/// Memoized measurements for one layout pass
#[derive(Debug, Default)]
pub struct MeasureCache {
    entries: HashMap<MeasureKey, TextSize>,
    hits: usize,
    misses: usize,
}

impl MeasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure through the cache; failures are not cached
    pub fn measure(
        &mut self,
        measurer: &dyn TextMeasurer,
        text: &str,
        style: &TextStyle,
        wrap_width: Option<f64>,
    ) -> Result<TextSize, MeasureError> {
        let key = MeasureKey::new(text, style, wrap_width);
        if let Some(size) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(size.clone());
        }
        self.misses += 1;
        let size = measurer.measure(text, style, wrap_width)?;
        self.entries.insert(key, size.clone());
        Ok(size)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
