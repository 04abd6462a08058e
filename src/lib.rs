//! Mind map layout engine
//!
//! Reads a markdown-style outline into a tree, places every node with one of
//! five layout strategies (horizontal, vertical, taproot, classic, outline)
//! and renders the result as SVG or as a JSON geometry dump.
//!
//! # Example
//!
//! ```rust
//! use mindmap_layout::render;
//!
//! let svg = render("# Trip\n- pack\n- book hotel\n").unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("book hotel"));
//! ```

pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod measure;
pub mod parser;
pub mod renderer;
pub mod style;
pub mod tree;

pub use error::ParseError;
pub use layout::{layout_tree, LayoutConfig, LayoutError, LayoutType};
pub use layout_dump::LayoutDump;
pub use measure::{ApproximateMeasurer, TextMeasurer};
pub use parser::parse;
pub use renderer::{render_svg, SvgConfig};
pub use style::{ConfigKey, StyleProvider, Stylesheet, StylesheetError};
pub use tree::{NodeId, Tree};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("stylesheet error: {0}")]
    Stylesheet(#[from] StylesheetError),

    #[error("failed to serialize layout: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub layout: LayoutConfig,
    pub svg: SvgConfig,
    pub stylesheet: Stylesheet,
    /// Strategy forced onto the root, overriding the stylesheet and outline
    pub root_layout: Option<LayoutType>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_root_layout(mut self, layout_type: LayoutType) -> Self {
        self.root_layout = Some(layout_type);
        self
    }
}

/// Render outline source to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render outline source to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use mindmap_layout::{render_with_config, LayoutType, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_root_layout(LayoutType::Vertical)
///     .with_svg(SvgConfig::default().with_standalone(false));
///
/// let svg = render_with_config("# Root\n- a\n- b\n", &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let tree = layout_source(source, config)?;
    Ok(render_svg(&tree, &config.stylesheet, &config.svg)?)
}

/// Lay out outline source and return the geometry as pretty-printed JSON
pub fn dump_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let tree = layout_source(source, config)?;
    Ok(LayoutDump::from_tree(&tree, &config.stylesheet)?.to_json()?)
}

/// Parse and lay out outline source, measuring text with [`ApproximateMeasurer`]
pub fn layout_source(source: &str, config: &RenderConfig) -> Result<Tree, RenderError> {
    let mut tree = parse(source)?;
    if let Some(layout_type) = config.root_layout {
        let root = tree.root();
        tree[root].set_override(ConfigKey::LayoutType, layout_type);
    }
    let measurer = ApproximateMeasurer::new();
    layout_tree(&mut tree, &config.stylesheet, &measurer, &config.layout, 0.0, 0.0)?;
    Ok(tree)
}
