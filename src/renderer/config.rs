//! Rendering options for the mind map SVG

/// How a laid-out mind map is drawn
///
/// Geometry always comes from the layout pass; these settings only affect
/// decoration and document framing.
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Empty space kept around the root's bounding box
    pub margin: f64,

    /// Emit an XML declaration before `<svg>`
    pub standalone: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Prepended to every class name (`mm-node`, `mm-level-2`, ...)
    pub class_prefix: Option<String>,

    /// Corner radius of box nodes
    pub corner_radius: f64,

    /// Connector colour; `None` uses the parent node's stroke
    pub connector_stroke: Option<String>,

    /// Distance between wrapped label lines, as a multiple of the font size
    pub line_height: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("mm-".to_string()),
            corner_radius: 6.0,
            connector_stroke: None,
            line_height: 1.25,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the XML declaration, for embedding in HTML
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Square corners with 0
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Draw every connector in one colour
    pub fn with_connector_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.connector_stroke = Some(stroke.into());
        self
    }

    pub fn with_line_height(mut self, factor: f64) -> Self {
        self.line_height = factor;
        self
    }
}
