//! SVG generation from a laid-out tree

use crate::layout::{BoundingBox, ConnectionPoint, Edge, LayoutError, LayoutStrategy, NodeType, Point};
use crate::style::{NodeStyle, StyleProvider};
use crate::tree::{NodeId, Tree};

use super::SvgConfig;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    elements: Vec<String>,
    connections: Vec<String>,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            elements: vec![],
            connections: vec![],
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, kind: &str, classes: &[String]) -> String {
        let prefix = self.prefix();
        std::iter::once(format!("{prefix}{kind}"))
            .chain(classes.iter().map(|c| format!("{prefix}{c}")))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add a rounded rectangle
    pub fn add_rect(&mut self, id: Option<&str>, rect: &BoundingBox, classes: &[String], styles: &str) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let radius = self.config.corner_radius;
        let radius_attr = if radius > 0.0 {
            format!(r#" rx="{radius}""#)
        } else {
            String::new()
        };
        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            self.indent_str(),
            id_attr,
            self.class_list("node", classes),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            radius_attr,
            styles
        ));
    }

    /// Add a straight line, used to underline bare text nodes
    pub fn add_line(&mut self, from: Point, to: Point, classes: &[String], styles: &str) {
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            self.class_list("underline", classes),
            from.x,
            from.y,
            to.x,
            to.y,
            styles
        ));
    }

    /// Add a label whose block of lines is vertically centred on `y`
    ///
    /// A single line is written as plain text content; wrapped labels get one
    /// `<tspan>` per line, `line_height * font_size` apart.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text(
        &mut self,
        id: Option<&str>,
        lines: &[&str],
        x: f64,
        y: f64,
        font_size: f64,
        anchor: TextAnchor,
        styles: &str,
    ) {
        let id_attr = id.map(|i| format!(r#" id="{}-label""#, i)).unwrap_or_default();
        let anchor_str = match anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        };
        let (top, body) = match lines {
            [] => (y, String::new()),
            [line] => (y, escape_xml(line)),
            _ => {
                let step = self.config.line_height * font_size;
                let top = y - step * (lines.len() - 1) as f64 / 2.0;
                let spans = lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let dy = if i == 0 { 0.0 } else { step };
                        format!(r#"<tspan x="{x}" dy="{dy}">{}</tspan>"#, escape_xml(line))
                    })
                    .collect::<String>();
                (top, spans)
            }
        };
        self.elements.push(format!(
            r#"{}<text{} class="{}label" x="{}" y="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            id_attr,
            self.prefix(),
            x,
            top,
            anchor_str,
            styles,
            body
        ));
    }

    /// Add a cubic connector between two attachment points
    pub fn add_connection(&mut self, from: &ConnectionPoint, to: &ConnectionPoint, styles: &str) {
        self.connections.push(format!(
            r#"{}<path class="{}connection" d="{}" fill="none"{}/>"#,
            self.indent_str(),
            self.prefix(),
            connector_d(from, to),
            styles
        ));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.margin;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        // Connectors go first so nodes are painted over their ends
        for conn in &self.connections {
            svg.push_str(conn);
            svg.push_str(nl);
        }
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render every visible node of a laid-out tree to an SVG string
///
/// Nodes that were never placed (no style recorded) are skipped. Connectors
/// use the attachment points of the strategy recorded on each parent.
pub fn render_svg(tree: &Tree, styles: &dyn StyleProvider, config: &SvgConfig) -> Result<String, LayoutError> {
    let root = tree.root();
    let _span = tracing::debug_span!("render_svg", nodes = tree.len()).entered();
    let mut builder = SvgBuilder::new(config.clone());

    for node in tree.visible_descendants(root) {
        let Some(style) = tree[node].style.as_ref() else {
            tracing::trace!(node = node.index(), "skipping node without layout");
            continue;
        };
        render_node(tree, node, style, &mut builder);
        render_connectors(tree, node, style, styles, config, &mut builder)?;
    }

    Ok(builder.build(tree[root].bounding_box))
}

fn render_node(tree: &Tree, node: NodeId, style: &NodeStyle, builder: &mut SvgBuilder) {
    let entry = &tree[node];
    let rect = entry.rect();
    let mut classes = vec![format!("level-{}", entry.level)];
    if entry.collapsed && entry.has_children() {
        classes.push("collapsed".to_string());
    }

    let text_styles = format!(
        r#" font-family="{}" font-size="{}" font-weight="{}" fill="{}""#,
        escape_xml(&style.font_family),
        style.font_size,
        escape_xml(&style.font_weight),
        escape_xml(&style.text_color)
    );
    let center = rect.center();
    let lines: Vec<&str> = if entry.lines.is_empty() {
        vec![entry.text.as_str()]
    } else {
        entry.lines.iter().map(String::as_str).collect()
    };

    match style.node_type {
        NodeType::Box => {
            let shape_styles = format!(
                r#" fill="{}" stroke="{}" stroke-width="{}""#,
                escape_xml(&style.fill),
                escape_xml(&style.stroke),
                style.stroke_width
            );
            builder.add_rect(Some(&entry.id), &rect, &classes, &shape_styles);
            builder.add_text(
                Some(&entry.id),
                &lines,
                center.x,
                center.y,
                style.font_size,
                TextAnchor::Middle,
                &text_styles,
            );
        }
        NodeType::Text => {
            let line_styles = format!(
                r#" stroke="{}" stroke-width="{}""#,
                escape_xml(&style.stroke),
                style.stroke_width
            );
            builder.add_line(
                Point::new(rect.x, rect.bottom()),
                Point::new(rect.right(), rect.bottom()),
                &classes,
                &line_styles,
            );
            builder.add_text(
                Some(&entry.id),
                &lines,
                center.x,
                center.y,
                style.font_size,
                TextAnchor::Middle,
                &text_styles,
            );
        }
    }
}

fn render_connectors(
    tree: &Tree,
    node: NodeId,
    style: &NodeStyle,
    styles: &dyn StyleProvider,
    config: &SvgConfig,
    builder: &mut SvgBuilder,
) -> Result<(), LayoutError> {
    let entry = &tree[node];
    let Some(layout) = entry.layout.as_ref() else {
        return Ok(());
    };
    if entry.collapsed {
        return Ok(());
    }

    let stroke = config.connector_stroke.as_deref().unwrap_or(&style.stroke);
    let connector_styles = format!(r#" stroke="{}" stroke-width="{}""#, escape_xml(stroke), style.stroke_width);
    let parent_level = styles.level_style(entry.level)?;
    for child in entry.children() {
        if tree[*child].style.is_none() {
            continue;
        }
        let child_level = styles.level_style(tree[*child].level)?;
        let from = layout.parent_connection_point(tree, node, &parent_level, Some(*child));
        let to = layout.child_connection_point(tree, *child, &child_level);
        builder.add_connection(&from, &to, &connector_styles);
    }
    Ok(())
}

/// Unit vector pointing out of a node through `edge`
fn outward(edge: Edge) -> (f64, f64) {
    match edge {
        Edge::Top => (0.0, -1.0),
        Edge::Bottom => (0.0, 1.0),
        Edge::Left => (-1.0, 0.0),
        Edge::Right => (1.0, 0.0),
    }
}

/// Path data of a cubic curve leaving `from` and entering `to` perpendicular
/// to their edges; control points sit halfway along each edge's normal axis
fn connector_d(from: &ConnectionPoint, to: &ConnectionPoint) -> String {
    let reach = |edge: Edge| {
        if edge.is_horizontal() {
            (to.y - from.y).abs() / 2.0
        } else {
            (to.x - from.x).abs() / 2.0
        }
    };
    let (fx, fy) = outward(from.edge);
    let (tx, ty) = outward(to.edge);
    let start_reach = reach(from.edge);
    let end_reach = reach(to.edge);
    format!(
        "M{} {} C{} {} {} {} {} {}",
        from.x,
        from.y,
        from.x + fx * start_reach,
        from.y + fy * start_reach,
        to.x + tx * end_reach,
        to.y + ty * end_reach,
        to.x,
        to.y
    )
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
