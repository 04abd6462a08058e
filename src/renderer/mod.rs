//! SVG renderer for laid-out trees
//!
//! Draws every visible node and a connector from each parent to each of its
//! children, with CSS classes per depth level for styling.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, SvgBuilder, TextAnchor};
