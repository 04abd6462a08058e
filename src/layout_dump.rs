use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::layout::{BoundingBox, ConnectionPoint, LayoutError, LayoutStrategy};
use crate::style::StyleProvider;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub text: String,
    pub level: usize,
    pub layout: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub bounding_box: BoundingBox,
    pub collapsed: bool,
    pub hidden: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub start: ConnectionPoint,
    pub end: ConnectionPoint,
}

impl LayoutDump {
    /// Snapshot the geometry of the last layout pass
    ///
    /// Every reachable node is listed in pre-order; nodes below a collapsed
    /// ancestor are marked hidden and have no edges.
    pub fn from_tree(tree: &Tree, styles: &dyn StyleProvider) -> Result<Self, LayoutError> {
        let root = tree.root();
        let visible = tree.visible_descendants(root);
        let shown: HashSet<NodeId> = visible.iter().copied().collect();

        let nodes = tree
            .descendants(root)
            .into_iter()
            .map(|id| {
                let node = &tree[id];
                NodeDump {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    level: node.level,
                    layout: node.layout.map(|layout| layout.layout_type().as_str().to_string()),
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                    bounding_box: node.bounding_box,
                    collapsed: node.collapsed,
                    hidden: !shown.contains(&id),
                }
            })
            .collect();

        let mut edges = Vec::new();
        for id in &visible {
            let node = &tree[*id];
            let Some(layout) = node.layout.filter(|_| !node.collapsed) else {
                continue;
            };
            let parent_level = styles.level_style(node.level)?;
            for child in node.children() {
                let child_level = styles.level_style(tree[*child].level)?;
                edges.push(EdgeDump {
                    from: node.id.clone(),
                    to: tree[*child].id.clone(),
                    start: layout.parent_connection_point(tree, *id, &parent_level, Some(*child)),
                    end: layout.child_connection_point(tree, *child, &child_level),
                });
            }
        }

        let bounds = tree[root].bounding_box;
        Ok(LayoutDump {
            width: bounds.width,
            height: bounds.height,
            nodes,
            edges,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_layout_dump(path: &Path, tree: &Tree, styles: &dyn StyleProvider) -> Result<(), DumpError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_tree(tree, styles)?;
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("failed to write layout dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize layout dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
