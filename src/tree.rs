//! Outline tree
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other by
//! [`NodeId`]. A node owns its ordered child list; the parent link is a plain
//! id used only for upward queries. Subtrees removed from the tree stay in
//! the arena but are no longer reachable from the root.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use serde::Serialize;
use thiserror::Error;

use crate::layout::types::BoundingBox;
use crate::layout::Layout;
use crate::style::{ConfigKey, ConfigValue, NodeStyle};

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Errors from structural edits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("the root node cannot be moved or removed")]
    RootIsFixed,

    #[error("cannot move a node into its own subtree")]
    WouldCreateCycle,

    #[error("node {0} is not attached to the tree")]
    Detached(usize),
}

/// One outline entry
#[derive(Debug, Clone)]
pub struct Node {
    pub text: String,
    /// Depth in the tree, 1 for the root
    pub level: usize,
    pub collapsed: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Covers this node and every visible descendant
    pub bounding_box: BoundingBox,
    pub overrides: BTreeMap<ConfigKey, ConfigValue>,
    /// Stable identifier derived from the texts on the path from the root
    pub id: String,
    /// Resolved visual style captured during the last layout pass
    pub style: Option<NodeStyle>,
    /// Label lines chosen when the node was last measured; empty for
    /// single-line labels
    pub lines: Vec<String>,
    /// Strategy that placed this node's children during the last pass
    pub layout: Option<Layout>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Path hash `id` is rendered from; seeds the children's hashes
    path_hash: u64,
}

impl Node {
    fn new(text: impl Into<String>, level: usize, parent: Option<NodeId>) -> Self {
        Self {
            text: text.into(),
            level,
            collapsed: false,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            bounding_box: BoundingBox::zero(),
            overrides: BTreeMap::new(),
            id: String::new(),
            style: None,
            lines: Vec::new(),
            layout: None,
            parent,
            children: Vec::new(),
            path_hash: FNV_OFFSET,
        }
    }

    /// The node's own rectangle
    pub fn rect(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when the engine places no children for this node
    pub fn is_layout_leaf(&self) -> bool {
        self.collapsed || self.children.is_empty()
    }

    /// Set a configuration override, replacing any previous value
    pub fn set_override(&mut self, key: ConfigKey, value: impl Into<ConfigValue>) {
        self.overrides.insert(key, value.into());
    }
}

/// Arena of outline nodes with a single root
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding only a root node
    pub fn new(root_text: impl Into<String>) -> Self {
        let mut tree = Self {
            nodes: vec![Node::new(root_text, 1, None)],
            root: NodeId(0),
        };
        tree.refresh_ids();
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look up a node id by arena index, if it exists
    pub fn get(&self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then_some(NodeId(index))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes reachable from the root
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append a new child and return its id
    pub fn add_child(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, text)
    }

    /// Insert a new child at `index` (clamped to the child count)
    pub fn insert_child(&mut self, parent: NodeId, index: usize, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let level = self.nodes[parent.0].level + 1;
        self.nodes.push(Node::new(text, level, Some(parent)));
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        let appended = index == children.len();
        children.insert(index, id);
        if appended {
            let seed = self.nodes[parent.0].path_hash;
            self.assign_id(id, seed, index);
        } else {
            self.refresh_children(parent);
        }
        id
    }

    /// Detach a subtree from its parent
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.attached_parent(id)?;
        self.nodes[parent.0].children.retain(|child| *child != id);
        self.nodes[id.0].parent = None;
        self.refresh_children(parent);
        Ok(())
    }

    /// Move a subtree under `new_parent` at position `index`
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId, index: usize) -> Result<(), TreeError> {
        let old_parent = self.attached_parent(id)?;
        if self.ancestors(new_parent).any(|ancestor| ancestor == id) || new_parent == id {
            return Err(TreeError::WouldCreateCycle);
        }
        self.nodes[old_parent.0].children.retain(|child| *child != id);
        let children = &mut self.nodes[new_parent.0].children;
        let index = index.min(children.len());
        children.insert(index, id);
        self.nodes[id.0].parent = Some(new_parent);

        let base = self.nodes[new_parent.0].level;
        for (node, depth) in self.descendants_with_depth(id) {
            self.nodes[node.0].level = base + 1 + depth;
        }
        self.refresh_children(old_parent);
        self.refresh_children(new_parent);
        Ok(())
    }

    fn attached_parent(&self, id: NodeId) -> Result<NodeId, TreeError> {
        if id == self.root {
            return Err(TreeError::RootIsFixed);
        }
        match self.nodes[id.0].parent {
            Some(parent) if self.ancestors(id).any(|a| a == self.root) => Ok(parent),
            _ => Err(TreeError::Detached(id.0)),
        }
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id.0].parent, move |current| {
            self.nodes[current.0].parent
        })
    }

    /// Position of `id` among its siblings (0 for the root)
    pub fn sibling_index(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.children(parent).iter().position(|c| *c == id))
            .unwrap_or(0)
    }

    /// All nodes of the subtree in pre-order, including hidden ones
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants_with_depth(id)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Nodes of the subtree that are drawn: descent stops below collapsed nodes
    pub fn visible_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let node = &self.nodes[current.0];
            if !node.collapsed {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn descendants_with_depth(&self, id: NodeId) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(id, 0)];
        while let Some((current, depth)) = stack.pop() {
            out.push((current, depth));
            for child in self.nodes[current.0].children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }

    /// Move every node and bounding box of the subtree by `(dx, dy)`
    pub fn translate_subtree(&mut self, id: NodeId, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for node_id in self.descendants(id) {
            let node = &mut self.nodes[node_id.0];
            node.x += dx;
            node.y += dy;
            node.bounding_box = node.bounding_box.translated(dx, dy);
        }
    }

    /// Collapse every node with children at `level >= depth`
    pub fn apply_auto_collapse(&mut self, depth: usize) {
        for id in self.descendants(self.root) {
            let node = &mut self.nodes[id.0];
            if node.level >= depth && node.has_children() {
                node.collapsed = true;
            }
        }
    }

    /// Recompute the content-derived ids of every reachable node
    ///
    /// Structural edits keep ids current on their own; call this after
    /// changing a node's `text`.
    pub fn refresh_ids(&mut self) {
        self.refresh_from(vec![(self.root, FNV_OFFSET, 0)]);
    }

    /// Recompute ids below `parent`, whose own id is unchanged
    fn refresh_children(&mut self, parent: NodeId) {
        let seed = self.nodes[parent.0].path_hash;
        let stack = self.nodes[parent.0]
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| (*child, seed, index))
            .collect();
        self.refresh_from(stack);
    }

    fn refresh_from(&mut self, mut stack: Vec<(NodeId, u64, usize)>) {
        while let Some((id, seed, index)) = stack.pop() {
            let hash = self.assign_id(id, seed, index);
            stack.extend(
                self.nodes[id.0]
                    .children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| (*child, hash, index)),
            );
        }
    }

    fn assign_id(&mut self, id: NodeId, seed: u64, index: usize) -> u64 {
        let node = &mut self.nodes[id.0];
        let hash = fnv1a(fnv1a(seed, node.text.as_bytes()), &(index as u64).to_le_bytes());
        node.path_hash = hash;
        node.id = format!("node-{hash:016x}");
        hash
    }

    /// Find the first reachable node whose text matches
    pub fn find(&self, text: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.nodes[id.0].text == text)
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(seed, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");
        let a1 = tree.add_child(a, "a1");
        (tree, a, b, a1)
    }

    #[test]
    fn test_levels_follow_depth() {
        let (tree, a, _, a1) = sample();
        assert_eq!(tree[tree.root()].level, 1);
        assert_eq!(tree[a].level, 2);
        assert_eq!(tree[a1].level, 3);
    }

    #[test]
    fn test_parent_links_are_consistent() {
        let (tree, ..) = sample();
        for id in tree.descendants(tree.root()) {
            for child in tree.children(id) {
                assert_eq!(tree.parent(*child), Some(id));
            }
        }
    }

    #[test]
    fn test_insert_child_keeps_order() {
        let (mut tree, a, b, _) = sample();
        let root = tree.root();
        let first = tree.insert_child(root, 0, "first");
        assert_eq!(tree.children(root), &[first, a, b]);
        assert_eq!(tree.sibling_index(b), 2);
    }

    #[test]
    fn test_move_node_updates_levels() {
        let (mut tree, a, b, a1) = sample();
        tree.move_node(a, b, 0).unwrap();
        assert_eq!(tree.parent(a), Some(b));
        assert_eq!(tree[a].level, 3);
        assert_eq!(tree[a1].level, 4);
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let (mut tree, a, _, a1) = sample();
        assert_eq!(tree.move_node(a, a1, 0), Err(TreeError::WouldCreateCycle));
        let root = tree.root();
        assert_eq!(tree.move_node(root, a, 0), Err(TreeError::RootIsFixed));
    }

    #[test]
    fn test_remove_subtree_detaches() {
        let (mut tree, a, _, a1) = sample();
        tree.remove_subtree(a).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.remove_subtree(a1), Err(TreeError::Detached(a1.index())));
    }

    #[test]
    fn test_ids_are_stable_and_distinct() {
        let (tree, a, b, _) = sample();
        let (again, a2, b2, _) = sample();
        assert_eq!(tree[a].id, again[a2].id);
        assert_ne!(tree[a].id, tree[b].id);
        assert_eq!(tree[b].id, again[b2].id);
    }

    fn ids(tree: &Tree) -> Vec<String> {
        tree.descendants(tree.root()).into_iter().map(|id| tree[id].id.clone()).collect()
    }

    #[test]
    fn test_edits_keep_ids_current() {
        let (mut tree, a, b, a1) = sample();
        let root = tree.root();
        tree.insert_child(root, 1, "between");
        tree.add_child(a1, "deeper");
        let incremental = ids(&tree);
        tree.refresh_ids();
        assert_eq!(ids(&tree), incremental);

        tree.move_node(a, b, 0).unwrap();
        let incremental = ids(&tree);
        tree.refresh_ids();
        assert_eq!(ids(&tree), incremental);

        tree.remove_subtree(b).unwrap();
        let incremental = ids(&tree);
        tree.refresh_ids();
        assert_eq!(ids(&tree), incremental);
    }

    #[test]
    fn test_ids_depend_on_sibling_position() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let first = tree.add_child(root, "same");
        let second = tree.add_child(root, "same");
        assert_ne!(tree[first].id, tree[second].id);

        let before = tree[second].id.clone();
        tree.insert_child(root, 0, "new head");
        assert_ne!(tree[second].id, before);
    }

    #[test]
    fn test_translate_subtree_moves_boxes() {
        let (mut tree, a, _, a1) = sample();
        tree[a1].bounding_box = BoundingBox::new(1.0, 1.0, 2.0, 2.0);
        tree.translate_subtree(a, 5.0, -1.0);
        assert_eq!(tree[a].x, 5.0);
        assert_eq!(tree[a1].bounding_box, BoundingBox::new(6.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn test_auto_collapse_and_visibility() {
        let (mut tree, a, b, a1) = sample();
        tree.apply_auto_collapse(2);
        assert!(tree[a].collapsed);
        assert!(!tree[b].collapsed);
        let visible = tree.visible_descendants(tree.root());
        assert!(!visible.contains(&a1));
        assert_eq!(visible.len(), 3);
    }
}
