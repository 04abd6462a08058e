//! End-to-end placement checks with hand-computed expectations

mod common;

use common::{single_level, StubMeasurer};
use mindmap_layout::layout::{distribute_children_into_columns, layout_tree, BoundingBox, LayoutConfig, LayoutType};
use mindmap_layout::{parse, NodeId, Tree};
use pretty_assertions::assert_eq;

#[test]
fn horizontal_two_children() {
    let styles = single_level(LayoutType::Horizontal, 80.0, 20.0);
    let measurer = StubMeasurer::fixed(100.0, 40.0);
    let mut tree = Tree::new("A");
    let root = tree.root();
    let b = tree.add_child(root, "B");
    let c = tree.add_child(root, "C");

    let bounds = layout_tree(&mut tree, &styles, &measurer, &LayoutConfig::default(), 0.0, 0.0).unwrap();

    assert_eq!(bounds, BoundingBox::new(0.0, 0.0, 280.0, 100.0));
    assert_eq!(tree[root].rect(), BoundingBox::new(0.0, 30.0, 100.0, 40.0));
    assert_eq!(tree[b].rect(), BoundingBox::new(180.0, 0.0, 100.0, 40.0));
    assert_eq!(tree[c].y - tree[b].y, 60.0);
    // The children straddle the parent's centre line
    assert_eq!(tree[b].rect().bottom() + 10.0, tree[root].rect().center().y);
}

#[test]
fn taproot_four_equal_children_split_evenly() {
    let styles = single_level(LayoutType::TapRoot, 40.0, 10.0);
    let measurer = StubMeasurer::fixed(60.0, 20.0);
    let mut tree = Tree::new("root");
    let root = tree.root();
    let children: Vec<_> = (0..4).map(|i| tree.add_child(root, format!("child {i}"))).collect();

    layout_tree(&mut tree, &styles, &measurer, &LayoutConfig::default(), 0.0, 0.0).unwrap();

    let trunk = tree[root].rect().center().x;
    let (left, right): (Vec<_>, Vec<_>) = children.iter().partition(|c| tree[**c].rect().center().x < trunk);
    assert_eq!(left, vec![&children[0], &children[1]]);
    assert_eq!(right, vec![&children[2], &children[3]]);

    let extent = |column: &[&NodeId]| {
        let top = column.iter().map(|c| tree[**c].y).fold(f64::INFINITY, f64::min);
        let bottom = column.iter().map(|c| tree[**c].rect().bottom()).fold(f64::NEG_INFINITY, f64::max);
        bottom - top
    };
    assert_eq!(extent(&left), extent(&right));
    assert_eq!(extent(&left), 50.0);
}

#[test]
fn outline_left_right_edges_follow_shift() {
    let source = "# A {layoutType: outline, direction: left, horizontalShift: 50}\n\
                  - x\n\
                  - medium\n\
                  - a much longer child\n";
    let mut tree = parse(source).unwrap();
    let styles = single_level(LayoutType::Horizontal, 10.0, 5.0);
    let measurer = StubMeasurer::per_char(8.0, 16.0);
    layout_tree(&mut tree, &styles, &measurer, &LayoutConfig::default(), 0.0, 0.0).unwrap();

    let root = tree.root();
    let parent = tree[root].rect();
    for child in tree.children(root) {
        assert_eq!(tree[*child].rect().right(), parent.x + parent.width - 50.0);
        assert!(tree[*child].y >= parent.bottom() + 10.0);
    }
}

/// xorshift64 so the sample is the same on every run
fn estimates(seed: u64, count: usize) -> Vec<f64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 200) as f64 + 8.0
        })
        .collect()
}

#[test]
fn column_totals_differ_by_at_most_the_largest_child() {
    for seed in 1..=64u64 {
        let heights = estimates(seed, (seed % 17) as usize);
        let largest = heights.iter().copied().fold(0.0, f64::max);

        let columns = distribute_children_into_columns(&heights, 0.0);
        assert!(columns.difference() <= largest, "seed {seed}: {columns:?}");
        assert_eq!(columns.left.len() + columns.right.len(), heights.len());

        let padded = distribute_children_into_columns(&heights, 12.0);
        assert!(padded.difference() <= largest + 12.0, "seed {seed}: {padded:?}");
    }
}
