//! SVG and JSON output of laid-out outlines

mod common;

use common::{single_level, StubMeasurer};
use mindmap_layout::layout::{layout_tree, LayoutConfig, LayoutType};
use mindmap_layout::{dump_with_config, parse, render_svg, render_with_config, LayoutDump, RenderConfig, SvgConfig, Tree};

fn laid_out(source: &str) -> (Tree, mindmap_layout::Stylesheet) {
    let styles = single_level(LayoutType::Horizontal, 20.0, 10.0);
    let measurer = StubMeasurer::fixed(40.0, 20.0);
    let mut tree = parse(source).unwrap();
    layout_tree(&mut tree, &styles, &measurer, &LayoutConfig::default(), 0.0, 0.0).unwrap();
    (tree, styles)
}

fn summary(tree: &Tree) -> String {
    tree.descendants(tree.root())
        .into_iter()
        .map(|id| {
            let node = &tree[id];
            format!("{} {},{} {}x{}", node.text, node.x, node.y, node.width, node.height)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn vertical_root_geometry() {
    let (tree, _) = laid_out("# Root {layoutType: vertical}\n- a\n- b\n");
    insta::assert_snapshot!(summary(&tree), @r###"
    Root 25,0 40x20
    a 0,40 40x20
    b 50,40 40x20
    "###);
}

#[test]
fn svg_has_one_connector_per_visible_edge() {
    let (tree, styles) = laid_out("# Root\n- a {collapsed: true}\n  - hidden\n- b\n  - b1\n");
    let svg = render_svg(&tree, &styles, &SvgConfig::default().with_standalone(false)).unwrap();

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<rect").count(), 4);
    assert_eq!(svg.matches("<path").count(), 3);
    assert!(!svg.contains(">hidden<"));
    let connectors = svg.find("<path").unwrap();
    let first_node = svg.find("<rect").unwrap();
    assert!(connectors < first_node, "connectors are painted below nodes");
}

#[test]
fn dump_reports_hidden_nodes_and_edges() {
    let (tree, styles) = laid_out("# Root\n- a {collapsed: true}\n  - hidden\n- b\n");
    let dump = LayoutDump::from_tree(&tree, &styles).unwrap();

    assert_eq!(dump.edges.len(), 2);
    let hidden: Vec<_> = dump.nodes.iter().filter(|n| n.hidden).map(|n| n.text.clone()).collect();
    assert_eq!(hidden, vec!["hidden".to_string()]);
    for edge in &dump.edges {
        assert_eq!(edge.from, tree[tree.root()].id);
    }
}

#[test]
fn pipeline_with_default_stylesheet() {
    let config = RenderConfig::default();
    let source = "# Weekend\n## Errands\n- groceries\n- laundry\n## Fun\n- hike\n";

    let svg = render_with_config(source, &config).unwrap();
    assert!(svg.contains("groceries"));
    assert!(svg.contains("mm-level-3"));

    let json = dump_with_config(source, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0]["layout"], "classic");
}

#[test]
fn layout_override_from_config() {
    let config = RenderConfig::default().with_root_layout(LayoutType::Outline);
    let json = dump_with_config("# Notes\n- one\n- two\n", &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"][0]["layout"], "outline");
}

#[test]
fn wrapped_label_stays_inside_its_box() {
    let label = "a fairly long branch label that must wrap";
    let config = RenderConfig::default().with_svg(SvgConfig::default().with_standalone(false));
    let source = format!("# Root\n- {label} {{maxWidth: 60}}\n");
    let svg = render_with_config(&source, &config).unwrap();

    assert!(!svg.contains(&format!(">{label}<")));
    let lines: Vec<&str> = svg
        .split("<tspan")
        .skip(1)
        .filter_map(|span| span.split_once('>'))
        .filter_map(|(_, rest)| rest.split_once("</tspan>"))
        .map(|(text, _)| text)
        .collect();
    assert!(lines.len() > 1, "expected several lines: {svg}");
    assert_eq!(lines.join(" "), label);

    let json = dump_with_config(&source, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let branch = &value["nodes"][1];
    assert!(branch["width"].as_f64().unwrap() < 120.0);
}
