//! Outline reader: turns markdown-style headings and bullets into a [`Tree`]

use crate::error::{ParseError, Span};
use crate::parser::lexer::{describe, lex, line_marker, Marker, Token};
use crate::style::{ConfigKey, ConfigValue};
use crate::tree::{NodeId, Tree};

const TAB_WIDTH: usize = 4;

/// Rank of bullet and paragraph lines before indentation is added; above
/// every heading depth so list items always nest under the last heading
const LIST_RANK: usize = 10;

/// One non-blank source line, split into its parts
#[derive(Debug)]
struct Line<'a> {
    rank: usize,
    heading: bool,
    text: &'a str,
    text_span: Span,
    /// Trailing override block and its absolute offset
    block: Option<(&'a str, usize)>,
}

/// Overrides read from a `{key: value, ...}` block
#[derive(Debug, Default, PartialEq)]
struct Overrides {
    values: Vec<(ConfigKey, ConfigValue)>,
    collapsed: Option<bool>,
}

/// Parse an outline document into a tree
///
/// The first content line becomes the root. Every error found is reported,
/// not just the first one.
pub fn parse(input: &str) -> Result<Tree, Vec<ParseError>> {
    let mut errors = Vec::new();
    let mut tree: Option<Tree> = None;
    let mut root_heading: Option<usize> = None;
    // (rank, node) pairs of the open ancestors; the root is never popped
    let mut stack: Vec<(usize, NodeId)> = Vec::new();

    let mut offset = 0;
    for raw in input.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();
        let Some(line) = split_line(raw.trim_end_matches(['\n', '\r']), start) else {
            continue;
        };

        if line.text.is_empty() {
            errors.push(ParseError::syntax(line.text_span.clone(), "expected node text"));
            continue;
        }

        let overrides = match line.block {
            Some((block, at)) => parse_overrides(block, at).unwrap_or_else(|errs| {
                errors.extend(errs);
                Overrides::default()
            }),
            None => Overrides::default(),
        };

        let node = match tree.as_mut() {
            None => {
                let created = Tree::new(line.text);
                let root = created.root();
                if line.heading {
                    root_heading = Some(line.rank);
                }
                stack.push((line.rank, root));
                tree = Some(created);
                root
            }
            Some(tree) => {
                if line.heading && root_heading.is_some_and(|depth| line.rank <= depth) {
                    errors.push(ParseError::syntax(
                        line.text_span.clone(),
                        "only one top-level heading is allowed",
                    ));
                    continue;
                }
                while stack.len() > 1 && stack.last().is_some_and(|(rank, _)| *rank >= line.rank) {
                    stack.pop();
                }
                let parent = stack.last().map(|(_, id)| *id).unwrap_or_else(|| tree.root());
                let id = tree.add_child(parent, line.text);
                stack.push((line.rank, id));
                id
            }
        };

        if let Some(tree) = tree.as_mut() {
            for (key, value) in overrides.values {
                tree[node].set_override(key, value);
            }
            if let Some(collapsed) = overrides.collapsed {
                tree[node].collapsed = collapsed;
            }
        }
    }

    match tree {
        None => Err(vec![ParseError::syntax(input.len()..input.len(), "the outline is empty")]),
        Some(_) if !errors.is_empty() => Err(errors),
        Some(tree) => Ok(tree),
    }
}

fn split_line(line: &str, start: usize) -> Option<Line<'_>> {
    let content = line.trim_start_matches([' ', '\t']);
    if content.trim().is_empty() {
        return None;
    }
    let indent_bytes = line.len() - content.len();
    let indent: usize = line[..indent_bytes]
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();

    let (rank, heading, body_at) = match line_marker(content) {
        Some((Marker::Heading(depth), len)) => (depth, true, len),
        Some((Marker::Bullet | Marker::Numbered, len)) => (LIST_RANK + indent, false, len),
        None => (LIST_RANK + indent, false, 0),
    };

    let body = content[body_at..].trim_end();
    let body_start = start + indent_bytes + body_at;
    let (text, block) = match body.rfind('{') {
        Some(open) if body.ends_with('}') => (&body[..open], Some((&body[open..], body_start + open))),
        _ => (body, None),
    };
    let text_trimmed = text.trim();
    let lead = text.len() - text.trim_start().len();
    let text_start = body_start + lead;

    Some(Line {
        rank,
        heading,
        text: text_trimmed,
        text_span: text_start..text_start + text_trimmed.len().max(1),
        block,
    })
}

/// Parse `{key: value, ...}`; `at` is the block's absolute offset
fn parse_overrides(block: &str, at: usize) -> Result<Overrides, Vec<ParseError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for (token, span) in lex(block) {
        let abs = at + span.start..at + span.end;
        match token {
            Ok(token) => tokens.push((token, abs)),
            Err(()) => errors.push(ParseError::syntax(abs, "unexpected character in override block")),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let end = at + block.len();
    let mut overrides = Overrides::default();
    // Skip the opening brace: the block always starts with one
    let mut pos = 1;
    loop {
        let Some((token, span)) = tokens.get(pos) else {
            errors.push(ParseError::expecting(end..end, "unterminated override block", &["'}'"]));
            break;
        };
        match token {
            Token::BraceClose => break,
            Token::Word(name) => {
                let key_span = span.clone();
                let name = name.clone();
                match tokens.get(pos + 1) {
                    Some((Token::Colon, _)) => {}
                    Some((other, span)) => {
                        errors.push(ParseError::expecting(
                            span.clone(),
                            format!("unexpected {} after '{name}'", describe(other)),
                            &["':'"],
                        ));
                        break;
                    }
                    None => {
                        errors.push(ParseError::expecting(end..end, "unterminated override block", &["':'"]));
                        break;
                    }
                }
                pos += 2;

                let first = pos;
                while let Some((token, _)) = tokens.get(pos) {
                    if matches!(token, Token::Comma | Token::BraceClose) {
                        break;
                    }
                    pos += 1;
                }
                if first == pos {
                    let at = tokens.get(pos).map(|(_, s)| s.clone()).unwrap_or(end..end);
                    errors.push(ParseError::syntax(at, format!("missing value for '{name}'")));
                } else {
                    let value_span = tokens[first].1.start..tokens[pos - 1].1.end;
                    let raw = value_text(&tokens[first..pos], &block[value_span.start - at..value_span.end - at]);
                    if let Err(err) = apply_entry(&mut overrides, &name, key_span, &raw, value_span) {
                        errors.push(err);
                    }
                }
                if let Some((Token::Comma, _)) = tokens.get(pos) {
                    pos += 1;
                }
            }
            other => {
                errors.push(ParseError::expecting(
                    span.clone(),
                    format!("unexpected {}", describe(other)),
                    &["configuration key", "'}'"],
                ));
                break;
            }
        }
    }

    if errors.is_empty() {
        Ok(overrides)
    } else {
        Err(errors)
    }
}

/// Text of a value: quoted strings lose their quotes, anything else is taken
/// verbatim from the source so `tap-root` or `Open Sans` survive intact
fn value_text(tokens: &[(Token, Span)], source: &str) -> String {
    match tokens {
        [(token @ Token::String(_), _)] => token.value_text().unwrap_or_default(),
        _ => source.to_string(),
    }
}

fn apply_entry(
    overrides: &mut Overrides,
    name: &str,
    key_span: Span,
    raw: &str,
    value_span: Span,
) -> Result<(), ParseError> {
    if name.eq_ignore_ascii_case("collapsed") {
        let collapsed = match raw {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ParseError::expecting(
                    value_span,
                    format!("invalid value '{raw}' for 'collapsed'"),
                    &["true", "false"],
                ))
            }
        };
        overrides.collapsed = Some(collapsed);
        return Ok(());
    }

    let key: ConfigKey = name.parse().map_err(|_| {
        let mut expected: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.name()).collect();
        expected.push("collapsed");
        ParseError::expecting(key_span, format!("unknown configuration key '{name}'"), &expected)
    })?;
    let value = key
        .parse_value(raw)
        .map_err(|err| ParseError::syntax(value_span, err.to_string()))?;
    overrides.values.push((key, value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Indented `text` rendering of the tree for structural comparisons
    fn outline(tree: &Tree) -> Vec<String> {
        tree.descendants(tree.root())
            .into_iter()
            .map(|id| format!("{}{}", "  ".repeat(tree[id].level - 1), tree[id].text))
            .collect()
    }

    #[test]
    fn test_headings_and_bullets_nest() {
        let tree = parse(
            "# Project\n\
             ## Goals\n\
             - ship\n\
             \x20\x20- on time\n\
             - learn\n\
             ## Risks\n\
             1. scope\n",
        )
        .unwrap();
        assert_eq!(
            outline(&tree),
            vec!["Project", "  Goals", "    ship", "      on time", "    learn", "  Risks", "    scope"]
        );
    }

    #[test]
    fn test_tabs_count_as_four_spaces() {
        let tree = parse("# Root\n- a\n\t- b\n    - c\n").unwrap();
        assert_eq!(outline(&tree), vec!["Root", "  a", "    b", "    c"]);
    }

    #[test]
    fn test_heading_jump_attaches_to_nearest_shallower() {
        let tree = parse("# Root\n#### Deep\n## Back\n").unwrap();
        assert_eq!(outline(&tree), vec!["Root", "  Deep", "  Back"]);
    }

    #[test]
    fn test_first_bullet_becomes_root_without_headings() {
        let tree = parse("- topic\n  - idea\n- sibling\n").unwrap();
        assert_eq!(outline(&tree), vec!["topic", "  idea", "  sibling"]);
    }

    #[test]
    fn test_override_block() {
        let tree = parse("# Root {layoutType: tap-root}\n## Left {direction: left, parentPadding: 40}\n").unwrap();
        let root = tree.root();
        assert_eq!(tree[root].text, "Root");
        assert_eq!(
            tree[root].overrides.get(&ConfigKey::LayoutType),
            Some(&ConfigValue::Text("taproot".into()))
        );
        let child = tree.children(root)[0];
        assert_eq!(tree[child].text, "Left");
        assert_eq!(
            tree[child].overrides.get(&ConfigKey::ParentPadding),
            Some(&ConfigValue::Number(40.0))
        );
    }

    #[test]
    fn test_quoted_and_multiword_values() {
        let tree = parse("# Root {fill: \"#ffeeaa\", fontFamily: Open Sans, collapsed: true}\n").unwrap();
        let root = &tree[tree.root()];
        assert_eq!(root.overrides.get(&ConfigKey::Fill), Some(&ConfigValue::Text("#ffeeaa".into())));
        assert_eq!(
            root.overrides.get(&ConfigKey::FontFamily),
            Some(&ConfigValue::Text("Open Sans".into()))
        );
        assert!(root.collapsed);
    }

    #[test]
    fn test_unknown_key_reports_span() {
        let source = "# Root\n- item {colour: red}\n";
        let errors = parse(source).unwrap_err();
        assert_eq!(errors.len(), 1);
        let span = errors[0].span().clone();
        assert_eq!(&source[span], "colour");
    }

    #[test]
    fn test_bad_value_reports_value_span() {
        let source = "# Root {parentPadding: wide}\n";
        let errors = parse(source).unwrap_err();
        assert_eq!(&source[errors[0].span().clone()], "wide");
    }

    #[test]
    fn test_errors_are_collected() {
        let errors = parse("# Root\n- a {nope: 1}\n# Again\n- b {layoutType: spiral}\n").unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_second_top_level_heading_is_rejected() {
        let source = "# One\n# Two\n";
        let errors = parse(source).unwrap_err();
        assert_eq!(&source[errors[0].span().clone()], "Two");
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(parse("").is_err());
        assert!(parse("\n   \n\t\n").is_err());
    }
}
