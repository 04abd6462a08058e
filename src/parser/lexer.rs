//! Lexers for outline lines using logos
//!
//! [`Marker`] classifies the start of a line (heading, bullet or numbered
//! item). [`Token`] splits a trailing `{key: value, ...}` override block.

use logos::Logos;

use crate::error::Span;

/// Line-start marker
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Marker {
    /// `#` to `######` followed by whitespace; carries the depth
    #[regex(r"#{1,6}[ \t]", |lex| lex.slice().trim_end().len())]
    Heading(usize),

    #[regex(r"[-*+][ \t]")]
    Bullet,

    #[regex(r"[0-9]+[.)][ \t]")]
    Numbered,
}

/// Classify the marker at the start of `line` (indentation already removed)
///
/// Returns the marker and the byte length it occupies, or `None` for a plain
/// text line.
pub fn line_marker(line: &str) -> Option<(Marker, usize)> {
    let mut lexer = Marker::lexer(line);
    match lexer.next() {
        Some(Ok(marker)) if lexer.span().start == 0 => Some((marker, lexer.span().end)),
        _ => None,
    }
}

/// Tokens of an override block
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token {
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"#[0-9a-fA-F]{3,8}", |lex| lex.slice().to_string())]
    HexColor(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string())]
    Word(String),
}

impl Token {
    /// Raw text of a value token, as a configuration key would parse it
    pub fn value_text(&self) -> Option<String> {
        match self {
            Token::String(s) | Token::HexColor(s) | Token::Word(s) => Some(s.clone()),
            Token::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Lex an override block; unrecognised input becomes `Err(span)`
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

/// Human-readable token name for error messages
pub fn describe(token: &Token) -> String {
    match token {
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Comma => "','".to_string(),
        Token::String(s) => format!("string \"{s}\""),
        Token::Number(n) => format!("number {n}"),
        Token::HexColor(c) => format!("color {c}"),
        Token::Word(w) => format!("'{w}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).filter_map(|(tok, _)| tok.ok()).collect()
    }

    #[test]
    fn test_heading_markers() {
        assert_eq!(line_marker("# Root"), Some((Marker::Heading(1), 2)));
        assert_eq!(line_marker("### Deep"), Some((Marker::Heading(3), 4)));
        assert_eq!(line_marker("#hashtag"), None);
        assert_eq!(line_marker("####### seven"), None);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(line_marker("- item"), Some((Marker::Bullet, 2)));
        assert_eq!(line_marker("* item"), Some((Marker::Bullet, 2)));
        assert_eq!(line_marker("12. item"), Some((Marker::Numbered, 4)));
        assert_eq!(line_marker("plain text"), None);
        assert_eq!(line_marker("-5 degrees"), None);
    }

    #[test]
    fn test_override_block_tokens() {
        assert_eq!(
            tokens(r##"{layoutType: tap-root, fill: "#fff", parentPadding: 40}"##),
            vec![
                Token::BraceOpen,
                Token::Word("layoutType".to_string()),
                Token::Colon,
                Token::Word("tap-root".to_string()),
                Token::Comma,
                Token::Word("fill".to_string()),
                Token::Colon,
                Token::String("#fff".to_string()),
                Token::Comma,
                Token::Word("parentPadding".to_string()),
                Token::Colon,
                Token::Number(40.0),
                Token::BraceClose,
            ]
        );
    }

    #[test]
    fn test_hex_colors_and_negative_numbers() {
        assert_eq!(
            tokens("#a0b1c2 -12.5"),
            vec![Token::HexColor("#a0b1c2".to_string()), Token::Number(-12.5)]
        );
    }
}
