//! Reader for markdown-style outlines

mod grammar;
pub mod lexer;

pub use grammar::parse;
