//! Syntax layer for macrohex sources.
//!
//! A macrohex file is line oriented. The lexer turns each significant line into
//! one [`Token`]; only macro definitions (`<"name" ...>`) may span lines.

pub mod lexer;
pub mod token;

pub use lexer::{split_lines, Lexer};
pub use token::{count_by_kind, Position, Token, TokenKind};
