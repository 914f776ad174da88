//! The token model: the single unit every pipeline pass consumes and produces.

use std::fmt;
use std::sync::Arc;

// =============================
// Token kinds
// =============================

/// What a token asks the compiler to do with its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `#...` directive: an include or a generator invocation.
    CompilerAction,
    /// `!...` literal output fragment, never expanded.
    Pattern,
    /// `<"name" body>` macro definition; removed once registered.
    MacroDefinition,
    /// Any other line: the name of a macro to splice in.
    MacroCall,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [
        TokenKind::CompilerAction,
        TokenKind::Pattern,
        TokenKind::MacroDefinition,
        TokenKind::MacroCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::CompilerAction => "CompilerAction",
            TokenKind::Pattern => "Pattern",
            TokenKind::MacroDefinition => "MacroDefinition",
            TokenKind::MacroCall => "MacroCall",
        }
    }

    /// Kinds the fixed-point loop still has work for.
    pub fn is_expandable(&self) -> bool {
        matches!(self, TokenKind::CompilerAction | TokenKind::MacroCall)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================
// Positions
// =============================

/// Zero-based line and character index inside a source file.
///
/// Rendered one-based in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.line + 1, self.column + 1)
    }
}

// =============================
// Token
// =============================

/// A lexed unit of macrohex source.
///
/// `origin` is the path of the file the token was read from; macro bodies keep
/// the origin of the file that defined them.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub origin: Arc<str>,
    pub position: Position,
    pub content: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(
        origin: Arc<str>,
        position: Position,
        content: impl Into<String>,
        kind: TokenKind,
    ) -> Self {
        Self {
            origin,
            position,
            content: content.into(),
            kind,
        }
    }

    /// The content as it appears in compiled output.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }
}

/// Counts tokens per kind, in [`TokenKind::ALL`] order.
pub fn count_by_kind(tokens: &[Token]) -> [(TokenKind, usize); 4] {
    TokenKind::ALL.map(|kind| (kind, tokens.iter().filter(|t| t.kind == kind).count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_calls_and_actions_are_expandable() {
        assert!(TokenKind::CompilerAction.is_expandable());
        assert!(TokenKind::MacroCall.is_expandable());
        assert!(!TokenKind::Pattern.is_expandable());
        assert!(!TokenKind::MacroDefinition.is_expandable());
    }

    #[test]
    fn positions_render_one_based() {
        assert_eq!(Position::new(0, 0).to_string(), "1, 1");
        assert_eq!(Position::new(4, 2).to_string(), "5, 3");
    }

    #[test]
    fn counts_tokens_by_kind() {
        let origin: Arc<str> = Arc::from("a.macrohex");
        let tokens = vec![
            Token::new(origin.clone(), Position::default(), "x", TokenKind::Pattern),
            Token::new(origin.clone(), Position::default(), "y", TokenKind::Pattern),
            Token::new(origin, Position::default(), "z", TokenKind::MacroCall),
        ];
        let counts = count_by_kind(&tokens);
        assert_eq!(counts[1], (TokenKind::Pattern, 2));
        assert_eq!(counts[3], (TokenKind::MacroCall, 1));
        assert_eq!(counts[0].1 + counts[2].1, 0);
    }
}
