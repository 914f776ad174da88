//! Line-oriented lexer for macrohex source text.
//!
//! The lexer is a two-mode automaton. Outside a macro definition each line is
//! classified by its first significant character and consumed whole. Inside a
//! definition every character is accumulated into the open body until the
//! matching `>` brings the nesting depth back to zero.
//!
//! Anything after the `>` that closes a definition on the same line is
//! discarded.

use std::sync::Arc;

use crate::errors::{ErrorKind, ErrorReporting, MacroHexError};
use crate::syntax::token::{Position, Token, TokenKind};

/// Splits source text on `\r\n`, `\r` or `\n`.
///
/// Each line is returned with the byte offset it starts at so diagnostics can
/// map a [`Position`] back into the source text.
pub fn split_lines(source: &str) -> Vec<(usize, &str)> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((start, &source[start..i]));
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push((start, &source[start..i]));
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push((start, &source[start..]));
    lines
}

fn strip_comment(line: &str) -> &str {
    line.find("//").map_or(line, |index| &line[..index])
}

/// A macro body still being accumulated.
#[derive(Debug)]
struct OpenDefinition {
    position: Position,
    body: String,
}

/// Tokenizer for one source text.
///
/// A lexer is single use: [`Lexer::tokenize`] consumes it.
#[derive(Debug)]
pub struct Lexer {
    origin: Arc<str>,
    line_offset: usize,
    tokens: Vec<Token>,
    open: Option<OpenDefinition>,
    depth: usize,
}

impl Lexer {
    pub fn new(origin: Arc<str>) -> Self {
        Self {
            origin,
            line_offset: 0,
            tokens: Vec::new(),
            open: None,
            depth: 0,
        }
    }

    /// Shifts reported line numbers, used when re-lexing a macro body so its
    /// tokens point near the definition.
    pub fn with_line_offset(mut self, line_offset: usize) -> Self {
        self.line_offset = line_offset;
        self
    }

    pub fn tokenize(
        mut self,
        source: &str,
        reporter: &dyn ErrorReporting,
    ) -> Result<Vec<Token>, MacroHexError> {
        for (index, (_, raw)) in split_lines(source).into_iter().enumerate() {
            let line = strip_comment(raw);
            if line.trim().is_empty() {
                // Body line numbers are recovered by counting breaks.
                if let Some(open) = self.open.as_mut() {
                    open.body.push('\n');
                }
                continue;
            }
            let line_number = self.line_offset + index;

            for (column, (byte, ch)) in line.char_indices().enumerate() {
                let position = Position::new(line_number, column);
                let complete = if self.depth == 0 {
                    self.scan_normal(line, byte, ch, position, reporter)?
                } else {
                    self.scan_macro(ch)
                };
                if complete {
                    break;
                }
            }

            // Macro bodies keep their line structure.
            if let Some(open) = self.open.as_mut() {
                open.body.push('\n');
            }
        }

        match self.open {
            Some(open) => Err(reporter.report(ErrorKind::UnclosedMacro, open.position)),
            None => Ok(self.tokens),
        }
    }

    /// Returns `true` once the rest of the line has been consumed.
    fn scan_normal(
        &mut self,
        line: &str,
        byte: usize,
        ch: char,
        position: Position,
        reporter: &dyn ErrorReporting,
    ) -> Result<bool, MacroHexError> {
        match ch {
            '#' | '!' => {
                let rest = &line[byte + ch.len_utf8()..];
                if rest.is_empty() {
                    return Err(reporter.report(ErrorKind::EmptyDirective { marker: ch }, position));
                }
                let kind = if ch == '#' {
                    TokenKind::CompilerAction
                } else {
                    TokenKind::Pattern
                };
                self.push(rest, kind, position);
                Ok(true)
            }
            '<' => {
                self.open = Some(OpenDefinition {
                    position,
                    body: String::new(),
                });
                self.depth = 1;
                Ok(false)
            }
            ' ' | '\t' => Ok(false),
            _ => {
                self.push(&line[byte..], TokenKind::MacroCall, position);
                Ok(true)
            }
        }
    }

    fn scan_macro(&mut self, ch: char) -> bool {
        match ch {
            '<' => {
                self.depth += 1;
                self.append('<');
                false
            }
            '>' => {
                self.depth -= 1;
                if self.depth == 0 {
                    self.close();
                    return true;
                }
                self.append('>');
                false
            }
            other => {
                self.append(other);
                false
            }
        }
    }

    fn append(&mut self, ch: char) {
        if let Some(open) = self.open.as_mut() {
            open.body.push(ch);
        }
    }

    fn close(&mut self) {
        if let Some(open) = self.open.take() {
            self.tokens.push(Token::new(
                self.origin.clone(),
                open.position,
                open.body,
                TokenKind::MacroDefinition,
            ));
        }
    }

    fn push(&mut self, content: &str, kind: TokenKind, position: Position) {
        self.tokens
            .push(Token::new(self.origin.clone(), position, content, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;

    fn lex(source: &str) -> Result<Vec<Token>, MacroHexError> {
        let context = SourceContext::from_file("test.macrohex", source);
        Lexer::new(Arc::from("test.macrohex")).tokenize(source, &context)
    }

    fn kinds_and_content(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens
            .iter()
            .map(|t| (t.kind, t.content.as_str()))
            .collect()
    }

    #[test]
    fn splits_on_every_line_ending() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\nd")
            .into_iter()
            .map(|(_, l)| l)
            .collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\r\nb")[1].0, 3);
    }

    #[test]
    fn classifies_lines_by_first_significant_character() {
        let tokens = lex("#include lib\n!wawa\n   \tdouble\n").unwrap();
        assert_eq!(
            kinds_and_content(&tokens),
            vec![
                (TokenKind::CompilerAction, "include lib"),
                (TokenKind::Pattern, "wawa"),
                (TokenKind::MacroCall, "double"),
            ]
        );
        assert_eq!(tokens[2].position, Position::new(2, 4));
    }

    #[test]
    fn strips_comments_and_skips_blank_lines() {
        let tokens = lex("// header\n\n   \n!qaq // trailing\nname//x\n").unwrap();
        assert_eq!(
            kinds_and_content(&tokens),
            vec![(TokenKind::Pattern, "qaq "), (TokenKind::MacroCall, "name")]
        );
        assert_eq!(tokens[0].position.line, 3);
    }

    #[test]
    fn accumulates_multi_line_definitions_with_nesting() {
        let source = "<\"outer\"\n  !a\n  <\"inner\" !b>\n>\n!after";
        let tokens = lex(source).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::MacroDefinition);
        assert_eq!(tokens[0].content, "\"outer\"\n  !a\n  <\"inner\" !b>\n");
        assert_eq!(tokens[0].position, Position::new(0, 0));
        assert_eq!(tokens[1].content, "after");
    }

    #[test]
    fn blank_and_comment_lines_keep_their_place_in_a_body() {
        let source = "<\"m\"\n  !a\n\n  // note\n  nope\n>";
        let tokens = lex(source).unwrap();
        assert_eq!(tokens[0].content, "\"m\"\n  !a\n\n\n  nope\n");
    }

    #[test]
    fn discards_text_after_a_closing_bracket() {
        let tokens = lex("<\"x\" !w> !ignored\n!kept").unwrap();
        assert_eq!(
            kinds_and_content(&tokens),
            vec![
                (TokenKind::MacroDefinition, "\"x\" !w"),
                (TokenKind::Pattern, "kept"),
            ]
        );
    }

    #[test]
    fn definition_may_follow_leading_whitespace() {
        let tokens = lex("  <\"x\" !w>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::MacroDefinition);
        assert_eq!(tokens[0].position, Position::new(0, 2));
    }

    #[test]
    fn unclosed_definition_reports_where_it_began() {
        let err = lex("!a\n  <\"open\" !w\n!b\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnclosedMacro);
        let location = err.location.as_ref().expect("located");
        assert_eq!(location.position, Position::new(1, 2));
        assert!(err.to_string().starts_with("test.macrohex 2, 3: macro never closed"));
    }

    #[test]
    fn bare_markers_are_rejected() {
        let err = lex("!ok\n#").unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyDirective { marker: '#' });
        let err = lex("  !").unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyDirective { marker: '!' });
    }

    #[test]
    fn line_offset_shifts_positions() {
        let context = SourceContext::from_file("body", "!a");
        let tokens = Lexer::new(Arc::from("lib.macrohex"))
            .with_line_offset(7)
            .tokenize("!a", &context)
            .unwrap();
        assert_eq!(tokens[0].position.line, 7);
        assert_eq!(&*tokens[0].origin, "lib.macrohex");
    }
}
