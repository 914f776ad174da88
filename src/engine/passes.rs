//! The rewriting passes of the per-file pipeline.
//!
//! Every pass consumes a token sequence and returns a rebuilt one. A token a
//! pass expands is replaced by its expansion; all other tokens pass through in
//! order.

use std::path::{Path, PathBuf};

use crate::engine::{parse_file, CompileContext, ParseMode, SourceMap};
use crate::errors::{ErrorKind, ErrorReporting, MacroHexError};
use crate::generators::{self, GeneratorType};
use crate::macros::MacroRegistry;
use crate::syntax::{Lexer, Token, TokenKind};

// ============================================================================
// INCLUDES
// ============================================================================

fn is_include(token: &Token) -> bool {
    token.kind == TokenKind::CompilerAction && token.content.starts_with("include")
}

/// Splices every `include <path>` action with the included file's tokens.
///
/// Included files run the include-only pipeline, so the tokens spliced in are
/// already free of includes. A file whose base name was seen before
/// contributes nothing.
pub fn resolve_includes(
    ctx: &mut CompileContext,
    tokens: Vec<Token>,
) -> Result<Vec<Token>, MacroHexError> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !is_include(&token) {
            output.push(token);
            continue;
        }

        let fields: Vec<&str> = token.content.split_whitespace().collect();
        let reporter = ctx.sources.reporter_for(&token.origin);
        let [_, requested] = fields.as_slice() else {
            return Err(reporter.report_token(
                ErrorKind::IncludeArity {
                    actual: fields.len(),
                },
                &token,
            ));
        };

        let path = include_path(ctx, &token.origin, requested);
        if !ctx.loader.exists(&path) {
            return Err(reporter.report_token(
                ErrorKind::FileNotFound {
                    path: path.display().to_string(),
                },
                &token,
            ));
        }
        output.extend(parse_file(ctx, &path, ParseMode::IncludeOnly)?);
    }
    Ok(output)
}

/// The path as written, or relative to the including file when that misses.
fn include_path(ctx: &CompileContext, includer: &str, requested: &str) -> PathBuf {
    let literal = PathBuf::from(requested);
    if ctx.loader.exists(&literal) {
        return literal;
    }
    match Path::new(includer).parent() {
        Some(dir) => dir.join(requested),
        None => literal,
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// Splits a definition body `"name" rest` into the name and left-trimmed rest.
///
/// Also returns how many line breaks were trimmed between the name and the
/// body, so the body can be lexed at its real line.
pub fn split_definition(content: &str) -> Result<(&str, &str, usize), ErrorKind> {
    if content.matches('"').count() < 2 {
        return Err(ErrorKind::MalformedDefinition {
            reason: "expected a quoted macro name".to_string(),
        });
    }
    let Some(rest) = content.strip_prefix('"') else {
        let found = content.chars().next().unwrap_or_default();
        return Err(ErrorKind::MalformedDefinition {
            reason: format!("expected first \" but got {}", found),
        });
    };
    let (name, after) = rest.split_once('"').unwrap_or((rest, ""));
    let body = after.trim_start();
    let skipped_lines = after[..after.len() - body.len()].matches('\n').count();
    Ok((name, body, skipped_lines))
}

/// Registers every definition and drops it from the stream.
pub fn register_definitions(
    tokens: Vec<Token>,
    registry: &mut MacroRegistry,
    sources: &SourceMap,
) -> Result<Vec<Token>, MacroHexError> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind != TokenKind::MacroDefinition {
            output.push(token);
            continue;
        }

        let reporter = sources.reporter_for(&token.origin);
        let (name, body, skipped_lines) =
            split_definition(&token.content).map_err(|kind| reporter.report_token(kind, &token))?;

        let body_tokens = Lexer::new(token.origin.clone())
            .with_line_offset(token.position.line + skipped_lines)
            .tokenize(body, &*reporter)?;

        registry
            .register(name, body_tokens)
            .map_err(|kind| reporter.report_token(kind, &token))?;
    }
    Ok(output)
}

// ============================================================================
// FIXED-POINT PASSES
// ============================================================================

/// Replaces every macro call with the registered body.
///
/// Spliced tokens are not revisited in the same pass.
pub fn expand_calls(
    tokens: Vec<Token>,
    registry: &MacroRegistry,
    sources: &SourceMap,
) -> Result<Vec<Token>, MacroHexError> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind != TokenKind::MacroCall {
            output.push(token);
            continue;
        }
        match registry.resolve(&token.content) {
            Some(body) => output.extend_from_slice(body),
            None => {
                let kind = ErrorKind::UndefinedMacro {
                    name: token.content.clone(),
                };
                return Err(sources.reporter_for(&token.origin).report_token(kind, &token));
            }
        }
    }
    Ok(output)
}

fn is_generator(token: &Token) -> bool {
    token.kind == TokenKind::CompilerAction && token.content.starts_with('g')
}

/// Runs every `g <type> <args>...` action.
pub fn run_generators(
    ctx: &mut CompileContext,
    tokens: Vec<Token>,
) -> Result<Vec<Token>, MacroHexError> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !is_generator(&token) {
            output.push(token);
            continue;
        }

        let reporter = ctx.sources.reporter_for(&token.origin);
        let fields: Vec<&str> = token.content[1..].split_whitespace().collect();
        let [name, args @ ..] = fields.as_slice() else {
            return Err(reporter.report_token(ErrorKind::GeneratorArity, &token));
        };
        if args.is_empty() {
            return Err(reporter.report_token(ErrorKind::GeneratorArity, &token));
        }

        let generated = name
            .parse::<GeneratorType>()
            .and_then(|generator| {
                generators::generate(generator, args, &token, &mut ctx.solver, &ctx.log)
            })
            .map_err(|kind| reporter.report_token(kind, &token))?;
        output.extend(generated);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax::Position;

    fn token(content: &str, kind: TokenKind) -> Token {
        Token::new(Arc::from("main.macrohex"), Position::new(3, 0), content, kind)
    }

    fn contents(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.content.as_str()).collect()
    }

    #[test]
    fn splits_definitions() {
        assert_eq!(split_definition("\"dbl\" !a").unwrap(), ("dbl", "!a", 0));
        assert_eq!(split_definition("\"x\"\n\n  !w\n").unwrap(), ("x", "!w\n", 2));
        assert_eq!(split_definition("\"\"").unwrap(), ("", "", 0));
    }

    #[test]
    fn rejects_malformed_definitions() {
        assert!(matches!(
            split_definition("noquotes !a"),
            Err(ErrorKind::MalformedDefinition { .. })
        ));
        assert_eq!(
            split_definition("x \"name\" !a"),
            Err(ErrorKind::MalformedDefinition {
                reason: "expected first \" but got x".into()
            })
        );
    }

    #[test]
    fn definitions_are_registered_and_removed() {
        let mut sources = SourceMap::default();
        sources.insert(
            Arc::from("main.macrohex"),
            SourceContext::from_file("main.macrohex", ""),
        );
        let mut registry = MacroRegistry::new();
        let tokens = vec![
            token("\"pair\"\n  !a\n  !b\n", TokenKind::MacroDefinition),
            token("pair", TokenKind::MacroCall),
        ];
        let output = register_definitions(tokens, &mut registry, &sources).unwrap();
        assert_eq!(contents(&output), vec!["pair"]);

        let body = registry.lookup("pair").unwrap();
        assert_eq!(contents(body), vec!["a", "b"]);
        // definition on line 3, body starts one line further down
        assert_eq!(body[0].position, Position::new(4, 0));
        assert_eq!(body[1].position, Position::new(5, 2));
        assert_eq!(&*body[0].origin, "main.macrohex");
    }

    #[test]
    fn body_positions_count_blank_lines() {
        let mut sources = SourceMap::default();
        sources.insert(
            Arc::from("main.macrohex"),
            SourceContext::from_file("main.macrohex", ""),
        );
        let mut registry = MacroRegistry::new();
        let tokens = vec![token("\"gap\"\n  !a\n\n\n  !b\n", TokenKind::MacroDefinition)];
        register_definitions(tokens, &mut registry, &sources).unwrap();

        let body = registry.lookup("gap").unwrap();
        assert_eq!(body[0].position, Position::new(4, 0));
        assert_eq!(body[1].position, Position::new(7, 2));
    }

    #[test]
    fn calls_resolve_exact_then_trimmed() {
        let mut registry = MacroRegistry::new();
        registry
            .register("dbl", vec![token("a", TokenKind::Pattern)])
            .unwrap();
        let tokens = vec![
            token("w", TokenKind::Pattern),
            token("dbl  ", TokenKind::MacroCall),
            token("dbl", TokenKind::MacroCall),
        ];
        let output = expand_calls(tokens, &registry, &SourceMap::default()).unwrap();
        assert_eq!(contents(&output), vec!["w", "a", "a"]);
    }

    #[test]
    fn unknown_calls_fail_with_the_token() {
        let err = expand_calls(
            vec![token("missing", TokenKind::MacroCall)],
            &MacroRegistry::new(),
            &SourceMap::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UndefinedMacro {
                name: "missing".into()
            }
        );
        assert_eq!(err.token.as_deref(), Some("missing"));
        assert_eq!(err.location.unwrap().file, "main.macrohex");
    }
}
