//! macrohex error handling.
//!
//! Every failure is fatal to the compilation and is represented by one
//! [`MacroHexError`]. Errors are created through [`ErrorReporting`], which binds
//! the file name, position and source text, so passes never assemble the
//! struct by hand.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::{split_lines, Position, Token};

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Text of one source file, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Base file name shown in messages.
    pub name: String,
    content: Option<String>,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    /// A context with a name but no text; errors carry no source label.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn to_named_source(&self) -> Option<Arc<NamedSource<String>>> {
        self.content
            .as_ref()
            .map(|content| Arc::new(NamedSource::new(self.name.clone(), content.clone())))
    }

    /// Maps a position to a span running to the end of its line.
    pub fn span_at(&self, position: Position) -> Option<SourceSpan> {
        let content = self.content.as_deref()?;
        let lines = split_lines(content);
        let (start, line) = *lines.get(position.line)?;
        let offset = line
            .char_indices()
            .nth(position.column)
            .map_or(line.len(), |(byte, _)| byte);
        Some((start + offset, line.len() - offset).into())
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Everything that can abort a compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("could not find {path}")]
    FileNotFound { path: String },
    #[error("failed to {operation} {path}: {reason}")]
    Io {
        operation: String,
        path: String,
        reason: String,
    },
    #[error("macro never closed")]
    UnclosedMacro,
    #[error("expected something after {marker}")]
    EmptyDirective { marker: char },
    #[error("includes require 1 arg, but got {actual}")]
    IncludeArity { actual: usize },
    #[error("malformed macro definition: {reason}")]
    MalformedDefinition { reason: String },
    #[error("macro already exists by name of {name}")]
    DuplicateMacro { name: String },
    #[error("couldn't find macro \"{name}\"")]
    UndefinedMacro { name: String },
    #[error("generator expected gen type and at least one argument")]
    GeneratorArity,
    #[error("generator expected valid gen type but got {found}")]
    UnknownGenerator { found: String },
    #[error("{generator} generator expected {expected} argument(s) but got {actual}")]
    GeneratorArguments {
        generator: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid number {value}")]
    InvalidNumber { value: String },
    #[error("invalid configuration in {path}: {reason}")]
    InvalidConfig { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Lex,
    Structure,
    Resolution,
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Io => "io",
            ErrorCategory::Lex => "lex",
            ErrorCategory::Structure => "structure",
            ErrorCategory::Resolution => "resolution",
            ErrorCategory::Config => "config",
        }
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. } | Self::Io { .. } => ErrorCategory::Io,
            Self::UnclosedMacro | Self::EmptyDirective { .. } => ErrorCategory::Lex,
            Self::IncludeArity { .. } | Self::MalformedDefinition { .. } => {
                ErrorCategory::Structure
            }
            Self::DuplicateMacro { .. }
            | Self::UndefinedMacro { .. }
            | Self::GeneratorArity
            | Self::UnknownGenerator { .. }
            | Self::GeneratorArguments { .. }
            | Self::InvalidNumber { .. } => ErrorCategory::Resolution,
            Self::InvalidConfig { .. } => ErrorCategory::Config,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "file_not_found",
            Self::Io { .. } => "io",
            Self::UnclosedMacro => "unclosed_macro",
            Self::EmptyDirective { .. } => "empty_directive",
            Self::IncludeArity { .. } => "include_arity",
            Self::MalformedDefinition { .. } => "malformed_definition",
            Self::DuplicateMacro { .. } => "duplicate_macro",
            Self::UndefinedMacro { .. } => "undefined_macro",
            Self::GeneratorArity => "generator_arity",
            Self::UnknownGenerator { .. } => "unknown_generator",
            Self::GeneratorArguments { .. } => "generator_arguments",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            Self::UnclosedMacro => Some("every `<` opening a definition needs a matching `>`"),
            Self::IncludeArity { .. } => Some("use `#include <path>` with a path free of spaces"),
            Self::MalformedDefinition { .. } => Some("definitions look like <\"name\" body>"),
            Self::DuplicateMacro { .. } => {
                Some("macro names are shared by every file in a compilation, std included")
            }
            Self::UndefinedMacro { .. } => {
                Some("define it with <\"name\" ...> or include the file that does")
            }
            Self::UnknownGenerator { .. } => Some("known generators: num, bits"),
            _ => None,
        }
    }
}

// ============================================================================
// THE ERROR
// ============================================================================

/// File and position an error points at.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub file: String,
    pub position: Position,
}

/// Source text and span used for the miette label.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub span: SourceSpan,
}

#[derive(Debug)]
pub struct MacroHexError {
    pub kind: ErrorKind,
    pub location: Option<Location>,
    pub source_info: Option<SourceInfo>,
    /// Content of the offending token, when one is known.
    pub token: Option<String>,
}

impl MacroHexError {
    /// An error not tied to any source position (I/O, configuration).
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
            source_info: None,
            token: None,
        }
    }

    pub fn io(operation: &str, path: impl fmt::Display, err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            operation: operation.to_string(),
            path: path.to_string(),
            reason: err.to_string(),
        })
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn error_code(&self) -> String {
        format!(
            "macrohex::{}::{}",
            self.category().as_str(),
            self.kind.code_suffix()
        )
    }
}

impl std::error::Error for MacroHexError {}

impl fmt::Display for MacroHexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} {}: {}", location.file, location.position, self.kind)?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(token) = &self.token {
            write!(f, "\n    -> {}", token)?;
        }
        Ok(())
    }
}

impl Diagnostic for MacroHexError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let text = self.kind.code_suffix().replace('_', " ");
        let label = LabeledSpan::new_with_span(Some(text), info.span);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR REPORTING
// ============================================================================

/// Creates located errors for one source file.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, position: Position) -> MacroHexError;

    /// Like [`ErrorReporting::report`], quoting the offending token.
    fn report_token(&self, kind: ErrorKind, token: &Token) -> MacroHexError {
        let mut error = self.report(kind, token.position);
        error.token = Some(token.content.clone());
        error
    }
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ErrorKind, position: Position) -> MacroHexError {
        let source_info = match (self.to_named_source(), self.span_at(position)) {
            (Some(source), Some(span)) => Some(SourceInfo { source, span }),
            _ => None,
        };
        MacroHexError {
            kind,
            location: Some(Location {
                file: self.name.clone(),
                position,
            }),
            source_info,
            token: None,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: MacroHexError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
