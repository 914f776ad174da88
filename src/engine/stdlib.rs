//! Standard library discovery and injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::syntax::{Position, Token, TokenKind};

pub const SOURCE_EXTENSION: &str = "macrohex";

pub fn is_macrohex_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Recursively scans `root` for `.macrohex` files.
///
/// The returned list is sorted so injection order does not depend on the
/// file system. Unreadable entries are skipped.
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_macrohex_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// One `include <path>` action per std file, attributed to `origin`.
pub fn include_tokens(origin: &Arc<str>, files: &[PathBuf]) -> Vec<Token> {
    files
        .iter()
        .map(|path| {
            Token::new(
                origin.clone(),
                Position::default(),
                format!("include {}", path.display()),
                TokenKind::CompilerAction,
            )
        })
        .collect()
}
