//! Where source text comes from.
//!
//! The engine only talks to a [`SourceLoader`], so the same pipeline runs over
//! the real file system or an in-memory file set.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::stdlib;

pub trait SourceLoader {
    fn exists(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> io::Result<String>;

    /// Every `*.macrohex` file under `dir`, sorted. `None` when `dir` is missing.
    fn find_sources(&self, dir: &Path) -> Option<Vec<PathBuf>>;
}

/// Name used to detect repeated inclusion: the base file name.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// FILE SYSTEM
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn find_sources(&self, dir: &Path) -> Option<Vec<PathBuf>> {
        if !dir.is_dir() {
            return None;
        }
        Some(stdlib::discover_sources(dir))
    }
}

// ============================================================================
// IN MEMORY
// ============================================================================

/// A fixed set of files keyed by path, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not loaded", path.display()))
        })
    }

    fn find_sources(&self, dir: &Path) -> Option<Vec<PathBuf>> {
        let found: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|path| path.starts_with(dir) && stdlib::is_macrohex_file(path))
            .cloned()
            .collect();
        (!found.is_empty()).then_some(found)
    }
}
