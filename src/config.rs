//! Compiler configuration.
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! include_std: false
//! max_iterations: 50
//! solver:
//!   timeout_ms: 1000
//!   precision: 0.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, MacroHexError};
use crate::lattice::SolverConfig;

/// Directory searched for the standard library when none is configured.
pub const STD_DIR: &str = "std";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bare patterns, one per line.
    #[default]
    Rawhex,
    /// Every pattern as a `!` literal line.
    Macrohex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub include_std: bool,
    /// Overrides the `std` directory next to the executable.
    pub std_path: Option<PathBuf>,
    pub verbose: bool,
    pub output_format: OutputFormat,
    /// Bound on call/generator rounds per file.
    pub max_iterations: usize,
    pub solver: SolverConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            include_std: true,
            std_path: None,
            verbose: false,
            output_format: OutputFormat::Rawhex,
            max_iterations: 100,
            solver: SolverConfig::default(),
        }
    }
}

impl CompilerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means all defaults.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, MacroHexError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| MacroHexError::io("read config", path.display(), &err))?;
        Self::from_yaml_str(&text).map_err(|err| {
            MacroHexError::new(ErrorKind::InvalidConfig {
                path: path.display().to_string(),
                reason: err.to_string(),
            })
        })
    }

    pub fn resolved_std_path(&self) -> PathBuf {
        if let Some(path) = &self.std_path {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(STD_DIR)))
            .unwrap_or_else(|| PathBuf::from(STD_DIR))
    }
}
