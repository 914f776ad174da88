//! Command-line arguments for the macrohex compiler.
//!
//! This module uses the `clap` crate with its "derive" feature.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CompilerConfig, OutputFormat};

pub const SOURCE_EXTENSION: &str = "macrohex";
pub const OUTPUT_EXTENSION: &str = "rawhex";

#[derive(Debug, Parser)]
#[command(
    name = "macrohex",
    version,
    about = "Compiles macrohex sources into rawhex pattern lists."
)]
pub struct MacroHexArgs {
    /// Source file; `.macrohex` is appended when it has no extension.
    #[arg(required = true)]
    pub source: PathBuf,

    /// Output file; defaults to the source with a `.rawhex` extension.
    pub output: Option<PathBuf>,

    /// Don't inject the standard library.
    #[arg(long = "nostd")]
    pub no_std: bool,

    /// Print step timings, token statistics and search statistics.
    #[arg(long)]
    pub verbose: bool,

    /// Write a macrohex file of `!` literals instead of rawhex.
    #[arg(long = "outputmacrohex")]
    pub output_macrohex: bool,

    /// YAML configuration file; flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl MacroHexArgs {
    pub fn source_path(&self) -> PathBuf {
        if self.source.extension().is_some() {
            self.source.clone()
        } else {
            self.source.with_extension(SOURCE_EXTENSION)
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => self.source_path().with_extension(OUTPUT_EXTENSION),
        }
    }

    /// Applies flags on top of a loaded configuration.
    pub fn apply(&self, config: &mut CompilerConfig) {
        if self.no_std {
            config.include_std = false;
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.output_macrohex {
            config.output_format = OutputFormat::Macrohex;
        }
    }
}
