//! The macrohex command-line interface.
//!
//! Parses arguments, loads configuration, compiles, and writes the output file
//! only when compilation succeeds.

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::args::MacroHexArgs;
use crate::cli::output::StderrLog;
use crate::config::CompilerConfig;
use crate::engine::{self, CompileContext, SharedLog};
use crate::errors::{print_error, ErrorKind, MacroHexError};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = MacroHexArgs::parse();
    if let Err(error) = execute(&args) {
        print_error(error);
        process::exit(1);
    }
}

pub fn execute(args: &MacroHexArgs) -> Result<(), MacroHexError> {
    let mut config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    args.apply(&mut config);

    let source = args.source_path();
    if !source.is_file() {
        return Err(MacroHexError::new(ErrorKind::FileNotFound {
            path: source.display().to_string(),
        }));
    }
    let output = args.output_path();

    let log = SharedLog::new(StderrLog::new(config.verbose));
    let mut ctx = CompileContext::with_fs(config, log);
    let compiled = engine::compile(&mut ctx, &source)?;
    write_output(&output, &compiled)
}

fn write_output(path: &Path, text: &str) -> Result<(), MacroHexError> {
    std::fs::write(path, text).map_err(|err| MacroHexError::io("write", path.display(), &err))
}
