//! macrohex: compiles macro-based `.macrohex` sources into flat `.rawhex`
//! pattern lists.
//!
//! The pipeline is [`syntax`] (lexing) → [`engine`] (includes, definitions and
//! the fixed-point expansion loop) → output. `#g` directives call into
//! [`generators`], which use the [`lattice`] number synthesizer.

pub use crate::errors::{ErrorKind, ErrorReporting, MacroHexError};

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod lattice;
pub mod macros;
pub mod syntax;
