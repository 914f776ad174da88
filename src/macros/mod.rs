//! # macrohex Macro System
//!
//! Macros are plain token splices: a definition `<"name" body>` is lexed once
//! into a token sequence, and every later line that reads `name` is replaced by
//! that sequence. There are no parameters and no hygiene; a body may call other
//! macros, which the fixed-point loop in [`crate::engine`] resolves on later
//! iterations.

pub mod registry;

pub use registry::MacroRegistry;
