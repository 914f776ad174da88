//! Macro registry for storage and lookup of macro bodies.
//!
//! # Features
//! - Register a body under a name exactly once. Registering a name again is an
//!   error; the first registration wins.
//! - Lookup is case-sensitive. [`MacroRegistry::resolve`] falls back to the
//!   whitespace-trimmed name when the exact one is missing.
//! - One registry lives for a whole compilation and is shared by every included
//!   file.
//!
//! # Thread Safety
//! This type is **not** thread-safe. To share between threads, wrap in a
//! `std::sync::Mutex` or `RwLock`.
//!
//! # Summary Table
//! | Method     | Overwrites | Error on Duplicate | Notes                         |
//! |------------|------------|--------------------|-------------------------------|
//! | register   | No         | Yes                | Write-once                    |
//! | lookup     | N/A        | N/A                | Exact, case-sensitive         |
//! | resolve    | N/A        | N/A                | Exact, then trimmed           |

use std::collections::HashMap;

use crate::errors::ErrorKind;
use crate::syntax::Token;

/// Name to pre-lexed body.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Vec<Token>>,
}

impl MacroRegistry {
    /// Creates a new, empty macro registry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use macrohex::macros::MacroRegistry;
    /// let registry = MacroRegistry::new();
    /// assert!(registry.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `body` under `name`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::DuplicateMacro`] if the name is already taken; the
    /// existing body is left untouched.
    pub fn register(&mut self, name: &str, body: Vec<Token>) -> Result<(), ErrorKind> {
        if self.macros.contains_key(name) {
            return Err(ErrorKind::DuplicateMacro {
                name: name.to_string(),
            });
        }
        self.macros.insert(name.to_string(), body);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&[Token]> {
        self.macros.get(name).map(Vec::as_slice)
    }

    /// Looks up a call's content as written, then trimmed of whitespace.
    pub fn resolve(&self, call: &str) -> Option<&[Token]> {
        self.lookup(call).or_else(|| self.lookup(call.trim()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
