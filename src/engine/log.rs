//! Sink for the compiler's non-fatal output: verbose diagnostics and warnings.
//!
//! The engine never prints directly. Console and buffered implementations live
//! in [`crate::cli::output`].

use std::cell::RefCell;
use std::rc::Rc;

pub trait CompileLog {
    fn verbose(&mut self, message: &str);
    fn warn(&mut self, message: &str);

    /// Lets callers skip building verbose messages nobody will see.
    fn is_verbose(&self) -> bool {
        true
    }
}

/// Discards everything.
pub struct NullLog;

impl CompileLog for NullLog {
    fn verbose(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}

    fn is_verbose(&self) -> bool {
        false
    }
}

/// Shared handle to a log, cloned into every part of a compilation.
#[derive(Clone)]
pub struct SharedLog(pub Rc<RefCell<dyn CompileLog>>);

impl SharedLog {
    pub fn new<T: CompileLog + 'static>(log: T) -> Self {
        SharedLog(Rc::new(RefCell::new(log)))
    }

    pub fn null() -> Self {
        Self::new(NullLog)
    }

    pub fn verbose(&self, message: impl AsRef<str>) {
        self.0.borrow_mut().verbose(message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.0.borrow_mut().warn(message.as_ref());
    }

    pub fn is_verbose(&self) -> bool {
        self.0.borrow().is_verbose()
    }
}

impl std::fmt::Debug for SharedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedLog")
    }
}
