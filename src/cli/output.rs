//! Console and buffered sinks for compiler messages.

// ============================================================================
// LOG SINKS: StderrLog and BufferedLog implementations
// ============================================================================

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::engine::CompileLog;

/// Writes warnings in yellow and, when enabled, verbose lines in cyan.
pub struct StderrLog {
    verbose: bool,
    stream: StandardStream,
}

impl StderrLog {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            stream: StandardStream::stderr(ColorChoice::Auto),
        }
    }

    fn write_colored(&mut self, color: Color, bold: bool, text: &str) {
        let _ = self
            .stream
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = writeln!(self.stream, "{}", text);
        let _ = self.stream.reset();
    }
}

impl CompileLog for StderrLog {
    fn verbose(&mut self, message: &str) {
        if self.verbose {
            self.write_colored(Color::Cyan, false, message);
        }
    }

    fn warn(&mut self, message: &str) {
        self.write_colored(Color::Yellow, true, &format!("warning: {}", message));
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Verbose(String),
    Warning(String),
}

/// Collects messages in order for tests or programmatic capture.
#[derive(Debug, Default)]
pub struct BufferedLog {
    pub entries: Vec<LogEntry>,
    verbose: bool,
}

impl BufferedLog {
    pub fn new(verbose: bool) -> Self {
        Self {
            entries: Vec::new(),
            verbose,
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Warning(text) => Some(text.clone()),
                LogEntry::Verbose(_) => None,
            })
            .collect()
    }

    pub fn verbose_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Verbose(text) => Some(text.clone()),
                LogEntry::Warning(_) => None,
            })
            .collect()
    }
}

impl CompileLog for BufferedLog {
    fn verbose(&mut self, message: &str) {
        if self.verbose {
            self.entries.push(LogEntry::Verbose(message.to_string()));
        }
    }

    fn warn(&mut self, message: &str) {
        self.entries.push(LogEntry::Warning(message.to_string()));
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}
