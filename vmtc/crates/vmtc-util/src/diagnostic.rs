//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Whole-program checks (duplicate functions, calls to functions nobody
//! defines) do not abort on the first finding. They report into a
//! [`Handler`], and the driver decides afterwards whether the run may
//! continue.
//!
//! # Examples
//!
//! ```
//! use vmtc_util::{Handler, SourceLocation};
//!
//! let handler = Handler::new();
//! handler.warning("call to undefined function `Math.sqrt`", Some(SourceLocation::new("Main", 7)));
//!
//! assert!(!handler.has_errors());
//! assert_eq!(handler.warning_count(), 1);
//! ```

use crate::SourceLocation;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Translation must not produce output.
    Error,
    /// Suspicious, but translation continues.
    Warning,
    /// Additional information attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with severity and optional location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Where the offending command lives, if known
    pub location: Option<SourceLocation>,
    /// Additional notes for context
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: Level, message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            level,
            message: message.into(),
            location,
            notes: Vec::new(),
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self::new(Level::Error, message, location)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self::new(Level::Warning, message, location)
    }

    /// Add a note to the diagnostic
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {}", location)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }
        Ok(())
    }
}

/// Handler for collecting diagnostics
///
/// Reporting takes `&self` so the handler can be shared by reference between
/// the pass that produces findings and the code that inspects them.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error
    pub fn error(&self, message: impl Into<String>, location: Option<SourceLocation>) {
        self.emit(Diagnostic::error(message, location));
    }

    /// Report a warning
    pub fn warning(&self, message: impl Into<String>, location: Option<SourceLocation>) {
        self.emit(Diagnostic::warning(message, location));
    }

    /// Emit a pre-built diagnostic
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.count(Level::Error)
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.count(Level::Warning)
    }

    fn count(&self, level: Level) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == level)
            .count()
    }

    /// Snapshot of everything reported so far, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain all collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("errors", &self.error_count())
            .field("warnings", &self.warning_count())
            .finish()
    }
}
