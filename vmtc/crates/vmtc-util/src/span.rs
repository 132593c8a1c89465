//! Source locations.
//!
//! VM programs are line oriented, so a location is simply the source unit
//! name (the file stem, e.g. `Main` for `Main.vm`) and a 1-based line number.

use std::fmt;

/// A position inside one source unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    /// Source unit name (file stem).
    pub unit: String,
    /// 1-based line number.
    pub line: usize,
}

impl SourceLocation {
    /// Create a location in `unit` at `line`.
    pub fn new(unit: impl Into<String>, line: usize) -> Self {
        Self {
            unit: unit.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.vm:{}", self.unit, self.line)
    }
}
