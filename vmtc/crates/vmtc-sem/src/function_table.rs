//! Function name -> defining unit.

use std::fmt::Write as _;
use vmtc_util::FxIndexMap;

/// Maps every function name to the source unit that defines it.
///
/// The table records, it does not judge: adding a name twice silently
/// replaces the owner (the previous one is returned so callers can notice).
/// Duplicate policing lives in [`crate::analysis`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionTable {
    entries: FxIndexMap<String, String>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `unit` defines `name`. Returns the previous owner, if any.
    pub fn add(&mut self, name: impl Into<String>, unit: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), unit.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The unit defining `name`.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(function, unit)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, u)| (f.as_str(), u.as_str()))
    }

    /// Human-readable listing, sorted by unit and then by function name.
    pub fn dump(&self) -> String {
        let mut rows: Vec<(&str, &str)> = self.iter().collect();
        rows.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));

        let mut out = String::new();
        for (function, unit) in rows {
            let _ = writeln!(out, "{}={}", function, unit);
        }
        out
    }
}
