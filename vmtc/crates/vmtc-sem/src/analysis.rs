//! First pass: collect function definitions across all units.
//!
//! The collector walks every unit before any code is emitted and fills a
//! [`FunctionTable`]. Along the way it notes call sites, so once all units
//! have been seen it can report calls that no unit satisfies.

use crate::function_table::FunctionTable;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vmtc_lex::{Command, Lexer};
use vmtc_util::{Diagnostic, FxHashMap, Handler, Level, SourceLocation};

/// How seriously a whole-program check is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    /// Report as an error; the driver refuses to emit code.
    Error,
    /// Report as a warning.
    Warn,
    /// Do not report.
    Allow,
}

impl CheckLevel {
    fn level(self) -> Option<Level> {
        match self {
            CheckLevel::Error => Some(Level::Error),
            CheckLevel::Warn => Some(Level::Warning),
            CheckLevel::Allow => None,
        }
    }
}

/// Which checks run at which level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPolicy {
    /// Same function name defined twice (in one unit or across units).
    #[serde(default = "default_duplicate_functions")]
    pub duplicate_functions: CheckLevel,

    /// `call f n` where no unit defines `f`.
    #[serde(default = "default_undefined_calls")]
    pub undefined_calls: CheckLevel,
}

fn default_duplicate_functions() -> CheckLevel {
    CheckLevel::Error
}

fn default_undefined_calls() -> CheckLevel {
    CheckLevel::Warn
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            duplicate_functions: default_duplicate_functions(),
            undefined_calls: default_undefined_calls(),
        }
    }
}

/// Builds the [`FunctionTable`] and reports cross-unit problems.
pub struct FunctionCollector<'h> {
    handler: &'h Handler,
    policy: CheckPolicy,
    table: FunctionTable,
    first_definition: FxHashMap<String, SourceLocation>,
    /// Call targets in encounter order; `None` location means "required by the driver".
    calls: Vec<(String, Option<SourceLocation>)>,
}

impl<'h> FunctionCollector<'h> {
    pub fn new(handler: &'h Handler, policy: CheckPolicy) -> Self {
        Self {
            handler,
            policy,
            table: FunctionTable::new(),
            first_definition: FxHashMap::default(),
            calls: Vec::new(),
        }
    }

    /// Scan a whole unit, recording every command.
    pub fn scan_unit(&mut self, unit: &str, source: &str) -> vmtc_lex::Result<()> {
        for item in Lexer::new(source) {
            let (line, command) = item?;
            self.record(unit, line, &command);
        }
        Ok(())
    }

    /// Record one command seen at `unit:line`. Only `function` and `call` matter.
    pub fn record(&mut self, unit: &str, line: usize, command: &Command) {
        match command {
            Command::Function { name, .. } => {
                let here = SourceLocation::new(unit, line);
                if let Some(first) = self.first_definition.get(name) {
                    let diag = Diagnostic::error(
                        format!("function `{}` is defined more than once", name),
                        Some(here),
                    )
                    .with_note(format!("first defined at {}", first));
                    self.report(self.policy.duplicate_functions, diag);
                } else {
                    self.first_definition.insert(name.clone(), here);
                }
                debug!(function = %name, unit, "recorded function");
                self.table.add(name.as_str(), unit);
            }
            Command::Call { name, .. } => {
                self.calls
                    .push((name.clone(), Some(SourceLocation::new(unit, line))));
            }
            _ => {}
        }
    }

    /// Demand that `name` be defined somewhere, e.g. the bootstrap entry point.
    pub fn require(&mut self, name: &str) {
        self.calls.push((name.to_string(), None));
    }

    /// Run the deferred checks and hand back the finished table.
    pub fn finish(self) -> FunctionTable {
        for (name, location) in &self.calls {
            if self.table.contains(name) {
                continue;
            }
            let message = match location {
                Some(_) => format!("call to undefined function `{}`", name),
                None => format!("entry point `{}` is not defined by any unit", name),
            };
            self.report(
                self.policy.undefined_calls,
                Diagnostic::error(message, location.clone()),
            );
        }
        self.table
    }

    /// Re-level `diag` per `check` and hand it to the handler.
    fn report(&self, check: CheckLevel, mut diag: Diagnostic) {
        if let Some(level) = check.level() {
            diag.level = level;
            self.handler.emit(diag);
        }
    }
}
