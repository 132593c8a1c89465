//! Error types for scanning VM source text.

use crate::command::CommandKind;
use thiserror::Error;

/// What is wrong with a single command line, independent of where it is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first word of the line is not a VM command
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// push/pop named a segment that does not exist
    #[error("unknown memory segment `{0}`")]
    UnknownSegment(String),

    /// Text that should have been an arithmetic operator
    #[error("unknown arithmetic operator `{0}`")]
    UnknownOperator(String),

    /// Wrong number of words after the command word
    #[error("`{command}` expects {expected} argument(s), found {found}")]
    Arity {
        command: CommandKind,
        expected: usize,
        found: usize,
    },

    /// Index/count argument that is not a non-negative integer
    #[error("invalid index `{0}`: expected a non-negative integer")]
    InvalidIndex(String),

    /// Label or function name that the assembler would not accept
    #[error("invalid symbol `{0}`")]
    InvalidSymbol(String),

    /// `arg1`/`arg2` requested from a command kind that has no such argument
    #[error("`{kind}` command has no {position} argument")]
    MissingArgument {
        kind: CommandKind,
        position: &'static str,
    },

    /// Accessor used before `advance()` produced a command
    #[error("no current command")]
    NoCurrentCommand,
}

/// A [`CommandError`] pinned to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct LexError {
    /// 1-based line number of the offending command
    pub line: usize,
    /// What went wrong
    pub kind: CommandError,
}

impl LexError {
    pub fn new(line: usize, kind: CommandError) -> Self {
        Self { line, kind }
    }
}

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, LexError>;
