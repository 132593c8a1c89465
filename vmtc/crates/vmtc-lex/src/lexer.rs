//! Line scanner for VM source text.
//!
//! The scanner walks a source string line by line, strips `//` comments and
//! surrounding whitespace, skips blank lines and parses what remains into a
//! [`Command`].
//!
//! Two styles of use are supported. The cursor style mirrors the classic
//! `hasMoreCommands`/`advance` API:
//!
//! ```
//! use vmtc_lex::{CommandKind, Lexer};
//!
//! let mut lexer = Lexer::new("push constant 7 // seven\n\nadd\n");
//! assert!(lexer.has_next());
//! lexer.advance().unwrap();
//! assert_eq!(lexer.command_kind().unwrap(), CommandKind::Push);
//! assert_eq!(lexer.arg1().unwrap(), "constant");
//! assert_eq!(lexer.arg2().unwrap(), 7);
//! ```
//!
//! Or the lexer can be iterated, yielding `(line, command)` pairs:
//!
//! ```
//! use vmtc_lex::{Command, Lexer};
//!
//! let commands: Vec<_> = Lexer::new("push constant 7\nadd").collect::<Result<_, _>>().unwrap();
//! assert_eq!(commands.len(), 2);
//! assert_eq!(commands[1], (2, "add".parse::<Command>().unwrap()));
//! ```

use crate::command::{Command, CommandKind};
use crate::error::{CommandError, LexError, Result};
use std::iter::Enumerate;
use std::str::Lines;

/// Remove a trailing `//` comment and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.trim()
}

/// Scanner over one source unit.
pub struct Lexer<'a> {
    lines: Enumerate<Lines<'a>>,
    /// Next non-blank line found by `has_next`, not yet consumed.
    pending: Option<(usize, &'a str)>,
    /// Most recently advanced-to command and its line.
    current: Option<(usize, Command)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
            pending: None,
            current: None,
        }
    }

    /// Are there more commands in the input?
    pub fn has_next(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        for (idx, raw) in self.lines.by_ref() {
            let code = strip_comment(raw);
            if !code.is_empty() {
                self.pending = Some((idx + 1, code));
                return true;
            }
        }
        false
    }

    /// Make the next command current.
    ///
    /// Calling this when [`has_next`](Self::has_next) is false leaves the
    /// lexer without a current command.
    pub fn advance(&mut self) -> Result<()> {
        self.current = None;
        if !self.has_next() {
            return Ok(());
        }
        if let Some((line, code)) = self.pending.take() {
            let command = Command::parse(code).map_err(|kind| LexError::new(line, kind))?;
            self.current = Some((line, command));
        }
        Ok(())
    }

    /// The current command, if `advance` produced one.
    pub fn command(&self) -> Option<&Command> {
        self.current.as_ref().map(|(_, cmd)| cmd)
    }

    /// Line number of the current command (0 before the first advance).
    pub fn line(&self) -> usize {
        self.current.as_ref().map_or(0, |(line, _)| *line)
    }

    pub fn command_kind(&self) -> Result<CommandKind> {
        self.current_command().map(Command::kind)
    }

    pub fn arg1(&self) -> Result<&str> {
        let cmd = self.current_command()?;
        cmd.arg1().map_err(|kind| LexError::new(self.line(), kind))
    }

    pub fn arg2(&self) -> Result<u32> {
        let cmd = self.current_command()?;
        cmd.arg2().map_err(|kind| LexError::new(self.line(), kind))
    }

    fn current_command(&self) -> Result<&Command> {
        self.command()
            .ok_or_else(|| LexError::new(self.line(), CommandError::NoCurrentCommand))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(usize, Command)>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        match self.advance() {
            Ok(()) => self.current.clone().map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}
