//! vmtc-lex - Command model and scanner for the stack VM language
//!
//! This crate turns `.vm` source text into typed [`Command`] values.
//!
//! # Overview
//!
//! The VM language is line oriented: one command per line, words separated
//! by whitespace, `//` starting a comment that runs to end of line. There are
//! nine command kinds:
//!
//! | kind | form |
//! |---|---|
//! | arithmetic | `add` `sub` `neg` `eq` `gt` `lt` `and` `or` `not` |
//! | push / pop | `push <segment> <index>` |
//! | label / goto / if-goto | `label <symbol>` |
//! | function | `function <name> <locals>` |
//! | call | `call <name> <args>` |
//! | return | `return` |
//!
//! # Module Structure
//!
//! - [`command`] - Command, Segment and ArithmeticOp types
//! - [`lexer`] - line scanner producing commands
//! - [`error`] - scan errors

pub mod command;
pub mod error;
pub mod lexer;

#[cfg(test)]
mod edge_cases;

pub use command::{ArithmeticOp, Command, CommandKind, Segment};
pub use error::{CommandError, LexError, Result};
pub use lexer::{strip_comment, Lexer};
