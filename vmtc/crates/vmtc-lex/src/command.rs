//! The VM command model.
//!
//! Every line of a `.vm` file is exactly one [`Command`]. Segments, operators
//! and command kinds are closed enums, so once a line has been parsed the code
//! generator never has to deal with unknown names again.

use crate::error::CommandError;
use std::fmt;
use std::str::FromStr;

/// One of the eight memory segments addressable by push/pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
    Constant,
}

impl Segment {
    /// All segments, in the order the VM language documents them.
    pub const ALL: [Segment; 8] = [
        Segment::Argument,
        Segment::Local,
        Segment::Static,
        Segment::This,
        Segment::That,
        Segment::Pointer,
        Segment::Temp,
        Segment::Constant,
    ];

    /// The keyword used in VM source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Constant => "constant",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|seg| seg.as_str() == s)
            .ok_or_else(|| CommandError::UnknownSegment(s.to_string()))
    }
}

/// The nine arithmetic/logical stack operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 9] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Neg,
        ArithmeticOp::Eq,
        ArithmeticOp::Gt,
        ArithmeticOp::Lt,
        ArithmeticOp::And,
        ArithmeticOp::Or,
        ArithmeticOp::Not,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }

    /// `neg` and `not` rewrite the top slot in place; everything else pops two.
    pub fn is_unary(&self) -> bool {
        matches!(self, ArithmeticOp::Neg | ArithmeticOp::Not)
    }

    /// `eq`, `gt` and `lt` need a branch and therefore manufactured labels.
    pub fn is_comparison(&self) -> bool {
        matches!(self, ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt)
    }

    /// Net change in stack depth when this operator executes.
    pub fn stack_effect(&self) -> i32 {
        if self.is_unary() {
            0
        } else {
            -1
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArithmeticOp {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArithmeticOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CommandError::UnknownOperator(s.to_string()))
    }
}

/// Discriminant of a [`Command`], without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

impl CommandKind {
    /// How many words follow the command word in source text.
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::Arithmetic | CommandKind::Return => 0,
            CommandKind::Label | CommandKind::Goto | CommandKind::If => 1,
            CommandKind::Push | CommandKind::Pop | CommandKind::Function | CommandKind::Call => 2,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "push" => CommandKind::Push,
            "pop" => CommandKind::Pop,
            "label" => CommandKind::Label,
            "goto" => CommandKind::Goto,
            "if-goto" => CommandKind::If,
            "function" => CommandKind::Function,
            "call" => CommandKind::Call,
            "return" => CommandKind::Return,
            _ if word.parse::<ArithmeticOp>().is_ok() => CommandKind::Arithmetic,
            _ => return None,
        })
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Arithmetic => "arithmetic",
            CommandKind::Push => "push",
            CommandKind::Pop => "pop",
            CommandKind::Label => "label",
            CommandKind::Goto => "goto",
            CommandKind::If => "if-goto",
            CommandKind::Function => "function",
            CommandKind::Return => "return",
            CommandKind::Call => "call",
        };
        f.write_str(name)
    }
}

/// A single parsed VM command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u32 },
    Pop { segment: Segment, index: u32 },
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, locals: u32 },
    Call { name: String, args: u32 },
    Return,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Arithmetic(_) => CommandKind::Arithmetic,
            Command::Push { .. } => CommandKind::Push,
            Command::Pop { .. } => CommandKind::Pop,
            Command::Label(_) => CommandKind::Label,
            Command::Goto(_) => CommandKind::Goto,
            Command::IfGoto(_) => CommandKind::If,
            Command::Function { .. } => CommandKind::Function,
            Command::Call { .. } => CommandKind::Call,
            Command::Return => CommandKind::Return,
        }
    }

    /// First argument as text: the operator name for arithmetic, the segment
    /// keyword for push/pop, the symbol otherwise. `return` has none.
    pub fn arg1(&self) -> Result<&str, CommandError> {
        match self {
            Command::Arithmetic(op) => Ok(op.as_str()),
            Command::Push { segment, .. } | Command::Pop { segment, .. } => Ok(segment.as_str()),
            Command::Label(name)
            | Command::Goto(name)
            | Command::IfGoto(name)
            | Command::Function { name, .. }
            | Command::Call { name, .. } => Ok(name),
            Command::Return => Err(CommandError::MissingArgument {
                kind: CommandKind::Return,
                position: "first",
            }),
        }
    }

    /// Second argument; only push, pop, function and call carry one.
    pub fn arg2(&self) -> Result<u32, CommandError> {
        match self {
            Command::Push { index, .. } | Command::Pop { index, .. } => Ok(*index),
            Command::Function { locals, .. } => Ok(*locals),
            Command::Call { args, .. } => Ok(*args),
            other => Err(CommandError::MissingArgument {
                kind: other.kind(),
                position: "second",
            }),
        }
    }

    /// Parse one comment-free, non-blank line.
    ///
    /// Words may be separated by any run of whitespace.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::UnknownCommand(String::new()));
        };
        let kind = CommandKind::from_word(head)
            .ok_or_else(|| CommandError::UnknownCommand(head.to_string()))?;
        let args: Vec<&str> = words.collect();
        if args.len() != kind.arity() {
            return Err(CommandError::Arity {
                command: kind,
                expected: kind.arity(),
                found: args.len(),
            });
        }

        let command = match kind {
            CommandKind::Arithmetic => Command::Arithmetic(head.parse()?),
            CommandKind::Return => Command::Return,
            CommandKind::Push => Command::Push {
                segment: args[0].parse()?,
                index: parse_index(args[1])?,
            },
            CommandKind::Pop => Command::Pop {
                segment: args[0].parse()?,
                index: parse_index(args[1])?,
            },
            CommandKind::Label => Command::Label(parse_symbol(args[0])?),
            CommandKind::Goto => Command::Goto(parse_symbol(args[0])?),
            CommandKind::If => Command::IfGoto(parse_symbol(args[0])?),
            CommandKind::Function => Command::Function {
                name: parse_symbol(args[0])?,
                locals: parse_index(args[1])?,
            },
            CommandKind::Call => Command::Call {
                name: parse_symbol(args[0])?,
                args: parse_index(args[1])?,
            },
        };
        Ok(command)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op),
            Command::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Command::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Command::Label(name) => write!(f, "label {}", name),
            Command::Goto(name) => write!(f, "goto {}", name),
            Command::IfGoto(name) => write!(f, "if-goto {}", name),
            Command::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Command::Call { name, args } => write!(f, "call {} {}", name, args),
            Command::Return => write!(f, "return"),
        }
    }
}

fn parse_index(word: &str) -> Result<u32, CommandError> {
    if !word.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommandError::InvalidIndex(word.to_string()));
    }
    word.parse()
        .map_err(|_| CommandError::InvalidIndex(word.to_string()))
}

/// Hack assembler symbols: letters, digits, `_`, `.`, `$`, `:`; no leading digit.
fn parse_symbol(word: &str) -> Result<String, CommandError> {
    let valid = word
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'));
    if valid {
        Ok(word.to_string())
    } else {
        Err(CommandError::InvalidSymbol(word.to_string()))
    }
}
