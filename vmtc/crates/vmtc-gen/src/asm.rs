//! Hack assembly building blocks.
//!
//! RAM layout assumed by the generated code:
//!
//! ```text
//! RAM[0]        SP    stack pointer (next free slot)
//! RAM[1]        LCL   base of the current function's local segment
//! RAM[2]        ARG   base of the current function's argument segment
//! RAM[3]        THIS  base of the this segment (pointer 0)
//! RAM[4]        THAT  base of the that segment (pointer 1)
//! RAM[5..=12]         temp segment
//! RAM[13..=15]        scratch registers for generated code
//! RAM[16..=255]       static variables (assigned by the assembler)
//! RAM[256..]          stack
//! ```

use std::fmt::{self, Display, Write as _};

/// First RAM word of the temp segment.
pub const TEMP_BASE: u32 = 5;

/// Number of temp words.
pub const TEMP_SIZE: u32 = 8;

/// Largest value an A-instruction can load.
pub const MAX_ADDRESS_CONSTANT: u32 = 32767;

/// Where the bootstrap places the stack.
pub const DEFAULT_STACK_BASE: u16 = 256;

/// Entry function called by the bootstrap.
pub const DEFAULT_ENTRY_POINT: &str = "Sys.init";

/// Words pushed by a call site besides the arguments: return address,
/// LCL, ARG, THIS, THAT.
pub const FRAME_SIZE: u32 = 5;

/// Named RAM words the generated code touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Sp,
    Lcl,
    Arg,
    This,
    That,
    /// Scratch: destination address of a pop, frame pointer of a return.
    R13,
    /// Scratch: return address of a return.
    R14,
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Sp => "SP",
            Register::Lcl => "LCL",
            Register::Arg => "ARG",
            Register::This => "THIS",
            Register::That => "THAT",
            Register::R13 => "R13",
            Register::R14 => "R14",
        };
        f.write_str(name)
    }
}

/// Accumulates the text of one translated command.
///
/// Each command is rendered completely before anything reaches the output
/// stream, so a command that fails validation writes nothing.
pub(crate) struct AsmBuffer {
    output: String,
    comments: bool,
    lines: usize,
}

impl AsmBuffer {
    pub(crate) fn new(comments: bool) -> Self {
        Self {
            output: String::new(),
            comments,
            lines: 0,
        }
    }

    /// `// text`, dropped when comments are disabled.
    pub(crate) fn comment(&mut self, text: impl Display) {
        if self.comments {
            self.emit_line(format_args!("// {}", text));
        }
    }

    pub(crate) fn emit_line(&mut self, content: impl Display) {
        let _ = writeln!(self.output, "{}", content);
        self.lines += 1;
    }

    /// `(name)`
    pub(crate) fn emit_label(&mut self, name: impl Display) {
        self.emit_line(format_args!("({})", name));
    }

    /// `@symbol`
    pub(crate) fn at(&mut self, symbol: impl Display) {
        self.emit_line(format_args!("@{}", symbol));
    }

    /// `*SP = D; SP++`
    pub(crate) fn push_d(&mut self) {
        self.at(Register::Sp);
        self.emit_line("A=M");
        self.emit_line("M=D");
        self.at(Register::Sp);
        self.emit_line("M=M+1");
    }

    /// `SP--; D = *SP`
    pub(crate) fn pop_d(&mut self) {
        self.at(Register::Sp);
        self.emit_line("AM=M-1");
        self.emit_line("D=M");
    }

    /// `D = *register`
    pub(crate) fn load(&mut self, register: Register) {
        self.at(register);
        self.emit_line("D=M");
    }

    /// `*register = D`
    pub(crate) fn store(&mut self, register: Register) {
        self.at(register);
        self.emit_line("M=D");
    }

    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.output
    }
}
