//! The code generation engine.
//!
//! [`CodeWriter`] turns VM commands into Hack assembly text and writes it to
//! any [`std::io::Write`]. It owns two pieces of state:
//!
//! - the current unit name, used to namespace `static` variables
//!   (`push static 3` in `Foo.vm` touches the assembler symbol `Foo.3`);
//! - the label counter, which keeps the labels manufactured for comparisons
//!   and call sites unique across the whole output.
//!
//! Neither is ever reset while a writer lives, so one writer must be used for
//! one output file.

use std::io::Write;

use tracing::debug;
use vmtc_lex::{ArithmeticOp, Command, Segment};

use crate::asm::{
    AsmBuffer, Register, FRAME_SIZE, MAX_ADDRESS_CONSTANT, TEMP_BASE, TEMP_SIZE,
};
use crate::error::{CodeGenError, Result};

/// Output knobs that do not change program behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Precede each command's block with `// <vm command>`.
    pub emit_comments: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
        }
    }
}

/// Hack assembly writer for VM commands.
///
/// ```
/// use vmtc_gen::CodeWriter;
/// use vmtc_lex::{ArithmeticOp, Segment};
///
/// let mut writer = CodeWriter::new(Vec::new());
/// writer.write_push(Segment::Constant, 7).unwrap();
/// writer.write_push(Segment::Constant, 8).unwrap();
/// writer.write_arithmetic(ArithmeticOp::Add).unwrap();
///
/// let asm = String::from_utf8(writer.finish().unwrap()).unwrap();
/// assert!(asm.contains("@7\nD=A\n"));
/// assert!(asm.ends_with("M=D+M\n"));
/// ```
pub struct CodeWriter<W: Write> {
    out: W,
    options: WriterOptions,
    unit: Option<String>,
    label_counter: u32,
    bootstrapped: bool,
    lines_written: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    pub fn with_options(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            unit: None,
            label_counter: 1,
            bootstrapped: false,
            lines_written: 0,
        }
    }

    /// Name the unit whose commands follow. Only `static` addressing uses it.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        let unit = unit.into();
        debug!(unit = %unit, "emitting unit");
        self.unit = Some(unit);
    }

    /// The number the next comparison or call site will use.
    pub fn label_counter(&self) -> u32 {
        self.label_counter
    }

    /// Assembly lines written so far, comments and labels included.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn has_bootstrap(&self) -> bool {
        self.bootstrapped
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    /// Translate one command of any kind.
    pub fn write_command(&mut self, command: &Command) -> Result<()> {
        debug!(%command, "translating");
        match command {
            Command::Arithmetic(op) => self.write_arithmetic(*op),
            Command::Push { segment, index } => self.write_push(*segment, *index),
            Command::Pop { segment, index } => self.write_pop(*segment, *index),
            Command::Label(label) => self.write_label(label),
            Command::Goto(label) => self.write_goto(label),
            Command::IfGoto(label) => self.write_if(label),
            Command::Function { name, locals } => self.write_function(name, *locals),
            Command::Call { name, args } => self.write_call(name, *args),
            Command::Return => self.write_return(),
        }
    }

    /// Set SP to `stack_base` and call `entry` with no arguments.
    pub fn write_init(&mut self, entry: &str, stack_base: u16) -> Result<()> {
        if self.bootstrapped {
            return Err(CodeGenError::BootstrapAlreadyWritten);
        }
        check_constant("stack base", u32::from(stack_base))?;

        let mut asm = self.buffer();
        asm.comment("bootstrap");
        asm.at(stack_base);
        asm.emit_line("D=A");
        asm.store(Register::Sp);
        self.call_sequence(&mut asm, entry, 0)?;
        self.flush(asm)?;
        self.bootstrapped = true;
        debug!(entry, stack_base, "wrote bootstrap");
        Ok(())
    }

    pub fn write_arithmetic(&mut self, op: ArithmeticOp) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(op);

        if op.is_unary() {
            asm.at(Register::Sp);
            asm.emit_line("A=M-1");
            asm.emit_line(if op == ArithmeticOp::Neg { "M=-M" } else { "M=!M" });
        } else if op.is_comparison() {
            self.comparison(&mut asm, op);
        } else {
            // D = y; A -> x; x = x op y
            asm.pop_d();
            asm.emit_line("A=A-1");
            asm.emit_line(match op {
                ArithmeticOp::Add => "M=D+M",
                ArithmeticOp::Sub => "M=M-D",
                ArithmeticOp::And => "M=D&M",
                _ => "M=D|M",
            });
        }

        self.flush(asm)
    }

    pub fn write_push(&mut self, segment: Segment, index: u32) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("push {} {}", segment, index));

        match self.resolve(segment, index)? {
            Addressing::Constant => {
                asm.at(index);
                asm.emit_line("D=A");
            }
            Addressing::Based(base) => {
                asm.at(index);
                asm.emit_line("D=A");
                asm.at(base);
                asm.emit_line("A=D+M");
                asm.emit_line("D=M");
            }
            Addressing::Direct(target) => {
                asm.at(target);
                asm.emit_line("D=M");
            }
        }
        asm.push_d();

        self.flush(asm)
    }

    pub fn write_pop(&mut self, segment: Segment, index: u32) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("pop {} {}", segment, index));

        match self.resolve(segment, index)? {
            Addressing::Constant => return Err(CodeGenError::PopConstant(index)),
            Addressing::Based(base) => {
                // R13 = base + i, then *R13 = pop()
                asm.at(index);
                asm.emit_line("D=A");
                asm.at(base);
                asm.emit_line("D=D+M");
                asm.store(Register::R13);
                asm.pop_d();
                asm.at(Register::R13);
                asm.emit_line("A=M");
                asm.emit_line("M=D");
            }
            Addressing::Direct(target) => {
                asm.pop_d();
                asm.at(target);
                asm.emit_line("M=D");
            }
        }

        self.flush(asm)
    }

    pub fn write_label(&mut self, label: &str) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("label {}", label));
        asm.emit_label(label);
        self.flush(asm)
    }

    pub fn write_goto(&mut self, label: &str) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("goto {}", label));
        asm.at(label);
        asm.emit_line("0;JMP");
        self.flush(asm)
    }

    /// Pop the top of the stack; jump if it is non-zero.
    pub fn write_if(&mut self, label: &str) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("if-goto {}", label));
        asm.pop_d();
        asm.at(label);
        asm.emit_line("D;JNE");
        self.flush(asm)
    }

    /// Entry label followed by `locals` pushes of zero.
    pub fn write_function(&mut self, name: &str, locals: u32) -> Result<()> {
        check_constant("local count", locals)?;

        let mut asm = self.buffer();
        asm.comment(format_args!("function {} {}", name, locals));
        asm.emit_label(name);
        for _ in 0..locals {
            asm.emit_line("D=0");
            asm.push_d();
        }
        self.flush(asm)
    }

    pub fn write_call(&mut self, name: &str, args: u32) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment(format_args!("call {} {}", name, args));
        self.call_sequence(&mut asm, name, args)?;
        self.flush(asm)
    }

    pub fn write_return(&mut self) -> Result<()> {
        let mut asm = self.buffer();
        asm.comment("return");

        // R13 = frame = LCL
        asm.load(Register::Lcl);
        asm.store(Register::R13);
        // R14 = *(frame - 5)
        asm.at(FRAME_SIZE);
        asm.emit_line("A=D-A");
        asm.emit_line("D=M");
        asm.store(Register::R14);
        // *ARG = pop()
        asm.pop_d();
        asm.at(Register::Arg);
        asm.emit_line("A=M");
        asm.emit_line("M=D");
        // SP = ARG + 1
        asm.at(Register::Arg);
        asm.emit_line("D=M+1");
        asm.store(Register::Sp);
        // walk the saved frame downwards: THAT, THIS, ARG, LCL
        for register in [Register::That, Register::This, Register::Arg, Register::Lcl] {
            asm.at(Register::R13);
            asm.emit_line("AM=M-1");
            asm.emit_line("D=M");
            asm.store(register);
        }
        asm.at(Register::R14);
        asm.emit_line("A=M");
        asm.emit_line("0;JMP");

        self.flush(asm)
    }

    fn call_sequence(&mut self, asm: &mut AsmBuffer, name: &str, args: u32) -> Result<()> {
        let frame_offset = args
            .checked_add(FRAME_SIZE)
            .filter(|offset| *offset <= MAX_ADDRESS_CONSTANT)
            .ok_or(CodeGenError::ConstantTooLarge {
                what: "argument count",
                value: args,
            })?;

        let return_label = format!("RETURN_ADDRESS_{}", self.next_label());

        asm.at(&return_label);
        asm.emit_line("D=A");
        asm.push_d();
        for register in [Register::Lcl, Register::Arg, Register::This, Register::That] {
            asm.load(register);
            asm.push_d();
        }
        // ARG = SP - n - 5
        asm.load(Register::Sp);
        asm.at(frame_offset);
        asm.emit_line("D=D-A");
        asm.store(Register::Arg);
        // LCL = SP
        asm.load(Register::Sp);
        asm.store(Register::Lcl);
        asm.at(name);
        asm.emit_line("0;JMP");
        asm.emit_label(&return_label);
        Ok(())
    }

    /// Validate `segment i` and work out how to reach it.
    fn resolve(&self, segment: Segment, index: u32) -> Result<Addressing> {
        let out_of_range = |valid| CodeGenError::IndexOutOfRange {
            segment,
            index,
            valid,
        };

        match segment {
            Segment::Constant if index <= MAX_ADDRESS_CONSTANT => Ok(Addressing::Constant),
            Segment::Constant => Err(out_of_range("0..=32767")),
            // based offsets are otherwise unbounded, but `@i` caps them
            Segment::Local | Segment::Argument | Segment::This | Segment::That
                if index > MAX_ADDRESS_CONSTANT =>
            {
                Err(out_of_range("0..=32767"))
            }
            Segment::Local => Ok(Addressing::Based(Register::Lcl)),
            Segment::Argument => Ok(Addressing::Based(Register::Arg)),
            Segment::This => Ok(Addressing::Based(Register::This)),
            Segment::That => Ok(Addressing::Based(Register::That)),
            Segment::Static => {
                let unit = self.unit.as_deref().ok_or(CodeGenError::NoSourceUnit)?;
                Ok(Addressing::Direct(format!("{}.{}", unit, index)))
            }
            Segment::Temp if index < TEMP_SIZE => {
                Ok(Addressing::Direct((TEMP_BASE + index).to_string()))
            }
            Segment::Temp => Err(out_of_range("0..=7")),
            Segment::Pointer => match index {
                0 => Ok(Addressing::Direct(Register::This.to_string())),
                1 => Ok(Addressing::Direct(Register::That.to_string())),
                _ => Err(out_of_range("0..=1")),
            },
        }
    }

    /// Replace x, y with the truth of `x op y`.
    ///
    /// `eq` tests `x - y` directly. `gt` and `lt` subtract only when x and y
    /// share a sign; otherwise D is set to 1 or -1 from the sign of x, since
    /// `x - y` can overflow 16 bits.
    fn comparison(&mut self, asm: &mut AsmBuffer, op: ArithmeticOp) {
        let (prefix, jump) = match op {
            ArithmeticOp::Eq => ("EQ", "JEQ"),
            ArithmeticOp::Gt => ("GT", "JGT"),
            _ => ("LT", "JLT"),
        };
        let n = self.next_label();
        let on_true = format!("{}_TRUE_{}", prefix, n);
        let end = format!("{}_END_{}", prefix, n);

        if op == ArithmeticOp::Eq {
            asm.pop_d();
            asm.emit_line("A=A-1");
            asm.emit_line("D=M-D");
        } else {
            let x_negative = format!("{}_XNEG_{}", prefix, n);
            let same_sign = format!("{}_SAME_{}", prefix, n);
            let test = format!("{}_TEST_{}", prefix, n);

            asm.pop_d();
            asm.store(Register::R13);
            asm.at(Register::Sp);
            asm.emit_line("A=M-1");
            asm.emit_line("D=M");
            asm.at(&x_negative);
            asm.emit_line("D;JLT");
            // x >= 0
            asm.load(Register::R13);
            asm.at(&same_sign);
            asm.emit_line("D;JGE");
            asm.emit_line("D=1");
            asm.at(&test);
            asm.emit_line("0;JMP");
            asm.emit_label(&x_negative);
            asm.load(Register::R13);
            asm.at(&same_sign);
            asm.emit_line("D;JLT");
            asm.emit_line("D=-1");
            asm.at(&test);
            asm.emit_line("0;JMP");
            // D = y on both paths in
            asm.emit_label(&same_sign);
            asm.at(Register::Sp);
            asm.emit_line("A=M-1");
            asm.emit_line("D=M-D");
            asm.emit_label(&test);
        }

        asm.at(&on_true);
        asm.emit_line(format_args!("D;{}", jump));
        asm.at(Register::Sp);
        asm.emit_line("A=M-1");
        asm.emit_line("M=0");
        asm.at(&end);
        asm.emit_line("0;JMP");
        asm.emit_label(&on_true);
        asm.at(Register::Sp);
        asm.emit_line("A=M-1");
        asm.emit_line("M=-1");
        asm.emit_label(&end);
    }

    fn next_label(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn buffer(&self) -> AsmBuffer {
        AsmBuffer::new(self.options.emit_comments)
    }

    fn flush(&mut self, asm: AsmBuffer) -> Result<()> {
        self.out.write_all(asm.as_str().as_bytes())?;
        self.lines_written += asm.lines();
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for CodeWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeWriter")
            .field("options", &self.options)
            .field("unit", &self.unit)
            .field("label_counter", &self.label_counter)
            .field("bootstrapped", &self.bootstrapped)
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}

/// How a `segment i` operand is reached.
enum Addressing {
    /// The index itself is the value.
    Constant,
    /// `*(base + i)`
    Based(Register),
    /// A fixed assembler symbol or RAM word.
    Direct(String),
}

fn check_constant(what: &'static str, value: u32) -> Result<()> {
    if value > MAX_ADDRESS_CONSTANT {
        return Err(CodeGenError::ConstantTooLarge { what, value });
    }
    Ok(())
}
