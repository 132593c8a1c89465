//! vmtc-gen - Hack assembly generation
//!
//! Each VM command becomes a fixed block of Hack assembly. The blocks only
//! depend on two things the writer tracks itself: the current unit (for
//! `static`) and a label counter (for comparisons and call sites).
//!
//! | VM command            | emitted shape                                     |
//! |-----------------------|---------------------------------------------------|
//! | `push seg i`          | `D = value`, `*SP = D`, `SP++`                    |
//! | `pop seg i`           | `SP--`, store `*SP` (via R13 for based segments)  |
//! | `add` `sub` `and` `or`| pop y, combine into x in place                    |
//! | `neg` `not`           | rewrite the top slot in place                     |
//! | `eq` `gt` `lt`        | branch on `x - y` to `<OP>_TRUE_n` / `<OP>_END_n` |
//! |                       | (`gt` `lt` check signs first; `x - y` may overflow) |
//! | `label` `goto` `if-goto` | `(L)`, `@L 0;JMP`, pop and `D;JNE`             |
//! | `function f k`        | `(f)` then k zero pushes                          |
//! | `call f n`            | save frame, reposition ARG/LCL, `(RETURN_ADDRESS_n)` |
//! | `return`              | restore the caller's frame through R13/R14        |
//!
//! True is -1 (all bits set) and false is 0.

pub mod asm;
pub mod error;
pub mod writer;

#[cfg(test)]
mod edge_cases;

pub use asm::{Register, DEFAULT_ENTRY_POINT, DEFAULT_STACK_BASE};
pub use error::{CodeGenError, Result};
pub use writer::{CodeWriter, WriterOptions};
