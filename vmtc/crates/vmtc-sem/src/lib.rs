//! vmtc-sem - Whole-program knowledge about VM functions
//!
//! Code generation itself never needs to resolve a call target: the Hack
//! assembler turns `@Foo.bar` into an address after the fact. What a
//! multi-unit translation does need is a first pass over every unit, so
//! that each function is known before any code is written. That pass lives
//! here:
//!
//! - [`FunctionTable`] - function name -> defining unit
//! - [`FunctionCollector`] - builds the table and reports duplicates and
//!   calls to functions no unit defines

pub mod analysis;
pub mod function_table;

pub use analysis::{CheckLevel, CheckPolicy, FunctionCollector};
pub use function_table::FunctionTable;
