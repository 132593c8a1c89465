//! Error types for code generation
//!
//! Every variant here means the VM program (or the driver) asked for
//! something the target cannot express. None of them are recoverable.

use thiserror::Error;
use vmtc_lex::Segment;

/// Error type for Hack code generation
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// push/pop index outside the segment's domain
    #[error("{segment} index {index} out of range (valid: {valid})")]
    IndexOutOfRange {
        segment: Segment,
        index: u32,
        valid: &'static str,
    },

    /// `pop constant i`: constants are not storage
    #[error("cannot pop into the constant segment (index {0})")]
    PopConstant(u32),

    /// A count that would need an A-instruction wider than 15 bits
    #[error("{what} {value} exceeds the largest address constant (32767)")]
    ConstantTooLarge { what: &'static str, value: u32 },

    /// `static` addressed before the driver named the current unit
    #[error("static segment used with no current source unit")]
    NoSourceUnit,

    /// The bootstrap may be written at most once per output
    #[error("bootstrap code has already been written")]
    BootstrapAlreadyWritten,

    /// Writing to the output stream failed
    #[error("failed to write assembly: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
