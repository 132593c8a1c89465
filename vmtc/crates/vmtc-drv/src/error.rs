//! Error handling for the translation driver.
//!
//! Messages name the failing file and, when there is one, the line. The
//! underlying scanner or generator error is kept as the source so callers
//! printing the whole chain see both.

use std::path::PathBuf;

use thiserror::Error;
use vmtc_gen::CodeGenError;
use vmtc_lex::LexError;

/// Main error type for a translation run.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Bad or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading an input or creating the output failed.
    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input path is a file without the `.vm` extension.
    #[error("{} is not a .vm file", .0.display())]
    NotVmFile(PathBuf),

    /// The input directory holds no `.vm` files.
    #[error("no .vm files found in {}", .0.display())]
    NoVmFiles(PathBuf),

    /// Two input files would produce the same unit name.
    #[error("unit `{0}` appears more than once in the input")]
    DuplicateUnit(String),

    /// A unit contains text that is not a VM command.
    #[error("{unit}.vm: malformed command")]
    Scan {
        unit: String,
        #[source]
        source: LexError,
    },

    /// A well-formed command the target cannot express.
    #[error("{unit}.vm:{line}: cannot translate `{command}`")]
    CodeGen {
        unit: String,
        line: usize,
        command: String,
        #[source]
        source: CodeGenError,
    },

    /// Writing the bootstrap failed.
    #[error("cannot write bootstrap")]
    Bootstrap(#[source] CodeGenError),

    /// Flushing the finished output failed.
    #[error("cannot write {}", path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: CodeGenError,
    },

    /// Pass 1 reported errors; nothing was written.
    #[error("{errors} error(s) in function checks, no output written")]
    ChecksFailed { errors: usize },
}

/// Result type alias using TranslateError.
pub type Result<T> = std::result::Result<T, TranslateError>;
