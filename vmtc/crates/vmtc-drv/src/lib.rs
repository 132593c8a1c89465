//! vmtc-drv - Translation driver
//!
//! Ties the pipeline together for one run:
//!
//! 1. [`source`] - find the `.vm` units behind the input path and read them
//! 2. [`session`] - pass 1 (function table, checks), bootstrap, pass 2
//! 3. [`cli`] - argument parsing, configuration and logging for the binary
//!
//! ```no_run
//! use std::path::Path;
//! use vmtc_drv::{Config, Session};
//!
//! let session = Session::open(Path::new("FibonacciElement"), Config::default())?;
//! let report = session.translate()?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), vmtc_drv::TranslateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod source;

pub use config::{BootstrapMode, Config, TranslateConfig};
pub use error::{Result, TranslateError};
pub use session::{Session, TranslationReport};
pub use source::{InputKind, SourceMap, SourceUnit, UnitId};
