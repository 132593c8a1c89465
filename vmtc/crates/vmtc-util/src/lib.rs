//! vmtc-util - Shared foundation types for the VM translator
//!
//! This crate holds the small pieces every other `vmtc` crate needs:
//!
//! - [`span`] - where a command came from (source unit + line)
//! - [`diagnostic`] - error/warning collection for whole-program checks
//! - hash map aliases used for name tables
//!
//! Nothing here knows about the VM language itself.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::SourceLocation;

pub use rustc_hash::FxHashMap;

/// Insertion-ordered map using the Fx hasher.
///
/// Name tables use this so iteration (and therefore any output derived from
/// it) is deterministic across runs.
pub type FxIndexMap<K, V> =
    indexmap::IndexMap<K, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;
