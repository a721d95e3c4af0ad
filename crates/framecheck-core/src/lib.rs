#![forbid(unsafe_code)]
//! framecheck-core: shared kernel for the framecheck test toolkit.
//!
//! This crate contains only *pure* types, small helpers, and interfaces
//! (traits) that other crates implement. There is **no I/O** and **no async**
//! here.
//!
//! Crates that use this:
//! - framecheck-io: file-backed sources implementing `Materialize`.
//! - framecheck-assert: the structural equality engine over `Table`/`Scalar`.
//! - framecheck-harness: sessions, partitioned tables, polling and warning scopes.
//! - framecheck-cli: diffs files and prints the resolved `HarnessConfig`.

pub mod config;
pub mod display;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod table;
pub mod types;

#[cfg(feature = "arrow")]
pub mod arrow;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
