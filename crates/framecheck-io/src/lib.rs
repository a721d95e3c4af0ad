#![forbid(unsafe_code)]
//! framecheck-io: file-backed tables.
//!
//! - `readers`: CSV/JSONL readers → `DataFrame` with light type inference.
//! - `writers`: CSV writer for recording expected frames.
//! - `source`: `FileSource`, a `Materialize` handle over a file on disk.

pub mod readers;
pub mod source;
pub mod writers;

pub mod error;

pub use source::{FileFormat, FileSource};
