#![forbid(unsafe_code)]
//! framecheck-harness: fixtures and scoped helpers for tests that exercise a
//! tabular-data framework.
//!
//! - `session`: in-process compute sessions, owned or shared by fixtures.
//! - `eventually`: poll a condition until it holds or a timeout elapses.
//! - `warnings`: raise warnings and assert on the ones a body produces.
//! - `artifact`: find a build's jar under sbt or maven layouts.
//! - `temp`: temp directories and file paths removed at scope exit.
//! - `quiet`, `logging`: subscriber setup and a scope that silences it.
//! - `wire`: big-endian int framing.

pub mod artifact;
pub mod error;
pub mod eventually;
pub mod logging;
pub mod quiet;
pub mod session;
pub mod temp;
pub mod warnings;
pub mod wire;

pub use artifact::{search_artifact, search_jar};
pub use error::{HarnessError, Result};
pub use eventually::{eventually, Check, Eventually};
pub use quiet::{quiet, QuietLogs};
pub use session::{
    default_session, stop_default_session, Lifecycle, LocalSession, PartitionedTable,
    SessionFixture,
};
pub use temp::{with_temp_dir, with_temp_file, TempDirScope};
pub use warnings::{
    assert_produces_warning, catch_warnings, warn, FilterLevel, WarningCategory, WarningOptions,
    WarningRecord,
};
pub use wire::{read_int, write_int, ByteArrayOutput};
