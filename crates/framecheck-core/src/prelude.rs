//! Common imports for crates and tests building tables.

pub use crate::config::HarnessConfig;
pub use crate::error::{Error, Result};
pub use crate::schema::{DataType, Field, Schema, TypeClass};
pub use crate::table::{DataFrame, Index, IndexKind, Level, Materialize, Series, Table};
pub use crate::types::{Column, Scalar};
