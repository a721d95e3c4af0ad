#![forbid(unsafe_code)]
//! framecheck-assert: the structural equality engine.
//!
//! Operands are classified into a closed set of kinds (table, sequence,
//! scalar, null) after materializing deferred tables; the comparison is one
//! exhaustive match over the classified pair.
//!
//! - `engine`: `equals` / `is_equal` / `assert_equal` and `CompareOptions`.
//! - `exact`: structure-and-value checks with dataframe-library wording.
//! - `almost`: null-aligned comparison to 7 decimal places.
//! - `dual`: run one body against two contexts and compare the results.

pub mod almost;
pub mod dual;
pub mod engine;
pub mod error;
pub mod exact;
pub mod render;
pub mod tolerance;
pub mod value;

pub use dual::{compare_both, DualExecution};
pub use engine::{assert_equal, equals, is_equal, CompareOptions};
pub use error::{AssertError, Result};
pub use value::{classify, Classified, Value};
