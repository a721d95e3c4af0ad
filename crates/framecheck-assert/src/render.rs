//! Operand renderings attached to failures.

use framecheck_core::display::dtypes_repr;
use framecheck_core::schema::DataType;
use framecheck_core::table::Table;
use framecheck_core::types::Scalar;

use crate::error::AssertError;

/// Full table plus its dtype annotation.
pub fn table_block(table: &Table) -> String {
    format!("{}\n{}", table, dtypes_repr(table))
}

/// `[1, 2, NaN]`-style list of cells.
pub fn cell_list(values: &[Scalar], data_type: DataType) -> String {
    let cells: Vec<String> = values
        .iter()
        .map(|v| {
            if v.is_null() {
                data_type.null_repr().to_string()
            } else {
                v.repr()
            }
        })
        .collect();
    format!("[{}]", cells.join(", "))
}

/// Attribute-style detail: `[left]:  x` / `[right]: y`.
pub fn detail(obj: &str, message: &str, left: &str, right: &str) -> String {
    format!(
        "{} are different\n\n{}\n[left]:  {}\n[right]: {}",
        obj, message, left, right
    )
}

/// A table comparison failure before the operand renderings are attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Shape(String),
    Value(String),
}

impl Mismatch {
    pub fn into_error(self, left: &Table, right: &Table) -> AssertError {
        let (left, right) = (table_block(left), table_block(right));
        match self {
            Mismatch::Shape(detail) => AssertError::ShapeMismatch { detail, left, right },
            Mismatch::Value(detail) => AssertError::ValueMismatch { detail, left, right },
        }
    }
}

/// Outcome of one table check.
pub type Check = std::result::Result<(), Mismatch>;
