//! Entry point of the equality engine: classify both operands, then dispatch
//! on the pair of kinds.

use crate::almost::{describe_pair, tables_almost_equal};
use crate::error::{AssertError, Result};
use crate::exact::tables_equal;
use crate::tolerance::almost_equal;
use crate::value::{classify, Classified, Value};

/// How strictly tables and scalars are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Exact cell equality in strict mode; loose numeric tolerance otherwise.
    pub check_exact: bool,
    /// Approximate mode: 7-place numeric rounding, row indexes ignored.
    pub almost: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::exact()
    }
}

impl CompareOptions {
    pub fn exact() -> Self {
        Self {
            check_exact: true,
            almost: false,
        }
    }

    pub fn loose() -> Self {
        Self {
            check_exact: false,
            almost: false,
        }
    }

    pub fn almost() -> Self {
        Self {
            check_exact: true,
            almost: true,
        }
    }
}

/// Compare two operands. `Ok(())` means equal; any mismatch is an error whose
/// message carries both operands.
pub fn equals(left: &Value, right: &Value, options: CompareOptions) -> Result<()> {
    let (l, r) = (classify(left)?, classify(right)?);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        almost = options.almost,
        check_exact = options.check_exact,
        "comparing operands"
    );

    match (&l, &r) {
        (Classified::Table(lt), Classified::Table(rt)) if lt.kind_name() == rt.kind_name() => {
            if options.almost {
                tables_almost_equal(lt, rt)
            } else {
                tables_equal(lt, rt, options.check_exact)
            }
        }
        (Classified::Sequence(ls), Classified::Sequence(rs)) => sequences_equal(ls, rs, options),
        (Classified::Null, Classified::Null) => Ok(()),
        (Classified::Scalar(a), Classified::Scalar(b)) => {
            let equal = if options.almost {
                almost_equal(a, b)
            } else {
                a.value_eq(b)
            };
            if equal {
                return Ok(());
            }
            let detail = if options.almost {
                describe_pair(a, b)
            } else {
                format!("{} != {}", a.repr(), b.repr())
            };
            Err(AssertError::ValueMismatch {
                detail,
                left: a.repr(),
                right: b.repr(),
            })
        }
        _ => Err(AssertError::UnsupportedOperands {
            left: l.to_string(),
            right: r.to_string(),
        }),
    }
}

fn sequences_equal(left: &[Value], right: &[Value], options: CompareOptions) -> Result<()> {
    if left.len() != right.len() {
        return Err(AssertError::ShapeMismatch {
            detail: format!("Sequences differ in length: {} != {}", left.len(), right.len()),
            left: Value::Sequence(left.to_vec()).to_string(),
            right: Value::Sequence(right.to_vec()).to_string(),
        });
    }
    for (position, (a, b)) in left.iter().zip(right).enumerate() {
        equals(a, b, options).map_err(|source| match source {
            AssertError::Materialize(_) => source,
            source => AssertError::Element {
                position,
                source: Box::new(source),
            },
        })?;
    }
    Ok(())
}

pub fn is_equal(left: &Value, right: &Value, options: CompareOptions) -> bool {
    equals(left, right, options).is_ok()
}

/// Panicking form for test bodies.
#[track_caller]
pub fn assert_equal(left: impl Into<Value>, right: impl Into<Value>, options: CompareOptions) {
    if let Err(e) = equals(&left.into(), &right.into(), options) {
        panic!("{}", e);
    }
}
