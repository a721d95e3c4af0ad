//! Approximate comparison for results recorded with limited precision.
//!
//! Shapes and null positions must match exactly. Non-null numeric cells
//! compare with the 7-place rounding rule, other cells exactly. Frame row
//! indexes are not compared in this mode.

use framecheck_core::table::{DataFrame, Index, Series, Table};
use framecheck_core::types::Scalar;

use crate::error::{AssertError, Result};
use crate::render::{Check, Mismatch};
use crate::tolerance::{almost_equal, cell_equal, ALMOST_PLACES};

const FRAMES: &str = "DataFrames are not almost equal: ";
const SERIES: &str = "Series are not almost equal: ";
const MULTI: &str = "MultiIndices are not almost equal: ";
const INDICES: &str = "Indices are not almost equal: ";

pub fn tables_almost_equal(left: &Table, right: &Table) -> Result<()> {
    let check = match (left, right) {
        (Table::Frame(l), Table::Frame(r)) => frame_check(l, r),
        (Table::Series(l), Table::Series(r)) => series_check(l, r),
        (Table::Index(l), Table::Index(r)) => index_check(l, r),
        _ => {
            return Err(AssertError::UnsupportedOperands {
                left: left.kind_name().to_string(),
                right: right.kind_name().to_string(),
            })
        }
    };
    check.map_err(|m| m.into_error(left, right))
}

/// `"1.0 != 1.1 within 7 places (0.1 difference)"`, or a plain inequality for
/// non-numeric pairs.
pub fn describe_pair(a: &Scalar, b: &Scalar) -> String {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => format!(
            "{} != {} within {} places ({:?} difference)",
            a.repr(),
            b.repr(),
            ALMOST_PLACES,
            (x - y).abs()
        ),
        _ => format!("{} != {}", a.repr(), b.repr()),
    }
}

fn frame_check(left: &DataFrame, right: &DataFrame) -> Check {
    if left.shape() != right.shape() {
        return Err(Mismatch::Shape(format!(
            "{}shape {:?} != {:?}",
            FRAMES,
            left.shape(),
            right.shape()
        )));
    }
    for (lc, rc) in left.columns.iter().zip(&right.columns) {
        if lc.name != rc.name {
            return Err(Mismatch::Value(format!(
                "{}column name '{}' != '{}'",
                FRAMES, lc.name, rc.name
            )));
        }
        let context = format!("{}column '{}': ", FRAMES, lc.name);
        cells_check(&lc.values, &rc.values, &context)?;
    }
    if left.columns_name != right.columns_name {
        return Err(Mismatch::Value(format!(
            "{}columns name {:?} != {:?}",
            FRAMES, left.columns_name, right.columns_name
        )));
    }
    Ok(())
}

fn series_check(left: &Series, right: &Series) -> Check {
    if left.len() != right.len() {
        return Err(Mismatch::Shape(format!(
            "{}length {} != {}",
            SERIES,
            left.len(),
            right.len()
        )));
    }
    if left.name != right.name {
        return Err(Mismatch::Value(format!(
            "{}name {:?} != {:?}",
            SERIES, left.name, right.name
        )));
    }
    cells_check(&left.values, &right.values, SERIES)
}

fn index_check(left: &Index, right: &Index) -> Check {
    if left.nlevels() != right.nlevels() {
        return Err(Mismatch::Shape(format!(
            "{}levels {} != {}",
            if left.is_multi() { MULTI } else { INDICES },
            left.nlevels(),
            right.nlevels()
        )));
    }
    if left.is_multi() {
        return multi_check(left, right);
    }
    if left.len() != right.len() {
        return Err(Mismatch::Shape(format!(
            "{}length {} != {}",
            INDICES,
            left.len(),
            right.len()
        )));
    }
    match (left.levels.first(), right.levels.first()) {
        (Some(l), Some(r)) => cells_check(&l.labels, &r.labels, INDICES),
        _ => Ok(()),
    }
}

/// Multi-level labels are tuples and compare exactly.
fn multi_check(left: &Index, right: &Index) -> Check {
    if left.len() != right.len() {
        return Err(Mismatch::Shape(format!(
            "{}length {} != {}",
            MULTI,
            left.len(),
            right.len()
        )));
    }
    for row in 0..left.len() {
        let (l, r) = (left.label(row), right.label(row));
        if !l.iter().zip(&r).all(|(a, b)| cell_equal(a, b, true)) {
            return Err(Mismatch::Value(format!(
                "{}label {} != {} at position {}",
                MULTI,
                tuple_repr(&l),
                tuple_repr(&r),
                row
            )));
        }
    }
    Ok(())
}

/// Null positions first, then the non-null cells pairwise.
fn cells_check(left: &[Scalar], right: &[Scalar], context: &str) -> Check {
    for (row, (a, b)) in left.iter().zip(right).enumerate() {
        if a.is_null() != b.is_null() {
            return Err(Mismatch::Value(format!(
                "{}null mask differs at position {}: {} != {}",
                context,
                row,
                a.repr(),
                b.repr()
            )));
        }
    }
    let pairs = left.iter().zip(right).filter(|(a, _)| !a.is_null());
    for (a, b) in pairs {
        if !almost_equal(a, b) {
            return Err(Mismatch::Value(format!("{}{}", context, describe_pair(a, b))));
        }
    }
    Ok(())
}

fn tuple_repr(label: &[&Scalar]) -> String {
    let parts: Vec<String> = label.iter().map(|s| s.repr()).collect();
    format!("({})", parts.join(", "))
}
