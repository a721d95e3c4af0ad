//! Strict structural comparison of local tables.
//!
//! Checks run in a fixed order and stop at the first failure: dimensions,
//! row index, column axis, then per column dtype and values. With
//! `check_exact = false` numeric cells use the loose tolerance from
//! [`crate::tolerance`], everything else must match exactly.

use framecheck_core::display::name_repr;
use framecheck_core::schema::{DataType, TypeClass};
use framecheck_core::table::{DataFrame, Index, IndexKind, Series, Table};
use framecheck_core::types::Scalar;

use crate::error::{AssertError, Result};
use crate::render::{cell_list, detail, Check, Mismatch};
use crate::tolerance::cell_equal;

/// Compare two tables of the same kind.
pub fn tables_equal(left: &Table, right: &Table, check_exact: bool) -> Result<()> {
    let check = match (left, right) {
        (Table::Frame(l), Table::Frame(r)) => frame_check(l, r, check_exact),
        (Table::Series(l), Table::Series(r)) => series_check(l, r, check_exact),
        (Table::Index(l), Table::Index(r)) => index_check(l, r, true, check_exact, "Index"),
        _ => {
            return Err(AssertError::UnsupportedOperands {
                left: left.kind_name().to_string(),
                right: right.kind_name().to_string(),
            })
        }
    };
    check.map_err(|m| m.into_error(left, right))
}

pub fn frame_check(left: &DataFrame, right: &DataFrame, check_exact: bool) -> Check {
    if left.shape() != right.shape() {
        return Err(Mismatch::Shape(detail(
            "DataFrame",
            "DataFrame shape mismatch",
            &shape_repr(left.shape()),
            &shape_repr(right.shape()),
        )));
    }

    index_check(
        &left.index,
        &right.index,
        !left.index.is_empty(),
        check_exact,
        "DataFrame.index",
    )?;

    let (lcols, rcols) = (column_axis(left), column_axis(right));
    index_check(&lcols, &rcols, !lcols.is_empty(), true, "DataFrame.columns")?;

    for (i, (lc, rc)) in left.columns.iter().zip(&right.columns).enumerate() {
        let obj = format!("DataFrame.iloc[:, {}] (column name=\"{}\")", i, lc.name);
        dtype_check(lc.data_type, rc.data_type, &obj)?;
        values_check(
            (&lc.values, lc.data_type),
            (&rc.values, rc.data_type),
            &left.index,
            check_exact,
            &obj,
        )?;
    }
    Ok(())
}

pub fn series_check(left: &Series, right: &Series, check_exact: bool) -> Check {
    if left.len() != right.len() {
        return Err(Mismatch::Shape(detail(
            "Series",
            "Series length are different",
            &format!("{}, {}", left.len(), left.index),
            &format!("{}, {}", right.len(), right.index),
        )));
    }

    index_check(
        &left.index,
        &right.index,
        !left.index.is_empty(),
        check_exact,
        "Series.index",
    )?;
    dtype_check(left.data_type, right.data_type, "Series")?;
    values_check(
        (&left.values, left.data_type),
        (&right.values, right.data_type),
        &left.index,
        check_exact,
        "Series",
    )?;

    if left.name != right.name {
        return Err(Mismatch::Value(detail(
            "Attributes of Series",
            "Attribute \"name\" are different",
            &name_repr(left.name.as_deref()),
            &name_repr(right.name.as_deref()),
        )));
    }
    Ok(())
}

/// Compare two row-label axes. `check_type` compares index classes, treating
/// a range index as equivalent to an integer one.
pub fn index_check(
    left: &Index,
    right: &Index,
    check_type: bool,
    check_exact: bool,
    obj: &str,
) -> Check {
    if left.nlevels() != right.nlevels() {
        return Err(Mismatch::Shape(detail(
            obj,
            &format!("{} levels are different", obj),
            &format!("{}, {}", left.nlevels(), left),
            &format!("{}, {}", right.nlevels(), right),
        )));
    }
    if left.len() != right.len() {
        return Err(Mismatch::Shape(detail(
            obj,
            &format!("{} length are different", obj),
            &format!("{}, {}", left.len(), left),
            &format!("{}, {}", right.len(), right),
        )));
    }

    if check_type && !classes_equivalent(left, right) {
        return Err(Mismatch::Value(detail(
            obj,
            &format!("{} classes are different", obj),
            class_name(left),
            class_name(right),
        )));
    }

    for (i, (ll, rl)) in left.levels.iter().zip(&right.levels).enumerate() {
        let level_obj = if left.is_multi() {
            format!("MultiIndex level [{}]", i)
        } else {
            obj.to_string()
        };
        let diff = count_diff(&ll.labels, &rl.labels, check_exact);
        if diff > 0 {
            let message = format!(
                "{} values are different ({} %)",
                level_obj,
                percent(diff, ll.labels.len())
            );
            let (lrepr, rrepr) = if left.is_multi() {
                (cell_list(&ll.labels, ll.data_type), cell_list(&rl.labels, rl.data_type))
            } else {
                (left.to_string(), right.to_string())
            };
            return Err(Mismatch::Value(detail(&level_obj, &message, &lrepr, &rrepr)));
        }
    }

    if left.names() != right.names() {
        return Err(Mismatch::Value(detail(
            obj,
            "Attribute \"names\" are different",
            &names_repr(left),
            &names_repr(right),
        )));
    }
    Ok(())
}

fn dtype_check(left: DataType, right: DataType, obj: &str) -> Check {
    if left == right {
        return Ok(());
    }
    Err(Mismatch::Value(detail(
        &format!("Attributes of {}", obj),
        "Attribute \"dtype\" are different",
        left.dtype_name(),
        right.dtype_name(),
    )))
}

fn values_check(
    left: (&[Scalar], DataType),
    right: (&[Scalar], DataType),
    index: &Index,
    check_exact: bool,
    obj: &str,
) -> Check {
    let diff = count_diff(left.0, right.0, check_exact);
    if diff == 0 {
        return Ok(());
    }
    Err(Mismatch::Value(format!(
        "{obj} are different\n\n{obj} values are different ({pct} %)\n[index]: {index}\n[left]:  {l}\n[right]: {r}",
        obj = obj,
        pct = percent(diff, left.0.len()),
        index = index_labels(index),
        l = cell_list(left.0, left.1),
        r = cell_list(right.0, right.1),
    )))
}

fn count_diff(left: &[Scalar], right: &[Scalar], check_exact: bool) -> usize {
    left.iter()
        .zip(right)
        .filter(|(a, b)| !cell_equal(a, b, check_exact))
        .count()
}

/// Share of differing cells, rounded to 5 places.
fn percent(diff: usize, total: usize) -> String {
    let pct = diff as f64 * 100.0 / total.max(1) as f64;
    format!("{:?}", (pct * 1e5).round() / 1e5)
}

fn shape_repr((rows, cols): (usize, usize)) -> String {
    format!("({}, {})", rows, cols)
}

fn names_repr(index: &Index) -> String {
    let names: Vec<String> = index.names().into_iter().map(name_repr).collect();
    format!("[{}]", names.join(", "))
}

fn index_labels(index: &Index) -> String {
    match index.levels.as_slice() {
        [] => return "[]".to_string(),
        [level] => return cell_list(&level.labels, level.data_type),
        _ => {}
    }
    let tuples: Vec<String> = (0..index.len())
        .map(|row| {
            let parts: Vec<String> = index.label(row).iter().map(|s| s.repr()).collect();
            format!("({})", parts.join(", "))
        })
        .collect();
    format!("[{}]", tuples.join(", "))
}

/// Column names as a single-level axis so they go through `index_check`.
fn column_axis(frame: &DataFrame) -> Index {
    Index::from_labels(frame.columns_name.as_deref(), frame.column_names())
}

fn class_of(index: &Index) -> TypeClass {
    match index.kind {
        IndexKind::Range => TypeClass::Integer,
        IndexKind::Labels => index.data_type().type_class(),
    }
}

fn classes_equivalent(left: &Index, right: &Index) -> bool {
    if left.is_multi() || right.is_multi() {
        return left
            .levels
            .iter()
            .zip(&right.levels)
            .all(|(l, r)| l.data_type.type_class() == r.data_type.type_class());
    }
    class_of(left) == class_of(right)
}

fn class_name(index: &Index) -> &'static str {
    if index.kind == IndexKind::Range {
        return "RangeIndex";
    }
    if index.is_multi() {
        return "MultiIndex";
    }
    match index.data_type().type_class() {
        TypeClass::Integer => "Int64Index",
        TypeClass::Float => "Float64Index",
        _ => "Index",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecheck_core::table::Level;
    use framecheck_core::types::Column;

    fn frame(a: Vec<i64>, b: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![Column::from_values("a", a), Column::from_values("b", b)]).unwrap()
    }

    #[test]
    fn identical_frames_pass() {
        let l = frame(vec![1, 2], vec![0.5, f64::NAN]);
        let r = frame(vec![1, 2], vec![0.5, f64::NAN]);
        assert!(frame_check(&l, &r, true).is_ok());
    }

    #[test]
    fn shape_mismatch_is_reported_first() {
        let l = frame(vec![1, 2], vec![0.5, 1.5]);
        let r = frame(vec![1], vec![0.5]);
        let err = frame_check(&l, &r, true).unwrap_err();
        assert_eq!(
            err,
            Mismatch::Shape(
                "DataFrame are different\n\nDataFrame shape mismatch\n[left]:  (2, 2)\n[right]: (1, 2)"
                    .into()
            )
        );
    }

    #[test]
    fn value_message_names_column_and_percentage() {
        let l = frame(vec![1, 2, 3], vec![0.5, 1.5, 2.5]);
        let r = frame(vec![1, 2, 3], vec![0.5, 1.5, 9.0]);
        match frame_check(&l, &r, true).unwrap_err() {
            Mismatch::Value(msg) => {
                assert!(msg.starts_with("DataFrame.iloc[:, 1] (column name=\"b\") are different"));
                assert!(msg.contains("values are different (33.33333 %)"));
                assert!(msg.contains("[index]: [0, 1, 2]"));
                assert!(msg.contains("[right]: [0.5, 1.5, 9.0]"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dtype_difference_is_an_attribute_failure() {
        let l = DataFrame::new(vec![Column::from_values("a", vec![1i64])]).unwrap();
        let r = DataFrame::new(vec![Column::from_values("a", vec![1.0f64])]).unwrap();
        match frame_check(&l, &r, true).unwrap_err() {
            Mismatch::Value(msg) => assert_eq!(
                msg,
                "Attributes of DataFrame.iloc[:, 0] (column name=\"a\") are different\n\n\
                 Attribute \"dtype\" are different\n[left]:  int64\n[right]: float64"
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn loose_mode_tolerates_small_float_noise() {
        let l = frame(vec![1], vec![1.0]);
        let r = frame(vec![1], vec![1.0 + 1e-9]);
        assert!(frame_check(&l, &r, true).is_err());
        assert!(frame_check(&l, &r, false).is_ok());
    }

    #[test]
    fn range_index_is_equivalent_to_integer_labels() {
        let l = Index::range(3);
        let r = Index::from_labels(None, vec![0i64, 1, 2]);
        assert!(index_check(&l, &r, true, true, "Index").is_ok());

        let f = Index::from_labels(None, vec![0.0f64, 1.0, 2.0]);
        match index_check(&l, &f, true, true, "Index").unwrap_err() {
            Mismatch::Value(msg) => assert!(msg.contains("[left]:  RangeIndex\n[right]: Float64Index")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_frames_skip_index_class_check() {
        let l = DataFrame::new(vec![Column::from_values("a", Vec::<i64>::new())]).unwrap();
        let r = l
            .clone()
            .with_index(Index::from_labels(None, Vec::<String>::new()))
            .unwrap();
        assert!(frame_check(&l, &r, true).is_ok());
    }

    #[test]
    fn multi_index_levels_are_compared_separately() {
        let l = Index::multi(vec![Level::new(None, vec!["a", "b"]), Level::new(None, vec![1i64, 2])])
            .unwrap();
        let r = Index::multi(vec![Level::new(None, vec!["a", "b"]), Level::new(None, vec![1i64, 3])])
            .unwrap();
        match index_check(&l, &r, true, true, "Index").unwrap_err() {
            Mismatch::Value(msg) => {
                assert!(msg.starts_with("MultiIndex level [1] are different"));
                assert!(msg.contains("(50.0 %)"));
            }
            other => panic!("unexpected {:?}", other),
        }

        let flat = Index::from_labels(None, vec!["a", "b"]);
        assert!(matches!(index_check(&l, &flat, true, true, "Index"), Err(Mismatch::Shape(_))));
    }

    #[test]
    fn indexes_without_levels_compare_equal() {
        let bare = || Index {
            kind: IndexKind::Labels,
            levels: vec![],
        };
        assert!(index_check(&bare(), &bare(), true, true, "Index").is_ok());
        assert_eq!(index_labels(&bare()), "[]");
        assert!(tables_equal(&Table::Index(bare()), &Table::Index(Index::range(0)), true).is_err());
    }

    #[test]
    fn series_names_are_compared_last() {
        let l = Series::new(Some("x"), vec![1i64, 2]);
        let r = Series::new(Some("y"), vec![1i64, 2]);
        match series_check(&l, &r, true).unwrap_err() {
            Mismatch::Value(msg) => assert!(msg.contains("Attribute \"name\" are different")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mixed_kinds_are_unsupported() {
        let l = Table::Index(Index::range(1));
        let r = Table::Series(Series::new(None, vec![0i64]));
        assert!(matches!(
            tables_equal(&l, &r, true),
            Err(AssertError::UnsupportedOperands { .. })
        ));
    }
}
