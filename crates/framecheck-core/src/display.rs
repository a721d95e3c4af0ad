//! Human-readable rendering of tables and their dtypes.
//!
//! The layout mirrors what data scientists expect from a dataframe repr so a
//! failure message can be diffed by eye.

use std::fmt;

use crate::schema::{DataType, TypeClass};
use crate::table::{DataFrame, Index, IndexKind, Series, Table};
use crate::types::Scalar;

fn cell(value: &Scalar, data_type: DataType) -> String {
    if value.is_null() {
        data_type.null_repr().to_string()
    } else {
        value.to_string()
    }
}

fn label_repr(value: &Scalar, data_type: DataType) -> String {
    if value.is_null() {
        data_type.null_repr().to_string()
    } else {
        value.repr()
    }
}

pub fn name_repr(name: Option<&str>) -> String {
    match name {
        Some(n) => format!("'{}'", n),
        None => "None".to_string(),
    }
}

/// Lay out a grid; `left_cols` leading columns are left-aligned.
fn grid(rows: &[Vec<String>], left_cols: usize) -> String {
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..ncols)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    rows.iter()
        .map(|r| {
            r.iter()
                .enumerate()
                .map(|(c, s)| {
                    if c < left_cols {
                        format!("{:<w$}", s, w = widths[c])
                    } else {
                        format!("{:>w$}", s, w = widths[c])
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == IndexKind::Range {
            return write!(f, "RangeIndex(start=0, stop={}, step=1)", self.len());
        }
        if self.is_multi() {
            let tuples: Vec<String> = (0..self.len())
                .map(|row| {
                    let parts: Vec<String> = self
                        .levels
                        .iter()
                        .map(|l| label_repr(&l.labels[row], l.data_type))
                        .collect();
                    format!("({})", parts.join(", "))
                })
                .collect();
            let names: Vec<String> = self.names().into_iter().map(name_repr).collect();
            return write!(
                f,
                "MultiIndex([{}], names=[{}])",
                tuples.join(", "),
                names.join(", ")
            );
        }
        let Some(level) = self.levels.first() else {
            return f.write_str("Index([], dtype='object')");
        };
        let prefix = match level.data_type.type_class() {
            TypeClass::Integer => "Int64Index",
            TypeClass::Float => "Float64Index",
            _ => "Index",
        };
        let labels: Vec<String> = level
            .labels
            .iter()
            .map(|l| label_repr(l, level.data_type))
            .collect();
        write!(f, "{}([{}], dtype='{}'", prefix, labels.join(", "), level.data_type)?;
        if let Some(name) = &level.name {
            write!(f, ", name='{}'", name)?;
        }
        f.write_str(")")
    }
}

fn index_cells(index: &Index, row: usize) -> Vec<String> {
    index
        .levels
        .iter()
        .map(|l| cell(&l.labels[row], l.data_type))
        .collect()
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Series([], dtype: {})", self.data_type);
        }
        let rows: Vec<Vec<String>> = (0..self.len())
            .map(|row| {
                let mut r = index_cells(&self.index, row);
                r.push(format!("  {}", cell(&self.values[row], self.data_type)));
                r
            })
            .collect();
        writeln!(f, "{}", grid(&rows, self.index.nlevels()))?;
        match &self.name {
            Some(name) => write!(f, "Name: {}, dtype: {}", name, self.data_type),
            None => write!(f, "dtype: {}", self.data_type),
        }
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() || self.num_rows() == 0 {
            return write!(
                f,
                "Empty DataFrame\nColumns: [{}]\nIndex: [{}]",
                self.column_names().join(", "),
                (0..self.num_rows())
                    .map(|r| index_cells(&self.index, r).join(", "))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        let nlevels = self.index.nlevels();
        let mut rows = Vec::with_capacity(self.num_rows() + 2);

        let mut header = vec![String::new(); nlevels];
        if let (Some(name), Some(slot)) = (&self.columns_name, header.last_mut()) {
            *slot = name.clone();
        }
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        rows.push(header);

        if self.index.levels.iter().any(|l| l.name.is_some()) {
            let mut names: Vec<String> = self
                .index
                .levels
                .iter()
                .map(|l| l.name.clone().unwrap_or_default())
                .collect();
            names.extend(self.columns.iter().map(|_| String::new()));
            rows.push(names);
        }

        for row in 0..self.num_rows() {
            let mut r = index_cells(&self.index, row);
            r.extend(self.columns.iter().map(|c| cell(&c.values[row], c.data_type)));
            rows.push(r);
        }
        f.write_str(&grid(&rows, nlevels))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Frame(t) => t.fmt(f),
            Table::Series(t) => t.fmt(f),
            Table::Index(t) => t.fmt(f),
        }
    }
}

/// Per-column dtypes for frames, the single dtype otherwise.
pub fn dtypes_repr(table: &Table) -> String {
    match table {
        Table::Frame(frame) => {
            let rows: Vec<Vec<String>> = frame
                .columns
                .iter()
                .map(|c| vec![c.name.clone(), c.data_type.to_string()])
                .collect();
            let body = grid(&rows, 1);
            if body.is_empty() {
                "Series([], dtype: object)".to_string()
            } else {
                format!("{}\ndtype: object", body)
            }
        }
        Table::Series(series) => series.data_type.to_string(),
        Table::Index(index) => index.data_type().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Level;
    use crate::types::Column;

    #[test]
    fn frame_renders_as_aligned_grid() {
        let frame = DataFrame::new(vec![
            Column::from_values("a", vec![1i64, 20]),
            Column::from_values("b", vec![Some(1.5f64), None]),
        ])
        .unwrap();
        assert_eq!(frame.to_string(), "    a    b\n0   1  1.5\n1  20  NaN");
    }

    #[test]
    fn empty_frame_lists_columns() {
        let frame = DataFrame::new(vec![Column::new("a", DataType::Int64, vec![])]).unwrap();
        assert_eq!(frame.to_string(), "Empty DataFrame\nColumns: [a]\nIndex: []");
    }

    #[test]
    fn series_has_name_and_dtype_footer() {
        let series = Series::new(Some("x"), vec![1.0f64, 2.5]);
        let text = series.to_string();
        assert!(text.ends_with("Name: x, dtype: float64"));
        assert!(text.starts_with("0    1.0"));
    }

    #[test]
    fn index_reprs() {
        assert_eq!(Index::range(3).to_string(), "RangeIndex(start=0, stop=3, step=1)");
        assert_eq!(
            Index::from_labels(Some("k"), vec!["a", "b"]).to_string(),
            "Index(['a', 'b'], dtype='object', name='k')"
        );
        let multi = Index::multi(vec![
            Level::new(Some("x"), vec!["a"]),
            Level::new(None, vec![1i64]),
        ])
        .unwrap();
        assert_eq!(multi.to_string(), "MultiIndex([('a', 1)], names=['x', None])");
    }

    #[test]
    fn index_without_levels_renders_empty() {
        let bare = Index {
            kind: IndexKind::Labels,
            levels: vec![],
        };
        assert_eq!(bare.to_string(), "Index([], dtype='object')");

        let frame = DataFrame {
            index: bare,
            columns: vec![],
            columns_name: Some("cols".into()),
        };
        assert!(frame.to_string().starts_with("Empty DataFrame"));
    }

    #[test]
    fn frame_dtypes_listing() {
        let frame = DataFrame::new(vec![
            Column::from_values("a", vec![1i64]),
            Column::from_values("bb", vec!["x"]),
        ])
        .unwrap();
        assert_eq!(
            dtypes_repr(&Table::Frame(frame)),
            "a    int64\nbb  object\ndtype: object"
        );
    }
}
