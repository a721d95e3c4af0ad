//! Canonical tables: row-label axes, series, frames, and the `Materialize`
//! hook through which deferred tables become local ones.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;
use crate::types::{infer_data_type, Column, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// Implicit positions `0..n`.
    Range,
    /// Explicit labels, possibly repeated.
    Labels,
}

/// One level of a (possibly multi-level) index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: Option<String>,
    pub data_type: DataType,
    pub labels: Vec<Scalar>,
}

impl Level {
    pub fn new<T: Into<Scalar>>(name: Option<&str>, labels: Vec<T>) -> Self {
        let labels: Vec<Scalar> = labels.into_iter().map(Into::into).collect();
        Self {
            name: name.map(str::to_string),
            data_type: infer_data_type(&labels),
            labels,
        }
    }
}

/// Row-label axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub kind: IndexKind,
    pub levels: Vec<Level>,
}

impl Index {
    pub fn range(len: usize) -> Self {
        Self {
            kind: IndexKind::Range,
            levels: vec![Level {
                name: None,
                data_type: DataType::Int64,
                labels: (0..len as i64).map(Scalar::I64).collect(),
            }],
        }
    }

    pub fn from_labels<T: Into<Scalar>>(name: Option<&str>, labels: Vec<T>) -> Self {
        Self {
            kind: IndexKind::Labels,
            levels: vec![Level::new(name, labels)],
        }
    }

    /// Multi-level index; every level must have the same length.
    pub fn multi(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Schema("multi-index needs at least one level".into()));
        }
        let len = levels[0].labels.len();
        if let Some(bad) = levels.iter().find(|l| l.labels.len() != len) {
            return Err(Error::Schema(format!(
                "index level length mismatch: {} vs {}",
                bad.labels.len(),
                len
            )));
        }
        Ok(Self {
            kind: IndexKind::Labels,
            levels,
        })
    }

    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, |l| l.labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nlevels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_multi(&self) -> bool {
        self.levels.len() > 1
    }

    pub fn names(&self) -> Vec<Option<&str>> {
        self.levels.iter().map(|l| l.name.as_deref()).collect()
    }

    /// Label at `row` across every level.
    pub fn label(&self, row: usize) -> Vec<&Scalar> {
        self.levels.iter().map(|l| &l.labels[row]).collect()
    }

    /// dtype of a single-level index; multi-indexes are tuples (`object`).
    pub fn data_type(&self) -> DataType {
        match self.levels.as_slice() {
            [only] => only.data_type,
            _ => DataType::Utf8,
        }
    }

    /// Row is null when any level holds a null label.
    pub fn null_mask(&self) -> Vec<bool> {
        (0..self.len())
            .map(|row| self.levels.iter().any(|l| l.labels[row].is_null()))
            .collect()
    }

    /// Rows `start..end`; a range index keeps its original positions as labels.
    pub fn slice(&self, start: usize, end: usize) -> Index {
        Index {
            kind: if start == 0 { self.kind } else { IndexKind::Labels },
            levels: self
                .levels
                .iter()
                .map(|l| Level {
                    name: l.name.clone(),
                    data_type: l.data_type,
                    labels: l.labels[start..end].to_vec(),
                })
                .collect(),
        }
    }

    /// Append `other` after `self`. Two contiguous range indexes stay a range.
    pub fn append(&mut self, other: &Index) -> Result<()> {
        if self.nlevels() != other.nlevels() {
            return Err(Error::Schema(format!(
                "cannot append index with {} levels to one with {}",
                other.nlevels(),
                self.nlevels()
            )));
        }
        for (mine, theirs) in self.levels.iter_mut().zip(&other.levels) {
            mine.labels.extend(theirs.labels.iter().cloned());
        }
        // A non-contiguous tail degrades a range index to labels.
        let positional = self.levels.len() == 1
            && self.levels[0]
                .labels
                .iter()
                .enumerate()
                .all(|(i, l)| *l == Scalar::I64(i as i64));
        if self.kind == IndexKind::Range && !positional {
            self.kind = IndexKind::Labels;
        }
        Ok(())
    }
}

/// Single named axis of values with its own index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: Option<String>,
    pub data_type: DataType,
    pub values: Vec<Scalar>,
    pub index: Index,
}

impl Series {
    pub fn new<T: Into<Scalar>>(name: Option<&str>, values: Vec<T>) -> Self {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        Self {
            name: name.map(str::to_string),
            data_type: infer_data_type(&values),
            index: Index::range(values.len()),
            values,
        }
    }

    pub fn with_index(mut self, index: Index) -> Result<Self> {
        if index.len() != self.values.len() {
            return Err(Error::Schema(format!(
                "index length {} does not match series length {}",
                index.len(),
                self.values.len()
            )));
        }
        self.index = index;
        Ok(self)
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_mask(&self) -> Vec<bool> {
        self.values.iter().map(Scalar::is_null).collect()
    }
}

impl From<Column> for Series {
    fn from(c: Column) -> Self {
        Self {
            name: Some(c.name),
            data_type: c.data_type,
            index: Index::range(c.values.len()),
            values: c.values,
        }
    }
}

/// Row-labeled, multi-column table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    pub index: Index,
    pub columns: Vec<Column>,
    /// Name of the column axis itself.
    pub columns_name: Option<String>,
}

impl DataFrame {
    /// Frame over `columns` with a range index. Columns must be equally long.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(Error::Schema(format!(
                "column '{}' has length {}, expected {}",
                bad.name,
                bad.len(),
                rows
            )));
        }
        Ok(Self {
            index: Index::range(rows),
            columns,
            columns_name: None,
        })
    }

    pub fn with_index(mut self, index: Index) -> Result<Self> {
        if !self.columns.is_empty() && index.len() != self.num_rows() {
            return Err(Error::Schema(format!(
                "index length {} does not match frame length {}",
                index.len(),
                self.num_rows()
            )));
        }
        self.index = index;
        Ok(self)
    }

    pub fn with_columns_name(mut self, name: impl Into<String>) -> Self {
        self.columns_name = Some(name.into());
        self
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Rows `start..end` as a new frame.
    pub fn slice_rows(&self, start: usize, end: usize) -> DataFrame {
        DataFrame {
            index: self.index.slice(start, end),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data_type, c.values[start..end].to_vec()))
                .collect(),
            columns_name: self.columns_name.clone(),
        }
    }
}

/// A fully materialized table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Table {
    Frame(DataFrame),
    Series(Series),
    Index(Index),
}

impl Table {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Table::Frame(_) => "DataFrame",
            Table::Series(_) => "Series",
            Table::Index(i) if i.is_multi() => "MultiIndex",
            Table::Index(_) => "Index",
        }
    }
}

impl From<DataFrame> for Table {
    fn from(f: DataFrame) -> Self {
        Table::Frame(f)
    }
}

impl From<Series> for Table {
    fn from(s: Series) -> Self {
        Table::Series(s)
    }
}

impl From<Index> for Table {
    fn from(i: Index) -> Self {
        Table::Index(i)
    }
}

/// A handle to tabular data that can produce a local `Table` on demand.
///
/// Implementations may read files, gather partitions, or decode columnar
/// batches. Materializing must not mutate the handle's logical contents.
pub trait Materialize: std::fmt::Debug + Send + Sync {
    fn to_local_table(&self) -> Result<Table>;
}

impl Materialize for Table {
    fn to_local_table(&self) -> Result<Table> {
        Ok(self.clone())
    }
}
