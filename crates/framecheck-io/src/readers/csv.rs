//! CSV reader → `DataFrame`.
//!
//! Caveats:
//! - Without an explicit schema, each column's type is inferred from its
//!   non-empty cells: int64, then float64, then bool, else utf8.
//! - Empty cells are nulls.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv as csv_crate;
use framecheck_core::schema::{DataType, Field, Schema};
use framecheck_core::table::DataFrame;
use framecheck_core::types::{Column, Scalar};

use crate::error::{Error, Result};

pub struct CsvReader<R: Read> {
    rdr: csv_crate::Reader<R>,
    headers: Vec<String>,
    schema: Option<Schema>,
}

impl CsvReader<File> {
    /// Headered CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvReader<R> {
    /// Headered CSV; column names come from the first record.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut rdr = csv_crate::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();

        Ok(Self {
            rdr,
            headers,
            schema: None,
        })
    }

    /// Create a CSV reader with an explicit schema (for headerless CSV).
    pub fn from_reader_with_schema(reader: R, schema: Schema) -> Result<Self> {
        let rdr = csv_crate::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Ok(Self {
            rdr,
            headers: schema.fields.iter().map(|f| f.name.clone()).collect(),
            schema: Some(schema),
        })
    }

    /// Read every remaining record into one frame.
    pub fn read_frame(&mut self) -> Result<DataFrame> {
        let ncols = self.headers.len();
        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); ncols];

        for rec in self.rdr.records() {
            let rec = rec?;
            // Flexible CSV may have short rows; pad with nulls.
            for (i, col) in raw.iter_mut().enumerate() {
                let cell = rec.get(i).filter(|s| !s.is_empty()).map(str::to_string);
                col.push(cell);
            }
        }

        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => Schema::new(
                self.headers
                    .iter()
                    .zip(&raw)
                    .map(|(name, cells)| Field::new(name.clone(), infer_type(cells), true))
                    .collect(),
            ),
        };

        let mut columns = Vec::with_capacity(ncols);
        for (field, cells) in schema.fields.iter().zip(raw) {
            let values = cells
                .into_iter()
                .map(|cell| parse_cell(cell.as_deref(), field))
                .collect::<Result<Vec<_>>>()?;
            columns.push(Column::new(field.name.clone(), field.data_type, values));
        }
        tracing::debug!(columns = columns.len(), "read csv frame");
        Ok(DataFrame::new(columns)?)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_type(cells: &[Option<String>]) -> DataType {
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        DataType::Utf8
    } else if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

fn parse_cell(cell: Option<&str>, field: &Field) -> Result<Scalar> {
    let Some(s) = cell else {
        return Ok(Scalar::Null);
    };
    let bad = || {
        Error::Schema(format!(
            "column '{}': cannot parse '{}' as {}",
            field.name, s, field.data_type
        ))
    };
    Ok(match field.data_type {
        DataType::Boolean => Scalar::Bool(parse_bool(s).ok_or_else(bad)?),
        DataType::Int32 => Scalar::I32(s.parse().map_err(|_| bad())?),
        DataType::Int64 | DataType::Date64 => Scalar::I64(s.parse().map_err(|_| bad())?),
        DataType::Float32 => Scalar::F32(s.parse().map_err(|_| bad())?),
        DataType::Float64 | DataType::Decimal128 => Scalar::F64(s.parse().map_err(|_| bad())?),
        DataType::Utf8 => Scalar::Str(s.to_string()),
        DataType::Binary => Scalar::Bin(s.as_bytes().to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_column_types() {
        let data = "id,score,flag,name\n1,1.5,true,a\n2,,false,b\n";
        let frame = CsvReader::from_reader(data.as_bytes())
            .unwrap()
            .read_frame()
            .unwrap();
        assert_eq!(frame.shape(), (2, 4));
        let types: Vec<DataType> = frame.columns.iter().map(|c| c.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Int64, DataType::Float64, DataType::Boolean, DataType::Utf8]
        );
        assert_eq!(frame.column("score").unwrap().values[1], Scalar::Null);
    }

    #[test]
    fn explicit_schema_rejects_bad_cells() {
        let schema = Schema::new(vec![Field::new("n", DataType::Int32, true)]);
        let err = CsvReader::from_reader_with_schema("x\n".as_bytes(), schema)
            .unwrap()
            .read_frame()
            .unwrap_err();
        assert!(matches!(err, Error::Schema(msg) if msg.contains("'x'")));
    }

    #[test]
    fn first_record_is_always_the_header() {
        let frame = CsvReader::from_reader("1,2\n3,4\n".as_bytes())
            .unwrap()
            .read_frame()
            .unwrap();
        assert_eq!(frame.column_names(), vec!["1", "2"]);
        assert_eq!(frame.num_rows(), 1);

        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("b", DataType::Int64, false),
        ]);
        let headerless = CsvReader::from_reader_with_schema("1,2\n3,4\n".as_bytes(), schema)
            .unwrap()
            .read_frame()
            .unwrap();
        assert_eq!(headerless.num_rows(), 2);
    }
}
