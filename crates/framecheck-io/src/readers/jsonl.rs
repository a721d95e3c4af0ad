//! NDJSON reader → `DataFrame`.
//!
//! Caveats:
//! - Builds the column set from the union of keys (sorted by name).
//! - A column mixing integers and floats is promoted to float64.
//! - Arrays/objects become strings.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use framecheck_core::schema::DataType;
use framecheck_core::table::DataFrame;
use framecheck_core::types::{infer_data_type, Column, Scalar};
use serde_json::Value;

use crate::error::{Error, Result};

pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
}

impl JsonlReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::open(path)?;
        Self::from_reader(f)
    }
}

impl<R: Read> JsonlReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            reader: BufReader::new(reader),
        })
    }

    pub fn read_frame(&mut self) -> Result<DataFrame> {
        let mut parsed = Vec::new();
        let mut line = String::new();
        let mut line_no = 0usize;
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line)? {
                Value::Object(map) => parsed.push(map),
                _ => {
                    return Err(Error::Schema(format!(
                        "line {}: expected a JSON object",
                        line_no
                    )))
                }
            }
        }

        let keys: BTreeSet<&String> = parsed.iter().flat_map(|m| m.keys()).collect();
        let mut columns = Vec::with_capacity(keys.len());
        for key in keys {
            let values: Vec<Scalar> = parsed
                .iter()
                .map(|m| to_scalar(m.get(key.as_str()).cloned().unwrap_or(Value::Null)))
                .collect();
            columns.push(promote(key, values));
        }
        tracing::debug!(rows = parsed.len(), columns = columns.len(), "read jsonl frame");
        Ok(DataFrame::new(columns)?)
    }
}

fn promote(name: &str, values: Vec<Scalar>) -> Column {
    let has_float = values.iter().any(|v| matches!(v, Scalar::F64(_)));
    let has_int = values.iter().any(|v| matches!(v, Scalar::I64(_)));
    if has_float && has_int {
        let values = values
            .into_iter()
            .map(|v| match v {
                Scalar::I64(i) => Scalar::F64(i as f64),
                other => other,
            })
            .collect();
        return Column::new(name, DataType::Float64, values);
    }
    let data_type = infer_data_type(&values);
    Column::new(name, data_type, values)
}

fn to_scalar(v: Value) -> Scalar {
    use Scalar::*;
    match v {
        Value::Null => Null,
        Value::Bool(b) => Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::I64(i)
            } else if let Some(f) = n.as_f64() {
                Scalar::F64(f)
            } else {
                Str(n.to_string())
            }
        }
        Value::String(s) => Str(s),
        other => Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_keys_with_nulls() {
        let data = "{\"a\": 1, \"b\": \"x\"}\n\n{\"a\": 2.5}\n";
        let frame = JsonlReader::from_reader(data.as_bytes())
            .unwrap()
            .read_frame()
            .unwrap();
        assert_eq!(frame.column_names(), vec!["a", "b"]);
        let a = frame.column("a").unwrap();
        assert_eq!(a.data_type, DataType::Float64);
        assert_eq!(a.values, vec![Scalar::F64(1.0), Scalar::F64(2.5)]);
        assert_eq!(frame.column("b").unwrap().null_mask(), vec![false, true]);
    }

    #[test]
    fn non_object_lines_are_rejected() {
        let err = JsonlReader::from_reader("[1, 2]\n".as_bytes())
            .unwrap()
            .read_frame()
            .unwrap_err();
        assert!(matches!(err, Error::Schema(msg) if msg.contains("line 1")));
    }
}
