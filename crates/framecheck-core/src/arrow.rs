//! Arrow integration for columnar transfer.
//!
//! Provides conversions between `DataFrame` columns and Arrow `RecordBatch`.
//! Arrow carries no row index, so the index travels separately and a decoded
//! batch gets a range index. This module is feature-gated and only compiled
//! when the `arrow` feature is enabled.

#[cfg(not(feature = "arrow"))]
compile_error!("arrow module requires 'arrow' feature to be enabled");

use std::sync::Arc;

use arrow_array::builder::{
    BinaryBuilder, BooleanBuilder, Date64Builder, Float32Builder, Float64Builder, Int32Builder,
    Int64Builder, StringBuilder,
};
use arrow_array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date64Array, Float32Array, Float64Array,
    Int32Array, Int64Array, RecordBatch, StringArray,
};
use arrow_schema::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema};

use crate::error::{Error, Result};
use crate::schema::DataType;
use crate::table::{DataFrame, Materialize, Table};
use crate::types::{Column, Scalar};

/// Convert a framecheck `DataType` to an Arrow `DataType`.
pub fn data_type_to_arrow(dt: DataType) -> Result<ArrowDataType> {
    Ok(match dt {
        DataType::Boolean => ArrowDataType::Boolean,
        DataType::Int32 => ArrowDataType::Int32,
        DataType::Int64 => ArrowDataType::Int64,
        DataType::Float32 => ArrowDataType::Float32,
        DataType::Float64 => ArrowDataType::Float64,
        DataType::Utf8 => ArrowDataType::Utf8,
        DataType::Binary => ArrowDataType::Binary,
        DataType::Date64 => ArrowDataType::Date64,
        DataType::Decimal128 => {
            return Err(Error::Schema("decimal columns have no columnar transfer".into()))
        }
    })
}

pub fn data_type_from_arrow(dt: &ArrowDataType) -> Result<DataType> {
    Ok(match dt {
        ArrowDataType::Boolean => DataType::Boolean,
        ArrowDataType::Int32 => DataType::Int32,
        ArrowDataType::Int64 => DataType::Int64,
        ArrowDataType::Float32 => DataType::Float32,
        ArrowDataType::Float64 => DataType::Float64,
        ArrowDataType::Utf8 => DataType::Utf8,
        ArrowDataType::Binary => DataType::Binary,
        ArrowDataType::Date64 => DataType::Date64,
        other => return Err(Error::Schema(format!("unsupported Arrow data type: {:?}", other))),
    })
}

/// Encode the frame's columns as a `RecordBatch` (index not included).
pub fn frame_to_record_batch(frame: &DataFrame) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(frame.columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(frame.columns.len());
    for column in &frame.columns {
        fields.push(ArrowField::new(
            column.name.clone(),
            data_type_to_arrow(column.data_type)?,
            true,
        ));
        arrays.push(column_to_arrow_array(column)?);
    }
    let schema = Arc::new(ArrowSchema::new(fields));
    if arrays.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    RecordBatch::try_new(schema, arrays)
        .map_err(|e| Error::Schema(format!("Failed to create RecordBatch: {}", e)))
}

/// Decode a `RecordBatch` into a frame with a range index.
pub fn record_batch_to_frame(batch: &RecordBatch) -> Result<DataFrame> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(batch.num_columns());
    for (i, field) in schema.fields().iter().enumerate() {
        columns.push(arrow_array_to_column(batch.column(i), field.name())?);
    }
    DataFrame::new(columns)
}

macro_rules! build_array {
    ($builder:ty, $column:expr, $variant:path) => {{
        let mut builder = <$builder>::new();
        for scalar in &$column.values {
            match scalar {
                s if s.is_null() => builder.append_null(),
                $variant(v) => builder.append_value(v.clone()),
                other => {
                    return Err(Error::Schema(format!(
                        "Type mismatch in column '{}': expected {}, got {:?}",
                        $column.name, $column.data_type, other
                    )))
                }
            }
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

fn column_to_arrow_array(column: &Column) -> Result<ArrayRef> {
    Ok(match column.data_type {
        DataType::Boolean => build_array!(BooleanBuilder, column, Scalar::Bool),
        DataType::Int32 => build_array!(Int32Builder, column, Scalar::I32),
        DataType::Int64 => build_array!(Int64Builder, column, Scalar::I64),
        DataType::Date64 => build_array!(Date64Builder, column, Scalar::I64),
        DataType::Float32 => build_array!(Float32Builder, column, Scalar::F32),
        DataType::Float64 => build_array!(Float64Builder, column, Scalar::F64),
        DataType::Utf8 => build_array!(StringBuilder, column, Scalar::Str),
        DataType::Binary => build_array!(BinaryBuilder, column, Scalar::Bin),
        DataType::Decimal128 => {
            return Err(Error::Schema("decimal columns have no columnar transfer".into()))
        }
    })
}

macro_rules! read_array {
    ($array:expr, $ty:ty, $wrap:expr) => {{
        let arr = $array
            .as_any()
            .downcast_ref::<$ty>()
            .ok_or_else(|| Error::Schema("Failed to downcast Arrow array".into()))?;
        (0..arr.len())
            .map(|i| if arr.is_null(i) { Scalar::Null } else { $wrap(arr.value(i)) })
            .collect::<Vec<Scalar>>()
    }};
}

fn arrow_array_to_column(array: &ArrayRef, name: &str) -> Result<Column> {
    let data_type = data_type_from_arrow(array.data_type())?;
    let values = match data_type {
        DataType::Boolean => read_array!(array, BooleanArray, Scalar::Bool),
        DataType::Int32 => read_array!(array, Int32Array, Scalar::I32),
        DataType::Int64 => read_array!(array, Int64Array, Scalar::I64),
        DataType::Date64 => read_array!(array, Date64Array, Scalar::I64),
        DataType::Float32 => read_array!(array, Float32Array, Scalar::F32),
        DataType::Float64 => read_array!(array, Float64Array, Scalar::F64),
        DataType::Utf8 => read_array!(array, StringArray, |v: &str| Scalar::Str(v.to_string())),
        DataType::Binary => read_array!(array, BinaryArray, |v: &[u8]| Scalar::Bin(v.to_vec())),
        DataType::Decimal128 => {
            return Err(Error::Schema("decimal columns have no columnar transfer".into()))
        }
    };
    Ok(Column::new(name, data_type, values))
}

/// A columnar batch that materializes into a frame.
#[derive(Debug, Clone)]
pub struct ArrowTable(pub RecordBatch);

impl Materialize for ArrowTable {
    fn to_local_table(&self) -> Result<Table> {
        Ok(Table::Frame(record_batch_to_frame(&self.0)?))
    }
}
