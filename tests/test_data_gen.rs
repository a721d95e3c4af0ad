//! Test data generation utilities for the framecheck test suite
#![allow(dead_code)]

use framecheck_core::schema::{DataType, Field, Schema};
use framecheck_core::table::{DataFrame, Index, Level};
use framecheck_core::types::{Column, Scalar};
use framecheck_harness::warnings::{warn, WarningCategory};

/// Generate a frame matching the given schema with deterministic values
pub fn generate_frame(rows: usize, schema: &Schema) -> DataFrame {
    let columns = schema
        .fields
        .iter()
        .map(|field| {
            let values = (0..rows)
                .map(|i| match field.data_type {
                    DataType::Boolean => Scalar::Bool(i % 2 == 0),
                    DataType::Int32 => Scalar::I32((i % 1000) as i32),
                    DataType::Int64 => Scalar::I64(i as i64),
                    DataType::Float32 => Scalar::F32((i as f32) * 0.5),
                    DataType::Float64 => Scalar::F64((i as f64) * 0.5),
                    DataType::Utf8 => Scalar::Str(format!("value_{}", i % 100)),
                    DataType::Binary => Scalar::Bin(vec![i as u8; 4]),
                    DataType::Date64 => Scalar::I64((i as i64) * 86_400_000),
                    DataType::Decimal128 => Scalar::I64(i as i64),
                })
                .collect();
            Column::new(field.name.clone(), field.data_type, values)
        })
        .collect();
    DataFrame::new(columns).expect("generated columns have equal length")
}

/// A small mixed-type schema used across tests
pub fn mixed_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("score", DataType::Float64, true),
        Field::new("name", DataType::Utf8, true),
        Field::new("flag", DataType::Boolean, false),
    ])
}

/// Float column `x` with every `null_every`-th row null
pub fn generate_frame_with_nulls(rows: usize, null_every: usize) -> DataFrame {
    let values: Vec<Scalar> = (0..rows)
        .map(|i| {
            if null_every > 0 && i % null_every == 0 {
                Scalar::Null
            } else {
                Scalar::F64(i as f64 / 3.0)
            }
        })
        .collect();
    DataFrame::new(vec![Column::new("x", DataType::Float64, values)])
        .expect("single column frame")
}

/// Copy of `frame` with `delta` added to every float cell
pub fn perturb_floats(frame: &DataFrame, delta: f64) -> DataFrame {
    let mut out = frame.clone();
    for column in &mut out.columns {
        for value in &mut column.values {
            if let Scalar::F64(v) = value {
                *v += delta;
            }
        }
    }
    out
}

/// Two-level (`group`, `n`) index of `rows` rows
pub fn generate_multi_index(rows: usize) -> Index {
    let groups: Vec<String> = (0..rows).map(|i| format!("g{}", i % 3)).collect();
    let ns: Vec<i64> = (0..rows as i64).collect();
    Index::multi(vec![
        Level::new(Some("group"), groups),
        Level::new(Some("n"), ns),
    ])
    .expect("levels have equal length")
}

/// Raise a warning attributed to this file rather than the caller's
pub fn legacy_helper() {
    warn(WarningCategory::FutureWarning, "legacy_helper will be removed");
}
