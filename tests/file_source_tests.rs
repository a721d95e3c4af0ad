//! File-backed tables materialized and compared through the engine

mod test_data_gen;

use std::fs;

use framecheck_assert::{equals, is_equal, CompareOptions, Value};
use framecheck_core::schema::{DataType, Field, Schema};
use framecheck_core::table::{DataFrame, Materialize, Table};
use framecheck_core::types::{Column, Scalar};
use framecheck_io::writers::csv::CsvWriter;
use framecheck_io::{FileFormat, FileSource};
use test_data_gen::{generate_frame, mixed_schema};

#[test]
fn test_csv_round_trip_matches_generated_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.csv");
    let frame = generate_frame(20, &mixed_schema());

    let mut writer = CsvWriter::to_path(&path).unwrap();
    writer.write_frame(&frame).unwrap();
    drop(writer);

    let source = FileSource::open(&path).unwrap();
    assert!(is_equal(
        &Value::deferred(source),
        &Value::from(frame),
        CompareOptions::almost()
    ));
}

#[test]
fn test_jsonl_columns_are_sorted_by_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.jsonl");
    fs::write(&path, "{\"b\": 1, \"a\": \"x\"}\n\n{\"b\": 2.5, \"a\": null}\n").unwrap();

    let frame = FileSource::open(&path).unwrap().read().unwrap();
    let names: Vec<&str> = frame.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(frame.columns[1].data_type, DataType::Float64);

    let expected = DataFrame::new(vec![
        Column::new("a", DataType::Utf8, vec![Scalar::from("x"), Scalar::Null]),
        Column::from_values("b", vec![1.0f64, 2.5]),
    ])
    .unwrap();
    assert!(is_equal(&frame.into(), &expected.into(), CompareOptions::exact()));
}

#[test]
fn test_headerless_csv_with_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.csv");
    fs::write(&path, "1,one\n2,two\n").unwrap();

    let schema = Schema::new(vec![
        Field::new("n", DataType::Int64, false),
        Field::new("word", DataType::Utf8, true),
    ]);
    let source = FileSource::new(&path, FileFormat::Csv).with_schema(schema);
    let table = source.to_local_table().unwrap();
    match table {
        Table::Frame(frame) => {
            assert_eq!(frame.num_rows(), 2);
            assert_eq!(frame.columns[0].values, vec![Scalar::I64(1), Scalar::I64(2)]);
        }
        other => panic!("expected a frame, got {}", other.kind_name()),
    }
}

#[test]
fn test_missing_file_is_a_materialize_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::open(dir.path().join("absent.csv")).unwrap();
    let err = equals(
        &Value::deferred(source),
        &Value::from(generate_frame(1, &mixed_schema())),
        CompareOptions::exact(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}
