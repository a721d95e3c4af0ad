//! `FileSource`: a file on disk that materializes into a frame on demand.

use std::path::{Path, PathBuf};

use framecheck_core::error::Result as CoreResult;
use framecheck_core::schema::Schema;
use framecheck_core::table::{DataFrame, Materialize, Table};

use crate::error::{Error, Result};
use crate::readers::csv::CsvReader;
use crate::readers::jsonl::JsonlReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Jsonl,
}

impl FileFormat {
    /// Guess the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(FileFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(FileFormat::Jsonl),
            other => Err(Error::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
    schema: Option<Schema>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
            schema: None,
        }
    }

    /// Format inferred from the extension.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self::new(path, format))
    }

    /// Headerless CSV read with an explicit schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<DataFrame> {
        tracing::debug!(path = %self.path.display(), format = ?self.format, "materializing file source");
        match (self.format, &self.schema) {
            (FileFormat::Csv, None) => CsvReader::from_path(&self.path)?.read_frame(),
            (FileFormat::Csv, Some(schema)) => {
                let file = std::fs::File::open(&self.path)?;
                CsvReader::from_reader_with_schema(file, schema.clone())?.read_frame()
            }
            (FileFormat::Jsonl, _) => JsonlReader::from_path(&self.path)?.read_frame(),
        }
    }
}

impl Materialize for FileSource {
    fn to_local_table(&self) -> CoreResult<Table> {
        let frame = self.read().map_err(|e| {
            framecheck_core::error::Error::from(e)
                .with_context(format!("reading {}", self.path.display()))
        })?;
        Ok(Table::Frame(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.csv")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.ndjson")).unwrap(), FileFormat::Jsonl);
        assert!(FileFormat::from_path(Path::new("a.parquet")).is_err());
    }

    #[test]
    fn missing_file_fails_to_materialize() {
        let source = FileSource::new("/nonexistent/framecheck.csv", FileFormat::Csv);
        let err = source.to_local_table().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/framecheck.csv"));
    }
}
