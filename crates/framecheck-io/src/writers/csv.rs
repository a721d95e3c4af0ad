//! CSV writer from `DataFrame`.
//!
//! Writes the header then one record per row; nulls become empty cells and
//! the row index is not written.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv as csv_crate;
use framecheck_core::table::DataFrame;
use framecheck_core::types::Scalar;

use crate::error::Result;

pub struct CsvWriter<W: Write> {
    wtr: csv_crate::Writer<W>,
}

impl CsvWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            wtr: csv_crate::Writer::from_writer(writer),
        }
    }

    pub fn write_frame(&mut self, frame: &DataFrame) -> Result<()> {
        self.wtr.write_record(frame.column_names())?;
        for row in 0..frame.num_rows() {
            let record: Vec<String> = frame
                .columns
                .iter()
                .map(|c| match &c.values[row] {
                    v if v.is_null() => String::new(),
                    Scalar::Bin(b) => String::from_utf8_lossy(b).into_owned(),
                    Scalar::Bool(b) => b.to_string(),
                    other => other.to_string(),
                })
                .collect();
            self.wtr.write_record(&record)?;
        }
        self.wtr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}
