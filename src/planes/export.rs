use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;

use super::PlaneTable;

/// Key of the Parquet footer entry recording the table's timezone
pub const KEY_TIMEZONE: &str = "czimeta:timezone";

/// Errors that can occur while exporting a plane table
#[derive(Debug, thiserror::Error)]
pub enum PlaneTableError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Output path has no recognised extension
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// File formats a plane table can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet, ZSTD compressed
    Parquet,
}

impl ExportFormat {
    /// Pick a format from the path extension (`.csv`, `.parquet`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "parquet" | "pq" => Some(ExportFormat::Parquet),
            _ => None,
        }
    }
}

impl PlaneTable {
    /// Write as CSV; timestamps are RFC 3339 strings, missing values empty
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), PlaneTableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.iter() {
            csv_writer.serialize(row)?;
        }
        if self.is_empty() {
            csv_writer.write_record(super::columns::ALL)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write as a single-row-group Parquet file
    pub fn write_parquet<W: Write + Send>(&self, writer: W) -> Result<(), PlaneTableError> {
        let batch = self.to_record_batch()?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .set_key_value_metadata(Some(vec![KeyValue {
                key: KEY_TIMEZONE.to_string(),
                value: Some(self.timezone().to_string()),
            }]))
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::new(self.schema()), Some(props))?;
        arrow_writer.write(&batch)?;
        arrow_writer.close()?;
        Ok(())
    }

    /// Write to `path` in the format its extension names
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<ExportFormat, PlaneTableError> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)
            .ok_or_else(|| PlaneTableError::UnsupportedFormat(path.display().to_string()))?;

        let file = File::create(path)?;
        match format {
            ExportFormat::Csv => self.write_csv(file)?,
            ExportFormat::Parquet => self.write_parquet(file)?,
        }
        log::info!("Wrote {} planes to {}", self.len(), path.display());
        Ok(format)
    }
}
