use crate::error::{ProcessingError, Result};
use crate::models::{ColumnKind, Table, Value};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the table as one record batch; every column is nullable.
    pub fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let schema = Self::create_schema(table);
        let batch = Self::table_to_batch(table, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }

    fn create_schema(table: &Table) -> Arc<Schema> {
        let fields: Vec<Field> = table
            .columns()
            .iter()
            .map(|column| {
                let data_type = match column.kind {
                    ColumnKind::Numeric => DataType::Float64,
                    ColumnKind::Text => DataType::Utf8,
                    ColumnKind::Date => DataType::Date32,
                };
                Field::new(column.name.as_str(), data_type, true)
            })
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn table_to_batch(table: &Table, schema: Arc<Schema>) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let cells = table.rows().iter().map(|row| &row[index]);
                let array: ArrayRef = match column.kind {
                    ColumnKind::Numeric => {
                        Arc::new(cells.map(Value::as_f64).collect::<Float64Array>())
                    }
                    ColumnKind::Date => Arc::new(
                        cells
                            .map(|v| v.as_date().map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
                            .collect::<Date32Array>(),
                    ),
                    ColumnKind::Text => Arc::new(
                        cells
                            .map(|v| (!v.is_null()).then(|| v.to_string()))
                            .collect::<StringArray>(),
                    ),
                };
                array
            })
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;
    use arrow::array::Array;
    use chrono::NaiveDate;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    fn table() -> Table {
        Table::with_rows(
            vec![
                Column::new("code", ColumnKind::Text),
                Column::new("sample_date", ColumnKind::Date),
                Column::new("conc_ugg", ColumnKind::Numeric),
            ],
            vec![
                vec![
                    Value::text("PRV_MUS_2009_1"),
                    Value::Date(NaiveDate::from_ymd_opt(2009, 8, 14).unwrap()),
                    Value::Number(0.005),
                ],
                vec![Value::Null, Value::Null, Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_table() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_table(&table(), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 2);

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(temp_file.path())?)?;
        let schema = builder.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Date32);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);

        let batch = builder.build()?.next().unwrap()?;
        let dates = batch
            .column(1)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        // 2009-08-14 is 14470 days after the epoch
        assert_eq!(dates.value(0), 14470);
        assert!(dates.is_null(1));
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_table(&table(), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }
        Ok(())
    }

    #[test]
    fn test_row_group_size_splits_rows() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(1);
        let temp_file = NamedTempFile::new()?;

        writer.write_table(&table(), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.row_groups, 2);
        assert_eq!(info.row_group_sizes, vec![1, 1]);
        Ok(())
    }

    #[test]
    fn test_unknown_compression() {
        assert!(ParquetWriter::new().with_compression("brotli9").is_err());
    }
}
