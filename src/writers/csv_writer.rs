use crate::error::Result;
use crate::models::{catalog, Table};
use std::fs::File;
use std::path::Path;
use tracing::info;

const METADATA_HEADER: [&str; 2] = ["column", "description"];

/// Writes the cleaned table and its column description table as CSV.
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write both files. The descriptions are checked against the table's
    /// columns before either file is created.
    pub fn export(&self, table: &Table, data_path: &Path, metadata_path: &Path) -> Result<()> {
        let descriptions = catalog::describe_columns(&table.column_names())?;

        self.write_table(table, data_path)?;
        self.write_rows(
            metadata_path,
            METADATA_HEADER,
            descriptions.iter().map(|(c, d)| [c.as_str(), d.as_str()]),
        )?;

        info!(
            "Wrote {} rows to {} and {} column descriptions to {}",
            table.len(),
            data_path.display(),
            descriptions.len(),
            metadata_path.display()
        );
        Ok(())
    }

    /// Nulls are written as empty fields, dates as `YYYY-MM-DD`.
    pub fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        self.write_rows(
            path,
            table.column_names(),
            table
                .rows()
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>()),
        )
    }

    fn write_rows<H, R, F>(&self, path: &Path, header: H, rows: R) -> Result<()>
    where
        H: IntoIterator,
        H::Item: AsRef<[u8]>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = F>,
        F: AsRef<[u8]>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(File::create(path)?);

        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
