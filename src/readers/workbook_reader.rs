use crate::error::{ProcessingError, Result};
use crate::models::schema::{ColumnSpec, SOURCE_SCHEMA};
use crate::models::{Column, ColumnKind, Table, Value};
use crate::utils::constants::{DATETIME_FORMATS, DATE_FORMATS};
use crate::utils::encoding::decode_text;
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info, warn};

/// A table read against the declared schema.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    /// Cells that could not be read as their declared type and became null.
    pub coercion_failures: usize,
}

/// Reads the source sheet (or a CSV export of it) into a typed [`Table`].
///
/// Column names come from the header row; column types come positionally
/// from the declared schema.
pub struct SourceReader {
    schema: &'static [ColumnSpec],
}

impl SourceReader {
    pub fn new() -> Self {
        Self {
            schema: SOURCE_SCHEMA,
        }
    }

    pub fn with_schema(schema: &'static [ColumnSpec]) -> Self {
        Self { schema }
    }

    /// Read `path`; `.csv` files are read as text, everything else as a workbook.
    pub fn read(&self, path: &Path, sheet: &str) -> Result<LoadedTable> {
        if is_csv(path) {
            self.read_csv(path)
        } else {
            self.read_workbook(path, sheet)
        }
    }

    pub fn read_workbook(&self, path: &Path, sheet: &str) -> Result<LoadedTable> {
        let range = read_sheet_range(path, Some(sheet))?;
        let loaded = self.table_from_range(&range)?;
        info!(
            "Loaded {} rows x {} columns from sheet '{}'",
            loaded.table.len(),
            loaded.table.width(),
            sheet
        );
        Ok(loaded)
    }

    pub fn read_csv(&self, path: &Path) -> Result<LoadedTable> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes);
        let loaded = self.table_from_csv(&text)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            loaded.table.len(),
            loaded.table.width(),
            path.display()
        );
        Ok(loaded)
    }

    /// Build the table from a worksheet range whose first row is the header.
    pub fn table_from_range(&self, range: &Range<Data>) -> Result<LoadedTable> {
        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| ProcessingError::InvalidFormat("Sheet has no header row".to_string()))?
            .iter()
            .map(|cell| match cell {
                Data::String(s) => s.trim().to_string(),
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect();

        let mut builder = self.builder(header)?;
        for row in rows {
            builder.push_row(|index, kind| {
                row.get(index)
                    .map_or(Some(Value::Null), |cell| convert_cell(cell, kind))
            })?;
        }
        Ok(builder.finish())
    }

    /// Build the table from CSV text whose first record is the header.
    pub fn table_from_csv(&self, text: &str) -> Result<LoadedTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let header: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut builder = self.builder(header)?;

        for record in reader.records() {
            let record = record?;
            builder.push_row(|index, kind| {
                record
                    .get(index)
                    .map_or(Some(Value::Null), |field| convert_text(field, kind))
            })?;
        }
        Ok(builder.finish())
    }

    fn builder(&self, mut header: Vec<String>) -> Result<TableBuilder> {
        while header.last().is_some_and(|h| h.is_empty()) {
            header.pop();
        }

        if header.len() != self.schema.len() {
            return Err(ProcessingError::SchemaMismatch {
                expected: self.schema.len(),
                found: header.len(),
            });
        }

        for (name, spec) in header.iter().zip(self.schema) {
            if name != spec.name {
                debug!("Header '{}' in position of declared column '{}'", name, spec.name);
            }
        }

        let columns = header
            .into_iter()
            .zip(self.schema)
            .map(|(name, spec)| Column::new(name, spec.kind))
            .collect();

        Ok(TableBuilder {
            table: Table::new(columns),
            coercion_failures: 0,
        })
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}

struct TableBuilder {
    table: Table,
    coercion_failures: usize,
}

impl TableBuilder {
    /// `cell(index, kind)` yields `None` when the raw cell cannot be coerced.
    fn push_row<F>(&mut self, mut cell: F) -> Result<()>
    where
        F: FnMut(usize, ColumnKind) -> Option<Value>,
    {
        let kinds: Vec<ColumnKind> = self.table.columns().iter().map(|c| c.kind).collect();
        let row: Vec<Value> = kinds
            .into_iter()
            .enumerate()
            .map(|(index, kind)| {
                cell(index, kind).unwrap_or_else(|| {
                    self.coercion_failures += 1;
                    Value::Null
                })
            })
            .collect();

        // Blank lines in the sheet
        if row.iter().all(Value::is_null) {
            return Ok(());
        }
        self.table.push_row(row)
    }

    fn finish(self) -> LoadedTable {
        if self.coercion_failures > 0 {
            warn!(
                "{} cells could not be read as their declared type and were set to null",
                self.coercion_failures
            );
        }
        LoadedTable {
            table: self.table,
            coercion_failures: self.coercion_failures,
        }
    }
}

/// Open a workbook and return the named sheet, or the first sheet when `sheet`
/// is `None`.
pub fn read_sheet_range(path: &Path, sheet: Option<&str>) -> Result<Range<Data>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let sheet = match sheet {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(ProcessingError::SheetNotFound {
                sheet: name.to_string(),
                path: path.display().to_string(),
                available: sheet_names.join(", "),
            })
        }
        None => sheet_names.first().cloned().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("{} has no sheets", path.display()))
        })?,
    };

    debug!("Reading sheet '{}' from {}", sheet, path.display());
    Ok(workbook.worksheet_range(&sheet)?)
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Coerce a workbook cell to the declared column type.
pub fn convert_cell(cell: &Data, kind: ColumnKind) -> Option<Value> {
    match (kind, cell) {
        (_, Data::Empty) => Some(Value::Null),
        (_, Data::Error(_)) => None,
        (_, Data::String(s)) => convert_text(s, kind),

        (ColumnKind::Numeric, Data::Float(f)) => Some(Value::Number(*f)),
        (ColumnKind::Numeric, Data::Int(i)) => Some(Value::Number(*i as f64)),
        (ColumnKind::Numeric, _) => None,

        (ColumnKind::Date, Data::DateTimeIso(s)) => convert_text(s, kind),
        (ColumnKind::Date, _) => cell.as_date().map(Value::Date),

        (ColumnKind::Text, Data::Float(f)) => Some(Value::Text(format_number(*f))),
        (ColumnKind::Text, Data::Int(i)) => Some(Value::Text(i.to_string())),
        (ColumnKind::Text, Data::Bool(b)) => Some(Value::Text(b.to_string().to_uppercase())),
        (ColumnKind::Text, Data::DateTime(_)) => cell
            .as_date()
            .map(|d| Value::Text(d.format("%Y-%m-%d").to_string())),
        (ColumnKind::Text, other) => Some(Value::Text(other.to_string())),
    }
}

/// Coerce a text field to the declared column type. Blank text is null.
pub fn convert_text(raw: &str, kind: ColumnKind) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Value::Null);
    }

    match kind {
        ColumnKind::Text => Some(Value::Text(trimmed.to_string())),
        ColumnKind::Numeric => trimmed.replace(',', "").parse::<f64>().ok().map(Value::Number),
        ColumnKind::Date => parse_date(trimmed).map(Value::Date),
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Integral numbers read from a text column lose the trailing ".0".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
