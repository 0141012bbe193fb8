use crate::error::{ProcessingError, Result};
use crate::models::value::{ColumnKind, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Row-major in-memory table. Every row has exactly one value per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, name: &str) -> Result<&Value> {
        let col = self.column_index(name)?;
        self.rows
            .get(row)
            .map(|r| &r[col])
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Row {} out of range", row)))
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let col = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ProcessingError::SchemaMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keep rows for which `keep(index, row)` is true. Returns the number removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(usize, &[Value]) -> bool,
    {
        let before = self.rows.len();
        let mut index = 0;
        self.rows.retain(|row| {
            let result = keep(index, row);
            index += 1;
            result
        });
        before - self.rows.len()
    }

    /// Remove the named columns. Every name must exist.
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<()> {
        let mut indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;
        indices.sort_unstable();
        indices.dedup();

        for &index in indices.iter().rev() {
            self.columns.remove(index);
            for row in &mut self.rows {
                row.remove(index);
            }
        }
        Ok(())
    }

    /// Append a column; `values` must have one entry per row.
    pub fn add_column(&mut self, column: Column, values: Vec<Value>) -> Result<()> {
        let index = self.columns.len();
        self.insert_column(index, column, values)
    }

    pub fn insert_column(&mut self, index: usize, column: Column, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values for {} rows",
                column.name,
                values.len(),
                self.rows.len()
            )));
        }
        if self.has_column(&column.name) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' already exists",
                column.name
            )));
        }

        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(index, value);
        }
        Ok(())
    }

    /// Overwrite every value of an existing column.
    pub fn replace_column_values(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        let col = self.column_index(name)?;
        if values.len() != self.rows.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
        Ok(())
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let col = self.column_index(from)?;
        self.columns[col].name = to.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::with_rows(
            vec![
                Column::new("A", ColumnKind::Text),
                Column::new("B", ColumnKind::Numeric),
                Column::new("C", ColumnKind::Text),
            ],
            vec![
                vec![Value::text("x"), Value::Number(1.0), Value::text("p")],
                vec![Value::text("y"), Value::Number(2.0), Value::text("q")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = sample_table();
        let result = table.push_row(vec![Value::Null]);

        assert!(matches!(
            result,
            Err(ProcessingError::SchemaMismatch {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_drop_columns() {
        let mut table = sample_table();
        table.drop_columns(&["C", "A"]).unwrap();

        assert_eq!(table.column_names(), vec!["B"]);
        assert_eq!(table.rows()[1], vec![Value::Number(2.0)]);
    }

    #[test]
    fn test_drop_missing_column_is_error() {
        let mut table = sample_table();
        let result = table.drop_columns(&["A", "Z"]);

        assert!(matches!(result, Err(ProcessingError::MissingColumn(name)) if name == "Z"));
        // Nothing removed on failure
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_insert_and_rename_column() {
        let mut table = sample_table();
        table
            .insert_column(
                1,
                Column::new("NEW", ColumnKind::Numeric),
                vec![Value::Number(9.0), Value::Null],
            )
            .unwrap();
        table.rename_column("NEW", "new").unwrap();

        assert_eq!(table.column_names(), vec!["A", "new", "B", "C"]);
        assert_eq!(table.value(0, "new").unwrap(), &Value::Number(9.0));
        assert!(table.value(1, "new").unwrap().is_null());
    }

    #[test]
    fn test_retain_rows_counts_removed() {
        let mut table = sample_table();
        let removed = table.retain_rows(|index, _| index != 0);

        assert_eq!(removed, 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][0], Value::text("y"));
    }
}
