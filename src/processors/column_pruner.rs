use crate::error::Result;
use crate::models::schema::{UNINFORMATIVE_COLUMNS, UNUSED_COLUMNS};
use crate::models::Table;
use tracing::debug;

/// Drops the fixed lists of uninformative and unused columns.
///
/// Every listed column must be present: a missing one means the source
/// schema has drifted.
pub struct ColumnPruner {
    uninformative: Vec<String>,
    unused: Vec<String>,
}

impl ColumnPruner {
    pub fn new() -> Self {
        Self {
            uninformative: UNINFORMATIVE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            unused: UNUSED_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_columns(uninformative: &[&str], unused: &[&str]) -> Self {
        Self {
            uninformative: uninformative.iter().map(|s| s.to_string()).collect(),
            unused: unused.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the number of columns removed.
    pub fn prune(&self, table: &mut Table) -> Result<usize> {
        let names: Vec<&str> = self
            .uninformative
            .iter()
            .chain(&self.unused)
            .map(String::as_str)
            .collect();

        let before = table.width();
        table.drop_columns(&names)?;
        let removed = before - table.width();

        debug!("Pruned {} columns, {} remain", removed, table.width());
        Ok(removed)
    }
}

impl Default for ColumnPruner {
    fn default() -> Self {
        Self::new()
    }
}
