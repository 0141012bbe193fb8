use crate::error::{ProcessingError, Result};
use crate::models::catalog;
use crate::models::Table;
use tracing::debug;

/// Renames columns to the lowercase output schema.
pub struct Renamer;

impl Renamer {
    /// Every column must have a catalogue entry.
    pub fn apply(table: &mut Table) -> Result<()> {
        let renames = table
            .column_names()
            .into_iter()
            .map(|source| {
                catalog::by_source(source)
                    .map(|entry| (source.to_string(), entry.name))
                    .ok_or_else(|| {
                        ProcessingError::MetadataMismatch(format!(
                            "no output name for column '{}'",
                            source
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for (source, name) in renames {
            if source != name {
                table.rename_column(&source, name)?;
            }
        }
        debug!("Renamed {} columns", table.width());
        Ok(())
    }
}
