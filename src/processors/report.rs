use crate::error::Result;
use crate::processors::enricher::EnrichmentSummary;
use crate::processors::exception_filter::FilterSummary;
use crate::processors::identifier::IdentifierSummary;
use crate::processors::integrity_checker::{IntegrityChecker, IntegrityReport};
use crate::processors::unit_normalizer::UnitSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Everything a run did to the table, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub loaded_rows: usize,
    pub coercion_failures: usize,
    pub duplicates_removed: usize,
    pub columns_pruned: usize,
    pub identifiers: IdentifierSummary,
    pub exceptions: FilterSummary,
    pub units: UnitSummary,
    pub enrichment: EnrichmentSummary,
    pub integrity: IntegrityReport,
    pub output_rows: usize,
    pub output_columns: Vec<String>,
}

impl CleaningReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Rows Loaded: {}\n", self.loaded_rows));
        if self.coercion_failures > 0 {
            summary.push_str(&format!(
                "Cells Not Matching Declared Type: {}\n",
                self.coercion_failures
            ));
        }
        summary.push_str(&format!("Duplicate Rows Removed: {}\n", self.duplicates_removed));
        summary.push_str(&format!("Columns Pruned: {}\n", self.columns_pruned));
        summary.push_str(&format!(
            "Sample Codes: {} ({} undated rows)\n",
            self.identifiers.distinct_codes, self.identifiers.undated_rows
        ));

        summary.push_str("\nException Rules:\n");
        summary.push_str(&format!(
            "  Record exclusions: {}\n",
            self.exceptions.record_exclusions_removed
        ));
        summary.push_str(&format!(
            "  Context-free duplicates: {}\n",
            self.exceptions.context_free_duplicates_removed
        ));
        summary.push_str(&format!(
            "  Lab-only duplicates: {}\n",
            self.exceptions.lab_duplicates_removed
        ));
        summary.push_str(&format!(
            "  Weight-basis exclusions: {}\n",
            self.exceptions.weight_basis_removed
        ));
        for outcome in self.exceptions.unmatched() {
            summary.push_str(&format!("  Unmatched: {} ({})\n", outcome.record, outcome.reason));
        }

        summary.push_str(&format!(
            "\nUnit Conversion: {} rows converted, {} unmapped\n",
            self.units.converted_rows,
            self.units.unmapped_rows()
        ));
        for (label, rows) in &self.units.unmapped {
            summary.push_str(&format!("  {}: {} rows\n", label, rows));
        }

        if !self.enrichment.unclassified_parameters.is_empty() {
            summary.push_str(&format!(
                "\nParameters Without Class: {}\n",
                self.enrichment.unclassified_parameters.len()
            ));
        }
        if !self.enrichment.unknown_sites.is_empty() {
            summary.push_str(&format!(
                "Sites Without Metadata: {}\n",
                self.enrichment.unknown_sites.len()
            ));
        }

        summary.push_str(&format!(
            "\nOutput: {} rows x {} columns\n\n",
            self.output_rows,
            self.output_columns.len()
        ));
        summary.push_str(&IntegrityChecker::generate_summary(&self.integrity));

        summary
    }
}
