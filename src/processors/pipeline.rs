use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{catalog, SiteMetadata, Table};
use crate::processors::{
    CleaningReport, ColumnPruner, Deduplicator, ExceptionFilter, IdentifierSynthesizer,
    IntegrityChecker, ReferenceEnricher, Renamer, UnitNormalizer,
};
use crate::readers::{LoadedTable, ParameterClasses, SourceReader};
use crate::utils::progress::ProgressReporter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs the cleaning stages in order over one loaded table.
pub struct CleaningPipeline {
    config: PipelineConfig,
    enricher: ReferenceEnricher,
}

impl CleaningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            enricher: ReferenceEnricher::new(),
        }
    }

    pub fn with_parameter_classes(mut self, classes: ParameterClasses) -> Self {
        self.enricher = self.enricher.with_parameter_classes(classes);
        self
    }

    pub fn with_sites(mut self, sites: HashMap<String, SiteMetadata>) -> Self {
        self.enricher = self.enricher.with_sites(sites);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the configured sheet on the blocking pool.
    pub async fn load(&self, input: &Path) -> Result<LoadedTable> {
        let input: PathBuf = input.to_path_buf();
        let sheet = self.config.sheet_name.clone();
        tokio::task::spawn_blocking(move || SourceReader::new().read(&input, &sheet)).await?
    }

    /// Load and clean `input`, reporting stage progress on `progress`.
    pub async fn run(
        &self,
        input: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Table, CleaningReport)> {
        if let Some(p) = progress {
            p.set_message("Reading source sheet...");
        }
        let loaded = self.load(input).await?;

        if let Some(p) = progress {
            p.set_message("Cleaning...");
        }
        self.clean(loaded)
    }

    pub fn clean(&self, loaded: LoadedTable) -> Result<(Table, CleaningReport)> {
        let LoadedTable {
            mut table,
            coercion_failures,
        } = loaded;
        let mut report = CleaningReport {
            loaded_rows: table.len(),
            coercion_failures,
            ..Default::default()
        };

        report.duplicates_removed = Deduplicator::dedup(&mut table);
        report.columns_pruned = ColumnPruner::new().prune(&mut table)?;
        report.identifiers = IdentifierSynthesizer::apply(&mut table)?;
        report.exceptions = ExceptionFilter::new(&self.config).apply(&mut table)?;
        report.units = UnitNormalizer::new(&self.config.units)
            .with_strict(self.config.strict_units)
            .apply(&mut table)?;
        report.enrichment = self.enricher.apply(&mut table)?;
        report.integrity = IntegrityChecker::check(&table)?;

        Renamer::apply(&mut table)?;
        catalog::describe_columns(&table.column_names())?;

        report.output_rows = table.len();
        report.output_columns = table.column_names().iter().map(|c| c.to_string()).collect();

        info!(
            "Cleaned {} rows down to {} rows x {} columns",
            report.loaded_rows,
            report.output_rows,
            report.output_columns.len()
        );
        Ok((table, report))
    }
}
