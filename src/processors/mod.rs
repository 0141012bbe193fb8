pub mod column_pruner;
pub mod deduplicator;
pub mod enricher;
pub mod exception_filter;
pub mod identifier;
pub mod integrity_checker;
pub mod pipeline;
pub mod renamer;
pub mod report;
pub mod unit_normalizer;

pub use column_pruner::ColumnPruner;
pub use deduplicator::Deduplicator;
pub use enricher::{EnrichmentSummary, ReferenceEnricher};
pub use exception_filter::{ExceptionFilter, ExclusionOutcome, FilterSummary};
pub use identifier::{IdentifierSummary, IdentifierSynthesizer};
pub use integrity_checker::{CodeViolation, IntegrityChecker, IntegrityReport, ViolationType};
pub use pipeline::CleaningPipeline;
pub use renamer::Renamer;
pub use report::CleaningReport;
pub use unit_normalizer::{UnitNormalizer, UnitSummary};
