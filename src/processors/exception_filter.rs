use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{ExclusionKind, ExclusionRule, RecordKey, Table, Value};
use crate::processors::deduplicator::{compared_columns, project, Deduplicator};
use crate::utils::constants::{COL_PARAMETER, COL_SAMPLE_CODE, COL_TEST_METHOD, COL_WEIGHT_BASIS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Rows removed by one listed exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionOutcome {
    pub kind: ExclusionKind,
    pub record: String,
    pub reason: String,
    pub removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub record_exclusions_removed: usize,
    pub context_free_duplicates_removed: usize,
    pub lab_duplicates_removed: usize,
    pub weight_basis_removed: usize,
    pub outcomes: Vec<ExclusionOutcome>,
}

impl FilterSummary {
    pub fn total_removed(&self) -> usize {
        self.record_exclusions_removed
            + self.context_free_duplicates_removed
            + self.lab_duplicates_removed
            + self.weight_basis_removed
    }

    /// Listed exclusions that no longer match anything in the input.
    pub fn unmatched(&self) -> impl Iterator<Item = &ExclusionOutcome> {
        self.outcomes.iter().filter(|o| o.removed == 0)
    }
}

/// Resolves known data-quality exceptions, in order:
///
/// 1. listed record exclusions,
/// 2. duplicates among context-free parameters (moisture, lipids),
/// 3. rows differing only in the analysing lab,
/// 4. listed weight-basis exclusions.
pub struct ExceptionFilter {
    exclusions: Vec<ExclusionRule>,
    context_free_parameters: Vec<String>,
    context_columns: Vec<String>,
    lab_column: String,
}

impl ExceptionFilter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            exclusions: config.exclusions.clone(),
            context_free_parameters: config.context_free_parameters.clone(),
            context_columns: config.context_columns.clone(),
            lab_column: config.lab_column.clone(),
        }
    }

    pub fn apply(&self, table: &mut Table) -> Result<FilterSummary> {
        let mut summary = FilterSummary::default();

        let outcomes = self.remove_listed(table, ExclusionKind::Record)?;
        summary.record_exclusions_removed = outcomes.iter().map(|o| o.removed).sum();
        summary.outcomes.extend(outcomes);

        summary.context_free_duplicates_removed = self.collapse_context_free(table)?;

        summary.lab_duplicates_removed =
            Deduplicator::dedup_ignoring(table, &[self.lab_column.as_str()])?;
        debug!(
            "Removed {} rows differing only in {}",
            summary.lab_duplicates_removed, self.lab_column
        );

        let outcomes = self.remove_listed(table, ExclusionKind::WeightBasis)?;
        summary.weight_basis_removed = outcomes.iter().map(|o| o.removed).sum();
        summary.outcomes.extend(outcomes);

        for outcome in summary.unmatched() {
            warn!(
                "Exclusion {} ({}) matched no rows",
                outcome.record, outcome.reason
            );
        }
        info!("Exception filter removed {} rows", summary.total_removed());

        Ok(summary)
    }

    /// Remove rows matching listed exclusions of `kind`. A row is counted
    /// against the first rule it matches.
    fn remove_listed(&self, table: &mut Table, kind: ExclusionKind) -> Result<Vec<ExclusionOutcome>> {
        let rules: Vec<&ExclusionRule> = self.exclusions.iter().filter(|r| r.kind == kind).collect();
        let mut removed = vec![0usize; rules.len()];
        if rules.is_empty() {
            return Ok(Vec::new());
        }

        let code = table.column_index(COL_SAMPLE_CODE)?;
        let parameter = table.column_index(COL_PARAMETER)?;
        let method = table.column_index(COL_TEST_METHOD)?;
        let basis = table.column_index(COL_WEIGHT_BASIS)?;

        table.retain_rows(|_, row| {
            let key = RecordKey {
                sample_code: row[code].as_str(),
                parameter: row[parameter].as_str(),
                test_method: row[method].as_str(),
                weight_basis: row[basis].as_str(),
            };
            match rules.iter().position(|rule| rule.matches(&key)) {
                Some(hit) => {
                    removed[hit] += 1;
                    false
                }
                None => true,
            }
        });

        Ok(rules
            .iter()
            .zip(removed)
            .map(|(rule, removed)| {
                debug!("Exclusion {} removed {} rows", rule.describe(), removed);
                ExclusionOutcome {
                    kind,
                    record: rule.describe(),
                    reason: rule.reason.clone(),
                    removed,
                }
            })
            .collect())
    }

    /// Context-free parameter rows share grouping key 0, all other rows get
    /// their own position as key; rows are then deduplicated on that key plus
    /// every non-context column, so only context-free rows can collapse.
    fn collapse_context_free(&self, table: &mut Table) -> Result<usize> {
        let parameter = table.column_index(COL_PARAMETER)?;
        let ignored: Vec<&str> = self.context_columns.iter().map(String::as_str).collect();
        let compared = compared_columns(table, &ignored)?;

        let keep = Deduplicator::dedup_by_key(table.rows(), |index, row| {
            let group = match &row[parameter] {
                Value::Text(p) if self.is_context_free(p) => 0,
                _ => index + 1,
            };
            (group, project(row, &compared))
        });

        let removed = table.retain_rows(|index, _| keep[index]);
        debug!("Collapsed {} context-free parameter duplicates", removed);
        Ok(removed)
    }

    fn is_context_free(&self, parameter: &str) -> bool {
        self.context_free_parameters.iter().any(|p| p == parameter)
    }
}
