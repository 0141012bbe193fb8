use crate::error::Result;
use crate::models::Table;
use crate::utils::constants::{COL_SAMPLE_CODE, COL_SAMPLE_DATE, COL_SAMPLE_ID, COL_YEAR};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub duplicate_records: usize,
    pub distinct_codes: usize,
    pub violations: Vec<CodeViolation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_records == 0 && self.violations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeViolation {
    pub violation_type: ViolationType,
    pub subject: String,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    /// One sample code covers more than one (sample id, year, date).
    SharedCode,
    /// Distinct dates of one (sample id, year) ended up with fewer codes.
    CollapsedDates,
}

/// Triple a sample code is expected to identify.
type SampleKey = (String, Option<i64>, String);

/// Checks the cleaned table against the row and sample-code invariants.
/// Works on source column names, before the rename.
pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn check(table: &Table) -> Result<IntegrityReport> {
        let code = table.column_index(COL_SAMPLE_CODE)?;
        let id = table.column_index(COL_SAMPLE_ID)?;
        let year = table.column_index(COL_YEAR)?;
        let date = table.column_index(COL_SAMPLE_DATE)?;

        let mut seen = HashSet::with_capacity(table.len());
        let duplicate_records = table
            .rows()
            .iter()
            .filter(|row| !seen.insert(row.as_slice()))
            .count();

        let mut samples_by_code: BTreeMap<&str, BTreeSet<SampleKey>> = BTreeMap::new();
        let mut groups: BTreeMap<(String, Option<i64>), (BTreeSet<String>, BTreeSet<&str>)> =
            BTreeMap::new();

        for row in table.rows() {
            let (Some(sample_code), Some(sample_id)) = (row[code].as_str(), row[id].as_str())
            else {
                continue;
            };
            let sample_year = row[year].as_f64().map(|y| y as i64);
            let sample_date = row[date].to_string();

            samples_by_code.entry(sample_code).or_default().insert((
                sample_id.to_string(),
                sample_year,
                sample_date.clone(),
            ));

            let (dates, codes) = groups
                .entry((sample_id.to_string(), sample_year))
                .or_default();
            dates.insert(sample_date);
            codes.insert(sample_code);
        }

        let mut violations = Vec::new();
        for (sample_code, samples) in &samples_by_code {
            if samples.len() > 1 {
                violations.push(CodeViolation {
                    violation_type: ViolationType::SharedCode,
                    subject: sample_code.to_string(),
                    details: format!("code covers {} distinct samples", samples.len()),
                });
            }
        }
        for ((sample_id, sample_year), (dates, codes)) in &groups {
            if codes.len() < dates.len() {
                violations.push(CodeViolation {
                    violation_type: ViolationType::CollapsedDates,
                    subject: format!("{} {}", sample_id, describe_year(*sample_year)),
                    details: format!("{} dates share {} codes", dates.len(), codes.len()),
                });
            }
        }

        let report = IntegrityReport {
            total_records: table.len(),
            duplicate_records,
            distinct_codes: samples_by_code.len(),
            violations,
        };
        if !report.is_clean() {
            warn!(
                "Integrity check found {} duplicate rows and {} code violations",
                report.duplicate_records,
                report.violations.len()
            );
        }
        Ok(report)
    }

    pub fn generate_summary(report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Duplicate Records: {}\n", report.duplicate_records));
        summary.push_str(&format!("Distinct Sample Codes: {}\n", report.distinct_codes));
        summary.push_str(&format!("\nCode Violations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    violation.subject,
                    violation.details
                ));
            }
        }

        summary
    }
}

fn describe_year(year: Option<i64>) -> String {
    year.map_or_else(|| "(no year)".to_string(), |y| y.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnKind, Value};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(id: &str, date: (i32, u32, u32), code: &str, parameter: &str) -> Vec<Value> {
        vec![
            Value::text(id),
            Value::Date(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()),
            Value::Number(date.0 as f64),
            Value::text(code),
            Value::text(parameter),
        ]
    }

    fn table(rows: Vec<Vec<Value>>) -> Table {
        Table::with_rows(
            vec![
                Column::new(COL_SAMPLE_ID, ColumnKind::Text),
                Column::new(COL_SAMPLE_DATE, ColumnKind::Date),
                Column::new(COL_YEAR, ColumnKind::Numeric),
                Column::new(COL_SAMPLE_CODE, ColumnKind::Text),
                Column::new("PARAMETER", ColumnKind::Text),
            ],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn test_clean_table() {
        let t = table(vec![
            row("S1", (2009, 8, 14), "S1_2009_1", "LEAD"),
            row("S1", (2009, 8, 14), "S1_2009_1", "MERCURY"),
            row("S1", (2009, 9, 1), "S1_2009_2", "LEAD"),
        ]);

        let report = IntegrityChecker::check(&t).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.total_records, 3);
        assert_eq!(report.distinct_codes, 2);
    }

    #[test]
    fn test_duplicates_and_shared_codes_are_reported() {
        let t = table(vec![
            row("S1", (2009, 8, 14), "S1_2009_1", "LEAD"),
            row("S1", (2009, 8, 14), "S1_2009_1", "LEAD"),
            row("S1", (2009, 9, 1), "S1_2009_1", "LEAD"),
        ]);

        let report = IntegrityChecker::check(&t).unwrap();

        assert_eq!(report.duplicate_records, 1);
        let kinds: Vec<ViolationType> = report.violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(kinds, vec![ViolationType::SharedCode, ViolationType::CollapsedDates]);
        assert!(IntegrityChecker::generate_summary(&report).contains("S1_2009_1"));
    }
}
