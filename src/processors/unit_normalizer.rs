use crate::error::{ProcessingError, Result};
use crate::models::units::scale_by_power_of_ten;
use crate::models::{Column, ColumnKind, Table, UnitConversion, UnitTable, Value};
use crate::utils::constants::{
    COL_CONCENTRATION, COL_CONC_NGG, COL_CONC_UGG, COL_REPORTING_LIMIT, COL_RL_NGG, COL_RL_UGG,
    COL_UNITS, NGG_EXPONENT, UGG_EXPONENT,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

const BLANK_UNIT: &str = "(blank)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub converted_rows: usize,
    /// Rows per unit label with no conversion entry.
    pub unmapped: BTreeMap<String, usize>,
}

impl UnitSummary {
    pub fn unmapped_rows(&self) -> usize {
        self.unmapped.values().sum()
    }
}

/// A value expressed in both output bases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub ugg: Option<f64>,
    pub ngg: Option<f64>,
}

impl Converted {
    const NULL: Converted = Converted {
        ugg: None,
        ngg: None,
    };
}

/// Rebases concentration and reporting limit to µg/g and ng/g.
pub struct UnitNormalizer {
    units: UnitTable,
    strict: bool,
}

impl UnitNormalizer {
    pub fn new(conversions: &[UnitConversion]) -> Self {
        Self {
            units: UnitTable::new(conversions),
            strict: false,
        }
    }

    /// Fail on unmapped unit labels instead of leaving nulls.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// `value` in units with exponent `e` becomes `value * 10^(6+e)` µg/g and
    /// `value * 10^(9+e)` ng/g.
    pub fn convert(value: Option<f64>, exponent: Option<i32>) -> Converted {
        match (value, exponent) {
            (Some(v), Some(e)) => Converted {
                ugg: Some(scale_by_power_of_ten(v, UGG_EXPONENT + e)),
                ngg: Some(scale_by_power_of_ten(v, NGG_EXPONENT + e)),
            },
            _ => Converted::NULL,
        }
    }

    pub fn exponent(&self, label: &str) -> Option<i32> {
        self.units.exponent(label)
    }

    pub fn apply(&self, table: &mut Table) -> Result<UnitSummary> {
        let mut summary = UnitSummary::default();

        let units = table.column_index(COL_UNITS)?;
        let concentration = table.column_index(COL_CONCENTRATION)?;
        let limit = table.column_index(COL_REPORTING_LIMIT)?;

        let mut conc_ugg = Vec::with_capacity(table.len());
        let mut conc_ngg = Vec::with_capacity(table.len());
        let mut rl_ugg = Vec::with_capacity(table.len());
        let mut rl_ngg = Vec::with_capacity(table.len());

        for row in table.rows() {
            let exponent = match row[units].as_str() {
                Some(label) => {
                    let exponent = self.exponent(label);
                    if exponent.is_none() {
                        *summary.unmapped.entry(UnitTable::normalize(label)).or_default() += 1;
                    }
                    exponent
                }
                None => {
                    *summary.unmapped.entry(BLANK_UNIT.to_string()).or_default() += 1;
                    None
                }
            };
            if exponent.is_some() {
                summary.converted_rows += 1;
            }

            let conc = Self::convert(row[concentration].as_f64(), exponent);
            let rl = Self::convert(row[limit].as_f64(), exponent);
            conc_ugg.push(Value::from_option_f64(conc.ugg));
            conc_ngg.push(Value::from_option_f64(conc.ngg));
            rl_ugg.push(Value::from_option_f64(rl.ugg));
            rl_ngg.push(Value::from_option_f64(rl.ngg));
        }

        if !summary.unmapped.is_empty() {
            let labels = summary
                .unmapped
                .iter()
                .map(|(label, rows)| format!("{} ({} rows)", label, rows))
                .collect::<Vec<_>>()
                .join(", ");
            if self.strict {
                return Err(ProcessingError::UnmappedUnits(labels));
            }
            warn!("No unit conversion for {}; converted values left null", labels);
        }

        table.add_column(Column::new(COL_CONC_UGG, ColumnKind::Numeric), conc_ugg)?;
        table.add_column(Column::new(COL_CONC_NGG, ColumnKind::Numeric), conc_ngg)?;
        table.add_column(Column::new(COL_RL_UGG, ColumnKind::Numeric), rl_ugg)?;
        table.add_column(Column::new(COL_RL_NGG, ColumnKind::Numeric), rl_ngg)?;

        info!(
            "Converted units for {} of {} rows",
            summary.converted_rows,
            table.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn normalizer() -> UnitNormalizer {
        UnitNormalizer::new(&PipelineConfig::default().units)
    }

    fn table(rows: Vec<(&str, Option<f64>, Option<f64>)>) -> Table {
        Table::with_rows(
            vec![
                Column::new("PARAMETER", ColumnKind::Text),
                Column::new(COL_CONCENTRATION, ColumnKind::Numeric),
                Column::new(COL_UNITS, ColumnKind::Text),
                Column::new(COL_REPORTING_LIMIT, ColumnKind::Numeric),
            ],
            rows.into_iter()
                .map(|(unit, conc, rl)| {
                    vec![
                        Value::text("MERCURY"),
                        Value::from_option_f64(conc),
                        if unit.is_empty() { Value::Null } else { Value::text(unit) },
                        Value::from_option_f64(rl),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_ug_per_kg() {
        let mut t = table(vec![("UG/KG", Some(5.0), Some(0.5))]);

        normalizer().apply(&mut t).unwrap();

        assert_eq!(t.value(0, COL_CONC_UGG).unwrap(), &Value::Number(5.0e-3));
        assert_eq!(t.value(0, COL_CONC_NGG).unwrap(), &Value::Number(5.0));
        assert_eq!(t.value(0, COL_RL_UGG).unwrap(), &Value::Number(5.0e-4));
        assert_eq!(t.value(0, COL_RL_NGG).unwrap(), &Value::Number(0.5));
    }

    #[test]
    fn test_bases_differ_by_three_orders() {
        let n = normalizer();
        for (label, exponent) in PipelineConfig::default()
            .units
            .iter()
            .map(|u| (u.label.as_str(), u.exponent))
        {
            for value in [0.013, 1.0, 5.0, 42.7, 1250.0] {
                let converted = UnitNormalizer::convert(Some(value), n.exponent(label));
                let ugg = converted.ugg.unwrap();
                let ngg = converted.ngg.unwrap();

                assert_eq!(ugg, scale_by_power_of_ten(value, 6 + exponent));
                assert!(((ngg / ugg) - 1.0e3).abs() < 1e-9, "{} {}", label, value);
            }
        }
    }

    #[test]
    fn test_unknown_unit_leaves_nulls() {
        let mut t = table(vec![("MG/L", Some(5.0), Some(0.5)), ("NG/G", Some(2.0), None)]);

        let summary = normalizer().apply(&mut t).unwrap();

        for col in [COL_CONC_UGG, COL_CONC_NGG, COL_RL_UGG, COL_RL_NGG] {
            assert!(t.value(0, col).unwrap().is_null());
        }
        // rest of the row unchanged
        assert_eq!(t.value(0, COL_CONCENTRATION).unwrap(), &Value::Number(5.0));
        assert_eq!(t.value(0, COL_UNITS).unwrap(), &Value::text("MG/L"));
        assert_eq!(t.len(), 2);

        assert_eq!(t.value(1, COL_CONC_UGG).unwrap(), &Value::Number(2.0e-3));
        assert!(t.value(1, COL_RL_UGG).unwrap().is_null());

        assert_eq!(summary.converted_rows, 1);
        assert_eq!(summary.unmapped.get("MG/L"), Some(&1));
    }

    #[test]
    fn test_blank_unit_is_counted() {
        let mut t = table(vec![("", Some(5.0), None)]);

        let summary = normalizer().apply(&mut t).unwrap();

        assert_eq!(summary.unmapped_rows(), 1);
        assert!(summary.unmapped.contains_key(BLANK_UNIT));
    }

    #[test]
    fn test_strict_mode_fails_on_unmapped() {
        let mut t = table(vec![("MG/L", Some(5.0), None)]);

        let result = normalizer().with_strict(true).apply(&mut t);

        assert!(matches!(result, Err(ProcessingError::UnmappedUnits(ref m)) if m.contains("MG/L")));
        assert!(!t.has_column(COL_CONC_UGG));
    }
}
