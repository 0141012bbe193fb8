use crate::error::Result;
use crate::models::{Column, ColumnKind, Table, Value};
use crate::utils::constants::{
    COL_SAMPLE_CODE, COL_SAMPLE_DATE, COL_SAMPLE_ID, COL_SITE, COL_SITE_CODE, COL_SITE_NAME,
    COL_YEAR, SITE_SEPARATOR,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Derives site code/name, year and the unique sample code.
pub struct IdentifierSynthesizer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierSummary {
    pub distinct_codes: usize,
    pub undated_rows: usize,
}

impl IdentifierSynthesizer {
    pub fn apply(table: &mut Table) -> Result<IdentifierSummary> {
        Self::split_site_column(table)?;
        Self::normalize_sample_ids(table)?;

        let dates: Vec<Option<NaiveDate>> = table
            .column_values(COL_SAMPLE_DATE)?
            .into_iter()
            .map(Value::as_date)
            .collect();
        let tags = date_ordinals(&dates);

        let years: Vec<Value> = dates
            .iter()
            .map(|d| d.map_or(Value::Null, |d| Value::Number(d.year() as f64)))
            .collect();

        let codes: Vec<Value> = table
            .column_values(COL_SAMPLE_ID)?
            .into_iter()
            .zip(dates.iter().zip(&tags))
            .map(|(id, (date, tag))| match (id.as_str(), date, tag) {
                (Some(id), Some(date), Some(tag)) => Value::Text(sample_code(id, date.year(), *tag)),
                _ => Value::Null,
            })
            .collect();

        let undated_rows = dates.iter().filter(|d| d.is_none()).count();
        if undated_rows > 0 {
            warn!("{} rows have no sample date and get no sample code", undated_rows);
        }
        let distinct_codes = codes
            .iter()
            .filter_map(Value::as_str)
            .collect::<BTreeSet<_>>()
            .len();

        let date_index = table.column_index(COL_SAMPLE_DATE)?;
        table.insert_column(date_index + 1, Column::new(COL_YEAR, ColumnKind::Numeric), years)?;
        table.insert_column(date_index + 2, Column::new(COL_SAMPLE_CODE, ColumnKind::Text), codes)?;

        debug!("Derived {} distinct sample codes", distinct_codes);
        Ok(IdentifierSummary {
            distinct_codes,
            undated_rows,
        })
    }

    /// Replace the composite site column with site code and site name.
    fn split_site_column(table: &mut Table) -> Result<()> {
        let (codes, names): (Vec<Value>, Vec<Value>) = table
            .column_values(COL_SITE)?
            .into_iter()
            .map(|value| match value.as_str() {
                Some(site) => {
                    let (code, name) = split_site(site);
                    (Value::text(code), Value::text(name))
                }
                None => (Value::Null, Value::Null),
            })
            .unzip();

        let index = table.column_index(COL_SITE)?;
        table.insert_column(index, Column::new(COL_SITE_CODE, ColumnKind::Text), codes)?;
        table.insert_column(index + 1, Column::new(COL_SITE_NAME, ColumnKind::Text), names)?;
        table.drop_columns(&[COL_SITE])
    }

    fn normalize_sample_ids(table: &mut Table) -> Result<()> {
        let ids: Vec<Value> = table
            .column_values(COL_SAMPLE_ID)?
            .into_iter()
            .map(|value| match value {
                Value::Text(id) => Value::Text(id.replace(' ', "_")),
                other => other.clone(),
            })
            .collect();
        table.replace_column_values(COL_SAMPLE_ID, ids)
    }
}

/// Split "Name - CODE" into (code, name): the code follows the last
/// separator, the name precedes the first one.
pub fn split_site(site: &str) -> (&str, &str) {
    let code = site
        .rfind(SITE_SEPARATOR)
        .map_or(site, |i| &site[i + SITE_SEPARATOR.len()..]);
    let name = site.find(SITE_SEPARATOR).map_or(site, |i| &site[..i]);
    (code.trim(), name.trim())
}

/// Dense rank of each date among the distinct dates of its calendar year,
/// starting at 1.
pub fn date_ordinals(dates: &[Option<NaiveDate>]) -> Vec<Option<u32>> {
    let mut by_year: HashMap<i32, BTreeSet<NaiveDate>> = HashMap::new();
    for date in dates.iter().flatten() {
        by_year.entry(date.year()).or_default().insert(*date);
    }

    let ranks: HashMap<NaiveDate, u32> = by_year
        .values()
        .flat_map(|days| days.iter().enumerate().map(|(i, d)| (*d, i as u32 + 1)))
        .collect();

    dates
        .iter()
        .map(|date| date.and_then(|d| ranks.get(&d).copied()))
        .collect()
}

pub fn sample_code(sample_id: &str, year: i32, tag: u32) -> String {
    format!("{}_{}_{}", sample_id, year, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(rows: Vec<(&str, &str, Option<NaiveDate>)>) -> Table {
        Table::with_rows(
            vec![
                Column::new(COL_SITE, ColumnKind::Text),
                Column::new(COL_SAMPLE_ID, ColumnKind::Text),
                Column::new(COL_SAMPLE_DATE, ColumnKind::Date),
            ],
            rows.into_iter()
                .map(|(site, id, d)| {
                    vec![
                        Value::text(site),
                        Value::text(id),
                        d.map_or(Value::Null, Value::Date),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_site() {
        assert_eq!(split_site("Presumpscot River - PRV"), ("PRV", "Presumpscot River"));
        assert_eq!(
            split_site("Fore River - Outer - FRY"),
            ("FRY", "Fore River")
        );
        assert_eq!(split_site("NOSEPARATOR"), ("NOSEPARATOR", "NOSEPARATOR"));
    }

    #[test]
    fn test_date_ordinals_are_dense_per_year() {
        let dates = vec![
            Some(date(2009, 8, 14)),
            Some(date(2009, 6, 1)),
            Some(date(2009, 8, 14)),
            Some(date(2010, 9, 3)),
            None,
            Some(date(2009, 10, 2)),
        ];

        let tags = date_ordinals(&dates);

        assert_eq!(tags, vec![Some(2), Some(1), Some(2), Some(1), None, Some(3)]);
    }

    #[test]
    fn test_apply_builds_codes_and_columns() {
        let mut t = table(vec![
            ("Presumpscot River - PRV", "PRV MUS", Some(date(2009, 8, 14))),
            ("Presumpscot River - PRV", "PRV MUS", Some(date(2009, 8, 14))),
            ("Presumpscot River - PRV", "PRV MUS", Some(date(2009, 9, 20))),
            ("Fore River - FRY", "FRY MUS", Some(date(2008, 7, 1))),
            ("Fore River - FRY", "FRY MUS", None),
        ]);

        let summary = IdentifierSynthesizer::apply(&mut t).unwrap();

        assert_eq!(
            t.column_names(),
            vec![COL_SITE_CODE, COL_SITE_NAME, COL_SAMPLE_ID, COL_SAMPLE_DATE, COL_YEAR, COL_SAMPLE_CODE]
        );
        let codes: Vec<&Value> = t.column_values(COL_SAMPLE_CODE).unwrap();
        assert_eq!(*codes[0], Value::text("PRV_MUS_2009_1"));
        assert_eq!(codes[0], codes[1]);
        assert_eq!(*codes[2], Value::text("PRV_MUS_2009_2"));
        assert_eq!(*codes[3], Value::text("FRY_MUS_2008_1"));
        assert!(codes[4].is_null());

        assert_eq!(t.value(0, COL_SITE_CODE).unwrap(), &Value::text("PRV"));
        assert_eq!(t.value(0, COL_YEAR).unwrap(), &Value::Number(2009.0));
        assert_eq!(
            summary,
            IdentifierSummary {
                distinct_codes: 3,
                undated_rows: 1
            }
        );
    }

    #[test]
    fn test_same_id_different_dates_get_different_codes() {
        let mut t = table(vec![
            ("A - X", "S1", Some(date(2011, 5, 1))),
            ("A - X", "S1", Some(date(2011, 5, 2))),
            ("A - X", "S2", Some(date(2011, 5, 1))),
        ]);

        IdentifierSynthesizer::apply(&mut t).unwrap();

        let codes = t.column_values(COL_SAMPLE_CODE).unwrap();
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[0], codes[2]);
    }
}
