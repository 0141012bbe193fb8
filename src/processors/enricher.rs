use crate::error::Result;
use crate::models::{Column, ColumnKind, SiteMetadata, Table, Value};
use crate::readers::ParameterClasses;
use crate::utils::constants::{
    COL_PARAMETER, COL_PARAMETER_CLASS, COL_REGION, COL_SITE_CODE, COL_SITE_LATITUDE,
    COL_SITE_LONGITUDE, COL_TOWN,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    pub unclassified_parameters: BTreeSet<String>,
    pub unknown_sites: BTreeSet<String>,
}

/// Joins the optional reference lookups onto the cleaned table.
#[derive(Default)]
pub struct ReferenceEnricher {
    classes: Option<ParameterClasses>,
    sites: Option<HashMap<String, SiteMetadata>>,
}

impl ReferenceEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter_classes(mut self, classes: ParameterClasses) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn with_sites(mut self, sites: HashMap<String, SiteMetadata>) -> Self {
        self.sites = Some(sites);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_none() && self.sites.is_none()
    }

    pub fn apply(&self, table: &mut Table) -> Result<EnrichmentSummary> {
        let mut summary = EnrichmentSummary::default();

        if let Some(classes) = &self.classes {
            let (values, missing) = join_column(table, COL_PARAMETER, |parameter| {
                classes.class_of(parameter).map(Value::text)
            })?;
            table.add_column(Column::new(COL_PARAMETER_CLASS, ColumnKind::Text), values)?;
            summary.unclassified_parameters = missing;

            if !summary.unclassified_parameters.is_empty() {
                warn!(
                    "{} parameters have no class",
                    summary.unclassified_parameters.len()
                );
            }
        }

        if let Some(sites) = &self.sites {
            let site_field = |f: fn(&SiteMetadata) -> Value| {
                move |code: &str| sites.get(code).map(f)
            };

            let (towns, missing) = join_column(
                table,
                COL_SITE_CODE,
                site_field(|s| s.town.as_deref().map_or(Value::Null, Value::text)),
            )?;
            let (regions, _) = join_column(
                table,
                COL_SITE_CODE,
                site_field(|s| s.region.as_deref().map_or(Value::Null, Value::text)),
            )?;
            let (lats, _) = join_column(
                table,
                COL_SITE_CODE,
                site_field(|s| Value::from_option_f64(s.latitude)),
            )?;
            let (longs, _) = join_column(
                table,
                COL_SITE_CODE,
                site_field(|s| Value::from_option_f64(s.longitude)),
            )?;

            table.add_column(Column::new(COL_TOWN, ColumnKind::Text), towns)?;
            table.add_column(Column::new(COL_REGION, ColumnKind::Text), regions)?;
            table.add_column(Column::new(COL_SITE_LATITUDE, ColumnKind::Numeric), lats)?;
            table.add_column(Column::new(COL_SITE_LONGITUDE, ColumnKind::Numeric), longs)?;
            summary.unknown_sites = missing;

            if !summary.unknown_sites.is_empty() {
                warn!(
                    "Sites missing from the site file: {}",
                    summary.unknown_sites.iter().cloned().collect::<Vec<_>>().join(", ")
                );
            }
        }

        if !self.is_empty() {
            info!("Joined reference data onto {} rows", table.len());
        }
        Ok(summary)
    }
}

/// Look up each text value of `key_column`; returns the joined values and the
/// keys that found no match.
fn join_column<F>(table: &Table, key_column: &str, lookup: F) -> Result<(Vec<Value>, BTreeSet<String>)>
where
    F: Fn(&str) -> Option<Value>,
{
    let mut missing = BTreeSet::new();
    let values = table
        .column_values(key_column)?
        .into_iter()
        .map(|key| match key.as_str() {
            Some(k) => lookup(k).unwrap_or_else(|| {
                missing.insert(k.to_string());
                Value::Null
            }),
            None => Value::Null,
        })
        .collect();
    Ok((values, missing))
}
