use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use std::collections::HashSet;

/// Output column: where it comes from, what it is called, what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEntry {
    pub source: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Present only when the matching reference input was supplied.
    pub optional: bool,
}

const fn entry(source: &'static str, name: &'static str, description: &'static str) -> ColumnEntry {
    ColumnEntry {
        source,
        name,
        description,
        optional: false,
    }
}

const fn optional(source: &'static str, name: &'static str, description: &'static str) -> ColumnEntry {
    ColumnEntry {
        source,
        name,
        description,
        optional: true,
    }
}

pub const COLUMN_CATALOG: &[ColumnEntry] = &[
    entry(COL_SITE_SEQ, "site_seq", "Sequence number of the sampling site in the monitoring database"),
    entry(COL_SITE_CODE, "site", "Short site code, parsed from the end of the composite site field"),
    entry(COL_SITE_NAME, "site_name", "Site name, parsed from the start of the composite site field"),
    entry(COL_SAMPLE_ID, "sample_id", "Sample identifier as reported, with spaces replaced by underscores"),
    entry(COL_SAMPLE_DATE, "sample_date", "Date the sample was collected"),
    entry(COL_YEAR, "year", "Calendar year of the sample date"),
    entry(COL_SAMPLE_CODE, "code", "Unique sample code: sample id, year and ordinal of the sample date within that year"),
    entry(COL_SAMPLE_TYPE, "sample_type", "Type of sample (field sample, duplicate, composite)"),
    entry(COL_ANALYSIS_LAB, "lab", "Laboratory that performed the analysis"),
    entry(COL_TEST_METHOD, "method", "Analytical test method"),
    entry(COL_CAS_NO, "cas_no", "Chemical Abstracts Service registry number of the parameter"),
    entry(COL_PARAMETER, "parameter", "Chemical or physical parameter measured"),
    entry(COL_CONCENTRATION, "conc", "Reported concentration, in the units given by 'units'"),
    entry(COL_UNITS, "units", "Units of the reported concentration and reporting limit"),
    entry(COL_LAB_QUALIFIER, "lab_qualifier", "Qualifier code assigned by the laboratory"),
    entry(COL_VALIDATION_QUALIFIER, "qualifier", "Qualifier code assigned during data validation"),
    entry(COL_QUALIFIER_DESCRIPTION, "qual_description", "Description of the validation qualifier"),
    entry(COL_REPORTING_LIMIT, "rl", "Reporting limit, in the units given by 'units'"),
    entry(COL_MDL, "mdl", "Method detection limit, in the units given by 'units'"),
    entry(COL_WEIGHT_BASIS, "weight_basis", "Basis of the concentration: wet, dry or lipid weight"),
    entry(COL_PREP_TYPE, "prep_type", "Sample preparation type"),
    entry(COL_RESULT_TYPE, "result_type", "Result type (target analyte, surrogate, spike)"),
    entry(COL_LATITUDE, "latitude", "Latitude of the sample point, decimal degrees"),
    entry(COL_LONGITUDE, "longitude", "Longitude of the sample point, decimal degrees"),
    entry(COL_CONC_UGG, "conc_ugg", "Concentration in micrograms per gram"),
    entry(COL_CONC_NGG, "conc_ngg", "Concentration in nanograms per gram"),
    entry(COL_RL_UGG, "rl_ugg", "Reporting limit in micrograms per gram"),
    entry(COL_RL_NGG, "rl_ngg", "Reporting limit in nanograms per gram"),
    optional(COL_PARAMETER_CLASS, "class", "Contaminant class of the parameter"),
    optional(COL_TOWN, "town", "Town nearest the site"),
    optional(COL_REGION, "region", "Coastal region of the site"),
    optional(COL_SITE_LATITUDE, "site_lat", "Latitude of the site, decimal degrees"),
    optional(COL_SITE_LONGITUDE, "site_long", "Longitude of the site, decimal degrees"),
];

pub fn by_source(source: &str) -> Option<&'static ColumnEntry> {
    COLUMN_CATALOG.iter().find(|e| e.source == source)
}

pub fn by_name(name: &str) -> Option<&'static ColumnEntry> {
    COLUMN_CATALOG.iter().find(|e| e.name == name)
}

/// Description rows for `columns` (final names), in the same order.
///
/// Every column must be catalogued, and every required catalogue entry must
/// appear among `columns`.
pub fn describe_columns(columns: &[&str]) -> Result<Vec<(String, String)>> {
    let mut problems = Vec::new();

    let undocumented: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|name| by_name(name).is_none())
        .collect();
    if !undocumented.is_empty() {
        problems.push(format!("no description for {}", undocumented.join(", ")));
    }

    let present: HashSet<&str> = columns.iter().copied().collect();
    let absent: Vec<&str> = COLUMN_CATALOG
        .iter()
        .filter(|e| !e.optional && !present.contains(e.name))
        .map(|e| e.name)
        .collect();
    if !absent.is_empty() {
        problems.push(format!("described but not in output: {}", absent.join(", ")));
    }

    if !problems.is_empty() {
        return Err(ProcessingError::MetadataMismatch(problems.join("; ")));
    }

    Ok(columns
        .iter()
        .filter_map(|name| by_name(name))
        .map(|e| (e.name.to_string(), e.description.to_string()))
        .collect())
}
