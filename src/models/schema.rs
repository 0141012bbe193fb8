use crate::models::table::Column;
use crate::models::value::ColumnKind;
use crate::utils::constants::*;

/// One declared column of the source sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn spec(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

use ColumnKind::{Date, Numeric, Text};

/// Positional schema of the shellfish tissue sheet.
pub const SOURCE_SCHEMA: &[ColumnSpec] = &[
    spec(COL_SITE_SEQ, Numeric),
    spec(COL_SITE, Text),
    spec("SAMPLE POINT SEQ", Numeric),
    spec("SAMPLE POINT NAME", Text),
    spec("SAMPLE POINT TYPE", Text),
    spec(COL_SAMPLE_ID, Text),
    spec(COL_SAMPLE_DATE, Date),
    spec("SAMPLE TIME", Text),
    spec(COL_SAMPLE_TYPE, Text),
    spec("SAMPLE MATRIX", Text),
    spec("SAMPLE COLLECTION METHOD", Text),
    spec("SAMPLE LOCATION", Text),
    spec(COL_ANALYSIS_LAB, Text),
    spec("LAB SAMPLE ID", Text),
    spec("ANALYSIS DATE", Date),
    spec("PREP METHOD", Text),
    spec(COL_TEST_METHOD, Text),
    spec(COL_CAS_NO, Text),
    spec(COL_PARAMETER, Text),
    spec(COL_CONCENTRATION, Numeric),
    spec(COL_UNITS, Text),
    spec(COL_LAB_QUALIFIER, Text),
    spec(COL_VALIDATION_QUALIFIER, Text),
    spec(COL_QUALIFIER_DESCRIPTION, Text),
    spec(COL_REPORTING_LIMIT, Numeric),
    spec(COL_MDL, Numeric),
    spec("DILUTION FACTOR", Numeric),
    spec(COL_WEIGHT_BASIS, Text),
    spec(COL_PREP_TYPE, Text),
    spec("TREATMENT", Text),
    spec("SAMPLE COMMENT", Text),
    spec("LAB COMMENT", Text),
    spec("VALIDATION COMMENT", Text),
    spec("VALIDATION LEVEL", Text),
    spec(COL_RESULT_TYPE, Text),
    spec("REPORT NUMBER", Text),
    spec(COL_LATITUDE, Numeric),
    spec(COL_LONGITUDE, Numeric),
    spec("HORIZONTAL DATUM", Text),
    spec("SAMPLE FILTERED", Text),
];

/// Identifier columns that carry no analytical information.
pub const UNINFORMATIVE_COLUMNS: &[&str] = &[
    "SAMPLE POINT SEQ",
    "SAMPLE POINT NAME",
    "SAMPLE MATRIX",
    "LAB SAMPLE ID",
    "REPORT NUMBER",
    "HORIZONTAL DATUM",
    "SAMPLE FILTERED",
];

/// Columns outside the scope of the analysis.
pub const UNUSED_COLUMNS: &[&str] = &[
    "SAMPLE POINT TYPE",
    "SAMPLE TIME",
    "SAMPLE COLLECTION METHOD",
    "SAMPLE LOCATION",
    "ANALYSIS DATE",
    "PREP METHOD",
    "DILUTION FACTOR",
    "TREATMENT",
    "SAMPLE COMMENT",
    "LAB COMMENT",
    "VALIDATION COMMENT",
    "VALIDATION LEVEL",
];

/// Table columns for the declared source schema.
pub fn source_columns() -> Vec<Column> {
    SOURCE_SCHEMA
        .iter()
        .map(|spec| Column::new(spec.name, spec.kind))
        .collect()
}
