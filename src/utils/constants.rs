/// Source column names
pub const COL_SITE_SEQ: &str = "SITE SEQ";
pub const COL_SITE: &str = "SITE";
pub const COL_SAMPLE_ID: &str = "SAMPLE ID";
pub const COL_SAMPLE_DATE: &str = "SAMPLE DATE";
pub const COL_SAMPLE_TYPE: &str = "SAMPLE TYPE";
pub const COL_ANALYSIS_LAB: &str = "ANALYSIS LAB";
pub const COL_TEST_METHOD: &str = "TEST METHOD";
pub const COL_CAS_NO: &str = "CAS NO";
pub const COL_PARAMETER: &str = "PARAMETER";
pub const COL_CONCENTRATION: &str = "CONCENTRATION";
pub const COL_UNITS: &str = "PARAMETER UNITS";
pub const COL_LAB_QUALIFIER: &str = "LAB QUALIFIER";
pub const COL_VALIDATION_QUALIFIER: &str = "VALIDATION QUALIFIER";
pub const COL_QUALIFIER_DESCRIPTION: &str = "QUALIFIER DESCRIPTION";
pub const COL_REPORTING_LIMIT: &str = "REPORTING LIMIT";
pub const COL_MDL: &str = "METHOD DETECTION LIMIT";
pub const COL_WEIGHT_BASIS: &str = "WEIGHT BASIS";
pub const COL_PREP_TYPE: &str = "PREP TYPE";
pub const COL_RESULT_TYPE: &str = "RESULT TYPE";
pub const COL_LATITUDE: &str = "LATITUDE";
pub const COL_LONGITUDE: &str = "LONGITUDE";

/// Derived column names
pub const COL_SITE_CODE: &str = "SITE CODE";
pub const COL_SITE_NAME: &str = "SITE NAME";
pub const COL_YEAR: &str = "YEAR";
pub const COL_SAMPLE_CODE: &str = "SAMPLE CODE";
pub const COL_CONC_UGG: &str = "CONC UGG";
pub const COL_CONC_NGG: &str = "CONC NGG";
pub const COL_RL_UGG: &str = "RL UGG";
pub const COL_RL_NGG: &str = "RL NGG";
pub const COL_PARAMETER_CLASS: &str = "PARAMETER CLASS";
pub const COL_TOWN: &str = "TOWN";
pub const COL_REGION: &str = "REGION";
pub const COL_SITE_LATITUDE: &str = "SITE LATITUDE";
pub const COL_SITE_LONGITUDE: &str = "SITE LONGITUDE";

/// Separator inside the composite site field ("Name - CODE")
pub const SITE_SEPARATOR: &str = " - ";

/// Exponents of the two output bases relative to grams-per-gram
pub const UGG_EXPONENT: i32 = 6;
pub const NGG_EXPONENT: i32 = 9;

/// Processing defaults
pub const DEFAULT_SHEET_NAME: &str = "SHELLFISH TISSUE";
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Accepted text date formats
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
