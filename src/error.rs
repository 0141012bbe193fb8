use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        sheet: String,
        path: String,
        available: String,
    },

    #[error("Schema mismatch: expected {expected} columns, found {found}")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Expected column '{0}' is missing")]
    MissingColumn(String),

    #[error("Column metadata mismatch: {0}")]
    MetadataMismatch(String),

    #[error("Unmapped unit labels: {0}")]
    UnmappedUnits(String),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
