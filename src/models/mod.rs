pub mod catalog;
pub mod exclusion;
pub mod schema;
pub mod site;
pub mod table;
pub mod units;
pub mod value;

pub use catalog::{ColumnEntry, COLUMN_CATALOG};
pub use exclusion::{ExclusionKind, ExclusionRule, RecordKey};
pub use schema::{ColumnSpec, SOURCE_SCHEMA};
pub use site::SiteMetadata;
pub use table::{Column, Table};
pub use units::{UnitConversion, UnitTable};
pub use value::{ColumnKind, Value};
