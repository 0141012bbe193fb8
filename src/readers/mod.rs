pub mod parameter_class_reader;
pub mod site_reader;
pub mod workbook_reader;

pub use parameter_class_reader::{ParameterClassReader, ParameterClasses};
pub use site_reader::SiteReader;
pub use workbook_reader::{LoadedTable, SourceReader};
