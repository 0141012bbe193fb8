pub mod constants;
pub mod encoding;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use encoding::decode_text;
pub use filename::{default_clean_filename, default_columns_filename};
pub use progress::ProgressReporter;
