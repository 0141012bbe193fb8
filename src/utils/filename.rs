use crate::utils::constants::DEFAULT_OUTPUT_DIR;
use chrono::{Datelike, Local, NaiveDate};
use std::path::PathBuf;

/// Default cleaned table path: output/shellfish-tissue-clean-{YYMMDD}.csv
pub fn default_clean_filename() -> PathBuf {
    stamped_filename("shellfish-tissue-clean", Local::now().date_naive())
}

/// Default column description path: output/shellfish-tissue-columns-{YYMMDD}.csv
pub fn default_columns_filename() -> PathBuf {
    stamped_filename("shellfish-tissue-columns", Local::now().date_naive())
}

fn stamped_filename(stem: &str, date: NaiveDate) -> PathBuf {
    let year = date.year() % 100; // Get last 2 digits of year
    let filename = format!("{}-{:02}{:02}{:02}.csv", stem, year, date.month(), date.day());
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(filename)
}
