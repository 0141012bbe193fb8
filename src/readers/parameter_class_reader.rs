use crate::error::{ProcessingError, Result};
use crate::readers::workbook_reader::{is_csv, read_sheet_range};
use crate::utils::encoding::decode_text;
use calamine::Data;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const PARAMETER_HEADER: &str = "PARAMETER";
const CLASS_HEADER: &str = "CLASS";

/// Parameter name (trimmed, upper-cased) to contaminant class.
#[derive(Debug, Clone, Default)]
pub struct ParameterClasses {
    classes: HashMap<String, String>,
}

impl ParameterClasses {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut classes = HashMap::new();
        for (parameter, class) in pairs {
            let key = Self::normalize(parameter.as_ref());
            if key.is_empty() {
                continue;
            }
            if classes.contains_key(&key) {
                warn!("Parameter {} listed more than once; keeping the first class", key);
                continue;
            }
            classes.insert(key, class.into());
        }
        Self { classes }
    }

    fn normalize(parameter: &str) -> String {
        parameter.trim().to_uppercase()
    }

    pub fn class_of(&self, parameter: &str) -> Option<&str> {
        self.classes
            .get(&Self::normalize(parameter))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Reads the parameter-to-class lookup from the first sheet of a workbook,
/// or from a CSV file, locating the `PARAMETER` and `CLASS` columns by header.
pub struct ParameterClassReader;

impl ParameterClassReader {
    pub fn read(path: &Path) -> Result<ParameterClasses> {
        let rows = if is_csv(path) {
            let bytes = std::fs::read(path)?;
            Self::csv_rows(&decode_text(&bytes))?
        } else {
            Self::range_rows(&read_sheet_range(path, None)?)
        };

        let classes = Self::from_rows(rows)?;
        info!(
            "Loaded {} parameter classes from {}",
            classes.len(),
            path.display()
        );
        Ok(classes)
    }

    fn range_rows(range: &calamine::Range<Data>) -> Vec<Vec<String>> {
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    fn csv_rows(text: &str) -> Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        reader
            .records()
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect()
    }

    fn from_rows(rows: Vec<Vec<String>>) -> Result<ParameterClasses> {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .ok_or_else(|| ProcessingError::InvalidFormat("Parameter class file is empty".to_string()))?;

        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };
        let parameter_col = find(PARAMETER_HEADER)?;
        let class_col = find(CLASS_HEADER)?;

        let pairs = rows.filter_map(|row| {
            let parameter = row.get(parameter_col)?.trim().to_string();
            let class = row.get(class_col)?.trim().to_string();
            (!parameter.is_empty() && !class.is_empty()).then_some((parameter, class))
        });

        Ok(ParameterClasses::from_pairs(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_is_normalized() {
        let classes = ParameterClasses::from_pairs([("Mercury", "METAL"), ("MERCURY", "OTHER")]);

        assert_eq!(classes.len(), 1);
        assert_eq!(classes.class_of(" MERCURY "), Some("METAL"));
        assert_eq!(classes.class_of("LEAD"), None);
    }

    #[test]
    fn test_read_csv_by_header() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "CAS,Class,Parameter")?;
        writeln!(file, "7439-97-6,METAL,MERCURY")?;
        writeln!(file, "1336-36-3,PCB,TOTAL PCB")?;
        writeln!(file, ",,")?;

        let classes = ParameterClassReader::read(file.path())?;

        assert_eq!(classes.len(), 2);
        assert_eq!(classes.class_of("TOTAL PCB"), Some("PCB"));
        Ok(())
    }

    #[test]
    fn test_missing_class_column_is_error() {
        let rows = vec![vec!["PARAMETER".to_string(), "GROUP".to_string()]];
        let result = ParameterClassReader::from_rows(rows);

        assert!(matches!(result, Err(ProcessingError::MissingColumn(c)) if c == "CLASS"));
    }
}
