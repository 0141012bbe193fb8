use crate::error::Result;
use crate::models::{ExclusionRule, UnitConversion};
use crate::utils::constants::{COL_ANALYSIS_LAB, COL_TEST_METHOD, DEFAULT_SHEET_NAME};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Settings of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[validate(length(min = 1))]
    pub sheet_name: String,

    #[serde(default)]
    pub strict_units: bool,

    pub context_free_parameters: Vec<String>,

    pub context_columns: Vec<String>,

    #[validate(length(min = 1))]
    pub lab_column: String,

    #[validate(length(min = 1), nested)]
    pub units: Vec<UnitConversion>,

    #[serde(default)]
    #[validate(nested)]
    pub exclusions: Vec<ExclusionRule>,
}

impl PipelineConfig {
    /// Built-in settings, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = path {
            debug!("Loading configuration overrides from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_sheet_name(mut self, sheet_name: &str) -> Self {
        self.sheet_name = sheet_name.to_string();
        self
    }

    pub fn with_strict_units(mut self, strict_units: bool) -> Self {
        self.strict_units = strict_units;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionRule>) -> Self {
        self.exclusions = exclusions;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let units = [
            ("G/G", 0),
            ("%", -2),
            ("MG/G", -3),
            ("UG/G", -6),
            ("MG/KG", -6),
            ("PPM", -6),
            ("NG/G", -9),
            ("UG/KG", -9),
            ("PPB", -9),
            ("PG/G", -12),
            ("NG/KG", -12),
            ("PPT", -12),
            ("PG/KG", -15),
        ]
        .iter()
        .map(|(label, exponent)| UnitConversion::new(label, *exponent))
        .collect();

        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            strict_units: false,
            context_free_parameters: vec!["MOISTURE".to_string(), "LIPIDS".to_string()],
            context_columns: vec![COL_TEST_METHOD.to_string()],
            lab_column: COL_ANALYSIS_LAB.to_string(),
            units,
            exclusions: vec![
                ExclusionRule::record(
                    "erroneous duplicate mercury measurement",
                    "PRV_MUS_2009_1",
                    "MERCURY",
                    "SW7473",
                ),
                ExclusionRule::weight_basis(
                    "dioxin results reported on an inappropriate weight basis",
                    "FRY_MUS_2008_1",
                    &["E1613B"],
                    &["TOTAL TEQ"],
                    &["DIOXIN"],
                    &["LIPID", "DRY"],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExclusionKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_builtin_file_matches_default() {
        let loaded = PipelineConfig::load(None).unwrap();
        assert_eq!(loaded, PipelineConfig::default());
    }

    #[test]
    fn test_override_file_replaces_values() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "sheet_name = \"TISSUE 2024\"")?;
        writeln!(file, "units = [{{ label = \"UG/KG\", exponent = -9 }}]")?;
        writeln!(file, "[[exclusions]]")?;
        writeln!(file, "kind = \"record\"")?;
        writeln!(file, "reason = \"bad vial\"")?;
        writeln!(file, "sample_code = \"ABC_2020_1\"")?;
        writeln!(file, "parameter = \"LEAD\"")?;
        writeln!(file, "test_method = \"SW6020\"")?;

        let config = PipelineConfig::load(Some(file.path()))?;

        assert_eq!(config.sheet_name, "TISSUE 2024");
        assert_eq!(config.units, vec![UnitConversion::new("UG/KG", -9)]);
        assert_eq!(config.exclusions.len(), 1);
        assert_eq!(config.exclusions[0].kind, ExclusionKind::Record);
        assert_eq!(config.exclusions[0].parameter.as_deref(), Some("LEAD"));
        // untouched keys keep their built-in values
        assert_eq!(config.lab_column, COL_ANALYSIS_LAB);

        Ok(())
    }

    #[test]
    fn test_invalid_override_is_rejected() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "sheet_name = \"\"")?;

        assert!(PipelineConfig::load(Some(file.path())).is_err());
        Ok(())
    }
}
