use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionKind {
    /// One specific measurement: sample code + parameter + test method.
    Record,
    /// Results of a sample reported on a weight basis unsuitable for the
    /// parameter class.
    WeightBasis,
}

impl fmt::Display for ExclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionKind::Record => write!(f, "record"),
            ExclusionKind::WeightBasis => write!(f, "weight_basis"),
        }
    }
}

/// A known-bad record, identified by literal values, with the reason it is
/// excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rule_shape"))]
pub struct ExclusionRule {
    pub kind: ExclusionKind,

    #[validate(length(min = 1))]
    pub reason: String,

    #[validate(length(min = 1))]
    pub sample_code: String,

    #[serde(default)]
    pub parameter: Option<String>,

    #[serde(default)]
    pub test_method: Option<String>,

    #[serde(default)]
    pub test_methods: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<String>,

    #[serde(default)]
    pub parameter_contains: Vec<String>,

    #[serde(default)]
    pub weight_bases: Vec<String>,
}

fn validate_rule_shape(rule: &ExclusionRule) -> Result<(), ValidationError> {
    match rule.kind {
        ExclusionKind::Record => {
            if rule.parameter.is_none() || rule.test_method.is_none() {
                return Err(ValidationError::new(
                    "record exclusion needs parameter and test_method",
                ));
            }
        }
        ExclusionKind::WeightBasis => {
            if rule.weight_bases.is_empty() {
                return Err(ValidationError::new(
                    "weight_basis exclusion needs weight_bases",
                ));
            }
            if rule.test_methods.is_empty()
                && rule.parameters.is_empty()
                && rule.parameter_contains.is_empty()
            {
                return Err(ValidationError::new(
                    "weight_basis exclusion needs test_methods, parameters or parameter_contains",
                ));
            }
        }
    }
    Ok(())
}

/// The fields of one row an exclusion rule looks at.
#[derive(Debug, Clone, Copy)]
pub struct RecordKey<'a> {
    pub sample_code: Option<&'a str>,
    pub parameter: Option<&'a str>,
    pub test_method: Option<&'a str>,
    pub weight_basis: Option<&'a str>,
}

impl ExclusionRule {
    pub fn record(reason: &str, sample_code: &str, parameter: &str, test_method: &str) -> Self {
        Self {
            kind: ExclusionKind::Record,
            reason: reason.to_string(),
            sample_code: sample_code.to_string(),
            parameter: Some(parameter.to_string()),
            test_method: Some(test_method.to_string()),
            test_methods: Vec::new(),
            parameters: Vec::new(),
            parameter_contains: Vec::new(),
            weight_bases: Vec::new(),
        }
    }

    pub fn weight_basis(
        reason: &str,
        sample_code: &str,
        test_methods: &[&str],
        parameters: &[&str],
        parameter_contains: &[&str],
        weight_bases: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            kind: ExclusionKind::WeightBasis,
            reason: reason.to_string(),
            sample_code: sample_code.to_string(),
            parameter: None,
            test_method: None,
            test_methods: owned(test_methods),
            parameters: owned(parameters),
            parameter_contains: owned(parameter_contains),
            weight_bases: owned(weight_bases),
        }
    }

    /// Exact literal comparison; a null field never matches.
    pub fn matches(&self, key: &RecordKey<'_>) -> bool {
        if key.sample_code != Some(self.sample_code.as_str()) {
            return false;
        }

        match self.kind {
            ExclusionKind::Record => {
                key.parameter.is_some()
                    && key.parameter == self.parameter.as_deref()
                    && key.test_method.is_some()
                    && key.test_method == self.test_method.as_deref()
            }
            ExclusionKind::WeightBasis => {
                let method_hit = key
                    .test_method
                    .is_some_and(|m| self.test_methods.iter().any(|t| t == m));
                let parameter_hit = key
                    .parameter
                    .is_some_and(|p| self.parameters.iter().any(|t| t == p));
                let substring_hit = key
                    .parameter
                    .is_some_and(|p| self.parameter_contains.iter().any(|s| p.contains(s.as_str())));
                let basis_hit = key
                    .weight_basis
                    .is_some_and(|b| self.weight_bases.iter().any(|w| w == b));

                (method_hit || parameter_hit || substring_hit) && basis_hit
            }
        }
    }

    pub fn describe(&self) -> String {
        match self.kind {
            ExclusionKind::Record => format!(
                "{} / {} / {}",
                self.sample_code,
                self.parameter.as_deref().unwrap_or("-"),
                self.test_method.as_deref().unwrap_or("-")
            ),
            ExclusionKind::WeightBasis => format!(
                "{} on {} basis",
                self.sample_code,
                self.weight_bases.join("/")
            ),
        }
    }
}
