use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// A unit label and its decimal exponent relative to grams per gram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UnitConversion {
    #[validate(length(min = 1))]
    pub label: String,

    #[validate(range(min = -30, max = 30))]
    pub exponent: i32,
}

impl UnitConversion {
    pub fn new(label: &str, exponent: i32) -> Self {
        Self {
            label: label.to_string(),
            exponent,
        }
    }
}

/// Lookup from normalized unit label to exponent.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    exponents: HashMap<String, i32>,
}

impl UnitTable {
    pub fn new(conversions: &[UnitConversion]) -> Self {
        let exponents = conversions
            .iter()
            .map(|c| (Self::normalize(&c.label), c.exponent))
            .collect();
        Self { exponents }
    }

    /// Labels are compared trimmed and upper-cased.
    pub fn normalize(label: &str) -> String {
        label.trim().to_uppercase()
    }

    pub fn exponent(&self, label: &str) -> Option<i32> {
        self.exponents.get(&Self::normalize(label)).copied()
    }

    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }
}

/// `value * 10^power`, dividing for negative powers so that results such as
/// `5.0 * 10^-3` are correctly rounded.
pub fn scale_by_power_of_ten(value: f64, power: i32) -> f64 {
    if power >= 0 {
        value * 10f64.powi(power)
    } else {
        value / 10f64.powi(-power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let table = UnitTable::new(&[UnitConversion::new("UG/KG", -9)]);

        assert_eq!(table.exponent("UG/KG"), Some(-9));
        assert_eq!(table.exponent(" ug/kg "), Some(-9));
        assert_eq!(table.exponent("MG/L"), None);
    }

    #[test]
    fn test_scale_by_power_of_ten() {
        assert_eq!(scale_by_power_of_ten(5.0, -3), 5.0e-3);
        assert_eq!(scale_by_power_of_ten(5.0, 0), 5.0);
        assert_eq!(scale_by_power_of_ten(0.25, 3), 250.0);
    }

    #[test]
    fn test_conversion_validation() {
        assert!(UnitConversion::new("NG/G", -9).validate().is_ok());
        assert!(UnitConversion::new("", -9).validate().is_err());
        assert!(UnitConversion::new("X", 99).validate().is_err());
    }
}
