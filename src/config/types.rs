//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structure that is
//! deserialized from the YAML configuration file.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Largest accepted currency scale.
pub const MAX_CURRENCY_SCALE: u32 = 10;

fn default_currency_scale() -> u32 {
    2
}

fn default_report_directory() -> PathBuf {
    PathBuf::from("reports")
}

/// Engine configuration.
///
/// The unit price is the currency amount attributed to one sold product unit.
/// It is supplied to the engine at construction and never embedded in
/// reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayrollConfig {
    /// Currency amount earned per unit sold.
    pub unit_price: Decimal,
    /// Decimal places kept when rendering report values.
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,
    /// Directory where range reports are exported.
    #[serde(default = "default_report_directory")]
    pub report_directory: PathBuf,
}

impl PayrollConfig {
    /// Creates a configuration with default scale and report directory.
    pub fn with_unit_price(unit_price: Decimal) -> Self {
        Self {
            unit_price,
            currency_scale: default_currency_scale(),
            report_directory: default_report_directory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: PayrollConfig = serde_yaml::from_str("unit_price: \"300\"").unwrap();
        assert_eq!(config.unit_price, Decimal::from(300));
        assert_eq!(config.currency_scale, 2);
        assert_eq!(config.report_directory, PathBuf::from("reports"));
    }

    #[test]
    fn test_numeric_unit_price_accepted() {
        let config: PayrollConfig =
            serde_yaml::from_str("unit_price: 12.5\ncurrency_scale: 0").unwrap();
        assert_eq!(config.unit_price, Decimal::new(125, 1));
        assert_eq!(config.currency_scale, 0);
    }

    #[test]
    fn test_with_unit_price() {
        let config = PayrollConfig::with_unit_price(Decimal::from(3000));
        assert_eq!(config.unit_price, Decimal::from(3000));
        assert_eq!(config.currency_scale, 2);
    }
}
