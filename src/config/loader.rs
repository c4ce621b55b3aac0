//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{MAX_CURRENCY_SCALE, PayrollConfig};

/// Loads and validates payroll configuration.
///
/// # File Format
///
/// ```text
/// unit_price: "3000"        # currency per unit sold
/// currency_scale: 2         # decimal places in exported reports
/// report_directory: reports # where range reports are written
/// ```
///
/// # Example
///
/// ```no_run
/// use sales_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
/// println!("Unit price: {}", loader.unit_price());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML or lacks `unit_price` (`ConfigParseError`)
    /// - A value is out of range (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: PayrollConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: PayrollConfig) -> EngineResult<Self> {
        if config.unit_price < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "unit_price".to_string(),
                message: format!("must not be negative, got {}", config.unit_price),
            });
        }

        if config.currency_scale > MAX_CURRENCY_SCALE {
            return Err(EngineError::InvalidConfig {
                field: "currency_scale".to_string(),
                message: format!(
                    "must be at most {}, got {}",
                    MAX_CURRENCY_SCALE, config.currency_scale
                ),
            });
        }

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the unit price.
    pub fn unit_price(&self) -> Decimal {
        self.config.unit_price
    }

    /// Returns the configured report directory.
    pub fn report_directory(&self) -> &Path {
        &self.config.report_directory
    }
}
