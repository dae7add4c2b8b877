//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a billing run
//! configuration from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::models::{BillingMonth, TaxRates};

use super::types::{BillingConfig, BillingMode};

/// Loads, validates and provides access to a billing run configuration.
///
/// Input and output paths in the file may be relative; they are resolved
/// against the directory containing the configuration file.
///
/// # File Layout
///
/// ```text
/// billing:
///   month: 2
///   year: 2026
///   mode: recurring        # or one_time
/// tax:                     # optional
///   cgst: "0.09"
///   sgst: "0.09"
///   igst: "0.18"
/// inputs:
///   attendance: data/attendance.csv
///   charges: data/charges.csv
///   po_numbers: data/po_numbers.csv   # optional
///   templates: templates              # optional
/// output:
///   directory: output
/// ```
///
/// # Example
///
/// ```no_run
/// use billing_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/billing.yaml").unwrap();
/// println!("Billing month: {}", loader.billing_month());
/// println!("Attendance: {}", loader.attendance_path().display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BillingConfig,
    billing_month: BillingMonth,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/billing.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses a required field (`ConfigParseError`)
    /// - The month is outside 1..=12 or a tax rate is negative (`InvalidConfig`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use billing_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/billing.yaml")?;
    /// # Ok::<(), billing_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<BillingConfig>(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_config(config, base_dir)
    }

    /// Validates an already-deserialized configuration, resolving relative
    /// paths against `base_dir`.
    pub fn from_config(mut config: BillingConfig, base_dir: &Path) -> EngineResult<Self> {
        let billing_month = BillingMonth::new(config.billing.year, config.billing.month)?;
        Self::validate_rates(&config.tax)?;

        let inputs = &mut config.inputs;
        inputs.attendance = resolve(base_dir, &inputs.attendance);
        inputs.charges = resolve(base_dir, &inputs.charges);
        inputs.po_numbers = inputs.po_numbers.as_deref().map(|p| resolve(base_dir, p));
        inputs.templates = inputs.templates.as_deref().map(|p| resolve(base_dir, p));
        config.output.directory = resolve(base_dir, &config.output.directory);

        Ok(Self {
            config,
            billing_month,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_rates(rates: &TaxRates) -> EngineResult<()> {
        for (field, rate) in [
            ("tax.cgst", rates.cgst),
            ("tax.sgst", rates.sgst),
            ("tax.igst", rates.igst),
        ] {
            if rate < Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: field.to_string(),
                    message: format!("rate must not be negative, got {}", rate),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying (path-resolved) configuration.
    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Returns the month being billed.
    pub fn billing_month(&self) -> BillingMonth {
        self.billing_month
    }

    /// Returns the billing mode.
    pub fn mode(&self) -> BillingMode {
        self.config.billing.mode
    }

    /// Returns the tax rates.
    pub fn tax_rates(&self) -> TaxRates {
        self.config.tax
    }

    /// Returns the attendance table path.
    pub fn attendance_path(&self) -> &Path {
        &self.config.inputs.attendance
    }

    /// Returns the charge-rate table path.
    pub fn charges_path(&self) -> &Path {
        &self.config.inputs.charges
    }

    /// Returns the PO number table path, if configured.
    pub fn po_numbers_path(&self) -> Option<&Path> {
        self.config.inputs.po_numbers.as_deref()
    }

    /// Returns the bill template directory, if configured.
    pub fn templates_dir(&self) -> Option<&Path> {
        self.config.inputs.templates.as_deref()
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.config.output.directory
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/billing.yaml"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(yaml: &str) -> BillingConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    const MINIMAL: &str = r#"
billing:
  month: 2
  year: 2026
inputs:
  attendance: data/attendance.csv
  charges: /srv/charges.csv
output:
  directory: out
"#;

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.billing_month(), BillingMonth::new(2026, 2).unwrap());
        assert_eq!(loader.mode(), BillingMode::Recurring);
        assert_eq!(loader.tax_rates(), TaxRates::default());
        assert!(loader.attendance_path().ends_with("data/attendance.csv"));
        assert!(loader.attendance_path().exists());
        assert!(loader.charges_path().exists());
        assert!(loader.po_numbers_path().is_some_and(|p| p.exists()));
        assert!(loader.templates_dir().is_some_and(|p| p.is_dir()));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let loader = ConfigLoader::from_config(parse(MINIMAL), Path::new("/etc/billing")).unwrap();

        assert_eq!(
            loader.attendance_path(),
            Path::new("/etc/billing/data/attendance.csv")
        );
        assert_eq!(loader.charges_path(), Path::new("/srv/charges.csv"));
        assert_eq!(loader.output_dir(), Path::new("/etc/billing/out"));
        assert!(loader.po_numbers_path().is_none());
        assert!(loader.templates_dir().is_none());
    }

    #[test]
    fn test_invalid_month_returns_error() {
        let mut config = parse(MINIMAL);
        config.billing.month = 13;

        let result = ConfigLoader::from_config(config, Path::new("."));
        match result {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, "billing.month"),
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_returns_error() {
        let mut config = parse(MINIMAL);
        config.tax.igst = dec("-0.18");

        let result = ConfigLoader::from_config(config, Path::new("."));
        match result {
            Err(EngineError::InvalidConfig { field, message }) => {
                assert_eq!(field, "tax.igst");
                assert!(message.contains("-0.18"));
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/billing.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("billing.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_malformed_file_returns_parse_error() {
        let path = std::env::temp_dir().join(format!("billing-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, "billing: [not, a, map]\n").unwrap();

        let result = ConfigLoader::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
