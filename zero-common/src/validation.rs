//! Configuration validation.
//!
//! Ensures every configured value is within the range the engine can use
//! before any evaluation runs.

use thiserror::Error;

use crate::config::{ComparablesConfig, Config, DcfConfig, EngineConfig, ObservabilityConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }
        if let Err(e) = self.engine.validate() {
            errors.push(e);
        }
        if let Err(e) = self.dcf.validate() {
            errors.push(e);
        }
        if let Err(e) = self.comparables.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.logLevel".into(),
                reason: format!("must be one of {}", LEVELS.join(", ")),
            });
        }
        if self.log_format != "json" && self.log_format != "pretty" {
            return Err(ValidationError::InvalidValue {
                field: "observability.logFormat".into(),
                reason: "must be \"json\" or \"pretty\"".into(),
            });
        }
        Ok(())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.iterations == 0 {
            return Err(ValidationError::InvalidValue {
                field: "engine.iterations".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.chunk_size == 0 {
            return Err(ValidationError::InvalidValue {
                field: "engine.chunkSize".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "engine.timeoutSecs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

impl Validate for DcfConfig {
    fn validate(&self) -> ValidationResult<()> {
        let rates = [
            ("dcf.riskFreeRate", self.risk_free_rate),
            ("dcf.marketRiskPremium", self.market_risk_premium),
            ("dcf.costOfDebt", self.cost_of_debt),
            ("dcf.terminalGrowthRate", self.terminal_growth_rate),
        ];
        for (field, value) in rates {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("{value} is outside [-1, 1]"),
                });
            }
        }

        let ratios = [("dcf.taxRate", self.tax_rate), ("dcf.debtRatio", self.debt_ratio)];
        for (field, value) in ratios {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }

        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "dcf.beta".into(),
                reason: "must be a non-negative number".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ComparablesConfig {
    fn validate(&self) -> ValidationResult<()> {
        for (sector, multiples) in &self.sectors {
            if multiples.is_empty() {
                return Err(ValidationError::MissingField {
                    field: format!("comparables.{sector}"),
                });
            }
            if multiples.iter().any(|m| !m.is_finite() || *m <= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("comparables.{sector}"),
                    reason: "multiples must be positive numbers".into(),
                });
            }
        }
        Ok(())
    }
}
