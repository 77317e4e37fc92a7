//! Configuration management for the valuation engine.
//!
//! The engine reads a single configuration file at `~/.zero-valuation/config.json`.
//! Every section is optional; missing values fall back to defaults.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ZERO_VALUATION_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ZERO_VALUATION_LOG_LEVEL` → observability.log_level
//! - `ZERO_VALUATION_LOG_FORMAT` → observability.log_format
//! - `ZERO_VALUATION_ITERATIONS` → engine.iterations
//! - `ZERO_VALUATION_SEED` → engine.seed
//! - `ZERO_VALUATION_TIMEOUT_SECS` → engine.timeout_secs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".zero-valuation"),
        |dirs| dirs.home_dir().join(".zero-valuation"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for the valuation engine and its CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Simulation and orchestration settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Discounted cash flow market assumptions
    #[serde(default)]
    pub dcf: DcfConfig,

    /// Peer revenue multiples per sector, overriding the built-in table
    #[serde(default)]
    pub comparables: ComparablesConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides applied.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("ZERO_VALUATION_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("ZERO_VALUATION_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(iterations) = std::env::var("ZERO_VALUATION_ITERATIONS") {
            match iterations.parse() {
                Ok(n) => self.engine.iterations = n,
                Err(_) => tracing::warn!(value = %iterations, "Ignoring invalid ZERO_VALUATION_ITERATIONS"),
            }
        }
        if let Ok(seed) = std::env::var("ZERO_VALUATION_SEED") {
            match seed.parse() {
                Ok(s) => self.engine.seed = Some(s),
                Err(_) => tracing::warn!(value = %seed, "Ignoring invalid ZERO_VALUATION_SEED"),
            }
        }
        if let Ok(timeout) = std::env::var("ZERO_VALUATION_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(t) => self.engine.timeout_secs = t,
                Err(_) => tracing::warn!(value = %timeout, "Ignoring invalid ZERO_VALUATION_TIMEOUT_SECS"),
            }
        }
    }
}

// ============================================================================
// Observability
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to set to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Simulation and orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Monte Carlo iterations per run
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Fixed seed for reproducible runs (None = fresh seed per run)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Iterations per independently seeded work chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Deadline for a full evaluation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            seed: None,
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============================================================================
// DCF
// ============================================================================

/// Market assumptions for the discounted cash flow method.
///
/// All rates are fractions (0.03 = 3%).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfConfig {
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_market_risk_premium")]
    pub market_risk_premium: f64,
    /// Pre-tax cost of debt
    #[serde(default = "default_cost_of_debt")]
    pub cost_of_debt: f64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    /// Debt share of total capital (D/V)
    #[serde(default = "default_debt_ratio")]
    pub debt_ratio: f64,
    #[serde(default = "default_terminal_growth_rate")]
    pub terminal_growth_rate: f64,
}

impl Default for DcfConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            beta: default_beta(),
            market_risk_premium: default_market_risk_premium(),
            cost_of_debt: default_cost_of_debt(),
            tax_rate: default_tax_rate(),
            debt_ratio: default_debt_ratio(),
            terminal_growth_rate: default_terminal_growth_rate(),
        }
    }
}

// ============================================================================
// Comparables
// ============================================================================

/// Sector-keyed EV/Revenue multiples.
///
/// Keys are sector names as they appear in valuation input (`saas`, `fintech`, ...).
/// An empty map means the built-in table is used unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparablesConfig {
    pub sectors: BTreeMap<String, Vec<f64>>,
}

impl ComparablesConfig {
    /// Multiples configured for a sector, if any.
    pub fn for_sector(&self, sector: &str) -> Option<&[f64]> {
        self.sectors
            .get(&sector.to_ascii_lowercase())
            .map(Vec::as_slice)
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}
fn default_iterations() -> usize {
    10_000
}
fn default_chunk_size() -> usize {
    1_000
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_risk_free_rate() -> f64 {
    0.03
}
fn default_beta() -> f64 {
    1.5
}
fn default_market_risk_premium() -> f64 {
    0.055
}
fn default_cost_of_debt() -> f64 {
    0.08
}
fn default_tax_rate() -> f64 {
    0.25
}
fn default_debt_ratio() -> f64 {
    0.20
}
fn default_terminal_growth_rate() -> f64 {
    0.03
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.observability.log_format, "pretty");
        assert_eq!(config.engine.iterations, 10_000);
        assert_eq!(config.engine.chunk_size, 1_000);
        assert!(config.engine.seed.is_none());
        assert!((config.dcf.terminal_growth_rate - 0.03).abs() < 1e-12);
        assert!(config.comparables.sectors.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "engine": { "iterations": 500, "seed": 42 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.engine.iterations, 500);
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.engine.chunk_size, 1_000);
        assert_eq!(config.engine.timeout_secs, 30);
        assert!((config.dcf.beta - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_observability_aliases() {
        let json = r#"{ "observability": { "level": "debug", "format": "json" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, "json");
    }

    #[test]
    fn test_comparables_lookup_is_case_insensitive() {
        let json = r#"{ "comparables": { "saas": [6.0, 8.0, 10.0] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.comparables.for_sector("SaaS"), Some(&[6.0, 8.0, 10.0][..]));
        assert!(config.comparables.for_sector("fintech").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dcf": {{ "beta": 1.0, "debtRatio": 0.0 }} }}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!((config.dcf.beta - 1.0).abs() < 1e-12);
        assert!(config.dcf.debt_ratio.abs() < 1e-12);
        assert!((config.dcf.risk_free_rate - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
