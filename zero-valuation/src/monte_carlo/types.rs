//! Monte Carlo simulation types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default number of iterations.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Default iterations per independently seeded chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

// ============================================================================
// Inputs
// ============================================================================

/// A normally distributed driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationVariable {
    pub mean: f64,
    /// Must be non-negative; zero yields the mean exactly
    pub std_dev: f64,
}

impl SimulationVariable {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Standard deviation as a fraction of the mean's magnitude.
    pub fn relative(mean: f64, fraction: f64) -> Self {
        Self {
            mean,
            std_dev: mean.abs() * fraction,
        }
    }
}

/// The five simulated drivers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Driver {
    Revenue,
    Margins,
    GrowthRate,
    MarketSize,
    DiscountRate,
}

impl Driver {
    /// Draw order per iteration.
    pub const ALL: [Driver; 5] = [
        Driver::Revenue,
        Driver::Margins,
        Driver::GrowthRate,
        Driver::MarketSize,
        Driver::DiscountRate,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Margins => "margins",
            Self::GrowthRate => "growthRate",
            Self::MarketSize => "marketSize",
            Self::DiscountRate => "discountRate",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Simulation request. Absent variables are derived from the valuation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationParams {
    pub iterations: usize,
    /// Fixed seed for replayable runs; `None` draws one from the OS-seeded thread RNG
    pub seed: Option<u64>,
    pub chunk_size: usize,
    pub revenue: Option<SimulationVariable>,
    pub margins: Option<SimulationVariable>,
    pub growth_rate: Option<SimulationVariable>,
    pub market_size: Option<SimulationVariable>,
    pub discount_rate: Option<SimulationVariable>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            revenue: None,
            margins: None,
            growth_rate: None,
            market_size: None,
            discount_rate: None,
        }
    }
}

impl SimulationParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Caller-provided override for one driver, if any.
    pub fn variable(&self, driver: Driver) -> Option<SimulationVariable> {
        match driver {
            Driver::Revenue => self.revenue,
            Driver::Margins => self.margins,
            Driver::GrowthRate => self.growth_rate,
            Driver::MarketSize => self.market_size,
            Driver::DiscountRate => self.discount_rate,
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Summary statistics of the simulated values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub ci95: ConfidenceInterval,
}

/// Contribution of one driver to the spread of results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensitivity {
    pub variable: Driver,
    /// `(sd(impacts) / sd(results)) · correlation`
    pub impact: f64,
    pub correlation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioLabel {
    Pessimistic,
    Base,
    Optimistic,
}

/// A representative outcome at a fixed percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub label: ScenarioLabel,
    pub percentile: f64,
    /// Probability of doing at least this well: `1 − percentile`
    pub probability: f64,
    pub value: f64,
    /// Per-driver impact (sample minus mean) of the iteration at this percentile
    pub driver_snapshot: BTreeMap<Driver, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// `max(0, base − p5)`
    pub value_at_risk: f64,
    /// Mean shortfall below base over the worst 5% of outcomes
    pub expected_shortfall: f64,
    /// Fraction of outcomes below the base value
    pub probability_of_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub base_value: f64,
    pub iterations: usize,
    /// Seed actually used; replaying with it reproduces this result exactly
    pub seed: u64,
    pub distribution: Distribution,
    pub sensitivity: Vec<Sensitivity>,
    pub scenarios: Vec<Scenario>,
    pub risk: RiskMetrics,
}

impl SimulationResult {
    pub fn scenario(&self, label: ScenarioLabel) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.label == label)
    }
}
