//! Monte Carlo Simulation Module.
//!
//! Quantifies uncertainty around a base valuation by sampling five business
//! drivers per iteration and aggregating the resulting values.
//!
//! ```text
//!  SimulationParams ──┐
//!                     ├─► chunks (ChaCha8 per chunk) ─► rayon ─► samples
//!  ValuationInput ────┘                                            │
//!                                                                  ▼
//!            distribution · sensitivity · scenarios · risk ◄── sorted copy
//! ```
//!
//! Per-iteration value:
//! `base · (1+growth) · (1+margins) · min(revenue/market, 1) / (1+discount)`.
//!
//! # Usage
//!
//! ```ignore
//! use zero_valuation::monte_carlo::{run_monte_carlo, SimulationParams};
//!
//! let params = SimulationParams::default().with_seed(42);
//! let result = run_monte_carlo(&input, 1_000_000.0, &params)?;
//! println!("P(loss) = {:.1}%", result.risk.probability_of_loss * 100.0);
//! ```

pub mod engine;
pub mod types;

pub use engine::{default_variable, run_monte_carlo, MonteCarloEngine};
pub use types::{
    ConfidenceInterval, Distribution, Driver, RiskMetrics, Scenario, ScenarioLabel, Sensitivity,
    SimulationParams, SimulationResult, SimulationVariable, DEFAULT_CHUNK_SIZE, DEFAULT_ITERATIONS,
};
