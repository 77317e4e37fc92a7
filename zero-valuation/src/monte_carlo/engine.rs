//! Monte Carlo simulation engine.
//!
//! Iterations are grouped into fixed-size chunks. Chunk `i` owns a ChaCha8
//! stream seeded from `(seed, i)`, chunks run on the rayon pool, and their
//! samples are concatenated in chunk order. The result therefore depends on
//! the seed and chunk size only, never on the number of worker threads.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;

use super::types::{
    ConfidenceInterval, Distribution, Driver, RiskMetrics, Scenario, ScenarioLabel, Sensitivity,
    SimulationParams, SimulationResult, SimulationVariable,
};
use crate::error::{Result, ValuationError};
use crate::stats;
use crate::types::ValuationInput;

const DRIVERS: usize = Driver::ALL.len();

/// Lower bound of the discount denominator `1 + d`
const MIN_DISCOUNT_FACTOR: f64 = 0.01;

const SCENARIO_PERCENTILES: [(ScenarioLabel, f64); 3] = [
    (ScenarioLabel::Pessimistic, 0.05),
    (ScenarioLabel::Base, 0.50),
    (ScenarioLabel::Optimistic, 0.95),
];

const VAR_PERCENTILE: f64 = 0.05;

// ============================================================================
// Variable Resolution
// ============================================================================

/// Default driver distributions derived from the input and base value.
pub fn default_variable(driver: Driver, input: &ValuationInput, base_value: f64) -> SimulationVariable {
    match driver {
        Driver::Revenue => SimulationVariable::relative(input.revenue.unwrap_or(base_value), 0.20),
        Driver::Margins => SimulationVariable::new(input.operating_margin.unwrap_or(0.15), 0.05),
        Driver::GrowthRate => SimulationVariable::new(input.growth_rate.unwrap_or(0.20), 0.10),
        Driver::MarketSize => {
            SimulationVariable::relative(input.market_size.unwrap_or(1.5 * base_value), 0.25)
        }
        Driver::DiscountRate => SimulationVariable::new(0.12, 0.02),
    }
}

fn resolve_variables(
    input: &ValuationInput,
    base_value: f64,
    params: &SimulationParams,
) -> Result<[SimulationVariable; DRIVERS]> {
    let mut vars = [SimulationVariable::new(0.0, 0.0); DRIVERS];
    for (slot, driver) in vars.iter_mut().zip(Driver::ALL) {
        let var = params
            .variable(driver)
            .unwrap_or_else(|| default_variable(driver, input, base_value));
        if !var.mean.is_finite() {
            return Err(ValuationError::invalid(driver.key(), "mean must be finite"));
        }
        if !var.std_dev.is_finite() || var.std_dev < 0.0 {
            return Err(ValuationError::invalid(
                driver.key(),
                "standard deviation must be finite and non-negative",
            ));
        }
        *slot = var;
    }
    Ok(vars)
}

// ============================================================================
// Sampling
// ============================================================================

/// One iteration: the simulated value plus each driver's deviation from its mean.
#[derive(Debug, Clone, Copy)]
struct Sample {
    value: f64,
    impacts: [f64; DRIVERS],
}

/// Derive an independent stream seed for one chunk (splitmix64 finalizer).
fn chunk_seed(seed: u64, chunk: u64) -> u64 {
    let mut z = seed.wrapping_add(chunk.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Composite valuation for one draw of the five drivers.
fn composite_value(base_value: f64, draws: &[f64; DRIVERS]) -> f64 {
    let [revenue, margins, growth, market, discount] = *draws;
    let share = if market <= 0.0 {
        1.0
    } else {
        (revenue / market).min(1.0)
    };
    base_value * (1.0 + growth) * (1.0 + margins) * share / (1.0 + discount).max(MIN_DISCOUNT_FACTOR)
}

fn simulate_iteration<R: Rng + ?Sized>(
    base_value: f64,
    vars: &[SimulationVariable; DRIVERS],
    rng: &mut R,
) -> Sample {
    let mut draws = [0.0; DRIVERS];
    let mut impacts = [0.0; DRIVERS];
    for (i, var) in vars.iter().enumerate() {
        draws[i] = stats::sample_normal(var.mean, var.std_dev, rng);
        impacts[i] = draws[i] - var.mean;
    }
    Sample {
        value: composite_value(base_value, &draws),
        impacts,
    }
}

fn simulate_chunk(
    seed: u64,
    chunk: usize,
    len: usize,
    base_value: f64,
    vars: &[SimulationVariable; DRIVERS],
) -> Vec<Sample> {
    let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(seed, chunk as u64));
    (0..len)
        .map(|_| simulate_iteration(base_value, vars, &mut rng))
        .collect()
}

// ============================================================================
// Engine
// ============================================================================

/// Monte Carlo engine bound to one set of simulation parameters.
pub struct MonteCarloEngine {
    params: SimulationParams,
}

impl MonteCarloEngine {
    pub fn new() -> Self {
        Self {
            params: SimulationParams::default(),
        }
    }

    pub fn with_params(params: SimulationParams) -> Self {
        Self { params }
    }

    /// Simulate the valuation distribution around `base_value`.
    pub fn run(&self, input: &ValuationInput, base_value: f64) -> Result<SimulationResult> {
        let params = &self.params;
        if params.iterations == 0 {
            return Err(ValuationError::ZeroIterations);
        }
        if params.chunk_size == 0 {
            return Err(ValuationError::invalid("chunkSize", "must be positive"));
        }
        if !base_value.is_finite() {
            return Err(ValuationError::invalid("baseValue", "must be a finite number"));
        }
        let vars = resolve_variables(input, base_value, params)?;

        let seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let iterations = params.iterations;
        let chunk_size = params.chunk_size;
        let chunks = iterations.div_ceil(chunk_size);

        tracing::debug!(iterations, chunks, seed, base_value, "Starting Monte Carlo run");

        let samples: Vec<Sample> = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let len = chunk_size.min(iterations - chunk * chunk_size);
                simulate_chunk(seed, chunk, len, base_value, &vars)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let result = summarize(base_value, seed, &samples);
        tracing::debug!(
            mean = result.distribution.mean,
            p_loss = result.risk.probability_of_loss,
            "Monte Carlo run complete"
        );
        Ok(result)
    }
}

impl Default for MonteCarloEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a Monte Carlo simulation around `base_value`.
pub fn run_monte_carlo(
    input: &ValuationInput,
    base_value: f64,
    params: &SimulationParams,
) -> Result<SimulationResult> {
    MonteCarloEngine::with_params(params.clone()).run(input, base_value)
}

// ============================================================================
// Aggregation
// ============================================================================

fn summarize(base_value: f64, seed: u64, samples: &[Sample]) -> SimulationResult {
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

    // Stable sort keeps insertion order among equal values
    let mut ranked: Vec<&Sample> = samples.iter().collect();
    ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
    let sorted: Vec<f64> = ranked.iter().map(|s| s.value).collect();

    let sd_results = stats::std_dev(&values);
    let distribution = Distribution {
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
        mean: stats::mean(&values),
        median: stats::median(&sorted),
        std_dev: sd_results,
        ci95: ConfidenceInterval {
            lower: stats::percentile(&sorted, 0.025),
            upper: stats::percentile(&sorted, 0.975),
        },
    };

    let mut sensitivity: Vec<Sensitivity> = Driver::ALL
        .iter()
        .enumerate()
        .map(|(i, &variable)| {
            let impacts: Vec<f64> = samples.iter().map(|s| s.impacts[i]).collect();
            let correlation = stats::correlation(&impacts, &values);
            let impact = if sd_results > 0.0 {
                stats::std_dev(&impacts) / sd_results * correlation
            } else {
                0.0
            };
            Sensitivity {
                variable,
                impact,
                correlation,
            }
        })
        .collect();
    sensitivity.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));

    let scenarios = SCENARIO_PERCENTILES
        .iter()
        .map(|&(label, p)| {
            let sample = ranked[stats::percentile_index(ranked.len(), p)];
            Scenario {
                label,
                percentile: p,
                probability: 1.0 - p,
                value: sample.value,
                driver_snapshot: Driver::ALL
                    .iter()
                    .copied()
                    .zip(sample.impacts)
                    .collect::<BTreeMap<_, _>>(),
            }
        })
        .collect();

    SimulationResult {
        base_value,
        iterations: samples.len(),
        seed,
        distribution,
        sensitivity,
        scenarios,
        risk: risk_metrics(base_value, &sorted),
    }
}

fn risk_metrics(base_value: f64, sorted: &[f64]) -> RiskMetrics {
    let cutoff = stats::percentile(sorted, VAR_PERCENTILE);
    let tail: Vec<f64> = sorted
        .iter()
        .take_while(|v| **v < cutoff)
        .map(|v| (base_value - v).max(0.0))
        .collect();
    let below_base = sorted.iter().take_while(|v| **v < base_value).count();

    RiskMetrics {
        value_at_risk: (base_value - cutoff).max(0.0),
        expected_shortfall: stats::mean(&tail),
        probability_of_loss: if sorted.is_empty() {
            0.0
        } else {
            below_base as f64 / sorted.len() as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(iterations: usize, seed: u64) -> SimulationParams {
        SimulationParams::default()
            .with_iterations(iterations)
            .with_seed(seed)
    }

    fn input() -> ValuationInput {
        ValuationInput {
            revenue: Some(800_000.0),
            operating_margin: Some(0.1),
            growth_rate: Some(0.4),
            market_size: Some(5_000_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let a = run_monte_carlo(&input(), 1_000_000.0, &params(5_000, 42)).unwrap();
        let b = run_monte_carlo(&input(), 1_000_000.0, &params(5_000, 42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = run_monte_carlo(&input(), 1_000_000.0, &params(2_000, 1)).unwrap();
        let b = run_monte_carlo(&input(), 1_000_000.0, &params(2_000, 2)).unwrap();
        assert_ne!(a.distribution.mean, b.distribution.mean);
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let run = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| run_monte_carlo(&input(), 2_000_000.0, &params(7_500, 9)).unwrap())
        };
        assert_eq!(run(1), run(4));
    }

    #[test]
    fn test_unseeded_run_reports_replayable_seed() {
        let first = run_monte_carlo(
            &input(),
            1_000_000.0,
            &SimulationParams::default().with_iterations(1_500),
        )
        .unwrap();
        let replay =
            run_monte_carlo(&input(), 1_000_000.0, &params(1_500, first.seed)).unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_percentile_ordering() {
        let result = run_monte_carlo(&input(), 1_000_000.0, &params(10_000, 7)).unwrap();
        let d = result.distribution;
        assert!(d.min <= d.ci95.lower);
        assert!(d.ci95.lower <= d.median);
        assert!(d.median <= d.ci95.upper);
        assert!(d.ci95.upper <= d.max);

        let values: Vec<f64> = result.scenarios.iter().map(|s| s.value).collect();
        assert!(values[0] <= values[1] && values[1] <= values[2]);
        assert_eq!(result.iterations, 10_000);
    }

    #[test]
    fn test_default_scenario_risk_bounds() {
        let result =
            run_monte_carlo(&ValuationInput::default(), 1_000_000.0, &params(10_000, 2024)).unwrap();
        assert!((0.0..=1.0).contains(&result.risk.probability_of_loss));
        assert!(result.risk.value_at_risk >= 0.0);
        assert!(result.risk.expected_shortfall >= 0.0);
    }

    #[test]
    fn test_zero_std_dev_is_deterministic_value() {
        let fixed = SimulationParams {
            revenue: Some(SimulationVariable::new(1.0, 0.0)),
            margins: Some(SimulationVariable::new(0.1, 0.0)),
            growth_rate: Some(SimulationVariable::new(0.2, 0.0)),
            market_size: Some(SimulationVariable::new(2.0, 0.0)),
            discount_rate: Some(SimulationVariable::new(0.1, 0.0)),
            ..params(100, 3)
        };
        let result = run_monte_carlo(&input(), 1_000.0, &fixed).unwrap();
        let expected = 1_000.0 * 1.2 * 1.1 * 0.5 / 1.1;
        assert!((result.distribution.min - expected).abs() < 1e-9);
        assert!((result.distribution.max - expected).abs() < 1e-9);
        assert!(result.distribution.std_dev.abs() < 1e-9);
        assert!(result.sensitivity.iter().all(|s| s.impact == 0.0));
        assert_eq!(result.risk.expected_shortfall, 0.0);
    }

    #[test]
    fn test_scenario_probabilities_and_snapshots() {
        let result = run_monte_carlo(&input(), 1_000_000.0, &params(1_000, 11)).unwrap();
        let pessimistic = result.scenario(ScenarioLabel::Pessimistic).unwrap();
        assert!((pessimistic.probability - 0.95).abs() < 1e-12);
        assert_eq!(pessimistic.driver_snapshot.len(), DRIVERS);
        let optimistic = result.scenario(ScenarioLabel::Optimistic).unwrap();
        assert!((optimistic.probability - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_sensitivity_sorted_by_magnitude() {
        let result = run_monte_carlo(&input(), 1_000_000.0, &params(5_000, 5)).unwrap();
        let magnitudes: Vec<f64> = result.sensitivity.iter().map(|s| s.impact.abs()).collect();
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));
        assert!(result
            .sensitivity
            .iter()
            .all(|s| (-1.0..=1.0).contains(&s.correlation)));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert_eq!(
            run_monte_carlo(&input(), 1_000_000.0, &params(0, 1)).unwrap_err(),
            ValuationError::ZeroIterations
        );
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let bad = SimulationParams {
            growth_rate: Some(SimulationVariable::new(0.2, -0.1)),
            ..params(100, 1)
        };
        let err = run_monte_carlo(&input(), 1_000_000.0, &bad).unwrap_err();
        assert!(err.is_input_shape());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let bad = SimulationParams {
            chunk_size: 0,
            ..params(100, 1)
        };
        assert!(run_monte_carlo(&input(), 1_000_000.0, &bad).is_err());
    }

    #[test]
    fn test_chunk_seeds_are_distinct() {
        let seeds: std::collections::HashSet<u64> = (0..1_000).map(|i| chunk_seed(42, i)).collect();
        assert_eq!(seeds.len(), 1_000);
    }
}
