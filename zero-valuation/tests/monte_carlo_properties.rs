//! Property tests for the Monte Carlo engine.

use proptest::prelude::*;

use zero_valuation::monte_carlo::{ScenarioLabel, SimulationVariable};
use zero_valuation::{run_monte_carlo, SimulationParams, ValuationInput};

fn input() -> ValuationInput {
    ValuationInput {
        revenue: Some(1_200_000.0),
        growth_rate: Some(0.5),
        operating_margin: Some(0.1),
        market_size: Some(8_000_000.0),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn seeded_runs_are_identical(seed in any::<u64>(), iterations in 1usize..600, chunk in 1usize..128) {
        let params = SimulationParams {
            iterations,
            seed: Some(seed),
            chunk_size: chunk,
            ..Default::default()
        };
        let a = run_monte_carlo(&input(), 2e6, &params).unwrap();
        let b = run_monte_carlo(&input(), 2e6, &params).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn percentiles_are_ordered(seed in any::<u64>(), iterations in 1usize..800, base in 1e4f64..1e8) {
        let params = SimulationParams::default()
            .with_iterations(iterations)
            .with_seed(seed);
        let result = run_monte_carlo(&input(), base, &params).unwrap();
        let d = result.distribution;

        prop_assert!(d.min <= d.ci95.lower);
        prop_assert!(d.ci95.lower <= d.median || iterations < 2);
        prop_assert!(d.median <= d.ci95.upper || iterations < 2);
        prop_assert!(d.ci95.upper <= d.max);
        prop_assert!((0.0..=1.0).contains(&result.risk.probability_of_loss));
        prop_assert!(result.risk.value_at_risk >= 0.0);
        prop_assert!(result.risk.expected_shortfall >= 0.0);

        let p = result.scenario(ScenarioLabel::Pessimistic).unwrap().value;
        let b = result.scenario(ScenarioLabel::Base).unwrap().value;
        let o = result.scenario(ScenarioLabel::Optimistic).unwrap().value;
        prop_assert!(p <= b && b <= o);
    }

    #[test]
    fn degenerate_variables_give_point_mass(seed in any::<u64>(), mean_growth in -0.5f64..2.0) {
        let params = SimulationParams {
            iterations: 50,
            seed: Some(seed),
            revenue: Some(SimulationVariable::new(1.0, 0.0)),
            margins: Some(SimulationVariable::new(0.0, 0.0)),
            growth_rate: Some(SimulationVariable::new(mean_growth, 0.0)),
            market_size: Some(SimulationVariable::new(1.0, 0.0)),
            discount_rate: Some(SimulationVariable::new(0.0, 0.0)),
            ..Default::default()
        };
        let result = run_monte_carlo(&input(), 1_000.0, &params).unwrap();
        let expected = 1_000.0 * (1.0 + mean_growth);
        prop_assert!((result.distribution.min - expected).abs() < 1e-9);
        prop_assert!((result.distribution.max - expected).abs() < 1e-9);
    }
}
