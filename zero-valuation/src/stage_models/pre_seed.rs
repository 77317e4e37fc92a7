//! Pre-seed scorecard model: market size blended with team strength.

use std::collections::BTreeMap;

use super::types::{StageContext, StageModel, StageValuation};
use crate::error::{Result, ValuationError};
use crate::scorecard::{location_multiplier, Factor};
use crate::types::ValuationInput;

const TAM_WEIGHT: f64 = 0.4;
const TEAM_WEIGHT: f64 = 0.6;
/// Value of a perfect team score
const TEAM_UNIT_VALUE: f64 = 1_000_000.0;

pub struct PreSeedModel;

impl PreSeedModel {
    /// `0.4·TAM + 0.6·team·1M`
    pub fn scorecard_value(tam: f64, team_score: f64) -> f64 {
        tam * TAM_WEIGHT + team_score * TEAM_UNIT_VALUE * TEAM_WEIGHT
    }

    /// Share of the market not yet captured; 1 when the market is unknown.
    pub fn market_risk(traction: f64, tam: f64) -> f64 {
        let penetration = if tam > 0.0 { traction / tam } else { 0.0 };
        1.0 - penetration.min(1.0)
    }

    /// Management factor score rescaled to [0, 1].
    pub fn team_score(input: &ValuationInput) -> f64 {
        let (_, max) = Factor::Management.band();
        let score = Factor::Management.score(input, location_multiplier(input.location.as_deref()));
        (f64::from(score) / f64::from(max)).clamp(0.0, 1.0)
    }
}

impl StageModel for PreSeedModel {
    fn name(&self) -> &'static str {
        "Pre-Seed Scorecard"
    }

    fn calculate(&self, input: &ValuationInput, _ctx: &StageContext) -> Result<StageValuation> {
        let tam = input
            .market_size
            .ok_or(ValuationError::MissingInput("marketSize"))?;
        let team_score = Self::team_score(input);
        let traction = input.revenue.unwrap_or(0.0);

        let market_risk = Self::market_risk(traction, tam);
        let mut risk_factors = BTreeMap::new();
        risk_factors.insert("marketRisk".to_string(), market_risk);
        risk_factors.insert("executionRisk".to_string(), 1.0 - team_score);

        let confidence = (0.7 * (1.0 - market_risk) + 0.3 * team_score).clamp(0.0, 1.0);

        Ok(StageValuation {
            value: Self::scorecard_value(tam, team_score),
            confidence,
            methodology: self.name().to_string(),
            risk_factors,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorecard_value() {
        // 5M * 0.4 + 0.8 * 1M * 0.6
        let value = PreSeedModel::scorecard_value(5_000_000.0, 0.8);
        assert!((value - 2_480_000.0).abs() < 0.01);
    }

    #[test]
    fn test_market_risk() {
        assert!((PreSeedModel::market_risk(100_000.0, 5_000_000.0) - 0.98).abs() < 1e-12);
        assert_eq!(PreSeedModel::market_risk(10.0, 0.0), 1.0);
        assert_eq!(PreSeedModel::market_risk(10.0, 5.0), 0.0);
    }

    #[test]
    fn test_calculate() {
        let input = ValuationInput {
            market_size: Some(5_000_000.0),
            revenue: Some(100_000.0),
            founders_count: Some(2),
            employee_count: Some(12),
            has_key_hires: true,
            ..Default::default()
        };
        let result = PreSeedModel.calculate(&input, &StageContext::default()).unwrap();
        // management 50 + 15 + 10 + 15 = 90
        let team = 90.0 / 130.0;
        assert!((result.value - PreSeedModel::scorecard_value(5_000_000.0, team)).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(result.risk_factors.values().all(|r| (0.0..=1.0).contains(r)));
        assert_eq!(result.methodology, "Pre-Seed Scorecard");
    }

    #[test]
    fn test_market_size_required() {
        let err = PreSeedModel
            .calculate(&ValuationInput::default(), &StageContext::default())
            .unwrap_err();
        assert_eq!(err, ValuationError::MissingInput("marketSize"));
    }
}
