//! Seed bottom-up model driven by recurring revenue and unit economics.

use std::collections::BTreeMap;

use super::types::{risk_adjusted_confidence, StageContext, StageModel, StageValuation};
use crate::error::{Result, ValuationError};
use crate::types::{Severity, ValidationWarning, ValuationInput};

const MIN_MRR: f64 = 10_000.0;
const MIN_CHURN: f64 = 0.01;
/// Annual revenue multiple before growth and churn adjustment
const BASE_MULTIPLE: f64 = 12.0;
const MAX_CAC_LTV_RATIO: f64 = 0.3;
const BASE_CONFIDENCE: f64 = 0.8;
const CAC_WARNING_CONFIDENCE_FACTOR: f64 = 0.8;

pub struct SeedModel;

impl SeedModel {
    /// Monthly growth equivalent to an annual rate.
    pub fn monthly_growth(annual: f64) -> f64 {
        (1.0 + annual).powf(1.0 / 12.0) - 1.0
    }

    /// `mrr·(1+g)^12 · 12·(1+g)/churn`
    pub fn bottom_up_value(mrr: f64, monthly_growth: f64, churn: f64) -> f64 {
        let annual_revenue = mrr * (1.0 + monthly_growth).powi(12);
        let multiple = BASE_MULTIPLE * (1.0 + monthly_growth) / churn;
        annual_revenue * multiple
    }
}

impl StageModel for SeedModel {
    fn name(&self) -> &'static str {
        "Seed Bottom-up DCF"
    }

    fn calculate(&self, input: &ValuationInput, _ctx: &StageContext) -> Result<StageValuation> {
        let mrr = input
            .monthly_revenue()
            .ok_or(ValuationError::MissingInput("mrr"))?;
        if mrr < MIN_MRR {
            return Err(ValuationError::invalid(
                "mrr",
                format!("{mrr:.0} is below the seed minimum of {MIN_MRR:.0}"),
            ));
        }

        let annual_growth = input
            .growth_rate
            .ok_or(ValuationError::MissingInput("growthRate"))?;
        let growth = Self::monthly_growth(annual_growth);
        if !(0.0..=1.0).contains(&growth) {
            return Err(ValuationError::invalid(
                "growthRate",
                "monthly equivalent must be within [0, 1]",
            ));
        }

        let churn = input
            .churn_rate
            .ok_or(ValuationError::MissingInput("churnRate"))?;
        if !(MIN_CHURN..=1.0).contains(&churn) {
            return Err(ValuationError::invalid(
                "churnRate",
                format!("monthly churn must be within [{MIN_CHURN}, 1]"),
            ));
        }

        let cac = input.cac.ok_or(ValuationError::MissingInput("cac"))?;
        let ltv = input.ltv.ok_or(ValuationError::MissingInput("ltv"))?;
        if cac < 0.0 || ltv < 0.0 {
            return Err(ValuationError::invalid("cac", "unit economics must be non-negative"));
        }

        let mut warnings = Vec::new();
        let mut base_confidence = BASE_CONFIDENCE;
        let ratio = if ltv > 0.0 { cac / ltv } else { f64::INFINITY };
        if ratio > MAX_CAC_LTV_RATIO {
            warnings.push(
                ValidationWarning::new(
                    "cac",
                    format!("CAC/LTV ratio of {ratio:.2} exceeds the recommended maximum of 0.3"),
                    Severity::Medium,
                )
                .with_suggestion("Reduce acquisition cost or improve retention before scaling"),
            );
            base_confidence *= CAC_WARNING_CONFIDENCE_FACTOR;
        }

        let mut risk_factors = BTreeMap::new();
        risk_factors.insert("churnRisk".to_string(), (churn * 12.0).min(1.0));
        risk_factors.insert("growthSustainability".to_string(), 1.0 / (1.0 + growth));
        risk_factors.insert(
            "unitEconomics".to_string(),
            if ltv > 0.0 { cac / ltv } else { 1.0 },
        );

        Ok(StageValuation {
            value: Self::bottom_up_value(mrr, growth, churn),
            confidence: risk_adjusted_confidence(base_confidence, &risk_factors),
            methodology: self.name().to_string(),
            risk_factors,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ValuationInput {
        ValuationInput {
            mrr: Some(50_000.0),
            growth_rate: Some(1.0),
            churn_rate: Some(0.02),
            cac: Some(500.0),
            ltv: Some(5_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_bottom_up_value() {
        // no growth: 12 * mrr * 12 / churn
        let value = SeedModel::bottom_up_value(20_000.0, 0.0, 0.05);
        assert!((value - 20_000.0 * 12.0 * 240.0).abs() < 1e-6);
    }

    #[test]
    fn test_monthly_growth_compounds_to_annual() {
        let g = SeedModel::monthly_growth(1.0);
        assert!(((1.0 + g).powi(12) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_healthy_unit_economics() {
        let result = SeedModel.calculate(&input(), &StageContext::default()).unwrap();
        assert!(result.warnings.is_empty());
        let g = SeedModel::monthly_growth(1.0);
        let risks = [0.24, 1.0 / (1.0 + g), 0.1];
        let expected = 0.8 * (1.0 - risks.iter().sum::<f64>() / 3.0);
        assert!((result.confidence - expected).abs() < 1e-9);
        // mrr doubles over the year
        let expected_value = 100_000.0 * 12.0 * (1.0 + g) / 0.02;
        assert!((result.value - expected_value).abs() < 1e-3);
    }

    #[test]
    fn test_expensive_acquisition_reduces_confidence() {
        let healthy = SeedModel.calculate(&input(), &StageContext::default()).unwrap();
        let costly = ValuationInput {
            cac: Some(2_500.0),
            ..input()
        };
        let result = SeedModel.calculate(&costly, &StageContext::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.confidence < healthy.confidence);
    }

    #[test]
    fn test_minimum_mrr() {
        let small = ValuationInput {
            mrr: Some(5_000.0),
            ..input()
        };
        assert!(SeedModel
            .calculate(&small, &StageContext::default())
            .unwrap_err()
            .is_input_shape());
    }

    #[test]
    fn test_churn_bounds() {
        let no_churn = ValuationInput {
            churn_rate: Some(0.0),
            ..input()
        };
        assert!(SeedModel.calculate(&no_churn, &StageContext::default()).is_err());
    }
}
