//! Series A hybrid: weighted blend of the DCF and comparable values.

use std::collections::BTreeMap;

use super::types::{risk_adjusted_confidence, StageContext, StageModel, StageValuation};
use crate::error::{Result, ValuationError};
use crate::types::ValuationInput;

const DCF_WEIGHT: f64 = 0.6;
const COMPARABLE_WEIGHT: f64 = 0.4;
/// WACC treated as a fully risky cost of capital
const HIGH_WACC: f64 = 0.15;
const BASE_CONFIDENCE: f64 = 0.9;

pub struct SeriesAModel;

impl SeriesAModel {
    pub fn hybrid_value(dcf: f64, comparable: f64) -> f64 {
        dcf * DCF_WEIGHT + comparable * COMPARABLE_WEIGHT
    }

    /// Relative gap between the two inputs; 1 when neither is positive.
    pub fn divergence(dcf: f64, comparable: f64) -> f64 {
        let scale = dcf.max(comparable);
        if scale <= 0.0 {
            1.0
        } else {
            (dcf - comparable).abs() / scale
        }
    }
}

impl StageModel for SeriesAModel {
    fn name(&self) -> &'static str {
        "Series A Hybrid"
    }

    fn calculate(&self, _input: &ValuationInput, ctx: &StageContext) -> Result<StageValuation> {
        let (Some(dcf), Some(comparable)) = (ctx.dcf_value, ctx.comparable_value) else {
            return Err(ValuationError::InsufficientData(
                "Series A hybrid needs both DCF and comparable values".into(),
            ));
        };

        let wacc = ctx.assumptions.wacc();
        let mut risk_factors = BTreeMap::new();
        risk_factors.insert("capitalStructureRisk".to_string(), ctx.assumptions.debt_ratio);
        risk_factors.insert("costOfCapitalRisk".to_string(), wacc / HIGH_WACC);
        risk_factors.insert(
            "valuationDivergence".to_string(),
            Self::divergence(dcf, comparable),
        );

        Ok(StageValuation {
            value: Self::hybrid_value(dcf, comparable),
            confidence: risk_adjusted_confidence(BASE_CONFIDENCE, &risk_factors),
            methodology: self.name().to_string(),
            risk_factors,
            warnings: Vec::new(),
        })
    }
}
