//! Scorecard result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ValidationWarning;

/// Score, weight, and resulting adjustment of one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    /// Clamped heuristic score (100 = peer average)
    pub score: i32,
    pub weight: f64,
    /// `(score/100 − 1) · weight`
    pub adjustment: f64,
}

/// Conservative / base / aggressive valuation band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRange {
    pub conservative: f64,
    pub base: f64,
    pub aggressive: f64,
}

impl ValuationRange {
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = if self.conservative <= self.aggressive {
            (self.conservative, self.aggressive)
        } else {
            (self.aggressive, self.conservative)
        };
        (lo..=hi).contains(&value)
    }
}

/// Scorecard (Bill Payne) valuation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardResult {
    /// Final adjusted valuation
    pub valuation: f64,
    /// Table baseline before location and factor adjustment
    pub baseline_valuation: f64,
    pub location_multiplier: f64,
    /// Factor key (`management`, `opportunity`, ...) to score
    pub factors: BTreeMap<String, FactorScore>,
    pub total_adjustment: f64,
    pub ranges: ValuationRange,
    /// Confidence in the estimate (50-90)
    pub confidence: f64,
    pub insights: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

impl ScorecardResult {
    /// Sum of factor weights; 1.0 for every well-formed result.
    pub fn weight_sum(&self) -> f64 {
        self.factors.values().map(|f| f.weight).sum()
    }
}
