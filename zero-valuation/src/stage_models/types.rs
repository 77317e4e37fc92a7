//! Stage model types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::methods::DcfAssumptions;
use crate::types::{ValidationWarning, ValuationInput};

/// Values computed earlier in an evaluation that some stage models reuse.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    /// Result of the DCF method, if it succeeded
    pub dcf_value: Option<f64>,
    /// Result of the revenue-multiple method, if it succeeded
    pub comparable_value: Option<f64>,
    pub assumptions: DcfAssumptions,
}

impl StageContext {
    pub fn new(assumptions: DcfAssumptions) -> Self {
        Self {
            assumptions,
            ..Default::default()
        }
    }

    pub fn with_method_values(mut self, dcf: Option<f64>, comparable: Option<f64>) -> Self {
        self.dcf_value = dcf;
        self.comparable_value = comparable;
        self
    }
}

/// Outcome of a stage-specific model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageValuation {
    pub value: f64,
    /// 0-1
    pub confidence: f64,
    pub methodology: String,
    /// Risk name to score; higher is riskier
    pub risk_factors: BTreeMap<String, f64>,
    pub warnings: Vec<ValidationWarning>,
}

/// A valuation model tailored to one funding stage.
pub trait StageModel: Send + Sync {
    /// Methodology label (e.g., "Pre-Seed Scorecard")
    fn name(&self) -> &'static str;

    fn calculate(&self, input: &ValuationInput, ctx: &StageContext) -> Result<StageValuation>;
}

/// `base · (1 − mean(risks))`, clamped to [0, 1].
pub(crate) fn risk_adjusted_confidence(base: f64, risks: &BTreeMap<String, f64>) -> f64 {
    if risks.is_empty() {
        return base.clamp(0.0, 1.0);
    }
    let mean = risks.values().sum::<f64>() / risks.len() as f64;
    (base * (1.0 - mean)).clamp(0.0, 1.0)
}
