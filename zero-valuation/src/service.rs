//! Valuation orchestration service.
//!
//! Runs every engine component for one input under a deadline and collects
//! the results into a single report. A failing method is recorded in the
//! report and never aborts the others; only malformed input, a timeout, or
//! a crashed background task fail the whole evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use zero_common::config::{Config, EngineConfig};
use zero_common::evaluation_span;
use zero_common::logging::generate_trace_id;

use crate::consistency::{check_consistency, ConsistencyReport, MethodValue};
use crate::error::{Result, ValuationError};
use crate::methods::{
    compute_asset_based, compute_dcf, compute_multiple, AssetResult, DcfAssumptions, DcfResult,
    MultipleResult,
};
use crate::monte_carlo::{run_monte_carlo, SimulationParams, SimulationResult};
use crate::providers::{
    ComparablesProvider, InsightProvider, NoopInsightProvider, StaticComparablesProvider,
};
use crate::recommendation::{recommend_method, MethodAnalysis};
use crate::scorecard::{compute_scorecard, ScorecardResult};
use crate::stage_models::{compute_stage_valuation, StageContext, StageValuation};
use crate::stats;
use crate::types::{ValidationWarning, ValuationInput, ValuationMethod};
use crate::validation::validate_input;

// ============================================================================
// Report Types
// ============================================================================

/// Outcome of one method within an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodOutcome<T> {
    Value(T),
    Failed { code: String, message: String },
}

impl<T> MethodOutcome<T> {
    fn from_result(method: &str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => {
                tracing::warn!(method, code = err.code(), error = %err, "Valuation method failed");
                Self::Failed {
                    code: err.code().to_string(),
                    message: err.to_string(),
                }
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Everything computed for one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub trace_id: String,
    pub generated_at: DateTime<Utc>,
    /// Input validation and benchmark warnings
    pub warnings: Vec<ValidationWarning>,
    pub scorecard: MethodOutcome<ScorecardResult>,
    pub dcf: MethodOutcome<DcfResult>,
    pub revenue_multiple: MethodOutcome<MultipleResult>,
    pub asset_based: MethodOutcome<AssetResult>,
    pub consistency: ConsistencyReport,
    pub stage_model: MethodOutcome<StageValuation>,
    pub monte_carlo: MethodOutcome<SimulationResult>,
    pub recommendation: MethodAnalysis,
    /// Free-text commentary from the insight provider
    pub insights: Vec<String>,
}

impl ValuationReport {
    /// Values of every method that succeeded, in report order.
    pub fn method_values(&self) -> Vec<MethodValue> {
        collect_method_values(
            &self.scorecard,
            &self.dcf,
            &self.revenue_multiple,
            &self.asset_based,
        )
    }
}

fn collect_method_values(
    scorecard: &MethodOutcome<ScorecardResult>,
    dcf: &MethodOutcome<DcfResult>,
    multiple: &MethodOutcome<MultipleResult>,
    asset: &MethodOutcome<AssetResult>,
) -> Vec<MethodValue> {
    [
        scorecard
            .value()
            .map(|r| MethodValue::new(ValuationMethod::Scorecard, r.valuation)),
        dcf.value()
            .map(|r| MethodValue::new(ValuationMethod::Dcf, r.value)),
        multiple
            .value()
            .map(|r| MethodValue::new(ValuationMethod::RevenueMultiple, r.value)),
        asset
            .value()
            .map(|r| MethodValue::new(ValuationMethod::AssetBased, r.value)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ============================================================================
// Service
// ============================================================================

/// Runs a complete evaluation against pluggable collaborators.
pub struct ValuationService {
    engine: EngineConfig,
    assumptions: DcfAssumptions,
    comparables: Arc<dyn ComparablesProvider>,
    insights: Arc<dyn InsightProvider>,
}

impl ValuationService {
    /// Service with the static comparables table and no insight provider.
    pub fn new(config: &Config) -> Self {
        Self {
            engine: config.engine.clone(),
            assumptions: DcfAssumptions::from(&config.dcf),
            comparables: Arc::new(StaticComparablesProvider::from_config(&config.comparables)),
            insights: Arc::new(NoopInsightProvider),
        }
    }

    pub fn with_comparables(mut self, provider: Arc<dyn ComparablesProvider>) -> Self {
        self.comparables = provider;
        self
    }

    pub fn with_insights(mut self, provider: Arc<dyn InsightProvider>) -> Self {
        self.insights = provider;
        self
    }

    fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            iterations: self.engine.iterations,
            seed: self.engine.seed,
            chunk_size: self.engine.chunk_size,
            ..Default::default()
        }
    }

    /// Evaluate one input within the configured deadline.
    pub async fn evaluate(&self, input: ValuationInput) -> Result<ValuationReport> {
        let trace_id = generate_trace_id();
        let span = evaluation_span!(trace_id, stage = ?input.stage, sector = ?input.sector);
        let deadline = Duration::from_secs(self.engine.timeout_secs);

        match tokio::time::timeout(deadline, self.run(input, trace_id).instrument(span)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = self.engine.timeout_secs, "Evaluation timed out");
                Err(ValuationError::Timeout(self.engine.timeout_secs))
            }
        }
    }

    async fn run(&self, input: ValuationInput, trace_id: String) -> Result<ValuationReport> {
        let warnings = validate_input(&input)?;

        let scorecard = MethodOutcome::from_result("scorecard", compute_scorecard(&input));
        let dcf = MethodOutcome::from_result("dcf", compute_dcf(&input, &self.assumptions));

        let sector = input.sector_or_other();
        let peers = self
            .comparables
            .fetch_comparables(sector, input.industry.as_deref())
            .await;
        tracing::debug!(
            provider = self.comparables.name(),
            ok = peers.is_ok(),
            "Comparables fetched"
        );
        let multiple_result = peers
            .map_err(ValuationError::from)
            .and_then(|peers| compute_multiple(&input, &peers));
        let revenue_multiple = MethodOutcome::from_result("revenue_multiple", multiple_result);
        let asset_based = MethodOutcome::from_result("asset_based", compute_asset_based(&input));

        let values = collect_method_values(&scorecard, &dcf, &revenue_multiple, &asset_based);
        let consistency = check_consistency(&values);

        let ctx = StageContext::new(self.assumptions.clone()).with_method_values(
            dcf.value().map(|r| r.value),
            revenue_multiple.value().map(|r| r.value),
        );
        let stage_model =
            MethodOutcome::from_result("stage_model", compute_stage_valuation(&input, &ctx));

        let base_value = scorecard.value().map(|r| r.valuation).or_else(|| {
            let raw: Vec<f64> = values.iter().map(|v| v.value).collect();
            (!raw.is_empty()).then(|| stats::mean(&raw))
        });
        let monte_carlo = MethodOutcome::from_result(
            "monte_carlo",
            self.simulate(&input, base_value).await,
        );

        let recommendation = recommend_method(&input);

        let insights = match self.insights.insights(&input).await {
            Ok(insights) => insights,
            Err(err) => {
                tracing::warn!(provider = self.insights.name(), error = %err, "Insight provider failed");
                Vec::new()
            }
        };

        tracing::info!(
            methods = values.len(),
            consistency = consistency.consistency_score,
            primary = %recommendation.primary.method,
            "Evaluation complete"
        );

        Ok(ValuationReport {
            trace_id,
            generated_at: Utc::now(),
            warnings,
            scorecard,
            dcf,
            revenue_multiple,
            asset_based,
            consistency,
            stage_model,
            monte_carlo,
            recommendation,
            insights,
        })
    }

    /// Run the simulation on the blocking pool.
    async fn simulate(
        &self,
        input: &ValuationInput,
        base_value: Option<f64>,
    ) -> Result<SimulationResult> {
        let base_value = base_value.ok_or_else(|| {
            ValuationError::InsufficientData("no method produced a base value to simulate".into())
        })?;
        let input = input.clone();
        let params = self.simulation_params();

        tokio::task::spawn_blocking(move || run_monte_carlo(&input, base_value, &params))
            .await
            .map_err(|e| ValuationError::TaskFailed(e.to_string()))?
    }
}
