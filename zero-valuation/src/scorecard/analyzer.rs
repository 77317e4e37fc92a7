//! Scorecard analyzer.
//!
//! Adjusts a stage/sector baseline by seven weighted qualitative factor
//! scores and reports a conservative/base/aggressive range with confidence.

use std::collections::BTreeMap;

use super::baseline::{location_multiplier, BaselineTable};
use super::factors::Factor;
use super::types::{FactorScore, ScorecardResult, ValuationRange};
use crate::error::{Result, ValuationError};
use crate::types::{Severity, Stage, ValidationWarning, ValuationInput};

/// Scorecard analyzer configuration.
#[derive(Debug, Clone)]
pub struct ScorecardConfig {
    /// Conservative band multiplier
    pub conservative_multiplier: f64,
    /// Aggressive band multiplier
    pub aggressive_multiplier: f64,
    /// Confidence before coverage and stage adjustments
    pub base_confidence: f64,
    /// Maximum bonus when every optional signal is present
    pub coverage_bonus: f64,
    /// |total adjustment| above which the estimate is considered stretched
    pub extreme_adjustment: f64,
    pub extreme_adjustment_penalty: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            conservative_multiplier: 0.75,
            aggressive_multiplier: 1.25,
            base_confidence: 70.0,
            coverage_bonus: 15.0,
            extreme_adjustment: 0.5,
            extreme_adjustment_penalty: 10.0,
            min_confidence: 50.0,
            max_confidence: 90.0,
        }
    }
}

// ============================================================================
// Signal Coverage
// ============================================================================

/// Which optional signals the input carries.
///
/// Computed once per request; gates the computation and drives confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCoverage {
    pub founders: bool,
    pub employees: bool,
    pub market_size: bool,
    pub customers: bool,
    pub revenue: bool,
    pub growth: bool,
    pub product_stage: bool,
    pub stage: bool,
}

impl SignalCoverage {
    /// Number of optional confidence signals.
    pub const OPTIONAL_SIGNALS: usize = 7;

    pub fn from_input(input: &ValuationInput) -> Self {
        Self {
            founders: input.founders_count.is_some(),
            employees: input.employee_count.is_some(),
            market_size: input.market_size.is_some(),
            customers: input.customer_count.is_some(),
            revenue: input.revenue.is_some(),
            growth: input.growth_rate.is_some(),
            product_stage: input.product_stage.is_some(),
            stage: input.stage.is_some(),
        }
    }

    /// Count of present optional signals (0-7).
    pub fn present(&self) -> usize {
        [
            self.founders,
            self.employees,
            self.market_size,
            self.customers,
            self.revenue,
            self.growth,
            self.product_stage,
        ]
        .iter()
        .filter(|&&p| p)
        .count()
    }

    /// Whether there is any team, market, customer, or stage data at all.
    pub fn has_qualifying_signal(&self) -> bool {
        self.founders || self.employees || self.market_size || self.customers || self.stage
    }

    /// Absent optional signals as (field, label) pairs.
    fn missing(&self) -> Vec<(&'static str, &'static str)> {
        let all = [
            (self.founders, "foundersCount", "founder count"),
            (self.employees, "employeeCount", "employee count"),
            (self.market_size, "marketSize", "market size"),
            (self.customers, "customerCount", "customer count"),
            (self.revenue, "revenue", "revenue"),
            (self.growth, "growthRate", "growth rate"),
            (self.product_stage, "productStage", "product stage"),
        ];
        all.iter()
            .filter(|(present, _, _)| !present)
            .map(|(_, field, label)| (*field, *label))
            .collect()
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Scorecard valuation analyzer.
pub struct ScorecardAnalyzer {
    config: ScorecardConfig,
    baselines: BaselineTable,
}

impl ScorecardAnalyzer {
    /// Create a new analyzer with default config and baseline table.
    pub fn new() -> Self {
        Self {
            config: ScorecardConfig::default(),
            baselines: BaselineTable::default(),
        }
    }

    /// Create with custom config and baseline table.
    pub fn with_config(config: ScorecardConfig, baselines: BaselineTable) -> Self {
        Self { config, baselines }
    }

    /// Compute the scorecard valuation.
    pub fn analyze(&self, input: &ValuationInput) -> Result<ScorecardResult> {
        let coverage = SignalCoverage::from_input(input);
        if !coverage.has_qualifying_signal() {
            return Err(ValuationError::InsufficientData(
                "scorecard needs team, market, customer, or stage data".into(),
            ));
        }

        let (baseline, source) = self.baselines.lookup(input.stage, input.sector);
        let location = location_multiplier(input.location.as_deref());

        let mut factors = BTreeMap::new();
        let mut scores = Vec::with_capacity(Factor::ALL.len());
        let mut total_adjustment = 0.0;
        for factor in Factor::ALL {
            let score = factor.score(input, location);
            let weight = factor.weight();
            let adjustment = (f64::from(score) / 100.0 - 1.0) * weight;
            total_adjustment += adjustment;
            scores.push((factor, score));
            factors.insert(
                factor.key().to_string(),
                FactorScore {
                    score,
                    weight,
                    adjustment,
                },
            );
        }

        let valuation = baseline * location * (1.0 + total_adjustment);
        let ranges = ValuationRange {
            conservative: valuation * self.config.conservative_multiplier,
            base: valuation,
            aggressive: valuation * self.config.aggressive_multiplier,
        };

        let confidence = self.confidence(&coverage, total_adjustment, input.stage);
        let insights = generate_insights(&scores, input);
        let warnings = coverage
            .missing()
            .into_iter()
            .map(|(field, label)| {
                ValidationWarning::new(
                    field,
                    format!("No {label} provided; scored as neutral"),
                    Severity::Low,
                )
                .with_suggestion(format!("Provide {label} to raise confidence"))
            })
            .collect();

        tracing::debug!(
            baseline,
            ?source,
            location,
            total_adjustment,
            valuation,
            confidence,
            "Scorecard computed"
        );

        Ok(ScorecardResult {
            valuation,
            baseline_valuation: baseline,
            location_multiplier: location,
            factors,
            total_adjustment,
            ranges,
            confidence,
            insights,
            warnings,
        })
    }

    /// Confidence from signal coverage, adjustment magnitude, and stage.
    fn confidence(&self, coverage: &SignalCoverage, total_adjustment: f64, stage: Option<Stage>) -> f64 {
        let cfg = &self.config;
        let coverage_ratio = coverage.present() as f64 / SignalCoverage::OPTIONAL_SIGNALS as f64;
        let mut confidence = cfg.base_confidence + cfg.coverage_bonus * coverage_ratio;

        if total_adjustment.abs() > cfg.extreme_adjustment {
            confidence -= cfg.extreme_adjustment_penalty;
        }

        confidence += match stage {
            Some(Stage::PreSeed) => -5.0,
            Some(Stage::Seed) => 0.0,
            Some(Stage::SeriesA | Stage::SeriesB | Stage::SeriesC | Stage::Growth) => 5.0,
            None => -5.0,
        };

        confidence.clamp(cfg.min_confidence, cfg.max_confidence)
    }
}

impl Default for ScorecardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Insights
// ============================================================================

const STRENGTH_THRESHOLD: i32 = 100;
const WEAKNESS_THRESHOLD: i32 = 70;

fn score_of(scores: &[(Factor, i32)], factor: Factor) -> i32 {
    scores
        .iter()
        .find(|(f, _)| *f == factor)
        .map(|(_, s)| *s)
        .unwrap_or(0)
}

fn generate_insights(scores: &[(Factor, i32)], input: &ValuationInput) -> Vec<String> {
    let mut insights = Vec::new();

    // Stable sort keeps declaration order on ties
    let mut visible: Vec<(Factor, i32)> = Factor::VISIBLE
        .iter()
        .map(|&f| (f, score_of(scores, f)))
        .collect();
    visible.sort_by(|a, b| b.1.cmp(&a.1));

    if let Some(&(top, score)) = visible.first() {
        if score > STRENGTH_THRESHOLD {
            insights.push(format!(
                "Key strength: {top} scores {score} against a peer average of 100"
            ));
        }
    }
    if let Some(&(bottom, score)) = visible.last() {
        if score < WEAKNESS_THRESHOLD {
            insights.push(format!(
                "Key weakness: {bottom} scores {score}, well below the peer average of 100"
            ));
        }
    }

    let management = score_of(scores, Factor::Management);
    if management < WEAKNESS_THRESHOLD && input.founders_count.unwrap_or(0) < 2 {
        insights.push(
            "Consider adding co-founders with complementary skills to strengthen the team".into(),
        );
    }
    if score_of(scores, Factor::Opportunity) < 60 && input.market_size.is_none() {
        insights.push("Quantify the addressable market to support the opportunity score".into());
    }
    if score_of(scores, Factor::Marketing) < 60 {
        insights.push("Build early customer traction through pilots or paid users".into());
    }
    if score_of(scores, Factor::FundingNeed) < 50 {
        insights.push("Extend runway or reduce burn before the next raise".into());
    }
    if score_of(scores, Factor::Competitive) < 50 {
        insights.push("Articulate differentiation and protect IP against competitors".into());
    }

    insights
}

/// Compute a scorecard valuation with the default analyzer.
pub fn compute_scorecard(input: &ValuationInput) -> Result<ScorecardResult> {
    ScorecardAnalyzer::new().analyze(input)
}

// ============================================================================
// Tests
// ============================================================================
