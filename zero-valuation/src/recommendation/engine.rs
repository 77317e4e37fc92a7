//! Method recommendation scoring.
//!
//! Each method starts from a base suitability and collects additive
//! adjustments from the data that is (or is not) available. Scores are
//! clamped to 0-100 and ranked; ties keep DCF, comparables, hybrid order.

use super::types::{MethodAnalysis, MethodRecommendation, RecommendedMethod};
use crate::types::{Sector, Stage, ValuationInput};

const DCF_BASE: i32 = 65;
const COMPARABLES_BASE: i32 = 75;
const HYBRID_BASE: i32 = 70;

/// Hybrid earns a bonus when data quality reaches this score
const HYBRID_DATA_QUALITY_THRESHOLD: f64 = 60.0;

const MISSING_FIELD_PENALTY: i32 = 20;
const EVIDENCE_BONUS: i32 = 5;

// ============================================================================
// Scoring
// ============================================================================

fn score_dcf(input: &ValuationInput) -> i32 {
    let mut score = DCF_BASE;
    score += match input.stage {
        Some(Stage::PreSeed) => -30,
        Some(Stage::Seed) => -20,
        Some(Stage::SeriesA) => 0,
        Some(Stage::SeriesB | Stage::SeriesC) => 10,
        Some(Stage::Growth) => 15,
        None => -10,
    };
    score += if input.revenue.is_some() { 10 } else { -20 };
    if input.growth_rate.is_some() {
        score += 5;
    }
    score += if input.operating_margin.is_some() { 5 } else { -10 };
    if input.has_profitability {
        score += 10;
    }
    if !input.has_product_market_fit {
        score -= 10;
    }
    score
}

fn has_known_sector(input: &ValuationInput) -> bool {
    input.sector.is_some_and(|s| s != Sector::Other)
}

fn score_comparables(input: &ValuationInput) -> i32 {
    let mut score = COMPARABLES_BASE;
    if has_known_sector(input) {
        score += 10;
    }
    score += if input.revenue.is_some() { 10 } else { -15 };
    score += match input.stage {
        Some(Stage::Seed | Stage::SeriesA) => 10,
        Some(Stage::PreSeed) => -10,
        _ => 0,
    };
    if input.has_traction {
        score += 5;
    }
    if input.customer_count.is_some() {
        score += 5;
    }
    score
}

fn score_hybrid(input: &ValuationInput, data_quality: f64) -> i32 {
    let mut score = HYBRID_BASE;
    score += match input.stage {
        Some(Stage::SeriesA | Stage::SeriesB) => 15,
        Some(Stage::Seed) => 5,
        _ => 0,
    };
    if input.revenue.is_some() && input.operating_margin.is_some() {
        score += 10;
    }
    if input.has_product_market_fit {
        score += 10;
    }
    if data_quality >= HYBRID_DATA_QUALITY_THRESHOLD {
        score += 5;
    }
    score
}

// ============================================================================
// Reasoning
// ============================================================================

fn dcf_reasoning(input: &ValuationInput) -> &'static str {
    let late_stage = matches!(
        input.stage,
        Some(Stage::SeriesB | Stage::SeriesC | Stage::Growth)
    );
    if input.has_profitability && input.revenue.is_some() {
        "Profitable company with revenue history supports cash flow projection"
    } else if late_stage {
        "Later-stage company with increasingly predictable cash flows"
    } else if input.revenue.is_none() {
        "Missing revenue data makes cash flow projections speculative"
    } else if input.stage.is_some_and(|s| s.is_early()) {
        "Early stage makes long-range cash flow forecasts unreliable"
    } else {
        "Revenue data enables a cash flow projection"
    }
}

fn comparables_reasoning(input: &ValuationInput) -> &'static str {
    if has_known_sector(input) && input.revenue.is_some() {
        "Sector peers provide a market benchmark for the revenue multiple"
    } else if matches!(input.stage, Some(Stage::Seed | Stage::SeriesA)) {
        "Active funding market at this stage offers relevant comparables"
    } else if input.revenue.is_none() {
        "Comparable multiples need revenue to apply"
    } else {
        "Market comparables reflect current investor pricing"
    }
}

fn hybrid_reasoning(input: &ValuationInput) -> &'static str {
    if matches!(input.stage, Some(Stage::SeriesA | Stage::SeriesB)) {
        "Transitional stage benefits from blending intrinsic and market views"
    } else if input.has_product_market_fit {
        "Validated product-market fit supports combining methods"
    } else {
        "Blending methods reduces reliance on any single set of assumptions"
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build(method: RecommendedMethod, score: i32, reasoning: &str) -> MethodRecommendation {
    MethodRecommendation {
        method,
        confidence: f64::from(score.clamp(0, 100)),
        reasoning: reasoning.to_string(),
        requirements: to_strings(method.requirements()),
        pros: to_strings(method.pros()),
        cons: to_strings(method.cons()),
    }
}

// ============================================================================
// Data Quality
// ============================================================================

/// Required fields whose absence lowers data quality, with the suggestion
/// offered for each.
fn missing_required(input: &ValuationInput) -> Vec<(&'static str, &'static str)> {
    let checks = [
        (
            input.revenue.is_some(),
            "revenue",
            "Provide annual revenue to enable DCF and revenue-multiple methods",
        ),
        (
            input.growth_rate.is_some(),
            "growthRate",
            "Provide the year-over-year revenue growth rate",
        ),
        (
            input.operating_margin.is_some(),
            "operatingMargin",
            "Provide the operating margin from recent financials",
        ),
        (
            input.market_size.is_some(),
            "marketSize",
            "Estimate the total addressable market size",
        ),
        (
            input.stage.is_some(),
            "stage",
            "Specify the company's funding stage",
        ),
    ];
    checks
        .into_iter()
        .filter(|(present, _, _)| !present)
        .map(|(_, field, suggestion)| (field, suggestion))
        .collect()
}

/// 100, minus 20 per missing required field, plus 5 per piece of evidence.
pub fn data_quality_score(input: &ValuationInput) -> f64 {
    let missing = missing_required(input).len() as i32;
    let evidence = [
        input.customer_count.is_some(),
        input.has_traction,
        input.has_patents,
        input.has_product_market_fit,
    ]
    .iter()
    .filter(|present| **present)
    .count() as i32;

    let score = 100 - MISSING_FIELD_PENALTY * missing + EVIDENCE_BONUS * evidence;
    f64::from(score.clamp(0, 100))
}

fn suggestions(input: &ValuationInput) -> Vec<String> {
    let mut out: Vec<String> = missing_required(input)
        .into_iter()
        .map(|(_, suggestion)| suggestion.to_string())
        .collect();
    if !input.has_market_validation() {
        out.push("Gather market validation such as pilot customers or letters of intent".to_string());
    }
    if !input.has_patents {
        out.push("Consider protecting core technology with patents or other IP".to_string());
    }
    out
}

// ============================================================================
// Entry Point
// ============================================================================

/// Rank valuation methods by suitability for the available data.
pub fn recommend_method(input: &ValuationInput) -> MethodAnalysis {
    let data_quality = data_quality_score(input);

    let mut ranked: Vec<MethodRecommendation> = RecommendedMethod::ALL
        .iter()
        .map(|&method| match method {
            RecommendedMethod::Dcf => build(method, score_dcf(input), dcf_reasoning(input)),
            RecommendedMethod::Comparables => build(
                method,
                score_comparables(input),
                comparables_reasoning(input),
            ),
            RecommendedMethod::Hybrid => build(
                method,
                score_hybrid(input, data_quality),
                hybrid_reasoning(input),
            ),
        })
        .collect();
    // Stable: equal scores keep declaration order
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let primary = ranked.remove(0);
    tracing::debug!(
        primary = %primary.method,
        confidence = primary.confidence,
        data_quality,
        "Method recommended"
    );

    MethodAnalysis {
        primary,
        alternatives: ranked,
        data_quality_score: data_quality,
        suggestions: suggestions(input),
    }
}
