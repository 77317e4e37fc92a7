//! Input validation and industry benchmark checks.
//!
//! Shape problems (out-of-range fractions, negative money amounts) are
//! errors and stop the evaluation. Deviations from sector benchmarks are
//! advisory warnings only.

use crate::error::{Result, ValuationError};
use crate::types::{Sector, Severity, ValidationWarning, ValuationInput};

/// Accepted range for fraction-valued fields
const FRACTION_MIN: f64 = -1.0;
const FRACTION_MAX: f64 = 10.0;

/// Runway below this many months with an active burn is flagged
const MIN_SAFE_RUNWAY_MONTHS: f64 = 6.0;

/// Typical metrics for companies in a sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustryBenchmark {
    /// Annual growth
    pub growth_rate: f64,
    pub operating_margin: f64,
    /// Monthly churn
    pub churn_rate: f64,
}

impl IndustryBenchmark {
    pub fn for_sector(sector: Sector) -> Self {
        let (growth_rate, operating_margin, churn_rate) = match sector {
            Sector::Saas => (0.40, 0.20, 0.03),
            Sector::Fintech => (0.35, 0.15, 0.03),
            Sector::Ecommerce => (0.30, 0.08, 0.06),
            _ => (0.30, 0.15, 0.05),
        };
        Self {
            growth_rate,
            operating_margin,
            churn_rate,
        }
    }
}

fn check_fraction(field: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || !(FRACTION_MIN..=FRACTION_MAX).contains(&v) => Err(
            ValuationError::invalid(field, format!("{v} is outside [{FRACTION_MIN}, {FRACTION_MAX}]")),
        ),
        _ => Ok(()),
    }
}

fn check_non_negative(field: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ValuationError::invalid(
            field,
            format!("{v} must be a finite non-negative number"),
        )),
        _ => Ok(()),
    }
}

/// Reject malformed input.
pub fn check_shape(input: &ValuationInput) -> Result<()> {
    check_fraction("operatingMargin", input.operating_margin)?;
    check_fraction("growthRate", input.growth_rate)?;
    check_fraction("churnRate", input.churn_rate)?;
    check_fraction("marketShare", input.market_share)?;

    for (field, value) in [
        ("revenue", input.revenue),
        ("burnRate", input.burn_rate),
        ("runway", input.runway),
        ("marketSize", input.market_size),
        ("tangibleAssets", input.tangible_assets),
        ("intangibleAssets", input.intangible_assets),
        ("liabilities", input.liabilities),
        ("mrr", input.mrr),
        ("cac", input.cac),
        ("ltv", input.ltv),
    ] {
        check_non_negative(field, value)?;
    }
    Ok(())
}

/// Compare the input against its sector benchmark.
pub fn benchmark_warnings(input: &ValuationInput) -> Vec<ValidationWarning> {
    let benchmark = IndustryBenchmark::for_sector(input.sector_or_other());
    let mut warnings = Vec::new();

    if let Some(growth) = input.growth_rate {
        if growth > 3.0 * benchmark.growth_rate {
            warnings.push(
                ValidationWarning::new(
                    "growthRate",
                    format!(
                        "Growth rate {:.0}% is more than 3x the sector benchmark of {:.0}%",
                        growth * 100.0,
                        benchmark.growth_rate * 100.0
                    ),
                    Severity::Medium,
                )
                .with_suggestion("Confirm the growth figure is annual, not monthly or cumulative"),
            );
        }
    }

    if let Some(margin) = input.operating_margin {
        if margin < benchmark.operating_margin - 0.30 {
            warnings.push(
                ValidationWarning::new(
                    "operatingMargin",
                    format!(
                        "Operating margin {:.0}% is far below the sector benchmark of {:.0}%",
                        margin * 100.0,
                        benchmark.operating_margin * 100.0
                    ),
                    Severity::Medium,
                )
                .with_suggestion("Explain the path to sector-typical margins"),
            );
        }
    }

    if let Some(churn) = input.churn_rate {
        if churn > 2.0 * benchmark.churn_rate {
            warnings.push(
                ValidationWarning::new(
                    "churnRate",
                    format!(
                        "Monthly churn {:.1}% is more than double the sector benchmark of {:.1}%",
                        churn * 100.0,
                        benchmark.churn_rate * 100.0
                    ),
                    Severity::High,
                )
                .with_suggestion("Investigate retention before scaling acquisition"),
            );
        }
    }

    if input.burn_rate.is_some_and(|b| b > 0.0)
        && input.runway.is_some_and(|r| r < MIN_SAFE_RUNWAY_MONTHS)
    {
        warnings.push(
            ValidationWarning::new(
                "runway",
                "Less than 6 months of runway at the current burn rate",
                Severity::High,
            )
            .with_suggestion("Plan a bridge round or reduce burn"),
        );
    }

    if input.stage.is_none() {
        warnings.push(ValidationWarning::new(
            "stage",
            "Funding stage not provided; stage-specific models are unavailable",
            Severity::Medium,
        ));
    }

    warnings
}

/// Validate the input shape, then collect benchmark warnings.
pub fn validate_input(input: &ValuationInput) -> Result<Vec<ValidationWarning>> {
    check_shape(input)?;
    let warnings = benchmark_warnings(input);
    tracing::debug!(warnings = warnings.len(), "Input validated");
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stage;
    use test_case::test_case;

    fn valid() -> ValuationInput {
        ValuationInput {
            sector: Some(Sector::Saas),
            stage: Some(Stage::Seed),
            revenue: Some(600_000.0),
            growth_rate: Some(0.8),
            operating_margin: Some(0.05),
            churn_rate: Some(0.03),
            burn_rate: Some(50_000.0),
            runway: Some(14.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_input_has_no_warnings() {
        assert!(validate_input(&valid()).unwrap().is_empty());
    }

    #[test_case("growthRate" ; "growth")]
    #[test_case("operatingMargin" ; "margin")]
    #[test_case("churnRate" ; "churn")]
    fn test_fraction_out_of_range(field: &str) {
        let mut input = valid();
        match field {
            "growthRate" => input.growth_rate = Some(12.0),
            "operatingMargin" => input.operating_margin = Some(-1.5),
            _ => input.churn_rate = Some(f64::NAN),
        }
        let err = validate_input(&input).unwrap_err();
        assert!(err.is_input_shape());
        assert!(err.to_string().contains(field));
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let input = ValuationInput {
            revenue: Some(-1.0),
            ..valid()
        };
        assert!(matches!(
            validate_input(&input),
            Err(ValuationError::InvalidInput { ref field, .. }) if field == "revenue"
        ));
    }

    #[test]
    fn test_benchmark_warnings() {
        let input = ValuationInput {
            growth_rate: Some(1.5),
            operating_margin: Some(-0.2),
            churn_rate: Some(0.08),
            runway: Some(4.0),
            stage: None,
            ..valid()
        };
        let warnings = validate_input(&input).unwrap();
        let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["growthRate", "operatingMargin", "churnRate", "runway", "stage"]
        );
        assert_eq!(warnings[2].severity, Severity::High);
        assert_eq!(warnings[3].severity, Severity::High);
    }

    #[test]
    fn test_default_benchmark_for_unknown_sector() {
        let benchmark = IndustryBenchmark::for_sector(Sector::Other);
        assert_eq!(benchmark.growth_rate, 0.30);
        assert_eq!(benchmark.churn_rate, 0.05);
    }
}
