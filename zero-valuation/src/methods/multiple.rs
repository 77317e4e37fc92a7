//! Revenue-multiple valuation against peer companies.

use super::types::{MultipleResult, PeerMultiple};
use crate::error::{Result, ValuationError};
use crate::stats;
use crate::types::{Severity, ValidationWarning, ValuationInput};

/// Growth above this earns the high-growth premium
const HIGH_GROWTH_THRESHOLD: f64 = 0.20;
const HIGH_GROWTH_PREMIUM: f64 = 1.20;

/// Margin above this earns the profitability premium
const HIGH_MARGIN_THRESHOLD: f64 = 0.30;
const HIGH_MARGIN_PREMIUM: f64 = 1.10;

/// Revenue below this counts as early revenue
const EARLY_REVENUE_THRESHOLD: f64 = 1_000_000.0;
const EARLY_REVENUE_DISCOUNT: f64 = 0.80;

/// Peer sets smaller than this produce a low-severity warning
const THIN_PEER_SET: usize = 3;

/// Value the company at the adjusted median peer EV/Revenue multiple.
pub fn compute_multiple(input: &ValuationInput, peers: &[PeerMultiple]) -> Result<MultipleResult> {
    let mut multiples: Vec<f64> = peers
        .iter()
        .map(|p| p.ev_revenue)
        .filter(|m| m.is_finite() && *m > 0.0)
        .collect();
    if multiples.is_empty() {
        return Err(ValuationError::NoComparables {
            sector: input.sector_or_other().to_string(),
        });
    }

    let revenue = input.revenue.ok_or(ValuationError::MissingInput("revenue"))?;
    if !revenue.is_finite() {
        return Err(ValuationError::invalid("revenue", "must be a finite number"));
    }

    multiples.sort_by(f64::total_cmp);
    let base_multiple = stats::median(&multiples);

    let mut adjusted_multiple = base_multiple;
    let mut adjustments = Vec::new();

    if input.growth_rate.is_some_and(|g| g > HIGH_GROWTH_THRESHOLD) {
        adjusted_multiple *= HIGH_GROWTH_PREMIUM;
        adjustments.push("High growth premium (+20%)".to_string());
    }
    if input
        .operating_margin
        .is_some_and(|m| m > HIGH_MARGIN_THRESHOLD)
    {
        adjusted_multiple *= HIGH_MARGIN_PREMIUM;
        adjustments.push("Strong margin premium (+10%)".to_string());
    }
    let early_stage = input.stage.is_some_and(|s| s.is_early());
    if revenue < EARLY_REVENUE_THRESHOLD || early_stage {
        adjusted_multiple *= EARLY_REVENUE_DISCOUNT;
        adjustments.push("Early revenue discount (-20%)".to_string());
    }

    let mut warnings = Vec::new();
    if multiples.len() < peers.len() {
        warnings.push(ValidationWarning::new(
            "comparables",
            format!(
                "{} peer(s) ignored for a missing or non-positive EV/Revenue multiple",
                peers.len() - multiples.len()
            ),
            Severity::Low,
        ));
    }
    if multiples.len() < THIN_PEER_SET {
        warnings.push(
            ValidationWarning::new(
                "comparables",
                format!("Only {} usable peer multiple(s)", multiples.len()),
                Severity::Low,
            )
            .with_suggestion("Add more comparable companies for a stable median"),
        );
    }

    let value = adjusted_multiple * revenue;

    tracing::debug!(
        peers = multiples.len(),
        base_multiple,
        adjusted_multiple,
        value,
        "Revenue multiple computed"
    );

    Ok(MultipleResult {
        value,
        base_multiple,
        adjusted_multiple,
        peer_count: multiples.len(),
        adjustments,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sector, Stage};

    fn peers(multiples: &[f64]) -> Vec<PeerMultiple> {
        multiples
            .iter()
            .enumerate()
            .map(|(i, m)| PeerMultiple::new(format!("peer-{i}"), *m))
            .collect()
    }

    fn input() -> ValuationInput {
        ValuationInput {
            sector: Some(Sector::Saas),
            stage: Some(Stage::SeriesA),
            revenue: Some(2_000_000.0),
            growth_rate: Some(0.1),
            operating_margin: Some(0.1),
            ..Default::default()
        }
    }

    #[test]
    fn test_median_multiple_without_adjustments() {
        let result = compute_multiple(&input(), &peers(&[4.0, 8.0, 6.0])).unwrap();
        assert!((result.base_multiple - 6.0).abs() < 1e-12);
        assert!((result.adjusted_multiple - 6.0).abs() < 1e-12);
        assert!((result.value - 12_000_000.0).abs() < 1e-6);
        assert!(result.adjustments.is_empty());
        assert_eq!(result.peer_count, 3);
    }

    #[test]
    fn test_even_peer_count_uses_midpoint() {
        let result = compute_multiple(&input(), &peers(&[4.0, 6.0, 8.0, 10.0])).unwrap();
        assert!((result.base_multiple - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_adjustments_compound() {
        let input = ValuationInput {
            stage: Some(Stage::Seed),
            revenue: Some(500_000.0),
            growth_rate: Some(0.8),
            operating_margin: Some(0.35),
            ..Default::default()
        };
        let result = compute_multiple(&input, &peers(&[5.0, 5.0, 5.0])).unwrap();
        let expected = 5.0 * 1.2 * 1.1 * 0.8;
        assert!((result.adjusted_multiple - expected).abs() < 1e-12);
        assert_eq!(result.adjustments.len(), 3);
        assert!((result.value - expected * 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_peers_filtered() {
        let result =
            compute_multiple(&input(), &peers(&[f64::NAN, -2.0, 0.0, 6.0, f64::INFINITY])).unwrap();
        assert_eq!(result.peer_count, 1);
        assert!((result.base_multiple - 6.0).abs() < 1e-12);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_no_comparables() {
        let err = compute_multiple(&input(), &[]).unwrap_err();
        assert_eq!(
            err,
            ValuationError::NoComparables {
                sector: "saas".into()
            }
        );
        assert!(compute_multiple(&input(), &peers(&[0.0, -1.0])).is_err());
    }

    #[test]
    fn test_revenue_required() {
        let input = ValuationInput {
            revenue: None,
            ..input()
        };
        assert_eq!(
            compute_multiple(&input, &peers(&[5.0])).unwrap_err(),
            ValuationError::MissingInput("revenue")
        );
    }
}
