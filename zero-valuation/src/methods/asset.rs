//! Asset-based (net asset value) valuation.

use super::types::AssetResult;
use crate::error::{Result, ValuationError};
use crate::types::{Severity, ValidationWarning, ValuationInput};

/// `tangible + intangible − liabilities`.
///
/// Tangible assets are required. Intangible assets and liabilities default
/// to zero with a low-severity warning. A negative net asset value is
/// returned as-is.
pub fn compute_asset_based(input: &ValuationInput) -> Result<AssetResult> {
    let tangible_assets = input
        .tangible_assets
        .ok_or(ValuationError::MissingInput("tangibleAssets"))?;

    let mut warnings = Vec::new();
    let intangible_assets = input.intangible_assets.unwrap_or_else(|| {
        warnings.push(ValidationWarning::new(
            "intangibleAssets",
            "Intangible assets not provided; assuming 0",
            Severity::Low,
        ));
        0.0
    });
    let liabilities = input.liabilities.unwrap_or_else(|| {
        warnings.push(
            ValidationWarning::new(
                "liabilities",
                "Liabilities not provided; assuming 0",
                Severity::Low,
            )
            .with_suggestion("Include debt and payables for an accurate net asset value"),
        );
        0.0
    });

    for (field, value) in [
        ("tangibleAssets", tangible_assets),
        ("intangibleAssets", intangible_assets),
        ("liabilities", liabilities),
    ] {
        if !value.is_finite() {
            return Err(ValuationError::invalid(field, "must be a finite number"));
        }
    }

    let value = tangible_assets + intangible_assets - liabilities;
    if value < 0.0 {
        warnings.push(ValidationWarning::new(
            "liabilities",
            "Liabilities exceed total assets",
            Severity::Medium,
        ));
    }

    tracing::debug!(value, "Asset-based value computed");

    Ok(AssetResult {
        value,
        tangible_assets,
        intangible_assets,
        liabilities,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_asset_value() {
        let input = ValuationInput {
            tangible_assets: Some(800_000.0),
            intangible_assets: Some(300_000.0),
            liabilities: Some(200_000.0),
            ..Default::default()
        };
        let result = compute_asset_based(&input).unwrap();
        assert!((result.value - 900_000.0).abs() < 1e-9);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_negative_value_kept() {
        let input = ValuationInput {
            tangible_assets: Some(100_000.0),
            intangible_assets: Some(0.0),
            liabilities: Some(400_000.0),
            ..Default::default()
        };
        let result = compute_asset_based(&input).unwrap();
        assert!((result.value + 300_000.0).abs() < 1e-9);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_optional_parts_default_to_zero() {
        let input = ValuationInput {
            tangible_assets: Some(250_000.0),
            ..Default::default()
        };
        let result = compute_asset_based(&input).unwrap();
        assert!((result.value - 250_000.0).abs() < 1e-9);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().all(|w| w.severity == Severity::Low));
    }

    #[test]
    fn test_tangible_assets_required() {
        assert_eq!(
            compute_asset_based(&ValuationInput::default()).unwrap_err(),
            ValuationError::MissingInput("tangibleAssets")
        );
    }
}
