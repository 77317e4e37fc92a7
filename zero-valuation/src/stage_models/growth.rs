//! Growth-stage terminal value with regional risk adjustment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{risk_adjusted_confidence, StageContext, StageModel, StageValuation};
use crate::error::{Result, ValuationError};
use crate::scorecard::baseline::normalize_location;
use crate::types::ValuationInput;

const BASE_CONFIDENCE: f64 = 0.85;
/// Free cash flow at which scale risk halves
const SCALE_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    NorthAmerica,
    Europe,
    AsiaPacific,
    LatinAmerica,
    Africa,
    Unknown,
}

const REGION_KEYWORDS: &[(Region, &[&str])] = &[
    (
        Region::NorthAmerica,
        &[
            "usa", "us", "united states", "america", "canada", "san francisco", "bay area",
            "new york", "boston", "seattle", "austin", "toronto",
        ],
    ),
    (
        Region::Europe,
        &[
            "europe", "uk", "united kingdom", "london", "germany", "berlin", "france", "paris",
            "netherlands", "amsterdam", "ireland", "dublin",
        ],
    ),
    (
        Region::AsiaPacific,
        &[
            "india", "bangalore", "bengaluru", "mumbai", "delhi", "new delhi", "hyderabad", "pune",
            "chennai", "gurgaon", "gurugram", "noida", "singapore", "japan", "tokyo", "china",
            "australia", "sydney", "asia",
        ],
    ),
    (
        Region::LatinAmerica,
        &["brazil", "sao paulo", "mexico", "argentina", "chile", "colombia", "latam"],
    ),
    (
        Region::Africa,
        &["africa", "nigeria", "lagos", "kenya", "nairobi", "egypt", "cairo"],
    ),
];

impl Region {
    /// Resolve a region from free-text location keywords.
    pub fn from_location(location: Option<&str>) -> Self {
        let Some(raw) = location else {
            return Self::Unknown;
        };
        let padded = format!(" {} ", normalize_location(&raw.replace(',', " ")));
        REGION_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| padded.contains(&format!(" {k} "))))
            .map(|(region, _)| *region)
            .unwrap_or(Self::Unknown)
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::NorthAmerica => 1.0,
            Self::Europe => 0.9,
            Self::AsiaPacific => 0.85,
            Self::LatinAmerica => 0.8,
            Self::Africa => 0.75,
            Self::Unknown => 0.8,
        }
    }
}

pub struct GrowthModel;

impl GrowthModel {
    /// Gordon growth terminal value.
    pub fn terminal_value(fcf: f64, growth: f64, wacc: f64) -> Result<f64> {
        if !wacc.is_finite() || !growth.is_finite() || wacc <= growth {
            return Err(ValuationError::TerminalGrowthExceedsWacc {
                terminal_growth: growth,
                wacc,
            });
        }
        Ok(fcf * (1.0 + growth) / (wacc - growth))
    }

    /// Risk from company size, in (0, 1]. Non-positive free cash flow is
    /// maximal risk; the raw ratio is unbounded there.
    pub fn scale_risk(fcf: f64) -> f64 {
        if fcf <= 0.0 {
            return 1.0;
        }
        1.0 / (1.0 + fcf / SCALE_UNIT)
    }
}

impl StageModel for GrowthModel {
    fn name(&self) -> &'static str {
        "Growth Terminal Value"
    }

    fn calculate(&self, input: &ValuationInput, ctx: &StageContext) -> Result<StageValuation> {
        let revenue = input.revenue.ok_or(ValuationError::MissingInput("revenue"))?;
        let margin = input
            .operating_margin
            .ok_or(ValuationError::MissingInput("operatingMargin"))?;
        let fcf = revenue * margin;

        let wacc = ctx.assumptions.wacc();
        let growth = ctx.assumptions.terminal_growth_rate;
        let region = Region::from_location(input.location.as_deref());
        let value = Self::terminal_value(fcf, growth, wacc)? * region.multiplier();

        let mut risk_factors = BTreeMap::new();
        risk_factors.insert("growthRisk".to_string(), growth / wacc);
        risk_factors.insert("regionRisk".to_string(), 1.0 - region.multiplier());
        risk_factors.insert("scaleRisk".to_string(), Self::scale_risk(fcf));

        tracing::debug!(?region, fcf, value, "Growth terminal value computed");

        Ok(StageValuation {
            value,
            confidence: risk_adjusted_confidence(BASE_CONFIDENCE, &risk_factors),
            methodology: self.name().to_string(),
            risk_factors,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::DcfAssumptions;

    #[test]
    fn test_region_resolution() {
        assert_eq!(Region::from_location(Some("Bengaluru, India")), Region::AsiaPacific);
        assert_eq!(Region::from_location(Some("San Francisco, CA")), Region::NorthAmerica);
        assert_eq!(Region::from_location(Some("Lagos")), Region::Africa);
        assert_eq!(Region::from_location(Some("Reykjavik")), Region::Unknown);
        assert_eq!(Region::from_location(None), Region::Unknown);
        // substring of a longer word does not match
        assert_eq!(Region::from_location(Some("Ushuaia")), Region::Unknown);
    }

    #[test]
    fn test_terminal_value_guard() {
        assert!(GrowthModel::terminal_value(1.0, 0.1, 0.1).is_err());
        let tv = GrowthModel::terminal_value(1_000_000.0, 0.03, 0.10).unwrap();
        assert!((tv - 1_030_000.0 / 0.07).abs() < 1e-6);
        assert!(GrowthModel::terminal_value(1.0, f64::NAN, 0.1).is_err());
        assert!(GrowthModel::terminal_value(1.0, 0.03, f64::NAN).is_err());
    }

    #[test]
    fn test_scale_risk_bounded() {
        assert!((GrowthModel::scale_risk(1_000_000.0) - 0.5).abs() < 1e-12);
        assert_eq!(GrowthModel::scale_risk(0.0), 1.0);
        assert_eq!(GrowthModel::scale_risk(-1_000_000.0), 1.0);
        assert_eq!(GrowthModel::scale_risk(-5e7), 1.0);
    }

    #[test]
    fn test_negative_cash_flow_keeps_risk_map_finite() {
        let input = ValuationInput {
            revenue: Some(10_000_000.0),
            operating_margin: Some(-0.1),
            ..Default::default()
        };
        let ctx = StageContext::new(DcfAssumptions::default());
        let result = GrowthModel.calculate(&input, &ctx).unwrap();
        assert!(result.risk_factors.values().all(|r| r.is_finite()));
        assert_eq!(result.risk_factors["scaleRisk"], 1.0);
        assert!((0.0..=1.0).contains(&result.confidence));
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_calculate_applies_region() {
        let input = ValuationInput {
            revenue: Some(20_000_000.0),
            operating_margin: Some(0.1),
            location: Some("London".into()),
            ..Default::default()
        };
        let ctx = StageContext::new(DcfAssumptions::default());
        let result = GrowthModel.calculate(&input, &ctx).unwrap();
        let tv = 2_000_000.0 * 1.03 / (0.102 - 0.03);
        assert!((result.value - tv * 0.9).abs() < 1e-3);
        assert!((result.risk_factors["regionRisk"] - 0.1).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}
