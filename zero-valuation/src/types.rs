//! Shared valuation input model and advisory warning types.
//!
//! Every component reads the same [`ValuationInput`]. Percentage-like fields
//! are fractions (0.20 = 20%); the caller converts units before invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Enumerated Classifications
// ============================================================================

/// Funding stage of the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "pre-seed", alias = "pre_seed", alias = "preseed")]
    PreSeed,
    #[serde(rename = "seed")]
    Seed,
    #[serde(rename = "series-a", alias = "series_a")]
    SeriesA,
    #[serde(rename = "series-b", alias = "series_b")]
    SeriesB,
    #[serde(rename = "series-c", alias = "series_c")]
    SeriesC,
    #[serde(rename = "growth")]
    Growth,
}

impl Stage {
    /// Pre-seed and seed companies rarely have revenue history worth projecting.
    pub fn is_early(self) -> bool {
        matches!(self, Self::PreSeed | Self::Seed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreSeed => "pre-seed",
            Self::Seed => "seed",
            Self::SeriesA => "series-a",
            Self::SeriesB => "series-b",
            Self::SeriesC => "series-c",
            Self::Growth => "growth",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Industry sector. Unknown sectors deserialize to [`Sector::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Saas,
    Fintech,
    Healthtech,
    Edtech,
    Ecommerce,
    Marketplace,
    Deeptech,
    Consumer,
    #[serde(other)]
    Other,
}

impl Sector {
    /// Sectors that currently command a premium in early-stage rounds.
    pub fn is_hot(self) -> bool {
        matches!(self, Self::Saas | Self::Fintech | Self::Healthtech | Self::Deeptech)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saas => "saas",
            Self::Fintech => "fintech",
            Self::Healthtech => "healthtech",
            Self::Edtech => "edtech",
            Self::Ecommerce => "ecommerce",
            Self::Marketplace => "marketplace",
            Self::Deeptech => "deeptech",
            Self::Consumer => "consumer",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maturity of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStage {
    Idea,
    Prototype,
    Mvp,
    Beta,
    Launched,
    Scaling,
}

/// Intensity of competition in the target market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    #[serde(alias = "very_high")]
    VeryHigh,
}

/// How the company makes money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessModel {
    Subscription,
    Marketplace,
    Transactional,
    Advertising,
    Hardware,
    Services,
}

// ============================================================================
// Valuation Input
// ============================================================================

/// Normalized input record shared by all valuation components.
///
/// `None` means "unknown", which is different from zero wherever it affects
/// confidence or data quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuationInput {
    pub sector: Option<Sector>,
    /// Free-text sub-industry, forwarded to the comparables provider
    pub industry: Option<String>,
    pub stage: Option<Stage>,
    /// Free-text city/region, mapped to a location multiplier
    pub location: Option<String>,

    // === Financials ===
    /// Annual revenue
    pub revenue: Option<f64>,
    /// Operating margin (fraction)
    #[serde(alias = "margins")]
    pub operating_margin: Option<f64>,
    /// Annual growth rate (fraction)
    pub growth_rate: Option<f64>,
    /// Monthly cash burn
    pub burn_rate: Option<f64>,
    /// Runway in months
    pub runway: Option<f64>,
    /// Monthly churn (fraction)
    pub churn_rate: Option<f64>,
    /// Total addressable market
    pub market_size: Option<f64>,
    /// Current share of the addressable market (fraction)
    pub market_share: Option<f64>,

    // === Balance sheet ===
    pub tangible_assets: Option<f64>,
    pub intangible_assets: Option<f64>,
    pub liabilities: Option<f64>,

    // === Unit economics ===
    /// Monthly recurring revenue
    pub mrr: Option<f64>,
    /// Customer acquisition cost
    pub cac: Option<f64>,
    /// Customer lifetime value
    pub ltv: Option<f64>,

    // === Team & company ===
    pub founders_count: Option<u32>,
    pub employee_count: Option<u32>,
    pub customer_count: Option<u64>,
    pub has_key_hires: bool,
    pub has_patents: bool,
    pub has_product_market_fit: bool,
    pub has_traction: bool,
    pub has_profitability: bool,
    pub product_stage: Option<ProductStage>,
    pub competition_level: Option<CompetitionLevel>,
    pub business_model: Option<BusinessModel>,
    /// Registered for a regional startup incentive scheme (e.g. DPIIT in India)
    #[serde(alias = "isDPIITRegistered")]
    pub is_dpiit_registered: bool,
}

impl ValuationInput {
    /// Sector, with unknown/absent collapsed to `Other`.
    pub fn sector_or_other(&self) -> Sector {
        self.sector.unwrap_or(Sector::Other)
    }

    /// Monthly recurring revenue, falling back to revenue / 12.
    pub fn monthly_revenue(&self) -> Option<f64> {
        self.mrr.or_else(|| self.revenue.map(|r| r / 12.0))
    }

    /// Whether the record carries any market-validation evidence.
    pub fn has_market_validation(&self) -> bool {
        self.has_traction || self.has_product_market_fit
    }
}

// ============================================================================
// Advisory Warnings
// ============================================================================

/// Severity of an advisory warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Non-fatal data-quality or consistency warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

// ============================================================================
// Method Tags
// ============================================================================

/// Valuation methods whose outputs can be compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuationMethod {
    Dcf,
    RevenueMultiple,
    AssetBased,
    Scorecard,
    MonteCarlo,
    StageModel,
}

impl ValuationMethod {
    /// Input factors most likely responsible when this method disagrees with the rest.
    pub fn sensitive_factors(self) -> &'static [&'static str] {
        match self {
            Self::Dcf => &["growth rate", "discount rate", "operating margin"],
            Self::RevenueMultiple => &["peer multiples", "revenue", "growth rate"],
            Self::AssetBased => &["asset valuation", "liabilities"],
            Self::Scorecard => &["qualitative factor scores", "baseline valuation"],
            Self::MonteCarlo => &["simulation assumptions"],
            Self::StageModel => &["stage-specific assumptions"],
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dcf => "DCF",
            Self::RevenueMultiple => "Revenue Multiple",
            Self::AssetBased => "Asset Based",
            Self::Scorecard => "Scorecard",
            Self::MonteCarlo => "Monte Carlo",
            Self::StageModel => "Stage Model",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_deserialization() {
        let json = r#"{
            "sector": "saas",
            "stage": "series-a",
            "revenue": 1200000,
            "margins": 0.2,
            "foundersCount": 2,
            "hasKeyHires": true,
            "competitionLevel": "very-high",
            "isDPIITRegistered": true
        }"#;
        let input: ValuationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.sector, Some(Sector::Saas));
        assert_eq!(input.stage, Some(Stage::SeriesA));
        assert_eq!(input.operating_margin, Some(0.2));
        assert_eq!(input.founders_count, Some(2));
        assert_eq!(input.competition_level, Some(CompetitionLevel::VeryHigh));
        assert!(input.has_key_hires);
        assert!(input.is_dpiit_registered);
        assert!(input.market_size.is_none());
    }

    #[test]
    fn test_unknown_sector_is_other() {
        let input: ValuationInput = serde_json::from_str(r#"{"sector": "agritech"}"#).unwrap();
        assert_eq!(input.sector, Some(Sector::Other));
        assert_eq!(input.sector_or_other(), Sector::Other);
    }

    #[test]
    fn test_stage_aliases() {
        let stage: Stage = serde_json::from_str(r#""pre_seed""#).unwrap();
        assert_eq!(stage, Stage::PreSeed);
        assert!(stage.is_early());
        assert_eq!(Stage::SeriesB.to_string(), "series-b");
    }

    #[test]
    fn test_monthly_revenue_fallback() {
        let mut input = ValuationInput {
            revenue: Some(120_000.0),
            ..Default::default()
        };
        assert_eq!(input.monthly_revenue(), Some(10_000.0));
        input.mrr = Some(15_000.0);
        assert_eq!(input.monthly_revenue(), Some(15_000.0));
    }

    #[test]
    fn test_warning_builder() {
        let warning = ValidationWarning::new("revenue", "Revenue missing", Severity::Medium)
            .with_suggestion("Provide trailing twelve month revenue");
        assert_eq!(warning.severity, Severity::Medium);
        assert!(warning.suggestion.is_some());
        assert!(Severity::High > Severity::Low);
    }
}
