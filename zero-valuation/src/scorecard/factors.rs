//! The seven scorecard factor scorers.
//!
//! Each scorer starts from a neutral score and adds fixed point deltas for
//! qualifying conditions, then clamps to the factor's band. The deltas are
//! empirical and have no external derivation; they are kept as named
//! constants so a recalibration is a one-line change.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{BusinessModel, CompetitionLevel, ProductStage, ValuationInput};

/// Score every factor starts from before deltas.
pub const NEUTRAL_SCORE: i32 = 50;

/// The seven Scorecard (Bill Payne) factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Management,
    Opportunity,
    Product,
    Competitive,
    Marketing,
    FundingNeed,
    Misc,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Management,
        Factor::Opportunity,
        Factor::Product,
        Factor::Competitive,
        Factor::Marketing,
        Factor::FundingNeed,
        Factor::Misc,
    ];

    /// Factors surfaced in insights; funding need and misc stay internal.
    pub const VISIBLE: [Factor; 5] = [
        Factor::Management,
        Factor::Opportunity,
        Factor::Product,
        Factor::Competitive,
        Factor::Marketing,
    ];

    /// Weight in the total adjustment. Weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Self::Management => 0.30,
            Self::Opportunity => 0.25,
            Self::Product => 0.15,
            Self::Competitive => 0.10,
            Self::Marketing => 0.10,
            Self::FundingNeed => 0.05,
            Self::Misc => 0.05,
        }
    }

    /// Inclusive score band.
    pub fn band(self) -> (i32, i32) {
        match self {
            Self::Management => (20, 130),
            Self::Opportunity => (30, 140),
            Self::Product => (20, 130),
            Self::Competitive => (30, 120),
            Self::Marketing => (30, 130),
            Self::FundingNeed => (30, 130),
            Self::Misc => (40, 120),
        }
    }

    /// Score this factor for an input.
    pub fn score(self, input: &ValuationInput, location_multiplier: f64) -> i32 {
        let raw = match self {
            Self::Management => management_score(input),
            Self::Opportunity => opportunity_score(input),
            Self::Product => product_score(input),
            Self::Competitive => competitive_score(input),
            Self::Marketing => marketing_score(input),
            Self::FundingNeed => funding_need_score(input),
            Self::Misc => misc_score(input, location_multiplier),
        };
        let (lo, hi) = self.band();
        raw.clamp(lo, hi)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Management => "management",
            Self::Opportunity => "opportunity",
            Self::Product => "product",
            Self::Competitive => "competitive",
            Self::Marketing => "marketing",
            Self::FundingNeed => "fundingNeed",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Management => "Strength of management team",
            Self::Opportunity => "Size of the opportunity",
            Self::Product => "Product/technology",
            Self::Competitive => "Competitive environment",
            Self::Marketing => "Marketing, sales channels and partnerships",
            Self::FundingNeed => "Need for additional investment",
            Self::Misc => "Other factors",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Management
// ============================================================================

const CO_FOUNDED_BONUS: i32 = 15;
const SOLO_FOUNDER_PENALTY: i32 = -10;
const TEAM_50_BONUS: i32 = 20;
const TEAM_10_BONUS: i32 = 10;
const TEAM_5_BONUS: i32 = 5;
const KEY_HIRES_BONUS: i32 = 15;

fn management_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    match input.founders_count {
        Some(n) if n >= 2 => score += CO_FOUNDED_BONUS,
        Some(1) => score += SOLO_FOUNDER_PENALTY,
        _ => {}
    }

    match input.employee_count {
        Some(n) if n >= 50 => score += TEAM_50_BONUS,
        Some(n) if n >= 10 => score += TEAM_10_BONUS,
        Some(n) if n >= 5 => score += TEAM_5_BONUS,
        _ => {}
    }

    if input.has_key_hires {
        score += KEY_HIRES_BONUS;
    }

    score
}

// ============================================================================
// Opportunity
// ============================================================================

const MARKET_1B_BONUS: i32 = 40;
const MARKET_100M_BONUS: i32 = 25;
const MARKET_10M_BONUS: i32 = 10;
const SMALL_MARKET_PENALTY: i32 = -10;
const GROWTH_100_BONUS: i32 = 30;
const GROWTH_50_BONUS: i32 = 20;
const GROWTH_20_BONUS: i32 = 10;
const SHRINKING_PENALTY: i32 = -15;
const HOT_SECTOR_BONUS: i32 = 10;

fn opportunity_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    if let Some(market) = input.market_size {
        score += if market >= 1e9 {
            MARKET_1B_BONUS
        } else if market >= 1e8 {
            MARKET_100M_BONUS
        } else if market >= 1e7 {
            MARKET_10M_BONUS
        } else {
            SMALL_MARKET_PENALTY
        };
    }

    if let Some(growth) = input.growth_rate {
        if growth > 1.0 {
            score += GROWTH_100_BONUS;
        } else if growth > 0.5 {
            score += GROWTH_50_BONUS;
        } else if growth > 0.2 {
            score += GROWTH_20_BONUS;
        } else if growth < 0.0 {
            score += SHRINKING_PENALTY;
        }
    }

    if input.sector.is_some_and(|s| s.is_hot()) {
        score += HOT_SECTOR_BONUS;
    }

    score
}

// ============================================================================
// Product
// ============================================================================

const PATENTS_PRODUCT_BONUS: i32 = 15;
const PMF_BONUS: i32 = 20;

fn product_stage_delta(stage: ProductStage) -> i32 {
    match stage {
        ProductStage::Idea => -10,
        ProductStage::Prototype => 0,
        ProductStage::Mvp => 10,
        ProductStage::Beta => 15,
        ProductStage::Launched => 25,
        ProductStage::Scaling => 35,
    }
}

fn product_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    if let Some(stage) = input.product_stage {
        score += product_stage_delta(stage);
    }
    if input.has_patents {
        score += PATENTS_PRODUCT_BONUS;
    }
    if input.has_product_market_fit {
        score += PMF_BONUS;
    }

    score
}

// ============================================================================
// Competitive environment
// ============================================================================

const PATENTS_MOAT_BONUS: i32 = 10;
const SHARE_10_BONUS: i32 = 15;
const SHARE_1_BONUS: i32 = 5;

fn competition_delta(level: CompetitionLevel) -> i32 {
    match level {
        CompetitionLevel::Low => 30,
        CompetitionLevel::Medium => 10,
        CompetitionLevel::High => -10,
        CompetitionLevel::VeryHigh => -20,
    }
}

fn competitive_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    if let Some(level) = input.competition_level {
        score += competition_delta(level);
    }
    if input.has_patents {
        score += PATENTS_MOAT_BONUS;
    }
    match input.market_share {
        Some(share) if share > 0.10 => score += SHARE_10_BONUS,
        Some(share) if share > 0.01 => score += SHARE_1_BONUS,
        _ => {}
    }

    score
}

// ============================================================================
// Marketing, sales channels and partnerships
// ============================================================================

const CUSTOMERS_1000_BONUS: i32 = 30;
const CUSTOMERS_100_BONUS: i32 = 20;
const CUSTOMERS_10_BONUS: i32 = 10;
const NO_CUSTOMERS_PENALTY: i32 = -10;
const TRACTION_BONUS: i32 = 15;
const REVENUE_BONUS: i32 = 10;
const LOW_CHURN_BONUS: i32 = 10;
const HIGH_CHURN_PENALTY: i32 = -10;

fn marketing_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    match input.customer_count {
        Some(n) if n >= 1000 => score += CUSTOMERS_1000_BONUS,
        Some(n) if n >= 100 => score += CUSTOMERS_100_BONUS,
        Some(n) if n >= 10 => score += CUSTOMERS_10_BONUS,
        Some(0) => score += NO_CUSTOMERS_PENALTY,
        _ => {}
    }

    if input.has_traction {
        score += TRACTION_BONUS;
    }
    if input.revenue.is_some_and(|r| r > 0.0) {
        score += REVENUE_BONUS;
    }
    match input.churn_rate {
        Some(churn) if churn < 0.05 => score += LOW_CHURN_BONUS,
        Some(churn) if churn > 0.15 => score += HIGH_CHURN_PENALTY,
        _ => {}
    }

    score
}

// ============================================================================
// Need for additional investment
// ============================================================================

const RUNWAY_18_BONUS: i32 = 25;
const RUNWAY_12_BONUS: i32 = 15;
const RUNWAY_6_BONUS: i32 = 5;
const SHORT_RUNWAY_PENALTY: i32 = -15;
const COVERS_BURN_BONUS: i32 = 15;
const PROFITABLE_BONUS: i32 = 20;

fn funding_need_score(input: &ValuationInput) -> i32 {
    let mut score = NEUTRAL_SCORE;

    if let Some(runway) = input.runway {
        score += if runway >= 18.0 {
            RUNWAY_18_BONUS
        } else if runway >= 12.0 {
            RUNWAY_12_BONUS
        } else if runway >= 6.0 {
            RUNWAY_6_BONUS
        } else {
            SHORT_RUNWAY_PENALTY
        };
    }

    // Revenue is annual, burn is monthly
    if let (Some(revenue), Some(burn)) = (input.revenue, input.burn_rate) {
        if revenue / 12.0 >= burn {
            score += COVERS_BURN_BONUS;
        }
    }

    if input.has_profitability {
        score += PROFITABLE_BONUS;
    }

    score
}

// ============================================================================
// Other factors
// ============================================================================

const INCENTIVE_REGISTERED_BONUS: i32 = 10;
const PREMIUM_LOCATION_BONUS: i32 = 5;

fn business_model_delta(model: BusinessModel) -> i32 {
    match model {
        BusinessModel::Subscription => 10,
        BusinessModel::Marketplace => 5,
        BusinessModel::Advertising | BusinessModel::Transactional => 0,
        BusinessModel::Hardware | BusinessModel::Services => -5,
    }
}

fn misc_score(input: &ValuationInput, location_multiplier: f64) -> i32 {
    let mut score = NEUTRAL_SCORE;

    if input.is_dpiit_registered {
        score += INCENTIVE_REGISTERED_BONUS;
    }
    if location_multiplier > 1.0 {
        score += PREMIUM_LOCATION_BONUS;
    }
    if let Some(model) = input.business_model {
        score += business_model_delta(model);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sector;
    use test_case::test_case;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Factor::ALL.iter().map(|f| f.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let input = ValuationInput::default();
        for factor in Factor::ALL {
            let expected = NEUTRAL_SCORE.clamp(factor.band().0, factor.band().1);
            assert_eq!(factor.score(&input, 1.0), expected, "{factor:?}");
        }
    }

    #[test_case(Some(2), Some(12), true, 90 ; "co-founded mid team with key hires")]
    #[test_case(Some(1), None, false, 40 ; "solo founder")]
    #[test_case(Some(3), Some(60), true, 100 ; "large team")]
    fn test_management(founders: Option<u32>, employees: Option<u32>, key_hires: bool, expected: i32) {
        let input = ValuationInput {
            founders_count: founders,
            employee_count: employees,
            has_key_hires: key_hires,
            ..Default::default()
        };
        assert_eq!(Factor::Management.score(&input, 1.0), expected);
    }

    #[test]
    fn test_opportunity_is_clamped_to_band() {
        let input = ValuationInput {
            market_size: Some(5e9),
            growth_rate: Some(2.0),
            sector: Some(Sector::Saas),
            ..Default::default()
        };
        // 50 + 40 + 30 + 10 = 130, inside [30, 140]
        assert_eq!(Factor::Opportunity.score(&input, 1.0), 130);

        let shrinking = ValuationInput {
            market_size: Some(1e6),
            growth_rate: Some(-0.3),
            ..Default::default()
        };
        assert_eq!(Factor::Opportunity.score(&shrinking, 1.0), 30);
    }

    #[test]
    fn test_competitive_band_upper_clamp() {
        let input = ValuationInput {
            competition_level: Some(CompetitionLevel::Low),
            has_patents: true,
            market_share: Some(0.2),
            ..Default::default()
        };
        // 50 + 30 + 10 + 15 = 105
        assert_eq!(Factor::Competitive.score(&input, 1.0), 105);
    }

    #[test]
    fn test_funding_need_covers_burn() {
        let input = ValuationInput {
            revenue: Some(1_200_000.0),
            burn_rate: Some(80_000.0),
            runway: Some(20.0),
            ..Default::default()
        };
        // 50 + 25 + 15
        assert_eq!(Factor::FundingNeed.score(&input, 1.0), 90);
    }

    #[test]
    fn test_misc_location_and_model() {
        let input = ValuationInput {
            is_dpiit_registered: true,
            business_model: Some(BusinessModel::Subscription),
            ..Default::default()
        };
        assert_eq!(Factor::Misc.score(&input, 1.15), 75);
        assert_eq!(Factor::Misc.score(&input, 1.0), 70);
    }
}
