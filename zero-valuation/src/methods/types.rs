//! Deterministic valuation method types.

use serde::{Deserialize, Serialize};
use zero_common::config::DcfConfig;

use crate::types::ValidationWarning;

// ============================================================================
// DCF
// ============================================================================

/// Market and modelling assumptions for the DCF method.
///
/// All rates are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfAssumptions {
    pub risk_free_rate: f64,
    pub beta: f64,
    pub market_risk_premium: f64,
    /// Pre-tax cost of debt
    pub cost_of_debt: f64,
    pub tax_rate: f64,
    /// D/V
    pub debt_ratio: f64,
    pub terminal_growth_rate: f64,
    /// Growth decays toward this floor
    pub growth_floor: f64,
    /// Margin expands toward this cap
    pub margin_cap: f64,
    /// Yearly growth multiplier (fading excess growth)
    pub growth_decay: f64,
    /// Yearly margin multiplier (operating leverage)
    pub margin_expansion: f64,
    pub projection_years: u32,
    /// Used when the input carries no growth rate
    pub default_growth_rate: f64,
    /// Used when the input carries no operating margin
    pub default_margin: f64,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        Self::from(&DcfConfig::default())
    }
}

impl From<&DcfConfig> for DcfAssumptions {
    fn from(config: &DcfConfig) -> Self {
        Self {
            risk_free_rate: config.risk_free_rate,
            beta: config.beta,
            market_risk_premium: config.market_risk_premium,
            cost_of_debt: config.cost_of_debt,
            tax_rate: config.tax_rate,
            debt_ratio: config.debt_ratio,
            terminal_growth_rate: config.terminal_growth_rate,
            growth_floor: 0.05,
            margin_cap: 0.35,
            growth_decay: 0.9,
            margin_expansion: 1.1,
            projection_years: 5,
            default_growth_rate: 0.10,
            default_margin: 0.10,
        }
    }
}

impl DcfAssumptions {
    /// CAPM cost of equity: `rf + β·MRP`.
    pub fn cost_of_equity(&self) -> f64 {
        self.risk_free_rate + self.beta * self.market_risk_premium
    }

    pub fn after_tax_cost_of_debt(&self) -> f64 {
        self.cost_of_debt * (1.0 - self.tax_rate)
    }

    /// Weighted average cost of capital.
    pub fn wacc(&self) -> f64 {
        self.cost_of_equity() * (1.0 - self.debt_ratio) + self.after_tax_cost_of_debt() * self.debt_ratio
    }
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub year: u32,
    pub revenue: f64,
    /// Growth applied to reach this year's revenue
    pub growth_rate: f64,
    /// Free cash flow margin applied this year
    pub margin: f64,
    pub free_cash_flow: f64,
    pub present_value: f64,
}

/// DCF valuation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfResult {
    /// Enterprise value: discounted cash flows plus discounted terminal value
    pub value: f64,
    pub wacc: f64,
    pub projections: Vec<CashFlowProjection>,
    pub terminal_value: f64,
    pub present_terminal_value: f64,
    pub warnings: Vec<ValidationWarning>,
}

// ============================================================================
// Revenue Multiple
// ============================================================================

/// One peer company's trading multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerMultiple {
    pub name: String,
    /// Enterprise value / revenue
    pub ev_revenue: f64,
    #[serde(default)]
    pub ev_ebitda: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
}

impl PeerMultiple {
    pub fn new(name: impl Into<String>, ev_revenue: f64) -> Self {
        Self {
            name: name.into(),
            ev_revenue,
            ev_ebitda: None,
            revenue_growth: None,
        }
    }
}

/// Revenue-multiple valuation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleResult {
    pub value: f64,
    /// Median peer EV/Revenue
    pub base_multiple: f64,
    pub adjusted_multiple: f64,
    pub peer_count: usize,
    /// Human-readable adjustments applied to the base multiple
    pub adjustments: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

// ============================================================================
// Asset Based
// ============================================================================

/// Asset-based (net asset value) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResult {
    /// Net asset value; negative when liabilities exceed assets
    pub value: f64,
    pub tangible_assets: f64,
    pub intangible_assets: f64,
    pub liabilities: f64,
    pub warnings: Vec<ValidationWarning>,
}
