//! Discounted cash flow valuation.
//!
//! Projects free cash flow for a fixed horizon with fading excess growth and
//! expanding margins, then adds a Gordon-growth terminal value.

use super::types::{CashFlowProjection, DcfAssumptions, DcfResult};
use crate::error::{Result, ValuationError};
use crate::types::{Severity, ValidationWarning, ValuationInput};

/// Compute a DCF valuation.
///
/// Fails with [`ValuationError::TerminalGrowthExceedsWacc`] before any
/// projection when the terminal growth rate is not strictly below WACC,
/// or when either rate is not a finite number.
pub fn compute_dcf(input: &ValuationInput, assumptions: &DcfAssumptions) -> Result<DcfResult> {
    let wacc = assumptions.wacc();
    let terminal_growth = assumptions.terminal_growth_rate;
    if !wacc.is_finite() || !terminal_growth.is_finite() || terminal_growth >= wacc {
        return Err(ValuationError::TerminalGrowthExceedsWacc {
            terminal_growth,
            wacc,
        });
    }

    let revenue = input.revenue.ok_or(ValuationError::MissingInput("revenue"))?;
    if !revenue.is_finite() {
        return Err(ValuationError::invalid("revenue", "must be a finite number"));
    }

    let mut warnings = Vec::new();
    let mut growth = match input.growth_rate {
        Some(g) => g,
        None => {
            warnings.push(
                ValidationWarning::new(
                    "growthRate",
                    format!(
                        "Growth rate missing; assuming {:.0}% for projections",
                        assumptions.default_growth_rate * 100.0
                    ),
                    Severity::Medium,
                )
                .with_suggestion("Provide year-over-year revenue growth"),
            );
            assumptions.default_growth_rate
        }
    };
    let mut margin = match input.operating_margin {
        Some(m) => m,
        None => {
            warnings.push(
                ValidationWarning::new(
                    "operatingMargin",
                    format!(
                        "Operating margin missing; assuming {:.0}% free cash flow margin",
                        assumptions.default_margin * 100.0
                    ),
                    Severity::Medium,
                )
                .with_suggestion("Provide operating margin from the latest financials"),
            );
            assumptions.default_margin
        }
    };

    let mut projections = Vec::with_capacity(assumptions.projection_years as usize);
    let mut current_revenue = revenue;
    let mut pv_sum = 0.0;
    for year in 1..=assumptions.projection_years {
        current_revenue *= 1.0 + growth;
        let free_cash_flow = current_revenue * margin;
        let present_value = free_cash_flow / (1.0 + wacc).powi(year as i32);
        pv_sum += present_value;

        projections.push(CashFlowProjection {
            year,
            revenue: current_revenue,
            growth_rate: growth,
            margin,
            free_cash_flow,
            present_value,
        });

        // Excess growth fades toward the floor, margin expands toward the cap
        if growth > assumptions.growth_floor {
            growth = (growth * assumptions.growth_decay).max(assumptions.growth_floor);
        }
        if margin > 0.0 && margin < assumptions.margin_cap {
            margin = (margin * assumptions.margin_expansion).min(assumptions.margin_cap);
        }
    }

    let final_fcf = projections.last().map_or(0.0, |p| p.free_cash_flow);
    let terminal_value = final_fcf * (1.0 + terminal_growth) / (wacc - terminal_growth);
    let present_terminal_value =
        terminal_value / (1.0 + wacc).powi(assumptions.projection_years as i32);
    let value = pv_sum + present_terminal_value;

    if final_fcf < 0.0 {
        warnings.push(ValidationWarning::new(
            "operatingMargin",
            "Projected free cash flow is still negative at the end of the horizon",
            Severity::High,
        ));
    }
    if value > 0.0 && present_terminal_value / value > 0.75 {
        warnings.push(ValidationWarning::new(
            "terminalGrowthRate",
            format!(
                "Terminal value is {:.0}% of enterprise value; result is sensitive to long-run assumptions",
                present_terminal_value / value * 100.0
            ),
            Severity::Low,
        ));
    }

    tracing::debug!(wacc, terminal_value, value, "DCF computed");

    Ok(DcfResult {
        value,
        wacc,
        projections,
        terminal_value,
        present_terminal_value,
        warnings,
    })
}
