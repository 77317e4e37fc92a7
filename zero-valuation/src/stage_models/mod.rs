//! Stage-Specific Valuation Models.
//!
//! | Stage                  | Model                  | Core formula                         |
//! |------------------------|------------------------|--------------------------------------|
//! | pre-seed               | Pre-Seed Scorecard     | 0.4·TAM + 0.6·team·1M                |
//! | seed                   | Seed Bottom-up DCF     | MRR·(1+g)^12 · 12(1+g)/churn         |
//! | series-a               | Series A Hybrid        | 0.6·DCF + 0.4·comparables            |
//! | series-b/c, growth     | Growth Terminal Value  | FCF(1+g)/(WACC−g) × region           |
//!
//! Every model reports a 0-1 confidence derived from its named risk factors.

pub mod growth;
pub mod pre_seed;
pub mod seed;
pub mod series_a;
pub mod types;

pub use growth::{GrowthModel, Region};
pub use pre_seed::PreSeedModel;
pub use seed::SeedModel;
pub use series_a::SeriesAModel;
pub use types::{StageContext, StageModel, StageValuation};

use crate::error::{Result, ValuationError};
use crate::types::{Stage, ValuationInput};

/// Model responsible for a funding stage.
pub fn model_for_stage(stage: Stage) -> &'static dyn StageModel {
    match stage {
        Stage::PreSeed => &PreSeedModel,
        Stage::Seed => &SeedModel,
        Stage::SeriesA => &SeriesAModel,
        Stage::SeriesB | Stage::SeriesC | Stage::Growth => &GrowthModel,
    }
}

/// Run the model matching the input's stage.
pub fn compute_stage_valuation(input: &ValuationInput, ctx: &StageContext) -> Result<StageValuation> {
    let stage = input.stage.ok_or_else(|| {
        ValuationError::InsufficientData("stage is required for stage-specific models".into())
    })?;
    let model = model_for_stage(stage);
    tracing::debug!(%stage, model = model.name(), "Running stage model");
    model.calculate(input, ctx)
}
