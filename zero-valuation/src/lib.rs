//! Zero Valuation Library
//!
//! Estimates the value of an early-stage company from qualitative and
//! quantitative inputs and quantifies how uncertain that estimate is.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     zero-valuation (engine)                         │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────────┐ │
//! │  │  Scorecard  │  │  DCF / Mult │  │ Stage       │  │ Recommend  │ │
//! │  │  (7 factor) │  │  / Asset    │  │ Models      │  │ Engine     │ │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └────────────┘ │
//! │         │                │                │                         │
//! │         ▼                ▼                ▼                         │
//! │  ┌─────────────────────────────┐  ┌──────────────────────────────┐ │
//! │  │   Consistency Checker       │  │  Monte Carlo (rayon chunks)  │ │
//! │  └─────────────────────────────┘  └──────────────────────────────┘ │
//! │                    ▲                           ▲                    │
//! │                    └──────── Statistics Kernel ┘                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                     ▲
//!                     │ ValuationService (tokio, deadline-bound)
//! ```
//!
//! # Key Concepts
//!
//! - **Pure components**: every compute function takes a `ValuationInput`
//!   and returns an immutable result or a `ValuationError`.
//! - **Warnings are advisory**: each result carries `ValidationWarning`s
//!   that never change its numbers.
//! - **Reproducible simulation**: a seeded Monte Carlo run is bit-identical
//!   regardless of the number of worker threads.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod consistency;
pub mod error;
pub mod methods;
pub mod monte_carlo;
pub mod providers;
pub mod recommendation;
pub mod scorecard;
pub mod service;
pub mod stage_models;
pub mod stats;
pub mod types;
pub mod validation;

pub use consistency::{check_consistency, ConsistencyReport, MethodValue};
pub use error::{Result, ValuationError};
pub use methods::{compute_asset_based, compute_dcf, compute_multiple, DcfAssumptions, PeerMultiple};
pub use monte_carlo::{run_monte_carlo, SimulationParams, SimulationResult};
pub use recommendation::{recommend_method, MethodAnalysis};
pub use scorecard::{compute_scorecard, ScorecardResult};
pub use service::{MethodOutcome, ValuationReport, ValuationService};
pub use stage_models::{compute_stage_valuation, StageContext, StageValuation};
pub use types::{Sector, Severity, Stage, ValidationWarning, ValuationInput, ValuationMethod};
pub use validation::validate_input;
